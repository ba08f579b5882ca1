use super::*;
use crate::builder::TreeBuilder;

/// `a.b(c)` as CALL [DOT [IDENTIFIER a, LITERAL b], ARGUMENTS [IDENTIFIER c]]
fn call_tree() -> (SyntaxTree, [NodeIndex; 6]) {
    let source = "a.b(c)";
    let mut b = TreeBuilder::new(source);
    let a = b.token(NodeKind::Identifier, "a", 0).unwrap();
    let name = b.token(NodeKind::Literal, "b", 0).unwrap();
    let dot = b.wrap(NodeKind::Dot, &[a, name]);
    let c = b.token(NodeKind::Identifier, "c", 0).unwrap();
    let args = b.branch(NodeKind::Arguments, 3, 6, &[c]);
    let call = b.branch(NodeKind::Call, 0, 6, &[dot, args]);
    let tree = b.finish(call).unwrap();
    (tree, [call, dot, a, name, args, c])
}

#[test]
fn test_node_index_sentinel() {
    assert!(NodeIndex::NONE.is_none());
    assert!(!NodeIndex::NONE.is_some());
    assert!(NodeIndex(0).is_some());
}

#[test]
fn test_basic_navigation() {
    let (tree, [call, dot, a, name, args, c]) = call_tree();

    assert_eq!(tree.root().unwrap(), call);
    assert_eq!(tree.children(call), &[dot, args]);
    assert_eq!(tree.child(dot, 0), Some(a));
    assert_eq!(tree.child(dot, 2), None);
    assert_eq!(tree.last_child(call), Some(args));
    assert_eq!(tree.parent(a), Some(dot));
    assert_eq!(tree.parent(call), None);
    assert_eq!(tree.parent_kind(c), Some(NodeKind::Arguments));
    assert_eq!(tree.text(name), Some("b"));
    assert_eq!(tree.text(dot), None);
    assert_eq!(tree.text_or_empty(dot), "");
}

#[test]
fn test_siblings() {
    let (tree, [call, dot, a, name, args, _]) = call_tree();

    assert_eq!(tree.next_sibling(a), Some(name));
    assert_eq!(tree.next_sibling(name), None);
    assert_eq!(tree.previous_sibling(args), Some(dot));
    assert_eq!(tree.previous_sibling(dot), None);
    assert_eq!(tree.next_sibling(call), None);
}

#[test]
fn test_find_children_and_slices() {
    let (tree, [call, dot, _, _, args, _]) = call_tree();

    assert_eq!(tree.find_child(call, NodeKind::Arguments), Some(args));
    assert_eq!(tree.find_child(call, NodeKind::Block), None);
    assert_eq!(tree.find_children(call, NodeKind::Dot), vec![dot]);

    assert_eq!(tree.children_after(call, NodeKind::Dot), &[args]);
    assert_eq!(tree.children_before(call, NodeKind::Arguments), &[dot]);
    // Missing marker yields every child.
    assert_eq!(tree.children_after(call, NodeKind::Block), &[dot, args]);
    assert_eq!(tree.children_before(call, NodeKind::Block), &[dot, args]);
}

#[test]
fn test_ancestors_and_parent_chain() {
    let (tree, [call, dot, a, _, _, _]) = call_tree();

    let chain: Vec<NodeIndex> = tree.ancestors(a).collect();
    assert_eq!(chain, vec![dot, call]);
    assert!(tree.parent_chain_has_kinds(a, &[NodeKind::Dot, NodeKind::Call]));
    assert!(!tree.parent_chain_has_kinds(a, &[NodeKind::Call]));
    assert!(!tree.parent_chain_has_kinds(a, &[NodeKind::Dot, NodeKind::Call, NodeKind::Block]));
    assert!(tree.parent_chain_has_kinds(a, &[]));
}

#[test]
fn test_without_comments_drops_comment_nodes() {
    let source = "/** doc */ x";
    let mut b = TreeBuilder::new(source);
    let doc = b.token(NodeKind::AsDoc, "/** doc */", 0).unwrap();
    let x = b.token(NodeKind::Identifier, "x", 0).unwrap();
    let unit = b.branch(NodeKind::CompilationUnit, 0, source.len() as u32, &[doc, x]);
    let tree = b.finish(unit).unwrap();

    let filtered = tree.without_comments().unwrap();
    let root = filtered.root().unwrap();
    assert_eq!(filtered.len(), 2);
    assert_eq!(filtered.children(root).len(), 1);
    let only = filtered.children(root)[0];
    assert_eq!(filtered.kind(only), NodeKind::Identifier);
    assert_eq!(filtered.parent(only), Some(root));
}

#[test]
fn test_validate_rejects_child_outside_parent() {
    let source = "abcdef";
    let mut b = TreeBuilder::new(source);
    let child = b.leaf(NodeKind::Identifier, 2, 6, Some("cdef"));
    let parent = b.branch(NodeKind::Encapsulated, 0, 4, &[child]);
    let err = b.finish(parent).unwrap_err();
    assert!(matches!(err, TreeError::ChildOutsideParent { parent_end: 4, .. }));
}

#[test]
fn test_validate_rejects_inverted_and_overlong_ranges() {
    let mut b = TreeBuilder::new("ab");
    let bad = b.leaf(NodeKind::Identifier, 2, 1, None);
    assert!(matches!(
        b.finish(bad).unwrap_err(),
        TreeError::InvertedRange { start: 2, end: 1, .. }
    ));

    let mut b = TreeBuilder::new("ab");
    let long = b.leaf(NodeKind::Identifier, 0, 3, None);
    assert!(matches!(
        b.finish(long).unwrap_err(),
        TreeError::PastEndOfSource { end: 3, len: 2, .. }
    ));
}

#[test]
fn test_empty_tree_has_no_root() {
    let tree = SyntaxTree::new();
    assert!(tree.is_empty());
    assert!(matches!(tree.root(), Err(TreeError::MissingRoot)));
    assert!(tree.without_comments().is_err());
}
