//! Arena storage for the AST.
//!
//! Nodes are stored contiguously and referenced by `NodeIndex`. Each node owns
//! the ordered list of its children's indices and keeps a non-owning parent
//! index that is only used for upward queries.

use crate::error::TreeError;
use crate::node_kind::NodeKind;
use serde::Serialize;

/// Index of a node inside a `SyntaxTree`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Sentinel for "no node" (root parent, missing child).
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub const fn is_some(self) -> bool {
        self.0 != u32::MAX
    }
}

/// A single AST node.
///
/// `start..end` is a half-open byte range into the source text. `text` holds
/// the raw lexeme for leaf-like nodes (identifiers, literals, types, names).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub start: u32,
    pub end: u32,
    pub parent: NodeIndex,
    pub children: Vec<NodeIndex>,
    pub text: Option<String>,
}

impl Node {
    pub fn new(kind: NodeKind, start: u32, end: u32, text: Option<String>) -> Node {
        Node {
            kind,
            start,
            end,
            parent: NodeIndex::NONE,
            children: Vec::new(),
            text,
        }
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Arena-based AST produced by the parser collaborator.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: Option<NodeIndex>,
}

impl SyntaxTree {
    pub fn new() -> SyntaxTree {
        SyntaxTree::default()
    }

    /// Add a detached node and return its index.
    pub(crate) fn push(&mut self, node: Node) -> NodeIndex {
        let index = self.nodes.len() as u32;
        self.nodes.push(node);
        NodeIndex(index)
    }

    /// Attach `children` to `parent`, in order, setting their parent links.
    pub(crate) fn attach(&mut self, parent: NodeIndex, children: &[NodeIndex]) {
        for &child in children {
            self.nodes[child.0 as usize].parent = parent;
        }
        self.nodes[parent.0 as usize]
            .children
            .extend_from_slice(children);
    }

    pub(crate) fn node_mut(&mut self, index: NodeIndex) -> &mut Node {
        &mut self.nodes[index.0 as usize]
    }

    pub(crate) fn set_root(&mut self, root: NodeIndex) {
        self.root = Some(root);
    }

    pub fn root(&self) -> Result<NodeIndex, TreeError> {
        self.root.ok_or(TreeError::MissingRoot)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get a node by index.
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    /// Get a node by an index handed out by this tree.
    ///
    /// Indices obtained from this tree are always in range; passing
    /// `NodeIndex::NONE` or an index from another tree panics.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.0 as usize]
    }

    #[inline]
    pub fn kind(&self, index: NodeIndex) -> NodeKind {
        self.node(index).kind
    }

    #[inline]
    pub fn is_kind(&self, index: NodeIndex, kind: NodeKind) -> bool {
        self.get(index).is_some_and(|node| node.kind == kind)
    }

    #[inline]
    pub fn start(&self, index: NodeIndex) -> u32 {
        self.node(index).start
    }

    #[inline]
    pub fn end(&self, index: NodeIndex) -> u32 {
        self.node(index).end
    }

    /// Raw lexeme of a node, if it carries one.
    #[inline]
    pub fn text(&self, index: NodeIndex) -> Option<&str> {
        self.get(index).and_then(|node| node.text.as_deref())
    }

    /// Raw lexeme of a node, or `""` when absent.
    #[inline]
    pub fn text_or_empty(&self, index: NodeIndex) -> &str {
        self.text(index).unwrap_or("")
    }

    #[inline]
    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        match self.get(index) {
            Some(node) => &node.children,
            None => &[],
        }
    }

    /// The `n`th child, if present.
    #[inline]
    pub fn child(&self, index: NodeIndex, n: usize) -> Option<NodeIndex> {
        self.children(index).get(n).copied()
    }

    pub fn last_child(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.children(index).last().copied()
    }

    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.get(index)
            .map(|node| node.parent)
            .filter(|parent| parent.is_some())
    }

    pub fn parent_kind(&self, index: NodeIndex) -> Option<NodeKind> {
        self.parent(index).map(|parent| self.kind(parent))
    }

    /// First child of the given kind.
    pub fn find_child(&self, index: NodeIndex, kind: NodeKind) -> Option<NodeIndex> {
        self.children(index)
            .iter()
            .copied()
            .find(|&child| self.kind(child) == kind)
    }

    /// All children of the given kind, in order.
    pub fn find_children(&self, index: NodeIndex, kind: NodeKind) -> Vec<NodeIndex> {
        self.children(index)
            .iter()
            .copied()
            .filter(|&child| self.kind(child) == kind)
            .collect()
    }

    /// Children following the first child of `kind`; all children when there
    /// is no such child.
    pub fn children_after(&self, index: NodeIndex, kind: NodeKind) -> &[NodeIndex] {
        let children = self.children(index);
        match children.iter().position(|&child| self.kind(child) == kind) {
            Some(pos) => &children[pos + 1..],
            None => children,
        }
    }

    /// Children preceding the first child of `kind`; all children when there
    /// is no such child.
    pub fn children_before(&self, index: NodeIndex, kind: NodeKind) -> &[NodeIndex] {
        let children = self.children(index);
        match children.iter().position(|&child| self.kind(child) == kind) {
            Some(pos) => &children[..pos],
            None => children,
        }
    }

    fn sibling(&self, index: NodeIndex, offset: isize) -> Option<NodeIndex> {
        let parent = self.parent(index)?;
        let siblings = self.children(parent);
        let pos = siblings.iter().position(|&s| s == index)?;
        let target = pos.checked_add_signed(offset)?;
        siblings.get(target).copied()
    }

    pub fn next_sibling(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.sibling(index, 1)
    }

    pub fn previous_sibling(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.sibling(index, -1)
    }

    /// Walk parents from the node's parent up to the root.
    pub fn ancestors(&self, index: NodeIndex) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(index),
        }
    }

    /// Whether the parents of `index`, from the nearest outward, have exactly
    /// the given kinds.
    pub fn parent_chain_has_kinds(&self, index: NodeIndex, kinds: &[NodeKind]) -> bool {
        let mut current = index;
        for &kind in kinds {
            match self.parent(current) {
                Some(parent) if self.kind(parent) == kind => current = parent,
                _ => return false,
            }
        }
        true
    }

    /// Copy of the tree without comment nodes.
    ///
    /// Comment text stays in the source and reaches the output through
    /// verbatim copying; dropping the nodes keeps child shapes predictable
    /// for the emitter's handlers.
    pub fn without_comments(&self) -> Result<SyntaxTree, TreeError> {
        let root = self.root()?;
        let mut filtered = SyntaxTree {
            nodes: Vec::with_capacity(self.nodes.len()),
            root: None,
        };
        let new_root = self.copy_filtered(root, &mut filtered);
        filtered.set_root(new_root);
        Ok(filtered)
    }

    fn copy_filtered(&self, index: NodeIndex, into: &mut SyntaxTree) -> NodeIndex {
        let node = self.node(index);
        let copy = into.push(Node::new(node.kind, node.start, node.end, node.text.clone()));
        let children: Vec<NodeIndex> = node
            .children
            .iter()
            .copied()
            .filter(|&child| !self.kind(child).is_comment())
            .map(|child| self.copy_filtered(child, into))
            .collect();
        into.attach(copy, &children);
        copy
    }

    /// Check the range invariants against a source of `source_len` bytes:
    /// `start <= end`, children contained in their parent, nothing past the
    /// end of the source.
    pub fn validate(&self, source_len: usize) -> Result<(), TreeError> {
        for (i, node) in self.nodes.iter().enumerate() {
            let index = i as u32;
            if node.start > node.end {
                return Err(TreeError::InvertedRange {
                    index,
                    kind: node.kind,
                    start: node.start,
                    end: node.end,
                });
            }
            if node.end as usize > source_len {
                return Err(TreeError::PastEndOfSource {
                    index,
                    kind: node.kind,
                    end: node.end,
                    len: source_len,
                });
            }
            if let Some(parent) = self.get(node.parent)
                && (node.start < parent.start || node.end > parent.end)
            {
                return Err(TreeError::ChildOutsideParent {
                    index,
                    kind: node.kind,
                    start: node.start,
                    end: node.end,
                    parent_start: parent.start,
                    parent_end: parent.end,
                });
            }
        }
        Ok(())
    }
}

/// Iterator over a node's ancestors, nearest first.
pub struct Ancestors<'a> {
    tree: &'a SyntaxTree,
    next: Option<NodeIndex>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeIndex;

    fn next(&mut self) -> Option<NodeIndex> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}

#[cfg(test)]
#[path = "../tests/tree.rs"]
mod tests;
