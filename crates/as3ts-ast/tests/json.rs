use super::*;

const SOURCE: &str = "root.tail";

const JSON: &str = r#"{
    "kind": "DOT", "start": 0, "end": 9,
    "children": [
        { "kind": "IDENTIFIER", "start": 0, "end": 4, "text": "root" },
        { "kind": "LITERAL", "start": 5, "end": 9, "text": "tail" }
    ]
}"#;

#[test]
fn test_from_json_flattens_and_links_parents() {
    let tree = SyntaxTree::from_json(JSON, SOURCE).unwrap();
    let root = tree.root().unwrap();
    assert_eq!(tree.kind(root), NodeKind::Dot);
    assert_eq!(tree.len(), 3);

    let base = tree.child(root, 0).unwrap();
    let name = tree.child(root, 1).unwrap();
    assert_eq!(tree.text(base), Some("root"));
    assert_eq!(tree.text(name), Some("tail"));
    assert_eq!(tree.parent(name), Some(root));
}

#[test]
fn test_to_raw_inverts_from_raw() {
    let raw: RawNode = serde_json::from_str(JSON).unwrap();
    let tree = SyntaxTree::from_raw(&raw, SOURCE).unwrap();
    assert_eq!(tree.to_raw().unwrap(), raw);
}

#[test]
fn test_unknown_kind_is_a_json_error() {
    let json = r#"{ "kind": "WHATEVER", "start": 0, "end": 0 }"#;
    assert!(matches!(
        SyntaxTree::from_json(json, ""),
        Err(TreeError::Json(_))
    ));
}

#[test]
fn test_ranges_are_validated_against_source() {
    let json = r#"{ "kind": "IDENTIFIER", "start": 0, "end": 20, "text": "x" }"#;
    assert!(matches!(
        SyntaxTree::from_json(json, "x"),
        Err(TreeError::PastEndOfSource { .. })
    ));
}
