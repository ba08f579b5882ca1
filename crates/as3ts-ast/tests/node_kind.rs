use super::*;

#[test]
fn test_names_round_trip_through_from_name() {
    for &kind in NodeKind::ALL {
        assert_eq!(NodeKind::from_name(kind.as_str()), Some(kind));
    }
}

#[test]
fn test_names_are_unique() {
    let mut names: Vec<&str> = NodeKind::ALL.iter().map(|kind| kind.as_str()).collect();
    names.sort_unstable();
    let before = names.len();
    names.dedup();
    assert_eq!(before, names.len());
}

#[test]
fn test_unknown_name() {
    assert_eq!(NodeKind::from_name("NOT_A_KIND"), None);
    assert_eq!(NodeKind::from_name("dot"), None);
}

#[test]
fn test_loop_kinds_use_parser_spelling() {
    assert_eq!(NodeKind::ForEach.as_str(), "FOREACH");
    assert_eq!(NodeKind::ForIn.as_str(), "FORIN");
    assert_eq!(
        NodeKind::E4xAttrArrayAccess.as_str(),
        "E4X_ATTR_ARRAY_ACCESS"
    );
}

#[test]
fn test_classification_helpers() {
    assert!(NodeKind::AsDoc.is_comment());
    assert!(NodeKind::MultiLineComment.is_comment());
    assert!(!NodeKind::Literal.is_comment());

    assert!(NodeKind::Dot.is_accessor());
    assert!(NodeKind::ArrayAccessor.is_accessor());
    assert!(!NodeKind::E4xAttr.is_accessor());

    assert!(NodeKind::E4xStar.is_e4x_access());
    assert!(NodeKind::E4xFilter.is_e4x_access());
    assert!(!NodeKind::Dot.is_e4x_access());

    assert!(NodeKind::Lambda.is_function_like());
    assert!(!NodeKind::Class.is_function_like());
}

#[test]
fn test_serde_uses_canonical_name() {
    let json = serde_json::to_string(&NodeKind::NameTypeInit).unwrap();
    assert_eq!(json, "\"NAME_TYPE_INIT\"");

    let kind: NodeKind = serde_json::from_str("\"E4X_FILTER\"").unwrap();
    assert_eq!(kind, NodeKind::E4xFilter);

    let err = serde_json::from_str::<NodeKind>("\"BOGUS\"").unwrap_err();
    assert!(err.to_string().contains("unknown node kind `BOGUS`"));
}

#[test]
fn test_display() {
    assert_eq!(NodeKind::ArrayAccessor.to_string(), "ARRAY_ACCESSOR");
}
