use super::*;

fn typed(name: &str, ty: &str) -> Declaration {
    Declaration::new(name).with_type(Some(ty.to_string()))
}

#[test]
fn test_inner_declaration_shadows_outer() {
    let mut chain = ScopeChain::new();
    let outer = chain.enter(vec![typed("x", "A")], None);
    assert_eq!(chain.find("x").unwrap().ty.as_deref(), Some("A"));

    let inner = chain.enter(vec![typed("x", "B")], None);
    assert_eq!(chain.find("x").unwrap().ty.as_deref(), Some("B"));

    chain.exit(inner).unwrap();
    assert_eq!(chain.find("x").unwrap().ty.as_deref(), Some("A"));
    chain.exit(outer).unwrap();
    assert!(chain.find("x").is_none());
}

#[test]
fn test_redeclaration_amends_existing_entry() {
    let mut chain = ScopeChain::new();
    chain.enter(vec![Declaration::new("count")], None);
    assert_eq!(chain.find("count").unwrap().ty, None);

    chain.declare(typed("count", "number")).unwrap();
    chain
        .declare(Declaration::new("count").with_bound("this"))
        .unwrap();
    // An empty redeclaration keeps what is already known.
    chain.declare(Declaration::new("count")).unwrap();

    let decl = chain.find("count").unwrap();
    assert_eq!(decl.ty.as_deref(), Some("number"));
    assert_eq!(decl.bound.as_deref(), Some("this"));
}

#[test]
fn test_declare_targets_innermost_scope_only() {
    let mut chain = ScopeChain::new();
    let root = chain.enter(Vec::new(), None);
    let inner = chain.enter(Vec::new(), None);
    chain.declare(Declaration::new("local")).unwrap();
    chain.declare_in_root(Declaration::new("Sprite")).unwrap();
    chain.exit(inner).unwrap();

    assert!(chain.find("local").is_none());
    assert!(chain.find_in_root("Sprite").is_some());
    chain.exit(root).unwrap();
}

#[test]
fn test_current_class_name_walks_outwards() {
    let mut chain = ScopeChain::new();
    chain.enter(Vec::new(), None);
    assert_eq!(chain.current_class_name(), None);
    chain.enter(Vec::new(), Some("Player".to_string()));
    chain.enter(vec![Declaration::new("speed")], None);
    assert_eq!(chain.current_class_name(), Some("Player"));
    assert_eq!(chain.depth(), 3);
}

#[test]
fn test_find_in_class_skips_shadowing_locals() {
    let mut chain = ScopeChain::new();
    chain.enter(vec![typed("doc", "Root")], None);
    assert!(chain.find_in_class("doc").is_none());

    chain.enter(vec![typed("doc", "XML").with_bound("this")], Some("Page".to_string()));
    chain.enter(vec![typed("doc", "string")], None);
    assert_eq!(chain.find("doc").unwrap().ty.as_deref(), Some("string"));
    assert_eq!(chain.find_in_class("doc").unwrap().ty.as_deref(), Some("XML"));
    assert!(chain.find_in_class("title").is_none());
}

#[test]
fn test_mismatched_exit_is_an_error() {
    let mut chain = ScopeChain::new();
    let outer = chain.enter(Vec::new(), None);
    let inner = chain.enter(Vec::new(), None);
    assert!(matches!(chain.exit(outer), Err(EmitError::ScopeMismatch(_))));
    chain.exit(inner).unwrap();
    chain.exit(outer).unwrap();
    assert!(matches!(chain.exit(outer), Err(EmitError::ScopeMismatch(_))));
}

#[test]
fn test_declare_without_scope_is_an_error() {
    let mut chain = ScopeChain::new();
    assert!(chain.declare(Declaration::new("x")).is_err());
    assert!(chain.declare_in_root(Declaration::new("x")).is_err());
}
