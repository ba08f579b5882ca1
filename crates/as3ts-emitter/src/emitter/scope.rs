//! Lexical scope chain.
//!
//! Scopes form a stack; the bottom entry is the root scope of the unit. Lookup
//! walks from the innermost scope outwards and the first match wins.

use crate::error::EmitError;

/// A name bound in some scope.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    /// Target-language type name, already remapped.
    pub ty: Option<String>,
    /// Qualifier prepended on reference: `this`, or a class name for statics.
    pub bound: Option<String>,
}

impl Declaration {
    pub fn new(name: impl Into<String>) -> Declaration {
        Declaration {
            name: name.into(),
            ty: None,
            bound: None,
        }
    }

    pub fn with_type(mut self, ty: Option<String>) -> Declaration {
        self.ty = ty;
        self
    }

    pub fn with_bound(mut self, bound: impl Into<String>) -> Declaration {
        self.bound = Some(bound.into());
        self
    }
}

/// Handle returned by [`ScopeChain::enter`], checked on exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScopeId(u32);

#[derive(Debug)]
struct Scope {
    id: ScopeId,
    declarations: Vec<Declaration>,
    class_name: Option<String>,
}

impl Scope {
    fn find(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|decl| decl.name == name)
    }

    /// Insert, or amend the type and bound of an existing entry.
    fn declare(&mut self, declaration: Declaration) {
        match self
            .declarations
            .iter_mut()
            .find(|decl| decl.name == declaration.name)
        {
            Some(existing) => {
                if declaration.ty.is_some() {
                    existing.ty = declaration.ty;
                }
                if declaration.bound.is_some() {
                    existing.bound = declaration.bound;
                }
            }
            None => self.declarations.push(declaration),
        }
    }
}

#[derive(Debug, Default)]
pub struct ScopeChain {
    scopes: Vec<Scope>,
    next_id: u32,
}

impl ScopeChain {
    pub fn new() -> ScopeChain {
        ScopeChain::default()
    }

    pub fn enter(&mut self, declarations: Vec<Declaration>, class_name: Option<String>) -> ScopeId {
        let id = ScopeId(self.next_id);
        self.next_id += 1;
        let mut scope = Scope {
            id,
            declarations: Vec::with_capacity(declarations.len()),
            class_name,
        };
        for declaration in declarations {
            scope.declare(declaration);
        }
        self.scopes.push(scope);
        id
    }

    /// Leave the scope `id`, which must be the innermost one.
    pub fn exit(&mut self, id: ScopeId) -> Result<(), EmitError> {
        match self.scopes.last() {
            Some(scope) if scope.id == id => {
                self.scopes.pop();
                Ok(())
            }
            Some(scope) => Err(EmitError::ScopeMismatch(format!(
                "exiting scope {} while scope {} is current",
                id.0, scope.id.0
            ))),
            None => Err(EmitError::ScopeMismatch(format!(
                "exiting scope {} with no scope open",
                id.0
            ))),
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Declare in the innermost scope.
    pub fn declare(&mut self, declaration: Declaration) -> Result<(), EmitError> {
        let scope = self.scopes.last_mut().ok_or_else(|| {
            EmitError::ScopeMismatch(format!("declaring `{}` with no scope open", declaration.name))
        })?;
        scope.declare(declaration);
        Ok(())
    }

    /// Declare in the root scope regardless of nesting.
    pub fn declare_in_root(&mut self, declaration: Declaration) -> Result<(), EmitError> {
        let root = self.scopes.first_mut().ok_or_else(|| {
            EmitError::ScopeMismatch(format!("declaring `{}` with no root scope", declaration.name))
        })?;
        root.declare(declaration);
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&Declaration> {
        self.scopes.iter().rev().find_map(|scope| scope.find(name))
    }

    pub fn find_in_root(&self, name: &str) -> Option<&Declaration> {
        self.scopes.first().and_then(|root| root.find(name))
    }

    /// Member `name` of the nearest enclosing class body, ignoring locals
    /// that shadow it.
    pub fn find_in_class(&self, name: &str) -> Option<&Declaration> {
        self.scopes
            .iter()
            .rev()
            .find(|scope| scope.class_name.is_some())
            .and_then(|scope| scope.find(name))
    }

    /// Name of the nearest enclosing class body.
    pub fn current_class_name(&self) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.class_name.as_deref())
    }
}

#[cfg(test)]
#[path = "../../tests/scope.rs"]
mod tests;
