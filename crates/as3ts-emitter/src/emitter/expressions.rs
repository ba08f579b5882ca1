//! Expression handlers.

use super::Emitter;
use crate::error::EmitError;
use crate::keywords::{self, COLON, DOUBLE_AND_EQUAL, DOUBLE_OR_EQUAL, INSTANCE_OF};
use as3ts_ast::{NodeIndex, NodeKind};
use tracing::{trace, warn};

/// `x is T` for primitives must use `typeof`.
fn primitive_typeof(name: &str) -> Option<&'static str> {
    match name {
        "String" => Some("string"),
        "Number" => Some("number"),
        "Boolean" => Some("boolean"),
        _ => None,
    }
}

impl Emitter<'_> {
    pub(super) fn emit_new(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        self.catchup(tree.start(node))?;
        self.with_context(
            |ctx| {
                ctx.is_new = true;
                ctx.emit_this_for_next_ident = false;
            },
            |e| e.dispatch_all(tree.children(node)),
        )
    }

    /// A call to an unresolved capitalised name is a cast: `Foo(x)` becomes
    /// `<Foo>(x)`.
    fn is_cast(&self, node: NodeIndex) -> bool {
        let tree = self.tree;
        let Some(text) = tree
            .find_child(node, NodeKind::Identifier)
            .and_then(|ty| tree.text(ty))
        else {
            return false;
        };
        self.find_def(text).is_none() && text.starts_with(|c: char| c.is_uppercase())
    }

    pub(super) fn emit_call(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        let Some(callee) = tree.child(node, 0) else {
            return self.emit_children(node);
        };

        if tree.kind(callee) == NodeKind::Vector {
            let args = self.required_kind(node, NodeKind::Arguments)?;
            if self.ctx.is_new {
                // `new Vector.<T>()` is an empty array.
                self.ctx.is_new = false;
                if !tree.children(args).is_empty() {
                    warn!("arguments to a vector constructor are dropped");
                }
                self.insert("[]");
                return self.skip_to(tree.end(args));
            }
            self.catchup(tree.start(node))?;
            self.insert("<");
            self.dispatch(callee)?;
            self.insert(">");
            self.skip_to(tree.start(args))?;
            return self.dispatch(args);
        }

        self.catchup(tree.start(node))?;
        if !self.ctx.is_new && self.is_cast(node) {
            let ty = self.required_kind(node, NodeKind::Identifier)?;
            let args = self.required_kind(node, NodeKind::Arguments)?;
            let text = self.required_text(ty)?;
            let mapped = self.type_remap(text).unwrap_or(text);
            // `String(x)` and `Number(x)` convert rather than assert.
            if mapped != "string" && mapped != "number" {
                let name = self.type_reference(text)?;
                trace!(target_type = %name, "call rewritten as type assertion");
                self.insert(&format!("<{name}>"));
                self.skip_to(tree.start(args))?;
                return self.dispatch(args);
            }
        }

        self.dispatch(callee)?;
        // Past the callee, the arguments are not part of the `new` target.
        self.ctx.is_new = false;
        self.dispatch_all(&tree.children(node)[1..])
    }

    /// `x as T` becomes `(<T>x)`; `x is T` becomes `instanceof`, `typeof` or
    /// a null check.
    pub(super) fn emit_relation(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        self.catchup(tree.start(node))?;

        if let Some(as_node) = tree.find_child(node, NodeKind::As) {
            let Some(target) = tree.last_child(node) else {
                return Ok(());
            };
            return match tree.kind(target) {
                NodeKind::Identifier => {
                    let name = self.type_reference(self.required_text(target)?)?;
                    self.insert(&format!("(<{name}>"));
                    self.dispatch_all(tree.children_before(node, NodeKind::As))?;
                    let gap = self.source_between(self.index(), tree.start(as_node));
                    if gap.trim().is_empty() {
                        self.skip_to(tree.start(as_node))?;
                    } else {
                        self.catchup(tree.start(as_node))?;
                    }
                    self.insert(")");
                    self.skip_to(tree.end(node))
                }
                NodeKind::Vector => self.dispatch_all(tree.children(node)),
                _ => self.comment_node(node, false),
            };
        }

        if tree.find_child(node, NodeKind::Is).is_some() {
            let &[value, is, constructor] = tree.children(node) else {
                return Err(self.malformed(node, "expected value, `is` and type"));
            };
            return self.emit_is(value, is, constructor);
        }

        self.dispatch_all(tree.children(node))
    }

    fn emit_is(&mut self, value: NodeIndex, is: NodeIndex, constructor: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        let constructor_name = (tree.kind(constructor) == NodeKind::Identifier)
            .then(|| tree.text(constructor))
            .flatten();

        if let Some(primitive) = constructor_name.and_then(primitive_typeof) {
            self.insert("typeof ");
            self.dispatch(value)?;
            self.catchup(tree.start(is))?;
            self.insert("===");
            self.skip_to(tree.end(is))?;
            self.catchup(tree.start(constructor))?;
            self.insert(&format!("'{primitive}'"));
            return self.skip_to(tree.end(constructor));
        }

        self.dispatch(value)?;
        self.catchup(tree.start(is))?;
        let Some(type_name) = constructor_name else {
            self.insert(INSTANCE_OF);
            self.skip_to(tree.end(is))?;
            return self.dispatch(constructor);
        };

        let remap = &self.options().remap;
        if !remap.is_global(type_name)
            && self.type_remap(type_name).is_none()
            && !remap.is_target_type(type_name)
            && self.find_def(type_name).is_none()
        {
            self.ensure_import(type_name, None, true)?;
        }
        // `instanceof` cannot test array types.
        let target = match self.type_remap(type_name) {
            Some(mapped) if !mapped.ends_with("[]") => mapped,
            _ => type_name,
        };

        if target == "any" {
            // Everything but null and undefined is an Object.
            self.insert("!=");
            self.skip_to(tree.end(is))?;
            self.catchup(tree.start(constructor))?;
            self.insert("null");
        } else {
            self.insert(INSTANCE_OF);
            self.skip_to(tree.end(is))?;
            self.catchup(tree.start(constructor))?;
            self.insert(target);
        }
        self.skip_to(tree.end(constructor))
    }

    /// Whether a bare identifier needs neither a `this.` qualifier nor an
    /// import.
    pub(crate) fn identifier_has_definition(&self, name: &str) -> bool {
        let Some(class_name) = self.current_class_name() else {
            return true;
        };
        let remap = &self.options().remap;
        self.find_def(name).is_some()
            || remap.is_global(name)
            || remap.is_remapped_type(name)
            || name == class_name
    }

    pub(crate) fn emit_identifier(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        self.catchup(tree.start(node))?;

        // Only the base of a member access is resolved.
        if let Some(parent) = tree.parent(node)
            && tree.kind(parent) == NodeKind::Dot
            && tree.child(parent, 0) != Some(node)
        {
            return Ok(());
        }

        let text = self.required_text(node)?;
        if keywords::is_keyword(text) {
            self.insert(text);
            return self.skip_to(tree.end(node));
        }

        if let Some(bound) = self.find_def(text).and_then(|decl| decl.bound.clone()) {
            self.insert(&format!("{bound}."));
        }

        // Loop labels (`outer:`) arrive as two sibling identifiers.
        let is_label = text == COLON
            || tree
                .next_sibling(node)
                .and_then(|sibling| tree.text(sibling))
                == Some(COLON);
        if !is_label && !self.identifier_has_definition(text) {
            if text.starts_with(|c: char| c.is_ascii_uppercase()) {
                if !self.options.uses_namespaces() {
                    self.ensure_import(text, None, true)?;
                }
            } else if self.ctx.emit_this_for_next_ident {
                self.insert("this.");
            }
        }

        let emitted = self.identifier_remap(text).unwrap_or(text);
        self.insert(emitted);
        // A parameterised type constructed with `new` needs its parentheses.
        if emitted.ends_with('>') && tree.parent_kind(node) == Some(NodeKind::New) {
            self.insert("()");
        }
        self.skip_to(tree.end(node))?;
        self.ctx.emit_this_for_next_ident = true;
        Ok(())
    }

    /// Conditional compilation: `CONFIG::debug { ... }` becomes
    /// `if (process.env.DEBUG) { ... }`, and `CONFIG::debug` in a condition
    /// becomes `process.env.DEBUG`.
    pub(super) fn emit_dot(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        let guards_block = tree
            .next_sibling(node)
            .is_some_and(|sibling| tree.kind(sibling) == NodeKind::Block);
        let in_condition = tree.parent_kind(node) == Some(NodeKind::Condition);

        if (guards_block || in_condition)
            && let Some(namespace) = tree.child(node, 0)
            && self.source_between(tree.end(namespace), tree.end(namespace) + 2) == "::"
        {
            let flag = self
                .required_text(self.required_child(node, 1)?)?
                .to_uppercase();
            let check = format!("process.env.{flag}");
            self.catchup(tree.start(node))?;
            if guards_block {
                self.insert(&format!("if ({check})"));
            } else {
                self.insert(&check);
            }
            return self.skip_to(tree.end(node));
        }

        self.dispatch_all(tree.children(node))
    }

    /// Without a plugin taking them, XML literals become string literals.
    pub(super) fn emit_xml_literal(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        self.catchup(tree.start(node))?;
        let text = self.required_text(node)?;
        let quoted = serde_json::to_string(text)
            .map_err(|err| self.malformed(node, format!("cannot quote XML literal: {err}")))?;
        self.insert(&quoted);
        self.skip_to(tree.end(node))
    }

    pub(super) fn emit_literal(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        self.catchup(tree.start(node))?;
        match tree.text(node) {
            Some(text) => {
                self.insert(text);
                self.skip_to(tree.end(node))
            }
            None => self.catchup(tree.end(node)),
        }
    }

    /// Array literals are rebuilt from their elements, dropping the padding
    /// and trailing commas inside the brackets.
    pub(super) fn emit_array(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        self.catchup(tree.start(node))?;
        self.insert("[");
        let children = tree.children(node);
        if let (Some(&first), Some(&last)) = (children.first(), children.last()) {
            self.skip_to(tree.start(first))?;
            self.dispatch_all(children)?;
            self.catchup(tree.end(last))?;
        }
        self.insert("]");
        self.skip_to(tree.end(node))
    }

    /// `a ||= b` becomes `a = a || b`, likewise `&&=`.
    pub(super) fn emit_assignment(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        let op = self.required_kind(node, NodeKind::Op)?;
        let operator = tree.text_or_empty(op);
        let logical = match operator {
            DOUBLE_AND_EQUAL => " && ",
            DOUBLE_OR_EQUAL => " || ",
            _ => return self.emit_children(node),
        };
        let &[lhs, _, rhs] = tree.children(node) else {
            return Err(self.unsupported(node, format!("chained `{operator}` assignment")));
        };

        self.catchup(tree.start(node))?;
        self.dispatch(lhs)?;
        self.catchup(tree.start(op))?;
        self.insert("=");
        self.skip_to(tree.end(op))?;
        self.catchup(tree.start(rhs))?;

        let (target, _) = self.render_detached(tree.start(lhs), |e| {
            e.dispatch(lhs)?;
            e.catchup(tree.end(lhs))
        })?;
        self.insert(&target);
        self.insert(logical);
        self.dispatch(rhs)
    }
}
