//! Routes `super` property access through accessor methods, for targets
//! where a subclass cannot reach a parent's property through `super`.
//!
//! `super.value = v` becomes `super.setValue(v)` and a read of `super.value`
//! becomes `super.getValue()`. Method calls such as `super.update()` are left
//! alone.

use crate::emitter::Emitter;
use crate::error::EmitError;
use crate::keywords::{EQUAL, SUPER};
use crate::plugin::Plugin;
use as3ts_ast::{NodeIndex, NodeKind, SyntaxTree};
use tracing::trace;

#[derive(Clone, Copy, Debug, Default)]
pub struct SuperPropertiesPlugin;

impl SuperPropertiesPlugin {
    pub const NAME: &'static str = "super-properties";
}

/// `value` to `Value`.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The property name of `super.<name>`.
fn super_property(tree: &SyntaxTree, node: NodeIndex) -> Option<&str> {
    if tree.kind(node) != NodeKind::Dot {
        return None;
    }
    let base = tree.child(node, 0)?;
    if tree.kind(base) != NodeKind::Identifier || tree.text(base) != Some(SUPER) {
        return None;
    }
    tree.child(node, 1).and_then(|name| tree.text(name))
}

impl Plugin for SuperPropertiesPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn visit(&self, emitter: &mut Emitter<'_>, node: NodeIndex) -> Result<bool, EmitError> {
        let tree = emitter.tree();
        match tree.kind(node) {
            NodeKind::Assign => {
                let Some(lhs) = tree.child(node, 0) else {
                    return Ok(false);
                };
                let Some(property) = super_property(tree, lhs) else {
                    return Ok(false);
                };
                let &[_, op, rhs] = tree.children(node) else {
                    return Err(emitter.unsupported(node, "chained assignment to a super property"));
                };
                let operator = tree.text_or_empty(op);
                if operator != EQUAL {
                    return Err(emitter.unsupported(
                        node,
                        format!("`{operator}` on super property `{property}`"),
                    ));
                }

                trace!(property, "super property write");
                emitter.catchup(tree.start(node))?;
                emitter.insert(&format!("{SUPER}.set{}(", capitalize(property)));
                emitter.skip_to(tree.start(rhs))?;
                emitter.dispatch(rhs)?;
                emitter.catchup(tree.end(rhs))?;
                emitter.insert(")");
                Ok(true)
            }
            NodeKind::Dot => {
                let Some(property) = super_property(tree, node) else {
                    return Ok(false);
                };
                let is_callee = tree.parent_kind(node) == Some(NodeKind::Call)
                    && tree.parent(node).and_then(|call| tree.child(call, 0)) == Some(node);
                if is_callee {
                    return Ok(false);
                }

                trace!(property, "super property read");
                emitter.catchup(tree.start(node))?;
                emitter.insert(&format!("{SUPER}.get{}()", capitalize(property)));
                emitter.skip_to(tree.end(node))?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
