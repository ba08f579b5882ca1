//! Assignments with an XML left-hand side.

use super::accessors::access_parts;
use super::{convert, is_xml};
use crate::emitter::Emitter;
use crate::error::EmitError;
use crate::keywords::{DOUBLE_AND_EQUAL, DOUBLE_OR_EQUAL, EQUAL, PLUS_EQUAL};
use as3ts_ast::{NodeIndex, NodeKind};
use tracing::trace;

/// How a compound assignment combines the current child with the value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combine {
    Plus,
    And,
    Or,
}

impl Combine {
    fn of(operator: &str) -> Option<Combine> {
        match operator {
            PLUS_EQUAL => Some(Combine::Plus),
            DOUBLE_AND_EQUAL => Some(Combine::And),
            DOUBLE_OR_EQUAL => Some(Combine::Or),
            _ => None,
        }
    }

    fn open(self) -> &'static str {
        match self {
            Combine::Plus => ".plus(",
            Combine::And => " && ",
            Combine::Or => " || ",
        }
    }

    fn close(self) -> &'static str {
        match self {
            Combine::Plus => ")",
            Combine::And | Combine::Or => "",
        }
    }
}

/// `x.a = v` becomes `x.$put('a', v)` and `x.a += v` becomes
/// `x.$put('a', x.$get('a').plus(v))`; `&&=` and `||=` combine the same way
/// with `&&` and `||`. An XML variable appended to with
/// `+=` becomes `x = x.plus(v)`. Plain assignments that need an implicit
/// conversion get it made explicit.
pub(super) fn emit_assignment(emitter: &mut Emitter<'_>, shim: &str, node: NodeIndex) -> Result<bool, EmitError> {
    let tree = emitter.tree();
    let (Some(lhs), Some(op)) = (tree.child(node, 0), tree.find_child(node, NodeKind::Op)) else {
        return Ok(false);
    };
    let operator = tree.text_or_empty(op);

    if let Some(access) = access_parts(tree, lhs)
        && is_xml(emitter, access.base)
    {
        let &[_, _, rhs] = tree.children(node) else {
            return Err(emitter.unsupported(node, "chained assignment to an XML accessor"));
        };
        if operator == EQUAL {
            emit_put(emitter, node, lhs, rhs, None)?;
            return Ok(true);
        }
        let Some(combine) = Combine::of(operator) else {
            return Err(emitter.unsupported(node, format!("`{operator}` on an XML accessor")));
        };
        let (current, _) = emitter.render_detached(tree.start(lhs), |e| {
            e.with_context(|ctx| ctx.fresh_chain(), |e| e.dispatch(lhs))?;
            e.catchup(tree.end(lhs))
        })?;
        emit_put(emitter, node, lhs, rhs, Some((&current, combine)))?;
        return Ok(true);
    }

    let &[_, _, rhs] = tree.children(node) else {
        return Ok(false);
    };
    if operator == PLUS_EQUAL && tree.kind(lhs) == NodeKind::Identifier && is_xml(emitter, lhs) {
        emit_append(emitter, lhs, op, rhs)?;
        return Ok(true);
    }
    if operator == EQUAL {
        return convert::emit_converted_assignment(emitter, shim, lhs, rhs);
    }
    Ok(false)
}

/// With `current`, the rendered getter of the target, the old value is
/// combined with the new one instead of replaced.
fn emit_put(
    emitter: &mut Emitter<'_>,
    node: NodeIndex,
    lhs: NodeIndex,
    rhs: NodeIndex,
    current: Option<(&str, Combine)>,
) -> Result<(), EmitError> {
    let tree = emitter.tree();
    trace!(compound = current.is_some(), "rewriting XML assignment");
    emitter.catchup(tree.start(node))?;
    emitter.with_context(
        |ctx| {
            ctx.fresh_chain();
            ctx.in_assignment = true;
        },
        |e| e.dispatch(lhs),
    )?;
    emitter.skip_to(tree.start(rhs))?;
    emitter.insert(", ");
    if let Some((current, combine)) = current {
        emitter.insert(current);
        emitter.insert(combine.open());
    }
    emitter.with_context(|ctx| ctx.fresh_chain(), |e| e.dispatch(rhs))?;
    emitter.catchup(tree.end(rhs))?;
    if let Some((_, combine)) = current {
        emitter.insert(combine.close());
    }
    emitter.insert(")");
    Ok(())
}

/// `x += v` becomes `x = x.plus(v)`.
fn emit_append(emitter: &mut Emitter<'_>, lhs: NodeIndex, op: NodeIndex, rhs: NodeIndex) -> Result<(), EmitError> {
    let tree = emitter.tree();
    trace!("rewriting XML append");
    emitter.catchup(tree.start(lhs))?;
    emitter.dispatch(lhs)?;
    emitter.catchup(tree.start(op))?;
    emitter.insert(EQUAL);
    emitter.skip_to(tree.end(op))?;
    emitter.catchup(tree.start(rhs))?;

    let (target, _) = emitter.render_detached(tree.start(lhs), |e| {
        e.dispatch(lhs)?;
        e.catchup(tree.end(lhs))
    })?;
    emitter.insert(&target);
    emitter.insert(".plus(");
    emitter.dispatch(rhs)?;
    emitter.catchup(tree.end(rhs))?;
    emitter.insert(")");
    Ok(())
}
