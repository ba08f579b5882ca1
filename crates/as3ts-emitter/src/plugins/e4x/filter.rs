//! Filter predicates: `x.(expr)`.
//!
//! The predicate becomes an arrow function over each element, bound to `n$`.
//! Names in the predicate that resolve nowhere else are children of that
//! element.

use super::{infer::is_filter_name, is_callee, is_xml};
use crate::emitter::Emitter;
use crate::error::EmitError;
use as3ts_ast::{NodeIndex, NodeKind};
use tracing::trace;

/// Element parameter of the generated predicate.
const ELEMENT: &str = "n$";

pub(super) fn emit_filter(emitter: &mut Emitter<'_>, node: NodeIndex) -> Result<bool, EmitError> {
    let tree = emitter.tree();
    let &[base, predicate] = tree.children(node) else {
        return Err(emitter.malformed(node, "expected filtered value and predicate"));
    };
    if !is_xml(emitter, base) {
        return Ok(false);
    }

    trace!("rewriting XML filter");
    emitter.catchup(tree.start(node))?;
    emitter.with_context(|ctx| ctx.dot_chain_depth += 1, |e| e.dispatch(base))?;
    emitter.catchup(tree.end(base))?;

    let index = emitter.index();
    if emitter.source_between(index, index + 2) != ".(" {
        return Err(emitter.malformed(node, "filter does not open with `.(`"));
    }
    emitter.skip(2)?;
    emitter.insert(&format!(".filter(({ELEMENT}) =>"));
    if emitter
        .source_byte(emitter.index())
        .is_some_and(|byte| !byte.is_ascii_whitespace())
    {
        emitter.insert(" ");
    }

    emitter.with_context(
        |ctx| {
            ctx.fresh_chain();
            ctx.in_e4x_filter = true;
        },
        |e| e.dispatch(predicate),
    )?;
    emitter.catchup(tree.end(node))?;
    Ok(true)
}

/// Inside a predicate, `price` becomes `n$.$get('price')`, `@id` becomes
/// `n$.$getAttribute('id')` and a called `name()` becomes `n$.name()`.
pub(super) fn emit_filter_identifier(emitter: &mut Emitter<'_>, node: NodeIndex) -> Result<bool, EmitError> {
    let tree = emitter.tree();
    let Some(text) = tree.text(node) else {
        return Ok(false);
    };
    let is_member_name = tree
        .parent(node)
        .is_some_and(|parent| tree.kind(parent) == NodeKind::Dot && tree.child(parent, 0) != Some(node));
    if is_member_name || !is_filter_name(emitter, text) {
        return Ok(false);
    }
    if text.contains('*') {
        return Err(emitter.unsupported(node, "wildcard inside a filter predicate"));
    }

    emitter.catchup(tree.start(node))?;
    if is_callee(tree, node) {
        emitter.insert(&format!("{ELEMENT}.{text}"));
    } else {
        match text.strip_prefix('@') {
            Some(attribute) => emitter.insert(&format!("{ELEMENT}.$getAttribute('{attribute}')")),
            None => emitter.insert(&format!("{ELEMENT}.$get('{text}')")),
        }
    }
    emitter.skip_to(tree.end(node))?;
    Ok(true)
}
