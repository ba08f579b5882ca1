use super::is_xml;
use crate::emitter::Emitter;
use crate::error::EmitError;
use crate::keywords::PLUS;
use as3ts_ast::NodeIndex;
use tracing::trace;

/// `x + y` on two XML values becomes `x.plus(y)`.
pub(super) fn emit_concat(emitter: &mut Emitter<'_>, node: NodeIndex) -> Result<bool, EmitError> {
    let tree = emitter.tree();
    let children = tree.children(node);
    let (Some(&lhs), Some(&op), Some(&rhs)) = (children.first(), children.get(1), children.get(2)) else {
        return Ok(false);
    };
    if tree.text(op) != Some(PLUS) || !is_xml(emitter, lhs) || !is_xml(emitter, rhs) {
        return Ok(false);
    }
    if children.len() > 3 {
        return Err(emitter.unsupported(node, "chained `+` on XML values"));
    }

    trace!("rewriting XML concatenation");
    emitter.catchup(tree.start(node))?;
    emitter.dispatch(lhs)?;
    emitter.catchup(tree.end(lhs))?;
    emitter.insert(".plus(");
    emitter.skip_to(tree.start(rhs))?;
    emitter.dispatch(rhs)?;
    emitter.catchup(tree.end(node))?;
    emitter.insert(")");
    Ok(true)
}
