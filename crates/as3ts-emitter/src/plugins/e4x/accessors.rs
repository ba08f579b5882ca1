//! Member access and `delete` on XML values.

use super::{infer::is_xml_method, is_callee, is_xml};
use crate::emitter::Emitter;
use crate::error::EmitError;
use as3ts_ast::{NodeIndex, NodeKind, SyntaxTree};
use tracing::trace;

/// What the outermost access of a chain does with the child it names.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Get,
    /// Left-hand side of an assignment; the caller appends the value and
    /// closes the call.
    Put,
    Delete,
}

impl Mode {
    fn method(self, attribute: bool) -> &'static str {
        match (self, attribute) {
            (Mode::Get, false) => "$get",
            (Mode::Get, true) => "$getAttribute",
            (Mode::Put, false) => "$put",
            (Mode::Put, true) => "$putAttribute",
            (Mode::Delete, false) => "$delete",
            (Mode::Delete, true) => "$deleteAttribute",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(super) enum Key<'a> {
    /// Written as a name in the source; emitted quoted.
    Name(&'a str),
    /// An expression re-emitted as is.
    Computed(NodeIndex),
}

#[derive(Clone, Copy, Debug)]
pub(super) struct Access<'a> {
    pub base: NodeIndex,
    pub key: Key<'a>,
    pub attribute: bool,
}

/// Decompose `a.b`, `a[b]`, `a.@b`, `a.@[b]` and `a.*`.
pub(super) fn access_parts(tree: &SyntaxTree, node: NodeIndex) -> Option<Access<'_>> {
    let base = tree.child(node, 0)?;
    let (key, attribute) = match tree.kind(node) {
        NodeKind::Dot => {
            let name = tree.text(tree.child(node, 1)?)?;
            match name.strip_prefix('@') {
                Some(attribute) => (Key::Name(attribute), true),
                None => (Key::Name(name), false),
            }
        }
        NodeKind::E4xAttr => {
            let name = tree.text(tree.child(node, 1)?)?;
            (Key::Name(name.strip_prefix('@').unwrap_or(name)), true)
        }
        NodeKind::ArrayAccessor => (Key::Computed(tree.child(node, 1)?), false),
        NodeKind::E4xAttrArrayAccess => (Key::Computed(tree.child(node, 1)?), true),
        NodeKind::E4xStar => (Key::Name("*"), false),
        _ => return None,
    };
    Some(Access {
        base,
        key,
        attribute,
    })
}

/// The base of an access is always read, whatever the outer access does.
fn emit_base(emitter: &mut Emitter<'_>, base: NodeIndex) -> Result<(), EmitError> {
    let end = emitter.tree().end(base);
    emitter.with_context(|ctx| ctx.dot_chain_depth += 1, |e| e.dispatch(base))?;
    emitter.catchup(end)
}

pub(super) fn emit_accessor(emitter: &mut Emitter<'_>, node: NodeIndex) -> Result<bool, EmitError> {
    let tree = emitter.tree();
    let Some(access) = access_parts(tree, node) else {
        return Ok(false);
    };
    if !is_xml(emitter, access.base) {
        return Ok(false);
    }

    // `x.children()` calls the method; only the receiver is rewritten.
    if tree.kind(node) == NodeKind::Dot
        && let Key::Name(name) = access.key
        && is_xml_method(name)
        && is_callee(tree, node)
    {
        emitter.catchup(tree.start(node))?;
        emit_base(emitter, access.base)?;
        emitter.catchup(tree.end(node))?;
        return Ok(true);
    }

    let ctx = emitter.ctx;
    let mode = match ctx.dot_chain_depth {
        0 if ctx.in_assignment => Mode::Put,
        0 if ctx.in_delete => Mode::Delete,
        _ => Mode::Get,
    };
    trace!(kind = %tree.kind(node), ?mode, "rewriting XML access");

    emitter.catchup(tree.start(node))?;
    emit_base(emitter, access.base)?;
    emitter.insert(&format!(".{}(", mode.method(access.attribute)));
    match access.key {
        Key::Name(name) => emitter.insert(&format!("'{name}'")),
        Key::Computed(key) => {
            emitter.skip_to(tree.start(key))?;
            emitter.with_context(|ctx| ctx.fresh_chain(), |e| e.dispatch(key))?;
            emitter.catchup(tree.end(key))?;
        }
    }
    if mode != Mode::Put {
        emitter.insert(")");
    }
    emitter.skip_to(tree.end(node))?;
    Ok(true)
}

/// `delete x.a` becomes `x.$delete('a')`.
pub(super) fn emit_delete(emitter: &mut Emitter<'_>, node: NodeIndex) -> Result<bool, EmitError> {
    let tree = emitter.tree();
    let Some(target) = tree.child(node, 0) else {
        return Ok(false);
    };
    let Some(access) = access_parts(tree, target) else {
        return Ok(false);
    };
    if !is_xml(emitter, access.base) {
        return Ok(false);
    }

    emitter.catchup(tree.start(node))?;
    emitter.skip_to(tree.start(target))?;
    emitter.with_context(
        |ctx| {
            ctx.fresh_chain();
            ctx.in_delete = true;
        },
        |e| e.dispatch(target),
    )?;
    emitter.catchup(tree.end(node))?;
    Ok(true)
}
