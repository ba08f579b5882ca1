//! Conversions ActionScript performs implicitly, made explicit.

use super::infer::{ExprType, infer_type};
use crate::emitter::Emitter;
use crate::error::EmitError;
use as3ts_ast::{NodeIndex, NodeKind};
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Conversion {
    ToString,
    ToNumber,
    ToXml,
}

impl Conversion {
    /// The conversion an XML value needs to fit `target`, if any.
    fn between(target: &ExprType, value: &ExprType) -> Option<Conversion> {
        match (target, value) {
            (ExprType::String, ExprType::Xml | ExprType::XmlList) => Some(Conversion::ToString),
            (ExprType::Number, ExprType::Xml | ExprType::XmlList) => Some(Conversion::ToNumber),
            (ExprType::Xml, ExprType::XmlList) => Some(Conversion::ToXml),
            _ => None,
        }
    }

    fn callee(self) -> &'static str {
        match self {
            Conversion::ToString => "String",
            Conversion::ToNumber => "Number",
            Conversion::ToXml => "XML.convertToXml",
        }
    }
}

fn needed_conversion(emitter: &Emitter<'_>, target: Option<String>, value: NodeIndex) -> Option<Conversion> {
    let target = ExprType::from_declared(&target?);
    Conversion::between(&target, &infer_type(emitter, value)?)
}

fn emit_wrapped(
    emitter: &mut Emitter<'_>,
    shim: &str,
    value: NodeIndex,
    conversion: Conversion,
) -> Result<(), EmitError> {
    let tree = emitter.tree();
    trace!(?conversion, "making XML conversion explicit");
    emitter.catchup(tree.start(value))?;
    if conversion == Conversion::ToXml {
        emitter.ensure_import("XML", Some(shim), false)?;
    }
    emitter.insert(conversion.callee());
    emitter.insert("(");
    emitter.dispatch(value)?;
    emitter.catchup(tree.end(value))?;
    emitter.insert(")");
    Ok(())
}

/// `XML(s)` and `XMLList(s)` outside `new` become the shim's static
/// conversion functions.
pub(super) fn emit_conversion_call(emitter: &mut Emitter<'_>, shim: &str, node: NodeIndex) -> Result<bool, EmitError> {
    let tree = emitter.tree();
    let Some(callee) = tree.child(node, 0) else {
        return Ok(false);
    };
    if tree.kind(callee) != NodeKind::Identifier || tree.parent_kind(node) == Some(NodeKind::New) {
        return Ok(false);
    }
    let (name, function) = match tree.text(callee) {
        Some(name @ "XML") => (name, "convertToXml"),
        Some(name @ "XMLList") => (name, "convertToXmlList"),
        _ => return Ok(false),
    };

    emitter.ensure_import(name, Some(shim), false)?;
    emitter.catchup(tree.start(node))?;
    emitter.insert(&format!("{name}.{function}"));
    emitter.skip_to(tree.end(callee))?;
    emitter.dispatch_all(&tree.children(node)[1..])?;
    Ok(true)
}

/// `var s:String = xml.name;` converts the initializer.
pub(super) fn emit_converted_init(emitter: &mut Emitter<'_>, shim: &str, node: NodeIndex) -> Result<bool, EmitError> {
    let tree = emitter.tree();
    let (Some(declarator), &[value]) = (tree.parent(node), tree.children(node)) else {
        return Ok(false);
    };
    let Some(conversion) = needed_conversion(emitter, emitter.declaration_type(declarator), value) else {
        return Ok(false);
    };
    emitter.catchup(tree.start(node))?;
    emit_wrapped(emitter, shim, value, conversion)?;
    emitter.catchup(tree.end(node))?;
    Ok(true)
}

/// `return xml.name;` in a function declared to return `String` converts
/// the returned value.
pub(super) fn emit_converted_return(emitter: &mut Emitter<'_>, shim: &str, node: NodeIndex) -> Result<bool, EmitError> {
    let tree = emitter.tree();
    let &[value] = tree.children(node) else {
        return Ok(false);
    };
    let function = tree.ancestors(node).find(|&ancestor| {
        matches!(
            tree.kind(ancestor),
            NodeKind::Function | NodeKind::Lambda | NodeKind::Get
        )
    });
    let Some(function) = function else {
        return Ok(false);
    };
    let Some(conversion) = needed_conversion(emitter, emitter.declaration_type(function), value) else {
        return Ok(false);
    };
    emitter.catchup(tree.start(node))?;
    emit_wrapped(emitter, shim, value, conversion)?;
    emitter.catchup(tree.end(node))?;
    Ok(true)
}

/// `s = xml.name` where `s` is declared `String` converts the right-hand
/// side.
pub(super) fn emit_converted_assignment(
    emitter: &mut Emitter<'_>,
    shim: &str,
    lhs: NodeIndex,
    rhs: NodeIndex,
) -> Result<bool, EmitError> {
    let tree = emitter.tree();
    let target = infer_type(emitter, lhs);
    let Some(conversion) = target.and_then(|target| {
        infer_type(emitter, rhs).and_then(|value| Conversion::between(&target, &value))
    }) else {
        return Ok(false);
    };
    emitter.catchup(tree.start(lhs))?;
    emitter.dispatch(lhs)?;
    emitter.catchup(tree.start(rhs))?;
    emit_wrapped(emitter, shim, rhs, conversion)?;
    Ok(true)
}
