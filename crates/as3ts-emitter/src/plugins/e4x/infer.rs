//! Syntactic type inference for E4X rewrites.
//!
//! Inference only looks at declarations in scope and the shape of the
//! expression. `None` means unknown, and no rewrite may fire on an unknown
//! operand.

use crate::emitter::Emitter;
use crate::keywords;
use as3ts_ast::{NodeIndex, NodeKind};

/// Inferred type of an expression.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprType {
    Xml,
    XmlList,
    String,
    Number,
    Boolean,
    RegExp,
    /// Any other declared type, by name.
    Named(String),
}

impl ExprType {
    /// Classify a declared type name, in source or target spelling.
    pub fn from_declared(name: &str) -> ExprType {
        match name {
            "XML" => ExprType::Xml,
            "XMLList" => ExprType::XmlList,
            "String" | "string" => ExprType::String,
            "Number" | "number" | "int" | "uint" => ExprType::Number,
            "Boolean" | "boolean" => ExprType::Boolean,
            "RegExp" => ExprType::RegExp,
            other => ExprType::Named(other.to_string()),
        }
    }

    pub fn is_xml(&self) -> bool {
        matches!(self, ExprType::Xml | ExprType::XmlList)
    }
}

/// What an XML method returns.
enum MethodReturn {
    Fixed(ExprType),
    /// Same type as the receiver.
    Receiver,
}

/// Methods of `XML` and `XMLList` and their return types.
const XML_METHODS: &[&str] = &[
    "addNamespace",
    "appendChild",
    "attribute",
    "attributes",
    "child",
    "childIndex",
    "children",
    "comments",
    "contains",
    "copy",
    "defaultSettings",
    "descendants",
    "elements",
    "hasComplexContent",
    "hasOwnProperty",
    "hasSimpleContent",
    "inScopeNamespaces",
    "insertChildAfter",
    "insertChildBefore",
    "length",
    "localName",
    "name",
    "namespace",
    "namespaceDeclarations",
    "nodeKind",
    "normalize",
    "parent",
    "prependChild",
    "processingInstructions",
    "propertyIsEnumerable",
    "removeNamespace",
    "replace",
    "setChildren",
    "setLocalName",
    "setName",
    "setNamespace",
    "setSettings",
    "settings",
    "text",
    "toJSON",
    "toString",
    "toXMLString",
    "valueOf",
];

pub fn is_xml_method(name: &str) -> bool {
    XML_METHODS.contains(&name)
}

fn method_return(name: &str) -> Option<MethodReturn> {
    let fixed = match name {
        "attribute" | "attributes" | "child" | "children" | "comments" | "descendants"
        | "elements" | "processingInstructions" | "text" => ExprType::XmlList,
        "parent" | "appendChild" | "prependChild" | "insertChildAfter" | "insertChildBefore"
        | "replace" | "setChildren" => ExprType::Xml,
        "copy" | "normalize" | "valueOf" => return Some(MethodReturn::Receiver),
        "localName" | "nodeKind" | "toString" | "toXMLString" | "toJSON" => ExprType::String,
        "childIndex" | "length" => ExprType::Number,
        "contains" | "hasComplexContent" | "hasOwnProperty" | "hasSimpleContent"
        | "propertyIsEnumerable" => ExprType::Boolean,
        _ => return None,
    };
    Some(MethodReturn::Fixed(fixed))
}

fn literal_type(text: &str) -> Option<ExprType> {
    let first = text.chars().next()?;
    match first {
        '"' | '\'' => Some(ExprType::String),
        '/' => Some(ExprType::RegExp),
        '0'..='9' | '.' | '-' => Some(ExprType::Number),
        _ if text == "true" || text == "false" => Some(ExprType::Boolean),
        _ => None,
    }
}

/// An unresolved, lowercase, non-keyword name inside a filter predicate,
/// which refers to a child of the element being tested. Runtime globals
/// and remapped identifiers keep their meaning.
pub(crate) fn is_filter_name(emitter: &Emitter<'_>, name: &str) -> bool {
    let bare = name.strip_prefix('@').unwrap_or(name);
    emitter.ctx.in_e4x_filter
        && !keywords::is_keyword(bare)
        && bare.starts_with(|c: char| c.is_lowercase() || c == '_')
        && emitter.find_def(bare).is_none()
        && !emitter.options().remap.is_global(bare)
        && emitter.identifier_remap(bare).is_none()
}

/// Best-effort type of the expression at `node`.
pub fn infer_type(emitter: &Emitter<'_>, node: NodeIndex) -> Option<ExprType> {
    let tree = emitter.tree();
    match tree.kind(node) {
        NodeKind::Identifier => {
            let name = tree.text(node)?;
            if let Some(declaration) = emitter.find_def(name) {
                return declaration.ty.as_deref().map(ExprType::from_declared);
            }
            is_filter_name(emitter, name).then_some(ExprType::XmlList)
        }
        NodeKind::Dot => {
            let base = tree.child(node, 0)?;
            let name = tree.child(node, 1).and_then(|name| tree.text(name))?;
            if tree.kind(base) == NodeKind::Identifier && tree.text(base) == Some("this") {
                let declaration = emitter.find_member(name)?;
                return declaration.ty.as_deref().map(ExprType::from_declared);
            }
            infer_type(emitter, base)
                .filter(ExprType::is_xml)
                .map(|_| ExprType::XmlList)
        }
        NodeKind::ArrayAccessor => {
            let base = tree.child(node, 0)?;
            infer_type(emitter, base)
                .filter(ExprType::is_xml)
                .map(|_| ExprType::XmlList)
        }
        NodeKind::E4xAttr | NodeKind::E4xAttrArrayAccess | NodeKind::E4xStar | NodeKind::E4xFilter => {
            Some(ExprType::XmlList)
        }
        NodeKind::Call => infer_call(emitter, node),
        NodeKind::New => {
            let target = tree.child(node, 0)?;
            let constructor = match tree.kind(target) {
                NodeKind::Call => tree.child(target, 0)?,
                _ => target,
            };
            match tree.text(constructor)? {
                "XML" => Some(ExprType::Xml),
                "XMLList" => Some(ExprType::XmlList),
                other => Some(ExprType::from_declared(other)),
            }
        }
        NodeKind::XmlLiteral => Some(ExprType::Xml),
        NodeKind::Literal => literal_type(tree.text(node)?),
        NodeKind::Relation => {
            tree.find_child(node, NodeKind::As)?;
            let target = tree.last_child(node)?;
            tree.text(target).map(ExprType::from_declared)
        }
        NodeKind::Add => {
            let &[lhs, _, rhs] = tree.children(node) else {
                return None;
            };
            let both_xml = infer_type(emitter, lhs).is_some_and(|ty| ty.is_xml())
                && infer_type(emitter, rhs).is_some_and(|ty| ty.is_xml());
            both_xml.then_some(ExprType::XmlList)
        }
        NodeKind::Encapsulated | NodeKind::Value => {
            let &[inner] = tree.children(node) else {
                return None;
            };
            infer_type(emitter, inner)
        }
        _ => None,
    }
}

fn infer_call(emitter: &Emitter<'_>, node: NodeIndex) -> Option<ExprType> {
    let tree = emitter.tree();
    let callee = tree.child(node, 0)?;
    match tree.kind(callee) {
        // Conversion functions.
        NodeKind::Identifier => match tree.text(callee)? {
            "XML" => Some(ExprType::Xml),
            "XMLList" => Some(ExprType::XmlList),
            "String" => Some(ExprType::String),
            "Number" | "int" | "uint" => Some(ExprType::Number),
            "Boolean" => Some(ExprType::Boolean),
            _ => None,
        },
        NodeKind::Dot => {
            let receiver = infer_type(emitter, tree.child(callee, 0)?).filter(ExprType::is_xml)?;
            let method = tree.child(callee, 1).and_then(|name| tree.text(name))?;
            match method_return(method)? {
                MethodReturn::Fixed(ty) => Some(ty),
                MethodReturn::Receiver => Some(receiver),
            }
        }
        _ => None,
    }
}

#[cfg(test)]
#[path = "../../../tests/infer.rs"]
mod tests;
