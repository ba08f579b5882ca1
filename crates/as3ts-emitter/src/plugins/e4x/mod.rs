//! E4X emulation.
//!
//! ActionScript lets `XML` and `XMLList` values be used with member syntax:
//! `x.child`, `x.@attr`, `x[key]`, `delete x.child`, `x.(predicate)` and
//! `x + y`. TypeScript has none of that, so wherever inference shows an XML
//! operand the construct is rewritten into method calls on a runtime shim:
//!
//! | ActionScript        | TypeScript                         |
//! |---------------------|------------------------------------|
//! | `x.a`               | `x.$get('a')`                      |
//! | `x.@a`              | `x.$getAttribute('a')`             |
//! | `x[k]`              | `x.$get(k)`                        |
//! | `x.a = v`           | `x.$put('a', v)`                   |
//! | `delete x.a`        | `x.$delete('a')`                   |
//! | `x.(a > 1)`         | `x.filter((n$) => n$.$get('a') > 1)` |
//! | `x + y`             | `x.plus(y)`                        |
//! | `<a>{v}</a>`        | ``new XML(`<a>${v}</a>`)``         |
//! | `XML(s)`            | `XML.convertToXml(s)`              |
//!
//! Operands of unknown type are never rewritten.

mod accessors;
mod assignment;
mod concat;
mod convert;
mod filter;
pub mod infer;
mod literal;

pub use infer::{ExprType, infer_type, is_xml_method};

use crate::emitter::Emitter;
use crate::error::EmitError;
use crate::plugin::Plugin;
use as3ts_ast::{NodeIndex, NodeKind, SyntaxTree};

/// Module the shim types are imported from unless configured otherwise.
pub const DEFAULT_SHIM: &str = "e4x_shim";

/// Names the shim module exports.
pub const SHIM_TYPES: &[&str] = &["XML", "XMLList", "QName", "Namespace"];

#[derive(Clone, Debug)]
pub struct E4xPlugin {
    shim: String,
}

impl E4xPlugin {
    pub const NAME: &'static str = "e4x";

    pub fn new() -> E4xPlugin {
        E4xPlugin::default()
    }

    /// Import the shim types from `module` instead of [`DEFAULT_SHIM`].
    pub fn with_shim(module: impl Into<String>) -> E4xPlugin {
        E4xPlugin {
            shim: module.into(),
        }
    }

    pub fn shim(&self) -> &str {
        &self.shim
    }
}

impl Default for E4xPlugin {
    fn default() -> Self {
        E4xPlugin::with_shim(DEFAULT_SHIM)
    }
}

/// Whether `node` is the function being called by its parent.
fn is_callee(tree: &SyntaxTree, node: NodeIndex) -> bool {
    tree.parent(node).is_some_and(|parent| {
        tree.kind(parent) == NodeKind::Call && tree.child(parent, 0) == Some(node)
    })
}

fn is_xml(emitter: &Emitter<'_>, node: NodeIndex) -> bool {
    infer_type(emitter, node).is_some_and(|ty| ty.is_xml())
}

impl Plugin for E4xPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn visit(&self, emitter: &mut Emitter<'_>, node: NodeIndex) -> Result<bool, EmitError> {
        let tree = emitter.tree();
        let kind = tree.kind(node);

        if matches!(kind, NodeKind::Type | NodeKind::Identifier)
            && let Some(name) = tree.text(node)
            && SHIM_TYPES.contains(&name)
        {
            emitter.ensure_import(name, Some(self.shim.as_str()), false)?;
        }

        match kind {
            NodeKind::Assign => assignment::emit_assignment(emitter, &self.shim, node),
            NodeKind::Add => concat::emit_concat(emitter, node),
            NodeKind::Delete => accessors::emit_delete(emitter, node),
            NodeKind::Dot
            | NodeKind::ArrayAccessor
            | NodeKind::E4xAttr
            | NodeKind::E4xAttrArrayAccess
            | NodeKind::E4xStar => accessors::emit_accessor(emitter, node),
            NodeKind::E4xFilter => filter::emit_filter(emitter, node),
            NodeKind::Identifier => filter::emit_filter_identifier(emitter, node),
            NodeKind::Call => convert::emit_conversion_call(emitter, &self.shim, node),
            NodeKind::Init => convert::emit_converted_init(emitter, &self.shim, node),
            NodeKind::Return => convert::emit_converted_return(emitter, &self.shim, node),
            NodeKind::XmlLiteral => literal::emit_xml_literal(emitter, &self.shim, node),
            _ => Ok(false),
        }
    }
}
