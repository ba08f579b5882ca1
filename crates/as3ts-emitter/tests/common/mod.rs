//! Tree-building shorthand shared by the end-to-end tests.
#![allow(dead_code)]

use as3ts_ast::{NodeIndex, NodeKind, SyntaxTree, TreeBuilder};
use as3ts_emitter::plugins::E4xPlugin;
use as3ts_emitter::{EmitError, EmitterOptions, emit};

pub fn ident(b: &mut TreeBuilder<'_>, name: &str, occurrence: usize) -> NodeIndex {
    b.token(NodeKind::Identifier, name, occurrence).unwrap()
}

pub fn literal(b: &mut TreeBuilder<'_>, text: &str, occurrence: usize) -> NodeIndex {
    b.token(NodeKind::Literal, text, occurrence).unwrap()
}

pub fn op(b: &mut TreeBuilder<'_>, text: &str, occurrence: usize) -> NodeIndex {
    b.token(NodeKind::Op, text, occurrence).unwrap()
}

/// A textless node spanning the `occurrence`th match of `needle`.
pub fn span(b: &mut TreeBuilder<'_>, kind: NodeKind, needle: &str, occurrence: usize) -> NodeIndex {
    let (start, end) = b.find(needle, occurrence).unwrap();
    b.leaf(kind, start, end, None)
}

/// A node covering `needle` with the given children.
pub fn branch(
    b: &mut TreeBuilder<'_>,
    kind: NodeKind,
    needle: &str,
    occurrence: usize,
    children: &[NodeIndex],
) -> NodeIndex {
    let (start, end) = b.find(needle, occurrence).unwrap();
    b.branch(kind, start, end, children)
}

/// `base.name`, with the name as a literal.
pub fn dot(b: &mut TreeBuilder<'_>, base: NodeIndex, name: &str, occurrence: usize) -> NodeIndex {
    let name = literal(b, name, occurrence);
    b.wrap(NodeKind::Dot, &[base, name])
}

/// `callee()` with an empty argument list at the `occurrence`th `()`.
pub fn call0(b: &mut TreeBuilder<'_>, callee: NodeIndex, occurrence: usize) -> NodeIndex {
    let args = span(b, NodeKind::Arguments, "()", occurrence);
    b.wrap(NodeKind::Call, &[callee, args])
}

/// `var name:Type`, optionally followed by ` = init`.
pub fn typed_var(
    b: &mut TreeBuilder<'_>,
    name: &str,
    ty: &str,
    occurrence: usize,
    init: Option<NodeIndex>,
) -> NodeIndex {
    let (start, end) = b.find(&format!("var {name}:{ty}"), occurrence).unwrap();
    let name_start = start + 4;
    let name_end = name_start + name.len() as u32;
    let name_node = b.leaf(NodeKind::Name, name_start, name_end, Some(name));
    let ty_node = b.leaf(NodeKind::Type, name_end + 1, end, Some(ty));
    let mut children = vec![name_node, ty_node];
    let mut nti_end = end;
    if let Some(init) = init {
        let init = b.wrap(NodeKind::Init, &[init]);
        children.push(init);
        nti_end = b.range(init).1;
    }
    let nti = b.branch(NodeKind::NameTypeInit, name_start, nti_end, &children);
    b.branch(NodeKind::VarList, start, nti_end, &[nti])
}

/// The compilation unit covering the whole source.
pub fn unit(b: &mut TreeBuilder<'_>, children: &[NodeIndex]) -> NodeIndex {
    let len = b.source().len() as u32;
    b.branch(NodeKind::CompilationUnit, 0, len, children)
}

pub fn finish(b: TreeBuilder<'_>, children: &[NodeIndex]) -> SyntaxTree {
    let mut b = b;
    let root = unit(&mut b, children);
    b.finish(root).unwrap()
}

pub fn e4x() -> EmitterOptions {
    EmitterOptions::default().with_plugin(Box::new(E4xPlugin::default()))
}

pub fn try_run(tree: &SyntaxTree, source: &str, options: &EmitterOptions) -> Result<String, EmitError> {
    emit(tree, source, options)
}

pub fn run(tree: &SyntaxTree, source: &str, options: &EmitterOptions) -> String {
    emit(tree, source, options).unwrap()
}

pub const XML_IMPORT: &str = "import { XML } from \"e4x_shim\";\n";
