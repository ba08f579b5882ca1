//! The emission engine.
//!
//! An [`Emitter`] owns the mutable state of one compilation unit: the source
//! cursor, the output buffer, the scope chain, the queued imports and the
//! traversal context. Handlers for individual node kinds live in the
//! submodules as further `impl Emitter` blocks.

pub mod cursor;
mod declarations;
mod expressions;
mod functions;
pub mod imports;
pub mod scope;
mod statements;

use crate::error::EmitError;
use crate::options::EmitterOptions;
use as3ts_ast::{NodeIndex, NodeKind, SyntaxTree};
use cursor::{Cursor, OutputBuffer};
use imports::ImportStatement;
use regex::Regex;
use scope::{Declaration, ScopeChain};
use tracing::{debug, trace};

/// Traversal-mode flags threaded through recursive emission.
///
/// Handlers that change a flag for a sub-traversal go through
/// [`Emitter::with_context`], which restores the previous value on exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraversalContext {
    /// Inside the target expression of a `new`.
    pub is_new: bool,
    /// Whether an unresolved lowercase identifier gets a `this.` qualifier.
    pub emit_this_for_next_ident: bool,
    /// Nesting depth inside an E4X accessor chain; 0 at the outermost link.
    pub dot_chain_depth: u32,
    /// The outermost accessor is the target of an XML assignment.
    pub in_assignment: bool,
    /// The outermost accessor is the target of an XML delete.
    pub in_delete: bool,
    /// Inside the predicate of an E4X filter.
    pub in_e4x_filter: bool,
}

impl Default for TraversalContext {
    fn default() -> Self {
        TraversalContext {
            is_new: false,
            emit_this_for_next_ident: true,
            dot_chain_depth: 0,
            in_assignment: false,
            in_delete: false,
            in_e4x_filter: false,
        }
    }
}

impl TraversalContext {
    /// Context for an expression that starts a new accessor chain, such as a
    /// computed key.
    pub fn fresh_chain(&mut self) {
        self.dot_chain_depth = 0;
        self.in_assignment = false;
        self.in_delete = false;
    }
}

pub struct Emitter<'a> {
    tree: &'a SyntaxTree,
    source: &'a str,
    options: &'a EmitterOptions,
    cursor: Cursor,
    out: OutputBuffer,
    scopes: ScopeChain,
    imports: Vec<ImportStatement>,
    pub ctx: TraversalContext,
}

pub(crate) fn compile_regex(pattern: String) -> Result<Regex, EmitError> {
    Regex::new(&pattern).map_err(|source| EmitError::InvalidPattern { pattern, source })
}

/// Emit one compilation unit.
///
/// Comment nodes are filtered out first; their text still reaches the output
/// through verbatim copying. Any error aborts the unit.
#[tracing::instrument(level = "debug", skip_all, fields(source_len = source.len()))]
pub fn emit(tree: &SyntaxTree, source: &str, options: &EmitterOptions) -> Result<String, EmitError> {
    let filtered = tree.without_comments()?;
    filtered.validate(source.len())?;
    let root = filtered.root()?;
    let mut emitter = Emitter::new(&filtered, source, options);
    emitter.emit_unit(root)?;
    Ok(emitter.finish())
}

impl<'a> Emitter<'a> {
    pub fn new(tree: &'a SyntaxTree, source: &'a str, options: &'a EmitterOptions) -> Emitter<'a> {
        Emitter {
            tree,
            source,
            options,
            cursor: Cursor::default(),
            out: OutputBuffer::new(),
            scopes: ScopeChain::new(),
            imports: Vec::new(),
            ctx: TraversalContext::default(),
        }
    }

    #[inline]
    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    #[inline]
    pub fn source(&self) -> &'a str {
        self.source
    }

    #[inline]
    pub fn options(&self) -> &'a EmitterOptions {
        self.options
    }

    #[inline]
    pub fn index(&self) -> u32 {
        self.cursor.index()
    }

    pub fn output(&self) -> &OutputBuffer {
        &self.out
    }

    pub fn imports(&self) -> &[ImportStatement] {
        &self.imports
    }

    /// Dispatch `root` inside a fresh root scope and copy the rest of the
    /// source.
    pub fn emit_unit(&mut self, root: NodeIndex) -> Result<(), EmitError> {
        let len = self.source.len() as u32;
        self.with_scope(Vec::new(), None, |e| {
            e.dispatch(root)?;
            e.catchup(len)
        })
    }

    /// Prepend the import header and run plugin post-processing.
    pub fn finish(self) -> String {
        let options = self.options;
        let mut imports = self.imports;
        for plugin in &options.plugins {
            plugin.respond_to_extra_imports(&mut imports);
        }
        debug!(imports = imports.len(), "emission finished");
        let mut text = imports::render_header(&imports, &options.line_separator);
        text.push_str(&self.out.finish());
        options.post_process(text)
    }

    /// The body buffer without the import header, for inspection.
    pub fn into_output(self) -> OutputBuffer {
        self.out
    }

    // =========================================================================
    // Cursor
    // =========================================================================

    /// Copy source text up to `target` verbatim. A no-op when the cursor is
    /// already at or past `target`.
    pub fn catchup(&mut self, target: u32) -> Result<(), EmitError> {
        let start = self.cursor.index();
        if target <= start {
            return Ok(());
        }
        let text = self
            .source
            .get(start as usize..target as usize)
            .ok_or_else(|| EmitError::CursorMisuse {
                index: start,
                reason: format!("no source text between {start} and {target}"),
            })?;
        self.cursor.advance_to(target, self.source.len())?;
        self.out.push_source(text, start, target);
        Ok(())
    }

    pub fn insert(&mut self, text: &str) {
        self.out.push_inserted(text);
    }

    /// Move the cursor forward without emitting.
    pub fn skip_to(&mut self, target: u32) -> Result<(), EmitError> {
        self.cursor.advance_to(target, self.source.len())
    }

    pub fn skip(&mut self, count: u32) -> Result<(), EmitError> {
        self.skip_to(self.index() + count)
    }

    /// Skip past the next occurrence of `needle`, which must end at or
    /// before `limit`.
    pub fn consume(&mut self, needle: &str, limit: u32) -> Result<(), EmitError> {
        let from = self.index() as usize;
        let end = self
            .source
            .get(from..)
            .and_then(|rest| rest.find(needle))
            .map(|pos| (from + pos + needle.len()) as u32);
        match end {
            Some(end) if end <= limit => self.skip_to(end),
            _ => Err(EmitError::CursorMisuse {
                index: from as u32,
                reason: format!("`{needle}` not found before {limit}"),
            }),
        }
    }

    /// Source text in `start..end`; empty when the range is not valid.
    pub fn source_between(&self, start: u32, end: u32) -> &'a str {
        self.source
            .get(start as usize..end as usize)
            .unwrap_or_default()
    }

    pub fn source_byte(&self, index: u32) -> Option<u8> {
        self.source.as_bytes().get(index as usize).copied()
    }

    /// Emit `node` as a block comment instead of code. With `catch_semi`, the
    /// rest of the line up to and including a `;` is pulled into the comment.
    pub fn comment_node(&mut self, node: NodeIndex, catch_semi: bool) -> Result<(), EmitError> {
        let tree = self.tree;
        let end = tree.end(node);
        self.catchup(tree.start(node))?;
        self.insert("/*");
        let text = self.source_between(self.index(), end).replace("*/", "");
        self.insert(&text);
        if end > self.index() {
            self.skip_to(end)?;
        }

        if catch_semi {
            let bytes = self.source.as_bytes();
            let mut i = self.index() as usize;
            while i < bytes.len() {
                match bytes[i] {
                    b'\n' => {
                        self.catchup(i as u32)?;
                        break;
                    }
                    b';' => {
                        self.catchup(i as u32 + 1)?;
                        break;
                    }
                    _ => i += 1,
                }
            }
        }
        self.insert("*/");
        Ok(())
    }

    /// Emit into a scratch buffer with a scratch cursor starting at `start`,
    /// returning the text and where the scratch cursor ended.
    ///
    /// Used where a construct has to be rendered before it is placed, or
    /// rendered twice. The main cursor and buffer are untouched.
    pub fn render_detached<F>(&mut self, start: u32, body: F) -> Result<(String, u32), EmitError>
    where
        F: FnOnce(&mut Self) -> Result<(), EmitError>,
    {
        let saved_cursor = std::mem::replace(&mut self.cursor, Cursor::at(start));
        let saved_out = std::mem::take(&mut self.out);
        let result = body(self);
        let end = self.cursor.index();
        let detached = std::mem::replace(&mut self.out, saved_out);
        self.cursor = saved_cursor;
        result?;
        Ok((detached.finish(), end))
    }

    // =========================================================================
    // Scope
    // =========================================================================

    pub fn with_scope<R>(
        &mut self,
        declarations: Vec<Declaration>,
        class_name: Option<String>,
        body: impl FnOnce(&mut Self) -> Result<R, EmitError>,
    ) -> Result<R, EmitError> {
        let id = self.scopes.enter(declarations, class_name);
        let result = body(self);
        self.scopes.exit(id)?;
        result
    }

    pub fn declare_in_scope(&mut self, declaration: Declaration) -> Result<(), EmitError> {
        self.scopes.declare(declaration)
    }

    pub fn find_def(&self, name: &str) -> Option<&Declaration> {
        self.scopes.find(name)
    }

    /// What `this.name` refers to.
    pub fn find_member(&self, name: &str) -> Option<&Declaration> {
        self.scopes.find_in_class(name)
    }

    pub fn current_class_name(&self) -> Option<&str> {
        self.scopes.current_class_name()
    }

    // =========================================================================
    // Traversal context
    // =========================================================================

    /// Run `body` with a modified context, restoring the previous one after.
    pub fn with_context<R>(
        &mut self,
        update: impl FnOnce(&mut TraversalContext),
        body: impl FnOnce(&mut Self) -> Result<R, EmitError>,
    ) -> Result<R, EmitError> {
        let saved = self.ctx;
        update(&mut self.ctx);
        let result = body(self);
        self.ctx = saved;
        result
    }

    // =========================================================================
    // Remapping
    // =========================================================================

    /// Plugin type maps first, then the built-in table.
    pub fn type_remap(&self, name: &str) -> Option<&'a str> {
        let options = self.options;
        options
            .plugins
            .iter()
            .find_map(|plugin| plugin.type_remap(name))
            .or_else(|| options.remap.remap_type(name))
    }

    /// Plugin identifier maps first, then the built-in table.
    pub fn identifier_remap(&self, name: &str) -> Option<&'a str> {
        let options = self.options;
        options
            .plugins
            .iter()
            .find_map(|plugin| plugin.identifier_remap(name))
            .or_else(|| options.remap.remap_identifier(name))
    }

    /// Declared type of a node with a `TYPE` child, remapped.
    pub fn declaration_type(&self, node: NodeIndex) -> Option<String> {
        let tree = self.tree;
        let ty = tree.find_child(node, NodeKind::Type)?;
        let text = tree.text(ty)?;
        Some(self.type_remap(text).unwrap_or(text).to_string())
    }

    /// Target spelling of a referenced type, queueing an import when the type
    /// is neither global nor built in.
    pub fn type_reference(&mut self, name: &str) -> Result<String, EmitError> {
        let remap = &self.options().remap;
        if !remap.is_global(name) && self.type_remap(name).is_none() && !remap.is_target_type(name) {
            self.ensure_import(name, None, true)?;
        }
        Ok(self.type_remap(name).unwrap_or(name).to_string())
    }

    // =========================================================================
    // Shape checks
    // =========================================================================

    pub fn unsupported(&self, node: NodeIndex, reason: impl Into<String>) -> EmitError {
        let n = self.tree.node(node);
        EmitError::Unsupported {
            kind: n.kind,
            start: n.start,
            end: n.end,
            reason: reason.into(),
        }
    }

    pub fn malformed(&self, node: NodeIndex, reason: impl Into<String>) -> EmitError {
        let n = self.tree.node(node);
        EmitError::MalformedTree {
            kind: n.kind,
            start: n.start,
            end: n.end,
            reason: reason.into(),
        }
    }

    pub fn required_child(&self, node: NodeIndex, n: usize) -> Result<NodeIndex, EmitError> {
        self.tree
            .child(node, n)
            .ok_or_else(|| self.malformed(node, format!("missing child {n}")))
    }

    pub fn required_kind(&self, node: NodeIndex, kind: NodeKind) -> Result<NodeIndex, EmitError> {
        self.tree
            .find_child(node, kind)
            .ok_or_else(|| self.malformed(node, format!("missing {kind} child")))
    }

    pub fn required_text(&self, node: NodeIndex) -> Result<&'a str, EmitError> {
        let tree = self.tree;
        tree.text(node)
            .ok_or_else(|| self.malformed(node, "missing text"))
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Offer `node` to each plugin in order, then fall back to the built-in
    /// handler for its kind.
    pub fn dispatch(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        if tree.get(node).is_none() {
            return Ok(());
        }
        let options = self.options;
        for plugin in &options.plugins {
            if plugin.visit(self, node)? {
                trace!(plugin = plugin.name(), kind = %tree.kind(node), "plugin handled node");
                return Ok(());
            }
        }
        self.visit_builtin(node)
    }

    pub fn dispatch_opt(&mut self, node: Option<NodeIndex>) -> Result<(), EmitError> {
        match node {
            Some(node) => self.dispatch(node),
            None => Ok(()),
        }
    }

    pub fn dispatch_all(&mut self, nodes: &[NodeIndex]) -> Result<(), EmitError> {
        for &node in nodes {
            self.dispatch(node)?;
        }
        Ok(())
    }

    /// Default for kinds without a dedicated handler.
    pub fn emit_children(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        self.catchup(tree.start(node))?;
        self.dispatch_all(tree.children(node))
    }

    fn visit_builtin(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        match tree.kind(node) {
            NodeKind::Package => self.emit_package(node),
            NodeKind::Meta => self.emit_meta(node),
            NodeKind::Import => self.emit_import(node),
            NodeKind::Embed | NodeKind::Use => {
                self.catchup(tree.start(node))?;
                self.comment_node(node, false)
            }
            NodeKind::Function | NodeKind::Lambda => self.emit_function(node),
            NodeKind::ForEach => self.emit_for_each(node),
            NodeKind::ForIn => self.emit_for_in(node),
            NodeKind::Interface => self.emit_interface(node),
            NodeKind::Class => self.emit_class(node),
            NodeKind::Vector => self.emit_vector(node),
            NodeKind::ShortVector => self.emit_short_vector(node),
            NodeKind::Type => self.emit_type(node),
            NodeKind::Call => self.emit_call(node),
            NodeKind::Catch => self.emit_catch(node),
            NodeKind::New => self.emit_new(node),
            NodeKind::Relation => self.emit_relation(node),
            NodeKind::Identifier => self.emit_identifier(node),
            NodeKind::XmlLiteral => self.emit_xml_literal(node),
            NodeKind::ConstList => self.emit_const_list(node),
            NodeKind::NameTypeInit => self.emit_name_type_init(node),
            NodeKind::Value => self.dispatch_all(tree.children(node)),
            NodeKind::Dot => self.emit_dot(node),
            NodeKind::Literal => self.emit_literal(node),
            NodeKind::Array => self.emit_array(node),
            NodeKind::Op | NodeKind::Break | NodeKind::Continue => self.catchup(tree.end(node)),
            NodeKind::Assign => self.emit_assignment(node),
            NodeKind::Block => self.emit_block(node),
            _ => self.emit_children(node),
        }
    }
}
