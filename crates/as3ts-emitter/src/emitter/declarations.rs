//! Handlers for packages, imports, types and class-level declarations.

use super::Emitter;
use super::scope::Declaration;
use crate::error::EmitError;
use crate::keywords::{self, FUNCTION, PRIVATE, PROTECTED, PUBLIC, STATIC};
use as3ts_ast::{NodeIndex, NodeKind, SyntaxTree};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

/// Visibility of a class member, ordered from least to most visible.
///
/// `NotSpecified` ranks above `Public`: leaving the modifier off is kept
/// distinct from writing `public` when a getter and setter are unified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Visibility {
    Private,
    Protected,
    Public,
    NotSpecified,
}

impl Visibility {
    fn of(tree: &SyntaxTree, mod_list: Option<NodeIndex>) -> Visibility {
        let Some(mods) = mod_list else {
            return Visibility::NotSpecified;
        };
        let has = |keyword: &str| {
            tree.children(mods)
                .iter()
                .any(|&m| tree.text(m) == Some(keyword))
        };
        if has(PRIVATE) {
            Visibility::Private
        } else if has(PROTECTED) {
            Visibility::Protected
        } else if has(PUBLIC) {
            Visibility::Public
        } else {
            Visibility::NotSpecified
        }
    }

    fn keyword(self) -> Option<&'static str> {
        match self {
            Visibility::Private => Some(PRIVATE),
            Visibility::Protected => Some(PROTECTED),
            Visibility::Public => Some(PUBLIC),
            Visibility::NotSpecified => None,
        }
    }
}

pub(super) fn has_static_modifier(tree: &SyntaxTree, node: NodeIndex) -> bool {
    tree.find_child(node, NodeKind::ModList)
        .is_some_and(|mods| {
            tree.children(mods)
                .iter()
                .any(|&m| tree.text(m) == Some(STATIC))
        })
}

fn member_name(tree: &SyntaxTree, node: NodeIndex) -> Option<&str> {
    tree.find_child(node, NodeKind::Name)
        .and_then(|name| tree.text(name))
}

/// Leading whitespace of `line` when it starts with `export`.
fn export_padding(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    trimmed
        .starts_with("export")
        .then(|| &line[..line.len() - trimmed.len()])
}

/// Remove the indentation level a stripped `package` block introduced.
///
/// The first line is the remainder of the line holding the package's `{` and
/// is dropped. The padding is taken from the first `export` line.
fn dedent_package(contents: &str) -> String {
    let mut lines = contents.split('\n');
    let first = lines.next().unwrap_or_default();
    let rest: Vec<&str> = lines.collect();

    if !first.trim().is_empty() {
        warn!("package `{{` is followed by code on the same line; indentation left as is");
        return contents.to_string();
    }
    let Some(padding) = rest.iter().find_map(|line| export_padding(line)) else {
        warn!("no exported declaration in package; indentation left as is");
        return contents.to_string();
    };
    rest.iter()
        .map(|line| line.strip_prefix(padding).unwrap_or(line))
        .collect::<Vec<_>>()
        .join("\n")
}

impl Emitter<'_> {
    // =========================================================================
    // Package and imports
    // =========================================================================

    pub(super) fn emit_package(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        let (start, end) = (tree.start(node), tree.end(node));
        self.catchup(start)?;

        if self.options.uses_namespaces() {
            self.skip(keywords::PACKAGE.len() as u32)?;
            self.insert("namespace");
            return self.dispatch_all(tree.children(node));
        }

        let open = self
            .source_between(start, end)
            .find(keywords::LEFT_CURLY_BRACKET)
            .ok_or_else(|| self.malformed(node, "package without `{`"))?;
        let body_start = start + open as u32 + 1;
        self.skip_to(body_start)?;

        let (contents, after) =
            self.render_detached(body_start, |e| e.dispatch_all(tree.children(node)))?;
        self.insert(&dedent_package(&contents));
        self.skip_to(after)?;

        // Everything up to the closing `}`, which is dropped.
        self.catchup(end.saturating_sub(1))?;
        if self.index() < end {
            self.skip_to(end)?;
        }
        Ok(())
    }

    pub(super) fn emit_import(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        let text = self.required_text(node)?;
        let (start, end) = (tree.start(node), tree.end(node));

        let Some(namespace) = text.strip_suffix(".*") else {
            self.catchup(start)?;
            self.emit_import_statement(text)?;
            return self.skip_to(end);
        };

        let options = self.options;
        match options
            .definitions_by_namespace
            .get(namespace)
            .filter(|names| !names.is_empty())
        {
            Some(names) => {
                self.catchup(start)?;
                let padding = self.out.trailing_blanks().to_string();
                for (i, name) in names.iter().enumerate() {
                    if i > 0 {
                        self.insert(&format!(";{}{padding}", options.line_separator));
                    }
                    self.emit_import_statement(&format!("{namespace}.{name}"))?;
                }
                self.skip_to(end)
            }
            None => {
                warn!(namespace, "nothing known to import from wildcard namespace; commented out");
                self.comment_node(node, true)
            }
        }
    }

    /// `import { C } from "a/b/C"`, or `import C = a.b.C` in namespace mode,
    /// for the dotted path `a.b.C`.
    fn emit_import_statement(&mut self, dotted: &str) -> Result<(), EmitError> {
        let options = self.options;
        let path = options
            .plugins
            .iter()
            .flat_map(|plugin| plugin.import_rewrites())
            .fold(dotted.to_string(), |path, rewrite| rewrite.apply(&path));

        let name = if options.uses_namespaces() {
            let name = dotted.rsplit('.').next().unwrap_or(dotted);
            self.insert(&format!("{} {name} = {path}", keywords::IMPORT));
            name.to_string()
        } else {
            let name = path.rsplit('.').next().unwrap_or(&path).to_string();
            self.insert(&format!(
                "{} {{ {name} }} from \"{}\"",
                keywords::IMPORT,
                path.replace('.', "/")
            ));
            name
        };
        self.declare_in_scope(Declaration::new(name))
    }

    pub(super) fn emit_meta(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        let start = tree.start(node);
        self.catchup(start)?;
        if self.index() == start {
            return self.comment_node(node, false);
        }

        // Another statement between the metadata and its target was emitted
        // first, so the metadata text is already in the output.
        let text = self.source_between(start, tree.end(node));
        if !self.out.wrap_last_occurrence(text, "/*", "*/") {
            warn!(meta = text, "metadata already passed and not found in output; left as is");
        }
        Ok(())
    }

    // =========================================================================
    // Types
    // =========================================================================

    pub(super) fn emit_type(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;

        // Constructors have no return type.
        if let Some(function) = tree.parent(node)
            && tree.kind(function) == NodeKind::Function
            && let Some(name) = member_name(tree, function)
            && self.current_class_name() == Some(name)
        {
            if let Some(previous) = tree.previous_sibling(node) {
                self.catchup(tree.end(previous))?;
            }
            return self.skip_to(tree.end(node));
        }

        self.catchup(tree.start(node))?;
        let Some(text) = tree.text(node) else {
            return Ok(());
        };
        self.skip_to(tree.end(node))?;
        let name = self.type_reference(text)?;
        self.insert(&name);
        Ok(())
    }

    /// `Vector.<T>` becomes `T[]`.
    pub(super) fn emit_vector(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        let is_new = self.ctx.is_new;
        if !is_new {
            self.catchup(tree.start(node))?;
        }
        match tree.find_child(node, NodeKind::Type) {
            Some(ty) => {
                self.skip_to(tree.start(ty))?;
                if !is_new {
                    self.dispatch(ty)?;
                }
            }
            None if !is_new => self.insert("any"),
            None => {}
        }
        self.insert("[]");
        self.skip_to(tree.end(node))
    }

    /// `new <T>[a, b]` becomes `Array<T>([a, b])`.
    pub(super) fn emit_short_vector(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        self.catchup(tree.start(node))?;
        let vector = self.required_kind(node, NodeKind::Vector)?;
        let array = self.required_kind(node, NodeKind::Array)?;

        self.insert("Array");
        match tree.find_child(vector, NodeKind::Type) {
            Some(ty) => {
                self.dispatch(ty)?;
                self.catchup(tree.end(vector))?;
            }
            None => {
                self.insert("<any>");
                self.skip_to(tree.end(vector))?;
            }
        }
        self.insert("(");
        self.emit_array(array)?;
        self.insert(")");
        self.skip_to(tree.end(node))
    }

    // =========================================================================
    // Interfaces and classes
    // =========================================================================

    /// Leading metadata and modifiers of a top-level declaration. Any
    /// non-private modifier becomes `export`; classes are always exported.
    pub(super) fn emit_declaration(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        self.catchup(tree.start(node))?;
        self.dispatch_opt(tree.find_child(node, NodeKind::MetaList))?;

        let is_class = tree.kind(node) == NodeKind::Class;
        let mods = tree
            .find_child(node, NodeKind::ModList)
            .filter(|&mods| !tree.children(mods).is_empty());

        if let Some(mods) = mods {
            self.catchup(tree.start(mods))?;
            let mut export = false;
            for &modifier in tree.children(mods) {
                if tree.text(modifier) != Some(PRIVATE) {
                    export = true;
                }
                self.skip_to(tree.end(modifier))?;
            }
            if !export && is_class {
                return Err(self.unsupported(node, "private classes cannot be exported"));
            }
            if export {
                self.insert("export");
            }
        } else if is_class {
            // Public members may expose non-public classes, so every class is
            // exported.
            let name = self.required_kind(node, NodeKind::Name)?;
            let name_start = tree.start(name);
            match self.source_between(self.index(), name_start).rfind("class") {
                Some(pos) => {
                    self.catchup(self.index() + pos as u32)?;
                    self.insert("export ");
                }
                None => warn!("class keyword not found before class name; not exported"),
            }
            self.catchup(name_start)?;
        }
        Ok(())
    }

    pub(super) fn emit_interface(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        self.emit_declaration(node)?;

        let name = self.required_kind(node, NodeKind::Name)?;
        self.declare_in_scope(Declaration::new(self.required_text(name)?))?;
        for extends in tree.find_children(node, NodeKind::Extends) {
            self.ensure_import(self.required_text(extends)?, None, true)?;
        }

        let Some(content) = tree.find_child(node, NodeKind::Content) else {
            return Ok(());
        };
        let mut seen_accessors = FxHashSet::default();
        for &member in tree.children(content) {
            self.dispatch_opt(tree.find_child(member, NodeKind::MetaList))?;
            self.catchup(tree.start(member))?;
            let ty = tree
                .find_child(member, NodeKind::Type)
                .or_else(|| tree.child(member, 2));

            match tree.kind(member) {
                NodeKind::Type if tree.text(member) == Some(FUNCTION) => {
                    self.skip(FUNCTION.len() as u32 + 1)?;
                    self.dispatch_opt(tree.find_child(member, NodeKind::ParameterList))?;
                    self.dispatch_opt(ty)?;
                }
                kind @ (NodeKind::Get | NodeKind::Set) => {
                    let name = self.required_kind(member, NodeKind::Name)?;
                    if !seen_accessors.insert(self.required_text(name)?) {
                        // A property signature covers both accessors.
                        self.comment_node(member, true)?;
                        continue;
                    }
                    let params = self.required_kind(member, NodeKind::ParameterList)?;
                    self.skip_to(tree.start(name))?;
                    self.catchup(tree.end(name))?;
                    if kind == NodeKind::Get {
                        self.skip_to(tree.end(params))?;
                        self.dispatch_opt(ty)?;
                    } else {
                        let nti = tree
                            .find_child(params, NodeKind::Parameter)
                            .and_then(|param| tree.find_child(param, NodeKind::NameTypeInit))
                            .ok_or_else(|| self.malformed(member, "setter without a parameter"))?;
                        let param_name = self.required_kind(nti, NodeKind::Name)?;
                        self.skip_to(tree.end(param_name))?;
                        self.dispatch_opt(tree.find_child(nti, NodeKind::Type))?;
                        self.skip_to(tree.end(member))?;
                    }
                }
                // Includes, imports and the like have no interface form.
                _ => self.comment_node(member, true)?,
            }
        }
        Ok(())
    }

    /// Members visible inside the class body, bound to `this` or to the class
    /// for statics.
    fn class_declarations(&self, class_name: &str, members: &[NodeIndex]) -> Vec<Declaration> {
        let tree = self.tree;
        let mut seen = FxHashSet::default();
        let mut declarations = Vec::new();

        for &member in members {
            let bound = if has_static_modifier(tree, member) {
                class_name
            } else {
                "this"
            };
            let typed_names: Vec<(NodeIndex, Option<String>)> = match tree.kind(member) {
                NodeKind::Get => tree
                    .find_child(member, NodeKind::Name)
                    .map(|name| (name, self.declaration_type(member)))
                    .into_iter()
                    .collect(),
                NodeKind::Set | NodeKind::Function => tree
                    .find_child(member, NodeKind::Name)
                    .map(|name| (name, None))
                    .into_iter()
                    .collect(),
                NodeKind::VarList | NodeKind::ConstList => tree
                    .find_children(member, NodeKind::NameTypeInit)
                    .into_iter()
                    .filter_map(|nti| {
                        let name = tree.find_child(nti, NodeKind::Name)?;
                        Some((name, self.declaration_type(nti)))
                    })
                    .collect(),
                _ => Vec::new(),
            };

            for (name, ty) in typed_names {
                let Some(name) = tree.text(name) else {
                    continue;
                };
                if !seen.insert(name) || name == class_name {
                    continue;
                }
                declarations.push(Declaration::new(name).with_type(ty).with_bound(bound));
            }
        }
        declarations
    }

    pub(super) fn emit_class(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        self.emit_declaration(node)?;

        let name = self.required_kind(node, NodeKind::Name)?;
        let class_name = self.required_text(name)?;
        let Some(content) = tree.find_child(node, NodeKind::Content) else {
            return Ok(());
        };
        let members = tree.children(content);

        if let Some(extends) = tree.find_child(node, NodeKind::Extends) {
            self.emit_identifier(extends)?;
            self.ensure_import(self.required_text(extends)?, None, true)?;
        }
        if let Some(implements) = tree.find_child(node, NodeKind::ImplementsList) {
            for &interface in tree.children(implements) {
                self.ensure_import(self.required_text(interface)?, None, true)?;
            }
        }

        debug!(class = class_name, members = members.len(), "emitting class");
        let declarations = self.class_declarations(class_name, members);
        self.with_scope(declarations, Some(class_name.to_string()), |e| {
            for &member in members {
                e.dispatch_opt(tree.find_child(member, NodeKind::MetaList))?;
                e.catchup(tree.start(member))?;
                match tree.kind(member) {
                    NodeKind::Set => e.emit_set(member)?,
                    NodeKind::Get | NodeKind::Function => e.emit_method(member)?,
                    NodeKind::VarList => e.emit_property_decl(member, false)?,
                    NodeKind::ConstList => e.emit_property_decl(member, true)?,
                    _ => e.dispatch(member)?,
                }
            }
            Ok(())
        })?;
        self.catchup(tree.end(node))
    }

    // =========================================================================
    // Class members
    // =========================================================================

    fn emit_method(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        let name = self.required_kind(node, NodeKind::Name)?;
        let is_constructor = tree.kind(node) == NodeKind::Function
            && tree.text(name).is_some()
            && tree.text(name) == self.current_class_name();

        if is_constructor {
            if let Some(mods) = tree.find_child(node, NodeKind::ModList) {
                self.catchup(tree.start(mods))?;
            }
            self.insert("constructor");
            self.skip_to(tree.end(name))?;
        } else {
            self.emit_class_field(node)?;
            self.consume(FUNCTION, tree.start(name))?;
            self.catchup(tree.end(name))?;
        }

        let declarations = self.function_declarations(node);
        self.with_scope(declarations, None, |e| {
            e.dispatch_all(tree.children_after(node, NodeKind::Name))
        })
    }

    fn emit_set(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        self.emit_class_field(node)?;

        let name = self.required_kind(node, NodeKind::Name)?;
        self.consume(FUNCTION, tree.start(name))?;
        let params = self.required_kind(node, NodeKind::ParameterList)?;
        self.dispatch(params)?;
        self.catchup(tree.end(params))?;

        // Setters have no return type in the target.
        let body = match tree.find_child(node, NodeKind::Type) {
            Some(ty) => {
                self.skip_to(tree.end(ty))?;
                tree.children_after(node, NodeKind::Type)
            }
            None => tree.children_after(node, NodeKind::ParameterList),
        };
        let declarations = self.function_declarations(node);
        self.with_scope(declarations, None, |e| e.dispatch_all(body))
    }

    fn emit_property_decl(&mut self, node: NodeIndex, is_const: bool) -> Result<(), EmitError> {
        let tree = self.tree;
        self.emit_class_field(node)?;
        let keyword = if is_const { keywords::CONST } else { keywords::VAR };
        for (i, nti) in tree
            .find_children(node, NodeKind::NameTypeInit)
            .into_iter()
            .enumerate()
        {
            if i == 0 {
                self.consume(keyword, tree.start(nti))?;
            }
            self.dispatch(nti)?;
        }
        Ok(())
    }

    /// Rewrite member modifiers: unknown ones are commented out, matching
    /// getter/setter pairs get the same visibility, and `static` is moved
    /// after the access modifier.
    fn emit_class_field(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        let Some(mods) = tree.find_child(node, NodeKind::ModList) else {
            return Ok(());
        };
        self.catchup(tree.start(mods))?;

        let mut replacements: FxHashMap<&str, String> = [PRIVATE, PUBLIC, PROTECTED, STATIC]
            .into_iter()
            .map(|keyword| (keyword, keyword.to_string()))
            .collect();

        let kind = tree.kind(node);
        if matches!(kind, NodeKind::Get | NodeKind::Set) {
            let own = Visibility::of(tree, Some(mods));
            let is_static = has_static_modifier(tree, node);
            let related_kind = if kind == NodeKind::Get {
                NodeKind::Set
            } else {
                NodeKind::Get
            };
            let name = member_name(tree, node);
            let related: Vec<NodeIndex> = tree
                .parent(node)
                .map(|content| tree.find_children(content, related_kind))
                .unwrap_or_default()
                .into_iter()
                .filter(|&sibling| {
                    member_name(tree, sibling) == name && has_static_modifier(tree, sibling) == is_static
                })
                .collect();
            if related.len() > 1 {
                return Err(self.unsupported(node, "more than one matching accessor"));
            }

            if let Some(&other) = related.first() {
                let theirs = Visibility::of(tree, tree.find_child(other, NodeKind::ModList));
                if theirs > own {
                    let unified = match theirs.keyword() {
                        Some(keyword) => keyword.to_string(),
                        None => own
                            .keyword()
                            .map_or_else(String::new, |keyword| format!("/*{keyword}*/")),
                    };
                    for keyword in [PRIVATE, PROTECTED, PUBLIC] {
                        replacements.insert(keyword, unified.clone());
                    }
                }
            }
        }

        let modifiers: Vec<&str> = tree
            .children(mods)
            .iter()
            .filter_map(|&m| tree.text(m))
            .collect();
        if modifiers.contains(&STATIC)
            && let Some(&last) = modifiers
                .iter()
                .filter(|m| replacements.contains_key(**m))
                .last()
            && last != STATIC
        {
            let last_text = replacements[last].clone();
            replacements.insert(STATIC, last_text);
            replacements.insert(last, STATIC.to_string());
        }

        for &modifier in tree.children(mods) {
            self.catchup(tree.start(modifier))?;
            match tree.text(modifier).and_then(|text| replacements.get(text)) {
                Some(text) => {
                    self.insert(text);
                    self.skip_to(tree.end(modifier))?;
                }
                None => self.comment_node(modifier, false)?,
            }
        }
        Ok(())
    }
}
