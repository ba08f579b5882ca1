//! Functions, lambdas and function bodies.

use super::Emitter;
use super::declarations::has_static_modifier;
use super::scope::Declaration;
use crate::error::EmitError;
use crate::keywords::{FUNCTION, SUPER};
use as3ts_ast::{NodeIndex, NodeKind, SyntaxTree};

fn is_super_call(tree: &SyntaxTree, node: NodeIndex) -> bool {
    tree.kind(node) == NodeKind::Call
        && tree.child(node, 0).is_some_and(|callee| {
            tree.kind(callee) == NodeKind::Identifier && tree.text(callee) == Some(SUPER)
        })
}

impl Emitter<'_> {
    pub(super) fn emit_function(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        if let Some(name) = tree.text(node) {
            self.declare_in_scope(Declaration::new(name))?;
        }

        // Classes don't nest, so the first method found is the only one.
        let enclosing_method = tree.ancestors(node).find(|&ancestor| {
            tree.kind(ancestor) == NodeKind::Function
                && tree.parent_chain_has_kinds(ancestor, &[NodeKind::Content, NodeKind::Class])
        });
        if enclosing_method.is_some_and(|method| !has_static_modifier(tree, method)) {
            return self.emit_arrow_function(node);
        }

        self.emit_declaration(node)?;
        let rest = if tree.find_child(node, NodeKind::ModList).is_some() {
            tree.children_after(node, NodeKind::ModList)
        } else {
            tree.children_after(node, NodeKind::MetaList)
        };
        let declarations = self.function_declarations(node);
        self.with_scope(declarations, None, |e| e.dispatch_all(rest))
    }

    /// A function nested in an instance method becomes an arrow function so
    /// that `this` keeps referring to the instance.
    fn emit_arrow_function(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        if tree.find_child(node, NodeKind::MetaList).is_some()
            || tree.find_child(node, NodeKind::ModList).is_some()
        {
            return Err(self.unsupported(node, "nested function with metadata or modifiers"));
        }

        let (params, return_type, body) = match *tree.children(node) {
            [params, body] => (params, None, body),
            [params, return_type, body] => (params, Some(return_type), body),
            _ => return Err(self.malformed(node, "expected parameters, return type and body")),
        };
        if tree.kind(params) != NodeKind::ParameterList
            || tree.kind(body) != NodeKind::Block
            || return_type
                .is_some_and(|ty| !matches!(tree.kind(ty), NodeKind::Type | NodeKind::Vector))
        {
            return Err(self.malformed(node, "expected parameters, return type and body"));
        }

        self.catchup(tree.start(node))?;
        let name = tree.text(node);
        if tree.parent_kind(node) == Some(NodeKind::Block) {
            let name = name.ok_or_else(|| self.malformed(node, "function statement without a name"))?;
            self.insert(&format!("let {name} = "));
        } else if let Some(name) = name {
            // Arrow functions have no name to recurse through.
            let mentions = super::compile_regex(format!(r"\b{}\b", regex::escape(name)))?;
            if mentions.is_match(self.source_between(tree.start(body), tree.end(body))) {
                return Err(self.unsupported(
                    node,
                    format!("lambda `{name}` may be recursive and cannot become an arrow function"),
                ));
            }
        }

        let declarations = self.function_declarations(node);
        self.with_scope(declarations, None, |e| {
            e.consume(FUNCTION, tree.start(params))?;
            e.skip_to(tree.start(params))?;
            e.dispatch(params)?;
            e.dispatch_opt(return_type)?;
            e.catchup(tree.start(body))?;
            if e.out.last_char().is_some_and(|c| !c.is_whitespace()) {
                e.insert(" ");
            }
            e.insert("=> ");
            e.dispatch(body)
        })
    }

    /// Parameters and local variables of a function, without descending into
    /// nested functions.
    pub(super) fn function_declarations(&self, node: NodeIndex) -> Vec<Declaration> {
        let tree = self.tree;
        let mut declarations = Vec::new();

        if let Some(params) = tree.find_child(node, NodeKind::ParameterList) {
            for &param in tree.children(params) {
                if let Some(nti) = tree.find_child(param, NodeKind::NameTypeInit) {
                    if let Some(name) = tree.find_child(nti, NodeKind::Name).and_then(|n| tree.text(n)) {
                        declarations.push(Declaration::new(name).with_type(self.declaration_type(nti)));
                    }
                } else if let Some(rest) = tree.find_child(param, NodeKind::Rest).and_then(|r| tree.text(r)) {
                    declarations.push(Declaration::new(rest));
                }
            }
        }
        if let Some(block) = tree.find_child(node, NodeKind::Block) {
            self.collect_locals(block, &mut declarations);
        }
        declarations
    }

    fn collect_locals(&self, node: NodeIndex, declarations: &mut Vec<Declaration>) {
        let tree = self.tree;
        for &child in tree.children(node) {
            if matches!(
                tree.kind(child),
                NodeKind::VarList | NodeKind::ConstList | NodeKind::Var | NodeKind::Const
            ) {
                for nti in tree.find_children(child, NodeKind::NameTypeInit) {
                    if let Some(name) = tree.find_child(nti, NodeKind::Name).and_then(|n| tree.text(n)) {
                        declarations.push(Declaration::new(name));
                    }
                }
            }
            if !tree.kind(child).is_function_like() {
                self.collect_locals(child, declarations);
            }
        }
    }

    /// Blocks are copied through, except constructor bodies: with a parent
    /// class they get a `super()` call if they lack one, without a parent
    /// class any `super()` call is commented out.
    pub(super) fn emit_block(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        let is_constructor_body = tree.parent_chain_has_kinds(
            node,
            &[NodeKind::Function, NodeKind::Content, NodeKind::Class],
        ) && tree
            .parent(node)
            .and_then(|function| tree.find_child(function, NodeKind::Name))
            .and_then(|name| tree.text(name))
            .is_some_and(|name| self.current_class_name() == Some(name));
        if !is_constructor_body {
            return self.emit_children(node);
        }

        let has_parent_class = tree
            .ancestors(node)
            .nth(2)
            .and_then(|class| tree.find_child(class, NodeKind::Extends))
            .is_some();
        let children = tree.children(node);
        self.catchup(tree.start(node))?;

        if !has_parent_class {
            for &child in children {
                if is_super_call(tree, child) {
                    self.comment_node(child, true)?;
                } else {
                    self.dispatch(child)?;
                }
            }
            return Ok(());
        }

        let super_calls = children
            .iter()
            .filter(|&&child| is_super_call(tree, child))
            .count();
        if super_calls > 1 {
            return Err(self.unsupported(node, "constructor calls super more than once"));
        }
        match children.first() {
            Some(&first) => self.catchup(tree.start(first))?,
            None => self.catchup(tree.start(node) + 1)?,
        }
        if super_calls == 0 {
            // Implicit in the source, explicit in the target.
            let (terminator, padding) = self
                .out
                .tail_after_last(&['\n', '{'])
                .map_or(('{', String::new()), |(terminator, tail)| (terminator, tail.to_string()));
            self.insert("super();");
            if terminator == '\n' {
                let options = self.options;
                self.insert(&options.line_separator);
            }
            self.insert(&padding);
        }
        self.dispatch_all(children)
    }
}
