//! Loops, `catch` clauses and variable declarations.

use super::Emitter;
use super::scope::Declaration;
use crate::error::EmitError;
use crate::keywords::{EACH, FOR, FUNCTION, IN};
use as3ts_ast::{NodeIndex, NodeKind};
use tracing::warn;

impl Emitter<'_> {
    /// `for (var k:T in o)` becomes `for (var k of o)`.
    pub(super) fn emit_for_in(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        let init = self.required_child(node, 0)?;
        let target = self.required_child(node, 1)?;
        let variable = self.required_child(init, 0)?;
        let header = tree.start(node) + FOR.len() as u32 + 1;

        match tree.find_child(variable, NodeKind::NameTypeInit) {
            Some(nti) => {
                self.catchup(header)?;
                self.emit_loop_variable(variable, nti)?;
            }
            None => {
                self.catchup(header)?;
                self.dispatch(init)?;
            }
        }
        self.emit_loop_tail(target, tree.child(node, 2))
    }

    /// `for each (var v:T in o)` becomes `for (var v of o)`.
    pub(super) fn emit_for_each(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        let variable = self.required_child(node, 0)?;
        let target = self.required_child(node, 1)?;

        self.catchup(tree.start(node) + FOR.len() as u32)?;
        self.consume(EACH, tree.start(variable))?;
        match tree.find_child(variable, NodeKind::NameTypeInit) {
            Some(nti) => self.emit_loop_variable(variable, nti)?,
            None => self.dispatch(variable)?,
        }
        self.emit_loop_tail(target, tree.child(node, 2))
    }

    /// The loop variable loses its type annotation, which `for ... of` does
    /// not allow; the type is kept in scope.
    fn emit_loop_variable(&mut self, variable: NodeIndex, nti: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        let name = self.required_text(self.required_kind(nti, NodeKind::Name)?)?;
        if tree.find_child(nti, NodeKind::Type).is_some() {
            self.declare_in_scope(Declaration::new(name).with_type(self.declaration_type(nti)))?;
        } else if tree.find_child(nti, NodeKind::Vector).is_some() {
            warn!(variable = name, "vector-typed loop variable not supported; declare it before the loop");
        }

        self.catchup(tree.start(variable))?;
        self.insert("var ");
        self.insert(name);
        self.skip_to(tree.end(variable))
    }

    fn emit_loop_tail(&mut self, target: NodeIndex, body: Option<NodeIndex>) -> Result<(), EmitError> {
        let tree = self.tree;
        self.catchup(tree.start(target))?;
        self.skip(IN.len() as u32 + 1)?;
        self.insert("of ");
        self.dispatch(target)?;
        self.dispatch_opt(body)
    }

    /// A typed `catch` becomes an untyped one whose body is guarded by an
    /// `instanceof` check that rethrows anything else.
    pub(super) fn emit_catch(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        let name_node = self.required_child(node, 0)?;
        let name = self.required_text(name_node)?;
        self.declare_in_scope(Declaration::new(name))?;

        self.catchup(tree.start(node))?;
        self.catchup(tree.end(name_node))?;
        let indent = self.out.current_line_indent().to_string();

        let second = self.required_child(node, 1)?;
        let (exception_type, block) = if tree.kind(second) == NodeKind::Type {
            (Some(second), self.required_child(node, 2)?)
        } else {
            (None, second)
        };
        if tree.kind(block) != NodeKind::Block {
            return Err(self.malformed(node, "catch clause without a block"));
        }

        let Some(exception_type) = exception_type else {
            return self.dispatch(block);
        };
        self.skip_to(tree.end(exception_type))?;
        let type_text = self.required_text(exception_type)?;
        if self.type_remap(type_text).unwrap_or(type_text) == "any" {
            // Every value is an `any`; the guard would always pass.
            return self.dispatch(block);
        }

        self.catchup(tree.start(block))?;
        let (rendered, end) = self.render_detached(tree.start(block), |e| {
            e.dispatch(block)?;
            e.catchup(tree.end(block))
        })?;
        self.skip_to(end)?;
        let open = rendered
            .find('{')
            .ok_or_else(|| self.malformed(block, "block without `{`"))?;
        let (head, body) = rendered.split_at(open + 1);

        let type_name = self.type_reference(type_text)?;
        let options = self.options;
        let separator = options.line_separator.as_str();
        let guard_indent = format!("{indent}\t");
        self.insert(head);
        self.insert(&format!(
            "{separator}{guard_indent}if ({name} instanceof {type_name}) {{"
        ));
        self.insert(&body.replace('\n', "\n\t"));
        self.insert(&format!(
            "{separator}{guard_indent}else {{ throw {name}; }}{separator}{indent}}}"
        ));
        Ok(())
    }

    /// Local `const` lists.
    pub(super) fn emit_const_list(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        self.catchup(tree.start(node))?;
        let declarators = tree.find_children(node, NodeKind::NameTypeInit);
        let Some(&first) = declarators.first() else {
            return Err(self.malformed(node, "const without a declarator"));
        };
        self.skip_to(tree.start(first))?;
        self.insert("const ");
        for nti in declarators {
            self.dispatch(nti)?;
        }
        Ok(())
    }

    /// `name:Type = init`. Parameters of interface methods cannot have
    /// defaults, so there the initializer is commented out and the parameter
    /// marked optional.
    pub(super) fn emit_name_type_init(&mut self, node: NodeIndex) -> Result<(), EmitError> {
        let tree = self.tree;
        let (name, ty, init) = match *tree.children(node) {
            [name] => (name, None, None),
            [name, second] if tree.kind(second) == NodeKind::Init => (name, None, Some(second)),
            [name, ty] => (name, Some(ty), None),
            [name, ty, init] if tree.kind(init) == NodeKind::Init => (name, Some(ty), Some(init)),
            _ => return Err(self.malformed(node, "expected name, type and initializer")),
        };
        if tree.kind(name) != NodeKind::Name
            || ty.is_some_and(|ty| !matches!(tree.kind(ty), NodeKind::Type | NodeKind::Vector))
        {
            return Err(self.malformed(node, "expected name, type and initializer"));
        }

        let declaration =
            Declaration::new(self.required_text(name)?).with_type(self.declaration_type(node));
        self.declare_in_scope(declaration)?;
        self.catchup(tree.start(node))?;

        let on_interface_method = tree.parent_chain_has_kinds(
            node,
            &[
                NodeKind::Parameter,
                NodeKind::ParameterList,
                NodeKind::Type,
                NodeKind::Content,
                NodeKind::Interface,
            ],
        ) && tree
            .ancestors(node)
            .find(|&ancestor| tree.kind(ancestor) == NodeKind::Type)
            .and_then(|signature| tree.text(signature))
            == Some(FUNCTION);

        self.dispatch(name)?;
        if on_interface_method && init.is_some() {
            self.catchup(tree.end(name))?;
            self.insert("?");
        }
        self.dispatch_opt(ty)?;
        match init {
            Some(init) if on_interface_method => self.comment_node(init, false),
            Some(init) => self.dispatch(init),
            None => Ok(()),
        }
    }
}
