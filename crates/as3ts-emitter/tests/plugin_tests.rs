//! Plugin protocol and the bundled non-E4X plugins.

mod common;

use as3ts_ast::{NodeIndex, NodeKind, TreeBuilder};
use as3ts_emitter::plugins::{self, AutobindPlugin, SuperPropertiesPlugin};
use as3ts_emitter::{EmitError, Emitter, EmitterOptions, ImportRewrite, ImportStatement, Plugin};
use common::*;
use std::path::Path;

/// Claims every identifier and writes a fixed replacement.
struct Rename {
    name: &'static str,
    to: &'static str,
}

impl Plugin for Rename {
    fn name(&self) -> &str {
        self.name
    }

    fn visit(&self, emitter: &mut Emitter<'_>, node: NodeIndex) -> Result<bool, EmitError> {
        let tree = emitter.tree();
        if tree.kind(node) != NodeKind::Identifier {
            return Ok(false);
        }
        emitter.catchup(tree.start(node))?;
        emitter.insert(self.to);
        emitter.skip_to(tree.end(node))?;
        Ok(true)
    }
}

/// Exercises every hook except `visit`.
struct Hooks {
    rewrites: Vec<ImportRewrite>,
}

impl Hooks {
    fn new() -> Hooks {
        Hooks {
            rewrites: vec![ImportRewrite::new(r"^flash\.", "openfl.").unwrap()],
        }
    }
}

impl Plugin for Hooks {
    fn name(&self) -> &str {
        "hooks"
    }

    fn visit(&self, _emitter: &mut Emitter<'_>, _node: NodeIndex) -> Result<bool, EmitError> {
        Ok(false)
    }

    fn import_rewrites(&self) -> &[ImportRewrite] {
        &self.rewrites
    }

    fn type_remap(&self, name: &str) -> Option<&str> {
        (name == "Point").then_some("Vec2")
    }

    fn identifier_remap(&self, name: &str) -> Option<&str> {
        (name == "trace").then_some("console.log")
    }

    fn pre_process(&self, _options: &EmitterOptions, source: String, _path: &Path) -> String {
        source.replace("\r\n", "\n")
    }

    fn post_process(&self, _options: &EmitterOptions, output: String) -> String {
        format!("// @ts-nocheck\n{output}")
    }

    fn respond_to_extra_imports(&self, imports: &mut Vec<ImportStatement>) {
        imports.retain(|import| !import.source.starts_with("./"));
    }
}

fn with(plugin: impl Plugin + 'static) -> EmitterOptions {
    EmitterOptions::default().with_plugin(Box::new(plugin))
}

#[test]
fn test_autobind_decorates_classes() {
    let source = "class View {\n}\n";
    let mut b = TreeBuilder::new(source);
    let name = b.token(NodeKind::Name, "View", 0).unwrap();
    let content = span(&mut b, NodeKind::Content, "{\n}", 0);
    let class = b.wrap(NodeKind::Class, &[name, content]);
    let tree = finish(b, &[class]);

    assert_eq!(
        run(&tree, source, &with(AutobindPlugin)),
        "import { autobind } from \"autobind-decorator\";\n@autobind\nexport class View {\n}\n"
    );
}

#[test]
fn test_super_properties_use_accessors() {
    let source = "super.value = other;\nshow(super.value);\nsuper.update();\n";
    let mut b = TreeBuilder::new(source);

    let base = ident(&mut b, "super", 0);
    let target = dot(&mut b, base, "value", 0);
    let eq = op(&mut b, "=", 0);
    let other = ident(&mut b, "other", 0);
    let write = b.wrap(NodeKind::Assign, &[target, eq, other]);

    let show = ident(&mut b, "show", 0);
    let base = ident(&mut b, "super", 1);
    let property = dot(&mut b, base, "value", 1);
    let args = branch(&mut b, NodeKind::Arguments, "(super.value)", 0, &[property]);
    let read = b.wrap(NodeKind::Call, &[show, args]);

    let base = ident(&mut b, "super", 2);
    let method = dot(&mut b, base, "update", 0);
    let call = call0(&mut b, method, 0);

    let tree = finish(b, &[write, read, call]);
    assert_eq!(
        run(&tree, source, &with(SuperPropertiesPlugin)),
        "super.setValue(other);\nshow(super.getValue());\nsuper.update();\n"
    );
}

#[test]
fn test_compound_assignment_to_super_property_is_unsupported() {
    let source = "super.value += 1;\n";
    let mut b = TreeBuilder::new(source);
    let base = ident(&mut b, "super", 0);
    let target = dot(&mut b, base, "value", 0);
    let plus_eq = op(&mut b, "+=", 0);
    let one = literal(&mut b, "1", 0);
    let assign = b.wrap(NodeKind::Assign, &[target, plus_eq, one]);
    let tree = finish(b, &[assign]);

    let err = try_run(&tree, source, &with(SuperPropertiesPlugin)).unwrap_err();
    assert!(matches!(err, EmitError::Unsupported { kind: NodeKind::Assign, .. }));
}

#[test]
fn test_registry_resolves_bundled_names() {
    for &name in plugins::NAMES {
        let plugin = plugins::by_name(name).unwrap();
        assert_eq!(plugin.name(), name);
    }
    assert!(plugins::by_name("e4x").is_some());
    assert!(plugins::by_name("nope").is_none());
}

#[test]
fn test_first_plugin_to_claim_a_node_wins() {
    let source = "alpha;\n";
    let mut b = TreeBuilder::new(source);
    let alpha = ident(&mut b, "alpha", 0);
    let tree = finish(b, &[alpha]);

    let first = Rename { name: "first", to: "one" };
    let second = Rename { name: "second", to: "two" };
    let options = EmitterOptions::default()
        .with_plugin(Box::new(first))
        .with_plugin(Box::new(second));
    assert_eq!(run(&tree, source, &options), "one;\n");

    let options = EmitterOptions::default()
        .with_plugin(Box::new(Rename { name: "second", to: "two" }))
        .with_plugin(Box::new(Rename { name: "first", to: "one" }));
    assert_eq!(run(&tree, source, &options), "two;\n");
}

#[test]
fn test_import_rewrites_apply_to_paths() {
    let source = "import flash.display.Sprite;\n";
    let mut b = TreeBuilder::new(source);
    let (start, end) = b.find("import flash.display.Sprite", 0).unwrap();
    let import = b.leaf(NodeKind::Import, start, end, Some("flash.display.Sprite"));
    let tree = finish(b, &[import]);

    assert_eq!(
        run(&tree, source, &with(Hooks::new())),
        "// @ts-nocheck\nimport { Sprite } from \"openfl/display/Sprite\";\n"
    );
}

#[test]
fn test_plugins_can_drop_synthesized_imports() {
    let source = "var s:Sprite;\n";
    let mut b = TreeBuilder::new(source);
    let decl = typed_var(&mut b, "s", "Sprite", 0, None);
    let tree = finish(b, &[decl]);

    assert_eq!(
        run(&tree, source, &EmitterOptions::default()),
        "import { Sprite } from \"./Sprite\";\nvar s:Sprite;\n"
    );
    assert_eq!(run(&tree, source, &with(Hooks::new())), "// @ts-nocheck\nvar s:Sprite;\n");
}

#[test]
fn test_plugin_remaps_come_before_builtin_tables() {
    let source = "var p:Point;\ntrace;\nDictionary;\n";
    let mut b = TreeBuilder::new(source);
    let decl = typed_var(&mut b, "p", "Point", 0, None);
    let trace = ident(&mut b, "trace", 0);
    let dictionary = ident(&mut b, "Dictionary", 0);
    let tree = finish(b, &[decl, trace, dictionary]);

    assert_eq!(
        run(&tree, source, &with(Hooks::new())),
        "// @ts-nocheck\nvar p:Vec2;\nconsole.log;\nObject;\n"
    );
}

#[test]
fn test_pre_process_runs_plugins_in_order() {
    let options = with(Hooks::new());
    let text = options.pre_process("a\r\nb\r\n".to_string(), Path::new("A.as"));
    assert_eq!(text, "a\nb\n");
}
