use clap::Parser;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use super::args::CliArgs;
use super::driver::{ast_path_for, build_options, run, transpile_dir, transpile_file};

const TYPED_SOURCE: &str = "var s:Sprite;\n";
const TYPED_AST: &str = r#"{
    "kind": "COMPILATION_UNIT", "start": 0, "end": 14,
    "children": [
        { "kind": "VAR_LIST", "start": 0, "end": 12, "children": [
            { "kind": "NAME_TYPE_INIT", "start": 4, "end": 12, "children": [
                { "kind": "NAME", "start": 4, "end": 5, "text": "s" },
                { "kind": "TYPE", "start": 6, "end": 12, "text": "Sprite" }
            ] }
        ] }
    ]
}"#;

const XML_SOURCE: &str = "var root:XML;\nroot.tail;\n";
const XML_AST: &str = r#"{
    "kind": "COMPILATION_UNIT", "start": 0, "end": 25,
    "children": [
        { "kind": "VAR_LIST", "start": 0, "end": 12, "children": [
            { "kind": "NAME_TYPE_INIT", "start": 4, "end": 12, "children": [
                { "kind": "NAME", "start": 4, "end": 8, "text": "root" },
                { "kind": "TYPE", "start": 9, "end": 12, "text": "XML" }
            ] }
        ] },
        { "kind": "DOT", "start": 14, "end": 23, "children": [
            { "kind": "IDENTIFIER", "start": 14, "end": 18, "text": "root" },
            { "kind": "LITERAL", "start": 19, "end": 23, "text": "tail" }
        ] }
    ]
}"#;

const WILDCARD_SOURCE: &str = "import app.models.*;\n";
const WILDCARD_AST: &str = r#"{
    "kind": "COMPILATION_UNIT", "start": 0, "end": 21,
    "children": [
        { "kind": "IMPORT", "start": 0, "end": 19, "text": "app.models.*" }
    ]
}"#;

/// Write `name` and its parser output into `dir`.
fn write_unit(dir: &Path, name: &str, source: &str, ast: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, source).unwrap();
    fs::write(ast_path_for(&path), ast).unwrap();
    path
}

fn args(argv: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("as3ts").chain(argv.iter().copied())).unwrap()
}

#[test]
fn ast_path_appends_suffix() {
    assert_eq!(
        ast_path_for(Path::new("src/Main.as")),
        Path::new("src/Main.as.ast.json")
    );
}

#[test]
fn transpiles_single_file() {
    let temp = TempDir::new().unwrap();
    let source = write_unit(temp.path(), "Main.as", TYPED_SOURCE, TYPED_AST);
    let options = build_options(&args(&[source.to_str().unwrap()])).unwrap();

    let output = transpile_file(&source, &ast_path_for(&source), &options).unwrap();
    assert_eq!(output, "import { Sprite } from \"./Sprite\";\nvar s:Sprite;\n");
}

#[test]
fn plugins_and_shim_come_from_args() {
    let temp = TempDir::new().unwrap();
    let source = write_unit(temp.path(), "Doc.as", XML_SOURCE, XML_AST);
    let out = temp.path().join("Doc.ts");

    run(&args(&[
        "--plugin",
        "e4x",
        "--e4x-shim",
        "./xml",
        "--out",
        out.to_str().unwrap(),
        source.to_str().unwrap(),
    ]))
    .unwrap();

    assert_eq!(
        fs::read_to_string(&out).unwrap(),
        "import { XML } from \"./xml\";\nvar root:XML;\nroot.$get('tail');\n"
    );
}

#[test]
fn namespaces_file_expands_wildcards() {
    let temp = TempDir::new().unwrap();
    let source = write_unit(temp.path(), "Main.as", WILDCARD_SOURCE, WILDCARD_AST);
    let namespaces = temp.path().join("namespaces.json");
    fs::write(&namespaces, r#"{ "app.models": ["User"] }"#).unwrap();

    let options = build_options(&args(&[
        "--namespaces",
        namespaces.to_str().unwrap(),
        source.to_str().unwrap(),
    ]))
    .unwrap();
    let output = transpile_file(&source, &ast_path_for(&source), &options).unwrap();
    assert_eq!(output, "import { User } from \"app/models/User\";\n");
}

#[test]
fn malformed_namespaces_file_is_an_error() {
    let temp = TempDir::new().unwrap();
    let namespaces = temp.path().join("namespaces.json");
    fs::write(&namespaces, r#"["app.models"]"#).unwrap();

    let err = build_options(&args(&["--namespaces", namespaces.to_str().unwrap(), "Main.as"]))
        .unwrap_err();
    assert!(format!("{err:#}").contains("namespaces file"));
}

#[test]
fn missing_ast_reports_path() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("Main.as");
    fs::write(&source, TYPED_SOURCE).unwrap();

    let err = run(&args(&[source.to_str().unwrap()])).unwrap_err();
    assert!(format!("{err:#}").contains("Main.as.ast.json"));
}

#[test]
fn ast_out_of_range_is_rejected() {
    let temp = TempDir::new().unwrap();
    let source = write_unit(temp.path(), "Main.as", "x;\n", TYPED_AST);
    let options = build_options(&args(&[source.to_str().unwrap()])).unwrap();

    let err = transpile_file(&source, &ast_path_for(&source), &options).unwrap_err();
    assert!(format!("{err:#}").contains("invalid AST"));
}

#[test]
fn dir_mode_writes_next_to_sources() {
    let temp = TempDir::new().unwrap();
    let nested = temp.path().join("app");
    fs::create_dir(&nested).unwrap();
    write_unit(temp.path(), "Main.as", TYPED_SOURCE, TYPED_AST);
    write_unit(&nested, "Doc.as", XML_SOURCE, XML_AST);
    fs::write(nested.join("Orphan.as"), "var x;\n").unwrap();

    let options = build_options(&args(&["--plugin", "e4x", "--dir", temp.path().to_str().unwrap()])).unwrap();
    let summary = transpile_dir(temp.path(), &options).unwrap();

    // Sorted by name per directory: `Main.as` sorts before `app`.
    assert_eq!(summary.written, [temp.path().join("Main.ts"), nested.join("Doc.ts")]);
    assert_eq!(summary.skipped, [nested.join("Orphan.as")]);
    assert!(summary.failed.is_empty());
    assert_eq!(
        fs::read_to_string(nested.join("Doc.ts")).unwrap(),
        "import { XML } from \"e4x_shim\";\nvar root:XML;\nroot.$get('tail');\n"
    );
}

#[test]
fn dir_mode_fails_after_walking_everything() {
    let temp = TempDir::new().unwrap();
    write_unit(temp.path(), "Bad.as", "x;\n", TYPED_AST);
    write_unit(temp.path(), "Good.as", TYPED_SOURCE, TYPED_AST);

    let err = run(&args(&["--dir", temp.path().to_str().unwrap()])).unwrap_err();
    assert!(err.to_string().contains("1 of 2 files failed"));
    assert!(temp.path().join("Good.ts").is_file());
    assert!(!temp.path().join("Bad.ts").exists());
}
