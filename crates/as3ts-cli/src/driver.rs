//! Load sources and parser output, run the emitter, write TypeScript.

use crate::args::CliArgs;
use anyhow::{Context, Result, bail};
use as3ts_ast::SyntaxTree;
use as3ts_emitter::plugins::{self, E4xPlugin};
use as3ts_emitter::{EmitterOptions, OutputShape, Plugin, emit};
use indexmap::IndexMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Appended to a source path to find the parser output for it.
pub const AST_SUFFIX: &str = ".ast.json";

const SOURCE_EXTENSION: &str = "as";
const TARGET_EXTENSION: &str = "ts";

/// `Main.as` → `Main.as.ast.json`.
pub fn ast_path_for(source: &Path) -> PathBuf {
    let mut path = source.as_os_str().to_owned();
    path.push(AST_SUFFIX);
    PathBuf::from(path)
}

fn read_namespaces(path: &Path) -> Result<IndexMap<String, Vec<String>>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read namespaces file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("namespaces file {} is not a map of name lists", path.display()))
}

fn plugin_for(name: &str, args: &CliArgs) -> Result<Box<dyn Plugin>> {
    if name == E4xPlugin::NAME
        && let Some(shim) = &args.e4x_shim
    {
        return Ok(Box::new(E4xPlugin::with_shim(shim.clone())));
    }
    plugins::by_name(name).with_context(|| format!("unknown plugin `{name}`"))
}

pub fn build_options(args: &CliArgs) -> Result<EmitterOptions> {
    let shape = if args.use_namespaces {
        OutputShape::Namespace
    } else {
        OutputShape::Module
    };
    let mut options = EmitterOptions::new()
        .with_line_separator(args.line_separator.as_str())
        .with_output_shape(shape);

    if let Some(path) = &args.namespaces {
        for (namespace, names) in read_namespaces(path)? {
            options = options.with_namespace(namespace, names);
        }
    }
    for name in &args.plugins {
        options = options.with_plugin(plugin_for(name, args)?);
    }
    debug!(?options, "emitter configured");
    Ok(options)
}

/// Transpile one source file using the tree the parser wrote for it.
pub fn transpile_file(source_path: &Path, ast_path: &Path, options: &EmitterOptions) -> Result<String> {
    let source = fs::read_to_string(source_path)
        .with_context(|| format!("failed to read {}", source_path.display()))?;
    let json = fs::read_to_string(ast_path)
        .with_context(|| format!("failed to read AST {}", ast_path.display()))?;
    let tree = SyntaxTree::from_json(&json, &source)
        .with_context(|| format!("invalid AST {} for {}", ast_path.display(), source_path.display()))?;
    emit(&tree, &source, options)
        .with_context(|| format!("failed to transpile {}", source_path.display()))
}

#[derive(Debug, Default)]
pub struct DirSummary {
    /// `.ts` files written.
    pub written: Vec<PathBuf>,
    /// Sources without parser output.
    pub skipped: Vec<PathBuf>,
    /// Sources whose emission failed, with the error chain.
    pub failed: Vec<(PathBuf, String)>,
}

/// Transpile every `.as` file under `root` that has parser output beside it.
///
/// A failing file is recorded and the walk continues; nothing is written for
/// that file.
pub fn transpile_dir(root: &Path, options: &EmitterOptions) -> Result<DirSummary> {
    let mut summary = DirSummary::default();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file()
            || path.extension().is_none_or(|ext| ext != SOURCE_EXTENSION)
        {
            continue;
        }

        let ast = ast_path_for(path);
        if !ast.is_file() {
            warn!(source = %path.display(), "no AST beside source; skipped");
            summary.skipped.push(path.to_path_buf());
            continue;
        }

        match transpile_file(path, &ast, options) {
            Ok(output) => {
                let target = path.with_extension(TARGET_EXTENSION);
                fs::write(&target, output)
                    .with_context(|| format!("failed to write {}", target.display()))?;
                debug!(target = %target.display(), "written");
                summary.written.push(target);
            }
            Err(err) => {
                warn!(source = %path.display(), "{err:#}");
                summary.failed.push((path.to_path_buf(), format!("{err:#}")));
            }
        }
    }
    Ok(summary)
}

fn write_output(out: Option<&Path>, text: &str) -> Result<()> {
    match out {
        Some(path) => fs::write(path, text).with_context(|| format!("failed to write {}", path.display())),
        None => std::io::stdout()
            .lock()
            .write_all(text.as_bytes())
            .context("failed to write to stdout"),
    }
}

pub fn run(args: &CliArgs) -> Result<()> {
    let options = build_options(args)?;

    if args.dir {
        let summary = transpile_dir(&args.input, &options)?;
        info!(
            written = summary.written.len(),
            skipped = summary.skipped.len(),
            failed = summary.failed.len(),
            "directory transpiled"
        );
        if let Some((path, err)) = summary.failed.first() {
            bail!(
                "{} of {} files failed; first: {}: {err}",
                summary.failed.len(),
                summary.failed.len() + summary.written.len(),
                path.display()
            );
        }
        return Ok(());
    }

    if args.pre_process {
        let source = fs::read_to_string(&args.input)
            .with_context(|| format!("failed to read {}", args.input.display()))?;
        return write_output(args.out.as_deref(), &options.pre_process(source, &args.input));
    }

    let ast = args
        .ast
        .clone()
        .unwrap_or_else(|| ast_path_for(&args.input));
    let output = transpile_file(&args.input, &ast, &options)?;
    write_output(args.out.as_deref(), &output)
}
