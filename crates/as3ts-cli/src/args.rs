use as3ts_emitter::plugins;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the as3ts binary.
#[derive(Parser, Debug)]
#[command(
    name = "as3ts",
    version,
    about = "Rewrite parsed ActionScript 3 into TypeScript"
)]
pub struct CliArgs {
    /// ActionScript source file, or a directory with `--dir`.
    pub input: PathBuf,

    /// Parser output for the input. Defaults to `<input>.ast.json`.
    #[arg(long)]
    pub ast: Option<PathBuf>,

    /// Write the result here instead of stdout.
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// JSON object mapping each wildcard-importable namespace to the names
    /// it defines, e.g. `{"app.models": ["User", "Group"]}`.
    #[arg(long)]
    pub namespaces: Option<PathBuf>,

    /// Rename packages to namespaces instead of emitting ES modules.
    #[arg(long = "use-namespaces")]
    pub use_namespaces: bool,

    /// Line break used for synthesized text.
    #[arg(long = "line-separator", value_enum, default_value_t = LineSeparator::Lf)]
    pub line_separator: LineSeparator,

    /// Plugin to run. Repeat to run several; earlier plugins take precedence.
    #[arg(long = "plugin", value_parser = parse_plugin_name)]
    pub plugins: Vec<String>,

    /// Module the E4X plugin imports `XML`, `XMLList`, `QName` and
    /// `Namespace` from.
    #[arg(long = "e4x-shim")]
    pub e4x_shim: Option<String>,

    /// Print the source after plugin pre-processing, for feeding to the
    /// parser, instead of transpiling.
    #[arg(long = "pre-process", conflicts_with = "dir")]
    pub pre_process: bool,

    /// Transpile every `.as` file under the input directory that has an AST
    /// beside it, writing `.ts` files next to the sources.
    #[arg(long, conflicts_with_all = ["ast", "out"])]
    pub dir: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum LineSeparator {
    Lf,
    Crlf,
}

impl LineSeparator {
    pub fn as_str(self) -> &'static str {
        match self {
            LineSeparator::Lf => "\n",
            LineSeparator::Crlf => "\r\n",
        }
    }
}

fn parse_plugin_name(name: &str) -> Result<String, String> {
    if plugins::NAMES.contains(&name) {
        Ok(name.to_string())
    } else {
        Err(format!(
            "unknown plugin `{name}` (expected one of: {})",
            plugins::NAMES.join(", ")
        ))
    }
}
