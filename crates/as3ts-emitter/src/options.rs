use crate::plugin::Plugin;
use crate::remap::RemapTables;
use indexmap::IndexMap;
use std::fmt;
use std::path::Path;

/// How top-level `package` blocks are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputShape {
    /// Strip the package wrapper; each file becomes an ES module.
    #[default]
    Module,
    /// Rename `package` to `namespace`.
    Namespace,
}

/// Configuration for one emission run.
///
/// Plugins are consulted in list order and the first one that handles a node
/// wins, so order is significant.
pub struct EmitterOptions {
    /// Used for every line break the engine synthesizes.
    pub line_separator: String,
    pub output_shape: OutputShape,
    pub plugins: Vec<Box<dyn Plugin>>,
    /// Names exposed by each wildcard-importable namespace, used to expand
    /// `import ns.*` into one import per name.
    pub definitions_by_namespace: IndexMap<String, Vec<String>>,
    pub remap: RemapTables,
}

impl EmitterOptions {
    pub fn new() -> EmitterOptions {
        EmitterOptions::default()
    }

    pub fn with_plugin(mut self, plugin: Box<dyn Plugin>) -> EmitterOptions {
        self.plugins.push(plugin);
        self
    }

    pub fn with_line_separator(mut self, separator: impl Into<String>) -> EmitterOptions {
        self.line_separator = separator.into();
        self
    }

    pub fn with_output_shape(mut self, shape: OutputShape) -> EmitterOptions {
        self.output_shape = shape;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>, names: Vec<String>) -> EmitterOptions {
        self.definitions_by_namespace
            .insert(namespace.into(), names);
        self
    }

    pub fn uses_namespaces(&self) -> bool {
        self.output_shape == OutputShape::Namespace
    }

    /// Run every plugin's pre-processing hook over raw source text, in order.
    ///
    /// Front ends call this before handing the text to the parser.
    pub fn pre_process(&self, source: String, path: &Path) -> String {
        self.plugins
            .iter()
            .fold(source, |text, plugin| plugin.pre_process(self, text, path))
    }

    pub(crate) fn post_process(&self, output: String) -> String {
        self.plugins
            .iter()
            .fold(output, |text, plugin| plugin.post_process(self, text))
    }
}

impl Default for EmitterOptions {
    fn default() -> Self {
        EmitterOptions {
            line_separator: "\n".to_string(),
            output_shape: OutputShape::Module,
            plugins: Vec::new(),
            definitions_by_namespace: IndexMap::new(),
            remap: RemapTables::builtin(),
        }
    }
}

impl fmt::Debug for EmitterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plugins: Vec<&str> = self.plugins.iter().map(|plugin| plugin.name()).collect();
        f.debug_struct("EmitterOptions")
            .field("line_separator", &self.line_separator)
            .field("output_shape", &self.output_shape)
            .field("plugins", &plugins)
            .field("definitions_by_namespace", &self.definitions_by_namespace)
            .finish_non_exhaustive()
    }
}
