//! Plugin protocol.
//!
//! A plugin is offered every node before the built-in handler runs. Returning
//! `Ok(true)` from [`Plugin::visit`] claims the node: the plugin has emitted it
//! completely, including any recursion into its children, and nothing else
//! sees it. Returning `Ok(false)` passes the node on to the next plugin and
//! finally to the default handler.

use crate::emitter::Emitter;
use crate::emitter::imports::ImportStatement;
use crate::error::EmitError;
use crate::options::EmitterOptions;
use as3ts_ast::NodeIndex;
use regex::Regex;
use std::path::Path;

/// Rewrite applied to the dotted path of every non-wildcard import.
#[derive(Clone, Debug)]
pub struct ImportRewrite {
    pub pattern: Regex,
    pub replacement: String,
}

impl ImportRewrite {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<ImportRewrite, EmitError> {
        let compiled = Regex::new(pattern).map_err(|source| EmitError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(ImportRewrite {
            pattern: compiled,
            replacement: replacement.into(),
        })
    }

    /// Replace the first match, like a non-global JS `String.replace`.
    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace(text, self.replacement.as_str())
            .into_owned()
    }
}

pub trait Plugin {
    /// Registry name, also used in logs.
    fn name(&self) -> &str;

    fn visit(&self, emitter: &mut Emitter<'_>, node: NodeIndex) -> Result<bool, EmitError>;

    fn import_rewrites(&self) -> &[ImportRewrite] {
        &[]
    }

    /// Consulted before the built-in type remap table.
    fn type_remap(&self, _name: &str) -> Option<&str> {
        None
    }

    /// Consulted before the built-in identifier remap table.
    fn identifier_remap(&self, _name: &str) -> Option<&str> {
        None
    }

    fn pre_process(&self, _options: &EmitterOptions, source: String, _path: &Path) -> String {
        source
    }

    fn post_process(&self, _options: &EmitterOptions, output: String) -> String {
        output
    }

    /// Called once per unit with the synthesized imports, before the header is
    /// rendered. Plugins may drop or rewrite entries.
    fn respond_to_extra_imports(&self, _imports: &mut Vec<ImportStatement>) {}
}
