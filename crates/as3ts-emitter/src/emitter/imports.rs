//! Import synthesis.
//!
//! Names referenced but not declared in the unit are queued as imports and
//! recorded in the root scope, so each name is queued at most once.

use super::Emitter;
use super::scope::Declaration;
use crate::error::EmitError;
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportStatement {
    pub identifier: String,
    /// Module path the identifier is imported from.
    pub source: String,
}

impl ImportStatement {
    pub fn new(identifier: impl Into<String>, source: impl Into<String>) -> ImportStatement {
        ImportStatement {
            identifier: identifier.into(),
            source: source.into(),
        }
    }

    pub fn render(&self) -> String {
        format!("import {{ {} }} from \"{}\";", self.identifier, self.source)
    }
}

/// One statement per line, followed by a separator; empty without imports.
pub fn render_header(imports: &[ImportStatement], line_separator: &str) -> String {
    if imports.is_empty() {
        return String::new();
    }
    let mut header = imports
        .iter()
        .map(ImportStatement::render)
        .collect::<Vec<_>>()
        .join(line_separator);
    header.push_str(line_separator);
    header
}

/// Whether the unit defines `name` itself as a class.
fn declares_class(source: &str, name: &str) -> Result<bool, EmitError> {
    let re = super::compile_regex(format!(r"class\s+{}\s", regex::escape(name)))?;
    Ok(re.is_match(source))
}

impl Emitter<'_> {
    /// Queue an import of `identifier` unless it is already available.
    ///
    /// `from` defaults to `./<identifier>`. With `check_globals`, recognised
    /// global names are never imported.
    pub fn ensure_import(
        &mut self,
        identifier: &str,
        from: Option<&str>,
        check_globals: bool,
    ) -> Result<(), EmitError> {
        if identifier.contains('.') {
            warn!(identifier, "importing a qualified name, expected a plain identifier");
        }
        if check_globals && self.options.remap.is_global(identifier) {
            return Ok(());
        }
        if self.scopes.find_in_root(identifier).is_some() {
            return Ok(());
        }
        if declares_class(self.source, identifier)? {
            return Ok(());
        }

        let source = from.map_or_else(|| format!("./{identifier}"), str::to_string);
        debug!(identifier, source = %source, "queueing import");
        self.imports.push(ImportStatement::new(identifier, source));
        self.scopes.declare_in_root(Declaration::new(identifier))
    }
}

#[cfg(test)]
#[path = "../../tests/imports.rs"]
mod tests;
