//! Built-in remap tables.
//!
//! The tables are plain data. `RemapTables` owns a copy so front ends can
//! extend or replace entries through `EmitterOptions` without touching any
//! process-wide state.

use rustc_hash::{FxHashMap, FxHashSet};

/// Names that exist in the target runtime and never need an import.
pub const GLOBAL_NAMES: &[&str] = &[
    "undefined",
    "NaN",
    "Infinity",
    "Array",
    "Boolean",
    "decodeURI",
    "decodeURIComponent",
    "encodeURI",
    "encodeURIComponent",
    "escape",
    "int",
    "isFinite",
    "isNaN",
    "isXMLName",
    "Number",
    "Object",
    "parseFloat",
    "parseInt",
    "String",
    "trace",
    "uint",
    "unescape",
    "Vector",
    "arguments",
    "Class",
    "Date",
    "Function",
    "Math",
    "RegExp",
    "JSON",
    "Error",
    "EvalError",
    "RangeError",
    "ReferenceError",
    "SyntaxError",
    "TypeError",
    "URIError",
    "Element",
    "DOMParser",
    "Document",
    "Node",
    "Attr",
];

/// Source type name to target type name.
pub const TYPE_REMAP: &[(&str, &str)] = &[
    ("Class", "any"),
    ("Object", "any"),
    ("String", "string"),
    ("Boolean", "boolean"),
    ("Number", "number"),
    ("int", "number"),
    ("uint", "number"),
    ("*", "any"),
    ("Array", "any[]"),
    ("Dictionary", "Object"),
    // Error types the target runtime lacks.
    ("ArgumentError", "Error"),
    ("DefinitionError", "Error"),
    ("SecurityError", "Error"),
    ("VerifyError", "Error"),
];

/// Source identifier to target identifier, for value positions.
pub const IDENTIFIER_REMAP: &[(&str, &str)] = &[
    ("Dictionary", "Object"),
    ("ArgumentError", "Error"),
    ("DefinitionError", "Error"),
    ("SecurityError", "Error"),
    ("VerifyError", "Error"),
];

#[derive(Clone, Debug)]
pub struct RemapTables {
    pub global_names: FxHashSet<String>,
    pub type_remap: FxHashMap<String, String>,
    /// Every target of `type_remap`, plus `void`. A type written with one of
    /// these names is already in target form.
    pub type_remap_values: FxHashSet<String>,
    pub identifier_remap: FxHashMap<String, String>,
}

impl RemapTables {
    pub fn builtin() -> RemapTables {
        let type_remap: FxHashMap<String, String> = TYPE_REMAP
            .iter()
            .map(|&(from, to)| (from.to_string(), to.to_string()))
            .collect();
        let mut type_remap_values: FxHashSet<String> = type_remap.values().cloned().collect();
        type_remap_values.insert("void".to_string());

        RemapTables {
            global_names: GLOBAL_NAMES.iter().map(|name| name.to_string()).collect(),
            type_remap,
            type_remap_values,
            identifier_remap: IDENTIFIER_REMAP
                .iter()
                .map(|&(from, to)| (from.to_string(), to.to_string()))
                .collect(),
        }
    }

    pub fn is_global(&self, name: &str) -> bool {
        self.global_names.contains(name)
    }

    pub fn remap_type(&self, name: &str) -> Option<&str> {
        self.type_remap.get(name).map(String::as_str)
    }

    pub fn is_remapped_type(&self, name: &str) -> bool {
        self.type_remap.contains_key(name)
    }

    pub fn is_target_type(&self, name: &str) -> bool {
        self.type_remap_values.contains(name)
    }

    pub fn remap_identifier(&self, name: &str) -> Option<&str> {
        self.identifier_remap.get(name).map(String::as_str)
    }
}

impl Default for RemapTables {
    fn default() -> Self {
        RemapTables::builtin()
    }
}

#[cfg(test)]
#[path = "../tests/remap.rs"]
mod tests;
