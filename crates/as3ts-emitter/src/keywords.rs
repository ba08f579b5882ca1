//! Reserved words of the source language.

pub const CONST: &str = "const";
pub const EACH: &str = "each";
pub const FOR: &str = "for";
pub const FUNCTION: &str = "function";
pub const IMPORT: &str = "import";
pub const IN: &str = "in";
pub const INSTANCE_OF: &str = "instanceof";
pub const PACKAGE: &str = "package";
pub const PRIVATE: &str = "private";
pub const PROTECTED: &str = "protected";
pub const PUBLIC: &str = "public";
pub const STATIC: &str = "static";
pub const SUPER: &str = "super";
pub const VAR: &str = "var";

/// Operator tokens the handlers compare against.
pub const COLON: &str = ":";
pub const EQUAL: &str = "=";
pub const PLUS: &str = "+";
pub const PLUS_EQUAL: &str = "+=";
pub const DOUBLE_AND_EQUAL: &str = "&&=";
pub const DOUBLE_OR_EQUAL: &str = "||=";
pub const LEFT_CURLY_BRACKET: char = '{';

const KEYWORDS: &[&str] = &[
    "as",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "default",
    "delete",
    "do",
    "dynamic",
    "each",
    "else",
    "extends",
    "false",
    "final",
    "finally",
    "for",
    "function",
    "get",
    "if",
    "implements",
    "import",
    "in",
    "include",
    "instanceof",
    "interface",
    "internal",
    "is",
    "namespace",
    "native",
    "new",
    "null",
    "override",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "set",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "to",
    "true",
    "try",
    "typeof",
    "use",
    "var",
    "void",
    "while",
    "with",
];

pub fn is_keyword(text: &str) -> bool {
    KEYWORDS.contains(&text)
}
