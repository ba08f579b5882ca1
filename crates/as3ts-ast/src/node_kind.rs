//! Node kinds of the ActionScript grammar.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

macro_rules! node_kinds {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// Syntactic construct tag carried by every AST node.
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum NodeKind {
            $($variant,)+
        }

        impl NodeKind {
            /// Every kind, in declaration order.
            pub const ALL: &'static [NodeKind] = &[$(NodeKind::$variant,)+];

            /// Canonical upper-case name, as used by the parser's JSON output.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(NodeKind::$variant => $name,)+
                }
            }

            /// Parse a canonical name back into a kind.
            pub fn from_name(name: &str) -> Option<NodeKind> {
                match name {
                    $($name => Some(NodeKind::$variant),)+
                    _ => None,
                }
            }
        }
    };
}

node_kinds! {
    Add => "ADD",
    And => "AND",
    Arguments => "ARGUMENTS",
    Array => "ARRAY",
    ArrayAccessor => "ARRAY_ACCESSOR",
    As => "AS",
    AsDoc => "AS_DOC",
    Assign => "ASSIGN",
    BAnd => "B_AND",
    BNot => "B_NOT",
    BOr => "B_OR",
    BXor => "B_XOR",
    Block => "BLOCK",
    Break => "BREAK",
    Call => "CALL",
    Case => "CASE",
    Cases => "CASES",
    Catch => "CATCH",
    Class => "CLASS",
    CompilationUnit => "COMPILATION_UNIT",
    Cond => "COND",
    Condition => "CONDITION",
    Conditional => "CONDITIONAL",
    Const => "CONST",
    ConstList => "CONST_LIST",
    Content => "CONTENT",
    Continue => "CONTINUE",
    Default => "DEFAULT",
    Delete => "DELETE",
    Do => "DO",
    Dot => "DOT",
    E4xAttr => "E4X_ATTR",
    E4xAttrArrayAccess => "E4X_ATTR_ARRAY_ACCESS",
    E4xFilter => "E4X_FILTER",
    E4xStar => "E4X_STAR",
    Encapsulated => "ENCAPSULATED",
    Equality => "EQUALITY",
    ExprList => "EXPR_LIST",
    Extends => "EXTENDS",
    Finally => "FINALLY",
    For => "FOR",
    ForEach => "FOREACH",
    ForIn => "FORIN",
    Function => "FUNCTION",
    Get => "GET",
    If => "IF",
    Implements => "IMPLEMENTS",
    ImplementsList => "IMPLEMENTS_LIST",
    Import => "IMPORT",
    In => "IN",
    Include => "INCLUDE",
    Init => "INIT",
    Interface => "INTERFACE",
    Is => "IS",
    Iter => "ITER",
    Label => "LABEL",
    Lambda => "LAMBDA",
    LeftCurlyBracket => "LEFT_CURLY_BRACKET",
    Meta => "META",
    MetaList => "META_LIST",
    Minus => "MINUS",
    ModList => "MOD_LIST",
    Modifier => "MODIFIER",
    MultiLineComment => "MULTI_LINE_COMMENT",
    Multiplication => "MULTIPLICATION",
    Name => "NAME",
    NameTypeInit => "NAME_TYPE_INIT",
    New => "NEW",
    Not => "NOT",
    Object => "OBJECT",
    Op => "OP",
    Or => "OR",
    Package => "PACKAGE",
    Parameter => "PARAMETER",
    ParameterList => "PARAMETER_LIST",
    Plus => "PLUS",
    PostDec => "POST_DEC",
    PostInc => "POST_INC",
    PreDec => "PRE_DEC",
    PreInc => "PRE_INC",
    Prop => "PROP",
    Relation => "RELATION",
    Rest => "REST",
    Return => "RETURN",
    Set => "SET",
    Shift => "SHIFT",
    Star => "STAR",
    StmtEmpty => "STMT_EMPTY",
    Switch => "SWITCH",
    SwitchBlock => "SWITCH_BLOCK",
    Try => "TRY",
    Type => "TYPE",
    Typeof => "TYPEOF",
    Use => "USE",
    Value => "VALUE",
    Var => "VAR",
    VarList => "VAR_LIST",
    Vector => "VECTOR",
    ShortVector => "SHORT_VECTOR",
    Void => "VOID",
    While => "WHILE",
    XmlLiteral => "XML_LITERAL",
    Literal => "LITERAL",
    Identifier => "IDENTIFIER",
    Embed => "EMBED",
}

impl NodeKind {
    /// Comment nodes carry no semantics; the emitter drops them and lets
    /// their text flow through verbatim.
    pub const fn is_comment(self) -> bool {
        matches!(self, NodeKind::AsDoc | NodeKind::MultiLineComment)
    }

    /// Member access shapes: `a.b` and `a[b]`.
    pub const fn is_accessor(self) -> bool {
        matches!(self, NodeKind::Dot | NodeKind::ArrayAccessor)
    }

    /// Shapes that only exist for E4X values.
    pub const fn is_e4x_access(self) -> bool {
        matches!(
            self,
            NodeKind::E4xAttr
                | NodeKind::E4xAttrArrayAccess
                | NodeKind::E4xStar
                | NodeKind::E4xFilter
        )
    }

    pub const fn is_function_like(self) -> bool {
        matches!(self, NodeKind::Function | NodeKind::Lambda)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NodeKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        NodeKind::from_name(&name)
            .ok_or_else(|| de::Error::custom(format!("unknown node kind `{name}`")))
    }
}

#[cfg(test)]
#[path = "../tests/node_kind.rs"]
mod tests;
