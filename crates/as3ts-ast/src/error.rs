use crate::node_kind::NodeKind;
use thiserror::Error;

/// Errors raised while loading or validating a syntax tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The parser's JSON output could not be decoded.
    #[error("invalid AST JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("node {index} ({kind}) has an inverted range {start}..{end}")]
    InvertedRange {
        index: u32,
        kind: NodeKind,
        start: u32,
        end: u32,
    },

    #[error(
        "node {index} ({kind}) range {start}..{end} escapes its parent range {parent_start}..{parent_end}"
    )]
    ChildOutsideParent {
        index: u32,
        kind: NodeKind,
        start: u32,
        end: u32,
        parent_start: u32,
        parent_end: u32,
    },

    #[error("node {index} ({kind}) ends at {end}, past the end of the source ({len} bytes)")]
    PastEndOfSource {
        index: u32,
        kind: NodeKind,
        end: u32,
        len: usize,
    },

    /// A builder lookup did not find its needle in the source text.
    #[error("`{needle}` (occurrence {occurrence}) not found in source")]
    NeedleNotFound { needle: String, occurrence: usize },

    #[error("tree has no root node")]
    MissingRoot,
}
