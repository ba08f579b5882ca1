use as3ts_ast::{NodeKind, TreeError};
use thiserror::Error;

/// Fatal conditions that abort emission of a compilation unit.
///
/// No partial output is produced once one of these is returned.
#[derive(Debug, Error)]
pub enum EmitError {
    /// The input combines constructs the rewrite rules do not model.
    #[error("unsupported {kind} at {start}..{end}: {reason}")]
    Unsupported {
        kind: NodeKind,
        start: u32,
        end: u32,
        reason: String,
    },

    /// A handler tried to move the cursor somewhere it cannot go.
    #[error("cursor misuse at offset {index}: {reason}")]
    CursorMisuse { index: u32, reason: String },

    /// Scopes were not entered and exited in strict nesting order.
    #[error("scope mismatch: {0}")]
    ScopeMismatch(String),

    /// A node does not have the child shape its handler requires.
    #[error("malformed {kind} at {start}..{end}: {reason}")]
    MalformedTree {
        kind: NodeKind,
        start: u32,
        end: u32,
        reason: String,
    },

    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Tree(#[from] TreeError),
}
