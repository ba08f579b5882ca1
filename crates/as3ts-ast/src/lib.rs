//! AST model for the as3ts transpiler.
//!
//! The tree is produced by an external parser and handed to the emitter as an
//! arena of nodes:
//! - `NodeKind` - closed set of syntactic constructs
//! - `SyntaxTree` / `Node` / `NodeIndex` - arena storage with parent links
//! - `TreeBuilder` - span-checked construction for tools and tests
//! - `RawNode` - the nested JSON shape external parsers serialize

pub mod builder;
pub mod error;
pub mod json;
pub mod node_kind;
pub mod tree;

pub use builder::TreeBuilder;
pub use error::TreeError;
pub use json::RawNode;
pub use node_kind::NodeKind;
pub use tree::{Ancestors, Node, NodeIndex, SyntaxTree};
