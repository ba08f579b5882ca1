//! Emission engine for the as3ts transpiler.
//!
//! The engine walks a parsed ActionScript tree and rebuilds the source as
//! TypeScript by copying untouched spans verbatim and splicing replacement
//! text where semantics differ.
//!
//! - `emitter` - cursor/output buffer, scope chain, import synthesis, the
//!   dispatcher and the built-in handler for every node kind
//! - `plugin` - the interception protocol rewriting passes are built on
//! - `plugins` - bundled passes (E4X emulation, autobind, super properties)
//! - `remap` - built-in type/identifier remap tables
//! - `keywords` - reserved words of the source language

pub mod emitter;
pub mod error;
pub mod keywords;
pub mod options;
pub mod plugin;
pub mod plugins;
pub mod remap;

pub use emitter::cursor::{Chunk, ChunkOrigin, OutputBuffer};
pub use emitter::imports::ImportStatement;
pub use emitter::scope::{Declaration, ScopeChain, ScopeId};
pub use emitter::{Emitter, TraversalContext, emit};
pub use error::EmitError;
pub use options::{EmitterOptions, OutputShape};
pub use plugin::{ImportRewrite, Plugin};
pub use remap::RemapTables;
