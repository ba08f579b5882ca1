//! Command-line front end for the as3ts emitter.
//!
//! Parsing is done by an external tool that writes its tree as JSON next to
//! each source file (`Main.as` → `Main.as.ast.json`). This crate loads both,
//! configures the emitter and writes the TypeScript.

pub mod args;
pub mod driver;
pub mod tracing_config;

#[cfg(test)]
#[path = "../tests/args_tests.rs"]
mod args_tests;
#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod driver_tests;
