//! CLI module.
//!
//! Argument parsing and command dispatch for the `semcompare` binary.

pub mod args;
pub mod commands;

pub use args::{Backend, Cli, Commands};
