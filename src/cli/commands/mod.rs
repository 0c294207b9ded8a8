//! Command implementations for the CLI.
//!
//! Each command is implemented in its own module.

pub mod context;
pub mod init;
pub mod search;
#[cfg(feature = "http-server")]
pub mod serve;
pub mod verify;
