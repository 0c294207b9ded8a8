//! Output handling for the CLI.
//!
//! - Unified JSON envelope for `--json`
//! - Exit codes

pub mod envelope;
pub mod exit_code;

pub use envelope::{EntityType, Envelope, ErrorDetails, MessageType, Meta, ResultCode, Status};
pub use exit_code::ExitCode;
