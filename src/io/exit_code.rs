//! Process exit codes.

/// Exit codes returned by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Results were produced
    Success = 0,
    /// The command ran but nothing matched
    NotFound = 1,
    /// Runtime failure
    GeneralError = 2,
    /// Settings could not be loaded or written
    ConfigError = 3,
    /// The corpus could not be loaded
    CorpusError = 4,
    /// The semantic backend could not be initialized
    BackendError = 5,
}

impl ExitCode {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code.code())
    }
}
