//! CLI-specific error types and exit code mapping

use omniprobe_core::error::{OmniprobeError, QueryError, ScenarioError, SelectionError};

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// Scenario file or registry problem.
    #[error("scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    /// The resolved scenario selection was empty.
    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),

    /// The query service client could not be constructed.
    #[error("query service error: {0}")]
    Query(#[from] QueryError),

    /// The tracing subscriber could not be installed.
    #[error("logging error: {0}")]
    Logging(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (file read, stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                                   |
    /// |------|-------------------------------------------|
    /// | 0    | Success                                   |
    /// | 1    | Empty selection, scenario or other error  |
    /// | 2    | Configuration error                       |
    /// | 10   | IO error                                  |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Io(_) => 10,
            Self::Scenario(_)
            | Self::Selection(_)
            | Self::Query(_)
            | Self::Logging(_)
            | Self::JsonSerialize(_) => 1,
        }
    }
}

impl From<OmniprobeError> for CliError {
    fn from(e: OmniprobeError) -> Self {
        match e {
            OmniprobeError::Config(e) => Self::Config(e.to_string()),
            OmniprobeError::Query(e) => Self::Query(e),
            OmniprobeError::Scenario(e) => Self::Scenario(e),
            OmniprobeError::Selection(e) => Self::Selection(e),
            OmniprobeError::Io(e) => Self::Io(e),
        }
    }
}
