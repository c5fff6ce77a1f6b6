//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("{0}")]
    Usage(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Application(e) => match e {
                ApplicationError::Domain(d) => match d {
                    DomainError::FileNotFound(_) => crate::exitcode::NOINPUT,
                    DomainError::Parse { .. } | DomainError::Schema { .. } => {
                        crate::exitcode::DATAERR
                    }
                },
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn given_missing_input_error_then_exit_code_is_noinput() {
        let err = CliError::Application(DomainError::FileNotFound(PathBuf::from("x.lift")).into());
        assert_eq!(err.exit_code(), crate::exitcode::NOINPUT);
    }

    #[test]
    fn given_parse_error_then_exit_code_is_dataerr() {
        let err = CliError::Application(
            DomainError::Parse {
                path: PathBuf::from("x.lift"),
                message: "broken".into(),
            }
            .into(),
        );
        assert_eq!(err.exit_code(), crate::exitcode::DATAERR);
    }
}
