use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoutineError {
    /// Reading, writing or authenticating against the spreadsheet failed. No
    /// enrichment was persisted.
    #[error("Spreadsheet operation failed: {details}")]
    SpreadsheetFailure { details: String },
    #[error("Routine failed: {details}")]
    RoutineFailure { details: String },
}

impl RoutineError {
    pub fn spreadsheet_failure<S: Into<String>>(details: S) -> Self {
        RoutineError::SpreadsheetFailure {
            details: details.into(),
        }
    }

    pub fn routine_failure<S: Into<String>>(details: S) -> Self {
        RoutineError::RoutineFailure {
            details: details.into(),
        }
    }
}

/// A unit of work run once per process invocation.
#[async_trait::async_trait]
pub trait Routine: Send + Sync {
    type Output: Send;

    fn name(&self) -> &str;

    async fn run(&self) -> error_stack::Result<Self::Output, RoutineError>;
}
