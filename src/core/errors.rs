use std::result::Result as StdResult;

use thiserror::Error;

/// Unified error type for the domain, storage and calculation layers.
#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Entry not found: {0}")]
    EntryNotFound(String),
    #[error("Settings error: {0}")]
    SettingsError(String),
}

pub type Result<T> = StdResult<T, BudgetError>;

/// Failures that end the command shell itself rather than a single command.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl BudgetError {
    pub fn invalid(message: impl Into<String>) -> Self {
        BudgetError::InvalidInput(message.into())
    }

    /// True for errors raised before any data reached the store.
    pub fn is_validation(&self) -> bool {
        matches!(self, BudgetError::InvalidInput(_))
    }
}

impl From<std::io::Error> for BudgetError {
    fn from(err: std::io::Error) -> Self {
        BudgetError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetError {
    fn from(err: serde_json::Error) -> Self {
        BudgetError::SerializationError(err.to_string())
    }
}

impl From<csv::Error> for BudgetError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            BudgetError::StorageError(err.to_string())
        } else {
            BudgetError::SerializationError(err.to_string())
        }
    }
}

impl<W> From<csv::IntoInnerError<W>> for BudgetError {
    fn from(err: csv::IntoInnerError<W>) -> Self {
        BudgetError::SerializationError(err.error().to_string())
    }
}
