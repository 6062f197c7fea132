use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("column '{column}' has {found} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("column '{column}': expected {expected}, found {found}")]
    Type {
        column: String,
        expected: &'static str,
        found: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Internal invariant failed: {0}")]
    Invariant(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
