//! Application error type.
//!
//! Every failure carries an [`ErrorKind`] (which decides the process exit code)
//! and a human-readable message that `main` prints verbatim.

/// Broad failure categories surfaced by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad CLI values or bucket specifications.
    InvalidConfig,
    /// File open/create/write failures.
    Io,
    /// The macro file lacks `Date` or a column the analysis refers to.
    MissingColumn,
    /// Input parsed but is unusable (no rows, duplicate dates, bad cache).
    InvalidData,
    /// The price source returned nothing or failed.
    DataUnavailable,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::InvalidConfig | ErrorKind::Io | ErrorKind::MissingColumn => 2,
            ErrorKind::InvalidData => 3,
            ErrorKind::DataUnavailable => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidConfig, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn missing_column(column: &str) -> Self {
        Self::new(
            ErrorKind::MissingColumn,
            format!("Missing required column: `{column}`"),
        )
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidData, message)
    }

    pub fn data_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DataUnavailable, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
