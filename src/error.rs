use thiserror::Error;

/// Pedometer error types
#[derive(Error, Debug)]
pub enum PedometerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for pedometer operations
pub type Result<T> = std::result::Result<T, PedometerError>;

impl PedometerError {
    /// True for errors caused by the caller's data or options, as opposed to
    /// failures reading a recording.
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            PedometerError::InvalidInput(_) | PedometerError::InvalidConfig(_)
        )
    }
}
