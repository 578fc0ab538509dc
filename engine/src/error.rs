use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// A raw row is missing a required field or carries a malformed one.
    /// `row` is 1-based in input order.
    #[error("Validation error at row {row}: {message}")]
    Validation { row: usize, message: String },

    #[error("Empty series: no price rows supplied")]
    EmptySeries,

    #[error("Invalid window {window}: {reason}")]
    InvalidWindow { window: usize, reason: String },

    #[error("Unknown indicator type: {0}")]
    UnknownIndicator(String),

    #[error("Invalid indicator parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    pub(crate) fn validation(row: usize, message: impl Into<String>) -> Self {
        EngineError::Validation { row, message: message.into() }
    }

    pub(crate) fn invalid_window(window: usize, reason: impl Into<String>) -> Self {
        EngineError::InvalidWindow { window, reason: reason.into() }
    }

    /// Insufficient history for a window in strict mode.
    pub(crate) fn insufficient_history(window: usize, required: usize, available: usize) -> Self {
        EngineError::InvalidWindow {
            window,
            reason: format!("requires {} points, series has {}", required, available),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            EngineError::validation(3, "missing 'close'").to_string(),
            "Validation error at row 3: missing 'close'"
        );
        assert_eq!(EngineError::EmptySeries.to_string(), "Empty series: no price rows supplied");
        assert_eq!(
            EngineError::insufficient_history(20, 20, 5).to_string(),
            "Invalid window 20: requires 20 points, series has 5"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: EngineError = io.into();
        assert!(matches!(err, EngineError::Io { .. }));
    }
}
