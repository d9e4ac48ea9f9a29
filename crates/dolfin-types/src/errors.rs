//! Error types for dolfin operations.

use thiserror::Error;

/// The main error type for dolfin operations.
///
/// Parse errors from the underlying document formats are carried unmodified
/// so callers can inspect line and column information.
#[derive(Error, Debug)]
pub enum DolfinError {
    /// A configuration file path was supplied but does not exist.
    ///
    /// `location` is either `current directory` or `directory '<dir>'`.
    #[error("Config file '{file}' not found in {location}")]
    ConfigNotFound {
        /// Base name of the missing file
        file: String,
        /// Human-readable description of where the file was expected
        location: String,
    },

    /// An argument of the wrong shape was supplied
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Command-line arguments could not be parsed
    #[error("{0}")]
    Usage(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for dolfin operations.
pub type Result<T> = std::result::Result<T, DolfinError>;

/// A user-facing error raised by a command handler.
///
/// Command runners catch this error exactly once, print it to stderr
/// prefixed with `Error: `, and terminate with a non-zero status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CommandError {
    message: String,
}

impl CommandError {
    /// Create a new command error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The message shown to the user.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<DolfinError> for CommandError {
    fn from(err: DolfinError) -> Self {
        Self::new(err.to_string())
    }
}

/// Helper macro to bail out with a DolfinError
///
/// This is used for expected error conditions.
///
/// # Example
///
/// ```ignore
/// if !source.is_object() {
///     bail!(InvalidArgument, "expected a mapping, got {}", source);
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($variant:ident, $msg:expr) => {
        return Err($crate::DolfinError::$variant($msg.to_string()))
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::DolfinError::$variant(format!($fmt, $($arg)*)))
    };
    ($msg:expr) => {
        return Err($crate::DolfinError::Other($msg.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::DolfinError::Other(format!($fmt, $($arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reject(flag: bool) -> Result<()> {
        if flag {
            bail!(InvalidArgument, "bad value {}", 42);
        }
        Ok(())
    }

    #[test]
    fn test_config_not_found_message() {
        let err = DolfinError::ConfigNotFound {
            file: "app.json".to_string(),
            location: "current directory".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Config file 'app.json' not found in current directory"
        );
    }

    #[test]
    fn test_bail_macro() {
        assert!(reject(false).is_ok());
        let err = reject(true).unwrap_err();
        assert!(matches!(err, DolfinError::InvalidArgument(ref m) if m == "bad value 42"));
    }

    #[test]
    fn test_command_error_from_dolfin_error() {
        let err: CommandError = DolfinError::Other("boom".to_string()).into();
        assert_eq!(err.message(), "boom");
        assert_eq!(err.to_string(), "boom");
    }
}
