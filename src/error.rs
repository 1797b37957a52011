//! Error types for cidrbucket.

use thiserror::Error;

/// Error type for cidrbucket operations.
///
/// Parse errors are per-line and recoverable: loaders log them and move on.
/// Building and querying a [`RangeIndex`](crate::RangeIndex) never fails.
#[derive(Error, Debug)]
pub enum Error {
    /// Text is not four dot-separated decimal octets in 0..=255
    #[error("malformed IPv4 address: {0:?}")]
    MalformedAddress(String),

    /// Text is not `<address>/<prefix>` with a prefix in 0..=32
    #[error("malformed CIDR: {0:?}")]
    MalformedCidr(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error describes a single bad input line rather than
    /// a failure of the surrounding I/O.
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Error::MalformedAddress(_) | Error::MalformedCidr(_))
    }
}

/// Result type alias for cidrbucket operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_quotes_offending_text() {
        let err = Error::MalformedCidr("10.0.0.0/33".to_string());
        assert_eq!(err.to_string(), "malformed CIDR: \"10.0.0.0/33\"");
    }

    #[test]
    fn test_malformed_input_classification() {
        assert!(Error::MalformedAddress("x".into()).is_malformed_input());
        assert!(Error::MalformedCidr("x".into()).is_malformed_input());
        assert!(!Error::Config("x".into()).is_malformed_input());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(!Error::from(io).is_malformed_input());
    }
}
