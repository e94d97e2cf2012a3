//! Errors for the fallible edges of the crate: reading parameters, writing reports and
//! configuring the logger. Generation and simulation themselves never fail.

use std::fmt::{self, Display};
use std::io;

#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum HandshakeError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CsvError(csv::Error),
    LoggerError(String),
    ParameterError(String),
}

impl From<io::Error> for HandshakeError {
    fn from(error: io::Error) -> Self {
        HandshakeError::IoError(error)
    }
}

impl From<serde_json::Error> for HandshakeError {
    fn from(error: serde_json::Error) -> Self {
        HandshakeError::JsonError(error)
    }
}

impl From<csv::Error> for HandshakeError {
    fn from(error: csv::Error) -> Self {
        HandshakeError::CsvError(error)
    }
}

impl From<log::SetLoggerError> for HandshakeError {
    fn from(error: log::SetLoggerError) -> Self {
        HandshakeError::LoggerError(error.to_string())
    }
}

impl From<String> for HandshakeError {
    fn from(message: String) -> Self {
        HandshakeError::ParameterError(message)
    }
}

impl From<&str> for HandshakeError {
    fn from(message: &str) -> Self {
        HandshakeError::ParameterError(message.to_string())
    }
}

impl std::error::Error for HandshakeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HandshakeError::IoError(error) => Some(error),
            HandshakeError::JsonError(error) => Some(error),
            HandshakeError::CsvError(error) => Some(error),
            _ => None,
        }
    }
}

impl Display for HandshakeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandshakeError::IoError(error) => write!(f, "I/O error: {error}"),
            HandshakeError::JsonError(error) => write!(f, "JSON error: {error}"),
            HandshakeError::CsvError(error) => write!(f, "CSV error: {error}"),
            HandshakeError::LoggerError(message) => write!(f, "logger error: {message}"),
            HandshakeError::ParameterError(message) => write!(f, "parameter error: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn io_errors_keep_their_source() {
        let error: HandshakeError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert!(matches!(error, HandshakeError::IoError(_)));
        assert!(error.source().is_some());
        assert_eq!(error.to_string(), "I/O error: missing");
    }

    #[test]
    fn parameter_errors_from_strings() {
        let error = HandshakeError::from("degree too large");
        assert_eq!(error.to_string(), "parameter error: degree too large");
        assert!(error.source().is_none());
    }
}
