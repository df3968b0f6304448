//! All error types for the langtable crate.
//!
//! These are returned from all fallible operations (path parsing, decoding,
//! encoding, store access and import reconciliation).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown format `{0}`")]
    UnknownFormat(String),

    #[error("invalid path `{0}`: segments must be non-empty")]
    InvalidPath(String),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("value at `{path}` must be a string, found {found}")]
    ValueTypeError { path: String, found: String },

    #[error("failed to reconcile `{file}` [{language}]: {message}")]
    Reconciliation {
        file: String,
        language: String,
        message: String,
    },

    #[error("translation store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new malformed input error
    pub fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedInput(message.into())
    }

    /// Creates a new invalid path error for the offending path text
    pub fn invalid_path(path: impl Into<String>) -> Self {
        Error::InvalidPath(path.into())
    }

    /// Creates a new value type error
    pub fn value_type(path: impl Into<String>, found: impl Into<String>) -> Self {
        Error::ValueTypeError {
            path: path.into(),
            found: found.into(),
        }
    }

    /// Whether this error must stop an import instead of being recorded
    /// against a single group.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::StoreUnavailable(_))
    }
}

impl From<calamine::XlsxError> for Error {
    fn from(value: calamine::XlsxError) -> Self {
        Error::Spreadsheet(value.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(value: rust_xlsxwriter::XlsxError) -> Self {
        Error::Spreadsheet(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_unknown_format_error() {
        let error = Error::UnknownFormat("invalid_format".to_string());
        assert_eq!(error.to_string(), "unknown format `invalid_format`");
    }

    #[test]
    fn test_invalid_path_error() {
        let error = Error::invalid_path("a..b");
        assert_eq!(
            error.to_string(),
            "invalid path `a..b`: segments must be non-empty"
        );
    }

    #[test]
    fn test_malformed_input_error() {
        let error = Error::malformed("row 3 has 2 columns, header has 4");
        assert_eq!(
            error.to_string(),
            "malformed input: row 3 has 2 columns, header has 4"
        );
    }

    #[test]
    fn test_value_type_error() {
        let error = Error::value_type("messages.count", "number");
        assert_eq!(
            error.to_string(),
            "value at `messages.count` must be a string, found number"
        );
    }

    #[test]
    fn test_reconciliation_error() {
        let error = Error::Reconciliation {
            file: "messages".to_string(),
            language: "fr".to_string(),
            message: "disk full".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "failed to reconcile `messages` [fr]: disk full"
        );
    }

    #[test]
    fn test_parse_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("{ invalid json }").unwrap_err();
        let error = Error::Parse(json_error);
        assert!(error.to_string().contains("parse error"));
    }

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_only_store_unavailable_is_fatal() {
        assert!(Error::StoreUnavailable("gone".to_string()).is_fatal());
        assert!(!Error::malformed("x").is_fatal());
        assert!(
            !Error::Reconciliation {
                file: "f".to_string(),
                language: "en".to_string(),
                message: "m".to_string(),
            }
            .is_fatal()
        );
    }

    #[test]
    fn test_error_debug() {
        let error = Error::UnknownFormat("test".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("UnknownFormat"));
        assert!(debug.contains("test"));
    }
}
