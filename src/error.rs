//! Error types for the searchgate library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`SearchgateError`] enum. Query parsing is deliberately absent from this
//! enum: the free-text parser always produces a value (unrecognized words
//! degrade to literal text parameters), so it has no error path at all.
//!
//! # Examples
//!
//! ```
//! use searchgate::error::{Result, SearchgateError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(SearchgateError::unknown_filter("no-such-filter"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use anyhow;
use thiserror::Error;

use crate::backend::CallDump;

/// The main error type for searchgate operations.
///
/// Token, provider and backend failures are strict: they abort the request
/// with the corresponding variant. The caller decides how to surface them
/// (the token variant maps naturally to an authorization failure, the
/// execution variant to a server-side failure).
#[derive(Error, Debug)]
pub enum SearchgateError {
    /// I/O errors (filter/sort template files, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// The requested namespace is not configured
    #[error("Unknown namespace: {0}")]
    UnknownNamespace(String),

    /// The referenced filter id is unknown for the namespace
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    /// The referenced sorting id is unknown for the namespace
    #[error("Unknown sorting: {0}")]
    UnknownSorting(String),

    /// Index mapping retrieval errors
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// Search token absent, malformed, forged or bound to another namespace
    #[error("Invalid search token: {0}")]
    InvalidToken(String),

    /// The backend search call failed; carries a dump of the failed call
    /// for operator diagnosis
    #[error("Search execution error: {message}")]
    SearchExecution {
        /// What went wrong.
        message: String,
        /// Request/response dump of the failed call, when available.
        dump: Option<CallDump>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with SearchgateError.
pub type Result<T> = std::result::Result<T, SearchgateError>;

impl SearchgateError {
    /// Create a new config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        SearchgateError::Config(msg.into())
    }

    /// Create a new unknown namespace error.
    pub fn unknown_namespace<S: Into<String>>(ns: S) -> Self {
        SearchgateError::UnknownNamespace(ns.into())
    }

    /// Create a new unknown filter error.
    pub fn unknown_filter<S: Into<String>>(id: S) -> Self {
        SearchgateError::UnknownFilter(id.into())
    }

    /// Create a new unknown sorting error.
    pub fn unknown_sorting<S: Into<String>>(id: S) -> Self {
        SearchgateError::UnknownSorting(id.into())
    }

    /// Create a new mapping error.
    pub fn mapping<S: Into<String>>(msg: S) -> Self {
        SearchgateError::Mapping(msg.into())
    }

    /// Create a new invalid token error.
    pub fn invalid_token<S: Into<String>>(msg: S) -> Self {
        SearchgateError::InvalidToken(msg.into())
    }

    /// Create a new search execution error without a call dump.
    pub fn execution<S: Into<String>>(msg: S) -> Self {
        SearchgateError::SearchExecution {
            message: msg.into(),
            dump: None,
        }
    }

    /// Create a new search execution error carrying a dump of the failed call.
    pub fn execution_with_dump<S: Into<String>>(msg: S, dump: CallDump) -> Self {
        SearchgateError::SearchExecution {
            message: msg.into(),
            dump: Some(dump),
        }
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SearchgateError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = SearchgateError::unknown_filter("from5to15");
        assert_eq!(error.to_string(), "Unknown filter: from5to15");

        let error = SearchgateError::invalid_token("signature mismatch");
        assert_eq!(
            error.to_string(),
            "Invalid search token: signature mismatch"
        );

        let error = SearchgateError::mapping("schema fetch failed");
        assert_eq!(error.to_string(), "Mapping error: schema fetch failed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let gate_error = SearchgateError::from(io_error);

        match gate_error {
            SearchgateError::Io(_) => {}
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_execution_error_keeps_dump() {
        let dump = CallDump {
            request: serde_json::json!({"from": 0, "size": 10}),
            response: Some("boom".to_string()),
            status: Some(500),
        };
        let error = SearchgateError::execution_with_dump("backend call failed", dump);

        match error {
            SearchgateError::SearchExecution { dump: Some(d), .. } => {
                assert_eq!(d.status, Some(500));
            }
            _ => panic!("Expected execution error with dump"),
        }
    }
}
