use std::io;
use thiserror::Error;

/// Unified error type for every pxutil helper
#[derive(Error, Debug)]
pub enum PxError {
    /// The remote API answered but the answer was unusable
    #[error("API error: {0}")]
    Api(String),

    /// Transport-level HTTP failures (connect, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Status code outside the accepted set
    #[error("request failed with response code {status}")]
    HttpStatus { status: u16, body: String },

    /// Response or payload was not valid JSON
    #[error("JSON error: {0}")]
    Json(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// Command execution errors
    #[error("Execution error: {0}")]
    Execution(String),

    /// A required external program is not on PATH
    #[error("{0} command not found, please install it first")]
    MissingTool(String),

    #[error("invalid duration {0:?}, expected e.g. 30s, 15m, 2h, 2d or 1w")]
    InvalidDuration(String),

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Source files that do not parse
    #[error("Parse error: {0}")]
    Parse(String),

    /// Chat completion failures, wrapping the underlying cause
    #[error("Chat API request failed: {0}")]
    Chat(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl From<reqwest::Error> for PxError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PxError::Http(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            PxError::Http(format!("Connection failed: {}", err))
        } else if err.is_decode() {
            PxError::Json(format!("Failed to decode response body: {}", err))
        } else {
            PxError::Http(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for PxError {
    fn from(err: serde_json::Error) -> Self {
        PxError::Json(err.to_string())
    }
}

impl From<serde_yml::Error> for PxError {
    fn from(err: serde_yml::Error) -> Self {
        PxError::Config(format!("YAML error: {}", err))
    }
}

impl From<ignore::Error> for PxError {
    fn from(err: ignore::Error) -> Self {
        let message = err.to_string();
        match err.into_io_error() {
            Some(io_err) => PxError::Io { source: io_err },
            None => PxError::Input(message),
        }
    }
}

impl From<syn::Error> for PxError {
    fn from(err: syn::Error) -> Self {
        PxError::Parse(err.to_string())
    }
}
