//! Error types for citekit-core

use thiserror::Error;

use crate::http::HttpError;

/// Result type alias for citekit operations
pub type Result<T> = std::result::Result<T, CitekitError>;

/// Main error type for citekit operations
#[derive(Error, Debug)]
pub enum CitekitError {
    /// Fetch-related errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// History-related errors
    #[error("History error: {0}")]
    History(#[from] HistoryError),

    /// Clipboard-related errors
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Storage backend errors outside a history operation
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Bad command-line or caller input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Errors from a single DOI lookup.
///
/// The `Display` strings are shown to the user as-is.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Crossref answered with a non-success status
    #[error("DOI not found or invalid")]
    NotFound,

    /// Success status but no `message` payload
    #[error("No data found for this DOI")]
    EmptyResult,

    /// Connectivity, timeout, or transport failure
    #[error("An error occurred while fetching citation data: {0}")]
    Network(#[from] HttpError),

    /// The response body was not valid Crossref JSON
    #[error("An error occurred while reading citation data: {0}")]
    Parse(String),
}

/// History persistence errors
#[derive(Error, Debug)]
pub enum HistoryError {
    /// Backing storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Entries could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for HistoryError {
    fn from(err: serde_json::Error) -> Self {
        HistoryError::Serialization(err.to_string())
    }
}

/// Storage backend errors
#[derive(Error, Debug)]
pub enum StorageError {
    /// IO error
    #[error("IO error: {0}")]
    Io(String),

    /// No usable storage location
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

/// Clipboard write errors
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Writing to the terminal failed
    #[error("IO error: {0}")]
    Io(String),

    /// The environment has no clipboard we can reach
    #[error("Clipboard unsupported: {0}")]
    Unsupported(String),
}

impl From<std::io::Error> for ClipboardError {
    fn from(err: std::io::Error) -> Self {
        ClipboardError::Io(err.to_string())
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(String),

    /// Config file is not valid TOML for this schema
    #[error("Parse error: {0}")]
    Parse(String),

    /// Value is out of its valid range
    #[error("Invalid value: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
