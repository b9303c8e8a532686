//! Common types for metadata sources

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Metadata about a source
pub struct SourceMetadata {
    pub id: &'static str,
    pub base_url: &'static str,
}
