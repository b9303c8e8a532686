//! Crossref works endpoint
//!
//! API docs: https://api.crossref.org/swagger-ui/index.html
//! Polite pool: identify yourself with a mailto in the User-Agent

use super::traits::{SourceError, SourceMetadata};
use crate::metadata::RawMetadataRecord;
use serde::Deserialize;

pub const CROSSREF_API_BASE: &str = "https://api.crossref.org";

#[derive(Debug, Deserialize)]
struct CrossrefResponse {
    #[serde(default)]
    message: Option<RawMetadataRecord>,
}

pub struct CrossrefSource;

impl CrossrefSource {
    pub fn metadata() -> SourceMetadata {
        SourceMetadata {
            id: "crossref",
            base_url: CROSSREF_API_BASE,
        }
    }

    /// `{base}/works/{doi}`; the DOI is used verbatim.
    pub fn work_url(base_url: &str, doi: &str) -> String {
        format!("{}/works/{}", base_url.trim_end_matches('/'), doi)
    }

    /// Parse a single work response. `Ok(None)` when there is no `message`.
    pub fn parse_work_response(json: &str) -> Result<Option<RawMetadataRecord>, SourceError> {
        let response: CrossrefResponse = serde_json::from_str(json)
            .map_err(|e| SourceError::Parse(format!("Invalid Crossref JSON: {}", e)))?;
        Ok(response.message)
    }
}
