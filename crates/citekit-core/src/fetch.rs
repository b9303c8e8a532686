//! Citation fetch service
//!
//! [`CitationFetcher`] performs one lookup per call. [`FetchState`] is the
//! display state a front end keeps; it tags each lookup with a sequence number
//! so a slow, older response can never overwrite a newer one.

use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::formatter::{generate_citations, CitationFormats};
use crate::http::{HttpClient, HttpTransport};
use crate::identifiers::{looks_like_doi, sanitize_doi};
use crate::metadata::RawMetadataRecord;
use crate::normalize::NormalizedCitationView;
use crate::sources::CrossrefSource;

/// Outcome of a successful lookup
#[derive(Debug, Clone, PartialEq)]
pub struct CitationResult {
    /// Sanitized identifier the request was issued for
    pub doi: String,
    pub record: RawMetadataRecord,
    pub view: NormalizedCitationView,
    pub citations: CitationFormats,
}

pub struct CitationFetcher<T: HttpTransport> {
    transport: T,
    base_url: String,
}

impl CitationFetcher<HttpClient> {
    /// Fetcher backed by reqwest, configured from `api`.
    pub fn from_config(api: &ApiConfig) -> Result<Self, FetchError> {
        let client = HttpClient::new(&api.effective_user_agent(), api.timeout())?;
        Ok(Self::new(client, &api.base_url))
    }
}

impl<T: HttpTransport> CitationFetcher<T> {
    pub fn new(transport: T, base_url: &str) -> Self {
        Self {
            transport,
            base_url: base_url.to_string(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Look up `identifier` and render its citations.
    pub async fn fetch(&self, identifier: &str) -> Result<CitationResult, FetchError> {
        let doi = sanitize_doi(identifier);
        if !looks_like_doi(&doi) {
            warn!(%doi, "Identifier does not look like a DOI, querying anyway");
        }

        let url = CrossrefSource::work_url(&self.base_url, &doi);
        debug!(%url, source = CrossrefSource::metadata().id, "Fetching work metadata");

        let response = self.transport.get(&url).await?;
        if !response.is_success() {
            if response.status == 429 {
                warn!(%doi, "Rate limited by the metadata service");
            }
            debug!(status = response.status, %doi, "Lookup failed");
            return Err(FetchError::NotFound);
        }

        if response.body.trim().is_empty() {
            return Err(FetchError::EmptyResult);
        }

        let record = CrossrefSource::parse_work_response(&response.body)
            .map_err(|e| FetchError::Parse(e.to_string()))?
            .ok_or(FetchError::EmptyResult)?;

        let view = NormalizedCitationView::from_record(&record);
        let citations = generate_citations(&record);
        debug!(%doi, title = %view.plain_title(), "Citation generated");

        Ok(CitationResult {
            doi,
            record,
            view,
            citations,
        })
    }

    /// [`fetch`](Self::fetch), calling `on_success` before returning a result.
    pub async fn fetch_with<F>(
        &self,
        identifier: &str,
        on_success: F,
    ) -> Result<CitationResult, FetchError>
    where
        F: FnOnce(&CitationResult),
    {
        let result = self.fetch(identifier).await?;
        on_success(&result);
        Ok(result)
    }
}

/// Handle for one issued lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Display state for lookups: loading flag, last result, last error.
#[derive(Debug, Default)]
pub struct FetchState {
    loading: bool,
    error: Option<String>,
    result: Option<CitationResult>,
    issued: u64,
}

impl FetchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a lookup: clears the previous result and error right away.
    pub fn begin(&mut self) -> FetchTicket {
        self.issued += 1;
        self.loading = true;
        self.error = None;
        self.result = None;
        debug!(sequence = self.issued, "Fetch started");
        FetchTicket(self.issued)
    }

    /// Apply a finished lookup. Returns `false` (state untouched) for stale tickets.
    pub fn apply(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<CitationResult, FetchError>,
    ) -> bool {
        if ticket.0 != self.issued {
            debug!(
                sequence = ticket.0,
                latest = self.issued,
                "Discarding stale fetch result"
            );
            return false;
        }

        self.loading = false;
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.error = None;
            }
            Err(e) => {
                self.result = None;
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// Reset to idle; any in-flight ticket becomes stale.
    pub fn clear(&mut self) {
        self.issued += 1;
        self.loading = false;
        self.error = None;
        self.result = None;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&CitationResult> {
        self.result.as_ref()
    }

    pub fn citations(&self) -> Option<&CitationFormats> {
        self.result.as_ref().map(|r| &r.citations)
    }
}
