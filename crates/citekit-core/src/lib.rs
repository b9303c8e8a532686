//! citekit-core: DOI lookup and citation formatting
//!
//! This library provides:
//! - Lenient parsing of Crossref work metadata
//! - Normalization of authors, dates, journals, and titles into display strings
//! - Citation rendering in APA, IEEE, Chicago, and Harvard styles
//! - A fetch service with sequenced display state
//! - A bounded, deduplicated, persisted citation history
//! - Clipboard copy with time-limited "copied" acknowledgments

pub mod clipboard;
pub mod config;
pub mod error;
pub mod fetch;
pub mod formatter;
pub mod history;
pub mod http;
pub mod identifiers;
pub mod metadata;
pub mod normalize;
pub mod sources;

pub use clipboard::{ClipboardService, ClipboardWriter, CopyAcknowledgments, Osc52Clipboard};
pub use config::CitekitConfig;
pub use error::{
    CitekitError, ClipboardError, ConfigError, FetchError, HistoryError, Result, StorageError,
};
pub use fetch::{CitationFetcher, CitationResult, FetchState, FetchTicket};
pub use formatter::{generate_citations, generate_citations_on, CitationFormats, CitationStyle};
pub use history::{FileStorage, HistoryEntry, HistoryStorage, HistoryStore, MemoryStorage};
pub use http::{HttpClient, HttpError, HttpResponse, HttpTransport};
pub use identifiers::{doi_url, looks_like_doi, sanitize_doi};
pub use metadata::{FieldValue, RawAuthor, RawMetadataRecord};
pub use normalize::NormalizedCitationView;
