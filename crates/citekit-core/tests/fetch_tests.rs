//! Fetch service against a scripted transport

mod common;

use std::sync::Mutex;

use async_trait::async_trait;
use citekit_core::{
    CitationFetcher, FetchError, FetchState, HttpError, HttpResponse, HttpTransport,
};
use common::fixtures::load_response_fixture;
use rstest::rstest;

/// Replies with a fixed response and records requested URLs
struct ScriptedTransport {
    reply: Result<HttpResponse, HttpError>,
    requested: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    fn ok(status: u16, body: String) -> Self {
        Self {
            reply: Ok(HttpResponse {
                status,
                body,
            }),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn failing(error: HttpError) -> Self {
        Self {
            reply: Err(error),
            requested: Mutex::new(Vec::new()),
        }
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, HttpError> {
        self.requested.lock().unwrap().push(url.to_string());
        self.reply.clone()
    }
}

fn fetcher(transport: ScriptedTransport) -> CitationFetcher<ScriptedTransport> {
    CitationFetcher::new(transport, "https://api.crossref.org")
}

#[rstest]
#[case("10.1038/nature12373")]
#[case("  10.1038/nature12373  ")]
#[case("https://doi.org/10.1038/nature12373")]
#[case("HTTPS://DX.DOI.ORG/10.1038/nature12373")]
#[tokio::test]
async fn test_request_uses_sanitized_doi(#[case] input: &str) {
    let fetcher = fetcher(ScriptedTransport::ok(
        200,
        load_response_fixture("crossref_work.json"),
    ));

    let result = fetcher.fetch(input).await.unwrap();

    assert_eq!(result.doi, "10.1038/nature12373");
    assert_eq!(
        fetcher.transport().requested(),
        vec!["https://api.crossref.org/works/10.1038/nature12373"]
    );
}

#[tokio::test]
async fn test_success_carries_view_and_citations() {
    let fetcher = fetcher(ScriptedTransport::ok(
        200,
        load_response_fixture("crossref_work.json"),
    ));

    let result = fetcher.fetch("10.1038/nature12373").await.unwrap();

    assert_eq!(result.view.journal, "Nature");
    assert!(result.citations.apa.contains("https://doi.org/10.1038/nature12373"));
    assert!(result.citations.ieee.ends_with(", 2013."));
}

#[tokio::test]
async fn test_not_found() {
    let fetcher = fetcher(ScriptedTransport::ok(404, "Resource not found.".to_string()));
    let err = fetcher.fetch("10.9999/missing").await.unwrap_err();
    assert!(matches!(err, FetchError::NotFound));
    assert_eq!(err.to_string(), "DOI not found or invalid");
}

#[tokio::test]
async fn test_missing_message_is_empty_result() {
    let fetcher = fetcher(ScriptedTransport::ok(
        200,
        load_response_fixture("crossref_no_message.json"),
    ));
    let err = fetcher.fetch("10.1/x").await.unwrap_err();
    assert_eq!(err.to_string(), "No data found for this DOI");
}

#[tokio::test]
async fn test_non_json_success_is_parse_error() {
    let fetcher = fetcher(ScriptedTransport::ok(
        200,
        load_response_fixture("crossref_not_json.txt"),
    ));
    let err = fetcher.fetch("10.1/x").await.unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)));
}

#[tokio::test]
async fn test_transport_errors_map_to_fetch_errors() {
    let down = fetcher(ScriptedTransport::failing(HttpError::Timeout));
    let err = down.fetch("10.1/x").await.unwrap_err();
    assert!(matches!(err, FetchError::Network(HttpError::Timeout)));
    assert!(err
        .to_string()
        .starts_with("An error occurred while fetching citation data"));

}

#[rstest]
#[case(400)]
#[case(429)]
#[case(503)]
#[tokio::test]
async fn test_any_error_status_is_not_found(#[case] status: u16) {
    let fetcher = fetcher(ScriptedTransport::ok(status, String::new()));
    let err = fetcher.fetch("10.1/x").await.unwrap_err();
    assert!(matches!(err, FetchError::NotFound));
    assert_eq!(err.to_string(), "DOI not found or invalid");
}

#[tokio::test]
async fn test_latest_request_wins() {
    let fetcher = fetcher(ScriptedTransport::ok(
        200,
        load_response_fixture("crossref_work.json"),
    ));
    let mut state = FetchState::new();

    let first = state.begin();
    let second = state.begin();
    let slow = fetcher.fetch("10.1038/nature12373").await;
    let fast = fetcher.fetch("10.9999/other").await;

    assert!(state.apply(second, fast));
    assert!(!state.apply(first, slow));
    assert!(!state.is_loading());
    assert_eq!(state.result().unwrap().doi, "10.9999/other");
}

#[tokio::test]
async fn test_fetch_with_runs_callback_on_success_only() {
    let ok = fetcher(ScriptedTransport::ok(
        200,
        load_response_fixture("crossref_work.json"),
    ));
    let mut seen = Vec::new();
    ok.fetch_with("10.1038/nature12373", |r| seen.push(r.doi.clone()))
        .await
        .unwrap();
    assert_eq!(seen, vec!["10.1038/nature12373"]);

    let missing = fetcher(ScriptedTransport::ok(404, String::new()));
    let mut called = false;
    let _ = missing.fetch_with("10.1/x", |_| called = true).await;
    assert!(!called);
}
