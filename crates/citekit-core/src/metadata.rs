//! Raw bibliographic metadata as returned by Crossref
//!
//! Crossref is inconsistent about field shapes: titles arrive as a string or a
//! list of strings, volumes occasionally as numbers, and date parts may contain
//! `null`. Every shape is accepted here and collapsed by [`FieldValue::first_text`]
//! so downstream code never re-checks shapes.

use serde::{Deserialize, Serialize};

/// A loosely typed text field: scalar, list, or something unexpected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
    List(Vec<FieldValue>),
    Other(serde_json::Value),
}

impl FieldValue {
    /// First string value; lists unwrap to their first element.
    pub fn first_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s.as_str()),
            FieldValue::List(items) => items.first().and_then(FieldValue::first_text),
            FieldValue::Number(_) | FieldValue::Other(_) => None,
        }
    }

    /// Like [`first_text`](Self::first_text) but renders numbers too.
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::List(items) => items.first().and_then(FieldValue::scalar_text),
            FieldValue::Other(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

/// Structured author name parts; any subset may be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorName {
    #[serde(default)]
    pub given: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub literal: Option<String>,
}

/// One entry of the `author` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAuthor {
    Plain(String),
    Structured(AuthorName),
    Other(serde_json::Value),
}

impl RawAuthor {
    /// Convenience constructor for a given/family pair.
    pub fn new(given: &str, family: &str) -> Self {
        RawAuthor::Structured(AuthorName {
            given: Some(given.to_string()),
            family: Some(family.to_string()),
            ..Default::default()
        })
    }
}

/// `published` object: `{"date-parts": [[2023, 6, 15]]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishedDate {
    #[serde(rename = "date-parts", default)]
    pub date_parts: Option<Vec<Vec<Option<i32>>>>,
}

/// A Crossref `message` object for a single work.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMetadataRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Vec<RawAuthor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<PublishedDate>,
    #[serde(rename = "container-title", default, skip_serializing_if = "Option::is_none")]
    pub container_title: Option<FieldValue>,
    #[serde(rename = "journal-title", default, skip_serializing_if = "Option::is_none")]
    pub journal_title: Option<FieldValue>,
    #[serde(
        rename = "short-container-title",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub short_container_title: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue: Option<FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<FieldValue>,
    #[serde(rename = "DOI", default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<FieldValue>,
    #[serde(rename = "URL", default, skip_serializing_if = "Option::is_none")]
    pub url: Option<FieldValue>,
}

impl RawMetadataRecord {
    pub fn authors(&self) -> &[RawAuthor] {
        self.author.as_deref().unwrap_or(&[])
    }

    /// Date parts with each inner list cut at its first `null`.
    pub fn date_parts(&self) -> Vec<Vec<i32>> {
        self.published
            .as_ref()
            .and_then(|p| p.date_parts.as_ref())
            .map(|parts| {
                parts
                    .iter()
                    .map(|inner| inner.iter().map_while(|p| *p).collect())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn year(&self) -> Option<i32> {
        self.date_parts().first().and_then(|d| d.first().copied())
    }

    pub fn doi(&self) -> String {
        scalar(&self.doi)
    }

    pub fn url(&self) -> String {
        scalar(&self.url)
    }

    pub fn volume(&self) -> String {
        scalar(&self.volume)
    }

    pub fn issue(&self) -> String {
        scalar(&self.issue)
    }

    pub fn page(&self) -> String {
        scalar(&self.page)
    }

    pub fn publisher(&self) -> String {
        scalar(&self.publisher)
    }
}

fn scalar(field: &Option<FieldValue>) -> String {
    field
        .as_ref()
        .and_then(FieldValue::scalar_text)
        .unwrap_or_default()
}
