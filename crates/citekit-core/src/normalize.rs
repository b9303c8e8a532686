//! Metadata normalization
//!
//! Turns a [`RawMetadataRecord`] into stable display strings. Every function
//! here is total: absent or oddly shaped input degrades to a fixed fallback.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::metadata::{FieldValue, RawAuthor, RawMetadataRecord};

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";
pub const UNKNOWN_JOURNAL: &str = "Unknown Journal";
pub const UNTITLED: &str = "Untitled";

/// Author limit used by the citation formatter
pub const DEFAULT_MAX_AUTHORS: usize = 3;
/// Author limit used for history entries
pub const HISTORY_MAX_AUTHORS: usize = 10;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

lazy_static! {
    static ref ANY_TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
}

/// Format a single author as "Family, Given" with fallbacks.
pub fn format_author(author: &RawAuthor) -> String {
    match author {
        RawAuthor::Plain(s) if !s.trim().is_empty() => s.clone(),
        RawAuthor::Structured(a) => {
            fn present(v: &Option<String>) -> Option<&str> {
                v.as_deref().filter(|s| !s.is_empty())
            }
            match (present(&a.family), present(&a.given)) {
                (Some(family), Some(given)) => format!("{}, {}", family, given),
                (Some(family), None) => family.to_string(),
                _ => present(&a.name)
                    .or_else(|| present(&a.literal))
                    .unwrap_or(UNKNOWN_AUTHOR)
                    .to_string(),
            }
        }
        RawAuthor::Plain(_) | RawAuthor::Other(_) => UNKNOWN_AUTHOR.to_string(),
    }
}

/// Format an author list for display.
///
/// More than `max_authors` collapses to `"<first>, et al."`; only the first
/// author is kept in that case.
pub fn format_authors(authors: &[RawAuthor], max_authors: usize) -> String {
    match authors {
        [] => UNKNOWN_AUTHOR.to_string(),
        [only] => format_author(only),
        [first, ..] if authors.len() > max_authors => {
            format!("{}, et al.", format_author(first))
        }
        _ => authors
            .iter()
            .map(format_author)
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Render `[[year, month, day]]` date parts.
pub fn format_date(date_parts: &[Vec<i32>]) -> String {
    let Some(date) = date_parts.first() else {
        return String::new();
    };

    let month_name = |m: i32| {
        usize::try_from(m)
            .ok()
            .and_then(|m| m.checked_sub(1))
            .and_then(|i| MONTH_NAMES.get(i))
    };

    match date.as_slice() {
        [] => String::new(),
        [year] => year.to_string(),
        [year, month] => match month_name(*month) {
            Some(name) => format!("{} {}", name, year),
            None => year.to_string(),
        },
        [year, month, day, ..] => match month_name(*month) {
            Some(name) => format!("{} {}, {}", name, day, year),
            None => year.to_string(),
        },
    }
}

/// Journal name from the first journal-like field that is set.
///
/// Blank strings and zero are skipped. A list is taken as soon as it is
/// present, so an empty `container-title` gives "Unknown Journal".
pub fn get_journal_name(record: &RawMetadataRecord) -> String {
    let picked = [
        &record.container_title,
        &record.journal_title,
        &record.short_container_title,
        &record.publisher,
    ]
    .into_iter()
    .flatten()
    .find(|value| match value {
        FieldValue::Text(s) => !s.is_empty(),
        FieldValue::Number(n) => n.as_f64() != Some(0.0),
        FieldValue::List(_) => true,
        FieldValue::Other(_) => false,
    });

    match picked {
        Some(FieldValue::List(items)) => items.first().and_then(FieldValue::scalar_text),
        Some(value) => value.scalar_text(),
        None => None,
    }
    .filter(|s| !s.is_empty())
    .unwrap_or_else(|| UNKNOWN_JOURNAL.to_string())
}

/// Rewrite `<i>`/`<b>` to `<em>`/`<strong>`; everything else stays literal.
pub fn render_html(value: Option<&FieldValue>) -> String {
    value
        .and_then(FieldValue::first_text)
        .map(render_html_str)
        .unwrap_or_default()
}

pub fn render_html_str(text: &str) -> String {
    text.replace("<i>", "<em>")
        .replace("</i>", "</em>")
        .replace("<b>", "<strong>")
        .replace("</b>", "</strong>")
}

/// Strip every tag, leaving plain text.
pub fn clean_html(value: Option<&FieldValue>) -> String {
    value
        .and_then(FieldValue::first_text)
        .map(clean_html_str)
        .unwrap_or_default()
}

pub fn clean_html_str(text: &str) -> String {
    ANY_TAG.replace_all(text, "").into_owned()
}

/// Plain-text title, "Untitled" when missing or empty.
pub fn plain_title(record: &RawMetadataRecord) -> String {
    let title = clean_html(record.title.as_ref());
    if title.is_empty() {
        UNTITLED.to_string()
    } else {
        title
    }
}

/// Display-ready view of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedCitationView {
    /// Title with the light HTML whitelist applied
    pub title: String,
    pub authors: String,
    pub journal: String,
    pub date: String,
    pub volume: String,
    pub issue: String,
    pub page: String,
    pub doi: String,
    pub url: String,
    pub publisher: String,
}

impl NormalizedCitationView {
    pub fn from_record(record: &RawMetadataRecord) -> Self {
        let title = render_html(record.title.as_ref());
        Self {
            title: if title.is_empty() {
                UNTITLED.to_string()
            } else {
                title
            },
            authors: format_authors(record.authors(), DEFAULT_MAX_AUTHORS),
            journal: render_html_str(&get_journal_name(record)),
            date: format_date(&record.date_parts()),
            volume: record.volume(),
            issue: record.issue(),
            page: record.page(),
            doi: record.doi(),
            url: record.url(),
            publisher: record.publisher(),
        }
    }

    /// Title with all markup removed
    pub fn plain_title(&self) -> String {
        clean_html_str(&self.title)
    }
}
