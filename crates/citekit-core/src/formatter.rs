//! Citation formatting
//!
//! Renders a record into the four supported styles. Optional segments
//! (volume, issue, pages, year, date) are dropped together with their
//! punctuation when the field is empty.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::identifiers::doi_url;
use crate::metadata::RawMetadataRecord;
use crate::normalize::{
    clean_html_str, format_authors, format_date, get_journal_name, plain_title,
    DEFAULT_MAX_AUTHORS,
};

/// Supported citation styles, in display order
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    #[default]
    Apa,
    Ieee,
    Chicago,
    Harvard,
}

impl CitationStyle {
    pub const ALL: [CitationStyle; 4] = [
        CitationStyle::Apa,
        CitationStyle::Ieee,
        CitationStyle::Chicago,
        CitationStyle::Harvard,
    ];

    /// Lowercase key, also used for copy acknowledgments
    pub fn as_str(&self) -> &'static str {
        match self {
            CitationStyle::Apa => "apa",
            CitationStyle::Ieee => "ieee",
            CitationStyle::Chicago => "chicago",
            CitationStyle::Harvard => "harvard",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CitationStyle::Apa => "APA",
            CitationStyle::Ieee => "IEEE",
            CitationStyle::Chicago => "Chicago",
            CitationStyle::Harvard => "Harvard",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            CitationStyle::Apa => CitationStyle::Ieee,
            CitationStyle::Ieee => CitationStyle::Chicago,
            CitationStyle::Chicago => CitationStyle::Harvard,
            CitationStyle::Harvard => CitationStyle::Apa,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            CitationStyle::Apa => CitationStyle::Harvard,
            CitationStyle::Ieee => CitationStyle::Apa,
            CitationStyle::Chicago => CitationStyle::Ieee,
            CitationStyle::Harvard => CitationStyle::Chicago,
        }
    }
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CitationStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "apa" => Ok(CitationStyle::Apa),
            "ieee" => Ok(CitationStyle::Ieee),
            "chicago" => Ok(CitationStyle::Chicago),
            "harvard" => Ok(CitationStyle::Harvard),
            other => Err(format!("unknown citation style: {}", other)),
        }
    }
}

/// The four rendered citation strings for one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationFormats {
    pub apa: String,
    pub ieee: String,
    pub chicago: String,
    pub harvard: String,
}

impl CitationFormats {
    pub fn get(&self, style: CitationStyle) -> &str {
        match style {
            CitationStyle::Apa => &self.apa,
            CitationStyle::Ieee => &self.ieee,
            CitationStyle::Chicago => &self.chicago,
            CitationStyle::Harvard => &self.harvard,
        }
    }

    /// (style, text) pairs in display order
    pub fn iter(&self) -> impl Iterator<Item = (CitationStyle, &str)> {
        CitationStyle::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}

/// Render all four styles, using today's date as the Harvard "viewed" date.
pub fn generate_citations(record: &RawMetadataRecord) -> CitationFormats {
    generate_citations_on(record, Local::now().date_naive())
}

/// Render all four styles with an explicit Harvard "viewed" date.
pub fn generate_citations_on(record: &RawMetadataRecord, viewed: NaiveDate) -> CitationFormats {
    let authors = format_authors(record.authors(), DEFAULT_MAX_AUTHORS);
    let date = format_date(&record.date_parts());
    let title = plain_title(record);
    let journal = clean_html_str(&get_journal_name(record));
    let volume = record.volume();
    let issue = record.issue();
    let page = record.page();
    let doi = record.doi();
    let url = record.url();
    let year = record.year().map(|y| y.to_string()).unwrap_or_default();

    let apa = format!(
        "{authors} ({year}). {title}. {journal}{}{}{}. {}",
        segment(", ", &volume, ""),
        segment("(", &issue, ")"),
        segment(", ", &page, ""),
        doi_url(&doi),
    );

    let ieee = format!(
        "{authors}, \"{title},\" {journal}{}{}{}{}.",
        segment(", vol. ", &volume, ""),
        segment(", no. ", &issue, ""),
        segment(", pp. ", &page, ""),
        segment(", ", &year, ""),
    );

    let chicago = format!(
        "{authors}. \"{title}.\" {journal}{}{}{}{}. {}",
        segment(" ", &volume, ""),
        segment(", no. ", &issue, ""),
        segment(" (", &date, ")"),
        segment(": ", &page, ""),
        doi_url(&doi),
    );

    let harvard = format!(
        "{authors} {year}, '{title}', {journal}{}{}{}, viewed {}, <{url}>",
        segment(", vol. ", &volume, ""),
        segment(", no. ", &issue, ""),
        segment(", pp. ", &page, ""),
        viewed.format("%-m/%-d/%Y"),
    );

    CitationFormats {
        apa,
        ieee,
        chicago,
        harvard,
    }
}

fn segment(prefix: &str, value: &str, suffix: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!("{}{}{}", prefix, value, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record() -> RawMetadataRecord {
        serde_json::from_str(
            r#"{
                "title": ["Nanometre-scale thermometry in a living cell"],
                "author": [
                    {"given": "G.", "family": "Kucsko"},
                    {"given": "P. C.", "family": "Maurer"}
                ],
                "published": {"date-parts": [[2013, 8, 1]]},
                "container-title": ["Nature"],
                "volume": "500",
                "issue": "7460",
                "page": "54-58",
                "DOI": "10.1038/nature12373",
                "URL": "http://dx.doi.org/10.1038/nature12373"
            }"#,
        )
        .unwrap()
    }

    fn viewed() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
    }

    #[test]
    fn test_all_styles_full_record() {
        let c = generate_citations_on(&full_record(), viewed());
        assert_eq!(
            c.apa,
            "Kucsko, G., Maurer, P. C. (2013). Nanometre-scale thermometry in a living cell. \
             Nature, 500(7460), 54-58. https://doi.org/10.1038/nature12373"
        );
        assert_eq!(
            c.ieee,
            "Kucsko, G., Maurer, P. C., \"Nanometre-scale thermometry in a living cell,\" \
             Nature, vol. 500, no. 7460, pp. 54-58, 2013."
        );
        assert_eq!(
            c.chicago,
            "Kucsko, G., Maurer, P. C.. \"Nanometre-scale thermometry in a living cell.\" \
             Nature 500, no. 7460 (August 1, 2013): 54-58. https://doi.org/10.1038/nature12373"
        );
        assert_eq!(
            c.harvard,
            "Kucsko, G., Maurer, P. C. 2013, 'Nanometre-scale thermometry in a living cell', \
             Nature, vol. 500, no. 7460, pp. 54-58, viewed 3/5/2024, \
             <http://dx.doi.org/10.1038/nature12373>"
        );
    }

    #[test]
    fn test_missing_optional_fields_leave_no_artifacts() {
        let mut record = full_record();
        record.volume = None;
        record.issue = None;
        record.page = None;

        let c = generate_citations_on(&record, viewed());
        for (_, text) in c.iter() {
            assert!(!text.contains("()"), "{}", text);
            assert!(!text.contains(", ,"), "{}", text);
            assert!(!text.contains("vol."), "{}", text);
            assert!(!text.contains("no."), "{}", text);
            assert!(!text.contains("pp."), "{}", text);
        }
        assert!(c.apa.contains("Nature. https://doi.org/"));
        assert!(c.ieee.ends_with("Nature, 2013."));
        assert!(c.chicago.contains("Nature (August 1, 2013). https://"));
        assert!(c.harvard.contains("Nature, viewed 3/5/2024"));
    }

    #[test]
    fn test_empty_record_uses_fallbacks() {
        let c = generate_citations_on(&RawMetadataRecord::default(), viewed());
        assert_eq!(c.apa, "Unknown Author (). Untitled. Unknown Journal. https://doi.org/");
        assert_eq!(c.ieee, "Unknown Author, \"Untitled,\" Unknown Journal.");
        assert_eq!(
            c.chicago,
            "Unknown Author. \"Untitled.\" Unknown Journal. https://doi.org/"
        );
        assert_eq!(
            c.harvard,
            "Unknown Author , 'Untitled', Unknown Journal, viewed 3/5/2024, <>"
        );
    }

    #[test]
    fn test_title_markup_is_stripped() {
        let mut record = full_record();
        record.title = Some("The <i>lac</i> operon".into());
        let c = generate_citations_on(&record, viewed());
        assert!(c.apa.contains(". The lac operon. "));
    }

    #[test]
    fn test_deterministic_for_fixed_date() {
        let record = full_record();
        assert_eq!(
            generate_citations_on(&record, viewed()),
            generate_citations_on(&record, viewed())
        );
    }

    #[test]
    fn test_style_round_trip_names() {
        for style in CitationStyle::ALL {
            assert_eq!(style.as_str().parse::<CitationStyle>().unwrap(), style);
            assert_eq!(style.next().prev(), style);
        }
        assert_eq!("IEEE".parse::<CitationStyle>().unwrap(), CitationStyle::Ieee);
        assert_eq!(CitationStyle::default(), CitationStyle::Apa);
        assert!("mla".parse::<CitationStyle>().is_err());
    }
}
