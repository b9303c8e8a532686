//! DOI input cleanup

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Resolver prefix users paste along with the DOI
    static ref DOI_RESOLVER_PREFIX: Regex =
        Regex::new(r"(?i)^https?://(?:dx\.)?doi\.org/").unwrap();

    // 10.<registrant>/<suffix>
    static ref DOI_SHAPE: Regex = Regex::new(r"^10\.\d{4,9}(?:\.\d+)*/\S+$").unwrap();
}

/// Strip surrounding whitespace and a leading `http(s)://(dx.)doi.org/`.
pub fn sanitize_doi(input: &str) -> String {
    let trimmed = input.trim();
    DOI_RESOLVER_PREFIX
        .replace(trimmed, "")
        .trim()
        .to_string()
}

/// Whether `doi` has the `10.NNNN/suffix` shape. Advisory only.
pub fn looks_like_doi(doi: &str) -> bool {
    DOI_SHAPE.is_match(doi)
}

/// Resolver URL for a DOI
pub fn doi_url(doi: &str) -> String {
    format!("https://doi.org/{}", doi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://doi.org/10.1038/nature12373", "10.1038/nature12373")]
    #[case("http://dx.doi.org/10.1038/nature12373", "10.1038/nature12373")]
    #[case("HTTPS://DOI.ORG/10.1038/nature12373", "10.1038/nature12373")]
    #[case("  10.1038/nature12373 \n", "10.1038/nature12373")]
    #[case(" https://doi.org/10.1038/nature12373 ", "10.1038/nature12373")]
    #[case("10.1038/nature12373", "10.1038/nature12373")]
    fn test_sanitize_doi(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(sanitize_doi(input), expected);
    }

    #[test]
    fn test_sanitize_keeps_other_urls() {
        assert_eq!(
            sanitize_doi("https://example.org/10.1/x"),
            "https://example.org/10.1/x"
        );
    }

    #[rstest]
    #[case("10.1038/nature12373", true)]
    #[case("10.1000/(SICI)1097-4679(199911)55:11<1401::AID-JCLP4>3.0.CO;2-G", true)]
    #[case("10.12/short", false)]
    #[case("nature12373", false)]
    #[case("", false)]
    fn test_looks_like_doi(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(looks_like_doi(input), expected);
    }

    #[test]
    fn test_doi_url() {
        assert_eq!(doi_url("10.1/x"), "https://doi.org/10.1/x");
    }
}
