// file: src/extractor/patterns.rs
// description: compiled regex patterns for product text extraction
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Capacity, matched against lowercased text
    pub static ref CAPACITY_ML: Regex = Regex::new(
        r"(\d+(?:\.\d+)?)\s*ml"
    ).expect("CAPACITY_ML regex is valid");

    pub static ref CAPACITY_L: Regex = Regex::new(
        r"(\d+(?:\.\d+)?)\s*l(?:\s|$|\.)"
    ).expect("CAPACITY_L regex is valid");

    pub static ref CAPACITY_CL: Regex = Regex::new(
        r"(\d+(?:\.\d+)?)\s*cl"
    ).expect("CAPACITY_CL regex is valid");

    pub static ref CAPACITY_LITRE: Regex = Regex::new(
        r"(\d+(?:\.\d+)?)\s*litre"
    ).expect("CAPACITY_LITRE regex is valid");

    // Minimum durability (DDM)
    pub static ref DDM_MONTHS: Regex = Regex::new(
        r"(\d+)\s*mois"
    ).expect("DDM_MONTHS regex is valid");

    pub static ref DDM_YEARS: Regex = Regex::new(
        r"(\d+)\s*ans?"
    ).expect("DDM_YEARS regex is valid");

    pub static ref DDM_YEAR_WORD: Regex = Regex::new(
        r"(\d+)\s*année"
    ).expect("DDM_YEAR_WORD regex is valid");

    pub static ref DDM_DURABILITY: Regex = Regex::new(
        r"durabilité[^\d]*(\d+)"
    ).expect("DDM_DURABILITY regex is valid");

    pub static ref DDM_CONSERVATION: Regex = Regex::new(
        r"conservation[^\d]*(\d+)"
    ).expect("DDM_CONSERVATION regex is valid");

    // Use-by date (DLC)
    pub static ref DLC_DATE_LIMIT: Regex = Regex::new(
        r"date limite[^\d]*(\d+)"
    ).expect("DLC_DATE_LIMIT regex is valid");

    pub static ref DLC_EXPIRE: Regex = Regex::new(
        r"expire[^\d]*(\d+)"
    ).expect("DLC_EXPIRE regex is valid");

    pub static ref DLC_PEREMPTION: Regex = Regex::new(
        r"péremption[^\d]*(\d+)"
    ).expect("DLC_PEREMPTION regex is valid");

    // HTML markup
    pub static ref HTML_TAG: Regex = Regex::new(
        r"<[^>]+>"
    ).expect("HTML_TAG regex is valid");
}

/// First capture group of the first match, if any.
pub fn first_capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_litre_needs_boundary() {
        assert!(CAPACITY_L.is_match("bouteille 1.5 l"));
        assert!(CAPACITY_L.is_match("bouteille 2l."));
        assert!(!CAPACITY_L.is_match("2 lots"));
    }

    #[test]
    fn test_first_capture() {
        assert_eq!(first_capture(&CAPACITY_ML, "flacon 30ml et 50 ml"), Some("30"));
        assert_eq!(first_capture(&CAPACITY_ML, "sans contenance"), None);
    }

    #[test]
    fn test_html_tag_pattern() {
        assert_eq!(HTML_TAG.replace_all("<p>Crème <b>douce</b></p>", ""), "Crème douce");
    }
}
