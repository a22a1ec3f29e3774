// file: src/extractor/html.rs
// description: strip markup and entities from catalog descriptions
// reference: https://docs.rs/html-escape

use crate::extractor::patterns::HTML_TAG;

/// Removes tags, decodes entities and collapses whitespace into single spaces.
pub fn clean_html(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let without_tags = HTML_TAG.replace_all(text, "");
    let decoded = html_escape::decode_html_entities(&without_tags);

    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags_and_entities() {
        let html = "<p>Cr&egrave;me <strong>hydratante</strong> &amp; apaisante</p>";
        assert_eq!(clean_html(html), "Crème hydratante & apaisante");
    }

    #[test]
    fn test_collapses_whitespace() {
        let html = "<div>\n  Ligne 1<br/>\n\tLigne&nbsp;2  </div>";
        assert_eq!(clean_html(html), "Ligne 1 Ligne 2");
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(clean_html(""), "");
        assert_eq!(clean_html("   \n"), "");
    }
}
