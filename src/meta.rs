//! Extraction of renderer options embedded in HTML meta tags.
//!
//! A document can carry options like
//! `<meta name="imgkit-format" content="jpg">`; the prefix is configurable
//! through [`crate::Config::meta_tag_prefix`].

use scraper::{Html, Selector};

use crate::Options;

/// Scan `html` for meta tags whose `name` starts with `prefix` and collect
/// the stripped names and `content` values into an options mapping.
///
/// Tags without a `content` attribute are skipped. For duplicate names the
/// last value wins while the key keeps its first-seen position.
pub(crate) fn options_from_meta(html: &str, prefix: &str) -> Options {
    let document = Html::parse_document(html);
    let meta = Selector::parse("meta").expect("static selector");

    let mut options = Options::new();
    for element in document.select(&meta) {
        let Some(name) = element.value().attr("name") else {
            continue;
        };
        let Some(key) = name.strip_prefix(prefix) else {
            continue;
        };
        let Some(content) = element.value().attr("content") else {
            continue;
        };
        options.set(key, content);
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_prefixed_tags() {
        let html = r#"<html><head>
            <meta name="imgkit-format" content="jpg">
            <meta name="imgkit-quality" content="75">
        </head><body></body></html>"#;
        let options = options_from_meta(html, "imgkit-");
        assert_eq!(
            options.to_tokens().unwrap(),
            vec!["--format", "jpg", "--quality", "75"]
        );
    }

    #[test]
    fn ignores_non_matching_prefix() {
        let html = r#"<head><meta name="viewport" content="width=device-width"></head>"#;
        assert!(options_from_meta(html, "imgkit-").is_empty());
    }

    #[test]
    fn skips_tags_without_content() {
        let html = r#"<head><meta name="imgkit-format"></head>"#;
        assert!(options_from_meta(html, "imgkit-").is_empty());
    }

    #[test]
    fn last_duplicate_wins_keeping_first_position() {
        let html = r#"<head>
            <meta name="imgkit-format" content="png">
            <meta name="imgkit-quality" content="75">
            <meta name="imgkit-format" content="jpg">
        </head>"#;
        let options = options_from_meta(html, "imgkit-");
        assert_eq!(
            options.to_tokens().unwrap(),
            vec!["--format", "jpg", "--quality", "75"]
        );
    }

    #[test]
    fn custom_prefix() {
        let html = r#"<head><meta name="snap-format" content="jpg"></head>"#;
        let options = options_from_meta(html, "snap-");
        assert_eq!(options.to_tokens().unwrap(), vec!["--format", "jpg"]);
    }
}
