//! Hyperlink extraction from listing pages

use scraper::{Html, Selector};

use crate::constants::LINK_SELECTOR;

/// Return every `href` target in document order, verbatim
///
/// Anchors without an `href` are ignored; a page with no links yields an
/// empty list.
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse(LINK_SELECTOR) {
        Ok(selector) => selector,
        Err(e) => {
            tracing::error!("Invalid link selector {}: {:?}", LINK_SELECTOR, e);
            return Vec::new();
        }
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_apache_style_listing() {
        let html = r#"
            <html><head><title>Index of /roms</title></head><body>
            <h1>Index of /roms</h1>
            <pre><a href="?C=N;O=D">Name</a> <a href="?C=M;O=A">Last modified</a>
            <hr><a href="/">Parent Directory</a>
            <a href="Game%20One.zip">Game One.zip</a>
            <a href="sub/two.7z">two.7z</a>
            <a>no target</a>
            </pre></body></html>
        "#;

        assert_eq!(
            extract_links(html),
            vec!["?C=N;O=D", "?C=M;O=A", "/", "Game%20One.zip", "sub/two.7z"]
        );
    }

    #[test]
    fn test_extract_keeps_empty_href() {
        let html = r#"<a href="">self</a><a href="x.zip">x</a>"#;
        assert_eq!(extract_links(html), vec!["", "x.zip"]);
    }

    #[test]
    fn test_extract_from_page_without_links() {
        assert!(extract_links("<p>nothing here</p>").is_empty());
        assert!(extract_links("").is_empty());
    }
}
