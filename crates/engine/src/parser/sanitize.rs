use once_cell::sync::Lazy;
use regex::Regex;

// A paragraph tag with any surrounding whitespace. Attributes are tolerated.
static PARAGRAPH_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*<p(\s[^>]*)?>\s*").unwrap());
static PARAGRAPH_CLOSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*</p>\s*").unwrap());
static MARKER_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x{1}+").unwrap());

const MARKER: &str = "\u{1}";

/// Turns paragraph markup into plain text with blank-line paragraph breaks,
/// which is what destination text boxes expect.
///
/// Other inline markup is left alone. Applying this to its own output
/// changes nothing.
pub fn sanitize_paragraphs(html: &str) -> String {
    let marked = PARAGRAPH_OPEN.replace_all(html, MARKER);
    let marked = PARAGRAPH_CLOSE.replace_all(&marked, MARKER);
    MARKER_RUN.replace_all(&marked, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_become_blank_lines() {
        let html = "\n  <p>First <em>line</em>.</p>\n<p>Second.</p>\n";
        assert_eq!(sanitize_paragraphs(html), "First <em>line</em>.\n\nSecond.");
    }

    #[test]
    fn test_paragraphs_with_attributes() {
        let html = r#"<p class="x" align="center">One</p><p dir="ltr">Two</p>"#;
        assert_eq!(sanitize_paragraphs(html), "One\n\nTwo");
    }

    #[test]
    fn test_similar_tags_are_kept() {
        let html = "<pre>code</pre><p>text</p>";
        assert_eq!(sanitize_paragraphs(html), "<pre>code</pre>\n\ntext");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "<p>a</p><p>b</p>",
            "  plain text  ",
            "<p></p><p> </p><p>x<br>y</p>",
            "",
        ];
        for input in inputs {
            let once = sanitize_paragraphs(input);
            assert_eq!(sanitize_paragraphs(&once), once, "input: {input:?}");
        }
    }
}
