//! Title and summary templates.
//!
//! Templates use a fixed vocabulary of `${...}` placeholders, matched
//! literally. Anything else in a template, including unknown placeholders,
//! is copied through untouched.

use crosspost_types::{Author, TemplateFormat};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use url::Url;

/// Origin used for relative links when the work URL itself is unusable.
pub const DEFAULT_BASE_URL: &str = "https://archiveofourown.org";

/// Picks the title template for a format.
pub fn title_template(format: TemplateFormat, custom: &str) -> &str {
    select_template(format, custom, "${title}")
}

/// Picks the summary template for a format.
pub fn summary_template(format: TemplateFormat, custom: &str) -> &str {
    select_template(format, custom, "${summary}")
}

fn select_template<'a>(format: TemplateFormat, custom: &'a str, raw_field: &'a str) -> &'a str {
    match format {
        TemplateFormat::Blank => "",
        TemplateFormat::Custom => custom,
        TemplateFormat::Orig | TemplateFormat::Default => raw_field,
    }
}

// Every placeholder in the vocabulary. Only the template is scanned, so text
// substituted in is never expanded again.
static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{(blocksummary|summary|title|title-unlinked|authors?|authors?-unlinked)\}")
        .unwrap()
});

/// Renders a title. Titles are plain text, so nothing is linked.
pub fn render_title(template: &str, title: &str, authors: &[Author]) -> String {
    let names = author_names(authors);

    substitute(template, |name| match name {
        "title" | "title-unlinked" => Some(title),
        "author" | "authors" | "author-unlinked" | "authors-unlinked" => Some(names.as_str()),
        _ => None,
    })
}

/// Renders a summary. `url` is the work's URL, used both for the title link
/// and to resolve relative author links.
pub fn render_summary(
    template: &str,
    summary: &str,
    title: &str,
    url: &str,
    authors: &[Author],
) -> String {
    let title_link = link(url, url, title);
    let author_links = authors
        .iter()
        .map(|author| link(url, &author.url, &author.name))
        .collect::<Vec<_>>()
        .join(", ");
    let names = author_names(authors);
    let block_summary = format!("<blockquote>{summary}</blockquote>");

    substitute(template, |name| match name {
        "blocksummary" => Some(block_summary.as_str()),
        "summary" => Some(summary),
        "title" => Some(title_link.as_str()),
        "title-unlinked" => Some(title),
        "author" | "authors" => Some(author_links.as_str()),
        "author-unlinked" | "authors-unlinked" => Some(names.as_str()),
        _ => None,
    })
}

/// Replaces each placeholder with its value. Placeholders without a value
/// stay as written.
fn substitute<'a>(template: &str, value: impl Fn(&str) -> Option<&'a str>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match value(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Resolves `href` to an absolute URL against the origin of `base`.
pub fn canonical_url(base: &str, href: &str) -> String {
    if href.starts_with("http") {
        return href.to_string();
    }

    let base = Url::parse(base)
        .or_else(|_| Url::parse(DEFAULT_BASE_URL))
        .and_then(|base| base.join(href));
    match base {
        Ok(url) => url.to_string(),
        Err(_) => format!("{DEFAULT_BASE_URL}{href}"),
    }
}

/// Formats an anchor tag.
pub fn link(base: &str, href: &str, text: &str) -> String {
    format!("<a href=\"{}\">{}</a>", canonical_url(base, href), text)
}

fn author_names(authors: &[Author]) -> String {
    authors
        .iter()
        .map(|author| author.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORK_URL: &str = "https://archiveofourown.org/works/42";

    fn authors() -> Vec<Author> {
        vec![
            Author::new("Jun", "/users/jun/pseuds/jun"),
            Author::new("Mei", "https://archiveofourown.org/users/mei"),
        ]
    }

    #[test]
    fn test_blank_format_is_always_empty() {
        for custom in ["", "${title}", "${summary} by ${authors}"] {
            let title = title_template(TemplateFormat::Blank, custom);
            let summary = summary_template(TemplateFormat::Blank, custom);
            assert_eq!(render_title(title, "Echoes", &authors()), "");
            assert_eq!(
                render_summary(summary, "Sum", "Echoes", WORK_URL, &authors()),
                ""
            );
        }
    }

    #[test]
    fn test_orig_and_unknown_formats_pass_the_field_through() {
        for format in [TemplateFormat::Orig, TemplateFormat::Default] {
            let title = title_template(format, "ignored ${authors}");
            assert_eq!(render_title(title, "Echoes", &authors()), "Echoes");

            let summary = summary_template(format, "ignored");
            assert_eq!(
                render_summary(summary, "A <em>summary</em>", "Echoes", WORK_URL, &authors()),
                "A <em>summary</em>"
            );
        }
    }

    #[test]
    fn test_custom_title() {
        let template = title_template(TemplateFormat::Custom, "${title} by ${authors-unlinked}");
        assert_eq!(
            render_title(template, "Echoes", &[Author::new("Jun", "/u/jun")]),
            "Echoes by Jun"
        );
    }

    #[test]
    fn test_title_never_links() {
        assert_eq!(
            render_title("${title-unlinked} / ${author} / ${authors}", "T", &authors()),
            "T / Jun, Mei / Jun, Mei"
        );
    }

    #[test]
    fn test_summary_placeholders() {
        let rendered = render_summary(
            "${blocksummary}${title} (${title-unlinked}) by ${authors} [${author-unlinked}]",
            "Sum",
            "Echoes",
            WORK_URL,
            &authors(),
        );

        assert_eq!(
            rendered,
            "<blockquote>Sum</blockquote>\
             <a href=\"https://archiveofourown.org/works/42\">Echoes</a> (Echoes) by \
             <a href=\"https://archiveofourown.org/users/jun/pseuds/jun\">Jun</a>, \
             <a href=\"https://archiveofourown.org/users/mei\">Mei</a> [Jun, Mei]"
        );
    }

    #[test]
    fn test_repeated_and_unknown_placeholders() {
        let rendered = render_summary(
            "${summary}|${summary}|${rating}|${Summary}",
            "S",
            "T",
            WORK_URL,
            &[],
        );
        assert_eq!(rendered, "S|S|${rating}|${Summary}");
    }

    #[test]
    fn test_substituted_text_is_not_expanded_again() {
        let jun = [Author::new("Jun", "/u/jun")];

        assert_eq!(
            render_summary("${summary}", "Use ${title} and ${authors}", "T", WORK_URL, &jun),
            "Use ${title} and ${authors}"
        );
        assert_eq!(
            render_title("${title}", "My ${author} story", &jun),
            "My ${author} story"
        );
        assert_eq!(
            render_summary("${title-unlinked}: ${blocksummary}", "${summary}", "${title}", WORK_URL, &jun),
            "${title}: <blockquote>${summary}</blockquote>"
        );
    }

    #[test]
    fn test_relative_links_use_the_work_origin() {
        assert_eq!(
            canonical_url("https://squidgeworld.org/works/7?view_adult=true", "/users/a"),
            "https://squidgeworld.org/users/a"
        );
        assert_eq!(
            canonical_url("not a url", "/users/a"),
            "https://archiveofourown.org/users/a"
        );
        assert_eq!(
            canonical_url(WORK_URL, "https://example.org/x"),
            "https://example.org/x"
        );
    }
}
