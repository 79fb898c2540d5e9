//! Small read-only capability layer over a parsed page.
//!
//! Everything site specific lives in selectors handed to these helpers, so
//! the rest of the engine never walks the tree itself.

use eyre::eyre;
use scraper::{ElementRef, Html, Selector};

pub fn compile(selector: &str) -> Result<Selector, eyre::Report> {
    Selector::parse(selector).map_err(|e| eyre!("Failed to compile selector '{selector}': {e}"))
}

/// Something that can be searched with a structural selector.
pub trait Scope<'a> {
    /// All matches, in document order.
    fn select_all(self, selector: &str) -> Result<Vec<ElementRef<'a>>, eyre::Report>;

    /// The first match, if any.
    fn select_first_opt(self, selector: &str) -> Result<Option<ElementRef<'a>>, eyre::Report>;
}

impl<'a> Scope<'a> for &'a Html {
    fn select_all(self, selector: &str) -> Result<Vec<ElementRef<'a>>, eyre::Report> {
        let selector = compile(selector)?;
        Ok(self.select(&selector).collect())
    }

    fn select_first_opt(self, selector: &str) -> Result<Option<ElementRef<'a>>, eyre::Report> {
        let selector = compile(selector)?;
        Ok(self.select(&selector).next())
    }
}

impl<'a> Scope<'a> for ElementRef<'a> {
    fn select_all(self, selector: &str) -> Result<Vec<ElementRef<'a>>, eyre::Report> {
        let selector = compile(selector)?;
        Ok(self.select(&selector).collect())
    }

    fn select_first_opt(self, selector: &str) -> Result<Option<ElementRef<'a>>, eyre::Report> {
        let selector = compile(selector)?;
        Ok(self.select(&selector).next())
    }
}

pub trait ElementExt<'a> {
    /// Rendered text with whitespace runs collapsed and the ends trimmed.
    fn text_or_empty(&self) -> String;

    fn attr_opt(&self, name: &str) -> Option<String>;

    fn has_class(&self, class: &str) -> bool;

    /// Direct element children, skipping text and comment nodes.
    fn element_children(&self) -> Vec<ElementRef<'a>>;
}

impl<'a> ElementExt<'a> for ElementRef<'a> {
    fn text_or_empty(&self) -> String {
        self.text()
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn attr_opt(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(|s| s.to_string())
    }

    fn has_class(&self, class: &str) -> bool {
        self.value().classes().any(|c| c == class)
    }

    fn element_children(&self) -> Vec<ElementRef<'a>> {
        self.children().filter_map(ElementRef::wrap).collect()
    }
}
