//! HTML backend abstraction used by page and post extraction

use scraper::Selector;

/// An HTML element that can be queried with pre-compiled CSS selectors
///
/// Extraction code is written against this trait rather than against
/// `scraper` directly so the post and page logic only sees the handful of
/// operations it needs.
pub trait HtmlNode {
    /// First descendant matching `selector`, in document order
    fn select_first(&self, selector: &Selector) -> Option<Self>
    where
        Self: Sized;

    /// All descendants matching `selector`, in document order
    fn select_all(&self, selector: &Selector) -> Vec<Self>
    where
        Self: Sized;

    /// Text content of the element and its children, whitespace collapsed
    fn text(&self) -> String;

    /// Value of an HTML attribute, `None` if absent
    fn attr(&self, name: &str) -> Option<&str>;

    /// The element's `id` attribute
    fn id(&self) -> Option<&str> {
        self.attr("id")
    }
}

impl<'a> HtmlNode for scraper::ElementRef<'a> {
    fn select_first(&self, selector: &Selector) -> Option<Self> {
        self.select(selector).next()
    }

    fn select_all(&self, selector: &Selector) -> Vec<Self> {
        self.select(selector).collect()
    }

    fn text(&self) -> String {
        let raw: String = self.text().collect();
        collapse_whitespace(&raw)
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }
}

/// Collapse runs of whitespace (including non-breaking spaces) to one space
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
