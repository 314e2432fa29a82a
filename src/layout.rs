//! Where things live in the blog's markup
//!
//! [`SiteLayout`] holds the CSS selectors as plain strings so they can be
//! tweaked or deserialized; [`SiteLayout::compile`] turns them into
//! [`CompiledLayout`] once, when the walker is built.

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::{ConfigError, extract::POST_DATE_FORMAT};

/// CSS selectors and formats describing one listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteLayout {
    /// Post containers; the blog gives each one an id `post-body-<n>`
    pub post_body: String,
    /// The bold line carrying the name, relative to a post container
    pub name: String,
    /// 1-based paragraph index of the first charge line
    pub first_charge_paragraph: usize,
    /// How many paragraphs after the name may carry a charge line
    pub charge_lines: usize,
    /// Mugshot image inside a post container
    pub image: String,
    /// Attribute of `image` holding the link
    pub image_attr: String,
    /// The "Older Posts" pager anchor
    pub pager: String,
    /// Block grouping all posts published on one day
    pub date_group: String,
    /// Heading span carrying a day's date, e.g. `Monday, March 4, 2024`
    pub date_header: String,
    /// `strftime` pattern of `date_header`
    pub date_format: String,
}

impl Default for SiteLayout {
    fn default() -> Self {
        Self {
            post_body: r#"div[id^="post-body-"]"#.to_string(),
            name: "p:nth-child(1) > span > b".to_string(),
            first_charge_paragraph: 2,
            charge_lines: 5,
            image: "div.separator > a > img".to_string(),
            image_attr: "src".to_string(),
            pager: "a#Blog1_blog-pager-older-link".to_string(),
            date_group: "div.date-outer".to_string(),
            date_header: "h2.date-header > span".to_string(),
            date_format: POST_DATE_FORMAT.to_string(),
        }
    }
}

impl SiteLayout {
    /// Compile every selector, failing on the first one that does not parse
    pub fn compile(&self) -> Result<CompiledLayout, ConfigError> {
        let last = self.first_charge_paragraph + self.charge_lines;
        let charges = (self.first_charge_paragraph..last)
            .map(|n| parse_selector(&format!("p:nth-child({n}) > span > b")))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompiledLayout {
            post_body: parse_selector(&self.post_body)?,
            name: parse_selector(&self.name)?,
            charges,
            image: parse_selector(&self.image)?,
            image_attr: self.image_attr.clone(),
            pager: parse_selector(&self.pager)?,
            date_group: parse_selector(&self.date_group)?,
            date_header: parse_selector(&self.date_header)?,
            date_format: self.date_format.clone(),
        })
    }
}

/// A [`SiteLayout`] with its selectors parsed
#[derive(Debug, Clone)]
pub struct CompiledLayout {
    pub(crate) post_body: Selector,
    pub(crate) name: Selector,
    pub(crate) charges: Vec<Selector>,
    pub(crate) image: Selector,
    pub(crate) image_attr: String,
    pub(crate) pager: Selector,
    pub(crate) date_group: Selector,
    pub(crate) date_header: Selector,
    pub(crate) date_format: String,
}

impl CompiledLayout {
    /// Compiled form of [`SiteLayout::default`]
    pub fn blogspot() -> Result<Self, ConfigError> {
        SiteLayout::default().compile()
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|error| ConfigError::InvalidSelector {
        selector: selector.to_string(),
        error: error.to_string(),
    })
}
