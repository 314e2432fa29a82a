//! Parsing one listing page of the blog
//!
//! A listing page is a run of day groups, newest first. Each group has a
//! date heading and one or more post containers; the page ends with an
//! "Older Posts" pager link. [`ListingPage::parse`] turns that markup into
//! owned data so nothing borrowed from the parsed document outlives the
//! call.

use chrono::NaiveDate;
use reqwest::Url;
use scraper::Html;
use tracing::debug;

use crate::{ArrestRecord, CompiledLayout, HtmlNode, extract::parse_post_date};

/// Everything the walker needs from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Records in page order
    pub records: Vec<ArrestRecord>,
    /// Absolute URL of the next-older page, if the pager link exists
    pub next_url: Option<String>,
    /// Parseable date headings in page order; malformed ones are skipped
    pub heading_dates: Vec<NaiveDate>,
    /// Posts without a name plus headings that failed to parse
    pub anomalies: usize,
}

impl ListingPage {
    /// Parse a page fetched from `url`
    ///
    /// Posts are read per day group and take that group's date. A page
    /// without day groups is treated as a single group dated by its first
    /// parseable heading. A page with no post containers yields no records
    /// but still reports its pager link.
    pub fn parse(html: &str, url: &str, layout: &CompiledLayout) -> Self {
        let document = Html::parse_document(html);
        let root = document.root_element();
        let mut page = ListingPage::default();

        for heading in root.select_all(&layout.date_header) {
            match parse_post_date(&HtmlNode::text(&heading), &layout.date_format) {
                Ok(date) => page.heading_dates.push(date),
                Err(error) => {
                    debug!(%url, %error, "skipping date heading");
                    page.anomalies += 1;
                }
            }
        }

        let groups = root.select_all(&layout.date_group);
        if groups.is_empty() {
            let page_date = page.heading_dates.first().copied();
            page.read_posts(&root, layout, page_date, url);
        } else {
            for group in &groups {
                let group_date = group
                    .select_first(&layout.date_header)
                    .and_then(|heading| {
                        parse_post_date(&HtmlNode::text(&heading), &layout.date_format).ok()
                    });
                page.read_posts(group, layout, group_date, url);
            }
        }

        page.next_url = root
            .select_first(&layout.pager)
            .and_then(|anchor| resolve_link(url, anchor.attr("href")?));

        page
    }

    fn read_posts<E: HtmlNode>(
        &mut self,
        scope: &E,
        layout: &CompiledLayout,
        date: Option<NaiveDate>,
        url: &str,
    ) {
        for post in scope.select_all(&layout.post_body) {
            match ArrestRecord::extract(&post, layout, date) {
                Ok(record) => self.records.push(record),
                Err(error) => {
                    debug!(%url, %error, "skipping post");
                    self.anomalies += 1;
                }
            }
        }
    }
}

/// Resolve a pager `href` against the page it appeared on
///
/// Relative links are joined onto `base`; the fragment is dropped. Returns
/// `None` for an empty link or one that cannot be resolved.
pub fn resolve_link(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    let mut resolved = match Url::parse(href) {
        Ok(absolute) => absolute,
        Err(_) => Url::parse(base).ok()?.join(href).ok()?,
    };
    resolved.set_fragment(None);
    Some(resolved.to_string())
}
