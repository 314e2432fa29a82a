#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use blotter::{FetchError, PageFetcher};

/// One post container in blogspot markup
pub struct Post<'a> {
    pub id: u32,
    pub heading: &'a str,
    pub charges: &'a [&'a str],
    pub image: Option<&'a str>,
}

impl<'a> Post<'a> {
    pub fn new(id: u32, heading: &'a str) -> Self {
        Self {
            id,
            heading,
            charges: &[],
            image: None,
        }
    }

    pub fn charges(mut self, charges: &'a [&'a str]) -> Self {
        self.charges = charges;
        self
    }

    pub fn image(mut self, src: &'a str) -> Self {
        self.image = Some(src);
        self
    }

    pub fn html(&self) -> String {
        let mut body = format!("<p><span><b>{}</b></span></p>\n", self.heading);
        for charge in self.charges {
            body.push_str(&format!("<p><span><b>{charge}</b></span></p>\n"));
        }
        if let Some(src) = self.image {
            body.push_str(&format!(
                r#"<div class="separator"><a href="{src}"><img border="0" src="{src}"></a></div>"#
            ));
        }
        format!(
            r#"<div class="post-outer"><div class="post hentry">
<div class="post-body entry-content" id="post-body-{}">
{body}</div></div></div>"#,
            self.id
        )
    }
}

/// A listing page: day groups of posts plus an optional "Older Posts" link
pub fn listing_page(days: &[(&str, Vec<Post<'_>>)], older: Option<&str>) -> String {
    let mut groups = String::new();
    for (date, posts) in days {
        let posts: String = posts.iter().map(Post::html).collect();
        groups.push_str(&format!(
            r#"<div class="date-outer">
<h2 class="date-header"><span>{date}</span></h2>
<div class="date-posts">{posts}</div>
</div>"#
        ));
    }
    let pager = older
        .map(|href| {
            format!(
                r#"<span id="blog-pager-older-link"><a class="blog-pager-older-link" href="{href}" id="Blog1_blog-pager-older-link" title="Older Posts">Older Posts</a></span>"#
            )
        })
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html><head><title>Police Blotter</title></head>
<body><div class="main-inner"><div class="blog-posts hfeed" id="Blog1">
{groups}
</div>
<div class="blog-pager" id="blog-pager">{pager}</div>
</div></body></html>"#
    )
}

/// Serves canned pages by URL and records every request
#[derive(Clone, Default)]
pub struct MockFetcher {
    pages: Arc<Mutex<HashMap<String, Result<String, String>>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: &str, html: String) -> Self {
        self.pages.lock().unwrap().insert(url.to_string(), Ok(html));
        self
    }

    pub fn failing(self, url: &str, reason: &str) -> Self {
        self.pages
            .lock()
            .unwrap()
            .insert(url.to_string(), Err(reason.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        let pages = self.pages.lock().unwrap();
        match pages.get(url) {
            Some(Ok(html)) => Ok(html.clone()),
            Some(Err(reason)) => Err(FetchError::Unavailable {
                url: url.to_string(),
                reason: reason.clone(),
            }),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

pub const PAGE_1: &str = "https://blotter.test/";
pub const PAGE_2: &str = "https://blotter.test/search?updated-max=2";
pub const PAGE_3: &str = "https://blotter.test/search?updated-max=3";
pub const PAGE_4: &str = "https://blotter.test/search?updated-max=4";
pub const PAGE_5: &str = "https://blotter.test/search?updated-max=5";

// Weekdays checked against the calendar; date headings are validated.
pub const FRI_MAR_8: &str = "Friday, March 8, 2024";
pub const THU_MAR_7: &str = "Thursday, March 7, 2024";
pub const WED_MAR_6: &str = "Wednesday, March 6, 2024";
pub const TUE_MAR_5: &str = "Tuesday, March 5, 2024";
pub const MON_MAR_4: &str = "Monday, March 4, 2024";
pub const SUN_MAR_3: &str = "Sunday, March 3, 2024";
pub const FRI_MAR_1: &str = "Friday, March 1, 2024";
