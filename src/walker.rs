//! Sequential walk over the blog's "Older Posts" pager
//!
//! This module follows the pager from a start URL, one page at a time:
//! - **Page budget**: stop after `max_pages` pages even if older posts exist
//! - **Early exit**: stop as soon as a page has no pager link
//! - **Loop guard**: never fetch the same page twice in one walk
//! - **Date boundary**: keep the date headings of the final pages walked and
//!   report the oldest as the start of the [`DateWindow`]
//! - **Observability**: report progress through the observer pattern
//!
//! A fetch failure ends the walk with [`WalkError::Aborted`], which still
//! carries everything gathered before the failing page.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```ignore
//! use blotter::{HttpFetcher, PageWalker};
//! use std::time::Duration;
//!
//! let walker = PageWalker::builder()
//!     .max_pages(5)
//!     .build()?;
//! let fetcher = HttpFetcher::new("blotter", Duration::from_secs(30))?;
//!
//! let walk = walker.walk(&fetcher, "https://brownsvillepd.blogspot.com/").await?;
//! println!("{} records over {} pages", walk.records.len(), walk.pages_walked);
//! ```
//!
//! ## With Observer
//!
//! ```ignore
//! use blotter::{PageVisit, PageWalker, WalkObserver};
//! use std::sync::Arc;
//!
//! struct Progress;
//!
//! #[async_trait::async_trait]
//! impl WalkObserver for Progress {
//!     async fn on_page_walked(&self, visit: &PageVisit) {
//!         println!("page {}: {} records", visit.page, visit.records);
//!     }
//! }
//!
//! let walker = PageWalker::builder()
//!     .observe_with(Arc::new(Progress))
//!     .build()?;
//! ```

use std::{
    collections::{HashSet, VecDeque},
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::NaiveDate;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{
    ArrestRecord, CompiledLayout, ConfigError, DateWindow, FetchError, ListingPage, PageFetcher,
    SiteLayout, page::resolve_link,
};

// Configuration defaults
pub const DEFAULT_MAX_PAGES: usize = 5;
pub const DEFAULT_DATE_SCAN_PAGES: usize = 2;
pub const DEFAULT_HEADERS_PER_PAGE: usize = 10;

/// Which date headings feed the [`DateWindow`]
///
/// The earliest date is taken from the final `scan_final_pages` pages of the
/// walk, whichever way the walk ended. Only the first `headers_per_page`
/// parseable headings of each page are considered. `scan_final_pages == 0`
/// disables the earliest-date scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatePolicy {
    pub scan_final_pages: usize,
    pub headers_per_page: usize,
}

impl Default for DatePolicy {
    fn default() -> Self {
        Self {
            scan_final_pages: DEFAULT_DATE_SCAN_PAGES,
            headers_per_page: DEFAULT_HEADERS_PER_PAGE,
        }
    }
}

/// Why a completed walk stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The last page had no pager link
    NoOlderPosts,
    /// `max_pages` pages were walked
    PageBudget,
    /// The pager pointed back at a page already walked
    RevisitedPage,
}

/// Summary of one walked page, passed to observers
#[derive(Debug, Clone)]
pub struct PageVisit {
    /// 1-based position of the page in the walk
    pub page: usize,
    pub url: String,
    pub records: usize,
    pub anomalies: usize,
    pub next_url: Option<String>,
}

/// Counters collected during a walk
#[derive(Debug, Clone)]
pub struct WalkStats {
    pub pages_walked: usize,
    pub records_extracted: usize,
    pub anomalies: usize,
    /// When the walk started
    pub start_time: Instant,
    /// When these stats were last updated
    pub last_update: Instant,
}

impl WalkStats {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            pages_walked: 0,
            records_extracted: 0,
            anomalies: 0,
            start_time: now,
            last_update: now,
        }
    }

    /// Time between the start of the walk and the last update
    pub fn elapsed(&self) -> Duration {
        self.last_update.duration_since(self.start_time)
    }

    fn record_page(&mut self, page: &ListingPage) {
        self.pages_walked += 1;
        self.records_extracted += page.records.len();
        self.anomalies += page.anomalies;
        self.last_update = Instant::now();
    }
}

impl Default for WalkStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Observer trait for receiving walk events
///
/// Every hook has a no-op default; implement only the ones you need.
#[async_trait::async_trait]
pub trait WalkObserver: Send + Sync {
    /// Called after a page has been fetched and parsed
    async fn on_page_walked(&self, _visit: &PageVisit) {}

    /// Called when a fetch fails; the walk ends right after
    async fn on_fetch_error(&self, _url: &str, _error: &FetchError) {}

    /// Called when the walk ends, successfully or not
    async fn on_walk_complete(&self, _stats: &WalkStats) {}
}

/// Registry for managing multiple walk observers
#[derive(Default)]
pub struct ObserverRegistry {
    observers: Vec<Arc<dyn WalkObserver>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Arc<dyn WalkObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub async fn notify_page_walked(&self, visit: &PageVisit) {
        for observer in &self.observers {
            observer.on_page_walked(visit).await;
        }
    }

    pub async fn notify_fetch_error(&self, url: &str, error: &FetchError) {
        for observer in &self.observers {
            observer.on_fetch_error(url, error).await;
        }
    }

    pub async fn notify_walk_complete(&self, stats: &WalkStats) {
        for observer in &self.observers {
            observer.on_walk_complete(stats).await;
        }
    }
}

/// Records and dates from a walk that ran to completion
#[derive(Debug, Clone)]
pub struct Walk {
    /// Records in arrival order: newest page first, page order within a page
    pub records: Vec<ArrestRecord>,
    pub window: DateWindow,
    pub pages_walked: usize,
    pub anomalies: usize,
    pub stop_reason: StopReason,
}

/// What a walk had gathered before it was aborted
#[derive(Debug, Clone, Default)]
pub struct PartialWalk {
    pub records: Vec<ArrestRecord>,
    pub window: DateWindow,
    pub pages_walked: usize,
}

/// A walk that did not run to completion
#[derive(Debug, thiserror::Error)]
pub enum WalkError {
    /// Fetching page `page` failed
    ///
    /// `partial` holds the records of the pages before it. It must not be
    /// presented as a complete leaderboard.
    #[error("Walk aborted on page {page} ({url}) after {} records: {source}", .partial.records.len())]
    Aborted {
        page: usize,
        url: String,
        partial: Box<PartialWalk>,
        #[source]
        source: FetchError,
    },
}

impl WalkError {
    /// The data gathered before the walk was aborted
    pub fn partial(&self) -> &PartialWalk {
        match self {
            Self::Aborted { partial, .. } => partial,
        }
    }

    pub fn into_partial(self) -> PartialWalk {
        match self {
            Self::Aborted { partial, .. } => *partial,
        }
    }
}

/// Validated configuration for the walker
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    pub(crate) max_pages: usize,
    pub(crate) date_policy: DatePolicy,
    pub(crate) delay: Option<Duration>,
}

impl WalkerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_pages == 0 {
            return Err(ConfigError::InvalidMaxPages(0));
        }
        if self.date_policy.headers_per_page == 0 {
            return Err(ConfigError::InvalidHeadersPerPage(0));
        }
        Ok(())
    }
}

/// Keeps the headings of the most recent pages and the latest date overall
struct DateTracker {
    policy: DatePolicy,
    final_pages: VecDeque<Vec<NaiveDate>>,
    window: DateWindow,
}

impl DateTracker {
    fn new(policy: DatePolicy) -> Self {
        Self {
            policy,
            final_pages: VecDeque::new(),
            window: DateWindow::default(),
        }
    }

    fn record_page(&mut self, heading_dates: &[NaiveDate]) {
        let scanned: Vec<NaiveDate> = heading_dates
            .iter()
            .copied()
            .take(self.policy.headers_per_page)
            .collect();
        for &date in &scanned {
            self.window.widen_latest(date);
        }

        if self.policy.scan_final_pages == 0 {
            return;
        }
        if self.final_pages.len() == self.policy.scan_final_pages {
            self.final_pages.pop_front();
        }
        self.final_pages.push_back(scanned);
    }

    fn window(&self) -> DateWindow {
        let mut window = self.window;
        for &date in self.final_pages.iter().flatten() {
            window.widen_earliest(date);
        }
        window
    }
}

/// Walks the pager one page at a time
///
/// The walker holds no state between walks; every call to
/// [`walk`](Self::walk) starts from scratch, so one walker can serve
/// concurrent walks.
pub struct PageWalker {
    config: WalkerConfig,
    layout: CompiledLayout,
    observers: ObserverRegistry,
}

impl PageWalker {
    /// Create a walker with default settings and the blogspot layout
    pub fn new() -> Result<Self, ConfigError> {
        Self::builder().build()
    }

    pub fn builder() -> WalkerBuilder {
        WalkerBuilder::default()
    }

    pub fn max_pages(&self) -> usize {
        self.config.max_pages
    }

    pub fn date_policy(&self) -> DatePolicy {
        self.config.date_policy
    }

    /// Walk from `start_url` until the budget is spent or the pager runs out
    ///
    /// # Errors
    ///
    /// [`WalkError::Aborted`] on the first page that fails to fetch.
    pub async fn walk(
        &self,
        fetcher: &dyn PageFetcher,
        start_url: &str,
    ) -> Result<Walk, WalkError> {
        let mut stats = WalkStats::new();
        let mut dates = DateTracker::new(self.config.date_policy);
        let mut records = Vec::new();
        // Same normal form as pager links, so the loop guard sees the start page
        let mut url =
            resolve_link(start_url, start_url).unwrap_or_else(|| start_url.to_string());
        let mut visited = HashSet::from([url.clone()]);
        let mut stop_reason = StopReason::PageBudget;

        info!(%url, max_pages = self.config.max_pages, "starting walk");

        for page_number in 1..=self.config.max_pages {
            if page_number > 1
                && let Some(delay) = self.config.delay
            {
                sleep(delay).await;
            }

            let html = match fetcher.fetch(&url).await {
                Ok(html) => html,
                Err(error) => {
                    warn!(%url, page = page_number, %error, "fetch failed, aborting walk");
                    self.observers.notify_fetch_error(&url, &error).await;
                    self.observers.notify_walk_complete(&stats).await;
                    return Err(WalkError::Aborted {
                        page: page_number,
                        url,
                        partial: Box::new(PartialWalk {
                            records,
                            window: dates.window(),
                            pages_walked: stats.pages_walked,
                        }),
                        source: error,
                    });
                }
            };

            let page = ListingPage::parse(&html, &url, &self.layout);
            stats.record_page(&page);
            dates.record_page(&page.heading_dates);
            debug!(
                %url,
                page = page_number,
                records = page.records.len(),
                anomalies = page.anomalies,
                "page walked"
            );

            let visit = PageVisit {
                page: page_number,
                url: url.clone(),
                records: page.records.len(),
                anomalies: page.anomalies,
                next_url: page.next_url.clone(),
            };
            records.extend(page.records);
            self.observers.notify_page_walked(&visit).await;

            match page.next_url {
                None => {
                    stop_reason = StopReason::NoOlderPosts;
                    break;
                }
                Some(next) if !visited.insert(next.clone()) => {
                    warn!(%url, %next, "pager points at a page already walked");
                    stop_reason = StopReason::RevisitedPage;
                    break;
                }
                Some(next) => url = next,
            }
        }

        info!(
            pages = stats.pages_walked,
            records = records.len(),
            anomalies = stats.anomalies,
            elapsed_ms = stats.elapsed().as_millis(),
            ?stop_reason,
            "walk complete"
        );
        self.observers.notify_walk_complete(&stats).await;

        Ok(Walk {
            records,
            window: dates.window(),
            pages_walked: stats.pages_walked,
            anomalies: stats.anomalies,
            stop_reason,
        })
    }
}

/// Builder for configuring a [`PageWalker`]
pub struct WalkerBuilder {
    config: WalkerConfig,
    layout: SiteLayout,
    observers: Vec<Arc<dyn WalkObserver>>,
}

impl Default for WalkerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WalkerBuilder {
    pub fn new() -> Self {
        Self {
            config: WalkerConfig {
                max_pages: DEFAULT_MAX_PAGES,
                date_policy: DatePolicy::default(),
                delay: None,
            },
            layout: SiteLayout::default(),
            observers: Vec::new(),
        }
    }

    /// Maximum number of pages to fetch (default: 5)
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    /// Number of final pages whose headings set the earliest date (default: 2)
    pub fn date_scan_pages(mut self, pages: usize) -> Self {
        self.config.date_policy.scan_final_pages = pages;
        self
    }

    /// Date headings considered per page (default: 10)
    pub fn date_headers_per_page(mut self, headers: usize) -> Self {
        self.config.date_policy.headers_per_page = headers;
        self
    }

    /// Pause between page fetches (default: none)
    pub fn delay(mut self, delay: Duration) -> Self {
        self.config.delay = (!delay.is_zero()).then_some(delay);
        self
    }

    /// Use a different page layout
    pub fn layout(mut self, layout: SiteLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Register an observer to receive walk events
    pub fn observe_with(mut self, observer: Arc<dyn WalkObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn build(self) -> Result<PageWalker, ConfigError> {
        self.config.validate()?;
        let layout = self.layout.compile()?;

        let mut observers = ObserverRegistry::new();
        for observer in self.observers {
            observers.register(observer);
        }

        Ok(PageWalker {
            config: self.config,
            layout,
            observers,
        })
    }
}
