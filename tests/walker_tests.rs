mod common;

use blotter::*;
use chrono::NaiveDate;
use common::*;
use pretty_assertions::assert_eq;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

fn march(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

/// Five linked pages, two posts per page, the last without a pager link
fn five_page_blog() -> MockFetcher {
    let days: [&[&str]; 5] = [
        &[FRI_MAR_8, THU_MAR_7],
        &[WED_MAR_6],
        &[TUE_MAR_5, MON_MAR_4],
        &[SUN_MAR_3],
        &[FRI_MAR_1],
    ];
    let urls = [PAGE_1, PAGE_2, PAGE_3, PAGE_4, PAGE_5];

    let mut fetcher = MockFetcher::new();
    for (i, (url, headings)) in urls.iter().zip(days).enumerate() {
        let page_no = i as u32 + 1;
        let groups: Vec<_> = headings
            .iter()
            .enumerate()
            .map(|(j, &heading)| {
                let id = page_no * 10 + j as u32;
                (heading, vec![Post::new(id, "Page Person").charges(&["Theft"])])
            })
            .collect();
        let older = urls.get(i + 1).copied();
        fetcher = fetcher.page(url, listing_page(&groups, older));
    }
    fetcher
}

#[cfg(test)]
mod walk_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_walks_until_pager_runs_out() {
        let fetcher = five_page_blog();
        let walker = PageWalker::builder().max_pages(10).build().unwrap();

        let walk = walker.walk(&fetcher, PAGE_1).await.unwrap();

        assert_eq!(walk.pages_walked, 5);
        assert_eq!(walk.stop_reason, StopReason::NoOlderPosts);
        assert_eq!(walk.records.len(), 7);
        assert_eq!(fetcher.requests(), vec![PAGE_1, PAGE_2, PAGE_3, PAGE_4, PAGE_5]);
    }

    #[tokio::test]
    async fn test_page_budget_is_respected() {
        let fetcher = five_page_blog();
        let walker = PageWalker::builder().max_pages(3).build().unwrap();

        let walk = walker.walk(&fetcher, PAGE_1).await.unwrap();

        assert_eq!(walk.pages_walked, 3);
        assert_eq!(walk.stop_reason, StopReason::PageBudget);
        assert_eq!(fetcher.requests(), vec![PAGE_1, PAGE_2, PAGE_3]);
    }

    #[tokio::test]
    async fn test_single_page_without_pager() {
        let fetcher = MockFetcher::new().page(
            PAGE_1,
            listing_page(&[(MON_MAR_4, vec![Post::new(1, "Only One")])], None),
        );
        let walker = PageWalker::builder().max_pages(5).build().unwrap();

        let walk = walker.walk(&fetcher, PAGE_1).await.unwrap();

        assert_eq!(walk.pages_walked, 1);
        assert_eq!(walk.stop_reason, StopReason::NoOlderPosts);
        assert_eq!(fetcher.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_records_keep_page_order() {
        let fetcher = five_page_blog();
        let walker = PageWalker::builder().max_pages(2).build().unwrap();

        let walk = walker.walk(&fetcher, PAGE_1).await.unwrap();
        let dates: Vec<_> = walk.records.iter().map(|r| r.post_date).collect();

        assert_eq!(dates, vec![Some(march(8)), Some(march(7)), Some(march(6))]);
    }

    #[tokio::test]
    async fn test_pager_loop_is_stopped() {
        let fetcher = MockFetcher::new()
            .page(
                PAGE_1,
                listing_page(&[(TUE_MAR_5, vec![Post::new(1, "A")])], Some(PAGE_2)),
            )
            .page(
                PAGE_2,
                listing_page(&[(MON_MAR_4, vec![Post::new(2, "B")])], Some(PAGE_1)),
            );
        let walker = PageWalker::builder().max_pages(5).build().unwrap();

        let walk = walker.walk(&fetcher, PAGE_1).await.unwrap();

        assert_eq!(walk.pages_walked, 2);
        assert_eq!(walk.stop_reason, StopReason::RevisitedPage);
        assert_eq!(fetcher.requests(), vec![PAGE_1, PAGE_2]);
    }

    #[tokio::test]
    async fn test_start_url_is_normalized_for_loop_guard() {
        let fetcher = MockFetcher::new().page(
            PAGE_1,
            listing_page(&[(MON_MAR_4, vec![Post::new(1, "A")])], Some(PAGE_1)),
        );
        let walker = PageWalker::builder().max_pages(5).build().unwrap();

        let walk = walker.walk(&fetcher, "https://blotter.test").await.unwrap();

        assert_eq!(walk.pages_walked, 1);
        assert_eq!(walk.records.len(), 1);
        assert_eq!(walk.stop_reason, StopReason::RevisitedPage);
        assert_eq!(fetcher.requests(), vec![PAGE_1]);
    }

    #[tokio::test]
    async fn test_anomalies_are_counted() {
        let fetcher = MockFetcher::new().page(
            PAGE_1,
            listing_page(
                &[("not a date", vec![Post::new(1, ""), Post::new(2, "Kept")])],
                None,
            ),
        );
        let walker = PageWalker::new().unwrap();

        let walk = walker.walk(&fetcher, PAGE_1).await.unwrap();

        assert_eq!(walk.records.len(), 1);
        assert_eq!(walk.anomalies, 2);
    }
}

#[cfg(test)]
mod abort_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_failure_on_second_page_keeps_first() {
        let fetcher = five_page_blog().failing(PAGE_2, "connection reset");
        let walker = PageWalker::builder().max_pages(5).build().unwrap();

        let error = walker.walk(&fetcher, PAGE_1).await.unwrap_err();

        match &error {
            WalkError::Aborted { page, url, source, .. } => {
                assert_eq!(*page, 2);
                assert_eq!(url, PAGE_2);
                assert!(matches!(source, FetchError::Unavailable { .. }));
            }
        }
        let partial = error.into_partial();
        assert_eq!(partial.pages_walked, 1);
        assert_eq!(partial.records.len(), 2);
        assert_eq!(partial.window.latest, Some(march(8)));
        assert_eq!(fetcher.requests(), vec![PAGE_1, PAGE_2]);
    }

    #[tokio::test]
    async fn test_failure_on_first_page_is_empty() {
        let fetcher = MockFetcher::new();
        let walker = PageWalker::new().unwrap();

        let error = walker.walk(&fetcher, PAGE_1).await.unwrap_err();

        let partial = error.partial();
        assert_eq!(partial.pages_walked, 0);
        assert!(partial.records.is_empty());
        assert_eq!(partial.window, DateWindow::default());
    }
}

#[cfg(test)]
mod date_window_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_earliest_comes_from_final_pages() {
        let fetcher = five_page_blog();
        let walker = PageWalker::builder().max_pages(3).build().unwrap();

        let walk = walker.walk(&fetcher, PAGE_1).await.unwrap();

        // Final two pages are 2 and 3
        assert_eq!(walk.window.earliest, Some(march(4)));
        assert_eq!(walk.window.latest, Some(march(8)));
    }

    #[tokio::test]
    async fn test_early_exit_still_scans_last_pages() {
        let fetcher = five_page_blog();
        let walker = PageWalker::builder().max_pages(50).build().unwrap();

        let walk = walker.walk(&fetcher, PAGE_1).await.unwrap();

        assert_eq!(walk.window.earliest, Some(march(1)));
        assert_eq!(walk.window.latest, Some(march(8)));
    }

    #[tokio::test]
    async fn test_scan_depth_is_configurable() {
        let fetcher = five_page_blog();
        let walker = PageWalker::builder()
            .max_pages(3)
            .date_scan_pages(1)
            .build()
            .unwrap();

        let walk = walker.walk(&fetcher, PAGE_1).await.unwrap();

        assert_eq!(walk.window.earliest, Some(march(4)));
        assert_eq!(
            walker.date_policy(),
            DatePolicy {
                scan_final_pages: 1,
                headers_per_page: 10
            }
        );
    }

    #[tokio::test]
    async fn test_huge_scan_depth_keeps_every_page() {
        let fetcher = five_page_blog();
        let walker = PageWalker::builder()
            .max_pages(5)
            .date_scan_pages(usize::MAX)
            .build()
            .unwrap();

        let walk = walker.walk(&fetcher, PAGE_1).await.unwrap();

        assert_eq!(walk.pages_walked, 5);
        assert_eq!(walk.window.earliest, Some(march(1)));
        assert_eq!(walk.window.latest, Some(march(8)));
    }

    #[tokio::test]
    async fn test_no_headings_leaves_window_open() {
        let fetcher = MockFetcher::new().page(
            PAGE_1,
            "<html><body><p>nothing</p></body></html>".to_string(),
        );
        let walker = PageWalker::new().unwrap();

        let walk = walker.walk(&fetcher, PAGE_1).await.unwrap();

        assert_eq!(walk.window, DateWindow::default());
        assert!(walk.records.is_empty());
    }
}

#[cfg(test)]
mod observer_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Counter {
        pages: AtomicUsize,
        records: AtomicUsize,
        errors: AtomicUsize,
        completed: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl WalkObserver for Counter {
        async fn on_page_walked(&self, visit: &PageVisit) {
            self.pages.fetch_add(1, Ordering::SeqCst);
            self.records.fetch_add(visit.records, Ordering::SeqCst);
        }

        async fn on_fetch_error(&self, _url: &str, _error: &FetchError) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        async fn on_walk_complete(&self, stats: &WalkStats) {
            self.completed.fetch_add(1, Ordering::SeqCst);
            assert!(stats.last_update >= stats.start_time);
        }
    }

    #[tokio::test]
    async fn test_observer_sees_every_page() {
        let counter = Arc::new(Counter::default());
        let walker = PageWalker::builder()
            .max_pages(5)
            .observe_with(counter.clone())
            .build()
            .unwrap();

        walker.walk(&five_page_blog(), PAGE_1).await.unwrap();

        assert_eq!(counter.pages.load(Ordering::SeqCst), 5);
        assert_eq!(counter.records.load(Ordering::SeqCst), 7);
        assert_eq!(counter.errors.load(Ordering::SeqCst), 0);
        assert_eq!(counter.completed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_observer_sees_fetch_error() {
        let counter = Arc::new(Counter::default());
        let walker = PageWalker::builder()
            .observe_with(counter.clone())
            .build()
            .unwrap();
        let fetcher = five_page_blog().failing(PAGE_3, "timed out");

        assert!(walker.walk(&fetcher, PAGE_1).await.is_err());

        assert_eq!(counter.pages.load(Ordering::SeqCst), 2);
        assert_eq!(counter.errors.load(Ordering::SeqCst), 1);
        assert_eq!(counter.completed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_registry_counts_observers() {
        let mut registry = ObserverRegistry::new();
        assert!(registry.is_empty());

        registry.register(Arc::new(Counter::default()));
        registry.register(Arc::new(Counter::default()));
        assert_eq!(registry.len(), 2);
    }
}
