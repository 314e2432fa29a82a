//! Walk, aggregate, rank and assemble in one call

use tracing::{info, warn};

use crate::{BoardConfig, ConfigError, Leaderboard, PageFetcher, PageWalker, RecordStore, WalkError};

/// One configured scrape of the blog
///
/// All aggregation state lives inside a single [`run`](Self::run) call. The
/// only state that outlives a run is the [`RecordStore`] the caller passes
/// in, so concurrent runs never share mutable totals.
pub struct Pipeline<F> {
    walker: PageWalker,
    fetcher: F,
    start_url: String,
    top_n: usize,
}

impl<F: PageFetcher> Pipeline<F> {
    pub fn new(walker: PageWalker, fetcher: F, start_url: impl Into<String>, top_n: usize) -> Self {
        Self {
            walker,
            fetcher,
            start_url: start_url.into(),
            top_n,
        }
    }

    /// Validate `config` and build the walker it describes
    pub fn from_config(config: &BoardConfig, fetcher: F) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(
            config.walker()?,
            fetcher,
            config.start_url.clone(),
            config.top_n,
        ))
    }

    pub fn start_url(&self) -> &str {
        &self.start_url
    }

    /// Walk the blog and build the leaderboard
    ///
    /// Every record read, including those from an aborted walk, is appended
    /// to `store`.
    ///
    /// # Errors
    ///
    /// [`WalkError`] when a page fails to fetch. No leaderboard is built from
    /// the partial walk; its records are reachable through
    /// [`WalkError::partial`].
    pub async fn run(&self, store: &mut RecordStore) -> Result<Leaderboard, WalkError> {
        let walk = match self.walker.walk(&self.fetcher, &self.start_url).await {
            Ok(walk) => walk,
            Err(error) => {
                let partial = error.partial();
                warn!(
                    pages = partial.pages_walked,
                    records = partial.records.len(),
                    "walk aborted; no leaderboard built"
                );
                store.append(partial.records.iter().cloned());
                return Err(error);
            }
        };

        let board = Leaderboard::build(&walk.records, walk.window, walk.pages_walked, self.top_n);
        info!(
            entries = board.entries.len(),
            records = walk.records.len(),
            "leaderboard built"
        );
        store.append(walk.records);
        Ok(board)
    }
}
