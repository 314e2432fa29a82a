//! Walk a paginated arrest-notice blog and rank the most-arrested names
//!
//! The pipeline is: [`PageWalker`] fetches listing pages one at a time and
//! extracts an [`ArrestRecord`] per post, [`aggregate`] folds records into
//! per-person totals, [`dense_rank`] assigns ranks, and [`Leaderboard`]
//! joins the top entries with their ranks and the observed [`DateWindow`].

// Core modules
mod backend;
mod error;
mod extract;
mod item;

pub mod aggregate;
pub mod cache;
pub mod charges;
pub mod config;
pub mod fetch;
pub mod layout;
pub mod leaderboard;
pub mod names;
pub mod page;
pub mod pipeline;
pub mod rank;
pub mod store;
pub mod walker;

// Public exports
pub use aggregate::{Aggregates, PersonAggregate, aggregate};
pub use backend::HtmlNode;
pub use cache::LeaderboardCache;
pub use charges::count_for_charge;
pub use config::BoardConfig;
pub use error::{ConfigError, ExtractionError, FetchError, ParseError, StoreError};
pub use extract::{FromHtml, parse_post_date};
pub use fetch::{HttpFetcher, PageFetcher};
pub use item::ArrestRecord;
pub use layout::{CompiledLayout, SiteLayout};
pub use leaderboard::{DateWindow, Leaderboard, RankedEntry, assemble};
pub use names::{canonical_name, extract_name};
pub use page::ListingPage;
pub use pipeline::Pipeline;
pub use rank::{dense_rank, rank_aggregates, standings};
pub use store::{Game, GameCharge, RecordStore, Suspect};
pub use walker::{
    DatePolicy, ObserverRegistry, PageVisit, PageWalker, PartialWalk, StopReason, Walk,
    WalkError, WalkObserver, WalkStats, WalkerBuilder,
};
