//! Error types for fetching, extracting and configuring a blotter walk
//!
//! Only network failures and invalid configuration are hard errors. A post
//! that is missing pieces, or a date heading in an unexpected format, is
//! reported through [`ExtractionError`] / [`ParseError`] so the caller can
//! count it as an anomaly and carry on with the rest of the page.

/// Errors that can occur while retrieving a listing page
///
/// Any of these aborts the walk that triggered the fetch. There is no retry
/// inside the crate; wrap the [`PageFetcher`](crate::PageFetcher) if you
/// need one.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {error}")]
    Client {
        #[source]
        error: reqwest::Error,
    },

    /// The request could not be sent or the body could not be read
    #[error("Request to '{url}' failed: {error}")]
    Request {
        url: String,
        #[source]
        error: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("'{url}' answered with HTTP {status}")]
    Status { url: String, status: u16 },

    /// The page could not be produced for another reason
    ///
    /// Used by fetchers that are not backed by HTTP (fixtures, caches).
    #[error("'{url}' is unavailable: {reason}")]
    Unavailable { url: String, reason: String },
}

/// A post that could not be turned into a record
///
/// This is a parse anomaly, not a failure of the walk.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// A required field did not match anything inside the post
    #[error("Post '{post_id}' has no {field}")]
    MissingField {
        field: &'static str,
        post_id: String,
    },
}

/// Errors that can occur when converting extracted text into a value
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A date heading did not match the expected format
    #[error("Malformed date '{text}': {error}")]
    MalformedDate {
        text: String,
        #[source]
        error: chrono::ParseError,
    },

    /// The element had no text after trimming
    #[error("Expected text, found only whitespace")]
    Empty,
}

/// Errors that can occur while validating configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The page budget must allow at least one page
    #[error("Max pages must be greater than 0, got {0}")]
    InvalidMaxPages(usize),

    /// At least one date heading per page has to be scanned
    #[error("Date headings per page must be greater than 0, got {0}")]
    InvalidHeadersPerPage(usize),

    /// The leaderboard needs at least one slot
    #[error("Leaderboard size must be greater than 0, got {0}")]
    InvalidTopN(usize),

    /// The start URL is not an absolute http(s) URL
    #[error("Invalid start URL '{url}': {reason}")]
    InvalidStartUrl { url: String, reason: String },

    /// A layout selector failed to parse
    #[error("Failed to parse selector '{selector}': {error}")]
    InvalidSelector { selector: String, error: String },
}

/// Errors from loading or saving a [`RecordStore`](crate::RecordStore)
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Record store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Record store is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
