// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Review Scrape
//!
//! A block-aware scraper for paginated business review listings.
//!
//! Listing sites throttle scrapers by serving empty pages, challenge pages or
//! pages that silently drop their content. A naive crawler reads any of those
//! as "no more pages" and returns a truncated result as if it were complete.
//! This crate walks pages in order, tells a real end of the listing apart from
//! a block, retries blocked pages with a different sort order, and reports
//! whether the result is complete, possibly incomplete, cancelled or failed.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use review_scrape::{ScrapeEngine, ScraperConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> review_scrape::Result<()> {
//!     let engine = ScrapeEngine::new(ScraperConfig::default());
//!     let result = engine
//!         .scrape_url(
//!             "https://www.lendingtree.com/reviews/business/ondeck/51886298",
//!             None,
//!             None,
//!             &CancellationToken::new(),
//!         )
//!         .await?;
//!
//!     println!("{} reviews, {:?}", result.record_count(), result.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         ScrapeEngine                            │
//! │  target_from_url() → ScrapeTarget    start_scrape() → Result    │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   PaginationController                          │
//! │  bound · consecutive failures · retry policy · cancellation     │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────────┬───────────┴────────────┬─────────────────────┐
//! │      HTTP        │        Detect          │      Extract        │
//! ├──────────────────┼────────────────────────┼─────────────────────┤
//! │ Session/cookies  │ Ok (page n of m)       │ Title / content     │
//! │ Rate limit       │ Empty (end, no items)  │ Author / location   │
//! │ Fetch outcome    │ Blocked (challenge, …) │ Date / stars        │
//! └──────────────────┴────────────────────────┴─────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types
pub mod types;

/// Scraper configuration
pub mod config;

/// HTTP session, rate limiting and page fetching
pub mod http;

/// Page classification
pub mod detect;

/// Review extraction
pub mod extract;

/// Block-aware pagination
pub mod pagination;

/// Scrape entry point
pub mod engine;

/// Command-line interface
pub mod cli;

mod html;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::ScraperConfig;
pub use engine::{ScrapeEngine, ScrapeTarget};
pub use error::{Error, Result};
pub use extract::{Author, Review};
pub use pagination::{IncompleteReason, ScrapeResult, ScrapeStatus};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
