//! Scrape engine module
//!
//! Entry point for one scrape.
//!
//! # Overview
//!
//! The engine module provides:
//! - `ScrapeTarget` - The business to scrape, parsed from its review page URL
//! - `ScrapeEngine` - Builds a fresh HTTP session and controller per scrape
//!   and applies the caller's deadline
//!
//! Each invocation owns its session; nothing is shared between scrapes, so
//! concurrent scrapes are independent.

mod types;

pub use types::ScrapeTarget;

use crate::config::ScraperConfig;
use crate::detect::BlockDetector;
use crate::error::Result;
use crate::extract::{HtmlReviewExtractor, Review};
use crate::http::{HttpClient, HttpPageFetcher, ListingQuery};
use crate::pagination::{PaginationController, ScrapeResult};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Controller wired with the HTTP fetcher and the HTML collaborators
pub type ReviewController =
    PaginationController<HttpPageFetcher, BlockDetector, HtmlReviewExtractor>;

/// Scrape engine
#[derive(Debug, Clone, Default)]
pub struct ScrapeEngine {
    config: ScraperConfig,
}

impl ScrapeEngine {
    /// Create an engine with the given configuration
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }

    /// Parse a business review page URL against the configured host
    pub fn target_from_url(&self, url: &str) -> Result<ScrapeTarget> {
        ScrapeTarget::parse(url, &self.config.site.host)
    }

    /// Build a controller with its own session.
    ///
    /// Session construction is the one place where credentials would be
    /// attached.
    pub fn controller(
        &self,
        target: &ScrapeTarget,
        page_size_hint: Option<u32>,
    ) -> Result<ReviewController> {
        let site = &self.config.site;
        let session = HttpClient::with_config(self.config.http.client_config())?;
        let query = ListingQuery::new(site, &target.listing_path(), page_size_hint)?;

        Ok(PaginationController::new(
            HttpPageFetcher::new(session),
            BlockDetector::new(site)?,
            HtmlReviewExtractor::new(site, &self.config.extract)?,
            query,
            self.config.pagination.clone(),
        ))
    }

    /// Scrape every review of a business.
    ///
    /// Setup failures come back as an `Error` status like any other failure.
    pub async fn start_scrape(
        &self,
        target: &ScrapeTarget,
        page_size_hint: Option<u32>,
        cancel: &CancellationToken,
    ) -> ScrapeResult<Review> {
        let controller = match self.controller(target, page_size_hint) {
            Ok(controller) => controller,
            Err(e) => {
                warn!("Could not set up scrape of {}: {}", target, e);
                return ScrapeResult::failed(e);
            }
        };

        let result = controller.run(cancel).await;
        info!(
            "Scraped {} reviews of {} ({} fetches)",
            result.record_count(),
            target,
            result.pages_fetched
        );
        result
    }

    /// Scrape a business, cancelling the run once `deadline` has elapsed.
    ///
    /// A run stopped by the deadline carries the records collected so far
    /// with a `Cancelled` status.
    pub async fn scrape_with_deadline(
        &self,
        target: &ScrapeTarget,
        page_size_hint: Option<u32>,
        deadline: Option<Duration>,
        cancel: &CancellationToken,
    ) -> ScrapeResult<Review> {
        let run_token = cancel.child_token();

        let timer = deadline.map(|deadline| {
            let token = run_token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(deadline).await;
                warn!("Deadline of {:?} reached, cancelling scrape", deadline);
                token.cancel();
            })
        });

        let result = self.start_scrape(target, page_size_hint, &run_token).await;

        if let Some(timer) = timer {
            timer.abort();
        }
        result
    }

    /// Scrape the business behind a review page URL.
    ///
    /// Fails only when the URL is not a business review page on the
    /// configured host.
    pub async fn scrape_url(
        &self,
        url: &str,
        page_size_hint: Option<u32>,
        deadline: Option<Duration>,
        cancel: &CancellationToken,
    ) -> Result<ScrapeResult<Review>> {
        let target = self.target_from_url(url)?;
        Ok(self
            .scrape_with_deadline(&target, page_size_hint, deadline, cancel)
            .await)
    }
}
