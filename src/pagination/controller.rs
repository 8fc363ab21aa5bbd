//! Pagination controller
//!
//! Walks listing pages in ascending order, asking the retry policy for
//! another request shape whenever a page comes back blocked or ambiguously
//! empty, and stops once it can prove the end, gives up, or is cancelled.

use super::policy::{policy_for_attempts, RetryPolicy};
use super::types::{ScrapeResult, ScrapeSession, ScrapeStatus};
use crate::config::PaginationConfig;
use crate::detect::{BlockReason, EmptyReason, ListingInfo, PageClassification, PageClassifier};
use crate::error::{Error, Result};
use crate::extract::PageExtractor;
use crate::http::{FetchOutcome, ListingQuery, PageFetcher, PageRequest, RawPage};
use crate::types::SortVariant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// What happened to one page request, transport retries included
enum Attempt {
    Received(RawPage, PageClassification),
    Cancelled,
    Failed(Error),
}

/// What the controller does after finishing with a page
enum Step {
    Advance,
    Stop(ScrapeStatus),
}

/// Drives fetcher, classifier and extractor across the pages of one listing
pub struct PaginationController<F, C, E> {
    fetcher: F,
    classifier: C,
    extractor: E,
    query: ListingQuery,
    config: PaginationConfig,
    policy: Box<dyn RetryPolicy>,
}

impl<F, C, E> PaginationController<F, C, E>
where
    F: PageFetcher,
    C: PageClassifier,
    E: PageExtractor,
{
    /// Create a controller; the retry policy follows `config.retry_attempts`
    pub fn new(
        fetcher: F,
        classifier: C,
        extractor: E,
        query: ListingQuery,
        config: PaginationConfig,
    ) -> Self {
        Self {
            policy: policy_for_attempts(config.retry_attempts),
            fetcher,
            classifier,
            extractor,
            query,
            config,
        }
    }

    /// Replace the retry policy
    #[must_use]
    pub fn with_policy(mut self, policy: impl RetryPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Get the fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Scrape the listing until a stop condition fires.
    ///
    /// Never fails: every way out is reported through the result status,
    /// with the records collected so far.
    pub async fn run(&self, cancel: &CancellationToken) -> ScrapeResult<E::Record> {
        let mut session = ScrapeSession::new();
        info!("Starting scrape of {}", self.query.listing_url());

        let status = self.drive(&mut session, cancel).await;

        info!(
            records = session.collected_records.len(),
            fetches = session.pages_fetched,
            "Scrape of {} finished: {:?}",
            self.query.listing_url(),
            status
        );
        session.into_result(status)
    }

    async fn drive(
        &self,
        session: &mut ScrapeSession<E::Record>,
        cancel: &CancellationToken,
    ) -> ScrapeStatus {
        if self.config.probe_last_page {
            self.probe_bound(session, cancel).await;
        }

        let mut index = 0u32;
        loop {
            if cancel.is_cancelled() {
                info!("Cancelled before page index {}", index);
                return ScrapeStatus::Cancelled;
            }
            session.current_page_index = index;

            match self.process_page(index, session, cancel).await {
                Step::Advance => match index.checked_add(1) {
                    Some(next) => index = next,
                    None => return ScrapeStatus::ambiguous(index),
                },
                Step::Stop(status) => return status,
            }
        }
    }

    /// Request a page number far past any real listing; the site clamps it
    /// to its last page, which becomes the initial bound.
    async fn probe_bound(&self, session: &mut ScrapeSession<E::Record>, cancel: &CancellationToken) {
        let request = self
            .query
            .request_for_number(self.config.probe_page_number, self.policy.initial_variant());

        let Some(outcome) = self.fetch_cancellable(&request, session, cancel).await else {
            return;
        };

        let last_page = match self.classify(outcome, &request) {
            Ok((_, PageClassification::Empty(EmptyReason::PastEnd { last_page }))) => last_page,
            Ok((_, PageClassification::Ok(ListingInfo { last_page: Some(last_page), .. }))) => {
                last_page
            }
            Ok((_, class)) => {
                debug!("Bound probe inconclusive: {}", class.label());
                return;
            }
            Err(e) => {
                warn!("Bound probe failed: {}", e);
                return;
            }
        };

        if let Some(bound) = self.query.page_index(last_page) {
            debug!("Bound probe found last page {}", last_page);
            session.raise_bound(bound);
        }
    }

    async fn process_page(
        &self,
        index: u32,
        session: &mut ScrapeSession<E::Record>,
        cancel: &CancellationToken,
    ) -> Step {
        let mut variant = self.policy.initial_variant();
        let mut attempt = 0u32;
        let mut only_empty = true;

        loop {
            let request = self.query.request(index, variant);
            let (page, class) = match self.fetch_page(&request, session, cancel).await {
                Attempt::Received(page, class) => (page, class),
                Attempt::Cancelled => return Step::Stop(ScrapeStatus::Cancelled),
                Attempt::Failed(e) => {
                    warn!(page = index, variant = %variant, "Giving up on transport error: {}", e);
                    return Step::Stop(ScrapeStatus::error(e));
                }
            };

            debug!(
                page = index,
                variant = %variant,
                "Page {} classified {}",
                request.page_number,
                class.label()
            );

            match class {
                PageClassification::Ok(info) => {
                    return self.accept(index, variant, &page, info, session);
                }
                PageClassification::Empty(reason) => {
                    if let Some(stop) = self.on_empty(index, reason, session) {
                        return stop;
                    }
                }
                PageClassification::Blocked(reason) => {
                    only_empty = false;
                    warn!(page = index, variant = %variant, "Page blocked: {:?}", reason);
                }
            }

            attempt += 1;
            let failed = session.record_failed_attempt();
            if failed >= self.config.blocked_ceiling {
                // A known end outranks the ceiling
                if session.is_beyond_bound(index) {
                    break;
                }
                warn!("{} failed attempts in a row, stopping", failed);
                return Step::Stop(ScrapeStatus::ceiling(failed));
            }

            match self.policy.next_variant(attempt, variant) {
                Some(next) => variant = next,
                None => break,
            }
        }

        if session.is_beyond_bound(index) {
            info!("Page index {} is past the last page", index);
            Step::Stop(ScrapeStatus::Complete)
        } else if only_empty && session.page_bound.is_some() {
            warn!(
                "Page index {} is empty on every variant inside the listing, skipping",
                index
            );
            session.skip_page(index);
            Step::Advance
        } else {
            warn!(
                "Page index {} is undeterminable on every variant, stopping",
                index
            );
            Step::Stop(ScrapeStatus::ambiguous(index))
        }
    }

    /// Handle an empty page; `Some` when it proves the end of the listing
    fn on_empty(
        &self,
        index: u32,
        reason: EmptyReason,
        session: &mut ScrapeSession<E::Record>,
    ) -> Option<Step> {
        if let EmptyReason::PastEnd { last_page } = reason {
            if let Some(bound) = self.query.page_index(last_page) {
                session.raise_bound(bound);
            }
        }

        if session.is_beyond_bound(index) {
            info!("Page index {} is past the last page", index);
            return Some(Step::Stop(ScrapeStatus::Complete));
        }
        if index == 0 && reason == EmptyReason::NoReviews {
            info!("Listing has no reviews");
            return Some(Step::Stop(ScrapeStatus::Complete));
        }

        debug!("Empty page index {} inside the listing: {:?}", index, reason);
        None
    }

    fn accept(
        &self,
        index: u32,
        variant: SortVariant,
        page: &RawPage,
        info: ListingInfo,
        session: &mut ScrapeSession<E::Record>,
    ) -> Step {
        let records = match self.extractor.extract(&page.body) {
            Ok(records) => records,
            Err(e) => {
                warn!(page = index, "Extraction failed: {}", e);
                return Step::Stop(ScrapeStatus::error(e));
            }
        };

        debug!(
            page = index,
            "Accepted {} of {} listed items",
            records.len(),
            info.item_count
        );
        session.accept_page(index, records);

        if let Some(bound) = info.last_page.and_then(|n| self.query.page_index(n)) {
            session.raise_bound(bound);
        }
        if !variant.is_primary() {
            info!("Page index {} recovered with the {} sort", index, variant);
            session.alternate_pages.push(index);
        }

        Step::Advance
    }

    /// Fetch with transport retries and classify what arrived
    async fn fetch_page(
        &self,
        request: &PageRequest,
        session: &mut ScrapeSession<E::Record>,
        cancel: &CancellationToken,
    ) -> Attempt {
        let mut retry = 0u32;

        loop {
            let Some(outcome) = self.fetch_cancellable(request, session, cancel).await else {
                return Attempt::Cancelled;
            };

            match self.classify(outcome, request) {
                Ok((page, class)) => return Attempt::Received(page, class),
                Err(e) if retry < self.config.transport_retries => {
                    let delay = self.config.retry_delay(retry);
                    retry += 1;
                    warn!(
                        page = request.page_index,
                        variant = %request.sort_variant,
                        "Transport error, retry {}/{} in {:?}: {}",
                        retry,
                        self.config.transport_retries,
                        delay,
                        e
                    );

                    tokio::select! {
                        biased;
                        () = cancel.cancelled() => return Attempt::Cancelled,
                        () = tokio::time::sleep(delay) => {}
                    }
                }
                Err(e) => return Attempt::Failed(e),
            }
        }
    }

    /// One fetch raced against cancellation; `None` when cancelled
    async fn fetch_cancellable(
        &self,
        request: &PageRequest,
        session: &mut ScrapeSession<E::Record>,
        cancel: &CancellationToken,
    ) -> Option<FetchOutcome> {
        if cancel.is_cancelled() {
            return None;
        }
        session.pages_fetched += 1;

        tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            outcome = self.fetcher.fetch(request) => Some(outcome),
        }
    }

    fn classify(
        &self,
        outcome: FetchOutcome,
        request: &PageRequest,
    ) -> Result<(RawPage, PageClassification)> {
        match outcome {
            FetchOutcome::Success(page) => {
                let class = self.classifier.classify(&page, request.page_number);
                Ok((page, class))
            }
            FetchOutcome::EmptyOrBlocked(page) => {
                Ok((page, PageClassification::Blocked(BlockReason::NoContent)))
            }
            FetchOutcome::TransportError(e) => Err(e),
        }
    }
}
