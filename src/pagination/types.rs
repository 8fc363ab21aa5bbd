//! Pagination run state and results
//!
//! `ScrapeSession` is the controller's private run-state; `ScrapeResult` is
//! what survives the run.

use serde::{Deserialize, Serialize};

/// Why a run could not prove it saw every page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IncompleteReason {
    /// A page failed on every variant and no bound placed it past the end
    AmbiguousBoundary {
        /// Index of the undeterminable page
        page_index: u32,
    },
    /// Too many failed attempts in a row
    SafetyCeiling {
        /// Failed attempts counted when the run stopped
        consecutive_blocked: u32,
    },
}

/// Terminal status of a scrape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScrapeStatus {
    /// An empty page was confirmed beyond the known last page
    Complete,
    /// Stopped without proof of exhaustion; more pages may exist
    PossiblyIncomplete {
        /// Why the boundary is uncertain
        reason: IncompleteReason,
    },
    /// Cancelled by the caller; records are partial
    Cancelled,
    /// Transport or extraction failure
    Error {
        /// Error message
        cause: String,
    },
}

impl ScrapeStatus {
    /// Status for an ambiguous page
    pub fn ambiguous(page_index: u32) -> Self {
        Self::PossiblyIncomplete {
            reason: IncompleteReason::AmbiguousBoundary { page_index },
        }
    }

    /// Status for a tripped safety ceiling
    pub fn ceiling(consecutive_blocked: u32) -> Self {
        Self::PossiblyIncomplete {
            reason: IncompleteReason::SafetyCeiling {
                consecutive_blocked,
            },
        }
    }

    /// Status for a failed run
    pub fn error(cause: impl ToString) -> Self {
        Self::Error {
            cause: cause.to_string(),
        }
    }

    /// Check if the run is known to be complete
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// Check if the run may have missed pages
    pub fn is_possibly_incomplete(&self) -> bool {
        matches!(self, Self::PossiblyIncomplete { .. })
    }

    /// Check if the run was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Check if the run failed
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Outcome of one scrape
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScrapeResult<R> {
    /// Records ordered by page index, then extraction order
    pub records: Vec<R>,
    /// Terminal status
    #[serde(flatten)]
    pub status: ScrapeStatus,
    /// Fetch attempts issued, retries and probe included
    pub pages_fetched: u32,
    /// Page indexes accepted from the alternate variant
    pub alternate_pages: Vec<u32>,
    /// Page indexes inside the listing that stayed empty on every variant
    pub skipped_pages: Vec<u32>,
}

impl<R> ScrapeResult<R> {
    /// Result of a run that never started
    pub fn failed(cause: impl ToString) -> Self {
        Self {
            records: Vec::new(),
            status: ScrapeStatus::error(cause),
            pages_fetched: 0,
            alternate_pages: Vec::new(),
            skipped_pages: Vec::new(),
        }
    }

    /// Number of records collected
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

/// Run-state of one controller invocation
#[derive(Debug, Clone)]
pub struct ScrapeSession<R> {
    /// Index being worked on
    pub current_page_index: u32,
    /// Highest index accepted as `Ok`
    pub last_known_good_index: Option<u32>,
    /// Index of the last page, once the site has revealed it
    pub page_bound: Option<u32>,
    /// Failed attempts since the last resolved page
    pub consecutive_blocked_count: u32,
    /// Append-only record sequence
    pub collected_records: Vec<R>,
    /// Indexes accepted from the alternate variant
    pub alternate_pages: Vec<u32>,
    /// Indexes skipped as empty inside the bound
    pub skipped_pages: Vec<u32>,
    /// Fetch attempts issued
    pub pages_fetched: u32,
}

impl<R> Default for ScrapeSession<R> {
    fn default() -> Self {
        Self {
            current_page_index: 0,
            last_known_good_index: None,
            page_bound: None,
            consecutive_blocked_count: 0,
            collected_records: Vec::new(),
            alternate_pages: Vec::new(),
            skipped_pages: Vec::new(),
            pages_fetched: 0,
        }
    }
}

impl<R> ScrapeSession<R> {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept the records of an `Ok` page
    pub fn accept_page(&mut self, page_index: u32, records: Vec<R>) {
        self.collected_records.extend(records);
        self.consecutive_blocked_count = 0;
        self.last_known_good_index = Some(page_index);
    }

    /// Pass over a page that is empty inside the bound
    pub fn skip_page(&mut self, page_index: u32) {
        self.skipped_pages.push(page_index);
        self.consecutive_blocked_count = 0;
    }

    /// Raise the known bound; never lowers it
    pub fn raise_bound(&mut self, page_index: u32) {
        self.page_bound = Some(self.page_bound.map_or(page_index, |b| b.max(page_index)));
    }

    /// Check if a page index lies past the known bound
    pub fn is_beyond_bound(&self, page_index: u32) -> bool {
        self.page_bound.is_some_and(|bound| page_index > bound)
    }

    /// Count a failed attempt, returning the new count
    pub fn record_failed_attempt(&mut self) -> u32 {
        self.consecutive_blocked_count += 1;
        self.consecutive_blocked_count
    }

    /// Close the session into a result
    pub fn into_result(self, status: ScrapeStatus) -> ScrapeResult<R> {
        ScrapeResult {
            records: self.collected_records,
            status,
            pages_fetched: self.pages_fetched,
            alternate_pages: self.alternate_pages,
            skipped_pages: self.skipped_pages,
        }
    }
}
