//! Classification types
//!
//! What the block detector can say about one received page.

use crate::http::RawPage;
use serde::Serialize;

/// What a recognisable listing page reports about itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ListingInfo {
    /// Page number the site says it rendered
    pub current_page: Option<u32>,
    /// Highest page number advertised by the pagination links
    pub last_page: Option<u32>,
    /// Number of review blocks on the page
    pub item_count: usize,
}

/// Why a page counts as empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum EmptyReason {
    /// First page, listing present, zero reviews: the business has none
    NoReviews,
    /// The site clamped the requested page down to its last page
    PastEnd {
        /// Last page number the site rendered instead
        last_page: u32,
    },
    /// Listing present but no reviews on a non-first page
    NoItems,
}

/// Why a page counts as blocked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum BlockReason {
    /// Challenge or interstitial page
    Challenge,
    /// Error status without a listing
    Status {
        /// HTTP status code
        status: u16,
    },
    /// Markup does not look like a listing at all
    UnrecognizedShape,
    /// The site rendered a later page than the one requested
    PageMismatch {
        /// Page number the site rendered
        rendered: u32,
    },
    /// Nothing to classify
    NoContent,
}

/// Classification of one received page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageClassification {
    /// Listing with extractable reviews
    Ok(ListingInfo),
    /// Listing without reviews
    Empty(EmptyReason),
    /// Not a usable listing
    Blocked(BlockReason),
}

impl PageClassification {
    /// Check if this is an ok page
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Check if this is an empty page
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty(_))
    }

    /// Check if this is a blocked page
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked(_))
    }

    /// Short name for logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ok(_) => "ok",
            Self::Empty(_) => "empty",
            Self::Blocked(_) => "blocked",
        }
    }
}

/// Classifies received pages. Implementations must be pure: the same page and
/// page number always give the same answer.
pub trait PageClassifier: Send + Sync {
    /// Classify a page fetched for site page number `page_number`
    fn classify(&self, page: &RawPage, page_number: u32) -> PageClassification;
}
