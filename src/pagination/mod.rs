//! Pagination module
//!
//! The block-aware pagination controller.
//!
//! # Overview
//!
//! The review site answers a blocked client and an exhausted listing with
//! pages that can look identical. The controller therefore never takes a
//! single empty or blocked page as proof of the end: it re-requests the page
//! with another sort order, and when that also fails it reports the run as
//! possibly incomplete instead of claiming completeness. A run is `Complete`
//! only when an empty page lies past a bound learned from the site itself.

mod controller;
mod policy;
mod types;

pub use controller::PaginationController;
pub use policy::{policy_for_attempts, AlternateSortPolicy, AlternatingSortPolicy, RetryPolicy};
pub use types::{IncompleteReason, ScrapeResult, ScrapeSession, ScrapeStatus};
