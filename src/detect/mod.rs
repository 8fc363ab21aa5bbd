//! Block detection module
//!
//! Classifies a received page as `Ok`, `Empty` or `Blocked`.
//!
//! # Overview
//!
//! The upstream site answers blocked clients with pages that look nothing like
//! a listing (challenges, interstitials, error pages), and answers requests for
//! pages past the end by clamping to its last page. The detector turns those
//! shapes into a `PageClassification` without keeping any state, so the same
//! content always classifies the same way.

mod detector;
mod types;

pub use detector::{BlockDetector, ListingShape};
pub use types::{BlockReason, EmptyReason, ListingInfo, PageClassification, PageClassifier};

#[cfg(test)]
mod tests;
