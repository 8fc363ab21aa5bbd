//! Review extraction module
//!
//! Parses `Ok` listing pages into `Review` records. The pagination controller
//! only sees the `PageExtractor` trait and treats records as opaque.

mod parser;
mod types;

pub use parser::HtmlReviewExtractor;
pub use types::{Author, PageExtractor, Review};
