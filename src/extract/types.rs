//! Review record types and the extractor trait

use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Review author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Display name
    pub name: String,
    /// "City, ST" as shown on the site
    pub location: String,
}

/// One normalized review
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Review title
    pub title: String,
    /// Review body
    pub content: String,
    /// Author
    pub author: Author,
    /// Month of the review, pinned to the first day
    pub review_date: NaiveDate,
    /// Star rating, 0 to 5
    pub star_rating: u8,
}

/// Turns the content of an `Ok` page into records.
///
/// Well-formed content without items yields an empty vector, never an error.
pub trait PageExtractor: Send + Sync {
    /// Record type produced
    type Record: Send;

    /// Extract records in page order
    fn extract(&self, content: &str) -> Result<Vec<Self::Record>>;
}
