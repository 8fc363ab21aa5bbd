//! Engine types
//!
//! The business a scrape is aimed at, as parsed from a review page URL.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

static BUSINESS_PATH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/reviews/business/(?P<slug>[a-zA-Z0-9-]+)/(?P<id>[0-9]+)/?$").unwrap()
});

/// A business whose reviews are scraped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeTarget {
    /// URL slug of the business name
    pub business_slug: String,
    /// Numeric business id
    pub business_id: u64,
}

impl ScrapeTarget {
    /// Create a target
    pub fn new(business_slug: impl Into<String>, business_id: u64) -> Self {
        Self {
            business_slug: business_slug.into(),
            business_id,
        }
    }

    /// Parse a business review page URL such as
    /// `https://www.lendingtree.com/reviews/business/ondeck/51886298`.
    ///
    /// The host must equal `host`; the query string is ignored.
    pub fn parse(url: &str, host: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|e| Error::invalid_scrape_url(e.to_string()))?;

        if parsed.host_str() != Some(host) {
            return Err(Error::invalid_scrape_url("Invalid hostname"));
        }

        let invalid_args =
            || Error::invalid_scrape_url("Missing or invalid url args (business_slug, business_id)");

        let caps = BUSINESS_PATH_PATTERN
            .captures(parsed.path())
            .ok_or_else(invalid_args)?;
        let business_id = caps["id"].parse().map_err(|_| invalid_args())?;

        Ok(Self::new(&caps["slug"], business_id))
    }

    /// Listing path below the site base URL
    pub fn listing_path(&self) -> String {
        format!(
            "/reviews/business/{}/{}",
            self.business_slug, self.business_id
        )
    }
}

impl fmt::Display for ScrapeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.business_slug, self.business_id)
    }
}
