//! HTTP module
//!
//! Provides the scraping session and the page fetcher.
//!
//! # Features
//!
//! - **Owned Session**: one cookie-keeping client per scrape invocation
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Single Attempt**: the fetcher never retries; the controller decides
//! - **Request Shapes**: fixed-order listing URLs per page index and sort variant

mod client;
mod fetcher;
mod rate_limit;
mod request;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RawPage};
pub use fetcher::{FetchOutcome, HttpPageFetcher, PageFetcher};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use request::{ListingQuery, PageRequest};
