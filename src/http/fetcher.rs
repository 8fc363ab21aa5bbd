//! Page fetcher
//!
//! Turns one `PageRequest` into one `FetchOutcome`. Content judgment is left
//! to the block detector; the fetcher only separates "something arrived" from
//! "nothing arrived".

use super::client::{HttpClient, RawPage};
use super::request::PageRequest;
use crate::error::Error;
use async_trait::async_trait;
use tracing::debug;

/// Result of one fetch attempt
#[derive(Debug)]
pub enum FetchOutcome {
    /// A payload was received
    Success(RawPage),
    /// A response arrived with nothing to classify
    EmptyOrBlocked(RawPage),
    /// Nothing usable arrived (timeout, DNS, reset, gateway failure)
    TransportError(Error),
}

impl FetchOutcome {
    /// Received page, if any
    pub fn page(&self) -> Option<&RawPage> {
        match self {
            Self::Success(page) | Self::EmptyOrBlocked(page) => Some(page),
            Self::TransportError(_) => None,
        }
    }

    /// Check if this is a transport error
    pub fn is_transport_error(&self) -> bool {
        matches!(self, Self::TransportError(_))
    }
}

/// Performs a single retrieval per request
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page. Must not retry internally.
    async fn fetch(&self, request: &PageRequest) -> FetchOutcome;
}

/// Page fetcher backed by an owned HTTP session
#[derive(Debug)]
pub struct HttpPageFetcher {
    session: HttpClient,
}

impl HttpPageFetcher {
    /// Create a fetcher owning the given session
    pub fn new(session: HttpClient) -> Self {
        Self { session }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, request: &PageRequest) -> FetchOutcome {
        debug!(
            page = request.page_index,
            variant = %request.sort_variant,
            "Fetching {}",
            request.target_url
        );

        match self.session.get_page(&request.target_url).await {
            Ok(page) if page.is_blank() => FetchOutcome::EmptyOrBlocked(page),
            Ok(page) => FetchOutcome::Success(page),
            Err(e) => FetchOutcome::TransportError(e),
        }
    }
}
