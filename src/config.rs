//! Scraper configuration
//!
//! All settings live in a single `ScraperConfig` that can be loaded from YAML.
//! Every field has a default, so an empty document (or no file at all) yields
//! a configuration that targets LendingTree business review pages.

use crate::error::{Error, Result, ResultExt};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::BackoffType;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete scraper configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Target site: URLs, query parameters and selectors
    #[serde(default)]
    pub site: SiteConfig,

    /// HTTP session settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Pagination controller settings
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Review extraction settings
    #[serde(default)]
    pub extract: ExtractConfig,
}

impl ScraperConfig {
    /// Parse a configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml_str(&yaml)
    }

    /// Serialize the configuration back to YAML
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.site.base_url)?;

        if self.site.host.is_empty() {
            return Err(Error::invalid_value("site.host", "must not be empty"));
        }
        if self.site.primary_sort == self.site.alternate_sort {
            return Err(Error::invalid_value(
                "site.alternate_sort",
                "must differ from site.primary_sort",
            ));
        }
        if self.http.timeout_seconds == 0 {
            return Err(Error::invalid_value("http.timeout_seconds", "must be > 0"));
        }
        if self.pagination.retry_attempts == 0 {
            return Err(Error::invalid_value(
                "pagination.retry_attempts",
                "must be > 0",
            ));
        }
        if self.pagination.blocked_ceiling == 0 {
            return Err(Error::invalid_value(
                "pagination.blocked_ceiling",
                "must be > 0",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Site Config
// ============================================================================

/// Where and how to request listing pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Hostname accepted in business URLs
    #[serde(default = "default_host")]
    pub host: String,

    /// Base URL requests are sent to (scheme + authority)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Query parameter carrying the page number
    #[serde(default = "default_page_param")]
    pub page_param: String,

    /// Query parameter carrying the sort order
    #[serde(default = "default_sort_param")]
    pub sort_param: String,

    /// Sort value for the primary variant
    #[serde(default = "default_primary_sort")]
    pub primary_sort: String,

    /// Sort value for the alternate variant
    #[serde(default = "default_alternate_sort")]
    pub alternate_sort: String,

    /// Optional query parameter for the page size hint
    #[serde(default)]
    pub page_size_param: Option<String>,

    /// Site page number of the first page
    #[serde(default = "default_first_page")]
    pub first_page: u32,

    /// Selector matching one review block
    #[serde(default = "default_review_selector")]
    pub review_selector: String,

    /// Selector for the element holding the currently loaded page number
    #[serde(default = "default_page_number_selector")]
    pub page_number_selector: String,

    /// Selector for pagination links advertising the last page
    #[serde(default)]
    pub last_page_selector: Option<String>,

    /// Selector for the listing container present even when there are no reviews
    #[serde(default = "default_listing_selector")]
    pub listing_selector: String,

    /// Case-insensitive body markers of challenge/interstitial pages
    #[serde(default = "default_challenge_markers")]
    pub challenge_markers: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            base_url: default_base_url(),
            page_param: default_page_param(),
            sort_param: default_sort_param(),
            primary_sort: default_primary_sort(),
            alternate_sort: default_alternate_sort(),
            page_size_param: None,
            first_page: default_first_page(),
            review_selector: default_review_selector(),
            page_number_selector: default_page_number_selector(),
            last_page_selector: None,
            listing_selector: default_listing_selector(),
            challenge_markers: default_challenge_markers(),
        }
    }
}

fn default_host() -> String {
    "www.lendingtree.com".to_string()
}

fn default_base_url() -> String {
    "https://www.lendingtree.com".to_string()
}

fn default_page_param() -> String {
    "pid".to_string()
}

fn default_sort_param() -> String {
    "sort".to_string()
}

// base64("reviewsubmitted_desc")
fn default_primary_sort() -> String {
    "cmV2aWV3c3VibWl0dGVkX2Rlc2M=".to_string()
}

// base64("reviewsubmitted_asc")
fn default_alternate_sort() -> String {
    "cmV2aWV3c3VibWl0dGVkX2FzYw==".to_string()
}

fn default_first_page() -> u32 {
    1
}

fn default_review_selector() -> String {
    ".mainReviews".to_string()
}

fn default_page_number_selector() -> String {
    ".pageNum .page-link".to_string()
}

fn default_listing_selector() -> String {
    ".lenderReviews".to_string()
}

fn default_challenge_markers() -> Vec<String> {
    vec![
        "captcha".to_string(),
        "access denied".to_string(),
        "request unsuccessful".to_string(),
        "cf-chl".to_string(),
    ]
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Client-side rate limit
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl HttpConfig {
    /// Build the HTTP client config for one session
    pub fn client_config(&self) -> HttpClientConfig {
        let builder = HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_seconds))
            .user_agent(&self.user_agent);
        if self.rate_limit.enabled {
            builder
                .rate_limit(RateLimiterConfig::new(
                    self.rate_limit.requests_per_second,
                    self.rate_limit.burst_size,
                ))
                .build()
        } else {
            builder.no_rate_limit().build()
        }
    }
}

fn default_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    format!("review-scrape/{}", env!("CARGO_PKG_VERSION"))
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Whether to rate limit at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Requests per second limit
    #[serde(default = "default_rps")]
    pub requests_per_second: u32,

    /// Burst size
    #[serde(default = "default_burst")]
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_second: default_rps(),
            burst_size: default_burst(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_rps() -> u32 {
    2
}

fn default_burst() -> u32 {
    2
}

// ============================================================================
// Pagination Config
// ============================================================================

/// Pagination controller settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Retries of the same request after a transport error
    #[serde(default = "default_transport_retries")]
    pub transport_retries: u32,

    /// Backoff between transport retries
    #[serde(default)]
    pub retry_backoff: BackoffConfig,

    /// Attempts per page across sort variants
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,

    /// Consecutive failed attempts tolerated before giving up
    #[serde(default = "default_blocked_ceiling")]
    pub blocked_ceiling: u32,

    /// Request an out-of-range page first to learn the last page from clamping
    #[serde(default = "default_probe_last_page")]
    pub probe_last_page: bool,

    /// Page number used by the bound probe
    #[serde(default = "default_probe_page_number")]
    pub probe_page_number: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            transport_retries: default_transport_retries(),
            retry_backoff: BackoffConfig::default(),
            retry_attempts: default_retry_attempts(),
            blocked_ceiling: default_blocked_ceiling(),
            probe_last_page: default_probe_last_page(),
            probe_page_number: default_probe_page_number(),
        }
    }
}

impl PaginationConfig {
    /// Delay before transport retry number `attempt` (0-based)
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        self.retry_backoff.backoff_type.delay(
            Duration::from_millis(self.retry_backoff.initial_ms),
            Duration::from_millis(self.retry_backoff.max_ms),
            attempt,
        )
    }
}

fn default_transport_retries() -> u32 {
    1
}

fn default_retry_attempts() -> u32 {
    2
}

fn default_blocked_ceiling() -> u32 {
    3
}

fn default_probe_last_page() -> bool {
    true
}

fn default_probe_page_number() -> u32 {
    999_999_999
}

/// Backoff configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    500
}

fn default_max_ms() -> u64 {
    5000
}

// ============================================================================
// Extract Config
// ============================================================================

/// Review extraction settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Fail the page on the first unparseable review instead of skipping it
    #[serde(default)]
    pub strict: bool,
}
