//! Common types used throughout review-scrape
//!
//! Shared type definitions used across the fetcher, the controller and the
//! configuration layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

// ============================================================================
// Sort Variant
// ============================================================================

/// Request shape used to fetch a listing page.
///
/// Both variants address the same underlying dataset; the alternate ordering
/// is only used as a probe when the primary shape comes back blocked or empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortVariant {
    /// Configured primary sort order
    #[default]
    Primary,
    /// Alternate sort order, used as a block probe
    Alternate,
}

impl SortVariant {
    /// Check if this is the primary variant
    pub fn is_primary(&self) -> bool {
        matches!(self, Self::Primary)
    }

    /// The other variant
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::Primary => Self::Alternate,
            Self::Alternate => Self::Primary,
        }
    }
}

impl fmt::Display for SortVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Alternate => f.write_str("alternate"),
        }
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for transport retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

impl BackoffType {
    /// Delay before retry number `attempt` (0-based), capped at `max`
    pub fn delay(&self, initial: Duration, max: Duration, attempt: u32) -> Duration {
        let delay = match self {
            Self::Constant => initial,
            Self::Linear => initial.saturating_mul(attempt + 1),
            Self::Exponential => initial.saturating_mul(2u32.saturating_pow(attempt)),
        };
        std::cmp::min(delay, max)
    }
}
