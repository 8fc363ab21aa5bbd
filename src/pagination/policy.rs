//! Retry-variant policies
//!
//! A policy decides which request shape to try next after a page came back
//! blocked or ambiguously empty. The controller's state machine only asks
//! the policy; swapping in a proxy rotation or a different heuristic does not
//! touch it.

use crate::types::SortVariant;
use std::fmt::Debug;

/// Chooses the request variant for each attempt at a page
pub trait RetryPolicy: Send + Sync + Debug {
    /// Variant for the first attempt at every page
    fn initial_variant(&self) -> SortVariant {
        SortVariant::Primary
    }

    /// Variant to try after `attempt` (1-based count of failed attempts at
    /// this page) came back unusable with `last`, or `None` to give up.
    fn next_variant(&self, attempt: u32, last: SortVariant) -> Option<SortVariant>;
}

/// Primary, then alternate, then give up
#[derive(Debug, Clone, Copy, Default)]
pub struct AlternateSortPolicy;

impl RetryPolicy for AlternateSortPolicy {
    fn next_variant(&self, _attempt: u32, last: SortVariant) -> Option<SortVariant> {
        last.is_primary().then_some(SortVariant::Alternate)
    }
}

/// Alternates between the two variants for a fixed number of attempts
#[derive(Debug, Clone, Copy)]
pub struct AlternatingSortPolicy {
    attempts: u32,
}

impl AlternatingSortPolicy {
    /// Allow `attempts` tries per page, at least one
    pub fn new(attempts: u32) -> Self {
        Self {
            attempts: attempts.max(1),
        }
    }

    /// Tries per page
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl RetryPolicy for AlternatingSortPolicy {
    fn next_variant(&self, attempt: u32, last: SortVariant) -> Option<SortVariant> {
        (attempt < self.attempts).then(|| last.other())
    }
}

/// Policy for a configured number of attempts per page
pub fn policy_for_attempts(attempts: u32) -> Box<dyn RetryPolicy> {
    if attempts == 2 {
        Box::new(AlternateSortPolicy)
    } else {
        Box::new(AlternatingSortPolicy::new(attempts))
    }
}
