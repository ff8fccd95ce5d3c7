//! Delay between consecutive search queries

use std::fmt::Debug;
use std::time::Duration;

use crate::utils::DEFAULT_QUERY_DELAY;

/// Pause inserted between two queries of the same round
pub trait QueryPacing: Debug + Send + Sync {
    fn delay(&self) -> Duration;
}

/// The same pause before every query after the first
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl Default for FixedDelay {
    fn default() -> Self {
        Self(DEFAULT_QUERY_DELAY)
    }
}

impl QueryPacing for FixedDelay {
    fn delay(&self) -> Duration {
        self.0
    }
}

/// No pause at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl QueryPacing for NoPacing {
    fn delay(&self) -> Duration {
        Duration::ZERO
    }
}
