//! Pluggable request policies for the content fetcher
//!
//! User-agent rotation and retry backoff are traits so tests can make both
//! deterministic (fixed agent, zero delay).

use std::fmt::Debug;
use std::time::Duration;

use rand::Rng;

use crate::utils::{DEFAULT_BACKOFF_BASE, USER_AGENT_POOL};

/// Chooses the `User-Agent` for each request
pub trait UserAgentRotation: Debug + Send + Sync {
    fn next_user_agent(&self) -> String;
}

/// Uniform random pick from a fixed pool
#[derive(Debug, Clone)]
pub struct RandomUserAgent {
    pool: Vec<String>,
}

impl Default for RandomUserAgent {
    fn default() -> Self {
        Self {
            pool: USER_AGENT_POOL.iter().map(|ua| (*ua).to_string()).collect(),
        }
    }
}

impl RandomUserAgent {
    /// Rotate over a custom pool; an empty pool falls back to the default one
    #[must_use]
    pub fn new(pool: Vec<String>) -> Self {
        if pool.is_empty() {
            Self::default()
        } else {
            Self { pool }
        }
    }

    #[must_use]
    pub fn pool(&self) -> &[String] {
        &self.pool
    }
}

impl UserAgentRotation for RandomUserAgent {
    fn next_user_agent(&self) -> String {
        let idx = rand::rng().random_range(0..self.pool.len());
        self.pool[idx].clone()
    }
}

/// Always the same agent
#[derive(Debug, Clone)]
pub struct FixedUserAgent(pub String);

impl UserAgentRotation for FixedUserAgent {
    fn next_user_agent(&self) -> String {
        self.0.clone()
    }
}

/// Delay before the next attempt after `attempt` failed (1-based)
pub trait BackoffPolicy: Debug + Send + Sync {
    fn delay_for_attempt(&self, attempt: u32) -> Duration;
}

/// `base × attempt`: 2 s, 4 s, 6 s ... with the default base
#[derive(Debug, Clone, Copy)]
pub struct LinearBackoff {
    pub base: Duration,
}

impl Default for LinearBackoff {
    fn default() -> Self {
        Self {
            base: DEFAULT_BACKOFF_BASE,
        }
    }
}

impl BackoffPolicy for LinearBackoff {
    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base.saturating_mul(attempt.max(1))
    }
}

/// Retry immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBackoff;

impl BackoffPolicy for NoBackoff {
    fn delay_for_attempt(&self, _attempt: u32) -> Duration {
        Duration::ZERO
    }
}
