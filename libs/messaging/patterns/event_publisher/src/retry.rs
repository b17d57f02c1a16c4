//! Retry schedule for batch sends
//!
//! Each batch moves through `Pending → Sending → {Sent | Retrying → Sending | Abandoned}`.
//! The publisher drives that machine with a bounded loop; this module owns the
//! schedule and the state type.

use publisher_config::{limits, RetrySettings};
use std::time::Duration;

/// Exponential backoff configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Additional attempts after the first failed send
    pub max_retries: u32,

    /// Delay before the first retry
    pub base_delay: Duration,

    /// Exponential backoff multiplier
    pub backoff_multiplier: f64,

    /// Maximum retry delay cap
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: limits::retry::MAX_RETRIES,
            base_delay: Duration::from_millis(limits::retry::BASE_DELAY_MS),
            backoff_multiplier: limits::retry::BACKOFF_MULTIPLIER,
            max_delay: Duration::from_millis(limits::retry::MAX_DELAY_MS),
        }
    }
}

impl From<&RetrySettings> for RetryPolicy {
    fn from(settings: &RetrySettings) -> Self {
        Self {
            max_retries: settings.max_retries,
            base_delay: settings.base_delay(),
            backoff_multiplier: settings.backoff_multiplier,
            max_delay: settings.max_delay(),
        }
    }
}

impl RetryPolicy {
    /// Send once, never retry
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Total attempts including the first send
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    /// Delay before retry number `retry` (1-based): `base * multiplier^(retry-1)`, capped
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(i32::MAX as u32) as i32;
        let millis = self.base_delay.as_millis() as f64 * self.backoff_multiplier.powi(exponent);
        let capped = millis.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }
}

/// Delivery state of one batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    /// Planned, not yet sent
    Pending,
    /// Transport call in flight
    Sending { attempt: u32 },
    /// Waiting out a backoff delay before the next attempt
    Retrying { attempt: u32, delay: Duration },
    /// Delivered
    Sent { attempts: u32 },
    /// All attempts failed
    Abandoned { attempts: u32 },
}

impl BatchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BatchState::Sent { .. } | BatchState::Abandoned { .. })
    }

    /// Move to `next`, logging the transition
    pub fn transition_to(&mut self, next: BatchState) {
        if *self != next {
            tracing::debug!("Batch state transition: {:?} -> {:?}", self, next);
            *self = next;
        }
    }
}
