//! Batch planning and publish accounting
//!
//! [`plan_batches`] partitions envelopes greedily in a single pass: an envelope
//! joins the current batch unless that would break the count or size ceiling,
//! in which case the batch is closed first. This fills batches as far as
//! possible without lookahead but does not guarantee the minimum number of
//! batches.

use crate::size::estimate_size;
use crate::Envelope;
use publisher_config::{limits, BatchSettings};

/// Count and size ceilings for a single transport call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    pub max_events: usize,
    pub max_bytes: usize,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_events: limits::MAX_EVENTS_PER_BATCH,
            max_bytes: limits::MAX_PAYLOAD_SIZE_BYTES,
        }
    }
}

impl From<&BatchSettings> for BatchLimits {
    fn from(settings: &BatchSettings) -> Self {
        Self {
            max_events: settings.max_events,
            max_bytes: settings.max_bytes,
        }
    }
}

/// Ordered group of envelopes sent in one transport call
#[derive(Debug, Clone, Default)]
pub struct Batch {
    envelopes: Vec<Envelope>,
    estimated_size: usize,
}

impl Batch {
    pub fn envelopes(&self) -> &[Envelope] {
        &self.envelopes
    }

    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }

    /// Sum of the estimated sizes of all envelopes
    pub fn estimated_size(&self) -> usize {
        self.estimated_size
    }

    fn push(&mut self, envelope: Envelope, size: usize) {
        self.envelopes.push(envelope);
        self.estimated_size += size;
    }
}

/// Partition envelopes into ordered batches under `limits`
///
/// Concatenating the returned batches reproduces the input order. An envelope
/// whose estimate alone exceeds `max_bytes` still gets a batch of its own.
pub fn plan_batches(envelopes: Vec<Envelope>, limits: BatchLimits) -> Vec<Batch> {
    let mut batches = Vec::new();
    let mut current = Batch::default();

    for envelope in envelopes {
        let size = estimate_size(&envelope);

        let full = current.len() >= limits.max_events;
        let too_big = current.estimated_size + size > limits.max_bytes;
        if !current.is_empty() && (full || too_big) {
            batches.push(std::mem::take(&mut current));
        }

        current.push(envelope, size);
    }

    if !current.is_empty() {
        batches.push(current);
    }

    batches
}

/// Aggregate result of a multi-envelope publish
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    /// Number of payloads supplied by the caller
    pub total: usize,

    /// Envelopes that entered a batch
    pub attempted: usize,

    /// Envelopes confirmed sent
    pub sent: usize,

    /// Payloads dropped for exceeding the per-event ceiling
    pub dropped: usize,

    /// Batches planned
    pub batches: usize,

    /// Batches abandoned after exhausting retries
    pub failed_batches: usize,
}

impl PublishOutcome {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Self::default()
        }
    }

    pub fn record_dropped(&mut self) {
        self.dropped += 1;
    }

    pub fn record_planned(&mut self, batches: &[Batch]) {
        self.batches = batches.len();
        self.attempted = batches.iter().map(Batch::len).sum();
    }

    pub fn record_sent(&mut self, count: usize) {
        self.sent += count;
    }

    pub fn record_abandoned(&mut self) {
        self.failed_batches += 1;
    }

    /// Check if every supplied payload was sent
    pub fn is_complete_success(&self) -> bool {
        self.sent == self.total
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.sent as f64 / self.total as f64) * 100.0
    }
}
