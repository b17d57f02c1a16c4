//! In-memory transports for tests

use crate::{Envelope, EventTransport, MarketDataNotification, SendContext, TransportError};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

fn simulated_failure(envelopes: &[Envelope]) -> TransportError {
    let mut context = SendContext::new(envelopes.len()).with_endpoint("memory://test");
    if let Some(first) = envelopes.first() {
        context = context.with_event_type(first.event_type());
    }
    TransportError::send_failed("Simulated failure", context)
}

/// A transport that records everything it is given
///
/// A single send is recorded as a batch of one.
#[derive(Debug, Default)]
pub struct CollectorTransport {
    batches: Mutex<Vec<Vec<Envelope>>>,
    notifications: Mutex<Vec<MarketDataNotification>>,
}

impl CollectorTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every accepted request, in arrival order
    pub fn batches(&self) -> Vec<Vec<Envelope>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().iter().map(Vec::len).collect()
    }

    /// All accepted envelopes, flattened in arrival order
    pub fn envelopes(&self) -> Vec<Envelope> {
        self.batches.lock().unwrap().iter().flatten().cloned().collect()
    }

    pub fn envelope_count(&self) -> usize {
        self.batches.lock().unwrap().iter().map(Vec::len).sum()
    }

    pub fn notifications(&self) -> Vec<MarketDataNotification> {
        self.notifications.lock().unwrap().clone()
    }

    fn record(&self, envelopes: &[Envelope]) {
        self.batches.lock().unwrap().push(envelopes.to_vec());
    }
}

#[async_trait]
impl EventTransport for CollectorTransport {
    async fn send(&self, envelope: &Envelope) -> Result<(), TransportError> {
        self.record(std::slice::from_ref(envelope));
        Ok(())
    }

    async fn send_batch(&self, envelopes: &[Envelope]) -> Result<(), TransportError> {
        self.record(envelopes);
        Ok(())
    }

    async fn send_notification(
        &self,
        notification: &MarketDataNotification,
    ) -> Result<(), TransportError> {
        self.notifications.lock().unwrap().push(notification.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "collector"
    }
}

/// A transport that always fails
#[derive(Debug)]
pub struct FailingTransport {
    error: Option<TransportError>,
    attempts: AtomicUsize,
}

impl FailingTransport {
    pub fn new() -> Self {
        Self {
            error: None,
            attempts: AtomicUsize::new(0),
        }
    }

    /// Fail every call with `error` instead of a generic send failure
    pub fn with_error(error: TransportError) -> Self {
        Self {
            error: Some(error),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Number of transport calls made
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::Relaxed)
    }

    fn fail(&self, envelopes: &[Envelope]) -> TransportError {
        self.attempts.fetch_add(1, Ordering::Relaxed);
        self.error
            .clone()
            .unwrap_or_else(|| simulated_failure(envelopes))
    }
}

impl Default for FailingTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventTransport for FailingTransport {
    async fn send(&self, envelope: &Envelope) -> Result<(), TransportError> {
        Err(self.fail(std::slice::from_ref(envelope)))
    }

    async fn send_batch(&self, envelopes: &[Envelope]) -> Result<(), TransportError> {
        Err(self.fail(envelopes))
    }

    async fn send_notification(
        &self,
        _notification: &MarketDataNotification,
    ) -> Result<(), TransportError> {
        Err(self.fail(&[]))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// A transport that fails its first `failures` calls, then records
///
/// Call instants come from `tokio::time`, so paused-clock tests can assert
/// the backoff gaps exactly.
#[derive(Debug)]
pub struct FlakyTransport {
    remaining_failures: AtomicUsize,
    call_times: Mutex<Vec<Instant>>,
    collector: CollectorTransport,
}

impl FlakyTransport {
    pub fn new(failures: usize) -> Self {
        Self {
            remaining_failures: AtomicUsize::new(failures),
            call_times: Mutex::new(Vec::new()),
            collector: CollectorTransport::new(),
        }
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.call_times.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.call_times.lock().unwrap().len()
    }

    /// Requests that eventually succeeded
    pub fn delivered(&self) -> &CollectorTransport {
        &self.collector
    }

    fn should_fail(&self) -> bool {
        self.call_times.lock().unwrap().push(Instant::now());
        self.remaining_failures
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl EventTransport for FlakyTransport {
    async fn send(&self, envelope: &Envelope) -> Result<(), TransportError> {
        if self.should_fail() {
            return Err(simulated_failure(std::slice::from_ref(envelope)));
        }
        self.collector.send(envelope).await
    }

    async fn send_batch(&self, envelopes: &[Envelope]) -> Result<(), TransportError> {
        if self.should_fail() {
            return Err(simulated_failure(envelopes));
        }
        self.collector.send_batch(envelopes).await
    }

    async fn send_notification(
        &self,
        notification: &MarketDataNotification,
    ) -> Result<(), TransportError> {
        if self.should_fail() {
            return Err(simulated_failure(&[]));
        }
        self.collector.send_notification(notification).await
    }

    fn name(&self) -> &str {
        "flaky"
    }
}

/// A transport with per-batch behaviour
///
/// Batches are numbered from 0 in the order they are first seen (a retry of
/// the same batch keeps its number). Listed batches fail on every attempt.
/// Optionally, a cancellation token is triggered when a given call starts and
/// that call then never completes.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    failing_batches: HashSet<usize>,
    cancel_on_call: Option<(usize, CancellationToken)>,
    seen: Mutex<Vec<Uuid>>,
    calls: AtomicUsize,
    collector: CollectorTransport,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail batch number `batch` on every attempt
    pub fn fail_batch(mut self, batch: usize) -> Self {
        self.failing_batches.insert(batch);
        self
    }

    /// Cancel `token` when call number `call` (0-based) starts, and hang
    pub fn cancel_on_call(mut self, call: usize, token: CancellationToken) -> Self {
        self.cancel_on_call = Some((call, token));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Distinct batches the transport has been asked to send
    pub fn batches_seen(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    pub fn delivered(&self) -> &CollectorTransport {
        &self.collector
    }

    fn batch_number(&self, envelopes: &[Envelope]) -> Option<usize> {
        let first = envelopes.first()?.id();
        let mut seen = self.seen.lock().unwrap();
        match seen.iter().position(|id| *id == first) {
            Some(position) => Some(position),
            None => {
                seen.push(first);
                Some(seen.len() - 1)
            }
        }
    }
}

#[async_trait]
impl EventTransport for ScriptedTransport {
    async fn send(&self, envelope: &Envelope) -> Result<(), TransportError> {
        self.send_batch(std::slice::from_ref(envelope)).await
    }

    async fn send_batch(&self, envelopes: &[Envelope]) -> Result<(), TransportError> {
        let call = self.calls.fetch_add(1, Ordering::Relaxed);
        let batch = self.batch_number(envelopes);

        if let Some((cancel_call, token)) = &self.cancel_on_call {
            if *cancel_call == call {
                token.cancel();
                std::future::pending::<()>().await;
            }
        }

        if batch.is_some_and(|b| self.failing_batches.contains(&b)) {
            return Err(simulated_failure(envelopes));
        }
        self.collector.send_batch(envelopes).await
    }

    async fn send_notification(
        &self,
        notification: &MarketDataNotification,
    ) -> Result<(), TransportError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.collector.send_notification(notification).await
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
