//! Publish executor
//!
//! [`EventPublisher`] turns payloads into envelopes and pushes them through the
//! shared transport.
//!
//! - **Single publish** sends one envelope once. Failures propagate unchanged.
//! - **Batch publish** drops oversized payloads, plans batches, and sends them
//!   strictly one after another. A failing batch is retried with exponential
//!   backoff and abandoned once attempts run out; later batches still go out.
//!   The call fails with one aggregate `PartialPublishFailure` if anything
//!   was not delivered.
//! - **Market-data notifications** are mapped and sent directly, without
//!   batching or retry.
//!
//! Every operation takes a [`CancellationToken`]. Cancellation during a send or
//! a backoff delay stops the call with [`PublishError::Cancelled`].

use crate::batch::{plan_batches, Batch, BatchLimits, PublishOutcome};
use crate::envelope::EnvelopeBuilder;
use crate::http::HttpTransport;
use crate::legacy::map_market_data_event;
use crate::retry::{BatchState, RetryPolicy};
use crate::secrets::SecretProvider;
use crate::topic::SourceResolver;
use crate::{PublishError, SharedTransport};
use publisher_config::{limits, PublisherConfig};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use types::{MarketDataEntity, NamedEvent};

/// Publishes domain events through a shared transport
#[derive(Debug, Clone)]
pub struct EventPublisher {
    transport: SharedTransport,
    resolver: SourceResolver,
    limits: BatchLimits,
    retry: RetryPolicy,
}

impl EventPublisher {
    /// Create a publisher with default limits and retry schedule
    pub fn new(transport: SharedTransport, base_source_uri: &str) -> Result<Self, PublishError> {
        Ok(Self {
            transport,
            resolver: SourceResolver::new(base_source_uri)?,
            limits: BatchLimits::default(),
            retry: RetryPolicy::default(),
        })
    }

    /// Create a publisher from validated configuration
    pub fn from_config(
        transport: SharedTransport,
        config: &PublisherConfig,
    ) -> Result<Self, PublishError> {
        config
            .validate()
            .map_err(|e| PublishError::invalid_config(format!("{:#}", e)))?;

        Ok(Self::new(transport, &config.base_source_uri)?
            .with_batch_limits(BatchLimits::from(&config.batch))
            .with_retry_policy(RetryPolicy::from(&config.retry)))
    }

    /// Create a publisher with an HTTP transport whose endpoint and key come
    /// from a secret provider
    pub async fn from_secrets(
        secrets: &dyn SecretProvider,
        config: &PublisherConfig,
    ) -> Result<Self, PublishError> {
        let result: Result<Self, PublishError> = async {
            let endpoint = secrets
                .event_endpoint()
                .await
                .map_err(|e| PublishError::invalid_config(e.to_string()))?;
            let key = secrets
                .event_key()
                .await
                .map_err(|e| PublishError::invalid_config(e.to_string()))?;

            if endpoint.trim().is_empty() {
                return Err(PublishError::invalid_config(
                    "Event endpoint cannot be null or empty",
                ));
            }
            if key.trim().is_empty() {
                return Err(PublishError::invalid_config(
                    "Event key cannot be null or empty",
                ));
            }

            let transport = HttpTransport::new(&endpoint, key, config.request_timeout())
                .map_err(|e| PublishError::invalid_config(e.to_string()))?;

            Self::from_config(Arc::new(transport), config)
        }
        .await;

        if let Err(e) = &result {
            error!(error = %e, "Failed to create event publisher");
        }
        result
    }

    pub fn with_batch_limits(mut self, limits: BatchLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn batch_limits(&self) -> BatchLimits {
        self.limits
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn base_source_uri(&self) -> &str {
        self.resolver.base()
    }

    /// Publish one payload under `event_type`
    pub async fn publish<T: Serialize + ?Sized>(
        &self,
        payload: &T,
        event_type: &str,
        topic: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<(), PublishError> {
        let result: Result<(), PublishError> = async {
            let route = self.resolver.resolve(event_type, topic)?;
            let envelope = EnvelopeBuilder::new(event_type, route).build(payload)?;

            tokio::select! {
                biased;
                _ = cancel.cancelled() => Err(PublishError::Cancelled),
                sent = self.transport.send(&envelope) => {
                    sent?;
                    info!(
                        event_type = %event_type,
                        source = %envelope.source(),
                        "Published event"
                    );
                    Ok(())
                }
            }
        }
        .await;

        match &result {
            Err(PublishError::Cancelled) => {
                warn!(event_type = %event_type, "Publish cancelled");
            }
            Err(e) => {
                error!(event_type = %event_type, error = %e, "Failed to publish event");
            }
            Ok(()) => {}
        }
        result
    }

    /// Publish one payload under its own event type name
    pub async fn publish_event<T: NamedEvent + Serialize>(
        &self,
        payload: &T,
        topic: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<(), PublishError> {
        self.publish(payload, T::EVENT_TYPE, topic, cancel).await
    }

    /// Publish many payloads under `event_type` in batches
    pub async fn publish_many<T: Serialize>(
        &self,
        payloads: &[T],
        event_type: &str,
        topic: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<PublishOutcome, PublishError> {
        if payloads.is_empty() {
            return Ok(PublishOutcome::new(0));
        }

        let result = self
            .publish_many_inner(payloads, event_type, topic, cancel)
            .await;

        match &result {
            Err(PublishError::Cancelled) => {
                warn!(event_type = %event_type, "Batch publish cancelled");
            }
            Err(e) => {
                error!(event_type = %event_type, error = %e, "Failed to publish events");
            }
            Ok(_) => {}
        }
        result
    }

    /// Publish many payloads under their own event type name
    pub async fn publish_events<T: NamedEvent + Serialize>(
        &self,
        payloads: &[T],
        topic: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<PublishOutcome, PublishError> {
        self.publish_many(payloads, T::EVENT_TYPE, topic, cancel)
            .await
    }

    async fn publish_many_inner<T: Serialize>(
        &self,
        payloads: &[T],
        event_type: &str,
        topic: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<PublishOutcome, PublishError> {
        let total = payloads.len();
        let route = self.resolver.resolve(event_type, topic)?;
        let builder = EnvelopeBuilder::new(event_type, route);
        let mut outcome = PublishOutcome::new(total);

        // Build everything before the first send so a bad payload fails the
        // call without side effects.
        let mut envelopes = Vec::with_capacity(total);
        for (index, payload) in payloads.iter().enumerate() {
            match builder.build_within(payload, limits::MAX_PAYLOAD_SIZE_BYTES) {
                Ok(envelope) => envelopes.push(envelope),
                Err(PublishError::OversizedEvent { size, limit }) => {
                    error!(
                        event_type = %event_type,
                        index,
                        size,
                        limit,
                        "Event exceeds the payload limit and will not be published"
                    );
                    outcome.record_dropped();
                }
                Err(e) => return Err(e),
            }
        }

        let batches = plan_batches(envelopes, self.limits);
        outcome.record_planned(&batches);
        let batch_count = batches.len();

        for (index, batch) in batches.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(PublishError::Cancelled);
            }

            let state = self
                .send_with_retry(batch, index + 1, batch_count, event_type, cancel)
                .await?;

            match state {
                BatchState::Sent { .. } => outcome.record_sent(batch.len()),
                _ => outcome.record_abandoned(),
            }
        }

        info!(
            event_type = %event_type,
            sent = outcome.sent,
            total,
            batches = batch_count,
            dropped = outcome.dropped,
            "Published {}/{} events in {} batches",
            outcome.sent,
            total,
            batch_count
        );

        if outcome.sent < total {
            return Err(PublishError::PartialPublishFailure {
                sent: outcome.sent,
                total,
            });
        }

        Ok(outcome)
    }

    /// Drive one batch to `Sent` or `Abandoned`
    ///
    /// Returns `Err(Cancelled)` if the token fires mid-send or mid-backoff.
    async fn send_with_retry(
        &self,
        batch: &Batch,
        number: usize,
        batch_count: usize,
        event_type: &str,
        cancel: &CancellationToken,
    ) -> Result<BatchState, PublishError> {
        let max_attempts = self.retry.max_attempts();
        let mut state = BatchState::Pending;
        let mut attempt = 0;

        loop {
            attempt += 1;
            state.transition_to(BatchState::Sending { attempt });

            let sent = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(PublishError::Cancelled),
                sent = self.transport.send_batch(batch.envelopes()) => sent,
            };

            let error = match sent {
                Ok(()) => {
                    info!(
                        event_type = %event_type,
                        batch = number,
                        batches = batch_count,
                        count = batch.len(),
                        attempt,
                        "Published batch"
                    );
                    state.transition_to(BatchState::Sent { attempts: attempt });
                    return Ok(state);
                }
                Err(e) => e,
            };

            error!(
                event_type = %event_type,
                batch = number,
                batches = batch_count,
                count = batch.len(),
                attempt,
                error = %error,
                "Failed to publish batch"
            );

            if attempt >= max_attempts {
                warn!(
                    event_type = %event_type,
                    batch = number,
                    batches = batch_count,
                    attempts = attempt,
                    "Abandoning batch"
                );
                state.transition_to(BatchState::Abandoned { attempts: attempt });
                return Ok(state);
            }

            let delay = self.retry.delay_for(attempt);
            state.transition_to(BatchState::Retrying { attempt, delay });
            debug!(batch = number, delay_ms = delay.as_millis() as u64, "Backing off");

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(PublishError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Publish a created/changed notification for a market-data entity
    pub async fn publish_market_data_event<E>(
        &self,
        entity: Option<&E>,
        cancel: &CancellationToken,
    ) -> Result<(), PublishError>
    where
        E: MarketDataEntity + Serialize + ?Sized,
    {
        let notification = map_market_data_event(entity)?;

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(PublishError::Cancelled),
            sent = self.transport.send_notification(&notification) => {
                sent.map_err(PublishError::from)
            }
        };

        match &result {
            Ok(()) => info!(
                event_type = notification.event_type(),
                subject = notification.subject(),
                "Published market data notification"
            ),
            Err(e) => error!(
                event_type = notification.event_type(),
                subject = notification.subject(),
                error = %e,
                "Failed to publish market data notification"
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{CollectorTransport, FailingTransport, FlakyTransport, ScriptedTransport};
    use crate::{StaticSecretProvider, TransportError};
    use serde_json::json;
    use std::time::Duration;
    use types::{FxSpotPriceChanged, FxSpotPriceData};

    const BASE: &str = "https://vv/events/";

    fn publisher(transport: SharedTransport) -> EventPublisher {
        EventPublisher::new(transport, BASE).unwrap()
    }

    fn payloads(count: usize) -> Vec<serde_json::Value> {
        (0..count).map(|i| json!({ "orderId": i })).collect()
    }

    #[tokio::test]
    async fn test_publish_sends_one_envelope() {
        let transport = Arc::new(CollectorTransport::new());
        let publisher = publisher(transport.clone());

        publisher
            .publish(&json!({ "orderId": 7 }), "OrderPlaced", None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(transport.batch_sizes(), vec![1]);
        let envelope = &transport.envelopes()[0];
        assert_eq!(envelope.event_type(), "OrderPlaced");
        assert_eq!(envelope.source(), "https://vv/events/order-placed");
        assert_eq!(envelope.topic(), Some("order-placed"));
        assert_eq!(envelope.data(), r#"{"orderId":7}"#);
    }

    #[tokio::test]
    async fn test_publish_with_explicit_topic() {
        let transport = Arc::new(CollectorTransport::new());
        let publisher = publisher(transport.clone());

        publisher
            .publish(&json!({}), "OrderPlaced", Some("Fx Prices"), &CancellationToken::new())
            .await
            .unwrap();

        let envelope = &transport.envelopes()[0];
        assert_eq!(envelope.source(), "https://vv/events/fx-prices");
        assert_eq!(envelope.topic(), Some("Fx Prices"));
    }

    #[tokio::test]
    async fn test_publish_failure_is_not_retried() {
        let transport = Arc::new(FailingTransport::with_error(TransportError::rejected(
            503, "busy",
        )));
        let publisher = publisher(transport.clone());

        let err = publisher
            .publish(&json!({ "a": 1 }), "OrderPlaced", None, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PublishError::Transport(TransportError::Rejected { status: 503, .. })
        ));
        assert_eq!(transport.attempts(), 1);
    }

    #[tokio::test]
    async fn test_absent_payload_rejected_before_send() {
        let transport = Arc::new(CollectorTransport::new());
        let publisher = publisher(transport.clone());

        let err = publisher
            .publish(&Option::<u32>::None, "OrderPlaced", None, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::InvalidPayload(_)));
        assert_eq!(transport.envelope_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_topic_rejected() {
        let transport = Arc::new(CollectorTransport::new());
        let publisher = publisher(transport.clone());

        let err = publisher
            .publish(&json!({}), "OrderPlaced", Some("  "), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::InvalidSourceUri { .. }));
        assert_eq!(transport.envelope_count(), 0);
    }

    #[tokio::test]
    async fn test_publish_event_uses_type_name() {
        let transport = Arc::new(CollectorTransport::new());
        let publisher = publisher(transport.clone());
        let event = FxSpotPriceChanged::from_data(&FxSpotPriceData::example());

        publisher
            .publish_event(&event, None, &CancellationToken::new())
            .await
            .unwrap();

        let envelope = &transport.envelopes()[0];
        assert_eq!(envelope.event_type(), "FxSpotPriceChanged");
        assert_eq!(envelope.source(), "https://vv/events/fx-spot-price-changed");
    }

    #[tokio::test]
    async fn test_publish_many_empty_is_noop() {
        let transport = Arc::new(CollectorTransport::new());
        let publisher = publisher(transport.clone());

        let outcome = publisher
            .publish_many(&payloads(0), "OrderPlaced", None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome, PublishOutcome::new(0));
        assert!(transport.batches().is_empty());
    }

    #[tokio::test]
    async fn test_publish_many_splits_by_count() {
        let transport = Arc::new(CollectorTransport::new());
        let publisher = publisher(transport.clone());

        let outcome = publisher
            .publish_many(&payloads(250), "OrderPlaced", None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(transport.batch_sizes(), vec![100, 100, 50]);
        assert_eq!(outcome.sent, 250);
        assert_eq!(outcome.batches, 3);
        assert!(outcome.is_complete_success());

        // Caller order survives batching
        let envelopes = transport.envelopes();
        assert_eq!(envelopes[0].data(), r#"{"orderId":0}"#);
        assert_eq!(envelopes[249].data(), r#"{"orderId":249}"#);
    }

    #[tokio::test]
    async fn test_configured_batch_limits_apply() {
        let transport = Arc::new(CollectorTransport::new());
        let mut config = PublisherConfig::default();
        config.batch.max_events = 10;
        let publisher = EventPublisher::from_config(transport.clone(), &config).unwrap();

        publisher
            .publish_many(&payloads(25), "OrderPlaced", None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(transport.batch_sizes(), vec![10, 10, 5]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_retried_with_backoff() {
        let transport = Arc::new(FlakyTransport::new(2));
        let publisher = publisher(transport.clone());

        let outcome = publisher
            .publish_many(&payloads(3), "OrderPlaced", None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(outcome.sent, 3);
        assert_eq!(transport.delivered().batch_sizes(), vec![3]);

        let times = transport.call_times();
        assert_eq!(times.len(), 3);
        let first_gap = times[1] - times[0];
        let second_gap = times[2] - times[1];
        assert!(first_gap >= Duration::from_millis(1000) && first_gap < Duration::from_millis(1100));
        assert!(second_gap >= Duration::from_millis(2000) && second_gap < Duration::from_millis(2100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_abandoned_after_four_attempts() {
        let transport = Arc::new(FailingTransport::new());
        let publisher = publisher(transport.clone());
        let started = tokio::time::Instant::now();

        let err = publisher
            .publish_many(&payloads(5), "OrderPlaced", None, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PublishError::PartialPublishFailure { sent: 0, total: 5 }
        ));
        assert_eq!(transport.attempts(), 4);
        // 1s + 2s + 4s of backoff between the four attempts
        assert!(started.elapsed() >= Duration::from_millis(7000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_batch_is_retried() {
        let transport = Arc::new(FailingTransport::with_error(TransportError::rejected(
            400, "bad request",
        )));
        let publisher = publisher(transport.clone());

        let err = publisher
            .publish_many(&payloads(2), "OrderPlaced", None, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PublishError::PartialPublishFailure { sent: 0, total: 2 }
        ));
        assert_eq!(transport.attempts(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_batch_does_not_stop_later_batches() {
        let transport = Arc::new(ScriptedTransport::new().fail_batch(1));
        let publisher = publisher(transport.clone());

        let err = publisher
            .publish_many(&payloads(250), "OrderPlaced", None, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PublishError::PartialPublishFailure { sent: 150, total: 250 }
        ));
        assert_eq!(
            err.to_string(),
            "Failed to publish all events: only 150 out of 250 were sent"
        );
        assert_eq!(transport.delivered().batch_sizes(), vec![100, 50]);
        // One call for each good batch, four for the failing one
        assert_eq!(transport.calls(), 6);
    }

    #[tokio::test]
    async fn test_oversized_payload_dropped() {
        let transport = Arc::new(CollectorTransport::new());
        let publisher = publisher(transport.clone());
        let payloads = vec![
            "small".to_string(),
            "x".repeat(limits::MAX_PAYLOAD_SIZE_BYTES + 1),
            "also small".to_string(),
        ];

        let err = publisher
            .publish_many(&payloads, "Note", None, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PublishError::PartialPublishFailure { sent: 2, total: 3 }
        ));
        let sent: Vec<_> = transport
            .envelopes()
            .iter()
            .map(|e| e.data().to_string())
            .collect();
        assert_eq!(sent, vec![r#""small""#, r#""also small""#]);
    }

    #[tokio::test]
    async fn test_absent_payload_in_batch_fails_before_sending() {
        let transport = Arc::new(CollectorTransport::new());
        let publisher = publisher(transport.clone());

        let err = publisher
            .publish_many(&[Some(1), None, Some(3)], "Tick", None, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::InvalidPayload(_)));
        assert!(transport.batches().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_during_send_stops_remaining_batches() {
        let cancel = CancellationToken::new();
        let transport = Arc::new(ScriptedTransport::new().cancel_on_call(1, cancel.clone()));
        let publisher = publisher(transport.clone());

        let err = publisher
            .publish_many(&payloads(250), "OrderPlaced", None, &cancel)
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::Cancelled));
        assert_eq!(transport.delivered().batch_sizes(), vec![100]);
        assert_eq!(transport.batches_seen(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_during_backoff() {
        let cancel = CancellationToken::new();
        let transport = Arc::new(FailingTransport::new());
        let publisher = publisher(transport.clone());

        let one = payloads(1);
        let canceller = cancel.clone();
        let (result, _) = tokio::join!(
            publisher.publish_many(&one, "OrderPlaced", None, &cancel),
            async move {
                tokio::time::sleep(Duration::from_millis(1500)).await;
                canceller.cancel();
            }
        );

        assert!(matches!(result, Err(PublishError::Cancelled)));
        assert_eq!(transport.attempts(), 2);
    }

    #[tokio::test]
    async fn test_already_cancelled_sends_nothing() {
        let cancel = CancellationToken::new();
        cancel.cancel();
        let transport = Arc::new(CollectorTransport::new());
        let publisher = publisher(transport.clone());

        let single = publisher
            .publish(&json!({}), "OrderPlaced", None, &cancel)
            .await;
        let many = publisher
            .publish_many(&payloads(3), "OrderPlaced", None, &cancel)
            .await;

        assert!(matches!(single, Err(PublishError::Cancelled)));
        assert!(matches!(many, Err(PublishError::Cancelled)));
        assert!(transport.batches().is_empty());
    }

    #[tokio::test]
    async fn test_market_data_notification_by_version() {
        let transport = Arc::new(CollectorTransport::new());
        let publisher = publisher(transport.clone());
        let cancel = CancellationToken::new();

        let mut created = FxSpotPriceData::example();
        created.base.version = Some(1);
        let mut changed = FxSpotPriceData::example();
        changed.base.version = Some(2);

        publisher
            .publish_market_data_event(Some(&created), &cancel)
            .await
            .unwrap();
        publisher
            .publish_market_data_event(Some(&changed), &cancel)
            .await
            .unwrap();

        let notifications = transport.notifications();
        assert_eq!(notifications[0].event_type(), "DataCreated");
        assert_eq!(notifications[1].event_type(), "DataChanged");
        assert_eq!(notifications[1].subject(), "price.spot.fx/eurusd");
    }

    #[tokio::test]
    async fn test_market_data_absent_entity() {
        let transport = Arc::new(CollectorTransport::new());
        let publisher = publisher(transport.clone());

        let err = publisher
            .publish_market_data_event::<FxSpotPriceData>(None, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, PublishError::InvalidPayload(_)));
        assert!(transport.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_market_data_failure_is_not_retried() {
        let transport = Arc::new(FailingTransport::new());
        let publisher = publisher(transport.clone());

        let result = publisher
            .publish_market_data_event(Some(&FxSpotPriceData::example()), &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(PublishError::Transport(_))));
        assert_eq!(transport.attempts(), 1);
    }

    #[tokio::test]
    async fn test_from_secrets_validates_inputs() {
        let config = PublisherConfig::default();

        for (endpoint, key) in [
            ("", "k3y"),
            ("relative/events", "k3y"),
            ("https://topic.example/api/events", " "),
        ] {
            let secrets = StaticSecretProvider::new(endpoint, key);
            let err = EventPublisher::from_secrets(&secrets, &config)
                .await
                .unwrap_err();
            assert!(
                matches!(err, PublishError::InvalidConfig(_)),
                "{endpoint:?} / {key:?} gave {err:?}"
            );
        }

        let secrets = StaticSecretProvider::new("https://topic.example/api/events", "k3y");
        let publisher = EventPublisher::from_secrets(&secrets, &config).await.unwrap();
        assert_eq!(publisher.base_source_uri(), config.base_source_uri);
    }

    #[test]
    fn test_invalid_base_rejected() {
        let err = EventPublisher::new(Arc::new(CollectorTransport::new()), "not absolute")
            .unwrap_err();
        assert!(matches!(err, PublishError::InvalidSourceUri { .. }));
    }
}
