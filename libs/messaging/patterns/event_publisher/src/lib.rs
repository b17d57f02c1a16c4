//! # Event Publisher
//!
//! Publishes domain events from the market-data platform to an external
//! event-distribution endpoint.
//!
//! A payload is serialized to canonical JSON (camelCase keys, sorted), wrapped
//! in an [`Envelope`] whose source URI is derived from a topic, and handed to a
//! shared [`EventTransport`]. Multi-event publishes are split into bounded
//! [`Batch`]es that go out sequentially with exponential-backoff retry.
//!
//! ```rust,no_run
//! use event_publisher::{EventPublisher, HttpTransport};
//! use std::{sync::Arc, time::Duration};
//! use tokio_util::sync::CancellationToken;
//! use types::{FxSpotPriceChanged, FxSpotPriceData};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new(
//!     "https://topic.example/api/events",
//!     "key",
//!     Duration::from_secs(30),
//! )?;
//! let publisher = EventPublisher::new(Arc::new(transport), "https://vv/events/")?;
//!
//! let event = FxSpotPriceChanged::from_data(&FxSpotPriceData::example());
//! publisher
//!     .publish_event(&event, None, &CancellationToken::new())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod envelope;
pub mod error;
pub mod http;
pub mod legacy;
pub mod publisher;
pub mod retry;
pub mod secrets;
pub mod size;
pub mod test_utils;
pub mod topic;
pub mod transport;

pub use batch::{plan_batches, Batch, BatchLimits, PublishOutcome};
pub use envelope::{canonical_json, Envelope, EnvelopeBuilder, TOPIC_ATTRIBUTE};
pub use error::{PublishError, SendContext, TransportError};
pub use http::HttpTransport;
pub use legacy::{map_market_data_event, MarketDataNotification, DATA_CHANGED, DATA_CREATED};
pub use publisher::EventPublisher;
pub use retry::{BatchState, RetryPolicy};
pub use secrets::{EnvSecretProvider, SecretError, SecretProvider, StaticSecretProvider};
pub use size::estimate_size;
pub use topic::{derive_topic, SourceResolver, TopicRoute};
pub use transport::{EventTransport, SharedTransport};
