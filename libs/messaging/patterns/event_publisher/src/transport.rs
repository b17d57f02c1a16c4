//! Transport seam
//!
//! The publisher never talks to the network directly. It is handed a shared
//! [`EventTransport`] and only relies on its contract: attempt delivery of one
//! envelope, one bounded list of envelopes, or one legacy notification, and
//! report failure as a [`TransportError`].

use crate::{Envelope, MarketDataNotification, TransportError};
use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

/// Delivery primitive for envelopes and legacy notifications
///
/// Implementations must be safe for concurrent use; one handle is shared by
/// every publish call.
#[async_trait]
pub trait EventTransport: Send + Sync + Debug {
    /// Deliver a single envelope
    async fn send(&self, envelope: &Envelope) -> Result<(), TransportError>;

    /// Deliver a batch as one request
    ///
    /// The default sends envelopes one by one and stops at the first failure.
    /// Transports with a native batch call should override it.
    async fn send_batch(&self, envelopes: &[Envelope]) -> Result<(), TransportError> {
        for envelope in envelopes {
            self.send(envelope).await?;
        }
        Ok(())
    }

    /// Deliver a legacy market-data notification
    async fn send_notification(
        &self,
        notification: &MarketDataNotification,
    ) -> Result<(), TransportError>;

    /// Name for logs
    fn name(&self) -> &str {
        "transport"
    }
}

/// Shared transport handle
pub type SharedTransport = Arc<dyn EventTransport>;
