//! Transport limits and publisher defaults
//!
//! The event-distribution endpoint rejects any request above 1 MiB and any
//! batch above 100 events. The publisher plans batches against these values.

/// Maximum number of events accepted in one batch request
pub const MAX_EVENTS_PER_BATCH: usize = 100;

/// Maximum serialized payload size, per event and per batch (1 MiB)
pub const MAX_PAYLOAD_SIZE_BYTES: usize = 1024 * 1024;

/// Estimated framing cost of one envelope (id, source, type, time)
pub const ENVELOPE_OVERHEAD_BYTES: usize = 200;

/// Estimated size of an absent attribute value (`null`)
pub const NULL_ATTRIBUTE_SIZE: usize = 4;

/// Media type of every envelope payload
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Base locator that topic names are joined onto
pub const DEFAULT_BASE_SOURCE_URI: &str = "https://vv/events/";

/// Retry defaults for batch sends
pub mod retry {
    /// Additional attempts after the first failed send
    pub const MAX_RETRIES: u32 = 3;

    /// Hard ceiling accepted by config validation
    pub const MAX_RETRIES_LIMIT: u32 = 10;

    /// Delay before the first retry (milliseconds)
    pub const BASE_DELAY_MS: u64 = 1_000;

    /// Exponential backoff multiplier
    pub const BACKOFF_MULTIPLIER: f64 = 2.0;

    /// Cap on any single backoff delay (milliseconds)
    pub const MAX_DELAY_MS: u64 = 30_000;
}

/// HTTP transport defaults
pub mod http {
    /// Per-request timeout (seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    /// Header carrying the access key
    pub const KEY_HEADER: &str = "aeg-sas-key";

    /// Media type for batched CloudEvents requests
    pub const CLOUD_EVENTS_BATCH_CONTENT_TYPE: &str =
        "application/cloudevents-batch+json; charset=utf-8";
}
