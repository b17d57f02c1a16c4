//! Canonical event envelope
//!
//! An [`Envelope`] is the transport-ready form of one event: a fresh id, an
//! absolute source locator, the event type, a UTC creation time and the JSON
//! payload. Envelopes are immutable once built.
//!
//! Payload JSON is canonicalized before it is stored: object keys are emitted in
//! sorted order, so equal payloads always produce byte-identical `data`. Key
//! names are never rewritten. Payload types carry the lower-camel-case naming
//! themselves through `#[serde(rename_all = "camelCase")]`, and map keys that
//! belong to the data pass through untouched.

use crate::topic::TopicRoute;
use crate::PublishError;
use chrono::{DateTime, Utc};
use publisher_config::limits::JSON_CONTENT_TYPE;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Name of the extension attribute carrying the logical topic
pub const TOPIC_ATTRIBUTE: &str = "topic";

/// One event ready for the transport
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    id: Uuid,
    source: String,
    event_type: String,
    time: DateTime<Utc>,
    data: String,
    attributes: BTreeMap<String, Value>,
}

impl Envelope {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Serialized JSON payload
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Size of the serialized payload in bytes
    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    pub fn content_type(&self) -> &'static str {
        JSON_CONTENT_TYPE
    }

    /// Extension attributes (always includes the topic)
    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    pub fn topic(&self) -> Option<&str> {
        self.attributes.get(TOPIC_ATTRIBUTE).and_then(Value::as_str)
    }
}

/// Builds envelopes for a single event type and route
#[derive(Debug, Clone)]
pub struct EnvelopeBuilder {
    event_type: String,
    route: TopicRoute,
}

impl EnvelopeBuilder {
    pub fn new(event_type: impl Into<String>, route: TopicRoute) -> Self {
        Self {
            event_type: event_type.into(),
            route,
        }
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn route(&self) -> &TopicRoute {
        &self.route
    }

    /// Wrap a payload into an envelope
    pub fn build<T: Serialize + ?Sized>(&self, payload: &T) -> Result<Envelope, PublishError> {
        let data = canonical_json(payload)?;
        Ok(self.wrap(data))
    }

    /// Wrap a payload, rejecting serialized data above `max_data_bytes`
    pub fn build_within<T: Serialize + ?Sized>(
        &self,
        payload: &T,
        max_data_bytes: usize,
    ) -> Result<Envelope, PublishError> {
        let data = canonical_json(payload)?;
        if data.len() > max_data_bytes {
            return Err(PublishError::OversizedEvent {
                size: data.len(),
                limit: max_data_bytes,
            });
        }
        Ok(self.wrap(data))
    }

    fn wrap(&self, data: String) -> Envelope {
        let mut attributes = BTreeMap::new();
        attributes.insert(
            TOPIC_ATTRIBUTE.to_string(),
            Value::String(self.route.topic.clone()),
        );

        Envelope {
            id: Uuid::new_v4(),
            source: self.route.source.clone(),
            event_type: self.event_type.clone(),
            time: Utc::now(),
            data,
            attributes,
        }
    }
}

/// Serialize a payload with object keys in sorted order
///
/// Fails with `InvalidPayload` when the payload serializes to `null`.
pub fn canonical_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, PublishError> {
    let value = serde_json::to_value(payload)?;
    if value.is_null() {
        return Err(PublishError::invalid_payload("payload is absent"));
    }
    Ok(serde_json::to_string(&sorted_keys(value))?)
}

fn sorted_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            // Sort explicitly; Map ordering depends on serde_json features.
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, sorted_keys(v)))
                .collect();
            Value::Object(sorted.into_iter().collect::<Map<String, Value>>())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted_keys).collect()),
        other => other,
    }
}
