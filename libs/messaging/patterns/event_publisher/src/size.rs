//! Envelope size estimation for batch fitting
//!
//! The estimate is conservative rather than exact: a fixed framing overhead, the
//! payload bytes, and every extension attribute's key and rendered value. The
//! batch planner only relies on it growing with payload size.

use crate::Envelope;
use publisher_config::limits::{ENVELOPE_OVERHEAD_BYTES, NULL_ATTRIBUTE_SIZE};
use serde_json::Value;

/// Approximate wire size of an envelope in bytes
pub fn estimate_size(envelope: &Envelope) -> usize {
    let attributes: usize = envelope
        .attributes()
        .iter()
        .map(|(key, value)| key.len() + attribute_value_size(value))
        .sum();

    ENVELOPE_OVERHEAD_BYTES + envelope.data_len() + attributes
}

fn attribute_value_size(value: &Value) -> usize {
    match value {
        Value::Null => NULL_ATTRIBUTE_SIZE,
        Value::String(s) => s.len(),
        other => other.to_string().len(),
    }
}
