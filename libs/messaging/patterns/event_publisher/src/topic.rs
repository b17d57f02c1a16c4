//! Topic and source resolution
//!
//! Every envelope carries two routing values: a logical `topic` attribute used
//! for subscription filtering, and an absolute `source` locator. When the caller
//! does not name a topic it is derived from the event type
//! (`FxSpotPriceChanged` → `fx-spot-price-changed`) and joined onto the
//! configured base locator.

use crate::PublishError;
use url::Url;

/// Convert an upper-camel-case event type name into a lower-kebab-case topic
pub fn derive_topic(event_type: &str) -> String {
    let mut topic = String::with_capacity(event_type.len() + event_type.len() / 2);
    for (i, c) in event_type.chars().enumerate() {
        if i > 0 && c.is_uppercase() {
            topic.push('-');
        }
        topic.extend(c.to_lowercase());
    }
    topic
}

/// Resolved routing values for one publish call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicRoute {
    pub topic: String,
    pub source: String,
}

/// Joins topics onto a validated absolute base locator
#[derive(Debug, Clone)]
pub struct SourceResolver {
    base: String,
}

impl SourceResolver {
    /// Create a resolver, rejecting base locators that are not absolute
    pub fn new(base: impl Into<String>) -> Result<Self, PublishError> {
        let base = base.into();
        let url = Url::parse(&base).map_err(|e| PublishError::invalid_source_uri(&base, e))?;
        if url.cannot_be_a_base() {
            return Err(PublishError::invalid_source_uri(
                &base,
                "base locator must be hierarchical",
            ));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Build the source locator for a topic
    ///
    /// A topic that already parses as an absolute locator is returned as-is.
    pub fn source_for(&self, topic: &str) -> Result<String, PublishError> {
        if Url::parse(topic).is_ok() {
            return Ok(topic.to_string());
        }

        let normalized = topic.replace(' ', "-").to_lowercase();
        let normalized = normalized.trim_start_matches('/');
        let base = self.base.trim_end_matches('/');
        let candidate = format!("{}/{}", base, normalized);

        Url::parse(&candidate)
            .map(String::from)
            .map_err(|e| PublishError::invalid_source_uri(candidate, e))
    }

    /// Resolve topic and source for an event type, honoring an explicit topic
    pub fn resolve(
        &self,
        event_type: &str,
        topic: Option<&str>,
    ) -> Result<TopicRoute, PublishError> {
        let topic = match topic {
            Some(t) if t.trim().is_empty() => {
                return Err(PublishError::invalid_source_uri(t, "topic cannot be empty"));
            }
            Some(t) => t.to_string(),
            None => derive_topic(event_type),
        };
        let source = self.source_for(&topic)?;
        Ok(TopicRoute { topic, source })
    }
}
