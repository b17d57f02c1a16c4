//! HTTP transport for the event-distribution endpoint
//!
//! Envelopes are posted as a CloudEvents JSON batch (a single send is a batch
//! of one). Legacy notifications are posted as an event-grid schema array.
//! The access key travels in the `aeg-sas-key` header.

use crate::{Envelope, EventTransport, MarketDataNotification, SendContext, TransportError};
use async_trait::async_trait;
use chrono::SecondsFormat;
use publisher_config::limits::http::{CLOUD_EVENTS_BATCH_CONTENT_TYPE, KEY_HEADER};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use url::Url;

const CLOUD_EVENTS_SPEC_VERSION: &str = "1.0";
const EVENT_GRID_CONTENT_TYPE: &str = "application/json";

/// Posts events to an HTTPS endpoint with key authentication
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
    key: String,
    timeout: Duration,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint.as_str())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// CloudEvents 1.0 structured JSON form of an envelope
#[derive(Debug, Serialize)]
struct CloudEventJson<'a> {
    specversion: &'static str,
    id: String,
    source: &'a str,
    #[serde(rename = "type")]
    event_type: &'a str,
    time: String,
    datacontenttype: &'static str,
    data: Value,
    #[serde(flatten)]
    extensions: &'a BTreeMap<String, Value>,
}

impl<'a> CloudEventJson<'a> {
    fn from_envelope(envelope: &'a Envelope) -> Result<Self, TransportError> {
        let data = serde_json::from_str(envelope.data()).map_err(|e| {
            TransportError::send_failed(
                format!("envelope data is not valid JSON: {}", e),
                SendContext::new(1).with_event_type(envelope.event_type()),
            )
        })?;

        Ok(Self {
            specversion: CLOUD_EVENTS_SPEC_VERSION,
            id: envelope.id().to_string(),
            source: envelope.source(),
            event_type: envelope.event_type(),
            time: envelope.time().to_rfc3339_opts(SecondsFormat::Micros, true),
            datacontenttype: envelope.content_type(),
            data,
            extensions: envelope.attributes(),
        })
    }
}

impl HttpTransport {
    /// Create a transport for an absolute endpoint
    pub fn new(
        endpoint: &str,
        key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            TransportError::invalid_config(format!("Invalid endpoint URI {}: {}", endpoint, e))
        })?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::invalid_config(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            key: key.into(),
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        body: &T,
        content_type: &str,
        context: SendContext,
    ) -> Result<(), TransportError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(KEY_HEADER, &self.key)
            .header(CONTENT_TYPE, content_type)
            .json(body)
            .send()
            .await
            .map_err(|e| self.map_request_error(e, context))?;

        let status = response.status();
        if status.is_success() {
            tracing::trace!(status = status.as_u16(), "Event request accepted");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(TransportError::rejected(status.as_u16(), body))
    }

    fn map_request_error(&self, error: reqwest::Error, context: SendContext) -> TransportError {
        if error.is_timeout() {
            TransportError::timeout(self.timeout.as_secs())
        } else if error.is_connect() {
            TransportError::connection_failed(error.to_string())
        } else {
            TransportError::send_failed(
                error.to_string(),
                context.with_endpoint(self.endpoint.as_str()),
            )
        }
    }
}

#[async_trait]
impl EventTransport for HttpTransport {
    async fn send(&self, envelope: &Envelope) -> Result<(), TransportError> {
        self.send_batch(std::slice::from_ref(envelope)).await
    }

    async fn send_batch(&self, envelopes: &[Envelope]) -> Result<(), TransportError> {
        let events = envelopes
            .iter()
            .map(CloudEventJson::from_envelope)
            .collect::<Result<Vec<_>, _>>()?;

        let mut context = SendContext::new(envelopes.len());
        if let Some(first) = envelopes.first() {
            context = context.with_event_type(first.event_type());
        }

        self.post(&events, CLOUD_EVENTS_BATCH_CONTENT_TYPE, context)
            .await
    }

    async fn send_notification(
        &self,
        notification: &MarketDataNotification,
    ) -> Result<(), TransportError> {
        let context = SendContext::new(1).with_event_type(notification.event_type());
        self.post(
            std::slice::from_ref(notification),
            EVENT_GRID_CONTENT_TYPE,
            context,
        )
        .await
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EnvelopeBuilder, TopicRoute};
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn envelope() -> Envelope {
        EnvelopeBuilder::new(
            "FxSpotPriceChanged",
            TopicRoute {
                topic: "fx-spot-price-changed".to_string(),
                source: "https://vv/events/fx-spot-price-changed".to_string(),
            },
        )
        .build(&json!({ "assetId": "eurusd" }))
        .unwrap()
    }

    /// Serve one request with a canned status line, returning the raw request
    async fn serve_once(status_line: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request_complete(&request) {
                    break;
                }
            }
            let response = format!(
                "{}\r\ncontent-length: 4\r\nconnection: close\r\n\r\nnope",
                status_line
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_string()
        });

        (format!("http://{}/api/events", addr), handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let content_length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        request.len() >= header_end + 4 + content_length
    }

    #[test]
    fn test_cloud_event_shape() {
        let envelope = envelope();
        let json = serde_json::to_value(CloudEventJson::from_envelope(&envelope).unwrap()).unwrap();

        assert_eq!(json["specversion"], "1.0");
        assert_eq!(json["type"], "FxSpotPriceChanged");
        assert_eq!(json["source"], "https://vv/events/fx-spot-price-changed");
        assert_eq!(json["datacontenttype"], "application/json");
        assert_eq!(json["topic"], "fx-spot-price-changed");
        assert_eq!(json["data"], json!({ "assetId": "eurusd" }));
        assert_eq!(json["id"], envelope.id().to_string());
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        let err = HttpTransport::new("not a url", "key", Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, TransportError::InvalidConfig(_)));
    }

    #[test]
    fn test_debug_hides_key() {
        let transport =
            HttpTransport::new("https://topic.example/api/events", "s3cret", Duration::from_secs(5))
                .unwrap();
        assert!(!format!("{:?}", transport).contains("s3cret"));
    }

    #[tokio::test]
    async fn test_batch_posted_with_key_header() {
        let (endpoint, server) = serve_once("HTTP/1.1 200 OK").await;
        let transport = HttpTransport::new(&endpoint, "k3y", Duration::from_secs(5)).unwrap();

        transport.send_batch(&[envelope(), envelope()]).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /api/events"));
        assert!(request.contains("aeg-sas-key: k3y"));
        assert!(request.contains("application/cloudevents-batch+json"));
        assert!(request.contains("\"specversion\":\"1.0\""));
    }

    #[tokio::test]
    async fn test_error_status_maps_to_rejected() {
        let (endpoint, server) = serve_once("HTTP/1.1 503 Service Unavailable").await;
        let transport = HttpTransport::new(&endpoint, "k3y", Duration::from_secs(5)).unwrap();

        let err = transport.send(&envelope()).await.unwrap_err();
        server.await.unwrap();

        assert_eq!(err, TransportError::rejected(503, "nope"));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn test_connection_refused_maps_to_connection_failed() {
        // Bind then drop to get a port with nothing listening
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(
            &format!("http://{}/api/events", addr),
            "k3y",
            Duration::from_secs(5),
        )
        .unwrap();

        let err = transport.send(&envelope()).await.unwrap_err();
        assert!(err.is_connection_error());
    }
}
