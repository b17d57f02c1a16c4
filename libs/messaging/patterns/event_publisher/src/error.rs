/// Context information for transport failures to aid in debugging
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SendContext {
    /// Number of envelopes in the failed request
    pub event_count: usize,
    /// Event type of the request, if known
    pub event_type: Option<String>,
    /// Endpoint the request was sent to, if known
    pub endpoint: Option<String>,
}

impl SendContext {
    pub fn new(event_count: usize) -> Self {
        Self {
            event_count,
            event_type: None,
            endpoint: None,
        }
    }

    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

/// Failure raised by an [`EventTransport`](crate::EventTransport)
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Send failed: {error} (events: {count}, type: {event_type:?})",
            count = context.event_count,
            event_type = context.event_type)]
    SendFailed { error: String, context: SendContext },

    #[error("Request rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TransportError {
    /// Check if a retry of the same request may succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            TransportError::ConnectionFailed(_)
            | TransportError::Timeout(_)
            | TransportError::SendFailed { .. } => true,
            TransportError::Rejected { status, .. } => *status == 429 || *status >= 500,
            TransportError::InvalidConfig(_) => false,
        }
    }

    /// Check if this is a connection-related error
    pub fn is_connection_error(&self) -> bool {
        matches!(self, TransportError::ConnectionFailed(_))
    }

    pub fn connection_failed(msg: impl Into<String>) -> Self {
        TransportError::ConnectionFailed(msg.into())
    }

    pub fn send_failed(msg: impl Into<String>, context: SendContext) -> Self {
        TransportError::SendFailed {
            error: msg.into(),
            context,
        }
    }

    pub fn rejected(status: u16, body: impl Into<String>) -> Self {
        TransportError::Rejected {
            status,
            body: body.into(),
        }
    }

    pub fn timeout(seconds: u64) -> Self {
        TransportError::Timeout(seconds)
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        TransportError::InvalidConfig(msg.into())
    }
}

/// Errors surfaced by the publish operations
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid source URI '{uri}': {reason}")]
    InvalidSourceUri { uri: String, reason: String },

    #[error("Event of {size}B exceeds the {limit}B payload limit")]
    OversizedEvent { size: usize, limit: usize },

    #[error("Failed to serialize payload: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Failed to publish all events: only {sent} out of {total} were sent")]
    PartialPublishFailure { sent: usize, total: usize },

    #[error("Publish cancelled")]
    Cancelled,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PublishError {
    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        PublishError::InvalidPayload(msg.into())
    }

    pub fn invalid_source_uri(uri: impl Into<String>, reason: impl ToString) -> Self {
        PublishError::InvalidSourceUri {
            uri: uri.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        PublishError::InvalidConfig(msg.into())
    }

    /// Check if the caller may retry the whole call
    pub fn is_retryable(&self) -> bool {
        match self {
            PublishError::Transport(e) => e.is_recoverable(),
            PublishError::PartialPublishFailure { .. } => true,
            _ => false,
        }
    }
}
