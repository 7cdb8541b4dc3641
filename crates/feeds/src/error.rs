//! Error types for feed operations.

use thiserror::Error;

/// Errors that can occur on the live feed path.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Connection refused, reset, or closed. Drives the Failing state.
    #[error("transport error: {0}")]
    Transport(String),

    /// Payload not parseable as a symbol-to-price mapping. The message is
    /// dropped; connection state is unaffected.
    #[error("unparseable feed message: {0}")]
    MessageFormat(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for FeedError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        FeedError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        FeedError::MessageFormat(err.to_string())
    }
}

impl FeedError {
    /// Whether this error should move the controller into Failing and
    /// schedule a reconnect. Format errors never do.
    pub fn triggers_reconnect(&self) -> bool {
        matches!(self, FeedError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_triggers_reconnect() {
        assert!(FeedError::Transport("reset".into()).triggers_reconnect());
        assert!(!FeedError::MessageFormat("not an object".into()).triggers_reconnect());
    }

    #[test]
    fn test_json_error_is_format() {
        let err: FeedError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, FeedError::MessageFormat(_)));
    }
}
