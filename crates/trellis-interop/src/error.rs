use thiserror::Error;

/// Error type request/event handlers may return. Boxed so handlers can use
/// `?` on whatever error types their own work produces; only the message
/// crosses the boundary.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Failures of the bridge itself. Every variant is converted into a failed
/// [`Reply`](crate::Reply) at the dispatcher or adapter layer -- none of
/// these ever crosses the boundary as a fault.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Type tag not present in any registry.
    #[error("unknown type tag: {0}")]
    UnknownType(String),

    /// Payload does not conform to the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Tag resolved but no request handler is registered for it.
    #[error("No handler registered for {0}")]
    NoHandler(String),

    /// Handler invocation failed; carries the handler's message verbatim.
    #[error("{0}")]
    Handler(String),

    /// Boundary not attached (or already disposed).
    #[error("transport unavailable: boundary not attached")]
    TransportUnavailable,

    /// A request is already in flight on this boundary instance.
    #[error("a request is already in flight")]
    Busy,
}

/// Configuration errors surfaced when building the handler registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// More than one request handler was registered for the same tag.
    #[error("duplicate request handler registration for: {0}")]
    DuplicateHandler(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_error_display() {
        let err = BridgeError::UnknownType("demo.bogus".into());
        assert_eq!(err.to_string(), "unknown type tag: demo.bogus");

        let err = BridgeError::Decode("expected value at line 1".into());
        assert_eq!(err.to_string(), "decode error: expected value at line 1");

        let err = BridgeError::NoHandler("Echo".into());
        assert_eq!(err.to_string(), "No handler registered for Echo");

        let err = BridgeError::Handler("boom".into());
        assert_eq!(err.to_string(), "boom");

        let err = BridgeError::TransportUnavailable;
        assert_eq!(
            err.to_string(),
            "transport unavailable: boundary not attached"
        );

        let err = BridgeError::Busy;
        assert_eq!(err.to_string(), "a request is already in flight");
    }

    #[test]
    fn registry_error_display() {
        let err = RegistryError::DuplicateHandler("theme.change".into());
        assert_eq!(
            err.to_string(),
            "duplicate request handler registration for: theme.change"
        );
    }
}
