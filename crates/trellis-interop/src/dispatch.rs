//! Routes a decoded request to its single registered handler and wraps the
//! outcome in a [`Reply`].
//!
//! Every failure mode -- unknown tag, malformed payload, handler error --
//! becomes a failed reply; nothing propagates past the dispatcher. A
//! hostile or malformed message can therefore never abort the host
//! process.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::BridgeError;
use crate::registry::HandlerRegistry;
use crate::reply::Reply;

pub struct RequestDispatcher {
    registry: Arc<HandlerRegistry>,
}

impl RequestDispatcher {
    pub fn new(registry: Arc<HandlerRegistry>) -> Self {
        Self { registry }
    }

    /// Dispatch a serialized request to the handler registered for `tag`,
    /// awaiting it to completion.
    ///
    /// A cancellation observed before the handler is invoked short-circuits
    /// to an empty successful reply without running the handler. Handlers
    /// that are already running are always awaited to completion -- there
    /// are no fire-and-forget requests.
    pub async fn dispatch(&self, tag: &str, payload: &str, cancel: &CancellationToken) -> Reply {
        if cancel.is_cancelled() {
            debug!(tag, "request cancelled before dispatch");
            return Reply::ok_empty();
        }

        let Some(handler) = self.registry.resolve_request(tag) else {
            debug!(tag, "no handler registered");
            return Reply::fail(BridgeError::NoHandler(tag.to_string()).to_string());
        };

        match handler.invoke(payload, cancel.clone()).await {
            Ok(data) => Reply::ok(data),
            Err(e) => {
                debug!(tag, error = %e, "request failed");
                Reply::fail(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::message::{Request, RequestHandler};
    use crate::registry::RegistryBuilder;
    use crate::tag::TypeTag;
    use async_trait::async_trait;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize)]
    struct Echo {
        message: String,
    }

    impl Request for Echo {
        type Output = String;
        const TAG: TypeTag = TypeTag::new("Echo");
    }

    struct EchoHandler;

    #[async_trait]
    impl RequestHandler<Echo> for EchoHandler {
        async fn handle(
            &self,
            request: Echo,
            _cancel: &CancellationToken,
        ) -> Result<String, HandlerError> {
            Ok(format!("Echo: {}", request.message))
        }
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Boom;

    impl Request for Boom {
        type Output = String;
        const TAG: TypeTag = TypeTag::new("Boom");
    }

    struct BoomHandler;

    #[async_trait]
    impl RequestHandler<Boom> for BoomHandler {
        async fn handle(
            &self,
            _request: Boom,
            _cancel: &CancellationToken,
        ) -> Result<String, HandlerError> {
            Err("boom".into())
        }
    }

    fn dispatcher() -> RequestDispatcher {
        let registry = RegistryBuilder::new()
            .request(EchoHandler)
            .request(BoomHandler)
            .build()
            .unwrap();
        RequestDispatcher::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn registered_handler_returns_success() {
        let reply = dispatcher()
            .dispatch("Echo", r#"{"message":"hi"}"#, &CancellationToken::new())
            .await;

        assert!(reply.success);
        assert!(reply.error.is_none());
        assert_eq!(reply.data, Some(json!("Echo: hi")));
        assert_eq!(
            reply.to_json(),
            r#"{"Success":true,"Error":null,"Data":"Echo: hi"}"#
        );
    }

    #[tokio::test]
    async fn unknown_tag_returns_no_handler_failure() {
        let reply = dispatcher()
            .dispatch("Missing", "{}", &CancellationToken::new())
            .await;

        assert!(!reply.success);
        assert_eq!(
            reply.error.as_deref(),
            Some("No handler registered for Missing")
        );
        assert!(reply.data.is_none());
    }

    #[tokio::test]
    async fn handler_failure_is_captured_as_message() {
        let reply = dispatcher()
            .dispatch("Boom", "null", &CancellationToken::new())
            .await;

        assert!(!reply.success);
        assert_eq!(reply.error.as_deref(), Some("boom"));
        assert_eq!(
            reply.to_json(),
            r#"{"Success":false,"Error":"boom","Data":null}"#
        );
    }

    #[tokio::test]
    async fn malformed_payload_returns_decode_failure() {
        let reply = dispatcher()
            .dispatch("Echo", "{ not json", &CancellationToken::new())
            .await;

        assert!(!reply.success);
        assert!(reply.error.as_deref().unwrap().starts_with("decode error"));
        assert!(reply.data.is_none());
    }

    #[tokio::test]
    async fn cancellation_before_invoke_short_circuits() {
        let cancel = CancellationToken::new();
        cancel.cancel();

        let reply = dispatcher()
            .dispatch("Echo", r#"{"message":"hi"}"#, &cancel)
            .await;

        // No-op completed reply; the handler never ran.
        assert!(reply.success);
        assert!(reply.error.is_none());
        assert!(reply.data.is_none());
    }

    #[tokio::test]
    async fn dispatch_is_idempotent_for_stateless_handlers() {
        let dispatcher = dispatcher();
        let payload = r#"{"message":"same"}"#;

        let first = dispatcher
            .dispatch("Echo", payload, &CancellationToken::new())
            .await;
        let second = dispatcher
            .dispatch("Echo", payload, &CancellationToken::new())
            .await;

        assert_eq!(first.data, second.data);
    }
}
