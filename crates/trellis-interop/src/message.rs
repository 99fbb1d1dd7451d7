//! Request/event marker traits and the handler traits implemented by host
//! logic.
//!
//! Requests flow guest → host and produce exactly one result; events flow
//! host → guest (and to local host-side handlers) and produce none. Both
//! are plain serde values tied to a [`TypeTag`] at compile time -- the tag
//! is what crosses the wire, never a type name.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::tag::TypeTag;

/// A typed request with exactly one expected result shape.
pub trait Request: DeserializeOwned + Send + 'static {
    /// Result shape produced by this request's handler.
    type Output: Serialize + Send + 'static;

    /// Routing tag; must be unique per request shape within a process.
    const TAG: TypeTag;
}

/// A typed event. Events carry no result and may have zero, one, or many
/// interested handlers.
pub trait Event: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Routing tag; must be unique per event shape within a process.
    const TAG: TypeTag;
}

/// Host logic consuming one request shape and producing its result.
///
/// The dispatcher awaits `handle` to completion before encoding a reply;
/// a returned error is captured as the reply's message and never
/// propagates further.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync + 'static {
    async fn handle(
        &self,
        request: R,
        cancel: &CancellationToken,
    ) -> Result<R::Output, HandlerError>;
}

/// Host logic consuming one event shape. Failures are caught and logged by
/// the event bus; they do not abort sibling handlers or the relay step.
#[async_trait]
pub trait EventHandler<E: Event>: Send + Sync + 'static {
    async fn handle(&self, event: &E, cancel: &CancellationToken) -> Result<(), HandlerError>;
}

/// One-way egress toward the guest. Implemented by the event relay in
/// `trellis-bridge`; the bus only knows it can hand over a tag and an
/// already-serialized payload, best-effort.
pub trait EventSink: Send + Sync {
    fn send(&self, tag: TypeTag, payload: Value);
}
