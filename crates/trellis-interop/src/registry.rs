//! Build-once mapping from type tags to handlers.
//!
//! The registry is populated by explicit per-handler registration calls at
//! startup and is immutable afterward: request tags map to exactly one
//! handler (a duplicate is a configuration error surfaced by [`build`]),
//! event tags map to zero or more handlers invoked in registration order.
//! Reads after build need no synchronization; share it as
//! `Arc<HandlerRegistry>`.
//!
//! [`build`]: RegistryBuilder::build

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::error::{BridgeError, HandlerError, RegistryError};
use crate::message::{Event, EventHandler, Request, RequestHandler};
use crate::tag::TypeTag;

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

type RequestFn =
    Box<dyn Fn(&str, CancellationToken) -> BoxFuture<Result<Value, BridgeError>> + Send + Sync>;

type EventFn = Box<
    dyn Fn(&(dyn Any + Send + Sync), CancellationToken) -> BoxFuture<Result<(), BridgeError>>
        + Send
        + Sync,
>;

/// A request handler erased down to "JSON in, JSON out". The erasure
/// closure owns the typed decode, so a payload that does not match the
/// request shape surfaces as [`BridgeError::Decode`] here and nowhere else.
pub struct ErasedRequestHandler {
    tag: TypeTag,
    call: RequestFn,
}

impl ErasedRequestHandler {
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    /// Decode the payload, run the handler to completion, encode the result.
    pub fn invoke(
        &self,
        payload: &str,
        cancel: CancellationToken,
    ) -> BoxFuture<Result<Value, BridgeError>> {
        (self.call)(payload, cancel)
    }
}

/// An event handler erased over `Any`; the bus passes the typed event by
/// reference and the closure downcasts back to the concrete shape.
pub struct ErasedEventHandler {
    tag: TypeTag,
    call: EventFn,
}

impl ErasedEventHandler {
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn invoke(
        &self,
        event: &(dyn Any + Send + Sync),
        cancel: CancellationToken,
    ) -> BoxFuture<Result<(), BridgeError>> {
        (self.call)(event, cancel)
    }
}

fn erase_request<R, H>(handler: H) -> ErasedRequestHandler
where
    R: Request,
    H: RequestHandler<R>,
{
    let handler = Arc::new(handler);
    ErasedRequestHandler {
        tag: R::TAG,
        call: Box::new(move |payload, cancel| {
            // Decode before entering the future so it does not borrow the payload.
            let parsed = serde_json::from_str::<R>(payload)
                .map_err(|e| BridgeError::Decode(e.to_string()));
            let handler = Arc::clone(&handler);
            Box::pin(async move {
                let request = parsed?;
                let output = handler
                    .handle(request, &cancel)
                    .await
                    .map_err(|e| BridgeError::Handler(e.to_string()))?;
                serde_json::to_value(output)
                    .map_err(|e| BridgeError::Handler(format!("failed to encode result: {e}")))
            })
        }),
    }
}

fn erase_event<E, H>(handler: H) -> ErasedEventHandler
where
    E: Event,
    H: EventHandler<E>,
{
    let handler = Arc::new(handler);
    ErasedEventHandler {
        tag: E::TAG,
        call: Box::new(move |event, cancel| {
            let event = event.downcast_ref::<E>().cloned();
            let handler = Arc::clone(&handler);
            Box::pin(async move {
                let Some(event) = event else {
                    return Err(BridgeError::Decode(format!(
                        "event payload does not match {}",
                        E::TAG
                    )));
                };
                handler
                    .handle(&event, &cancel)
                    .await
                    .map_err(|e| BridgeError::Handler(e.to_string()))
            })
        }),
    }
}

/// Immutable tag → handler mapping. Built once via [`RegistryBuilder`].
pub struct HandlerRegistry {
    requests: HashMap<&'static str, ErasedRequestHandler>,
    events: HashMap<&'static str, Vec<ErasedEventHandler>>,
}

impl HandlerRegistry {
    /// Pure lookup of the single request handler for a tag.
    pub fn resolve_request(&self, tag: &str) -> Option<&ErasedRequestHandler> {
        self.requests.get(tag)
    }

    /// Pure lookup of the event handlers for a tag, in registration order.
    /// An unknown tag yields an empty slice -- events tolerate zero handlers.
    pub fn resolve_event(&self, tag: &str) -> &[ErasedEventHandler] {
        self.events.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of registered request handlers.
    pub fn request_count(&self) -> usize {
        self.requests.len()
    }
}

/// Collects handler registrations and produces a [`HandlerRegistry`].
///
/// Duplicate request registrations are recorded, not overwritten, and fail
/// [`build`](Self::build) -- the error belongs to startup, never to call
/// time. Fallible registrations (`try_request` / `try_event`) skip only
/// the handler whose factory failed; the rest of the registry still builds.
#[derive(Default)]
pub struct RegistryBuilder {
    requests: HashMap<&'static str, ErasedRequestHandler>,
    events: HashMap<&'static str, Vec<ErasedEventHandler>>,
    duplicates: Vec<&'static str>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for request shape `R`.
    pub fn request<R, H>(mut self, handler: H) -> Self
    where
        R: Request,
        H: RequestHandler<R>,
    {
        let tag = R::TAG.as_str();
        if self.requests.contains_key(tag) {
            self.duplicates.push(tag);
        } else {
            self.requests.insert(tag, erase_request(handler));
        }
        self
    }

    /// Register a request handler via a fallible factory. A factory error
    /// skips this handler with a warning; it is not fatal to the registry.
    pub fn try_request<R, H, F>(self, factory: F) -> Self
    where
        R: Request,
        H: RequestHandler<R>,
        F: FnOnce() -> Result<H, HandlerError>,
    {
        match factory() {
            Ok(handler) => self.request(handler),
            Err(e) => {
                warn!(tag = %R::TAG, error = %e, "skipping request handler: construction failed");
                self
            }
        }
    }

    /// Append a handler for event shape `E`. Duplicates are permitted; the
    /// same handler may be registered twice if that is intentional.
    pub fn event<E, H>(mut self, handler: H) -> Self
    where
        E: Event,
        H: EventHandler<E>,
    {
        self.events
            .entry(E::TAG.as_str())
            .or_default()
            .push(erase_event(handler));
        self
    }

    /// Append an event handler via a fallible factory; same skip-and-warn
    /// policy as [`try_request`](Self::try_request).
    pub fn try_event<E, H, F>(self, factory: F) -> Self
    where
        E: Event,
        H: EventHandler<E>,
        F: FnOnce() -> Result<H, HandlerError>,
    {
        match factory() {
            Ok(handler) => self.event(handler),
            Err(e) => {
                warn!(tag = %E::TAG, error = %e, "skipping event handler: construction failed");
                self
            }
        }
    }

    /// Finish the registry. Fails if any request tag was registered twice.
    pub fn build(self) -> Result<HandlerRegistry, RegistryError> {
        if !self.duplicates.is_empty() {
            return Err(RegistryError::DuplicateHandler(self.duplicates.join(", ")));
        }
        Ok(HandlerRegistry {
            requests: self.requests,
            events: self.events,
        })
    }
}
