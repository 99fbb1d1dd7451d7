//! In-process half of the Trellis host↔guest bridge.
//!
//! The guest (an embedded web UI) issues typed requests that are routed to
//! exactly one registered handler on the host; the host publishes typed
//! events that fan out to zero or more local handlers and, optionally, to
//! the guest via a relay. This crate owns everything that does not touch
//! the wire: the reply type, type tags, handler traits, the build-once
//! registry, the request dispatcher, the event bus, and dynamic
//! subscriptions.
//!
//! The wire side (envelope codec, boundary adapter, relay, injected guest
//! script) lives in `trellis-bridge`.

pub mod bus;
pub mod dispatch;
pub mod error;
pub mod message;
pub mod registry;
pub mod reply;
pub mod subscription;
pub mod tag;

pub use bus::EventBus;
pub use dispatch::RequestDispatcher;
pub use error::{BridgeError, HandlerError, RegistryError};
pub use message::{Event, EventHandler, EventSink, Request, RequestHandler};
pub use registry::{HandlerRegistry, RegistryBuilder};
pub use reply::Reply;
pub use subscription::{Subscribers, Subscription};
pub use tag::TypeTag;
