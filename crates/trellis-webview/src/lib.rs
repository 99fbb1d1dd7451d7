//! `wry` integration for the Trellis bridge.
//!
//! Wraps a `wry::WebView` so that:
//! - the guest bridge script is injected before any page code runs,
//! - inbound request envelopes from `window.ipc.postMessage` land on a
//!   queue the shell drains from its event loop,
//! - outbound responses and relayed events are delivered into the guest
//!   via `evaluate_script`,
//! - navigation is restricted to an allowlist.
//!
//! The WebView itself is not `Send`, so nothing here hands it to another
//! thread: cross-thread senders (the event relay) post into an
//! [`OutboundQueue`] that the shell flushes on the main thread.

pub mod navigation;
pub mod queue;
pub mod view;

pub use navigation::{is_navigation_allowed, ALLOWED_NAV_PREFIXES};
pub use queue::{InboundQueue, InboundRequest, OutboundQueue};
pub use view::{BridgeViewConfig, BridgeWebView};
