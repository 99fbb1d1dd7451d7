//! Building a `wry` WebView with the bridge attached.

use std::sync::Arc;

use tracing::{debug, warn};
use wry::raw_window_handle;
use wry::{WebView, WebViewBuilder};

use trellis_bridge::{js_deliver, Envelope, MessagePost, BRIDGE_INIT_SCRIPT};

use crate::navigation::is_navigation_allowed;
use crate::queue::{InboundQueue, InboundRequest, OutboundQueue};

/// Configuration for creating a bridge WebView.
#[derive(Debug, Clone)]
pub struct BridgeViewConfig {
    /// Initial URL to load (mutually exclusive with `html`).
    pub url: Option<String>,
    /// Initial HTML content to render (mutually exclusive with `url`).
    pub html: Option<String>,
    /// Whether the WebView background should be transparent.
    pub transparent: bool,
    /// Whether to enable dev tools (always on in debug builds).
    pub devtools: bool,
    /// Custom user agent string.
    pub user_agent: Option<String>,
}

impl Default for BridgeViewConfig {
    fn default() -> Self {
        Self {
            url: None,
            html: None,
            transparent: false,
            devtools: cfg!(debug_assertions),
            user_agent: Some("Trellis/0.1".to_string()),
        }
    }
}

impl BridgeViewConfig {
    /// Create a config that loads a URL.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Create a config that renders inline HTML.
    pub fn with_html(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            ..Default::default()
        }
    }
}

/// A WebView with the guest bridge installed.
///
/// Inbound request envelopes accumulate in [`inbound`](Self::inbound);
/// the shell drains them, runs the boundary adapter, and answers with
/// [`deliver_response`](Self::deliver_response). Relayed events accumulate
/// in the outbound queue and are pushed into the guest by
/// [`flush_outbound`](Self::flush_outbound).
pub struct BridgeWebView {
    webview: WebView,
    inbound: InboundQueue,
    outbound: OutboundQueue,
}

impl BridgeWebView {
    /// Create a WebView as a child of the given window, bridge installed.
    pub fn build<W: raw_window_handle::HasWindowHandle>(
        window: &W,
        bounds: wry::Rect,
        config: BridgeViewConfig,
    ) -> Result<Self, wry::Error> {
        let inbound = InboundQueue::new();
        let outbound = OutboundQueue::new();

        let mut builder = WebViewBuilder::new()
            .with_bounds(bounds)
            .with_transparent(config.transparent)
            .with_devtools(config.devtools)
            .with_focused(false)
            .with_initialization_script(BRIDGE_INIT_SCRIPT);

        if let Some(ua) = &config.user_agent {
            builder = builder.with_user_agent(ua);
        }

        builder = Self::attach_ipc_handler(builder, inbound.clone());
        builder = Self::attach_navigation_handler(builder);

        if let Some(url) = &config.url {
            builder = builder.with_url(url);
        } else if let Some(html) = &config.html {
            builder = builder.with_html(html);
        } else {
            builder = builder.with_html("<html><body></body></html>");
        }

        let webview = builder.build_as_child(window)?;
        debug!("bridge WebView created");

        Ok(Self {
            webview,
            inbound,
            outbound,
        })
    }

    fn attach_ipc_handler(builder: WebViewBuilder<'_>, inbound: InboundQueue) -> WebViewBuilder<'_> {
        builder.with_ipc_handler(move |request| {
            let body = request.body().to_string();
            match Envelope::decode(&body) {
                Ok(Envelope::Request { name, payload }) => {
                    debug!(tag = %name, body_len = body.len(), "request from guest");
                    inbound.push(InboundRequest { name, payload });
                }
                Ok(_) => {
                    warn!(body_len = body.len(), "IPC message rejected: not a request envelope");
                }
                Err(e) => {
                    warn!(error = %e, body_len = body.len(), "IPC message rejected: malformed envelope");
                }
            }
        })
    }

    fn attach_navigation_handler(builder: WebViewBuilder<'_>) -> WebViewBuilder<'_> {
        builder.with_navigation_handler(move |url| {
            if !is_navigation_allowed(&url) {
                warn!(url = %url, "navigation blocked: URL not in allowlist");
                return false;
            }
            debug!(url = %url, "navigation allowed");
            true
        })
    }

    /// Queue of pending requests from the guest.
    pub fn inbound(&self) -> &InboundQueue {
        &self.inbound
    }

    /// The outbound queue as a relay sink. Safe to hand across threads;
    /// messages are actually delivered by [`flush_outbound`](Self::flush_outbound)
    /// on the main thread.
    pub fn relay_sink(&self) -> Arc<dyn MessagePost> {
        Arc::new(self.outbound.clone())
    }

    /// Answer the in-flight request with an encoded reply.
    ///
    /// The reply string comes from the boundary adapter and is always
    /// well-formed JSON; if it somehow is not, the guest still receives a
    /// response envelope (carrying the raw string) so its pending promise
    /// settles rather than hanging.
    pub fn deliver_response(&self, reply_json: &str) -> Result<(), wry::Error> {
        let result = serde_json::from_str(reply_json)
            .unwrap_or_else(|_| serde_json::Value::String(reply_json.to_string()));
        let envelope = Envelope::response(result);
        match envelope.encode() {
            Ok(message) => self.webview.evaluate_script(&js_deliver(&message)),
            Err(e) => {
                warn!(error = %e, "response envelope encode failed");
                Ok(())
            }
        }
    }

    /// Push every queued outbound message (relayed events) into the guest.
    /// Returns how many were delivered.
    pub fn flush_outbound(&self) -> usize {
        let messages = self.outbound.drain();
        let mut delivered = 0;
        for message in &messages {
            match self.webview.evaluate_script(&js_deliver(message)) {
                Ok(()) => delivered += 1,
                Err(e) => warn!(error = %e, "outbound delivery failed"),
            }
        }
        delivered
    }

    /// Execute JavaScript in the WebView context.
    pub fn evaluate_script(&self, js: &str) -> Result<(), wry::Error> {
        self.webview.evaluate_script(js)
    }

    /// Set the WebView bounds (position + size) within the parent window.
    pub fn set_bounds(&self, bounds: wry::Rect) -> Result<(), wry::Error> {
        self.webview.set_bounds(bounds)
    }

    /// Focus the WebView.
    pub fn focus(&self) -> Result<(), wry::Error> {
        self.webview.focus()
    }

    /// Open devtools (if enabled).
    pub fn open_devtools(&self) {
        self.webview.open_devtools();
    }

    /// Get a reference to the underlying wry WebView.
    pub fn inner(&self) -> &WebView {
        &self.webview
    }
}
