//! Wires the registry, dispatcher, bus, relay, and boundary adapter
//! together at startup.

use std::sync::Arc;

use trellis_bridge::{EventRelay, HostBridge};
use trellis_interop::{EventBus, RegistryBuilder, RegistryError, RequestDispatcher};

use crate::context::WindowContext;
use crate::handlers::{
    ChangeBackdropHandler, ChangeThemeHandler, CloseSecondWindowHandler,
    GetAvailableBackdropsHandler, GetAvailableThemesHandler, GetUserSettingsHandler,
    SetWindowTitleHandler, ThemeChangedLog,
};

/// Everything the shell needs to run the bridge.
pub struct BridgeParts {
    /// Boundary adapter; attach once the WebView exists.
    pub host: Arc<HostBridge>,
    /// Host-side event bus, relaying toward the guest.
    pub bus: Arc<EventBus>,
    /// The relay, so the shell can attach/detach the transport sink.
    pub relay: Arc<EventRelay>,
}

/// Build the complete bridge against a window context.
///
/// Registration is explicit and happens exactly once, here; a duplicate
/// request registration is a startup error, not a call-time surprise.
pub fn build_bridge(ctx: &Arc<WindowContext>) -> Result<BridgeParts, RegistryError> {
    let relay = Arc::new(EventRelay::new());

    let registry = RegistryBuilder::new()
        .request(ChangeThemeHandler::new(ctx))
        .request(GetAvailableThemesHandler::new(ctx))
        .request(ChangeBackdropHandler::new(ctx))
        .request(GetAvailableBackdropsHandler::new(ctx))
        .request(GetUserSettingsHandler::new(ctx))
        .request(SetWindowTitleHandler::new(ctx))
        .request(CloseSecondWindowHandler::new(ctx))
        .event(ThemeChangedLog)
        .build()?;
    let registry = Arc::new(registry);

    let bus = Arc::new(EventBus::new(Arc::clone(&registry)).with_relay(relay.clone()));
    let host = Arc::new(HostBridge::new(RequestDispatcher::new(registry)));

    Ok(BridgeParts { host, bus, relay })
}
