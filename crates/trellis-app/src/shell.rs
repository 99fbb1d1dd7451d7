//! The winit shell: owns the windows and the WebView, drives the bridge
//! from the main event loop.
//!
//! The loop pumps three queues every tick: inbound guest requests (served
//! through the boundary adapter), deferred window actions queued by
//! handlers, and outbound relay messages into the guest. All WebView
//! access stays on this thread.

use std::sync::Arc;
use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowAttributes, WindowId};

use trellis_webview::{BridgeViewConfig, BridgeWebView};

use crate::boot::BridgeParts;
use crate::config::TrellisConfig;
use crate::context::{HostAction, WindowContext};
use crate::events::{HostNotification, ThemeChanged};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// The bundled demo page, exercised against the bridge.
const DEMO_PAGE: &str = include_str!("../assets/index.html");

pub struct DemoApp {
    config: TrellisConfig,
    page_url: Option<String>,
    ctx: Arc<WindowContext>,
    parts: BridgeParts,

    window: Option<Arc<Window>>,
    second_window: Option<Window>,
    webview: Option<BridgeWebView>,

    last_poll: Instant,
}

impl DemoApp {
    pub fn new(
        config: TrellisConfig,
        page_url: Option<String>,
        ctx: Arc<WindowContext>,
        parts: BridgeParts,
    ) -> Self {
        Self {
            config,
            page_url,
            ctx,
            parts,
            window: None,
            second_window: None,
            webview: None,
            last_poll: Instant::now(),
        }
    }

    /// Create the windows and the bridge WebView.
    /// Returns `false` if initialization failed and the event loop should
    /// exit.
    fn initialize_windows(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let attrs = WindowAttributes::default()
            .with_title(&self.config.window.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("Failed to create main window: {e}");
                return false;
            }
        };

        let second_attrs = WindowAttributes::default()
            .with_title(format!("{} — Second Window", self.config.window.title))
            .with_inner_size(winit::dpi::LogicalSize::new(420.0, 280.0));
        match event_loop.create_window(second_attrs) {
            Ok(w) => self.second_window = Some(w),
            Err(e) => tracing::warn!("Failed to create second window: {e}"),
        }

        let mut view_config = match &self.page_url {
            Some(url) => BridgeViewConfig::with_url(url),
            None => BridgeViewConfig::with_html(DEMO_PAGE),
        };
        view_config.devtools = view_config.devtools || self.config.devtools;

        let webview = match BridgeWebView::build(&*window, full_bounds(&window), view_config) {
            Ok(wv) => wv,
            Err(e) => {
                tracing::error!("Failed to create WebView: {e}");
                return false;
            }
        };
        if self.config.devtools {
            webview.open_devtools();
        }

        // The boundary exists now: attach the adapter and the relay sink.
        self.parts.host.attach();
        self.parts.relay.attach(webview.relay_sink());

        self.webview = Some(webview);
        self.window = Some(window);

        self.apply_theme_to_windows();
        pollster::block_on(
            self.parts
                .bus
                .publish(&HostNotification::now("host attached")),
        );

        tracing::info!("Windows created and bridge attached");
        true
    }

    /// Serve pending guest requests in arrival order, one at a time.
    fn answer_requests(&self) {
        let Some(webview) = &self.webview else {
            return;
        };
        for request in webview.inbound().drain() {
            let payload = request.payload.to_string();
            let reply = pollster::block_on(self.parts.host.handle(&payload, &request.name));
            if let Err(e) = webview.deliver_response(&reply) {
                tracing::warn!(tag = %request.name, error = %e, "failed to deliver response");
            }
        }
    }

    fn apply_action(&mut self, action: HostAction) {
        match action {
            HostAction::SetWindowTitle(text) => {
                if let Some(window) = &self.window {
                    window.set_title(&text);
                }
            }
            HostAction::CloseSecondWindow => {
                if self.second_window.take().is_some() {
                    tracing::info!("second window closed");
                }
            }
            HostAction::ApplyTheme => {
                self.apply_theme_to_windows();
                let theme_name = self.ctx.current_theme().name;
                pollster::block_on(self.parts.bus.publish(&ThemeChanged { theme_name }));
            }
        }
    }

    /// Push the current theme onto every open window and into the page.
    fn apply_theme_to_windows(&self) {
        let theme = self.ctx.current_theme();
        let winit_theme = if theme.dark {
            winit::window::Theme::Dark
        } else {
            winit::window::Theme::Light
        };

        if let Some(window) = &self.window {
            window.set_theme(Some(winit_theme));
        }
        if let Some(window) = &self.second_window {
            window.set_theme(Some(winit_theme));
        }

        if let Some(webview) = &self.webview {
            // Theme colors are our own constants, safe to splice into JS.
            let js = format!(
                "document.documentElement.style.setProperty('--background', '{}');\
                 document.documentElement.style.setProperty('--foreground', '{}');\
                 document.documentElement.style.setProperty('--accent', '{}');",
                theme.background, theme.foreground, theme.accent
            );
            if let Err(e) = webview.evaluate_script(&js) {
                tracing::warn!(error = %e, "failed to push theme into the page");
            }
        }
    }

    fn pump(&mut self) {
        self.answer_requests();

        for action in self.ctx.drain_actions() {
            self.apply_action(action);
        }

        if let Some(webview) = &self.webview {
            webview.flush_outbound();
        }
    }

    fn shutdown(&mut self) {
        tracing::info!("Shutting down bridge");
        self.parts.relay.detach();
        self.parts.host.dispose();
        self.webview = None;
        self.second_window = None;
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if !self.initialize_windows(event_loop) {
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let is_main = self.window.as_ref().is_some_and(|w| w.id() == window_id);

        match event {
            WindowEvent::CloseRequested => {
                if is_main {
                    tracing::info!("Main window close requested");
                    self.shutdown();
                    event_loop.exit();
                } else {
                    self.second_window = None;
                }
            }

            WindowEvent::Resized(size) => {
                if is_main && size.width > 0 && size.height > 0 {
                    if let (Some(webview), Some(window)) = (&self.webview, &self.window) {
                        if let Err(e) = webview.set_bounds(full_bounds(window)) {
                            tracing::warn!(error = %e, "failed to resize WebView");
                        }
                    }
                }
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now.duration_since(self.last_poll) >= POLL_INTERVAL {
            self.last_poll = now;
            self.pump();
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }
}

/// Bounds covering the whole client area of a window.
fn full_bounds(window: &Window) -> wry::Rect {
    let size = window.inner_size();
    wry::Rect {
        position: wry::dpi::Position::Physical(wry::dpi::PhysicalPosition::new(0, 0)),
        size: wry::dpi::Size::Physical(wry::dpi::PhysicalSize::new(size.width, size.height)),
    }
}
