mod boot;
mod cli;
mod config;
mod context;
mod events;
mod handlers;
mod requests;
mod shell;
mod tags;
mod theme;

use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use winit::event_loop::EventLoop;

use crate::config::TrellisConfig;
use crate::context::WindowContext;
use crate::theme::ThemeStore;

fn main() {
    // Parse CLI arguments
    let args = cli::parse();

    // Initialize logging
    let log_directive = args.log_level.as_deref().unwrap_or("info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("Trellis demo v{} starting...", env!("CARGO_PKG_VERSION"));

    // Load config
    let config = match &args.config {
        Some(path) => config::load_from_path(Path::new(path)),
        None => config::load_default(),
    }
    .unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        TrellisConfig::default()
    });
    let mut config = config;
    if args.devtools {
        config.devtools = true;
    }
    tracing::info!("Config loaded (theme: {})", config.theme.name);

    // Build the window context and the bridge
    let ctx = Arc::new(WindowContext::new(ThemeStore::with_initial(
        &config.theme.name,
    )));
    let parts = match boot::build_bridge(&ctx) {
        Ok(parts) => parts,
        Err(e) => {
            tracing::error!("Bridge configuration error: {e}");
            std::process::exit(1);
        }
    };

    // Create event loop and run
    let event_loop = EventLoop::new().expect("failed to create event loop");
    let mut app = shell::DemoApp::new(config, args.url.clone(), ctx, parts);

    tracing::info!("Entering event loop");
    if let Err(e) = event_loop.run_app(&mut app) {
        tracing::error!("Event loop error: {e}");
    }
    tracing::info!("Shutdown complete");
}
