use clap::Parser;

/// Trellis demo — a native shell with an embedded web UI over the Trellis
/// bridge.
#[derive(Parser, Debug)]
#[command(name = "trellis-demo", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<String>,

    /// Log level override (debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Load the demo UI from a URL instead of the bundled page.
    /// The URL must be within the navigation allowlist.
    #[arg(long)]
    pub url: Option<String>,

    /// Open the WebView devtools on startup.
    #[arg(long)]
    pub devtools: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
