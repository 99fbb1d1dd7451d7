//! Navigation allowlist for bridge WebViews.

/// Allowed URL prefixes for webview navigation.
///
/// Only these origins are permitted. Everything else is blocked.
/// - `trellis://` — custom protocol reserved for bundled app content
/// - `about:blank` — default empty page and inline-HTML origin
pub const ALLOWED_NAV_PREFIXES: &[&str] = &[
    "trellis://",
    // On Windows, WebView2 rewrites custom protocols: trellis://localhost/… → http://trellis.localhost/…
    "http://trellis.localhost",
    "about:blank",
];

/// Check whether a URL is allowed by the navigation allowlist.
pub fn is_navigation_allowed(url: &str) -> bool {
    ALLOWED_NAV_PREFIXES
        .iter()
        .any(|prefix| url.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- Allowed URLs --

    #[test]
    fn allows_trellis_protocol() {
        assert!(is_navigation_allowed("trellis://localhost/index.html"));
        assert!(is_navigation_allowed("trellis://localhost/settings.html"));
    }

    #[test]
    fn allows_about_blank() {
        assert!(is_navigation_allowed("about:blank"));
    }

    #[test]
    fn allows_webview2_rewritten_custom_protocol() {
        assert!(is_navigation_allowed("http://trellis.localhost/index.html"));
    }

    // -- Blocked URLs --

    #[test]
    fn blocks_arbitrary_web_origins() {
        assert!(!is_navigation_allowed("https://example.com"));
        assert!(!is_navigation_allowed("http://evil.com"));
        assert!(!is_navigation_allowed("http://localhost:8080"));
    }

    #[test]
    fn blocks_file_protocol() {
        assert!(!is_navigation_allowed("file:///etc/passwd"));
    }

    #[test]
    fn blocks_javascript_and_data_protocols() {
        assert!(!is_navigation_allowed("javascript:alert(1)"));
        assert!(!is_navigation_allowed("data:text/html,<h1>x</h1>"));
    }

    #[test]
    fn blocks_empty_and_garbage() {
        assert!(!is_navigation_allowed(""));
        assert!(!is_navigation_allowed("not-a-url"));
    }
}
