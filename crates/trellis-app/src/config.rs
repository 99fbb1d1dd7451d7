//! TOML configuration for the demo shell.
//!
//! All structs use `serde(default)` so partial configs work correctly;
//! missing fields fall back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),
}

/// Main window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f64,
    pub height: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Trellis Demo".into(),
            width: 1024.0,
            height: 720.0,
        }
    }
}

/// Theme selection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSelection {
    /// Built-in theme name to start on.
    pub name: String,
}

impl Default for ThemeSelection {
    fn default() -> Self {
        Self {
            name: "Light".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TrellisConfig {
    pub window: WindowConfig,
    pub theme: ThemeSelection,
    /// Open the WebView devtools on startup.
    pub devtools: bool,
}

/// Load config from a specific TOML file path.
pub fn load_from_path(path: &Path) -> Result<TrellisConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("failed to read {}: {e}", path.display())))?;

    let config: TrellisConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    if let Err(e) = validate(&config) {
        warn!("config validation warning: {e}");
        warn!("falling back to default config");
        return Ok(TrellisConfig::default());
    }

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// If the file does not exist, creates a default config file and returns
/// defaults.
pub fn load_default() -> Result<TrellisConfig, ConfigError> {
    let path = default_config_path()?;

    if !path.exists() {
        info!("no config found at {}, creating default", path.display());
        create_default_config(&path)?;
        return Ok(TrellisConfig::default());
    }

    load_from_path(&path)
}

/// Get the platform-specific default config file path.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))?;
    Ok(config_dir.join("trellis").join("config.toml"))
}

fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, default_config_toml()).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    })?;

    info!("created default config at {}", path.display());
    Ok(())
}

/// Generate the default TOML config content with comments.
fn default_config_toml() -> String {
    r##"# Trellis Demo Configuration
# Only override what you want to change -- missing fields use defaults.

[window]
title = "Trellis Demo"
width = 1024.0
height = 720.0

[theme]
# One of: "Light", "Light Blue", "Dark", "Dark Purple"
name = "Light"

# Open the WebView devtools on startup.
devtools = false
"##
    .to_string()
}

fn validate(config: &TrellisConfig) -> Result<(), String> {
    if config.window.width <= 0.0 || config.window.height <= 0.0 {
        return Err(format!(
            "window size must be positive, got {}x{}",
            config.window.width, config.window.height
        ));
    }
    if config.window.title.is_empty() {
        return Err("window title must not be empty".into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = TrellisConfig::default();
        assert_eq!(config.window.title, "Trellis Demo");
        assert_eq!(config.theme.name, "Light");
        assert!(!config.devtools);
    }

    #[test]
    fn partial_toml_fills_missing_fields_with_defaults() {
        let config: TrellisConfig = toml::from_str(
            r#"
            [theme]
            name = "Dark"
            "#,
        )
        .unwrap();
        assert_eq!(config.theme.name, "Dark");
        assert_eq!(config.window.width, 1024.0);
    }

    #[test]
    fn default_toml_content_parses_back_to_defaults() {
        let config: TrellisConfig = toml::from_str(&default_config_toml()).unwrap();
        assert_eq!(config.window.title, TrellisConfig::default().window.title);
        assert_eq!(config.theme.name, "Light");
    }

    #[test]
    fn validation_rejects_degenerate_window_sizes() {
        let mut config = TrellisConfig::default();
        config.window.width = 0.0;
        assert!(validate(&config).is_err());

        let mut config = TrellisConfig::default();
        config.window.title.clear();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let result = toml::from_str::<TrellisConfig>("[window\ntitle = ");
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        let err = load_from_path(Path::new("/nonexistent/trellis/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
