//! Configuration system for pte
//!
//! Loads settings from ~/.config/pte/config.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main settings structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub editor: EditorSettings,
    pub log: LogSettings,
}

/// Editor behavior settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Number of spaces per tab (default: 4)
    pub tab_width: usize,
    /// How long to wait for a keystroke before redrawing, in milliseconds (default: 25)
    pub poll_timeout_ms: u64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_width: 4,
            poll_timeout_ms: 25,
        }
    }
}

/// Log settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter directive, overridden by PTE_LOG or RUST_LOG (default: "info")
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Get the path to the config file
/// Always uses ~/.config/pte/config.toml (XDG-style) for consistency across platforms
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config/pte/config.toml"))
}

/// Template config file with comments explaining all options
/// This is generated when no config file exists
fn default_config_template() -> &'static str {
    r#"# pte configuration

[editor]
# tab_width = 4            # Spaces inserted by Tab in insert mode
# poll_timeout_ms = 25     # Keystroke wait before redrawing

[log]
# level = "info"           # Overridden by PTE_LOG or RUST_LOG
"#
}

/// Ensure config directory and template file exist
fn ensure_config_exists(path: &Path) {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            let _ = std::fs::create_dir_all(parent);
        }
    }

    if !path.exists() {
        let _ = std::fs::write(path, default_config_template());
    }
}

/// Load settings from the config file
/// Returns default settings if the file doesn't exist or can't be parsed
pub fn load_config() -> Settings {
    let Some(path) = config_path() else {
        return Settings::default();
    };
    ensure_config_exists(&path);
    load_config_from(&path)
}

/// Load settings from `path`, falling back to defaults with a warning
pub fn load_config_from(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str::<Settings>(&content) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("Warning: Failed to parse config file: {}", e);
                Settings::default()
            }
        },
        Err(e) => {
            eprintln!("Warning: Failed to read config file: {}", e);
            Settings::default()
        }
    }
}
