//! Helper configuration.
//!
//! Loads settings from config.json at startup. Provides the target window
//! title, the lookup cache TTL, the frame database location and polling
//! intervals.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use crate::automation::DEFAULT_TOLERANCE;
use crate::paths;

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<HelperConfig> = OnceLock::new();

/// Complete helper configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HelperConfig {
    /// Substring matched (ignoring case) against visible window titles
    #[serde(default = "default_window_title")]
    pub window_title: String,
    /// Executable that must own the window; empty accepts any process
    #[serde(default = "default_process_name")]
    pub process_name: String,
    /// How long a resolved window handle is reused without re-enumerating (milliseconds)
    #[serde(default = "default_cache_ttl_ms")]
    pub cache_ttl_ms: u64,
    /// Frame database path, relative to the executable directory unless absolute
    #[serde(default = "default_frames_database")]
    pub frames_database: PathBuf,
    /// Cursor polling interval for the coordinate tracker (milliseconds)
    #[serde(default = "default_track_interval_ms")]
    pub track_interval_ms: u64,
    /// Per-channel tolerance when comparing sampled pixel colors
    #[serde(default = "default_color_tolerance")]
    pub color_tolerance: u8,
}

fn default_window_title() -> String {
    "WidgetInc".to_string()
}

fn default_process_name() -> String {
    "WidgetInc.exe".to_string()
}

fn default_cache_ttl_ms() -> u64 {
    2000
}

fn default_frames_database() -> PathBuf {
    PathBuf::from("config/database/frames_database.json")
}

fn default_track_interval_ms() -> u64 {
    100
}

fn default_color_tolerance() -> u8 {
    DEFAULT_TOLERANCE
}

impl Default for HelperConfig {
    fn default() -> Self {
        Self {
            window_title: default_window_title(),
            process_name: default_process_name(),
            cache_ttl_ms: default_cache_ttl_ms(),
            frames_database: default_frames_database(),
            track_interval_ms: default_track_interval_ms(),
            color_tolerance: default_color_tolerance(),
        }
    }
}

impl HelperConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_millis(self.cache_ttl_ms)
    }

    pub fn track_interval(&self) -> Duration {
        Duration::from_millis(self.track_interval_ms)
    }

    /// Absolute location of the frame database.
    pub fn frames_database_path(&self) -> PathBuf {
        paths::resolve_from_exe_dir(&self.frames_database)
    }
}

/// Loads configuration from `path`, falling back to defaults when the file is
/// missing or malformed.
pub fn load_config_from(path: &Path) -> HelperConfig {
    crate::log(&format!("Looking for config at: {}", path.display()));

    if path.exists() {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    crate::log("Config loaded from config.json");
                    return config;
                }
                Err(e) => {
                    crate::log(&format!(
                        "Failed to parse config.json: {}. Using defaults.",
                        e
                    ));
                }
            },
            Err(e) => {
                crate::log(&format!(
                    "Failed to read config.json: {}. Using defaults.",
                    e
                ));
            }
        }
    } else {
        crate::log("config.json not found. Using default config.");
    }

    HelperConfig::default()
}

/// Loads config.json from the executable directory.
fn load_config() -> HelperConfig {
    load_config_from(&paths::get_exe_dir().join("config.json"))
}

/// Initializes the global configuration. Call once at startup.
pub fn init_config() {
    let _ = CONFIG.set(load_config());
}

/// Returns the global configuration, loading it on first use.
pub fn get_config() -> &'static HelperConfig {
    CONFIG.get_or_init(load_config)
}
