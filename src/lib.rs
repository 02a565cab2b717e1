//! WidgetInc helper library.
//!
//! Locates the WidgetInc game window and maps the game's 192x128 background
//! pixel grid onto absolute screen coordinates, so frame definitions authored
//! once in grid units can be clicked and sampled at any window size.
//!
//! Layers, leaf-first:
//! - `window`: window enumeration, client geometry and the TTL-cached locator
//! - `geometry`: playable area letterboxing and grid <-> screen mapping
//! - `frames`: the read-only frame database
//! - `automation`: pixel color checks and cooperative cancellation
//! - `session`: `GameWindow`, the entry point used by automators

pub mod automation;
pub mod cache;
pub mod config;
pub mod error;
pub mod frames;
pub mod geometry;
pub mod paths;
pub mod session;
pub mod window;

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;

pub use error::{FrameDbError, WindowError};
pub use session::GameWindow;

/// Logs a message to both console and log file with timestamp.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join("widgetinc_helper.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}
