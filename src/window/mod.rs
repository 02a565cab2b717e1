//! Game window discovery and geometry.
//!
//! This module provides:
//! - The `Desktop` trait over OS window, cursor, pixel and mouse input primitives
//! - A Win32 backend (Windows only) and a headless fallback
//! - `WindowLocator`, which caches title lookups for a short TTL

pub mod desktop;
pub mod headless;
pub mod locator;
#[cfg(windows)]
pub mod win32;

use std::sync::Arc;

pub use desktop::{Desktop, WindowHandle, WindowInfo};
pub use headless::HeadlessDesktop;
pub use locator::{DEFAULT_CACHE_TTL, WindowLocator};
#[cfg(windows)]
pub use win32::Win32Desktop;

/// Returns the desktop backend for the current platform.
#[cfg(windows)]
pub fn native_desktop() -> Arc<dyn Desktop> {
    Arc::new(Win32Desktop)
}

/// Returns the desktop backend for the current platform.
#[cfg(not(windows))]
pub fn native_desktop() -> Arc<dyn Desktop> {
    crate::log("No window backend for this platform; running headless");
    Arc::new(HeadlessDesktop)
}
