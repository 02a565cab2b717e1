//! Title-based window lookup with a sliding TTL cache.
//!
//! Automators poll every 10-100ms and window enumeration is comparatively
//! expensive, so resolved handles are kept for a short TTL. Each hit refreshes
//! the entry; a key polled continuously never re-enumerates. Misses are not
//! cached, so a freshly launched game is picked up on the next call.

use std::sync::Arc;
use std::time::Duration;

use super::desktop::{Desktop, WindowHandle, WindowInfo};
use crate::cache::{Clock, SystemClock, TtlCache};
use crate::error::WindowError;

/// Default lifetime of a cached handle.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(2);

/// Resolves window title substrings to handles. Safe to share between threads.
pub struct WindowLocator<C: Clock = SystemClock> {
    desktop: Arc<dyn Desktop>,
    cache: TtlCache<String, WindowHandle, C>,
    /// Executable name the window must belong to, compared case-insensitively.
    process_filter: Option<String>,
}

impl WindowLocator<SystemClock> {
    pub fn new(desktop: Arc<dyn Desktop>, ttl: Duration) -> Self {
        Self::with_clock(desktop, ttl, SystemClock)
    }
}

impl<C: Clock> WindowLocator<C> {
    pub fn with_clock(desktop: Arc<dyn Desktop>, ttl: Duration, clock: C) -> Self {
        Self {
            desktop,
            cache: TtlCache::with_clock(ttl, clock),
            process_filter: None,
        }
    }

    /// Only match windows owned by a process with this executable name.
    /// An empty name disables the filter.
    pub fn with_process_filter(mut self, process_name: &str) -> Self {
        self.process_filter = if process_name.is_empty() {
            None
        } else {
            Some(process_name.to_string())
        };
        self
    }

    pub fn ttl(&self) -> Duration {
        self.cache.ttl()
    }

    /// Returns the first visible window whose title contains `title_substring`,
    /// ignoring case.
    pub fn resolve(&self, title_substring: &str) -> Result<WindowHandle, WindowError> {
        if let Some(handle) = self.cache.get(title_substring) {
            return Ok(handle);
        }

        let needle = title_substring.to_lowercase();
        let found = self
            .desktop
            .visible_windows()
            .into_iter()
            .find(|window| {
                window.title.to_lowercase().contains(&needle) && self.owned_by_target(window)
            });

        match found {
            Some(window) => {
                crate::log(&format!(
                    "Resolved \"{}\" to window {} \"{}\"",
                    title_substring, window.handle, window.title
                ));
                self.cache.insert(title_substring.to_string(), window.handle);
                Ok(window.handle)
            }
            None => Err(WindowError::NotFound {
                query: title_substring.to_string(),
            }),
        }
    }

    /// Drops the cached handle for `title_substring`, forcing the next
    /// `resolve` to enumerate.
    pub fn invalidate(&self, title_substring: &str) {
        if let Some(handle) = self.cache.remove(title_substring) {
            crate::log(&format!(
                "Dropped cached window {} for \"{}\"",
                handle, title_substring
            ));
        }
    }

    fn owned_by_target(&self, window: &WindowInfo) -> bool {
        match &self.process_filter {
            None => true,
            Some(expected) => window
                .process_name
                .as_deref()
                .is_some_and(|name| name.eq_ignore_ascii_case(expected)),
        }
    }
}
