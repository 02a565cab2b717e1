//! OS primitives the helper consumes.

use anyhow::Result;
use image::Rgb;
use std::fmt;

use crate::error::WindowError;
use crate::geometry::{ClientRect, ScreenPoint};

/// Opaque identifier of a top-level window. Owned by the OS.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// A visible top-level window as seen during enumeration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WindowInfo {
    pub handle: WindowHandle,
    pub title: String,
    /// Executable file name of the owning process, when it could be queried.
    pub process_name: Option<String>,
}

/// Window enumeration, geometry and input for one desktop session.
pub trait Desktop: Send + Sync {
    /// Visible top-level windows with a non-empty title, in z-order.
    fn visible_windows(&self) -> Vec<WindowInfo>;

    /// Client area of `handle` in absolute screen coordinates.
    fn client_rect(&self, handle: WindowHandle) -> Result<ClientRect, WindowError>;

    fn is_window(&self, handle: WindowHandle) -> bool;

    fn cursor_position(&self) -> Result<ScreenPoint>;

    /// Color of the screen pixel at `point`.
    fn pixel(&self, point: ScreenPoint) -> Result<Rgb<u8>>;

    fn move_to(&self, point: ScreenPoint) -> Result<()>;

    /// Moves the cursor to `point` and presses the left button.
    fn mouse_down(&self, point: ScreenPoint) -> Result<()>;

    /// Releases the left button wherever the cursor is.
    fn mouse_up(&self) -> Result<()>;

    /// Moves the cursor to `point` and clicks the left button.
    fn click(&self, point: ScreenPoint) -> Result<()>;
}

/// Converts a screen point to the 0-65535 range absolute mouse input uses,
/// relative to `virtual_screen` (the bounding box of every monitor).
///
/// Points outside the virtual screen are clamped to its edge.
#[cfg_attr(not(windows), allow(dead_code))]
pub(crate) fn to_absolute_input(point: ScreenPoint, virtual_screen: &ClientRect) -> (i32, i32) {
    fn axis(value: i32, origin: i32, extent: i32) -> i32 {
        if extent <= 1 {
            return 0;
        }
        let offset = (value as i64 - origin as i64).clamp(0, extent as i64 - 1);
        (offset * 65535 / (extent as i64 - 1)) as i32
    }
    (
        axis(point.x, virtual_screen.x, virtual_screen.width),
        axis(point.y, virtual_screen.y, virtual_screen.height),
    )
}
