//! Desktop for platforms without a window backend. Sees no windows.

use anyhow::{Result, anyhow};
use image::Rgb;

use super::desktop::{Desktop, WindowHandle, WindowInfo};
use crate::error::WindowError;
use crate::geometry::{ClientRect, ScreenPoint};

#[derive(Clone, Copy, Debug, Default)]
pub struct HeadlessDesktop;

impl Desktop for HeadlessDesktop {
    fn visible_windows(&self) -> Vec<WindowInfo> {
        Vec::new()
    }

    fn client_rect(&self, handle: WindowHandle) -> Result<ClientRect, WindowError> {
        Err(WindowError::Invalid { handle })
    }

    fn is_window(&self, _handle: WindowHandle) -> bool {
        false
    }

    fn cursor_position(&self) -> Result<ScreenPoint> {
        Err(anyhow!("Cursor position is not available on this platform"))
    }

    fn pixel(&self, point: ScreenPoint) -> Result<Rgb<u8>> {
        Err(anyhow!(
            "Cannot read pixel at ({}, {}): no screen on this platform",
            point.x,
            point.y
        ))
    }

    fn move_to(&self, point: ScreenPoint) -> Result<()> {
        Err(anyhow!(
            "Cannot move to ({}, {}): no input backend on this platform",
            point.x,
            point.y
        ))
    }

    fn mouse_down(&self, point: ScreenPoint) -> Result<()> {
        Err(anyhow!(
            "Cannot press at ({}, {}): no input backend on this platform",
            point.x,
            point.y
        ))
    }

    fn mouse_up(&self) -> Result<()> {
        Err(anyhow!("Cannot release: no input backend on this platform"))
    }

    fn click(&self, point: ScreenPoint) -> Result<()> {
        Err(anyhow!(
            "Cannot click at ({}, {}): no input backend on this platform",
            point.x,
            point.y
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_sees_nothing() {
        let desktop = HeadlessDesktop;
        let handle = WindowHandle(0x1234);
        assert!(desktop.visible_windows().is_empty());
        assert!(!desktop.is_window(handle));
        assert_eq!(
            desktop.client_rect(handle),
            Err(WindowError::Invalid { handle })
        );
        assert!(desktop.click(ScreenPoint::new(1, 1)).is_err());
        assert!(desktop.mouse_down(ScreenPoint::new(1, 1)).is_err());
        assert!(desktop.mouse_up().is_err());
    }
}
