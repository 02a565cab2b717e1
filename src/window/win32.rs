//! Win32 implementation of the desktop primitives.

use anyhow::{Result, anyhow};
use image::Rgb;
use std::ffi::{OsString, c_void};
use std::os::windows::ffi::OsStringExt;

use windows::Win32::Foundation::{BOOL, CloseHandle, HWND, LPARAM, POINT, RECT, TRUE};
use windows::Win32::Graphics::Gdi::{ClientToScreen, GetDC, GetPixel, ReleaseDC};
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION,
    QueryFullProcessImageNameW,
};
use windows::Win32::UI::Input::KeyboardAndMouse::{
    INPUT, INPUT_0, INPUT_MOUSE, MOUSE_EVENT_FLAGS, MOUSEEVENTF_ABSOLUTE, MOUSEEVENTF_LEFTDOWN,
    MOUSEEVENTF_LEFTUP, MOUSEEVENTF_MOVE, MOUSEEVENTF_VIRTUALDESK, MOUSEINPUT, SendInput,
};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetClientRect, GetCursorPos, GetSystemMetrics, GetWindowTextLengthW,
    GetWindowTextW, GetWindowThreadProcessId, IsWindow, IsWindowVisible, SM_CXVIRTUALSCREEN,
    SM_CYVIRTUALSCREEN, SM_XVIRTUALSCREEN, SM_YVIRTUALSCREEN,
};

use super::desktop::{Desktop, WindowHandle, WindowInfo, to_absolute_input};
use crate::error::WindowError;
use crate::geometry::{ClientRect, ScreenPoint};

/// GetPixel's failure value.
const CLR_INVALID: u32 = 0xFFFF_FFFF;

#[derive(Clone, Copy, Debug, Default)]
pub struct Win32Desktop;

fn to_hwnd(handle: WindowHandle) -> HWND {
    HWND(handle.0 as *mut c_void)
}

fn from_hwnd(hwnd: HWND) -> WindowHandle {
    WindowHandle(hwnd.0 as isize)
}

/// Reads a window title, or an empty string when it has none.
fn window_title(hwnd: HWND) -> String {
    unsafe {
        let title_len = GetWindowTextLengthW(hwnd);
        if title_len <= 0 {
            return String::new();
        }
        let mut title_buf: Vec<u16> = vec![0; (title_len + 1) as usize];
        let copied = GetWindowTextW(hwnd, &mut title_buf);
        let copied = copied.clamp(0, title_len) as usize;
        OsString::from_wide(&title_buf[..copied])
            .to_string_lossy()
            .to_string()
    }
}

/// Executable file name of the process owning `hwnd`, e.g. `WidgetInc.exe`.
fn process_name(hwnd: HWND) -> Option<String> {
    unsafe {
        let mut process_id: u32 = 0;
        GetWindowThreadProcessId(hwnd, Some(&mut process_id));
        if process_id == 0 {
            return None;
        }

        let process_handle =
            OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, process_id).ok()?;

        let mut name_buf: Vec<u16> = vec![0; 1024];
        let mut len = name_buf.len() as u32;
        let result = QueryFullProcessImageNameW(
            process_handle,
            PROCESS_NAME_WIN32,
            windows::core::PWSTR(name_buf.as_mut_ptr()),
            &mut len,
        );
        let _ = CloseHandle(process_handle);

        if result.is_err() || len == 0 {
            return None;
        }

        let full_path = OsString::from_wide(&name_buf[..len as usize])
            .to_string_lossy()
            .to_string();
        full_path.rsplit('\\').next().map(str::to_string)
    }
}

/// Bounds of the virtual desktop spanning every monitor.
fn virtual_screen() -> Result<ClientRect> {
    let screen = unsafe {
        ClientRect::new(
            GetSystemMetrics(SM_XVIRTUALSCREEN),
            GetSystemMetrics(SM_YVIRTUALSCREEN),
            GetSystemMetrics(SM_CXVIRTUALSCREEN),
            GetSystemMetrics(SM_CYVIRTUALSCREEN),
        )
    };
    if screen.is_empty() {
        return Err(anyhow!("GetSystemMetrics returned an empty virtual screen"));
    }
    Ok(screen)
}

/// Sends one absolute mouse event per flag set, all positioned at `point`.
fn send_mouse(point: ScreenPoint, events: &[MOUSE_EVENT_FLAGS]) -> Result<()> {
    let (dx, dy) = to_absolute_input(point, &virtual_screen()?);

    let inputs: Vec<INPUT> = events
        .iter()
        .map(|flags| INPUT {
            r#type: INPUT_MOUSE,
            Anonymous: INPUT_0 {
                mi: MOUSEINPUT {
                    dx,
                    dy,
                    dwFlags: *flags
                        | MOUSEEVENTF_ABSOLUTE
                        | MOUSEEVENTF_VIRTUALDESK
                        | MOUSEEVENTF_MOVE,
                    ..Default::default()
                },
            },
        })
        .collect();

    let sent = unsafe { SendInput(&inputs, std::mem::size_of::<INPUT>() as i32) };
    if sent as usize != inputs.len() {
        return Err(anyhow!(
            "SendInput delivered {} of {} events at ({}, {})",
            sent,
            inputs.len(),
            point.x,
            point.y
        ));
    }
    Ok(())
}

impl Desktop for Win32Desktop {
    fn visible_windows(&self) -> Vec<WindowInfo> {
        unsafe extern "system" fn enum_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
            unsafe {
                let windows = &mut *(lparam.0 as *mut Vec<WindowInfo>);

                if !IsWindowVisible(hwnd).as_bool() {
                    return TRUE;
                }

                // Untitled windows are never game windows
                let title = window_title(hwnd);
                if title.is_empty() {
                    return TRUE;
                }

                windows.push(WindowInfo {
                    handle: from_hwnd(hwnd),
                    title,
                    process_name: process_name(hwnd),
                });
                TRUE
            }
        }

        let mut windows: Vec<WindowInfo> = Vec::new();
        unsafe {
            if let Err(e) = EnumWindows(
                Some(enum_callback),
                LPARAM(&mut windows as *mut Vec<WindowInfo> as isize),
            ) {
                crate::log(&format!("EnumWindows failed: {}", e));
            }
        }
        windows
    }

    fn client_rect(&self, handle: WindowHandle) -> Result<ClientRect, WindowError> {
        let hwnd = to_hwnd(handle);
        let invalid = WindowError::Invalid { handle };

        if !self.is_window(handle) {
            return Err(invalid);
        }

        let mut rect = RECT::default();
        unsafe { GetClientRect(hwnd, &mut rect) }.map_err(|_| invalid.clone())?;

        // Client origin differs from the window origin by the frame thickness
        let mut origin = POINT { x: 0, y: 0 };
        if !unsafe { ClientToScreen(hwnd, &mut origin) }.as_bool() {
            return Err(invalid);
        }

        Ok(ClientRect::new(
            origin.x,
            origin.y,
            rect.right - rect.left,
            rect.bottom - rect.top,
        ))
    }

    fn is_window(&self, handle: WindowHandle) -> bool {
        unsafe { IsWindow(to_hwnd(handle)).as_bool() }
    }

    fn cursor_position(&self) -> Result<ScreenPoint> {
        let mut pt = POINT::default();
        unsafe {
            GetCursorPos(&mut pt)?;
        }
        Ok(ScreenPoint::new(pt.x, pt.y))
    }

    fn pixel(&self, point: ScreenPoint) -> Result<Rgb<u8>> {
        let desktop = HWND(std::ptr::null_mut());
        let color = unsafe {
            let hdc = GetDC(desktop);
            if hdc.0.is_null() {
                return Err(anyhow!("GetDC failed for the screen"));
            }
            let color = GetPixel(hdc, point.x, point.y);
            let _ = ReleaseDC(desktop, hdc);
            color
        };

        if color.0 == CLR_INVALID {
            return Err(anyhow!(
                "Pixel ({}, {}) is outside the screen",
                point.x,
                point.y
            ));
        }

        // COLORREF layout is 0x00BBGGRR
        let value = color.0;
        Ok(Rgb([
            (value & 0xFF) as u8,
            ((value >> 8) & 0xFF) as u8,
            ((value >> 16) & 0xFF) as u8,
        ]))
    }

    fn move_to(&self, point: ScreenPoint) -> Result<()> {
        send_mouse(point, &[MOUSE_EVENT_FLAGS(0)])
    }

    fn mouse_down(&self, point: ScreenPoint) -> Result<()> {
        send_mouse(point, &[MOUSE_EVENT_FLAGS(0), MOUSEEVENTF_LEFTDOWN])
    }

    fn mouse_up(&self) -> Result<()> {
        let input = INPUT {
            r#type: INPUT_MOUSE,
            Anonymous: INPUT_0 {
                mi: MOUSEINPUT {
                    dwFlags: MOUSEEVENTF_LEFTUP,
                    ..Default::default()
                },
            },
        };
        let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
        if sent != 1 {
            return Err(anyhow!("SendInput failed to release the left button"));
        }
        Ok(())
    }

    fn click(&self, point: ScreenPoint) -> Result<()> {
        send_mouse(
            point,
            &[MOUSE_EVENT_FLAGS(0), MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP],
        )
    }
}
