//! `GameWindow`: the integration point for automators.
//!
//! Ties the cached window lookup, client geometry and grid mapping together
//! so callers only deal in grid cells. Geometry is re-queried on every call;
//! only the handle is cached. A failed geometry query drops the cached handle
//! so the next call re-enumerates.

use anyhow::{Context, Result};
use image::Rgb;
use std::sync::Arc;
use std::time::Duration;

use crate::automation::{ButtonState, DEFAULT_TOLERANCE, StopFlag};
use crate::cache::{Clock, SystemClock};
use crate::config::HelperConfig;
use crate::error::WindowError;
use crate::frames::{FrameDef, ResolvedButton, ResolvedFrame, resolve_frame};
use crate::geometry::{self, ClientRect, GridPoint, PlayableArea, PlayablePosition, ScreenPoint};
use crate::window::{Desktop, WindowHandle, WindowLocator};

/// Pause between samples while waiting for a button to become active.
const CLICK_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Intermediate cursor moves per drag.
const DRAG_STEPS: u32 = 10;

/// The game window as seen by automators.
pub struct GameWindow<C: Clock = SystemClock> {
    desktop: Arc<dyn Desktop>,
    locator: WindowLocator<C>,
    title: String,
    tolerance: u8,
}

impl GameWindow<SystemClock> {
    /// Builds a game window tracker from configuration.
    pub fn from_config(desktop: Arc<dyn Desktop>, config: &HelperConfig) -> Self {
        let locator = WindowLocator::new(desktop.clone(), config.cache_ttl())
            .with_process_filter(&config.process_name);
        Self::with_locator(desktop, locator, &config.window_title)
            .with_tolerance(config.color_tolerance)
    }
}

impl<C: Clock> GameWindow<C> {
    pub fn with_locator(desktop: Arc<dyn Desktop>, locator: WindowLocator<C>, title: &str) -> Self {
        Self {
            desktop,
            locator,
            title: title.to_string(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Sets the per-channel tolerance used for button color checks.
    pub fn with_tolerance(mut self, tolerance: u8) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tolerance(&self) -> u8 {
        self.tolerance
    }

    pub fn resolve_window(&self) -> Result<WindowHandle, WindowError> {
        self.locator.resolve(&self.title)
    }

    /// Client area of the game window in screen coordinates.
    pub fn client_rect(&self) -> Result<ClientRect, WindowError> {
        let handle = self.resolve_window()?;
        self.desktop.client_rect(handle).inspect_err(|_| {
            crate::log(&format!(
                "Window {} for \"{}\" is gone; re-resolving on next call",
                handle, self.title
            ));
            self.locator.invalidate(&self.title);
        })
    }

    pub fn playable_area(&self) -> Result<PlayableArea, WindowError> {
        Ok(PlayableArea::compute(&self.client_rect()?))
    }

    /// Screen pixel at the center of a grid cell.
    pub fn grid_to_screen(&self, grid_x: i32, grid_y: i32) -> Result<ScreenPoint, WindowError> {
        let area = self.playable_area()?;
        Ok(geometry::grid_to_screen(grid_x, grid_y, &area))
    }

    pub fn screen_to_grid(&self, screen_x: i32, screen_y: i32) -> Result<GridPoint, WindowError> {
        let area = self.playable_area()?;
        Ok(geometry::screen_to_grid(screen_x, screen_y, &area))
    }

    pub fn resolve_frame(&self, frame: &FrameDef) -> Result<ResolvedFrame, WindowError> {
        let area = self.playable_area()?;
        Ok(resolve_frame(frame, &area))
    }

    /// Where the cursor sits in the playable area, or `None` outside it.
    pub fn cursor_position(&self) -> Result<Option<PlayablePosition>> {
        let area = self.playable_area()?;
        let cursor = self.desktop.cursor_position()?;
        Ok(geometry::locate_in_playable(cursor, &area))
    }

    pub fn pixel_at(&self, point: ScreenPoint) -> Result<Rgb<u8>> {
        self.desktop.pixel(point)
    }

    pub fn pixel_at_grid(&self, grid_x: i32, grid_y: i32) -> Result<Rgb<u8>> {
        let point = self.grid_to_screen(grid_x, grid_y)?;
        self.desktop
            .pixel(point)
            .with_context(|| format!("Failed to sample grid ({}, {})", grid_x, grid_y))
    }

    pub fn click(&self, point: ScreenPoint) -> Result<()> {
        self.desktop.click(point)
    }

    pub fn click_grid(&self, grid_x: i32, grid_y: i32) -> Result<()> {
        let point = self.grid_to_screen(grid_x, grid_y)?;
        self.desktop
            .click(point)
            .with_context(|| format!("Failed to click grid ({}, {})", grid_x, grid_y))
    }

    /// Samples a resolved button and reports which of its states is showing.
    pub fn button_state(&self, button: &ResolvedButton) -> Result<Option<ButtonState>> {
        let actual = self.desktop.pixel(button.screen)?;
        let state = button.color.classify(actual, self.tolerance);
        if state.is_none() {
            crate::log(&format!(
                "Button at ({}, {}) is not a {} button. Got: {:?}",
                button.screen.x, button.screen.y, button.color, actual.0
            ));
        }
        Ok(state)
    }

    /// True when the button shows its default or focused color.
    pub fn is_button_active(&self, button: &ResolvedButton) -> Result<bool> {
        Ok(self.button_state(button)?.is_some_and(ButtonState::is_active))
    }

    pub fn is_button_inactive(&self, button: &ResolvedButton) -> Result<bool> {
        Ok(self.button_state(button)? == Some(ButtonState::Inactive))
    }

    /// Clicks `button` once it shows an active state.
    ///
    /// Samples up to `retries` times, 100ms apart. Returns `false` without
    /// clicking when the button never became active or `stop` was requested.
    pub fn click_button(
        &self,
        button: &ResolvedButton,
        retries: u32,
        stop: &StopFlag,
    ) -> Result<bool> {
        for attempt in 1..=retries {
            if stop.is_stopped() {
                return Ok(false);
            }
            if self.is_button_active(button)? {
                self.desktop.click(button.screen).with_context(|| {
                    format!(
                        "Failed to click {} button at ({}, {})",
                        button.color, button.screen.x, button.screen.y
                    )
                })?;
                return Ok(true);
            }
            if attempt < retries && !stop.sleep(CLICK_RETRY_DELAY) {
                return Ok(false);
            }
        }

        crate::log(&format!(
            "{} button at grid ({}, {}) not active after {} attempts",
            button.color, button.grid.grid_x, button.grid.grid_y, retries
        ));
        Ok(false)
    }

    /// Clicks `button` without checking its state.
    pub fn force_click_button(&self, button: &ResolvedButton) -> Result<()> {
        self.desktop.click(button.screen)
    }

    /// Presses a grid cell for `duration`.
    ///
    /// Returns `false` if `stop` cut the hold short. The button is released
    /// on every path.
    pub fn hold_grid(
        &self,
        grid_x: i32,
        grid_y: i32,
        duration: Duration,
        stop: &StopFlag,
    ) -> Result<bool> {
        let point = self.grid_to_screen(grid_x, grid_y)?;
        self.hold_at(point, duration, stop)
    }

    /// Holds `button` for `duration` if it is active.
    ///
    /// Returns `false` when the button was not active or the hold was cut short.
    pub fn hold_button(
        &self,
        button: &ResolvedButton,
        duration: Duration,
        stop: &StopFlag,
    ) -> Result<bool> {
        if !self.is_button_active(button)? {
            crate::log(&format!(
                "{} button at grid ({}, {}) not active, not holding",
                button.color, button.grid.grid_x, button.grid.grid_y
            ));
            return Ok(false);
        }
        self.hold_at(button.screen, duration, stop)
    }

    fn hold_at(&self, point: ScreenPoint, duration: Duration, stop: &StopFlag) -> Result<bool> {
        let held = self
            .desktop
            .mouse_down(point)
            .map(|()| stop.sleep(duration));
        let released = self.desktop.mouse_up();

        let completed =
            held.with_context(|| format!("Failed to press at ({}, {})", point.x, point.y))?;
        released.context("Failed to release the mouse button")?;
        Ok(completed)
    }

    /// Drags from one grid cell to another over `duration`.
    ///
    /// The cursor moves in even steps so the game sees a continuous drag.
    /// Returns `false` if `stop` interrupted it. The button is released on
    /// every path.
    pub fn drag_grid(
        &self,
        from: (i32, i32),
        to: (i32, i32),
        duration: Duration,
        stop: &StopFlag,
    ) -> Result<bool> {
        let area = self.playable_area()?;
        let start = geometry::grid_to_screen(from.0, from.1, &area);
        let end = geometry::grid_to_screen(to.0, to.1, &area);

        let dragged = self
            .desktop
            .mouse_down(start)
            .and_then(|()| self.drag_steps(start, end, duration, stop));
        let released = self.desktop.mouse_up();

        let completed = dragged.with_context(|| {
            format!(
                "Failed to drag from grid ({}, {}) to ({}, {})",
                from.0, from.1, to.0, to.1
            )
        })?;
        released.context("Failed to release the mouse button")?;
        Ok(completed)
    }

    fn drag_steps(
        &self,
        start: ScreenPoint,
        end: ScreenPoint,
        duration: Duration,
        stop: &StopFlag,
    ) -> Result<bool> {
        let pause = duration / DRAG_STEPS;
        for step in 1..=DRAG_STEPS {
            if !stop.sleep(pause) {
                return Ok(false);
            }
            let t = step as f64 / DRAG_STEPS as f64;
            let lerp = |a: i32, b: i32| a + ((b - a) as f64 * t).round() as i32;
            let point = ScreenPoint::new(lerp(start.x, end.x), lerp(start.y, end.y));
            self.desktop.move_to(point)?;
        }
        Ok(true)
    }
}
