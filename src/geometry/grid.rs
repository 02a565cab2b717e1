//! Conversion between the game's background pixel grid and screen pixels.
//!
//! The game draws its background on a fixed 192x128 grid scaled to fit the
//! playable area. Frame definitions are authored in grid cells, so one set of
//! coordinates works at every window size and position.

use serde::Serialize;

use super::rect::{PlayableArea, ScreenPoint};

/// Background grid cells horizontally.
pub const GRID_WIDTH: i32 = 192;
/// Background grid cells vertically.
pub const GRID_HEIGHT: i32 = 128;

/// A cell of the background grid. Always within `[0, 191] x [0, 127]` when
/// built by [`GridPoint::clamped`] or the mapping functions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct GridPoint {
    pub grid_x: i32,
    pub grid_y: i32,
}

impl GridPoint {
    /// Builds a grid point, clamping each axis to the nearest edge cell.
    pub fn clamped(grid_x: i32, grid_y: i32) -> Self {
        Self {
            grid_x: grid_x.clamp(0, GRID_WIDTH - 1),
            grid_y: grid_y.clamp(0, GRID_HEIGHT - 1),
        }
    }

    /// Whether the raw coordinates were already inside the grid.
    pub fn in_bounds(grid_x: i32, grid_y: i32) -> bool {
        (0..GRID_WIDTH).contains(&grid_x) && (0..GRID_HEIGHT).contains(&grid_y)
    }
}

/// Screen pixels per grid cell.
///
/// Uses the smaller axis so cells stay square when integer rounding nudges
/// the area off 3:2. Returns 0.0 for a degenerate area.
pub fn pixel_size(area: &PlayableArea) -> f64 {
    if area.is_degenerate() {
        return 0.0;
    }
    let size_x = area.width as f64 / GRID_WIDTH as f64;
    let size_y = area.height as f64 / GRID_HEIGHT as f64;
    size_x.min(size_y)
}

/// Maps a grid cell to the screen pixel at its center.
///
/// Out-of-range cells are clamped to the grid edge. A degenerate area maps
/// everything to `(0, 0)`.
pub fn grid_to_screen(grid_x: i32, grid_y: i32, area: &PlayableArea) -> ScreenPoint {
    if area.is_degenerate() {
        return ScreenPoint::default();
    }
    let cell = GridPoint::clamped(grid_x, grid_y);
    let size = pixel_size(area);
    ScreenPoint {
        x: area.x + ((cell.grid_x as f64 + 0.5) * size).floor() as i32,
        y: area.y + ((cell.grid_y as f64 + 0.5) * size).floor() as i32,
    }
}

/// Maps a screen pixel to the grid cell containing it, clamped to the grid.
///
/// A degenerate area maps everything to `(0, 0)`.
pub fn screen_to_grid(screen_x: i32, screen_y: i32, area: &PlayableArea) -> GridPoint {
    if area.is_degenerate() {
        return GridPoint::default();
    }
    let size = pixel_size(area);
    // i64 offsets: any i32 screen point minus the area origin fits
    let grid_x = ((screen_x as i64 - area.x as i64) as f64 / size).floor() as i32;
    let grid_y = ((screen_y as i64 - area.y as i64) as f64 / size).floor() as i32;
    GridPoint::clamped(grid_x, grid_y)
}

/// Where a screen point sits inside the playable area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PlayablePosition {
    pub grid: GridPoint,
    pub pixel_size: f64,
    /// Horizontal offset from the area's left edge, 0-100.
    pub x_percent: f64,
    /// Vertical offset from the area's top edge, 0-100.
    pub y_percent: f64,
}

/// Describes `point` relative to `area`, or `None` when it lies outside.
pub fn locate_in_playable(point: ScreenPoint, area: &PlayableArea) -> Option<PlayablePosition> {
    if !area.contains(point) {
        return None;
    }
    let rel_x = (point.x - area.x) as f64;
    let rel_y = (point.y - area.y) as f64;
    Some(PlayablePosition {
        grid: screen_to_grid(point.x, point.y, area),
        pixel_size: pixel_size(area),
        x_percent: rel_x / area.width as f64 * 100.0,
        y_percent: rel_y / area.height as f64 * 100.0,
    })
}
