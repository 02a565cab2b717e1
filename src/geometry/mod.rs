//! Coordinate spaces and the conversions between them.
//!
//! This module provides:
//! - Client and playable area rectangles (`PlayableArea::compute`)
//! - Grid <-> screen mapping (`grid_to_screen`, `screen_to_grid`)

pub mod grid;
pub mod rect;

pub use grid::{
    GRID_HEIGHT, GRID_WIDTH, GridPoint, PlayablePosition, grid_to_screen, locate_in_playable,
    pixel_size, screen_to_grid,
};
pub use rect::{ClientRect, PlayableArea, ScreenPoint};
