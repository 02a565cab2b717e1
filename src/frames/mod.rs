//! Frame definitions authored in grid coordinates.
//!
//! This module provides:
//! - Read-only loading and validation of the frame database
//! - Resolution of a frame's points, buttons and boxes to screen coordinates

pub mod database;
pub mod resolve;

pub use database::{BoxDef, ButtonDef, ColorSet, FrameDatabase, FrameDef, PointSet};
pub use resolve::{ResolvedButton, ResolvedFrame, ScreenBox, resolve_frame};
