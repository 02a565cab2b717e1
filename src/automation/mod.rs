//! Building blocks for frame automators.
//!
//! This module provides:
//! - Pixel color matching and button state classification
//! - A cooperative stop flag with interruptible sleep

pub mod color;
pub mod stop;

pub use color::{ButtonColor, ButtonState, DEFAULT_TOLERANCE, colors_match, matches_any};
pub use stop::StopFlag;
