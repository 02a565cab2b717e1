//! Pixel color comparison and game button states.

use image::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-channel difference accepted as the same color.
pub const DEFAULT_TOLERANCE: u8 = 5;

/// True when every channel of `actual` is within `tolerance` of `expected`.
pub fn colors_match(actual: Rgb<u8>, expected: Rgb<u8>, tolerance: u8) -> bool {
    actual
        .0
        .iter()
        .zip(expected.0.iter())
        .all(|(a, e)| a.abs_diff(*e) <= tolerance)
}

/// True when `actual` matches any of `candidates`.
pub fn matches_any(actual: Rgb<u8>, candidates: &[Rgb<u8>], tolerance: u8) -> bool {
    candidates
        .iter()
        .any(|expected| colors_match(actual, *expected, tolerance))
}

/// Base color of an in-game button, as named in the frame database.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonColor {
    Red,
    Blue,
    Green,
    Yellow,
}

/// Visual state of a button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonState {
    Default,
    /// Hovered
    Focus,
    /// Greyed out, clicking does nothing
    Inactive,
}

impl ButtonState {
    pub const ALL: [ButtonState; 3] = [Self::Default, Self::Focus, Self::Inactive];

    /// Default and focused buttons accept clicks.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Default | Self::Focus)
    }
}

impl ButtonColor {
    /// Color sampled at the button center in the given state.
    pub fn state_color(self, state: ButtonState) -> Rgb<u8> {
        let rgb = match (self, state) {
            (Self::Red, ButtonState::Default) => [199, 35, 21],
            (Self::Red, ButtonState::Focus) => [251, 36, 18],
            (Self::Red, ButtonState::Inactive) => [57, 23, 20],
            (Self::Blue, ButtonState::Default) => [21, 87, 199],
            (Self::Blue, ButtonState::Focus) => [18, 104, 251],
            (Self::Blue, ButtonState::Inactive) => [20, 34, 57],
            (Self::Green, ButtonState::Default) => [17, 162, 40],
            (Self::Green, ButtonState::Focus) => [15, 204, 45],
            (Self::Green, ButtonState::Inactive) => [16, 46, 22],
            (Self::Yellow, ButtonState::Default) => [242, 151, 0],
            (Self::Yellow, ButtonState::Focus) => [198, 125, 0],
            (Self::Yellow, ButtonState::Inactive) => [60, 39, 8],
        };
        Rgb(rgb)
    }

    /// Identifies which state of this button `actual` shows, if any.
    pub fn classify(self, actual: Rgb<u8>, tolerance: u8) -> Option<ButtonState> {
        ButtonState::ALL
            .into_iter()
            .find(|state| colors_match(actual, self.state_color(*state), tolerance))
    }

    /// True when `actual` is any state of this button.
    pub fn is_present(self, actual: Rgb<u8>, tolerance: u8) -> bool {
        self.classify(actual, tolerance).is_some()
    }
}

impl fmt::Display for ButtonColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
        };
        f.write_str(name)
    }
}
