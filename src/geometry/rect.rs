//! Screen-space rectangles and the letterboxed playable area.

use serde::{Deserialize, Serialize};

/// An absolute screen position in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// The drawable area of a window, in absolute screen coordinates.
///
/// Excludes the title bar and borders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ClientRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the window has no drawable area (e.g. minimized).
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// The 3:2 region of the client area where the game renders.
///
/// Centered in the client rect; bars fill the remaining width or height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayableArea {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PlayableArea {
    /// Width over height of the game's render target.
    pub const ASPECT_RATIO: f64 = 3.0 / 2.0;

    /// Fits the largest centered 3:2 rectangle inside `client`.
    ///
    /// An empty client rect yields an all-zero area.
    pub fn compute(client: &ClientRect) -> Self {
        if client.is_empty() {
            return Self::default();
        }

        // Integer comparison of width/height against 3/2
        let (width, height) = (client.width as i64, client.height as i64);
        if width * 2 > height * 3 {
            // Wider than 3:2 - fit height, center horizontally
            let playable_width = (height * 3 / 2) as i32;
            Self {
                x: client.x + (client.width - playable_width) / 2,
                y: client.y,
                width: playable_width,
                height: client.height,
            }
        } else {
            // Taller than (or exactly) 3:2 - fit width, center vertically
            let playable_height = (width * 2 / 3) as i32;
            Self {
                x: client.x,
                y: client.y + (client.height - playable_height) / 2,
                width: client.width,
                height: playable_height,
            }
        }
    }

    /// True when there is nothing to map onto.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Whether `point` falls inside the area (right and bottom edges excluded).
    pub fn contains(&self, point: ScreenPoint) -> bool {
        !self.is_degenerate()
            && point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.x + self.width / 2, self.y + self.height / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_contained(area: &PlayableArea, client: &ClientRect) {
        assert!(area.x >= client.x, "{:?} not inside {:?}", area, client);
        assert!(area.y >= client.y, "{:?} not inside {:?}", area, client);
        assert!(area.x + area.width <= client.x + client.width);
        assert!(area.y + area.height <= client.y + client.height);
    }

    #[test]
    fn test_exact_ratio_is_unchanged() {
        let client = ClientRect::new(100, 50, 1800, 1200);
        let area = PlayableArea::compute(&client);
        assert_eq!(
            area,
            PlayableArea {
                x: 100,
                y: 50,
                width: 1800,
                height: 1200
            }
        );
    }

    #[test]
    fn test_wide_client_is_pillarboxed() {
        let client = ClientRect::new(0, 0, 2560, 1440);
        let area = PlayableArea::compute(&client);
        assert_eq!(
            area,
            PlayableArea {
                x: 200,
                y: 0,
                width: 2160,
                height: 1440
            }
        );
    }

    #[test]
    fn test_tall_client_is_letterboxed() {
        let client = ClientRect::new(-1920, 30, 1200, 1000);
        let area = PlayableArea::compute(&client);
        assert_eq!(
            area,
            PlayableArea {
                x: -1920,
                y: 130,
                width: 1200,
                height: 800
            }
        );
    }

    #[test]
    fn test_zero_sized_client_is_degenerate() {
        let area = PlayableArea::compute(&ClientRect::new(0, 0, 0, 500));
        assert_eq!(area, PlayableArea::default());
        assert!(area.is_degenerate());

        let area = PlayableArea::compute(&ClientRect::new(300, 300, 800, 0));
        assert_eq!(area, PlayableArea::default());
    }

    #[test]
    fn test_ratio_and_containment_across_sizes() {
        // Dimensions that divide evenly keep the ratio exact
        for &(w, h) in &[
            (1800, 1200),
            (2560, 1440),
            (1920, 1080),
            (1280, 1024),
            (3840, 1600),
            (900, 1600),
            (2054, 1369),
        ] {
            let client = ClientRect::new(37, -12, w, h);
            let area = PlayableArea::compute(&client);
            assert_contained(&area, &client);
            if area.width % 3 == 0 && area.height % 2 == 0 {
                let ratio = area.width as f64 / area.height as f64;
                assert!((ratio - 1.5).abs() < 1e-6, "{}x{} -> {:?}", w, h, area);
            }
        }
    }

    #[test]
    fn test_odd_sizes_stay_within_one_pixel() {
        for w in 300..340 {
            for h in 180..240 {
                let client = ClientRect::new(0, 0, w, h);
                let area = PlayableArea::compute(&client);
                assert_contained(&area, &client);
                let ideal_height = area.width as f64 / 1.5;
                assert!((area.height as f64 - ideal_height).abs() < 1.0 + 1e-9);
            }
        }
    }

    #[test]
    fn test_contains_excludes_far_edges() {
        let area = PlayableArea {
            x: 10,
            y: 20,
            width: 300,
            height: 200,
        };
        assert!(area.contains(ScreenPoint::new(10, 20)));
        assert!(area.contains(ScreenPoint::new(309, 219)));
        assert!(!area.contains(ScreenPoint::new(310, 100)));
        assert!(!area.contains(ScreenPoint::new(100, 220)));
        assert!(!area.contains(ScreenPoint::new(9, 100)));
        assert!(!PlayableArea::default().contains(ScreenPoint::new(0, 0)));
    }

    #[test]
    fn test_center() {
        let area = PlayableArea::compute(&ClientRect::new(0, 0, 2560, 1440));
        assert_eq!(area.center(), ScreenPoint::new(1280, 720));
    }
}
