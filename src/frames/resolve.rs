//! Converts a frame's grid coordinates into screen coordinates for one
//! playable area.

use image::Rgb;
use std::collections::BTreeMap;

use super::database::{BoxDef, FrameDef};
use crate::automation::ButtonColor;
use crate::geometry::{GridPoint, PlayableArea, ScreenPoint, grid_to_screen};

/// A button located on screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedButton {
    pub grid: GridPoint,
    pub screen: ScreenPoint,
    pub color: ButtonColor,
}

/// Screen-space corners of a grid box, both at cell centers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenBox {
    pub top_left: ScreenPoint,
    pub bottom_right: ScreenPoint,
}

impl ScreenBox {
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.top_left.x
            && point.y >= self.top_left.y
            && point.x <= self.bottom_right.x
            && point.y <= self.bottom_right.y
    }
}

/// A frame with every coordinate resolved against one playable area.
///
/// Stale once the window moves or resizes; resolve again from the definition.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedFrame {
    pub id: String,
    pub name: String,
    pub playable_area: PlayableArea,
    pub interactions: BTreeMap<String, Vec<ScreenPoint>>,
    pub buttons: BTreeMap<String, ResolvedButton>,
    pub colors: BTreeMap<String, Vec<Rgb<u8>>>,
    pub bbox: BTreeMap<String, ScreenBox>,
}

impl ResolvedFrame {
    /// First (or only) point of an interaction.
    pub fn interaction(&self, name: &str) -> Option<ScreenPoint> {
        self.interactions
            .get(name)
            .and_then(|points| points.first().copied())
    }

    pub fn interaction_path(&self, name: &str) -> Option<&[ScreenPoint]> {
        self.interactions.get(name).map(Vec::as_slice)
    }

    pub fn button(&self, name: &str) -> Option<&ResolvedButton> {
        self.buttons.get(name)
    }

    pub fn color(&self, name: &str) -> Option<&[Rgb<u8>]> {
        self.colors.get(name).map(Vec::as_slice)
    }
}

/// Maps every coordinate of `frame` onto `area`.
pub fn resolve_frame(frame: &FrameDef, area: &PlayableArea) -> ResolvedFrame {
    let interactions = frame
        .interactions
        .iter()
        .map(|(name, points)| {
            let screen = points
                .points()
                .into_iter()
                .map(|[x, y]| grid_to_screen(x, y, area))
                .collect();
            (name.clone(), screen)
        })
        .collect();

    let buttons = frame
        .buttons
        .iter()
        .map(|(name, button)| {
            let resolved = ResolvedButton {
                grid: GridPoint::clamped(button.x(), button.y()),
                screen: grid_to_screen(button.x(), button.y(), area),
                color: button.color(),
            };
            (name.clone(), resolved)
        })
        .collect();

    let colors = frame
        .colors
        .iter()
        .map(|(name, colors)| (name.clone(), colors.colors()))
        .collect();

    let bbox = frame
        .bbox
        .iter()
        .map(|(name, BoxDef(x1, y1, x2, y2))| {
            let screen_box = ScreenBox {
                top_left: grid_to_screen(*x1, *y1, area),
                bottom_right: grid_to_screen(*x2, *y2, area),
            };
            (name.clone(), screen_box)
        })
        .collect();

    ResolvedFrame {
        id: frame.id.clone(),
        name: frame.name.clone(),
        playable_area: *area,
        interactions,
        buttons,
        colors,
        bbox,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frames::FrameDatabase;
    use crate::frames::database::tests::SAMPLE_DB;
    use crate::geometry::ClientRect;

    fn area() -> PlayableArea {
        PlayableArea::compute(&ClientRect::new(100, 50, 1800, 1200))
    }

    #[test]
    fn test_resolve_sample_frame() {
        let db = FrameDatabase::from_json(SAMPLE_DB).unwrap();
        let frame = resolve_frame(db.frame("4.3").unwrap(), &area());

        assert_eq!(frame.id, "4.3");
        assert_eq!(frame.interaction("ore"), Some(ScreenPoint::new(1004, 654)));
        assert_eq!(
            frame.interaction_path("path").unwrap(),
            &[
                grid_to_screen(0, 0, &area()),
                grid_to_screen(191, 127, &area())
            ]
        );

        let mine = frame.button("mine").unwrap();
        assert_eq!(mine.color, ButtonColor::Green);
        assert_eq!(
            mine.grid,
            GridPoint {
                grid_x: 150,
                grid_y: 110
            }
        );
        assert_eq!(mine.screen, grid_to_screen(150, 110, &area()));

        assert_eq!(frame.color("ore"), Some(&[Rgb([120, 80, 40])][..]));

        let field = frame.bbox["field"];
        assert!(field.contains(ScreenPoint::new(1004, 654)));
        assert!(!field.contains(ScreenPoint::new(110, 60)));
    }

    #[test]
    fn test_out_of_grid_button_is_clamped() {
        let json = r#"{ "frames": [ { "id": "5.1", "name": "A",
            "buttons": { "go": [250, -3, "red"] } } ] }"#;
        let db = FrameDatabase::from_json(json).unwrap();
        let frame = resolve_frame(db.frame("5.1").unwrap(), &area());

        let go = frame.button("go").unwrap();
        assert_eq!(
            go.grid,
            GridPoint {
                grid_x: 191,
                grid_y: 0
            }
        );
        assert_eq!(go.screen, grid_to_screen(191, 0, &area()));
    }

    #[test]
    fn test_degenerate_area_resolves_to_origin() {
        let db = FrameDatabase::from_json(SAMPLE_DB).unwrap();
        let frame = resolve_frame(db.frame("4.3").unwrap(), &PlayableArea::default());
        assert_eq!(frame.interaction("ore"), Some(ScreenPoint::default()));
        assert!(frame.interaction("missing").is_none());
    }
}
