//! Frame database loading and validation.
//!
//! The database is hand-authored JSON describing each minigame frame:
//!
//! ```json
//! { "frames": [ {
//!     "id": "4.3", "name": "Ore Miner",
//!     "interactions": { "ore": [96, 64], "path": [[10, 10], [20, 10]] },
//!     "buttons": { "mine": [150, 110, "green"] },
//!     "colors": { "ore": [120, 80, 40], "glow": [[1, 2, 3], [4, 5, 6]] },
//!     "bbox": { "field": [20, 20, 170, 100] }
//! } ] }
//! ```
//!
//! All coordinates are background grid cells. Structural problems are reported
//! when the file is loaded rather than inside an automator loop.

use image::Rgb;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use crate::automation::ButtonColor;
use crate::error::FrameDbError;
use crate::geometry::GridPoint;

/// One grid point or an ordered list of them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointSet {
    Single([i32; 2]),
    Many(Vec<[i32; 2]>),
}

impl PointSet {
    pub fn points(&self) -> Vec<[i32; 2]> {
        match self {
            Self::Single(point) => vec![*point],
            Self::Many(points) => points.clone(),
        }
    }
}

/// One RGB color or a list of acceptable colors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSet {
    Single([u8; 3]),
    Many(Vec<[u8; 3]>),
}

impl ColorSet {
    pub fn colors(&self) -> Vec<Rgb<u8>> {
        match self {
            Self::Single(rgb) => vec![Rgb(*rgb)],
            Self::Many(rgbs) => rgbs.iter().map(|rgb| Rgb(*rgb)).collect(),
        }
    }
}

/// A clickable button: grid position and base color, stored as `[x, y, "color"]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonDef(pub i32, pub i32, pub ButtonColor);

impl ButtonDef {
    pub fn x(&self) -> i32 {
        self.0
    }

    pub fn y(&self) -> i32 {
        self.1
    }

    pub fn color(&self) -> ButtonColor {
        self.2
    }
}

/// A grid-aligned box, stored as `[x1, y1, x2, y2]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxDef(pub i32, pub i32, pub i32, pub i32);

/// One minigame screen.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameDef {
    /// Tier identifier such as "4.3"
    pub id: String,
    pub name: String,
    /// Item the frame produces, when relevant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default)]
    pub interactions: BTreeMap<String, PointSet>,
    #[serde(default)]
    pub buttons: BTreeMap<String, ButtonDef>,
    #[serde(default)]
    pub colors: BTreeMap<String, ColorSet>,
    #[serde(default)]
    pub bbox: BTreeMap<String, BoxDef>,
}

impl FrameDef {
    /// Checks the invariants serde cannot express.
    fn validate(&self) -> Result<(), FrameDbError> {
        let invalid = |reason: String| FrameDbError::Invalid {
            frame: self.id.clone(),
            reason,
        };

        if self.id.trim().is_empty() {
            return Err(FrameDbError::Invalid {
                frame: self.name.clone(),
                reason: "empty id".to_string(),
            });
        }
        if self.name.trim().is_empty() {
            return Err(invalid("empty name".to_string()));
        }

        for (name, points) in &self.interactions {
            if let PointSet::Many(list) = points {
                if list.is_empty() {
                    return Err(invalid(format!("interaction \"{}\" has no points", name)));
                }
            }
        }
        for (name, colors) in &self.colors {
            if let ColorSet::Many(list) = colors {
                if list.is_empty() {
                    return Err(invalid(format!("color \"{}\" has no values", name)));
                }
            }
        }
        for (name, BoxDef(x1, y1, x2, y2)) in &self.bbox {
            if x1 > x2 || y1 > y2 {
                return Err(invalid(format!(
                    "bbox \"{}\" corners are not ordered: [{}, {}, {}, {}]",
                    name, x1, y1, x2, y2
                )));
            }
        }
        Ok(())
    }

    /// Every authored coordinate outside the grid, labelled by entry name.
    ///
    /// These still map (clamped to the grid edge) but usually indicate an
    /// authoring mistake.
    pub fn out_of_grid_points(&self) -> Vec<(String, [i32; 2])> {
        let mut found = Vec::new();
        let mut check = |label: &str, x: i32, y: i32| {
            if !GridPoint::in_bounds(x, y) {
                found.push((label.to_string(), [x, y]));
            }
        };

        for (name, points) in &self.interactions {
            for [x, y] in points.points() {
                check(name.as_str(), x, y);
            }
        }
        for (name, button) in &self.buttons {
            check(name.as_str(), button.x(), button.y());
        }
        for (name, BoxDef(x1, y1, x2, y2)) in &self.bbox {
            check(name.as_str(), *x1, *y1);
            check(name.as_str(), *x2, *y2);
        }
        found
    }

    pub fn button(&self, name: &str) -> Option<&ButtonDef> {
        self.buttons.get(name)
    }

    pub fn color(&self, name: &str) -> Option<Vec<Rgb<u8>>> {
        self.colors.get(name).map(ColorSet::colors)
    }
}

/// The loaded, validated set of frames.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameDatabase {
    frames: Vec<FrameDef>,
}

impl FrameDatabase {
    /// Reads and validates the database at `path`.
    pub fn load(path: &Path) -> Result<Self, FrameDbError> {
        let contents = fs::read_to_string(path).map_err(|source| FrameDbError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self::from_json(&contents)?;
        crate::log(&format!(
            "Loaded {} frames from {}",
            db.frames.len(),
            path.display()
        ));
        Ok(db)
    }

    /// Parses and validates a database from JSON text.
    pub fn from_json(json: &str) -> Result<Self, FrameDbError> {
        let db: FrameDatabase = serde_json::from_str(json)?;
        db.validate()?;
        Ok(db)
    }

    fn validate(&self) -> Result<(), FrameDbError> {
        let mut seen = HashSet::new();
        for frame in &self.frames {
            frame.validate()?;
            if !seen.insert(frame.id.as_str()) {
                return Err(FrameDbError::DuplicateId(frame.id.clone()));
            }
            for (label, [x, y]) in frame.out_of_grid_points() {
                crate::log(&format!(
                    "Warning: frame {} \"{}\" point ({}, {}) is outside the grid and will be clamped",
                    frame.id, label, x, y
                ));
            }
        }
        Ok(())
    }

    pub fn frames(&self) -> &[FrameDef] {
        &self.frames
    }

    pub fn frame(&self, id: &str) -> Option<&FrameDef> {
        self.frames.iter().find(|frame| frame.id == id)
    }

    pub fn frame_by_name(&self, name: &str) -> Option<&FrameDef> {
        self.frames.iter().find(|frame| frame.name == name)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    pub(crate) const SAMPLE_DB: &str = r#"{
        "frames": [
            {
                "id": "4.3",
                "name": "Ore Miner",
                "item": "Ore",
                "interactions": {
                    "ore": [96, 64],
                    "path": [[0, 0], [191, 127]]
                },
                "buttons": { "mine": [150, 110, "green"] },
                "colors": {
                    "ore": [120, 80, 40],
                    "glow": [[1, 2, 3], [4, 5, 6]]
                },
                "bbox": { "field": [20, 20, 170, 100] }
            },
            { "id": "1.1", "name": "Empty Frame" }
        ]
    }"#;

    fn create_test_db(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_sample_database() {
        let file = create_test_db(SAMPLE_DB);
        let db = FrameDatabase::load(file.path()).unwrap();

        assert_eq!(db.len(), 2);
        let frame = db.frame("4.3").unwrap();
        assert_eq!(frame.name, "Ore Miner");
        assert_eq!(frame.item.as_deref(), Some("Ore"));
        assert_eq!(frame.interactions["ore"], PointSet::Single([96, 64]));
        assert_eq!(
            frame.interactions["path"].points(),
            vec![[0, 0], [191, 127]]
        );
        assert_eq!(
            frame.button("mine"),
            Some(&ButtonDef(150, 110, ButtonColor::Green))
        );
        assert_eq!(frame.color("ore"), Some(vec![Rgb([120, 80, 40])]));
        assert_eq!(frame.color("glow").unwrap().len(), 2);
        assert_eq!(frame.bbox["field"], BoxDef(20, 20, 170, 100));
    }

    #[test]
    fn test_optional_sections_default_to_empty() {
        let db = FrameDatabase::from_json(SAMPLE_DB).unwrap();
        let frame = db.frame_by_name("Empty Frame").unwrap();
        assert_eq!(frame.id, "1.1");
        assert!(frame.interactions.is_empty());
        assert!(frame.buttons.is_empty());
        assert!(frame.item.is_none());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = FrameDatabase::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, FrameDbError::Io { .. }));
    }

    #[test]
    fn test_missing_name_is_parse_error() {
        let err = FrameDatabase::from_json(r#"{ "frames": [ { "id": "1.1" } ] }"#).unwrap_err();
        assert!(matches!(err, FrameDbError::Parse(_)));
    }

    #[test]
    fn test_unknown_button_color_is_rejected() {
        let json = r#"{ "frames": [ { "id": "1.1", "name": "A",
            "buttons": { "go": [1, 2, "purple"] } } ] }"#;
        assert!(matches!(
            FrameDatabase::from_json(json),
            Err(FrameDbError::Parse(_))
        ));
    }

    #[test]
    fn test_button_without_color_is_rejected() {
        let json = r#"{ "frames": [ { "id": "1.1", "name": "A",
            "buttons": { "go": [1, 2] } } ] }"#;
        assert!(FrameDatabase::from_json(json).is_err());
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let json = r#"{ "frames": [
            { "id": "2.1", "name": "A" },
            { "id": "2.1", "name": "B" }
        ] }"#;
        match FrameDatabase::from_json(json) {
            Err(FrameDbError::DuplicateId(id)) => assert_eq!(id, "2.1"),
            other => panic!("expected duplicate id, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_id_is_rejected() {
        let json = r#"{ "frames": [ { "id": " ", "name": "A" } ] }"#;
        assert!(matches!(
            FrameDatabase::from_json(json),
            Err(FrameDbError::Invalid { .. })
        ));
    }

    #[test]
    fn test_unordered_bbox_is_rejected() {
        let json = r#"{ "frames": [ { "id": "3.2", "name": "A",
            "bbox": { "field": [100, 20, 10, 80] } } ] }"#;
        match FrameDatabase::from_json(json) {
            Err(FrameDbError::Invalid { frame, reason }) => {
                assert_eq!(frame, "3.2");
                assert!(reason.contains("field"));
            }
            other => panic!("expected invalid bbox, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_point_list_is_rejected() {
        let json = r#"{ "frames": [ { "id": "3.2", "name": "A",
            "interactions": { "path": [] } } ] }"#;
        assert!(matches!(
            FrameDatabase::from_json(json),
            Err(FrameDbError::Invalid { .. })
        ));
    }

    #[test]
    fn test_out_of_grid_points_load_but_are_reported() {
        let json = r#"{ "frames": [ { "id": "5.1", "name": "A",
            "interactions": { "edge": [200, 64] },
            "buttons": { "go": [-1, 5, "red"] } } ] }"#;
        let db = FrameDatabase::from_json(json).unwrap();
        let mut reported = db.frame("5.1").unwrap().out_of_grid_points();
        reported.sort();
        assert_eq!(
            reported,
            vec![
                ("edge".to_string(), [200, 64]),
                ("go".to_string(), [-1, 5])
            ]
        );
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let json = r#"{ "frames": [ { "id": "6.1", "name": "A", "notes": "wip" } ] }"#;
        assert_eq!(FrameDatabase::from_json(json).unwrap().len(), 1);
    }
}
