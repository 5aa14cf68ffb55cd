//! The drawing objects a cave is built from.
use crate::element::Element;
use crate::error::TemplateError;
use crate::types::{Coordinate, Level, Vector, N_LEVELS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle of an object inside one template. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Set of levels an object is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LevelMask(u8);

impl LevelMask {
    /// drawn on every level
    pub const ALL: LevelMask = LevelMask((1 << N_LEVELS) - 1);

    /// a mask from bits, bit 0 being level 1. Bits above level 5 are dropped.
    pub fn from_bits(bits: u8) -> Self {
        LevelMask(bits & LevelMask::ALL.0)
    }

    /// a mask enabling exactly the given levels
    pub fn of(levels: &[Level]) -> Self {
        LevelMask(levels.iter().fold(0, |acc, l| acc | l.mask()))
    }

    #[allow(missing_docs)]
    pub fn bits(&self) -> u8 {
        self.0
    }

    #[allow(missing_docs)]
    pub fn contains(&self, level: Level) -> bool {
        self.0 & level.mask() != 0
    }
}

impl Default for LevelMask {
    fn default() -> Self {
        LevelMask::ALL
    }
}

/// Kind of maze to carve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MazeKind {
    /// a perfect maze, exactly one path between any two cells
    Perfect,
    /// a single path visiting every cell, made from a perfect maze of half the size
    Unicursal,
    /// a maze without dead ends
    Braid,
}

/// One (element, probability) pair of a random fill. The probability is out
/// of 256 and compared against bytes of the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillEntry {
    #[allow(missing_docs)]
    pub element: Element,
    #[allow(missing_docs)]
    pub probability: u8,
}

/// A drawing primitive. Coordinates are cave cells; corners may be given in
/// any order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum CaveObject {
    /// a single cell
    Point { pos: Coordinate, element: Element },
    /// a straight line, drawn with Bresenham's algorithm
    Line {
        from: Coordinate,
        to: Coordinate,
        element: Element,
    },
    /// outline of a rectangle
    Rectangle {
        corner1: Coordinate,
        corner2: Coordinate,
        element: Element,
    },
    /// a rectangle with a border and a different inside
    FilledRectangle {
        corner1: Coordinate,
        corner2: Coordinate,
        border: Element,
        fill: Element,
    },
    /// every `step`th cell of a rectangle
    Raster {
        corner1: Coordinate,
        corner2: Coordinate,
        step: Vector,
        element: Element,
    },
    /// puts `put` at `offset` from every `search`
    Join {
        offset: Vector,
        search: Element,
        put: Element,
        /// scan from the bottom right, so the new elements are not found again
        backwards: bool,
    },
    /// fills the area of connected `search` cells with `fill`
    FloodFillReplace {
        start: Coordinate,
        search: Element,
        fill: Element,
    },
    /// fills everything reachable from `start` without crossing `border`
    FloodFillBorder {
        start: Coordinate,
        border: Element,
        fill: Element,
    },
    /// a maze inside a rectangle
    Maze {
        corner1: Coordinate,
        corner2: Coordinate,
        kind: MazeKind,
        wall_width: i32,
        path_width: i32,
        wall: Element,
        path: Element,
        /// percentage of preferring horizontal passages, 50 is unbiased
        horizontal_percent: u8,
        /// seed per level, negative values take one from the run-time stream
        seeds: [i32; N_LEVELS],
    },
    /// random elements inside a rectangle, like the cave's own random fill
    RandomFill {
        corner1: Coordinate,
        corner2: Coordinate,
        seeds: [i32; N_LEVELS],
        initial: Element,
        entries: Vec<FillEntry>,
        /// only cells holding this element are overwritten
        replace_only: Option<Element>,
    },
    /// copies a rectangle to another place, optionally mirrored and flipped
    CopyPaste {
        corner1: Coordinate,
        corner2: Coordinate,
        dest: Coordinate,
        mirror: bool,
        flip: bool,
    },
}

/// at most this many entries in a random fill
pub const MAX_FILL_ENTRIES: usize = 4;

impl CaveObject {
    /// short name, used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            CaveObject::Point { .. } => "point",
            CaveObject::Line { .. } => "line",
            CaveObject::Rectangle { .. } => "rectangle",
            CaveObject::FilledRectangle { .. } => "filled rectangle",
            CaveObject::Raster { .. } => "raster",
            CaveObject::Join { .. } => "join",
            CaveObject::FloodFillReplace { .. } => "flood fill",
            CaveObject::FloodFillBorder { .. } => "flood fill border",
            CaveObject::Maze { .. } => "maze",
            CaveObject::RandomFill { .. } => "random fill",
            CaveObject::CopyPaste { .. } => "copy and paste",
        }
    }

    fn invalid(&self, reason: &'static str) -> TemplateError {
        TemplateError::InvalidObject {
            object: self.name(),
            reason,
        }
    }

    /// Checks parameters that cannot be drawn. Positions outside the cave are
    /// fine, they are clipped while drawing.
    pub fn validate(&self) -> Result<(), TemplateError> {
        match self {
            CaveObject::Raster { step, .. } => {
                if step.x <= 0 || step.y <= 0 {
                    return Err(self.invalid("raster distance must be positive"));
                }
            }
            CaveObject::Join { offset, .. } => {
                if offset.x == 0 && offset.y == 0 {
                    return Err(self.invalid("join distance must not be zero"));
                }
            }
            CaveObject::Maze {
                wall_width,
                path_width,
                horizontal_percent,
                ..
            } => {
                if *wall_width <= 0 || *path_width <= 0 {
                    return Err(self.invalid("wall and path width must be positive"));
                }
                if *horizontal_percent > 100 {
                    return Err(self.invalid("horizontal percentage above 100"));
                }
            }
            CaveObject::RandomFill { entries, .. } => {
                if entries.len() > MAX_FILL_ENTRIES {
                    return Err(self.invalid("at most four random elements"));
                }
            }
            CaveObject::FloodFillReplace { search, fill, .. } => {
                if search == fill {
                    return Err(self.invalid("search and fill element are the same"));
                }
            }
            CaveObject::FloodFillBorder { border, fill, .. } => {
                if border == fill {
                    return Err(self.invalid("border and fill element are the same"));
                }
            }
            CaveObject::Point { .. }
            | CaveObject::Line { .. }
            | CaveObject::Rectangle { .. }
            | CaveObject::FilledRectangle { .. }
            | CaveObject::CopyPaste { .. } => {}
        }
        Ok(())
    }
}

/// An object as stored in a template: its handle, the levels it is drawn on
/// and the object itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObject {
    #[allow(missing_docs)]
    pub id: ObjectId,
    #[allow(missing_docs)]
    #[serde(default)]
    pub levels: LevelMask,
    #[allow(missing_docs)]
    pub object: CaveObject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mask() {
        let mask = LevelMask::of(&[Level::ONE, Level::new(3).unwrap()]);
        assert_eq!(mask.bits(), 0b101);
        assert!(mask.contains(Level::ONE));
        assert!(!mask.contains(Level::new(2).unwrap()));
        assert_eq!(LevelMask::from_bits(0xff), LevelMask::ALL);
    }

    #[test]
    fn test_zero_raster_is_invalid() {
        let raster = CaveObject::Raster {
            corner1: Coordinate::new(1, 1),
            corner2: Coordinate::new(5, 5),
            step: Vector { x: 0, y: 2 },
            element: Element::Stone,
        };
        assert!(matches!(
            raster.validate(),
            Err(TemplateError::InvalidObject {
                object: "raster",
                ..
            })
        ));
    }

    #[test]
    fn test_maze_widths() {
        let maze = CaveObject::Maze {
            corner1: Coordinate::new(1, 1),
            corner2: Coordinate::new(10, 10),
            kind: MazeKind::Braid,
            wall_width: 1,
            path_width: 0,
            wall: Element::Brick,
            path: Element::Space,
            horizontal_percent: 50,
            seeds: [0; N_LEVELS],
        };
        assert!(maze.validate().is_err());
    }
}
