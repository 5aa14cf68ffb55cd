//! Caves as they are authored: templates built from drawing objects or a
//! fixed map, and the cavesets that own them.
mod caveset;
mod map;
mod objects;
mod template;

pub use caveset::{CaveId, CaveSet};
pub use map::{CaveMap, WrapMode};
pub use objects::{
    CaveObject, FillEntry, LevelMask, MazeKind, ObjectId, StoredObject, MAX_FILL_ENTRIES,
};
pub use template::{
    CaveEffects, CaveTemplate, LevelParam, LevelParams, RandomFill, VisibleRegion,
    MAX_CAVE_SIZE, PROBABILITY_ONE,
};
