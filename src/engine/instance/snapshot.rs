use crate::element::Element;
use crate::types::Direction;
use serde::{Deserialize, Serialize};

use super::{CaveInstance, Phase, PlayerState};

/// Everything that decides how a cave continues, copied out of an instance.
/// Two instances that will behave the same from now on have equal snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSnapshot {
    #[allow(missing_docs)]
    pub frame: u32,
    #[allow(missing_docs)]
    pub phase: Phase,
    #[allow(missing_docs)]
    pub player_state: PlayerState,
    #[allow(missing_docs)]
    pub width: i32,
    #[allow(missing_docs)]
    pub height: i32,
    /// elements in scan order
    pub cells: Vec<Element>,
    #[allow(missing_docs)]
    pub score: u32,
    /// time left in game units
    pub time: i32,
    #[allow(missing_docs)]
    pub diamonds_collected: u32,
    #[allow(missing_docs)]
    pub diamonds_needed: u32,
    #[allow(missing_docs)]
    pub gravity: Direction,
    /// position of the run-time random stream
    pub rng_word_pos: u128,
    /// state of the generator slime uses
    pub c64_rng: (u8, u8),
}

impl CaveInstance {
    /// copies out the state of the instance
    pub fn snapshot(&self) -> InstanceSnapshot {
        InstanceSnapshot {
            frame: self.frame,
            phase: self.phase,
            player_state: self.player_state,
            width: self.map.width(),
            height: self.map.height(),
            cells: self.map.iter().map(|cell| cell.element).collect(),
            score: self.score,
            time: self.time,
            diamonds_collected: self.diamonds_collected,
            diamonds_needed: self.diamonds_needed,
            gravity: self.switches.gravity,
            rng_word_pos: self.rng.get_word_pos(),
            c64_rng: self.c64_rng.seeds(),
        }
    }
}

impl InstanceSnapshot {
    /// the element at a position, `None` outside the map
    pub fn element_at(&self, x: i32, y: i32) -> Option<Element> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get((y * self.width + x) as usize).copied()
    }
}
