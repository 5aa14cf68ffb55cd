use super::template::CaveTemplate;
use crate::engine::{bake, EngineConfig};
use crate::error::BakeError;
use crate::replay::{Adler32, HighScoreTable};
use crate::types::Level;
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a cave in its caveset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CaveId(pub usize);

impl fmt::Display for CaveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cave {}", self.0 + 1)
    }
}

/// An ordered collection of caves and what they share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveSet {
    #[allow(missing_docs)]
    pub name: String,
    #[allow(missing_docs)]
    pub author: String,
    #[allow(missing_docs)]
    pub description: String,
    #[allow(missing_docs)]
    pub date: String,
    /// lives at the start of a game
    pub initial_lives: u32,
    /// lives never go above this
    pub maximum_lives: u32,
    /// a life is given every time the score passes a multiple of this
    pub bonus_life_score: u32,
    #[allow(missing_docs)]
    pub highscores: HighScoreTable,
    caves: Vec<CaveTemplate>,
    /// key value pairs a loader did not understand
    pub tags: FxHashMap<String, String>,
}

impl Default for CaveSet {
    fn default() -> Self {
        CaveSet {
            name: "New caveset".to_string(),
            author: String::new(),
            description: String::new(),
            date: String::new(),
            initial_lives: 3,
            maximum_lives: 9,
            bonus_life_score: 500,
            highscores: HighScoreTable::default(),
            caves: Vec::new(),
            tags: FxHashMap::default(),
        }
    }
}

impl CaveSet {
    #[allow(missing_docs)]
    pub fn new(name: &str) -> Self {
        CaveSet {
            name: name.to_string(),
            ..CaveSet::default()
        }
    }

    /// appends a cave, returning where it went
    pub fn add_cave(&mut self, cave: CaveTemplate) -> CaveId {
        self.caves.push(cave);
        CaveId(self.caves.len() - 1)
    }

    /// Removes a cave. The caves after it move one place forward.
    pub fn remove_cave(&mut self, id: CaveId) -> Option<CaveTemplate> {
        if id.0 < self.caves.len() {
            Some(self.caves.remove(id.0))
        } else {
            None
        }
    }

    /// moves a cave to another position, false when either is out of range
    pub fn move_cave(&mut self, id: CaveId, new_index: usize) -> bool {
        if id.0 >= self.caves.len() || new_index >= self.caves.len() {
            return false;
        }
        let cave = self.caves.remove(id.0);
        self.caves.insert(new_index, cave);
        true
    }

    #[allow(missing_docs)]
    pub fn cave(&self, id: CaveId) -> Option<&CaveTemplate> {
        self.caves.get(id.0)
    }

    #[allow(missing_docs)]
    pub fn cave_mut(&mut self, id: CaveId) -> Option<&mut CaveTemplate> {
        self.caves.get_mut(id.0)
    }

    /// the caves in playing order
    pub fn caves(&self) -> impl Iterator<Item = (CaveId, &CaveTemplate)> {
        self.caves.iter().enumerate().map(|(i, c)| (CaveId(i), c))
    }

    #[allow(missing_docs)]
    pub fn len(&self) -> usize {
        self.caves.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.caves.is_empty()
    }

    /// Checksum of the whole set: every cave baked on level 1 with seed 0,
    /// all cells fed in to one running checksum. Used to name highscore files.
    pub fn checksum(&self, config: &EngineConfig) -> Result<u32, BakeError> {
        let mut adler = Adler32::new();
        for cave in self.caves.iter() {
            let instance = bake(cave, Level::ONE, 0, config)?;
            adler.update_instance(&instance);
        }
        Ok(adler.finish())
    }
}
