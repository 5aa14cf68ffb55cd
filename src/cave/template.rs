use super::map::CaveMap;
use super::objects::{CaveObject, LevelMask, ObjectId, StoredObject};
use crate::element::{Element, ExplosionKind};
use crate::error::TemplateError;
use crate::replay::{HighScoreTable, Replay};
use crate::types::{Coordinate, Direction, Level, N_LEVELS};
use fxhash::FxHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// probabilities are stored in millionths
pub const PROBABILITY_ONE: i32 = 1_000_000;

/// largest width or height a cave may have
pub const MAX_CAVE_SIZE: i32 = 1024;

fn dimensions_valid(width: i32, height: i32) -> bool {
    (1..=MAX_CAVE_SIZE).contains(&width) && (1..=MAX_CAVE_SIZE).contains(&height)
}

/// The part of the cave shown on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct VisibleRegion {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl VisibleRegion {
    /// the region clamped in to a map of the given size, corners ordered
    pub fn clamped(&self, width: i32, height: i32) -> VisibleRegion {
        let clamp_x = |x: i32| x.max(0).min(width - 1);
        let clamp_y = |y: i32| y.max(0).min(height - 1);
        VisibleRegion {
            x1: clamp_x(self.x1.min(self.x2)),
            y1: clamp_y(self.y1.min(self.y2)),
            x2: clamp_x(self.x1.max(self.x2)),
            y2: clamp_y(self.y1.max(self.y2)),
        }
    }
}

/// Parameters a cave has one value of per difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LevelParam {
    /// seconds to finish the cave
    Time,
    /// diamonds to collect; zero or less means all diamonds on the map plus this
    DiamondsNeeded,
    /// score of a diamond before the exit opens
    DiamondValue,
    /// score of a diamond after the exit opened
    ExtraDiamondValue,
    /// score of every second left when exiting
    TimeValue,
    /// length of a frame in milliseconds
    Speed,
    /// frame length of the C64 engines, in their own units
    C64Timing,
    /// seed of the random fill, negative for the run-time stream
    RandomSeed,
    /// seconds the magic wall stays active
    MagicWallTime,
    /// seconds of slow amoeba growth
    AmoebaTime,
    /// amoeba size at which it turns in to stones
    AmoebaThreshold,
    #[allow(missing_docs)]
    Amoeba2Time,
    #[allow(missing_docs)]
    Amoeba2Threshold,
    /// chance of things passing slime, in millionths
    SlimePermeability,
    /// bit mask for slime in the C64 engines
    SlimePermeabilityC64,
    /// seed for predictable slime, negative for none
    SlimeSeedC64,
    /// frames before the inbox hatches
    HatchingDelay,
    /// seconds a clock gives
    BonusTime,
    /// seconds a time penalty takes
    PenaltyTime,
}

impl LevelParam {
    #[allow(missing_docs)]
    pub const ALL: [LevelParam; 19] = [
        LevelParam::Time,
        LevelParam::DiamondsNeeded,
        LevelParam::DiamondValue,
        LevelParam::ExtraDiamondValue,
        LevelParam::TimeValue,
        LevelParam::Speed,
        LevelParam::C64Timing,
        LevelParam::RandomSeed,
        LevelParam::MagicWallTime,
        LevelParam::AmoebaTime,
        LevelParam::AmoebaThreshold,
        LevelParam::Amoeba2Time,
        LevelParam::Amoeba2Threshold,
        LevelParam::SlimePermeability,
        LevelParam::SlimePermeabilityC64,
        LevelParam::SlimeSeedC64,
        LevelParam::HatchingDelay,
        LevelParam::BonusTime,
        LevelParam::PenaltyTime,
    ];

    /// values accepted for this parameter
    pub fn valid_range(self) -> RangeInclusive<i32> {
        match self {
            LevelParam::Time => 1..=9999,
            LevelParam::DiamondsNeeded => -100..=999,
            LevelParam::DiamondValue | LevelParam::ExtraDiamondValue => 0..=100,
            LevelParam::TimeValue => 0..=50,
            LevelParam::Speed => 1..=5000,
            LevelParam::C64Timing => 0..=255,
            LevelParam::RandomSeed | LevelParam::SlimeSeedC64 => -1..=255,
            LevelParam::MagicWallTime
            | LevelParam::AmoebaTime
            | LevelParam::Amoeba2Time
            | LevelParam::BonusTime
            | LevelParam::PenaltyTime => 0..=999,
            LevelParam::AmoebaThreshold | LevelParam::Amoeba2Threshold => 0..=16383,
            LevelParam::SlimePermeability => 0..=PROBABILITY_ONE,
            LevelParam::SlimePermeabilityC64 => 0..=255,
            LevelParam::HatchingDelay => 1..=40,
        }
    }

    #[allow(missing_docs)]
    pub fn name(self) -> &'static str {
        match self {
            LevelParam::Time => "time",
            LevelParam::DiamondsNeeded => "diamonds needed",
            LevelParam::DiamondValue => "diamond value",
            LevelParam::ExtraDiamondValue => "extra diamond value",
            LevelParam::TimeValue => "time value",
            LevelParam::Speed => "speed",
            LevelParam::C64Timing => "c64 timing",
            LevelParam::RandomSeed => "random seed",
            LevelParam::MagicWallTime => "magic wall time",
            LevelParam::AmoebaTime => "amoeba time",
            LevelParam::AmoebaThreshold => "amoeba threshold",
            LevelParam::Amoeba2Time => "amoeba 2 time",
            LevelParam::Amoeba2Threshold => "amoeba 2 threshold",
            LevelParam::SlimePermeability => "slime permeability",
            LevelParam::SlimePermeabilityC64 => "c64 slime permeability",
            LevelParam::SlimeSeedC64 => "c64 slime seed",
            LevelParam::HatchingDelay => "hatching delay",
            LevelParam::BonusTime => "bonus time",
            LevelParam::PenaltyTime => "penalty time",
        }
    }
}

/// One value per difficulty level for every [LevelParam].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct LevelParams {
    pub time: [i32; N_LEVELS],
    pub diamonds_needed: [i32; N_LEVELS],
    pub diamond_value: [i32; N_LEVELS],
    pub extra_diamond_value: [i32; N_LEVELS],
    pub time_value: [i32; N_LEVELS],
    pub speed: [i32; N_LEVELS],
    pub c64_timing: [i32; N_LEVELS],
    pub random_seed: [i32; N_LEVELS],
    pub magic_wall_time: [i32; N_LEVELS],
    pub amoeba_time: [i32; N_LEVELS],
    pub amoeba_threshold: [i32; N_LEVELS],
    pub amoeba2_time: [i32; N_LEVELS],
    pub amoeba2_threshold: [i32; N_LEVELS],
    pub slime_permeability: [i32; N_LEVELS],
    pub slime_permeability_c64: [i32; N_LEVELS],
    pub slime_seed_c64: [i32; N_LEVELS],
    pub hatching_delay: [i32; N_LEVELS],
    pub bonus_time: [i32; N_LEVELS],
    pub penalty_time: [i32; N_LEVELS],
}

impl Default for LevelParams {
    fn default() -> Self {
        LevelParams {
            time: [999; N_LEVELS],
            diamonds_needed: [10; N_LEVELS],
            diamond_value: [10; N_LEVELS],
            extra_diamond_value: [15; N_LEVELS],
            time_value: [1; N_LEVELS],
            speed: [200; N_LEVELS],
            c64_timing: [0; N_LEVELS],
            random_seed: [0, 1, 2, 3, 4],
            magic_wall_time: [999; N_LEVELS],
            amoeba_time: [999; N_LEVELS],
            amoeba_threshold: [200; N_LEVELS],
            amoeba2_time: [999; N_LEVELS],
            amoeba2_threshold: [200; N_LEVELS],
            slime_permeability: [PROBABILITY_ONE; N_LEVELS],
            slime_permeability_c64: [0; N_LEVELS],
            slime_seed_c64: [-1; N_LEVELS],
            hatching_delay: [21; N_LEVELS],
            bonus_time: [30; N_LEVELS],
            penalty_time: [30; N_LEVELS],
        }
    }
}

impl LevelParams {
    fn slot(&self, param: LevelParam) -> &[i32; N_LEVELS] {
        match param {
            LevelParam::Time => &self.time,
            LevelParam::DiamondsNeeded => &self.diamonds_needed,
            LevelParam::DiamondValue => &self.diamond_value,
            LevelParam::ExtraDiamondValue => &self.extra_diamond_value,
            LevelParam::TimeValue => &self.time_value,
            LevelParam::Speed => &self.speed,
            LevelParam::C64Timing => &self.c64_timing,
            LevelParam::RandomSeed => &self.random_seed,
            LevelParam::MagicWallTime => &self.magic_wall_time,
            LevelParam::AmoebaTime => &self.amoeba_time,
            LevelParam::AmoebaThreshold => &self.amoeba_threshold,
            LevelParam::Amoeba2Time => &self.amoeba2_time,
            LevelParam::Amoeba2Threshold => &self.amoeba2_threshold,
            LevelParam::SlimePermeability => &self.slime_permeability,
            LevelParam::SlimePermeabilityC64 => &self.slime_permeability_c64,
            LevelParam::SlimeSeedC64 => &self.slime_seed_c64,
            LevelParam::HatchingDelay => &self.hatching_delay,
            LevelParam::BonusTime => &self.bonus_time,
            LevelParam::PenaltyTime => &self.penalty_time,
        }
    }

    fn slot_mut(&mut self, param: LevelParam) -> &mut [i32; N_LEVELS] {
        match param {
            LevelParam::Time => &mut self.time,
            LevelParam::DiamondsNeeded => &mut self.diamonds_needed,
            LevelParam::DiamondValue => &mut self.diamond_value,
            LevelParam::ExtraDiamondValue => &mut self.extra_diamond_value,
            LevelParam::TimeValue => &mut self.time_value,
            LevelParam::Speed => &mut self.speed,
            LevelParam::C64Timing => &mut self.c64_timing,
            LevelParam::RandomSeed => &mut self.random_seed,
            LevelParam::MagicWallTime => &mut self.magic_wall_time,
            LevelParam::AmoebaTime => &mut self.amoeba_time,
            LevelParam::AmoebaThreshold => &mut self.amoeba_threshold,
            LevelParam::Amoeba2Time => &mut self.amoeba2_time,
            LevelParam::Amoeba2Threshold => &mut self.amoeba2_threshold,
            LevelParam::SlimePermeability => &mut self.slime_permeability,
            LevelParam::SlimePermeabilityC64 => &mut self.slime_permeability_c64,
            LevelParam::SlimeSeedC64 => &mut self.slime_seed_c64,
            LevelParam::HatchingDelay => &mut self.hatching_delay,
            LevelParam::BonusTime => &mut self.bonus_time,
            LevelParam::PenaltyTime => &mut self.penalty_time,
        }
    }

    /// the value of `param` on `level`
    pub fn get(&self, level: Level, param: LevelParam) -> i32 {
        self.slot(param)[level.as_index()]
    }
}

/// The random fill every cave without a map starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomFill {
    /// element of every cell not picked by a random entry
    pub initial: Element,
    /// element of the outermost ring of cells
    pub border: Element,
    /// up to four elements with their probability out of 256
    pub entries: Vec<super::FillEntry>,
}

impl Default for RandomFill {
    fn default() -> Self {
        RandomFill {
            initial: Element::Dirt,
            border: Element::Steel,
            entries: Vec::new(),
        }
    }
}

/// Element conversions and probabilities a cave can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct CaveEffects {
    pub magic_wall_stone_to: Element,
    pub magic_wall_diamond_to: Element,
    pub magic_wall_mega_stone_to: Element,
    pub magic_wall_nitro_pack_to: Element,
    pub magic_wall_nut_to: Element,
    pub magic_wall_flying_stone_to: Element,
    pub magic_wall_flying_diamond_to: Element,
    pub amoeba_too_big_to: Element,
    pub amoeba_enclosed_to: Element,
    pub amoeba2_too_big_to: Element,
    pub amoeba2_enclosed_to: Element,
    /// growth chance per neighbour check while the amoeba timer runs, millionths
    pub amoeba_growth_prob: i32,
    /// growth chance after the amoeba timer ran out, millionths
    pub amoeba_fast_growth_prob: i32,
    pub firefly_explode_to: ExplosionKind,
    pub alt_firefly_explode_to: ExplosionKind,
    pub butterfly_explode_to: ExplosionKind,
    pub alt_butterfly_explode_to: ExplosionKind,
    pub stonefly_explode_to: ExplosionKind,
    pub dragonfly_explode_to: ExplosionKind,
    /// what a falling stone becomes when it lands
    pub stone_bouncing_to: Element,
    /// what a falling diamond becomes when it lands
    pub diamond_bouncing_to: Element,
    /// elements slime lets through, and what they become below it
    pub slime_eats: [Element; 3],
    pub slime_converts_to: [Element; 3],
    pub acid_eats: Element,
    pub acid_turns_to: Element,
    /// millionths
    pub acid_spread_ratio: i32,
    /// a bladder touching this element turns in to a clock
    pub bladder_converts_by: Element,
    pub nut_crushed_to: Element,
    pub expanding_wall_changed: bool,
    /// what snapping leaves behind
    pub snap_element: Element,
    /// millionths
    pub pushing_stone_prob: i32,
    /// millionths, after eating a sweet
    pub pushing_stone_prob_sweet: i32,
    pub mega_stones_pushable_with_sweet: bool,
    pub pneumatic_hammer_frames: u32,
    pub hammered_walls_reappear: bool,
    pub hammered_wall_reappear_frames: u32,
    pub skeletons_needed_for_pot: u32,
    pub skeletons_worth_diamonds: u32,
    pub biter_delay_frame: u32,
    pub biter_eats: Element,
    pub replicators_active: bool,
    pub replicator_delay_frame: u32,
    pub conveyors_active: bool,
    pub conveyors_left: bool,
    pub gravity: Direction,
    /// seconds between using a gravity switch and gravity changing
    pub gravity_change_time: u32,
    pub gravity_switch_active: bool,
    pub creatures_backwards: bool,
    /// seconds, zero for never
    pub creatures_direction_auto_change_time: u32,
    pub creatures_direction_auto_change_on_start: bool,
    /// frames something heavy rests on loose dirt before it crumbles
    pub loose_dirt_decay_ticks: u16,
    pub water_does_not_flow_down: bool,
}

impl Default for CaveEffects {
    fn default() -> Self {
        CaveEffects {
            magic_wall_stone_to: Element::DiamondFalling,
            magic_wall_diamond_to: Element::StoneFalling,
            magic_wall_mega_stone_to: Element::NitroPackFalling,
            magic_wall_nitro_pack_to: Element::MegaStoneFalling,
            magic_wall_nut_to: Element::NutFalling,
            magic_wall_flying_stone_to: Element::FlyingDiamondFlying,
            magic_wall_flying_diamond_to: Element::FlyingStoneFlying,
            amoeba_too_big_to: Element::Stone,
            amoeba_enclosed_to: Element::Diamond,
            amoeba2_too_big_to: Element::Stone,
            amoeba2_enclosed_to: Element::Diamond,
            amoeba_growth_prob: 31_250,
            amoeba_fast_growth_prob: 250_000,
            firefly_explode_to: ExplosionKind::Space,
            alt_firefly_explode_to: ExplosionKind::Space,
            butterfly_explode_to: ExplosionKind::Diamond,
            alt_butterfly_explode_to: ExplosionKind::Diamond,
            stonefly_explode_to: ExplosionKind::Stone,
            dragonfly_explode_to: ExplosionKind::Space,
            stone_bouncing_to: Element::Stone,
            diamond_bouncing_to: Element::Diamond,
            slime_eats: [Element::Diamond, Element::Stone, Element::Nut],
            slime_converts_to: [
                Element::DiamondFalling,
                Element::StoneFalling,
                Element::NutFalling,
            ],
            acid_eats: Element::Dirt,
            acid_turns_to: Element::Explosion(ExplosionKind::Space, 3),
            acid_spread_ratio: 31_250,
            bladder_converts_by: Element::Voodoo,
            nut_crushed_to: Element::Diamond,
            expanding_wall_changed: false,
            snap_element: Element::Space,
            pushing_stone_prob: 250_000,
            pushing_stone_prob_sweet: PROBABILITY_ONE,
            mega_stones_pushable_with_sweet: false,
            pneumatic_hammer_frames: 5,
            hammered_walls_reappear: false,
            hammered_wall_reappear_frames: 100,
            skeletons_needed_for_pot: 5,
            skeletons_worth_diamonds: 0,
            biter_delay_frame: 0,
            biter_eats: Element::Diamond,
            replicators_active: true,
            replicator_delay_frame: 4,
            conveyors_active: true,
            conveyors_left: true,
            gravity: Direction::Down,
            gravity_change_time: 10,
            gravity_switch_active: false,
            creatures_backwards: false,
            creatures_direction_auto_change_time: 0,
            creatures_direction_auto_change_on_start: false,
            loose_dirt_decay_ticks: 16,
            water_does_not_flow_down: false,
        }
    }
}

/// A cave as it is authored: sizes, per level parameters, effects and either
/// a list of drawing objects or a fixed map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveTemplate {
    #[allow(missing_docs)]
    pub name: String,
    #[allow(missing_docs)]
    pub author: String,
    #[allow(missing_docs)]
    pub description: String,
    #[allow(missing_docs)]
    pub date: String,
    /// intermissions give no bonus life and are skipped when the player loses one
    pub intermission: bool,
    width: i32,
    height: i32,
    #[allow(missing_docs)]
    pub visible: VisibleRegion,
    #[allow(missing_docs)]
    pub levels: LevelParams,
    #[allow(missing_docs)]
    pub fill: RandomFill,
    #[allow(missing_docs)]
    pub effects: CaveEffects,
    objects: Vec<StoredObject>,
    next_object_id: u32,
    map: Option<CaveMap<Element>>,
    /// recorded plays of this cave
    pub replays: Vec<Replay>,
    #[allow(missing_docs)]
    pub highscores: HighScoreTable,
    /// key value pairs a loader did not understand, kept for saving
    pub tags: FxHashMap<String, String>,
}

impl Default for CaveTemplate {
    fn default() -> Self {
        CaveTemplate::create_default()
    }
}

impl CaveTemplate {
    /// an empty 40x22 cave: steel border, dirt inside
    pub fn create_default() -> Self {
        CaveTemplate {
            name: "New cave".to_string(),
            author: String::new(),
            description: String::new(),
            date: String::new(),
            intermission: false,
            width: 40,
            height: 22,
            visible: VisibleRegion {
                x1: 0,
                y1: 0,
                x2: 39,
                y2: 21,
            },
            levels: LevelParams::default(),
            fill: RandomFill::default(),
            effects: CaveEffects::default(),
            objects: Vec::new(),
            next_object_id: 0,
            map: None,
            replays: Vec::new(),
            highscores: HighScoreTable::default(),
            tags: FxHashMap::default(),
        }
    }

    /// Builds a cave with a fixed map from text, one line per row, using the
    /// characters of [Element::to_char]. Empty lines are skipped.
    pub fn from_ascii(text: &str) -> Result<Self, TemplateError> {
        let rows = text
            .lines()
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .map(|c| Element::from_char(c).ok_or(TemplateError::InvalidMapCharacter(c)))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        let map = CaveMap::from_rows(rows).ok_or(TemplateError::InvalidObject {
            object: "map",
            reason: "rows have different lengths",
        })?;
        let mut template = CaveTemplate::create_default();
        template.resize(map.width(), map.height())?;
        template.set_map(map)?;
        Ok(template)
    }

    #[allow(missing_docs)]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[allow(missing_docs)]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Changes the size. A fixed map is dropped, the visible region is reset.
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), TemplateError> {
        if !dimensions_valid(width, height) {
            return Err(TemplateError::InvalidDimensions { width, height });
        }
        self.width = width;
        self.height = height;
        self.visible = VisibleRegion {
            x1: 0,
            y1: 0,
            x2: width - 1,
            y2: height - 1,
        };
        if self.map.as_ref().map_or(false, |m| m.width() != width || m.height() != height) {
            self.map = None;
        }
        Ok(())
    }

    /// Appends an object drawn on the given levels and returns its handle.
    pub fn add_object(
        &mut self,
        levels: LevelMask,
        object: CaveObject,
    ) -> Result<ObjectId, TemplateError> {
        object.validate()?;
        let id = ObjectId(self.next_object_id);
        self.next_object_id += 1;
        self.objects.push(StoredObject { id, levels, object });
        Ok(id)
    }

    fn position_of(&self, id: ObjectId) -> Result<usize, TemplateError> {
        self.objects
            .iter()
            .position(|o| o.id == id)
            .ok_or(TemplateError::UnknownObject(id))
    }

    /// removes an object, giving it back
    pub fn remove_object(&mut self, id: ObjectId) -> Result<StoredObject, TemplateError> {
        let index = self.position_of(id)?;
        Ok(self.objects.remove(index))
    }

    /// moves an object to `new_index` in the drawing order
    pub fn reorder(&mut self, id: ObjectId, new_index: usize) -> Result<(), TemplateError> {
        let len = self.objects.len();
        if new_index >= len {
            return Err(TemplateError::IndexOutOfRange {
                index: new_index,
                len,
            });
        }
        let index = self.position_of(id)?;
        let object = self.objects.remove(index);
        self.objects.insert(new_index, object);
        Ok(())
    }

    /// replaces an object's parameters, keeping its handle and position
    pub fn replace_object(&mut self, id: ObjectId, object: CaveObject) -> Result<(), TemplateError> {
        object.validate()?;
        let index = self.position_of(id)?;
        self.objects[index].object = object;
        Ok(())
    }

    #[allow(missing_docs)]
    pub fn object(&self, id: ObjectId) -> Option<&StoredObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// objects in drawing order
    pub fn objects(&self) -> impl Iterator<Item = &StoredObject> {
        self.objects.iter()
    }

    /// sets one per level parameter, values out of range are refused
    pub fn set_level_parameter(
        &mut self,
        level: Level,
        param: LevelParam,
        value: i32,
    ) -> Result<(), TemplateError> {
        if !param.valid_range().contains(&value) {
            return Err(TemplateError::InvalidParameter {
                param: param.name(),
                value,
            });
        }
        self.levels.slot_mut(param)[level.as_index()] = value;
        Ok(())
    }

    /// sets one parameter to the same value on all levels
    pub fn set_parameter_all_levels(
        &mut self,
        param: LevelParam,
        value: i32,
    ) -> Result<(), TemplateError> {
        for level in Level::ALL.iter() {
            self.set_level_parameter(*level, param, value)?;
        }
        Ok(())
    }

    /// Uses a fixed map instead of the objects. The map must have the cave's size.
    pub fn set_map(&mut self, map: CaveMap<Element>) -> Result<(), TemplateError> {
        if map.width() != self.width || map.height() != self.height {
            return Err(TemplateError::MapSizeMismatch {
                width: self.width,
                height: self.height,
                actual_width: map.width(),
                actual_height: map.height(),
            });
        }
        self.map = Some(map);
        Ok(())
    }

    /// goes back to drawing the objects
    pub fn clear_map(&mut self) -> Option<CaveMap<Element>> {
        self.map.take()
    }

    #[allow(missing_docs)]
    pub fn map(&self) -> Option<&CaveMap<Element>> {
        self.map.as_ref()
    }

    /// Checks everything a loader might have got wrong.
    pub fn validate(&self) -> Result<(), TemplateError> {
        if !dimensions_valid(self.width, self.height) {
            return Err(TemplateError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if let Some(map) = &self.map {
            if map.width() != self.width || map.height() != self.height {
                return Err(TemplateError::MapSizeMismatch {
                    width: self.width,
                    height: self.height,
                    actual_width: map.width(),
                    actual_height: map.height(),
                });
            }
            if let Some(bad) = map.iter().find(|e| !e.is_valid()) {
                return Err(TemplateError::InvalidElement(*bad));
            }
        }
        for stored in self.objects.iter() {
            stored.object.validate()?;
        }
        for param in LevelParam::ALL.iter() {
            if let Some(bad) = self
                .levels
                .slot(*param)
                .iter()
                .find(|v| !param.valid_range().contains(v))
            {
                return Err(TemplateError::InvalidParameter {
                    param: param.name(),
                    value: *bad,
                });
            }
        }
        Ok(())
    }

    /// the map as text, one line per row, for debugging and tests
    pub fn map_to_ascii(&self) -> Option<String> {
        self.map.as_ref().map(|map| {
            map.rows()
                .map(|row| row.iter().map(|e| e.to_char().unwrap_or('?')).collect::<String>())
                .join("\n")
        })
    }

    /// element at a position of the fixed map
    pub fn map_element(&self, pos: Coordinate) -> Option<Element> {
        self.map.as_ref().and_then(|m| m.get_cloned(pos))
    }
}
