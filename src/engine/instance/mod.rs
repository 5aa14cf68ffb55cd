use crate::c64_random::C64Random;
use crate::cave::{CaveEffects, CaveMap, WrapMode};
use crate::element::{DisplayGlyph, Element, PlayerPose, Side, Sound, ViewState};
use crate::types::{Coordinate, Direction, Level};
use fxhash::FxHashSet;
use num_format::{Locale, ToFormattedString};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

mod element_queryable;
mod hud_queryable;
mod size_determinable;
mod snapshot;
mod victor_determinable;

pub use snapshot::InstanceSnapshot;

/// One cell of a running cave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Cell {
    #[allow(missing_docs)]
    pub element: Element,
    /// already handled during the current tick
    pub scanned: bool,
    /// ticks counted by elements that wait for something, like loose dirt
    pub timer: u16,
    /// not uncovered yet
    pub covered: bool,
}

impl Cell {
    pub(crate) fn new(element: Element, covered: bool) -> Self {
        Cell {
            element,
            scanned: false,
            timer: 0,
            covered,
        }
    }
}

/// Where a cave is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// cells are being uncovered, nothing moves yet
    Uncovering,
    #[allow(missing_docs)]
    Playing,
    /// the player got out, remaining time is being counted to score
    Success,
    /// time ran out
    Timeout,
    /// the player died
    Dead,
    /// nothing happens any more
    GameOver,
}

/// What the player is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerState {
    /// the inbox has not hatched yet
    NotYetBorn,
    #[allow(missing_docs)]
    Alive,
    /// caught in an explosion that is still going on
    Exploding,
    #[allow(missing_docs)]
    Dead,
    /// went through the outbox
    Exited,
    /// still alive when time ran out
    TimedOut,
}

/// How a cave ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaveOutcome {
    #[allow(missing_docs)]
    Success,
    #[allow(missing_docs)]
    Timeout,
    #[allow(missing_docs)]
    Dead,
}

/// State of one kind of amoeba.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmoebaState {
    /// not growing yet
    Sleeping,
    #[allow(missing_docs)]
    Awake,
    /// grew past its threshold, turns in to its too big element
    TooBig,
    /// has no room to grow, turns in to its enclosed element
    Enclosed,
}

/// State of the magic walls, shared by all of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MagicWallState {
    /// nothing fell in yet
    Dormant,
    /// converting things that fall in
    Active,
    /// ran out of time, acts like a brick wall
    Expired,
}

/// Visual effects the renderer may show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// dirt dug or snapped
    Dust,
    /// a diamond collected
    Sparkle,
    /// an explosion started
    Debris,
}

/// Something the embedding application should play or show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Effect {
    #[allow(missing_docs)]
    Sound {
        sound: Sound,
        pos: Option<Coordinate>,
    },
    #[allow(missing_docs)]
    Particles { kind: ParticleKind, pos: Coordinate },
    /// flash the screen, the exit just opened
    Flash,
}

/// The values a status bar shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    /// whole seconds left, rounded up
    pub time: i32,
    #[allow(missing_docs)]
    pub score: u32,
    #[allow(missing_docs)]
    pub diamonds_needed: u32,
    #[allow(missing_docs)]
    pub diamonds_collected: u32,
    /// score of the next diamond
    pub diamond_value: u32,
    /// filled in by the game session, a single cave knows nothing about lives
    pub lives: Option<u32>,
}

impl fmt::Display for Hud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "time {:>3}  diamonds {}/{} ({} each)  score {}",
            self.time,
            self.diamonds_collected,
            self.diamonds_needed,
            self.diamond_value,
            self.score.to_formatted_string(&Locale::en),
        )?;
        if let Some(lives) = self.lives {
            write!(f, "  lives {}", lives)?;
        }
        Ok(())
    }
}

/// What a tick did, for the caller's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// phase after the tick
    pub phase: Phase,
    #[allow(missing_docs)]
    pub player_state: PlayerState,
    /// how long this frame should be shown, milliseconds
    pub frame_ms: u32,
    /// number of cells that changed
    pub changed_cells: usize,
}

/// The per level parameters, fixed for one play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct ResolvedParams {
    pub time: i32,
    pub diamonds_needed: i32,
    pub diamond_value: u32,
    pub extra_diamond_value: u32,
    pub time_value: u32,
    pub speed: i32,
    pub c64_timing: i32,
    pub magic_wall_time: i32,
    pub amoeba_time: i32,
    pub amoeba_threshold: usize,
    pub amoeba2_time: i32,
    pub amoeba2_threshold: usize,
    pub slime_permeability: i32,
    pub slime_permeability_c64: u8,
    pub hatching_delay: u32,
    pub bonus_time: i32,
    pub penalty_time: i32,
}

/// Cave wide switches the player can flip while playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Switches {
    pub(crate) gravity: Direction,
    pub(crate) gravity_next: Direction,
    /// time units until gravity changes, zero for no change pending
    pub(crate) gravity_will_change: i32,
    pub(crate) gravity_switch_active: bool,
    pub(crate) creatures_backwards: bool,
    /// time units until creatures turn around by themselves, zero for never
    pub(crate) creatures_direction_will_change: i32,
    pub(crate) expanding_wall_changed: bool,
    pub(crate) replicators_active: bool,
    pub(crate) conveyors_active: bool,
    pub(crate) conveyors_left: bool,
    pub(crate) biter_delay_frame: u32,
}

/// Tracks one amoeba kind across ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct AmoebaTracker {
    pub(crate) state: AmoebaState,
    /// time units of slow growth left
    pub(crate) time_left: i32,
    pub(crate) threshold: usize,
    /// cells found in the last scan
    pub(crate) count: usize,
}

impl AmoebaTracker {
    pub(crate) fn new(time: i32, threshold: usize, timing_factor: i32) -> Self {
        AmoebaTracker {
            state: AmoebaState::Sleeping,
            time_left: time * timing_factor,
            threshold,
            count: 0,
        }
    }
}

/// Cells changed since the renderer last asked, without duplicates.
#[derive(Debug, Clone, Default)]
pub(crate) struct DirtyCells {
    list: Vec<Coordinate>,
    seen: FxHashSet<Coordinate>,
}

impl DirtyCells {
    pub(crate) fn mark(&mut self, pos: Coordinate) {
        if self.seen.insert(pos) {
            self.list.push(pos);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }

    fn take(&mut self) -> Vec<Coordinate> {
        self.seen.clear();
        std::mem::take(&mut self.list)
    }
}

/// A wall broken by the pneumatic hammer, waiting to come back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReappearingWall {
    pub(crate) pos: Coordinate,
    pub(crate) element: Element,
    pub(crate) frames_left: u32,
}

/// A cave baked for one play: the cells, the resolved parameters and the
/// game state. Only [crate::types::SimulableCave::tick] changes it.
#[derive(Debug, Clone)]
pub struct CaveInstance {
    pub(crate) name: String,
    pub(crate) level: Level,
    pub(crate) seed: u64,
    pub(crate) intermission: bool,
    pub(crate) map: CaveMap<Cell>,
    /// wrapping of the engine the instance was baked for
    pub(crate) wrap: WrapMode,
    pub(crate) params: ResolvedParams,
    pub(crate) effects: CaveEffects,
    pub(crate) switches: Switches,
    pub(crate) phase: Phase,
    pub(crate) outcome: Option<CaveOutcome>,
    pub(crate) player_state: PlayerState,
    pub(crate) player_pos: Option<Coordinate>,
    /// ticks since the player was last seen in the scan
    pub(crate) player_unseen: u32,
    /// ticks of the death explosion left
    pub(crate) player_exploding: u32,
    pub(crate) kill_player: bool,
    pub(crate) player_moved: bool,
    pub(crate) last_move: Direction,
    pub(crate) score: u32,
    pub(crate) diamonds_collected: u32,
    pub(crate) diamonds_needed: u32,
    pub(crate) diamond_value: u32,
    pub(crate) gate_open: bool,
    pub(crate) flash_ticks: u32,
    /// time left in game units, see [crate::engine::EngineConfig::timing_factor]
    pub(crate) time: i32,
    pub(crate) timing_factor: i32,
    pub(crate) hatching_delay: u32,
    pub(crate) hatched: bool,
    pub(crate) amoeba: AmoebaTracker,
    pub(crate) amoeba2: AmoebaTracker,
    pub(crate) magic_wall: MagicWallState,
    pub(crate) magic_wall_time_left: i32,
    pub(crate) keys: [u32; 3],
    pub(crate) diamond_key_collected: bool,
    pub(crate) sweet_eaten: bool,
    pub(crate) got_pneumatic_hammer: bool,
    pub(crate) pneumatic_hammer: Option<(Coordinate, u32)>,
    pub(crate) reappearing_walls: Vec<ReappearingWall>,
    pub(crate) skeletons_collected: u32,
    pub(crate) replicator_counter: u32,
    pub(crate) biter_counter: u32,
    pub(crate) ckdelay: u32,
    pub(crate) frame_ms: u32,
    pub(crate) frame: u32,
    pub(crate) uncover_left: u32,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) c64_rng: C64Random,
    pub(crate) dirty: DirtyCells,
    pub(crate) effect_queue: Vec<Effect>,
}

impl CaveInstance {
    #[allow(missing_docs)]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[allow(missing_docs)]
    pub fn level(&self) -> Level {
        self.level
    }

    /// the seed the instance was baked with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[allow(missing_docs)]
    pub fn intermission(&self) -> bool {
        self.intermission
    }

    #[allow(missing_docs)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[allow(missing_docs)]
    pub fn player_state(&self) -> PlayerState {
        self.player_state
    }

    /// where the active player was last seen
    pub fn player_pos(&self) -> Option<Coordinate> {
        self.player_pos
    }

    #[allow(missing_docs)]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[allow(missing_docs)]
    pub fn diamonds_collected(&self) -> u32 {
        self.diamonds_collected
    }

    /// diamonds still needed to open the exit
    pub fn diamonds_needed(&self) -> u32 {
        self.diamonds_needed
    }

    /// score of the next diamond collected
    pub fn diamond_value(&self) -> u32 {
        self.diamond_value
    }

    #[allow(missing_docs)]
    pub fn skeletons_collected(&self) -> u32 {
        self.skeletons_collected
    }

    /// whole seconds left, rounded up
    pub fn time_left(&self) -> i32 {
        (self.time.max(0) + self.timing_factor - 1) / self.timing_factor
    }

    /// time left in game units
    pub fn time_units(&self) -> i32 {
        self.time
    }

    #[allow(missing_docs)]
    pub fn gravity(&self) -> Direction {
        self.switches.gravity
    }

    #[allow(missing_docs)]
    pub fn gate_open(&self) -> bool {
        self.gate_open
    }

    /// ticks since baking
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// length of the last frame in milliseconds
    pub fn frame_ms(&self) -> u32 {
        self.frame_ms
    }

    #[allow(missing_docs)]
    pub fn amoeba_state(&self) -> AmoebaState {
        self.amoeba.state
    }

    #[allow(missing_docs)]
    pub fn amoeba2_state(&self) -> AmoebaState {
        self.amoeba2.state
    }

    #[allow(missing_docs)]
    pub fn magic_wall_state(&self) -> MagicWallState {
        self.magic_wall
    }

    #[allow(missing_docs)]
    pub fn resolved_params(&self) -> &ResolvedParams {
        &self.params
    }

    #[allow(missing_docs)]
    pub fn cell(&self, pos: Coordinate) -> Option<&Cell> {
        self.map.get(pos)
    }

    /// the whole grid, read only
    pub fn cells(&self) -> &CaveMap<Cell> {
        &self.map
    }

    /// cells changed since the last call, in the order they changed
    pub fn take_dirty_cells(&mut self) -> Vec<Coordinate> {
        self.dirty.take()
    }

    /// sound and particle hints queued since the last call
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effect_queue)
    }

    /// what the renderer needs besides the cells
    pub fn view_state(&self) -> ViewState {
        let player_pose = match self.last_move {
            Direction::Left | Direction::UpLeft | Direction::DownLeft => PlayerPose::Walking(Side::Left),
            Direction::Right | Direction::UpRight | Direction::DownRight => {
                PlayerPose::Walking(Side::Right)
            }
            Direction::Up | Direction::Down => PlayerPose::Walking(Side::Right),
            // idle animations follow a fixed pattern so replays look the same
            Direction::Still => match self.frame % 64 {
                0..=3 => PlayerPose::Blinking,
                32..=47 => PlayerPose::Tapping,
                _ => PlayerPose::Still,
            },
        };
        ViewState {
            frame: self.frame,
            player_pose,
            flash: self.flash_ticks > 0,
        }
    }

    /// what to draw at a position
    pub fn glyph_at(&self, pos: Coordinate) -> Option<DisplayGlyph> {
        let view = self.view_state();
        self.map
            .get(pos)
            .map(|cell| DisplayGlyph::for_cell(cell.element, cell.covered, &view))
    }

    /// the cave as text, one line per row
    pub fn to_ascii(&self) -> String {
        self.map
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.element.to_char().unwrap_or('?'))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for CaveInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} level {}, frame {}", self.name, self.level, self.frame)?;
        writeln!(f, "{}", self.to_ascii())
    }
}
