//! various types that are useful for working with caves
use crate::element::Element;
use crate::engine::{CaveOutcome, EngineConfig, Hud, TickReport};
use crate::error::TemplateError;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fmt::{self, Debug};
use std::time::Duration;

/// Number of difficulty levels every cave carries parameters for
pub const N_LEVELS: usize = 5;

/// A vector with which to do positional math
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vector {
    /// x offset
    pub x: i32,
    /// y offset
    pub y: i32,
}

/// One of the eight compass directions, or standing still.
///
/// The order matches the order the classic engines stored them in, rotating
/// clockwise starting from up. Screen coordinates are used, so `Up` decreases y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    #[allow(missing_docs)]
    Still = 0,
    #[allow(missing_docs)]
    Up = 1,
    #[allow(missing_docs)]
    UpRight = 2,
    #[allow(missing_docs)]
    Right = 3,
    #[allow(missing_docs)]
    DownRight = 4,
    #[allow(missing_docs)]
    Down = 5,
    #[allow(missing_docs)]
    DownLeft = 6,
    #[allow(missing_docs)]
    Left = 7,
    #[allow(missing_docs)]
    UpLeft = 8,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Still => "still",
            Direction::Up => "up",
            Direction::UpRight => "upright",
            Direction::Right => "right",
            Direction::DownRight => "downright",
            Direction::Down => "down",
            Direction::DownLeft => "downleft",
            Direction::Left => "left",
            Direction::UpLeft => "upleft",
        };
        write!(f, "{}", name)
    }
}

impl Direction {
    /// the four main directions, in clockwise order starting from up
    pub const MAIN: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// converts an index (the `repr(u8)` value) back to a direction, anything
    /// out of range becomes `Still`
    pub fn from_index(index: u8) -> Direction {
        match index {
            1 => Direction::Up,
            2 => Direction::UpRight,
            3 => Direction::Right,
            4 => Direction::DownRight,
            5 => Direction::Down,
            6 => Direction::DownLeft,
            7 => Direction::Left,
            8 => Direction::UpLeft,
            _ => Direction::Still,
        }
    }

    /// the `repr(u8)` value of this direction
    pub fn as_index(self) -> u8 {
        self as u8
    }

    fn rotate(self, eighths: u8) -> Direction {
        match self {
            Direction::Still => Direction::Still,
            d => Direction::from_index((d as u8 - 1 + eighths) % 8 + 1),
        }
    }

    /// rotated 45 degrees clockwise
    pub fn cw_eighth(self) -> Direction {
        self.rotate(1)
    }

    /// rotated 90 degrees clockwise
    pub fn cw_fourth(self) -> Direction {
        self.rotate(2)
    }

    /// rotated 45 degrees counterclockwise
    pub fn ccw_eighth(self) -> Direction {
        self.rotate(7)
    }

    /// rotated 90 degrees counterclockwise
    pub fn ccw_fourth(self) -> Direction {
        self.rotate(6)
    }

    /// the reverse direction
    pub fn opposite(self) -> Direction {
        self.rotate(4)
    }

    /// true for the four main directions
    pub fn is_main(self) -> bool {
        matches!(
            self,
            Direction::Up | Direction::Right | Direction::Down | Direction::Left
        )
    }

    /// true for the four diagonals
    pub fn is_diagonal(self) -> bool {
        !self.is_main() && self != Direction::Still
    }

    /// convert this direction to a vector
    pub fn to_vector(self) -> Vector {
        let (x, y) = match self {
            Direction::Still => (0, 0),
            Direction::Up => (0, -1),
            Direction::UpRight => (1, -1),
            Direction::Right => (1, 0),
            Direction::DownRight => (1, 1),
            Direction::Down => (0, 1),
            Direction::DownLeft => (-1, 1),
            Direction::Left => (-1, 0),
            Direction::UpLeft => (-1, -1),
        };
        Vector { x, y }
    }
}

/// Facing of a creature. Only the four main directions are possible.
///
/// Indices follow the classic creature tables: left, up, right, down, so that
/// adding one turns clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dir4 {
    #[allow(missing_docs)]
    Left,
    #[allow(missing_docs)]
    Up,
    #[allow(missing_docs)]
    Right,
    #[allow(missing_docs)]
    Down,
}

impl Dir4 {
    /// all four facings, in index order
    pub const ALL: [Dir4; 4] = [Dir4::Left, Dir4::Up, Dir4::Right, Dir4::Down];

    /// index of this facing in the creature tables
    pub fn as_index(self) -> u8 {
        match self {
            Dir4::Left => 0,
            Dir4::Up => 1,
            Dir4::Right => 2,
            Dir4::Down => 3,
        }
    }

    /// facing from an index, wrapping modulo four
    pub fn from_index(index: u8) -> Dir4 {
        Dir4::ALL[(index & 3) as usize]
    }

    /// turned 90 degrees clockwise
    pub fn cw(self) -> Dir4 {
        Dir4::from_index(self.as_index() + 1)
    }

    /// turned 90 degrees counterclockwise
    pub fn ccw(self) -> Dir4 {
        Dir4::from_index(self.as_index() + 3)
    }

    /// turned around
    pub fn reversed(self) -> Dir4 {
        Dir4::from_index(self.as_index() + 2)
    }

    /// the movement direction of this facing
    pub fn direction(self) -> Direction {
        match self {
            Dir4::Left => Direction::Left,
            Dir4::Up => Direction::Up,
            Dir4::Right => Direction::Right,
            Dir4::Down => Direction::Down,
        }
    }
}

/// A position in a cave. Row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Coordinate {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Coordinate {
    #[allow(missing_docs)]
    pub const fn new(x: i32, y: i32) -> Self {
        Coordinate { x, y }
    }

    /// raw neighbour, no wrapping applied. The cave map decides how to wrap.
    pub fn add_vec(&self, v: Vector) -> Coordinate {
        Coordinate {
            x: self.x + v.x,
            y: self.y + v.y,
        }
    }

    /// raw step in the given direction
    pub fn step(&self, dir: Direction) -> Coordinate {
        self.add_vec(dir.to_vector())
    }
}

/// One of the five difficulty levels, stored 1-based like the games showed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    /// the first (easiest) level
    pub const ONE: Level = Level(1);

    /// all levels, easiest first
    pub const ALL: [Level; N_LEVELS] = [Level(1), Level(2), Level(3), Level(4), Level(5)];

    /// validates a 1-based level number
    pub fn new(level: u8) -> Result<Level, TemplateError> {
        if (1..=N_LEVELS as u8).contains(&level) {
            Ok(Level(level))
        } else {
            Err(TemplateError::InvalidLevel(level))
        }
    }

    /// 0-based index in to per-level arrays
    pub fn as_index(&self) -> usize {
        self.0 as usize - 1
    }

    /// the 1-based level number
    pub fn number(&self) -> u8 {
        self.0
    }

    /// bit of this level in an object level mask
    pub fn mask(&self) -> u8 {
        1 << (self.0 - 1)
    }
}

impl TryFrom<u8> for Level {
    type Error = TemplateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> u8 {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The input of the player for a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerInput {
    /// where the joystick points
    pub direction: Direction,
    /// fire button: snap, place bomb, use hammer
    pub fire: bool,
    /// explode the active player
    pub suicide: bool,
}

impl Default for PlayerInput {
    fn default() -> Self {
        PlayerInput::idle()
    }
}

const FIRE_BIT: u8 = 0x10;
const SUICIDE_BIT: u8 = 0x20;

impl PlayerInput {
    /// no movement, no buttons
    pub const fn idle() -> Self {
        PlayerInput {
            direction: Direction::Still,
            fire: false,
            suicide: false,
        }
    }

    /// just a movement
    pub const fn moving(direction: Direction) -> Self {
        PlayerInput {
            direction,
            fire: false,
            suicide: false,
        }
    }

    /// movement with fire held
    pub const fn snapping(direction: Direction) -> Self {
        PlayerInput {
            direction,
            fire: true,
            suicide: false,
        }
    }

    /// packs this input in to a single byte: low nibble direction, then fire and suicide bits
    pub fn pack(&self) -> u8 {
        let mut value = self.direction.as_index();
        if self.fire {
            value |= FIRE_BIT;
        }
        if self.suicide {
            value |= SUICIDE_BIT;
        }
        value
    }

    /// unpacks a byte made by `pack`
    pub fn unpack(value: u8) -> Self {
        PlayerInput {
            direction: Direction::from_index(value & 0x0f),
            fire: value & FIRE_BIT != 0,
            suicide: value & SUICIDE_BIT != 0,
        }
    }
}

/// Instruments to be used with simulation
pub trait TickInstruments: std::fmt::Debug {
    #[allow(missing_docs)]
    fn observe_tick(&self, duration: Duration);
}

/// a cave for which the size of the map can be determined
pub trait SizeDeterminableCave {
    #[allow(missing_docs)]
    fn get_width(&self) -> u32;
    #[allow(missing_docs)]
    fn get_height(&self) -> u32;
}

/// a cave whose cells can be read
pub trait ElementQueryableCave: SizeDeterminableCave {
    /// the element at the given position, positions are wrapped like the engine wraps them
    fn element_at(&self, pos: Coordinate) -> Element;

    /// counts how many cells hold an element matching the predicate
    fn count_elements(&self, pred: impl Fn(Element) -> bool) -> usize;
}

/// a cave for which the end of play can be determined
pub trait VictorDeterminableCave: std::fmt::Debug {
    #[allow(missing_docs)]
    fn is_over(&self) -> bool;

    /// how the play ended, `None` while still playing
    fn get_outcome(&self) -> Option<CaveOutcome>;
}

/// a cave that exposes the values a status bar shows
pub trait HudQueryableCave {
    #[allow(missing_docs)]
    fn hud(&self) -> Hud;
}

/// a cave that can be advanced by one tick
pub trait SimulableCave: std::fmt::Debug {
    /// advance the cave by one tick with the given input
    fn tick(&mut self, config: &EngineConfig, input: PlayerInput) -> TickReport;

    /// advance the cave by one tick, reporting the time taken to the instruments
    fn tick_instrumented<T: TickInstruments>(
        &mut self,
        instruments: &T,
        config: &EngineConfig,
        input: PlayerInput,
    ) -> TickReport {
        let start = std::time::Instant::now();
        let report = self.tick(config, input);
        instruments.observe_tick(start.elapsed());
        report
    }
}
