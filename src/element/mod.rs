//! The substances a cave cell can be made of.
//!
//! [Element] is what the simulation works with. Everything that only matters
//! for drawing (covered cells, player animations, blinking doors) lives in
//! [DisplayGlyph] instead, so matches over `Element` never have to deal with
//! renderer-only tags.
mod glyph;
mod properties;

use crate::types::{Dir4, Direction};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use glyph::{DisplayGlyph, PlayerPose, Sound, ViewState};
pub use properties::{Properties, Slopes};

/// Shape of a sloped element: the two sides things roll off to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slope {
    #[allow(missing_docs)]
    UpLeft,
    #[allow(missing_docs)]
    UpRight,
    #[allow(missing_docs)]
    DownLeft,
    #[allow(missing_docs)]
    DownRight,
}

impl Slope {
    #[allow(missing_docs)]
    pub const ALL: [Slope; 4] = [
        Slope::UpLeft,
        Slope::UpRight,
        Slope::DownLeft,
        Slope::DownRight,
    ];

    fn index(self) -> u16 {
        match self {
            Slope::UpLeft => 0,
            Slope::UpRight => 1,
            Slope::DownLeft => 2,
            Slope::DownRight => 3,
        }
    }
}

/// Colour of a key and the door it opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyColor {
    #[allow(missing_docs)]
    One,
    #[allow(missing_docs)]
    Two,
    #[allow(missing_docs)]
    Three,
}

impl KeyColor {
    #[allow(missing_docs)]
    pub const ALL: [KeyColor; 3] = [KeyColor::One, KeyColor::Two, KeyColor::Three];

    /// index in to per-colour arrays
    pub fn as_index(self) -> usize {
        match self {
            KeyColor::One => 0,
            KeyColor::Two => 1,
            KeyColor::Three => 2,
        }
    }
}

/// Which way an expanding wall grows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    #[allow(missing_docs)]
    Horizontal,
    #[allow(missing_docs)]
    Vertical,
    #[allow(missing_docs)]
    Both,
}

impl Axis {
    #[allow(missing_docs)]
    pub const ALL: [Axis; 3] = [Axis::Horizontal, Axis::Vertical, Axis::Both];

    fn index(self) -> u16 {
        match self {
            Axis::Horizontal => 0,
            Axis::Vertical => 1,
            Axis::Both => 2,
        }
    }
}

/// Left or right, for the pneumatic hammer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[allow(missing_docs)]
    Left,
    #[allow(missing_docs)]
    Right,
}

impl Side {
    /// the horizontal direction of this side
    pub fn direction(self) -> Direction {
        match self {
            Side::Left => Direction::Left,
            Side::Right => Direction::Right,
        }
    }
}

/// The creature families. Each one moves with its own turning rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureKind {
    #[allow(missing_docs)]
    Firefly,
    #[allow(missing_docs)]
    AltFirefly,
    #[allow(missing_docs)]
    Butterfly,
    #[allow(missing_docs)]
    AltButterfly,
    #[allow(missing_docs)]
    Stonefly,
    #[allow(missing_docs)]
    Dragonfly,
    #[allow(missing_docs)]
    Cow,
    #[allow(missing_docs)]
    Biter,
}

impl CreatureKind {
    #[allow(missing_docs)]
    pub const ALL: [CreatureKind; 8] = [
        CreatureKind::Firefly,
        CreatureKind::AltFirefly,
        CreatureKind::Butterfly,
        CreatureKind::AltButterfly,
        CreatureKind::Stonefly,
        CreatureKind::Dragonfly,
        CreatureKind::Cow,
        CreatureKind::Biter,
    ];

    fn index(self) -> u16 {
        match self {
            CreatureKind::Firefly => 0,
            CreatureKind::AltFirefly => 1,
            CreatureKind::Butterfly => 2,
            CreatureKind::AltButterfly => 3,
            CreatureKind::Stonefly => 4,
            CreatureKind::Dragonfly => 5,
            CreatureKind::Cow => 6,
            CreatureKind::Biter => 7,
        }
    }

    /// Whether the creature prefers turning counterclockwise. Fireflies hug the
    /// wall on their left, butterflies on their right, the alternative
    /// variants do the opposite.
    pub fn rotates_ccw(self) -> bool {
        matches!(
            self,
            CreatureKind::Firefly | CreatureKind::AltButterfly | CreatureKind::Dragonfly
        )
    }
}

/// What an explosion sequence leaves behind when it finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExplosionKind {
    /// ordinary explosion, leaves space
    Space,
    /// butterfly style, leaves diamonds
    Diamond,
    /// stonefly style, leaves stones
    Stone,
    /// leaves steel wall
    Steel,
    /// leaves clocks
    Clock,
    /// nitro pack explosion, leaves space
    Nitro,
    /// bomb explosion, leaves space
    Bomb,
}

impl ExplosionKind {
    #[allow(missing_docs)]
    pub const ALL: [ExplosionKind; 7] = [
        ExplosionKind::Space,
        ExplosionKind::Diamond,
        ExplosionKind::Stone,
        ExplosionKind::Steel,
        ExplosionKind::Clock,
        ExplosionKind::Nitro,
        ExplosionKind::Bomb,
    ];

    fn index(self) -> u16 {
        match self {
            ExplosionKind::Space => 0,
            ExplosionKind::Diamond => 1,
            ExplosionKind::Stone => 2,
            ExplosionKind::Steel => 3,
            ExplosionKind::Clock => 4,
            ExplosionKind::Nitro => 5,
            ExplosionKind::Bomb => 6,
        }
    }

    /// number of animation stages before the result appears
    pub fn stages(self) -> u8 {
        match self {
            ExplosionKind::Space | ExplosionKind::Diamond => 5,
            ExplosionKind::Stone
            | ExplosionKind::Steel
            | ExplosionKind::Clock
            | ExplosionKind::Nitro
            | ExplosionKind::Bomb => 4,
        }
    }

    /// the element appearing after the last stage
    pub fn result(self) -> Element {
        match self {
            ExplosionKind::Space | ExplosionKind::Nitro | ExplosionKind::Bomb => Element::Space,
            ExplosionKind::Diamond => Element::Diamond,
            ExplosionKind::Stone => Element::Stone,
            ExplosionKind::Steel => Element::Steel,
            ExplosionKind::Clock => Element::Clock,
        }
    }
}

/// number of ticks a lit bomb waits before exploding
pub const BOMB_TICKS: u8 = 7;
/// number of stages between a hatching inbox and the player
pub const PRE_PLAYER_STAGES: u8 = 3;
/// number of ticks an enclosed cow waits before turning in to a skeleton
pub const COW_ENCLOSED_TICKS: u8 = 7;

/// A cave cell's substance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Element {
    #[allow(missing_docs)]
    Space,
    #[allow(missing_docs)]
    Dirt,
    /// dirt with a different look, behaves the same
    Dirt2,
    #[allow(missing_docs)]
    DirtSloped(Slope),
    /// dirt that falls and rolls like a stone
    DirtBall,
    #[allow(missing_docs)]
    DirtBallFalling,
    /// dirt that crumbles after something heavy rested on it for a while
    DirtLoose,
    #[allow(missing_docs)]
    Brick,
    #[allow(missing_docs)]
    BrickSloped(Slope),
    /// brick the player can dig through
    BrickEatable,
    /// brick that things do not roll off
    BrickNonSliding,
    #[allow(missing_docs)]
    MagicWall,
    #[allow(missing_docs)]
    Steel,
    #[allow(missing_docs)]
    SteelSloped(Slope),
    /// steel that explosions destroy
    SteelExplodable,
    /// steel the player can dig through
    SteelEatable,
    /// what a voodoo doll leaves behind after an explosion
    Gravestone,
    #[allow(missing_docs)]
    ExpandingWall(Axis),
    #[allow(missing_docs)]
    Stone,
    #[allow(missing_docs)]
    StoneFalling,
    /// heavy stone, only pushable after eating a sweet
    MegaStone,
    #[allow(missing_docs)]
    MegaStoneFalling,
    /// stone falling against gravity
    FlyingStone,
    #[allow(missing_docs)]
    FlyingStoneFlying,
    #[allow(missing_docs)]
    Diamond,
    #[allow(missing_docs)]
    DiamondFalling,
    /// diamond falling against gravity
    FlyingDiamond,
    #[allow(missing_docs)]
    FlyingDiamondFlying,
    #[allow(missing_docs)]
    NitroPack,
    #[allow(missing_docs)]
    NitroPackFalling,
    /// a nitro pack caught in an explosion, goes off on its next scan
    NitroPackExplode,
    /// cracks in to a diamond when a stone falls on it
    Nut,
    #[allow(missing_docs)]
    NutFalling,
    #[allow(missing_docs)]
    Key(KeyColor),
    #[allow(missing_docs)]
    Door(KeyColor),
    /// releases trapped diamonds
    DiamondKey,
    #[allow(missing_docs)]
    TrappedDiamond,
    /// bonus time
    Clock,
    /// makes the player strong enough to push anything
    Sweet,
    #[allow(missing_docs)]
    PneumaticHammer,
    #[allow(missing_docs)]
    Skeleton,
    /// a bomb the player can pick up
    Bomb,
    /// a lit bomb, stage 1 to `BOMB_TICKS`
    BombTick(u8),
    #[allow(missing_docs)]
    Inbox,
    /// the player being born, stage 1 to `PRE_PLAYER_STAGES`
    PrePlayer(u8),
    #[allow(missing_docs)]
    Player,
    /// player carrying a bomb
    PlayerBomb,
    /// player operating a pneumatic hammer to the given side
    PlayerPneumatic(Side),
    /// the working hammer next to the player
    PneumaticActive(Side),
    /// closed exit
    PreOutbox,
    /// open exit
    Outbox,
    /// closed exit that looks like steel
    PreInvisibleOutbox,
    /// open exit that looks like steel
    InvisibleOutbox,
    #[allow(missing_docs)]
    Voodoo,
    /// decreases the time left when the player touches it
    TimePenalty,
    #[allow(missing_docs)]
    Amoeba,
    #[allow(missing_docs)]
    Amoeba2,
    /// lets things pass through with some probability
    Slime,
    #[allow(missing_docs)]
    Acid,
    #[allow(missing_docs)]
    Water,
    #[allow(missing_docs)]
    Creature(CreatureKind, Dir4),
    /// a cow with nowhere to go, counting towards becoming a skeleton
    CowEnclosed(u8),
    /// floats against gravity
    Bladder,
    /// releases a bladder when there is room
    BladderSpender,
    #[allow(missing_docs)]
    Replicator,
    #[allow(missing_docs)]
    ConveyorLeft,
    #[allow(missing_docs)]
    ConveyorRight,
    #[allow(missing_docs)]
    Teleporter,
    #[allow(missing_docs)]
    GravitySwitch,
    #[allow(missing_docs)]
    CreatureSwitch,
    #[allow(missing_docs)]
    ExpandingWallSwitch,
    #[allow(missing_docs)]
    BiterSwitch,
    #[allow(missing_docs)]
    ReplicatorSwitch,
    #[allow(missing_docs)]
    ConveyorSwitch,
    #[allow(missing_docs)]
    ConveyorDirSwitch,
    /// an explosion in progress: kind and stage, 1 based
    Explosion(ExplosionKind, u8),
}

impl Default for Element {
    fn default() -> Self {
        Element::Space
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char().unwrap_or('?'))
    }
}

impl Element {
    /// the static properties of this element
    pub fn properties(self) -> Properties {
        properties::properties_of(self)
    }

    /// Whether the payload of this element is in range. Only malformed data
    /// (hand edited files, memory corruption in the embedding application)
    /// produces invalid elements.
    pub fn is_valid(self) -> bool {
        match self {
            Element::BombTick(n) => (1..=BOMB_TICKS).contains(&n),
            Element::PrePlayer(n) => (1..=PRE_PLAYER_STAGES).contains(&n),
            Element::CowEnclosed(n) => n < COW_ENCLOSED_TICKS,
            Element::Explosion(kind, stage) => (1..=kind.stages()).contains(&stage),
            _ => true,
        }
    }

    /// A number unique to every element, stable between releases. Used for
    /// checksums, so caves that look different in a different theme still
    /// produce the same value.
    pub fn code(self) -> u16 {
        match self {
            Element::Space => 0,
            Element::Dirt => 1,
            Element::Dirt2 => 2,
            Element::DirtSloped(s) => 3 + s.index(),
            Element::DirtBall => 7,
            Element::DirtBallFalling => 8,
            Element::DirtLoose => 9,
            Element::Brick => 10,
            Element::BrickSloped(s) => 11 + s.index(),
            Element::BrickEatable => 15,
            Element::BrickNonSliding => 16,
            Element::MagicWall => 17,
            Element::Steel => 18,
            Element::SteelSloped(s) => 19 + s.index(),
            Element::SteelExplodable => 23,
            Element::SteelEatable => 24,
            Element::Gravestone => 25,
            Element::ExpandingWall(a) => 26 + a.index(),
            Element::Stone => 29,
            Element::StoneFalling => 30,
            Element::MegaStone => 31,
            Element::MegaStoneFalling => 32,
            Element::FlyingStone => 33,
            Element::FlyingStoneFlying => 34,
            Element::Diamond => 35,
            Element::DiamondFalling => 36,
            Element::FlyingDiamond => 37,
            Element::FlyingDiamondFlying => 38,
            Element::NitroPack => 39,
            Element::NitroPackFalling => 40,
            Element::NitroPackExplode => 41,
            Element::Nut => 42,
            Element::NutFalling => 43,
            Element::Key(k) => 44 + k.as_index() as u16,
            Element::Door(k) => 47 + k.as_index() as u16,
            Element::DiamondKey => 50,
            Element::TrappedDiamond => 51,
            Element::Clock => 52,
            Element::Sweet => 53,
            Element::PneumaticHammer => 54,
            Element::Skeleton => 55,
            Element::Bomb => 56,
            Element::BombTick(n) => 56 + n as u16,
            Element::Inbox => 64,
            Element::PrePlayer(n) => 64 + n as u16,
            Element::Player => 68,
            Element::PlayerBomb => 69,
            Element::PlayerPneumatic(Side::Left) => 70,
            Element::PlayerPneumatic(Side::Right) => 71,
            Element::PneumaticActive(Side::Left) => 72,
            Element::PneumaticActive(Side::Right) => 73,
            Element::PreOutbox => 74,
            Element::Outbox => 75,
            Element::PreInvisibleOutbox => 76,
            Element::InvisibleOutbox => 77,
            Element::Voodoo => 78,
            Element::TimePenalty => 79,
            Element::Amoeba => 80,
            Element::Amoeba2 => 81,
            Element::Slime => 82,
            Element::Acid => 83,
            Element::Water => 84,
            Element::Creature(kind, dir) => 85 + kind.index() * 4 + dir.as_index() as u16,
            Element::CowEnclosed(n) => 117 + n as u16,
            Element::Bladder => 124,
            Element::BladderSpender => 125,
            Element::Replicator => 126,
            Element::ConveyorLeft => 127,
            Element::ConveyorRight => 128,
            Element::Teleporter => 129,
            Element::GravitySwitch => 130,
            Element::CreatureSwitch => 131,
            Element::ExpandingWallSwitch => 132,
            Element::BiterSwitch => 133,
            Element::ReplicatorSwitch => 134,
            Element::ConveyorSwitch => 135,
            Element::ConveyorDirSwitch => 136,
            Element::Explosion(kind, stage) => 140 + kind.index() * 8 + stage as u16,
        }
    }

    /// every valid element, used to check the property table is complete
    pub fn all() -> Vec<Element> {
        let mut all = vec![
            Element::Space,
            Element::Dirt,
            Element::Dirt2,
            Element::DirtBall,
            Element::DirtBallFalling,
            Element::DirtLoose,
            Element::Brick,
            Element::BrickEatable,
            Element::BrickNonSliding,
            Element::MagicWall,
            Element::Steel,
            Element::SteelExplodable,
            Element::SteelEatable,
            Element::Gravestone,
            Element::Stone,
            Element::StoneFalling,
            Element::MegaStone,
            Element::MegaStoneFalling,
            Element::FlyingStone,
            Element::FlyingStoneFlying,
            Element::Diamond,
            Element::DiamondFalling,
            Element::FlyingDiamond,
            Element::FlyingDiamondFlying,
            Element::NitroPack,
            Element::NitroPackFalling,
            Element::NitroPackExplode,
            Element::Nut,
            Element::NutFalling,
            Element::DiamondKey,
            Element::TrappedDiamond,
            Element::Clock,
            Element::Sweet,
            Element::PneumaticHammer,
            Element::Skeleton,
            Element::Bomb,
            Element::Inbox,
            Element::Player,
            Element::PlayerBomb,
            Element::PreOutbox,
            Element::Outbox,
            Element::PreInvisibleOutbox,
            Element::InvisibleOutbox,
            Element::Voodoo,
            Element::TimePenalty,
            Element::Amoeba,
            Element::Amoeba2,
            Element::Slime,
            Element::Acid,
            Element::Water,
            Element::Bladder,
            Element::BladderSpender,
            Element::Replicator,
            Element::ConveyorLeft,
            Element::ConveyorRight,
            Element::Teleporter,
            Element::GravitySwitch,
            Element::CreatureSwitch,
            Element::ExpandingWallSwitch,
            Element::BiterSwitch,
            Element::ReplicatorSwitch,
            Element::ConveyorSwitch,
            Element::ConveyorDirSwitch,
        ];
        for s in Slope::ALL.iter() {
            all.push(Element::DirtSloped(*s));
            all.push(Element::BrickSloped(*s));
            all.push(Element::SteelSloped(*s));
        }
        for a in Axis::ALL.iter() {
            all.push(Element::ExpandingWall(*a));
        }
        for k in KeyColor::ALL.iter() {
            all.push(Element::Key(*k));
            all.push(Element::Door(*k));
        }
        for side in [Side::Left, Side::Right].iter() {
            all.push(Element::PlayerPneumatic(*side));
            all.push(Element::PneumaticActive(*side));
        }
        all.extend((1..=BOMB_TICKS).map(Element::BombTick));
        all.extend((1..=PRE_PLAYER_STAGES).map(Element::PrePlayer));
        all.extend((0..COW_ENCLOSED_TICKS).map(Element::CowEnclosed));
        for kind in CreatureKind::ALL.iter() {
            for dir in Dir4::ALL.iter() {
                all.push(Element::Creature(*kind, *dir));
            }
        }
        for kind in ExplosionKind::ALL.iter() {
            all.extend((1..=kind.stages()).map(|stage| Element::Explosion(*kind, stage)));
        }
        all
    }

    /// the creature family and facing, if this is a creature
    pub fn creature(self) -> Option<(CreatureKind, Dir4)> {
        match self {
            Element::Creature(kind, dir) => Some((kind, dir)),
            _ => None,
        }
    }

    /// is this one of the player elements
    pub fn is_player(self) -> bool {
        self.properties().player
    }

    /// the falling counterpart of a stationary element that can fall
    pub fn falling(self) -> Option<Element> {
        match self {
            Element::Stone => Some(Element::StoneFalling),
            Element::Diamond => Some(Element::DiamondFalling),
            Element::MegaStone => Some(Element::MegaStoneFalling),
            Element::NitroPack => Some(Element::NitroPackFalling),
            Element::Nut => Some(Element::NutFalling),
            Element::DirtBall => Some(Element::DirtBallFalling),
            Element::FlyingStone => Some(Element::FlyingStoneFlying),
            Element::FlyingDiamond => Some(Element::FlyingDiamondFlying),
            _ => None,
        }
    }

    /// the stationary counterpart of a falling element
    pub fn stationary(self) -> Element {
        match self {
            Element::StoneFalling => Element::Stone,
            Element::DiamondFalling => Element::Diamond,
            Element::MegaStoneFalling => Element::MegaStone,
            Element::NitroPackFalling => Element::NitroPack,
            Element::NutFalling => Element::Nut,
            Element::DirtBallFalling => Element::DirtBall,
            Element::FlyingStoneFlying => Element::FlyingStone,
            Element::FlyingDiamondFlying => Element::FlyingDiamond,
            other => other,
        }
    }

    /// Character used in ascii maps. Only the common elements have one.
    pub fn to_char(self) -> Option<char> {
        let c = match self {
            Element::Space => ' ',
            Element::Dirt => '.',
            Element::Dirt2 => ',',
            Element::DirtLoose => ';',
            Element::DirtBall => 'o',
            Element::Brick => 'w',
            Element::BrickEatable => 'e',
            Element::MagicWall => 'M',
            Element::Steel => 'W',
            Element::SteelExplodable => 'E',
            Element::Gravestone => 'g',
            Element::ExpandingWall(Axis::Horizontal) => 'x',
            Element::ExpandingWall(Axis::Vertical) => 'v',
            Element::ExpandingWall(Axis::Both) => 'V',
            Element::Stone => 'r',
            Element::StoneFalling => 'R',
            Element::MegaStone => 'm',
            Element::Diamond => 'd',
            Element::DiamondFalling => 'D',
            Element::NitroPack => 'N',
            Element::Nut => 'n',
            Element::Key(KeyColor::One) => '1',
            Element::Key(KeyColor::Two) => '2',
            Element::Key(KeyColor::Three) => '3',
            Element::Door(KeyColor::One) => '4',
            Element::Door(KeyColor::Two) => '5',
            Element::Door(KeyColor::Three) => '6',
            Element::Clock => 't',
            Element::Sweet => 'k',
            Element::PneumaticHammer => 'h',
            Element::Skeleton => 'z',
            Element::Bomb => '*',
            Element::Inbox => 'P',
            Element::Player => '@',
            Element::PreOutbox => 'X',
            Element::Outbox => 'O',
            Element::PreInvisibleOutbox => 'H',
            Element::Voodoo => 'F',
            Element::Amoeba => 'a',
            Element::Amoeba2 => 'A',
            Element::Slime => 's',
            Element::Acid => '~',
            Element::Water => '=',
            Element::Creature(CreatureKind::Firefly, Dir4::Left) => 'q',
            Element::Creature(CreatureKind::Firefly, Dir4::Up) => 'Q',
            Element::Creature(CreatureKind::Firefly, Dir4::Right) => 'f',
            Element::Creature(CreatureKind::Firefly, Dir4::Down) => 'j',
            Element::Creature(CreatureKind::Butterfly, Dir4::Left) => 'b',
            Element::Creature(CreatureKind::Butterfly, Dir4::Up) => 'B',
            Element::Creature(CreatureKind::Butterfly, Dir4::Right) => 'c',
            Element::Creature(CreatureKind::Butterfly, Dir4::Down) => 'C',
            Element::Creature(CreatureKind::Stonefly, Dir4::Left) => 'y',
            Element::Creature(CreatureKind::Dragonfly, Dir4::Left) => 'u',
            Element::Creature(CreatureKind::Cow, Dir4::Left) => 'i',
            Element::Creature(CreatureKind::Biter, Dir4::Up) => 'T',
            Element::Bladder => 'L',
            Element::BladderSpender => 'l',
            Element::Replicator => '%',
            Element::ConveyorLeft => '<',
            Element::ConveyorRight => '>',
            Element::Teleporter => '&',
            Element::GravitySwitch => 'G',
            Element::CreatureSwitch => '!',
            Element::ExpandingWallSwitch => '|',
            Element::BiterSwitch => '$',
            Element::ReplicatorSwitch => '^',
            Element::ConveyorSwitch => '/',
            Element::ConveyorDirSwitch => '\\',
            Element::Explosion(ExplosionKind::Space, 1) => '#',
            _ => return None,
        };
        Some(c)
    }

    /// parses a character made by `to_char`
    pub fn from_char(c: char) -> Option<Element> {
        // small table, scanned linearly; maps are only parsed in tests and loaders
        Element::all()
            .into_iter()
            .find(|e| e.to_char() == Some(c))
    }
}
