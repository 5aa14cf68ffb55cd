use super::{Element, Side};
use serde::{Deserialize, Serialize};

/// Sounds the engine asks the embedding application to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sound {
    #[allow(missing_docs)]
    Walk,
    #[allow(missing_docs)]
    Dirt,
    #[allow(missing_docs)]
    DirtBall,
    #[allow(missing_docs)]
    Stone,
    #[allow(missing_docs)]
    MegaStone,
    #[allow(missing_docs)]
    Nut,
    #[allow(missing_docs)]
    NutCrack,
    #[allow(missing_docs)]
    NitroPack,
    /// a diamond landing
    Diamond,
    /// a diamond picked up
    DiamondCollect,
    #[allow(missing_docs)]
    Push,
    #[allow(missing_docs)]
    MagicWall,
    #[allow(missing_docs)]
    ExpandingWall,
    #[allow(missing_docs)]
    Amoeba,
    #[allow(missing_docs)]
    Slime,
    #[allow(missing_docs)]
    Acid,
    #[allow(missing_docs)]
    Water,
    #[allow(missing_docs)]
    Bladder,
    #[allow(missing_docs)]
    Replicator,
    #[allow(missing_docs)]
    Teleporter,
    #[allow(missing_docs)]
    Switch,
    #[allow(missing_docs)]
    Key,
    #[allow(missing_docs)]
    Door,
    #[allow(missing_docs)]
    Clock,
    #[allow(missing_docs)]
    Sweet,
    #[allow(missing_docs)]
    Pneumatic,
    #[allow(missing_docs)]
    Skeleton,
    #[allow(missing_docs)]
    Bomb,
    #[allow(missing_docs)]
    Explosion,
    /// the exit opened
    Crack,
    /// a cell being uncovered
    Cover,
    /// the player appearing from the inbox
    Hatching,
    /// one second of remaining time counted to score
    Bonus,
    /// the last seconds of the timer
    TimeoutWarning(u8),
    #[allow(missing_docs)]
    Timeout,
    #[allow(missing_docs)]
    GravityChange,
}

/// What the player is doing, as far as drawing goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerPose {
    #[allow(missing_docs)]
    Still,
    #[allow(missing_docs)]
    Walking(Side),
    #[allow(missing_docs)]
    Blinking,
    #[allow(missing_docs)]
    Tapping,
}

/// Instance wide state the renderer needs besides the cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    /// number of ticks since the instance was baked
    pub frame: u32,
    #[allow(missing_docs)]
    pub player_pose: PlayerPose,
    /// set during the tick the exit opened, and the few after it
    pub flash: bool,
}

/// The drawable form of a cell. Some of these never exist in a cave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayGlyph {
    /// the cell's element drawn as is
    Cell(Element),
    /// cell not uncovered yet
    Covered,
    #[allow(missing_docs)]
    PlayerStill,
    #[allow(missing_docs)]
    PlayerWalk(Side),
    #[allow(missing_docs)]
    PlayerBlink,
    #[allow(missing_docs)]
    PlayerTap,
    /// the inbox flashing before the player appears
    InboxFlash,
    /// the open outbox flashing
    OutboxFlash,
    /// the flash of the whole screen when the exit opens
    ScreenFlash,
}

impl DisplayGlyph {
    /// maps a cell to what should be drawn for it
    pub fn for_cell(element: Element, covered: bool, view: &ViewState) -> DisplayGlyph {
        if covered {
            return DisplayGlyph::Covered;
        }
        let blink = view.frame % 8 < 4;
        match element {
            Element::Player | Element::PlayerBomb => match view.player_pose {
                PlayerPose::Still => DisplayGlyph::PlayerStill,
                PlayerPose::Walking(side) => DisplayGlyph::PlayerWalk(side),
                PlayerPose::Blinking => DisplayGlyph::PlayerBlink,
                PlayerPose::Tapping => DisplayGlyph::PlayerTap,
            },
            Element::Inbox if blink => DisplayGlyph::InboxFlash,
            Element::Inbox => DisplayGlyph::Cell(Element::Steel),
            Element::Outbox if blink => DisplayGlyph::OutboxFlash,
            Element::PreOutbox => DisplayGlyph::Cell(Element::Steel),
            Element::PreInvisibleOutbox | Element::InvisibleOutbox => {
                DisplayGlyph::Cell(Element::Steel)
            }
            Element::Space if view.flash => DisplayGlyph::ScreenFlash,
            other => DisplayGlyph::Cell(other),
        }
    }
}
