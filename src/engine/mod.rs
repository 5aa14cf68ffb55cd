//! The running side of a cave: baking a template in to an instance and
//! advancing that instance tick by tick.
mod bake;
mod config;
mod draw;
mod instance;
mod maze;
mod scheduling;
mod tick;

pub use bake::bake;
pub use config::{Engine, EngineConfig, Scheduling};
pub use instance::{
    AmoebaState, CaveInstance, CaveOutcome, Cell, Effect, Hud, InstanceSnapshot, MagicWallState,
    ParticleKind, Phase, PlayerState, ResolvedParams, TickReport,
};
pub use maze::Maze;
pub use scheduling::{
    frame_length, FrameTiming, CKDELAY_AMOEBA, CKDELAY_EXPLOSION, CKDELAY_REAPPEARING_WALLS,
};
