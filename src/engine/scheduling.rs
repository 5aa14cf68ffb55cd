//! Frame lengths of the different engines.
//!
//! The C64 engines had no fixed frame rate: a frame took as long as the scan
//! of the cave did, so explosions and amoeba made the game slower. The
//! `ckdelay` value collects that extra work during a tick, in microseconds.
use super::config::Scheduling;

/// extra delay caused by one explosion starting
pub const CKDELAY_EXPLOSION: u32 = 1200;
/// extra delay caused by every amoeba cell scanned
pub const CKDELAY_AMOEBA: u32 = 20;
/// extra delay of every frame in Crazy Dream caves with reappearing walls
pub const CKDELAY_REAPPEARING_WALLS: u32 = 60_000;

/// What the frame length depends on besides the scheduling itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTiming {
    /// the cave's speed parameter in milliseconds
    pub speed: i32,
    /// the cave's C64 timing parameter
    pub c64_timing: i32,
    /// extra delay of the frame, microseconds
    pub ckdelay: u32,
    /// intermissions were scanned faster, only part of the screen was used
    pub intermission: bool,
    /// Crazy Dream slowed down with reappearing walls
    pub hammered_walls_reappear: bool,
}

/// length of a frame in milliseconds
pub fn frame_length(scheduling: Scheduling, timing: FrameTiming) -> u32 {
    let ckdelay_ms = (timing.ckdelay / 1000) as f64;
    let c64 = timing.c64_timing.max(0) as f64;
    let ms = match scheduling {
        Scheduling::Milliseconds => timing.speed as f64,
        Scheduling::Bd1 if timing.intermission => 60.0 + 3.66 * c64 + ckdelay_ms,
        Scheduling::Bd1 => 88.0 + 3.66 * c64 + ckdelay_ms,
        Scheduling::Bd1Atari if timing.intermission => 65.0 + 2.88 * c64 + ckdelay_ms,
        Scheduling::Bd1Atari => 74.0 + 3.2 * c64 + ckdelay_ms,
        Scheduling::Bd2 => (60.0 + ckdelay_ms).max(c64 * 20.0),
        Scheduling::Plck => 65.0 + ckdelay_ms,
        Scheduling::Bd2PlckAtari => 40.0 + ckdelay_ms,
        Scheduling::CrDr => {
            let extra = if timing.hammered_walls_reappear {
                (CKDELAY_REAPPEARING_WALLS / 1000) as f64
            } else {
                0.0
            };
            130.0 + ckdelay_ms + extra
        }
    };
    // at least one millisecond, so time always runs out
    (ms as u32).max(1)
}
