use crate::cave::WrapMode;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// The historical engines whose rules can be reproduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Engine {
    /// this engine's own rules
    Gdash,
    /// C64 Boulder Dash 1
    Bd1,
    /// C64 Boulder Dash 2, Rockford's revenge
    Bd2,
    /// C64 Boulder Dash construction kit
    Plck,
    /// Atari Boulder Dash 1
    Bd1Atari,
    /// 1stB, the construction kit clone
    FirstB,
    /// Crazy Dream
    CrDr,
    /// Crazy Light
    CrLi,
}

impl Engine {
    #[allow(missing_docs)]
    pub const ALL: [Engine; 8] = [
        Engine::Gdash,
        Engine::Bd1,
        Engine::Bd2,
        Engine::Plck,
        Engine::Bd1Atari,
        Engine::FirstB,
        Engine::CrDr,
        Engine::CrLi,
    ];
}

/// How the length of a frame is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scheduling {
    /// the cave's speed parameter, in milliseconds
    Milliseconds,
    #[allow(missing_docs)]
    Bd1,
    #[allow(missing_docs)]
    Bd1Atari,
    #[allow(missing_docs)]
    Bd2,
    #[allow(missing_docs)]
    Plck,
    #[allow(missing_docs)]
    Bd2PlckAtari,
    #[allow(missing_docs)]
    CrDr,
}

/// Rules that differ between engines, and the switches an embedding
/// application sets. Passed to every bake and tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// the preset this configuration started from
    pub engine: Engine,
    #[allow(missing_docs)]
    pub scheduling: Scheduling,
    /// a second lasts 1.2 real seconds, like on PAL machines
    pub pal_timing: bool,
    /// how moving elements leave the map
    pub wrap: WrapMode,
    /// drawing objects outside the map wrap around instead of being clipped
    pub wraparound_objects: bool,
    /// the first and last rows take part in the scan
    pub border_scan_first_and_last: bool,
    /// explosions skip their first stage
    pub short_explosions: bool,
    /// an active magic wall makes the amoeba count as enclosed
    pub magic_wall_stops_amoeba: bool,
    /// the magic wall timer only runs once the player is born
    pub magic_timer_wait_for_hatching: bool,
    /// a magic wall time of zero means it never expires
    pub magic_timer_zero_is_infinite: bool,
    /// the amoeba timer runs from the start instead of from the first move
    pub amoeba_timer_started_immediately: bool,
    /// the amoeba only wakes up once the player is born
    pub amoeba_timer_wait_for_hatching: bool,
    /// diamonds falling on a voodoo doll are collected
    pub voodoo_collects_diamonds: bool,
    /// stones falling on a voodoo doll make it explode
    pub voodoo_dies_by_stone: bool,
    /// an exploding voodoo doll leaves nothing, otherwise a time penalty
    pub voodoo_disappear_in_explosion: bool,
    /// anything hurting the voodoo doll kills the player
    pub voodoo_any_hurt_kills_player: bool,
    /// slime uses the C64 generator and bit masks
    pub slime_predictable: bool,
    /// with several players, the first one found in the scan is the active one
    pub active_is_first_found: bool,
    /// the player can move diagonally
    pub diagonal_movements: bool,
    /// seconds can not go above this, for clocks
    pub max_time: i32,
    /// ticks spent uncovering the cave before play starts, zero to start at once
    pub uncover_ticks: u32,
    /// baking fails for caves without an inbox
    pub require_inbox: bool,
    /// queue sound effects for the embedding application
    pub sound_hints: bool,
    /// queue particle effects for the embedding application
    pub particle_hints: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig::for_engine(Engine::Gdash)
    }
}

impl EngineConfig {
    /// the rules of one historical engine
    pub fn for_engine(engine: Engine) -> Self {
        let native = EngineConfig {
            engine,
            scheduling: Scheduling::Milliseconds,
            pal_timing: false,
            wrap: WrapMode::Closed,
            wraparound_objects: false,
            border_scan_first_and_last: true,
            short_explosions: false,
            magic_wall_stops_amoeba: true,
            magic_timer_wait_for_hatching: false,
            magic_timer_zero_is_infinite: true,
            amoeba_timer_started_immediately: true,
            amoeba_timer_wait_for_hatching: false,
            voodoo_collects_diamonds: false,
            voodoo_dies_by_stone: false,
            voodoo_disappear_in_explosion: true,
            voodoo_any_hurt_kills_player: false,
            slime_predictable: true,
            active_is_first_found: true,
            diagonal_movements: false,
            max_time: 999,
            uncover_ticks: 0,
            require_inbox: false,
            sound_hints: true,
            particle_hints: true,
        };
        let c64 = EngineConfig {
            pal_timing: true,
            wrap: WrapMode::LineShift,
            wraparound_objects: true,
            border_scan_first_and_last: false,
            amoeba_timer_started_immediately: false,
            magic_timer_zero_is_infinite: false,
            ..native
        };
        match engine {
            Engine::Gdash => native,
            Engine::Bd1 => EngineConfig {
                scheduling: Scheduling::Bd1,
                ..c64
            },
            Engine::Bd2 => EngineConfig {
                scheduling: Scheduling::Bd2,
                magic_wall_stops_amoeba: false,
                ..c64
            },
            Engine::Plck => EngineConfig {
                scheduling: Scheduling::Plck,
                magic_wall_stops_amoeba: false,
                ..c64
            },
            Engine::Bd1Atari => EngineConfig {
                scheduling: Scheduling::Bd1Atari,
                pal_timing: false,
                ..c64
            },
            Engine::FirstB => EngineConfig {
                scheduling: Scheduling::Plck,
                short_explosions: true,
                magic_wall_stops_amoeba: false,
                voodoo_collects_diamonds: true,
                voodoo_dies_by_stone: true,
                voodoo_any_hurt_kills_player: true,
                ..c64
            },
            Engine::CrDr => EngineConfig {
                scheduling: Scheduling::CrDr,
                wrap: WrapMode::Torus,
                short_explosions: true,
                magic_wall_stops_amoeba: false,
                magic_timer_wait_for_hatching: true,
                amoeba_timer_wait_for_hatching: true,
                voodoo_collects_diamonds: true,
                voodoo_dies_by_stone: true,
                voodoo_disappear_in_explosion: false,
                voodoo_any_hurt_kills_player: true,
                ..c64
            },
            Engine::CrLi => EngineConfig {
                scheduling: Scheduling::Plck,
                magic_wall_stops_amoeba: false,
                voodoo_collects_diamonds: true,
                voodoo_dies_by_stone: true,
                voodoo_any_hurt_kills_player: true,
                ..c64
            },
        }
    }

    /// Reads a configuration from json. An `engine` key picks the preset the
    /// other keys override, without one the native preset is used.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let overrides: serde_json::Value = serde_json::from_str(json)?;
        let engine = match overrides.get("engine") {
            Some(engine) => serde_json::from_value(engine.clone())?,
            None => Engine::Gdash,
        };
        let mut merged = serde_json::to_value(EngineConfig::for_engine(engine))?;
        if let (Some(base), Some(overrides)) = (merged.as_object_mut(), overrides.as_object()) {
            for (key, value) in overrides {
                base.insert(key.clone(), value.clone());
            }
        }
        Ok(serde_json::from_value(merged)?)
    }

    /// game units per second of cave time
    pub fn timing_factor(&self) -> i32 {
        if self.pal_timing {
            1200
        } else {
            1000
        }
    }

    /// the wrapping used when a drawing object leaves the map
    pub fn object_wrap(&self) -> WrapMode {
        match (self.wraparound_objects, self.wrap) {
            (false, _) => WrapMode::Closed,
            (true, WrapMode::LineShift) => WrapMode::LineShift,
            (true, _) => WrapMode::Torus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_differ_where_expected() {
        let bd1 = EngineConfig::for_engine(Engine::Bd1);
        assert_eq!(bd1.scheduling, Scheduling::Bd1);
        assert_eq!(bd1.wrap, WrapMode::LineShift);
        assert!(bd1.magic_wall_stops_amoeba);
        assert!(!EngineConfig::for_engine(Engine::Bd2).magic_wall_stops_amoeba);
        assert!(EngineConfig::for_engine(Engine::CrDr).short_explosions);
        assert_eq!(EngineConfig::default().engine, Engine::Gdash);
        for engine in Engine::ALL.iter() {
            assert_eq!(EngineConfig::for_engine(*engine).engine, *engine);
        }
    }

    #[test]
    fn test_from_json_overrides_preset() {
        let config = EngineConfig::from_json(r#"{"engine": "Bd2", "uncover_ticks": 40}"#).unwrap();
        assert_eq!(config.engine, Engine::Bd2);
        assert_eq!(config.scheduling, Scheduling::Bd2);
        assert_eq!(config.uncover_ticks, 40);
        assert!(config.pal_timing);

        let native = EngineConfig::from_json(r#"{"short_explosions": true}"#).unwrap();
        assert_eq!(native.scheduling, Scheduling::Milliseconds);
        assert!(native.short_explosions);
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(EngineConfig::from_json("{").is_err());
        assert!(EngineConfig::from_json(r#"{"engine": "Spectrum"}"#).is_err());
    }

    #[test]
    fn test_timing_factor() {
        assert_eq!(EngineConfig::default().timing_factor(), 1000);
        assert_eq!(EngineConfig::for_engine(Engine::Bd1).timing_factor(), 1200);
    }
}
