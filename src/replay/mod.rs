//! Recorded plays, and playing them back.
//!
//! A replay stores the level, the seed and one packed input byte per tick.
//! Because baking and ticking are deterministic, that is enough to rebuild
//! every state of the play, which is what makes highscores checkable.
mod checksum;
mod highscore;
mod session;

pub use checksum::{checksum, Adler32};
pub use highscore::{HighScore, HighScoreTable, HIGHSCORE_CAPACITY};
pub use session::{Session, SessionEvent};

use crate::cave::CaveTemplate;
use crate::engine::{bake, CaveInstance, CaveOutcome, EngineConfig, InstanceSnapshot, Phase};
use crate::error::ReplayError;
use crate::types::{
    Level, PlayerInput, SimulableCave, TickInstruments, VictorDeterminableCave,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One recorded play of a cave.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replay {
    #[allow(missing_docs)]
    pub level: Level,
    /// seed the cave was baked with
    pub seed: u64,
    #[allow(missing_docs)]
    pub player_name: String,
    #[allow(missing_docs)]
    pub date: String,
    #[allow(missing_docs)]
    pub comment: String,
    /// score at the end of the play
    pub score: u32,
    /// the player reached the exit
    pub success: bool,
    /// checksum of the cave as baked when recording started
    pub checksum: u32,
    /// one byte per tick, see [PlayerInput::pack]
    inputs: Vec<u8>,
}

impl Replay {
    /// an empty recording for a cave baked with `level` and `seed`
    pub fn new(level: Level, seed: u64) -> Self {
        Replay {
            level,
            seed,
            player_name: String::new(),
            date: String::new(),
            comment: String::new(),
            score: 0,
            success: false,
            checksum: 0,
            inputs: Vec::new(),
        }
    }

    /// appends the input of one tick
    pub fn record_input(&mut self, input: PlayerInput) {
        self.inputs.push(input.pack());
    }

    /// the recorded inputs, in order
    pub fn inputs(&self) -> impl Iterator<Item = PlayerInput> + '_ {
        self.inputs.iter().map(|b| PlayerInput::unpack(*b))
    }

    /// number of recorded ticks
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    #[allow(missing_docs)]
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Plays the replay back on `template` and checks that it belongs to
    /// that cave and ends with the score and outcome it claims.
    #[instrument(level = "trace", skip_all)]
    pub fn verify(&self, template: &CaveTemplate, config: &EngineConfig) -> Result<(), ReplayError> {
        let mut player = ReplayPlayer::new(self, template, config)?;
        while player.step().is_some() {}
        let instance = player.finish();
        let success = instance.get_outcome() == Some(CaveOutcome::Success);
        if instance.score() != self.score {
            return Err(ReplayError::ScoreMismatch {
                recorded: self.score,
                actual: instance.score(),
            });
        }
        if success != self.success {
            return Err(ReplayError::OutcomeMismatch {
                recorded: self.success,
                actual: success,
            });
        }
        debug!(score = self.score, ticks = self.len(), "replay verified");
        Ok(())
    }
}

/// Drives a fresh instance through a replay one tick at a time.
#[derive(Debug)]
pub struct ReplayPlayer<'a> {
    replay: &'a Replay,
    config: &'a EngineConfig,
    instance: CaveInstance,
    position: usize,
}

impl<'a> ReplayPlayer<'a> {
    /// Bakes the cave the replay was recorded on. Fails if the baked cave
    /// does not have the checksum the replay was recorded with.
    pub fn new(
        replay: &'a Replay,
        template: &CaveTemplate,
        config: &'a EngineConfig,
    ) -> Result<Self, ReplayError> {
        let instance = bake(template, replay.level, replay.seed, config)?;
        let actual = checksum(&instance);
        if actual != replay.checksum {
            return Err(ReplayError::ChecksumMismatch {
                recorded: replay.checksum,
                actual,
            });
        }
        Ok(ReplayPlayer {
            replay,
            config,
            instance,
            position: 0,
        })
    }

    /// Advances by one recorded input. `None` once the inputs ran out or
    /// the play is over.
    pub fn step(&mut self) -> Option<InstanceSnapshot> {
        if self.instance.is_over() {
            return None;
        }
        let input = self
            .replay
            .inputs
            .get(self.position)
            .map(|b| PlayerInput::unpack(*b))?;
        self.position += 1;
        self.instance.tick(self.config, input);
        Some(self.instance.snapshot())
    }

    /// like [ReplayPlayer::step], timing the tick
    pub fn step_instrumented<T: TickInstruments>(&mut self, instruments: &T) -> Option<InstanceSnapshot> {
        if self.instance.is_over() {
            return None;
        }
        let input = self
            .replay
            .inputs
            .get(self.position)
            .map(|b| PlayerInput::unpack(*b))?;
        self.position += 1;
        self.instance.tick_instrumented(instruments, self.config, input);
        Some(self.instance.snapshot())
    }

    /// the instance as the replay has left it so far
    pub fn instance(&self) -> &CaveInstance {
        &self.instance
    }

    /// ticks played back so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// Ends the playback. A play that reached the exit still has its
    /// remaining time counted in to the score.
    pub fn finish(mut self) -> CaveInstance {
        while self.instance.phase() == Phase::Success {
            self.instance.tick(self.config, PlayerInput::idle());
        }
        self.instance
    }
}

/// Bakes a cave and runs `inputs` on it, returning the state after the bake
/// and after every tick.
pub fn replay(
    template: &CaveTemplate,
    level: Level,
    seed: u64,
    inputs: &[PlayerInput],
    config: &EngineConfig,
) -> Result<Vec<InstanceSnapshot>, ReplayError> {
    let mut instance = bake(template, level, seed, config)?;
    let mut states = Vec::with_capacity(inputs.len() + 1);
    states.push(instance.snapshot());
    for input in inputs.iter() {
        instance.tick(config, *input);
        states.push(instance.snapshot());
    }
    Ok(states)
}
