use super::{checksum, HighScoreTable, Replay};
use crate::cave::{CaveId, CaveSet};
use crate::engine::{bake, CaveInstance, CaveOutcome, EngineConfig, Hud};
use crate::error::BakeError;
use crate::types::{HudQueryableCave, Level, PlayerInput, SimulableCave, VictorDeterminableCave};
use tracing::{debug, warn};

/// Something a game controller may want to react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// the score passed another multiple of the bonus life score
    BonusLife,
    /// a cave ended, the next one (or the same one again) is ready
    CaveFinished {
        #[allow(missing_docs)]
        cave: CaveId,
        #[allow(missing_docs)]
        outcome: CaveOutcome,
    },
    /// no lives left, or the last cave was completed
    GameOver,
}

/// One game through a caveset: lives, the running score and the cave being
/// played. Every cave played is recorded as a replay.
#[derive(Debug)]
pub struct Session<'a> {
    caveset: &'a CaveSet,
    config: &'a EngineConfig,
    player_name: String,
    level: Level,
    seed: u64,
    cave: CaveId,
    instance: CaveInstance,
    replay: Replay,
    finished: Vec<(CaveId, Replay)>,
    lives: u32,
    /// score of the caves already finished
    score: u32,
    next_bonus_life: u32,
    over: bool,
}

impl<'a> Session<'a> {
    /// Starts a game at the first cave of the set. Every cave is baked with
    /// the same `seed`.
    pub fn new(
        caveset: &'a CaveSet,
        config: &'a EngineConfig,
        level: Level,
        seed: u64,
        player_name: &str,
    ) -> Result<Self, BakeError> {
        let first = CaveId(0);
        let (instance, replay) = Self::start_cave(caveset, config, first, level, seed, player_name)?;
        Ok(Session {
            caveset,
            config,
            player_name: player_name.to_string(),
            level,
            seed,
            cave: first,
            instance,
            replay,
            finished: Vec::new(),
            lives: caveset.initial_lives.min(caveset.maximum_lives),
            score: 0,
            next_bonus_life: caveset.bonus_life_score,
            over: false,
        })
    }

    fn start_cave(
        caveset: &CaveSet,
        config: &EngineConfig,
        cave: CaveId,
        level: Level,
        seed: u64,
        player_name: &str,
    ) -> Result<(CaveInstance, Replay), BakeError> {
        let template = caveset.cave(cave).ok_or(BakeError::NoCaves)?;
        let instance = bake(template, level, seed, config)?;
        let mut replay = Replay::new(level, seed);
        replay.checksum = checksum(&instance);
        replay.player_name = player_name.to_string();
        debug!(%cave, name = %template.name, "cave started");
        Ok((instance, replay))
    }

    /// Advances the current cave by one tick and settles what that tick
    /// means for the game.
    pub fn tick(&mut self, input: PlayerInput) -> Result<Vec<SessionEvent>, BakeError> {
        let mut events = Vec::new();
        if self.over {
            return Ok(events);
        }
        self.replay.record_input(input);
        self.instance.tick(self.config, input);

        let bonus = self.caveset.bonus_life_score;
        while bonus > 0 && self.score() >= self.next_bonus_life {
            self.next_bonus_life += bonus;
            if self.lives < self.caveset.maximum_lives {
                self.lives += 1;
            }
            events.push(SessionEvent::BonusLife);
        }

        if !self.instance.is_over() {
            return Ok(events);
        }
        let outcome = self
            .instance
            .get_outcome()
            .unwrap_or(CaveOutcome::Dead);
        events.push(SessionEvent::CaveFinished {
            cave: self.cave,
            outcome,
        });

        let intermission = self.instance.intermission();
        let loses_life = outcome != CaveOutcome::Success && !intermission;
        let lives = if loses_life {
            self.lives.saturating_sub(1)
        } else {
            self.lives
        };
        let next = match outcome {
            CaveOutcome::Success => Some(CaveId(self.cave.0 + 1)),
            _ if intermission => Some(CaveId(self.cave.0 + 1)),
            _ if lives > 0 => Some(self.cave),
            _ => None,
        };
        // the next cave is baked before this one is settled; a cave that can
        // not be baked ends the game instead of leaving this one current
        let started = match next {
            Some(cave) if cave.0 < self.caveset.len() => Some(
                Self::start_cave(
                    self.caveset,
                    self.config,
                    cave,
                    self.level,
                    self.seed,
                    &self.player_name,
                )
                .map(|(instance, replay)| (cave, instance, replay)),
            ),
            _ => None,
        };

        self.end_cave(outcome);
        self.lives = lives;
        match started {
            Some(Ok((cave, instance, replay))) => {
                self.cave = cave;
                self.instance = instance;
                self.replay = replay;
            }
            Some(Err(err)) => {
                self.over = true;
                warn!(%err, "next cave can not be played, game over");
                return Err(err);
            }
            None => {
                self.over = true;
                debug!(score = self.score, "game over");
                events.push(SessionEvent::GameOver);
            }
        }
        Ok(events)
    }

    fn end_cave(&mut self, outcome: CaveOutcome) {
        self.score += self.instance.score();
        let mut replay = std::mem::replace(&mut self.replay, Replay::new(self.level, self.seed));
        replay.score = self.instance.score();
        replay.success = outcome == CaveOutcome::Success;
        self.finished.push((self.cave, replay));
    }

    /// total score, including the cave being played
    pub fn score(&self) -> u32 {
        if self.over {
            self.score
        } else {
            self.score + self.instance.score()
        }
    }

    #[allow(missing_docs)]
    pub fn lives(&self) -> u32 {
        self.lives
    }

    #[allow(missing_docs)]
    pub fn cave(&self) -> CaveId {
        self.cave
    }

    #[allow(missing_docs)]
    pub fn instance(&self) -> &CaveInstance {
        &self.instance
    }

    #[allow(missing_docs)]
    pub fn is_over(&self) -> bool {
        self.over
    }

    /// the status bar of the whole game
    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score(),
            lives: Some(self.lives),
            ..self.instance.hud()
        }
    }

    /// replays of every cave finished so far
    pub fn replays(&self) -> &[(CaveId, Replay)] {
        &self.finished
    }

    /// enters the total score in to a table, returning the rank it got
    pub fn submit_highscore(&self, table: &mut HighScoreTable) -> Option<usize> {
        table.insert(&self.player_name, self.score())
    }
}
