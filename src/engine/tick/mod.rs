//! Advancing a cave by one tick.
//!
//! The cells are scanned row by row from the top, left to right. A rule that
//! moves an element marks its destination as scanned, so an element moving
//! down or right is not handled twice in the same tick. Cells earlier in the
//! scan already show their new state to the cells after them; the classic
//! engines worked like that and caves depend on it.
mod amoeba;
mod creatures;
mod explosion;
mod falling;
mod misc;
mod player;

use super::instance::{
    AmoebaState, CaveInstance, CaveOutcome, Effect, MagicWallState, ParticleKind, Phase,
    PlayerState, TickReport,
};
use super::scheduling::{frame_length, FrameTiming};
use super::EngineConfig;
use crate::cave::PROBABILITY_ONE;
use crate::element::{Element, ExplosionKind, Sound};
use crate::types::{Coordinate, Direction, ElementQueryableCave, PlayerInput, SimulableCave};
use rand::Rng;
use tracing::{debug, instrument, warn};

/// ticks an active player may go missing from the scan before counting as dead
const PLAYER_UNSEEN_LIMIT: u32 = 15;
/// ticks the screen flashes after the exit opened
const FLASH_TICKS: u32 = 4;

/// One scan of the cave: the instance being changed and what the rules of
/// this tick have found out so far.
#[derive(Debug)]
struct Scan<'a> {
    cave: &'a mut CaveInstance,
    config: &'a EngineConfig,
    input: PlayerInput,
    /// the active player already took its move
    player_seen: bool,
    /// an amoeba cell of either kind found room to grow
    amoeba_room: [bool; 2],
    /// number of stores that changed an element
    changed: usize,
}

impl<'a> Scan<'a> {
    fn new(cave: &'a mut CaveInstance, config: &'a EngineConfig, input: PlayerInput) -> Self {
        Scan {
            cave,
            config,
            input,
            player_seen: false,
            amoeba_room: [false; 2],
            changed: 0,
        }
    }

    fn wrap(&self, pos: Coordinate) -> Option<Coordinate> {
        self.cave.map.wrap(pos, self.config.wrap)
    }

    /// the element at `pos`, steel outside a closed map
    fn get(&self, pos: Coordinate) -> Element {
        self.wrap(pos)
            .and_then(|pos| self.cave.map.get(pos))
            .map_or(Element::Steel, |cell| cell.element)
    }

    fn get_dir(&self, pos: Coordinate, dir: Direction) -> Element {
        self.get(pos.step(dir))
    }

    fn is_space(&self, pos: Coordinate) -> bool {
        self.get(pos) == Element::Space
    }

    fn is_space_dir(&self, pos: Coordinate, dir: Direction) -> bool {
        self.is_space(pos.step(dir))
    }

    fn gravity(&self) -> Direction {
        self.cave.switches.gravity
    }

    /// Puts an element in a cell and marks it scanned. Stores outside a
    /// closed map are dropped.
    fn store(&mut self, pos: Coordinate, element: Element) {
        let wrapped = match self.wrap(pos) {
            Some(wrapped) => wrapped,
            None => {
                warn!(%pos, ?element, "store outside the cave ignored");
                return;
            }
        };
        if let Some(cell) = self.cave.map.get_mut(wrapped) {
            cell.scanned = true;
            if cell.element != element {
                cell.element = element;
                cell.timer = 0;
                self.changed += 1;
                self.cave.dirty.mark(wrapped);
            }
        }
    }

    fn store_dir(&mut self, pos: Coordinate, dir: Direction, element: Element) {
        self.store(pos.step(dir), element);
    }

    /// moves whatever is at `pos` one step, leaving space behind
    fn move_dir(&mut self, pos: Coordinate, dir: Direction, element: Element) {
        self.store_dir(pos, dir, element);
        self.store(pos, Element::Space);
    }

    fn timer(&self, pos: Coordinate) -> u16 {
        self.cave.map.get(pos).map_or(0, |cell| cell.timer)
    }

    fn set_timer(&mut self, pos: Coordinate, timer: u16) {
        if let Some(cell) = self.cave.map.get_mut(pos) {
            cell.timer = timer;
        }
    }

    /// true with a probability of `prob` millionths
    fn rand_prob(&mut self, prob: i32) -> bool {
        self.cave.rng.gen_range(0..PROBABILITY_ONE) < prob
    }

    fn sound(&mut self, sound: Sound, pos: Coordinate) {
        if self.config.sound_hints {
            self.cave.effect_queue.push(Effect::Sound {
                sound,
                pos: Some(pos),
            });
        }
    }

    fn particles(&mut self, kind: ParticleKind, pos: Coordinate) {
        if self.config.particle_hints {
            self.cave.effect_queue.push(Effect::Particles { kind, pos });
        }
    }

    fn run(&mut self) {
        for cell in self.cave.map.iter_mut() {
            cell.scanned = false;
        }
        let height = self.cave.map.height();
        let rows = if self.config.border_scan_first_and_last {
            0..height
        } else {
            1..height - 1
        };
        let width = self.cave.map.width();
        for y in rows {
            for x in 0..width {
                let pos = Coordinate::new(x, y);
                let cell = match self.cave.map.get(pos) {
                    Some(cell) if !cell.scanned => *cell,
                    _ => continue,
                };
                if !cell.element.is_valid() {
                    debug_assert!(false, "invalid element {:?} at {}", cell.element, pos);
                    warn!(%pos, element = ?cell.element, "invalid element replaced by space");
                    self.store(pos, Element::Space);
                    continue;
                }
                self.cell(pos, cell.element);
            }
        }
    }

    /// applies the rule of one element
    fn cell(&mut self, pos: Coordinate, element: Element) {
        match element {
            Element::Stone
            | Element::Diamond
            | Element::MegaStone
            | Element::NitroPack
            | Element::Nut
            | Element::DirtBall
            | Element::FlyingStone
            | Element::FlyingDiamond => self.resting(pos, element),
            Element::StoneFalling
            | Element::DiamondFalling
            | Element::MegaStoneFalling
            | Element::NitroPackFalling
            | Element::NutFalling
            | Element::DirtBallFalling
            | Element::FlyingStoneFlying
            | Element::FlyingDiamondFlying => self.falling(pos, element),
            Element::Creature(kind, dir) => self.creature(pos, kind, dir),
            Element::CowEnclosed(ticks) => self.cow_enclosed(pos, ticks),
            Element::Player | Element::PlayerBomb => self.player(pos, element),
            Element::PlayerPneumatic(side) => self.hammering(pos, side),
            Element::Inbox => self.inbox(pos),
            Element::PrePlayer(stage) => self.pre_player(pos, stage),
            Element::Amoeba | Element::Amoeba2 => self.amoeba(pos, element),
            Element::Explosion(kind, stage) => self.explosion(pos, kind, stage),
            Element::NitroPackExplode => self.explode(pos, element.properties().explosion_result),
            Element::BombTick(stage) => self.bomb_tick(pos, stage),
            Element::DirtLoose => self.loose_dirt(pos),
            Element::Slime => self.slime(pos),
            Element::Acid => self.acid(pos),
            Element::Water => self.water(pos),
            Element::Replicator => self.replicator(pos),
            Element::ConveyorLeft | Element::ConveyorRight => self.conveyor(pos, element),
            Element::ExpandingWall(axis) => self.expanding_wall(pos, axis),
            Element::Bladder => self.bladder(pos),
            Element::BladderSpender => self.bladder_spender(pos),
            Element::TrappedDiamond => {
                if self.cave.diamond_key_collected {
                    self.store(pos, Element::Diamond);
                }
            }
            Element::PreOutbox | Element::PreInvisibleOutbox => self.pre_outbox(pos, element),
            _ => {}
        }
    }
}

impl CaveInstance {
    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            debug!(from = ?self.phase, to = ?phase, frame = self.frame, "phase");
            self.phase = phase;
        }
    }

    fn set_player_state(&mut self, state: PlayerState) {
        if self.player_state != state {
            debug!(from = ?self.player_state, to = ?state, frame = self.frame, "player");
            self.player_state = state;
        }
    }

    fn global_sound(&mut self, config: &EngineConfig, sound: Sound) {
        if config.sound_hints {
            self.effect_queue.push(Effect::Sound { sound, pos: None });
        }
    }

    /// the exit opens and later diamonds are worth more
    fn open_gate(&mut self, config: &EngineConfig) {
        self.gate_open = true;
        self.diamond_value = self.params.extra_diamond_value;
        self.flash_ticks = FLASH_TICKS;
        self.effect_queue.push(Effect::Flash);
        self.global_sound(config, Sound::Crack);
        debug!(frame = self.frame, "exit open");
    }

    fn uncover(&mut self) {
        let total = self.map.width() * self.map.height();
        if self.uncover_left <= 1 {
            for pos in self.map.positions().collect::<Vec<_>>() {
                if let Some(cell) = self.map.get_mut(pos) {
                    if cell.covered {
                        cell.covered = false;
                        self.dirty.mark(pos);
                    }
                }
            }
            self.uncover_left = 0;
            self.set_phase(Phase::Playing);
            return;
        }
        let per_tick = (total as u32 + self.uncover_left - 1) / self.uncover_left;
        let width = self.map.width();
        for _ in 0..per_tick {
            let index = self.rng.gen_range(0..total);
            let pos = Coordinate::new(index % width, index / width);
            if let Some(cell) = self.map.get_mut(pos) {
                if cell.covered {
                    cell.covered = false;
                    self.dirty.mark(pos);
                }
            }
        }
        self.uncover_left -= 1;
    }

    fn wake_amoebas(&mut self, config: &EngineConfig) {
        if config.amoeba_timer_wait_for_hatching && !self.hatched {
            return;
        }
        for tracker in [&mut self.amoeba, &mut self.amoeba2] {
            if tracker.state == AmoebaState::Sleeping {
                tracker.state = AmoebaState::Awake;
            }
        }
    }

    fn hatch(&mut self, config: &EngineConfig) {
        if self.hatched {
            return;
        }
        self.hatching_delay = self.hatching_delay.saturating_sub(1);
        if self.hatching_delay == 0 {
            self.hatched = true;
            self.global_sound(config, Sound::Hatching);
            debug!(frame = self.frame, "hatched");
        }
    }

    /// settles what the scan found out
    fn after_scan(&mut self, config: &EngineConfig, scan_amoeba_room: [bool; 2], counts: [usize; 2]) {
        let magic_active = self.magic_wall == MagicWallState::Active;
        for (i, tracker) in [&mut self.amoeba, &mut self.amoeba2].iter_mut().enumerate() {
            tracker.count = counts[i];
            if tracker.state != AmoebaState::Awake {
                continue;
            }
            if counts[i] >= tracker.threshold {
                tracker.state = AmoebaState::TooBig;
            } else if !scan_amoeba_room[i] || (config.magic_wall_stops_amoeba && magic_active) {
                tracker.state = AmoebaState::Enclosed;
            }
        }

        if self.diamonds_needed == 0 && !self.gate_open {
            self.open_gate(config);
        }
    }

    /// timers counting in game time
    fn run_timers(&mut self, config: &EngineConfig) {
        let elapsed = self.frame_ms as i32;
        let player_started = config.amoeba_timer_started_immediately || self.player_moved;
        for tracker in [&mut self.amoeba, &mut self.amoeba2] {
            if tracker.state == AmoebaState::Awake && player_started {
                tracker.time_left = (tracker.time_left - elapsed).max(0);
            }
        }

        if self.magic_wall == MagicWallState::Active
            && (!config.magic_timer_wait_for_hatching || self.hatched)
            && !(config.magic_timer_zero_is_infinite && self.params.magic_wall_time == 0)
        {
            self.magic_wall_time_left -= elapsed;
            if self.magic_wall_time_left <= 0 {
                self.magic_wall = MagicWallState::Expired;
                debug!(frame = self.frame, "magic wall expired");
            }
        }

        let switches = &mut self.switches;
        if switches.gravity_will_change > 0 {
            switches.gravity_will_change -= elapsed;
            if switches.gravity_will_change <= 0 {
                switches.gravity_will_change = 0;
                switches.gravity = switches.gravity_next;
                debug!(gravity = %switches.gravity, "gravity changed");
                self.global_sound(config, Sound::GravityChange);
            }
        }

        let switches = &mut self.switches;
        let auto_change = self.effects.creatures_direction_auto_change_time as i32 * self.timing_factor;
        if auto_change > 0 {
            switches.creatures_direction_will_change -= elapsed;
            if switches.creatures_direction_will_change <= 0 {
                switches.creatures_backwards = !switches.creatures_backwards;
                switches.creatures_direction_will_change = auto_change;
            }
        }

        let replicator_delay = self.effects.replicator_delay_frame;
        self.replicator_counter = if self.replicator_counter == 0 {
            replicator_delay
        } else {
            self.replicator_counter - 1
        };
        let biter_delay = self.switches.biter_delay_frame;
        self.biter_counter = if self.biter_counter >= biter_delay {
            0
        } else {
            self.biter_counter + 1
        };

        let mut restored = Vec::new();
        for wall in self.reappearing_walls.iter_mut() {
            wall.frames_left = wall.frames_left.saturating_sub(1);
            if wall.frames_left == 0 {
                restored.push((wall.pos, wall.element));
            }
        }
        for (pos, element) in restored {
            if let Some(cell) = self.map.get_mut(pos) {
                if cell.element == Element::Space {
                    cell.element = element;
                    self.dirty.mark(pos);
                    self.reappearing_walls.retain(|w| w.pos != pos);
                }
            }
        }
    }

    fn run_clock(&mut self, config: &EngineConfig) {
        if !self.hatched || self.player_state == PlayerState::Exited {
            return;
        }
        let before = self.time_left();
        self.time -= self.frame_ms as i32;
        let after = self.time_left();
        if after != before && (1..=9).contains(&after) {
            self.global_sound(config, Sound::TimeoutWarning(after as u8));
        }
    }

    fn check_player(&mut self, seen: bool) {
        match self.player_state {
            PlayerState::Alive if seen => self.player_unseen = 0,
            PlayerState::Alive => {
                self.player_unseen += 1;
                if self.player_unseen > PLAYER_UNSEEN_LIMIT {
                    warn!(frame = self.frame, "player lost from the cave");
                    self.set_player_state(PlayerState::Dead);
                }
            }
            PlayerState::Exploding => {
                self.player_exploding = self.player_exploding.saturating_sub(1);
                if self.player_exploding == 0 {
                    self.set_player_state(PlayerState::Dead);
                }
            }
            _ => {}
        }
    }

    fn playing(&mut self, config: &EngineConfig, input: PlayerInput) -> usize {
        self.hatch(config);
        self.wake_amoebas(config);

        let mut scan = Scan::new(self, config, input);
        scan.run();
        if scan.cave.kill_player {
            scan.cave.kill_player = false;
            if let (PlayerState::Alive, Some(pos)) = (scan.cave.player_state, scan.cave.player_pos) {
                scan.explode(pos, ExplosionKind::Space);
            }
        }
        let (seen, room, changed) = (scan.player_seen, scan.amoeba_room, scan.changed);

        // counted after the scan, so cells grown this tick are included
        let counts = [
            self.count_elements(|e| e == Element::Amoeba),
            self.count_elements(|e| e == Element::Amoeba2),
        ];
        self.after_scan(config, room, counts);
        self.check_player(seen);
        self.frame_ms = self.frame_length(config);
        self.run_timers(config);
        self.run_clock(config);

        if self.player_state == PlayerState::Exited {
            self.outcome = Some(CaveOutcome::Success);
            self.set_phase(Phase::Success);
        } else if self.player_state == PlayerState::Dead {
            self.outcome = Some(CaveOutcome::Dead);
            self.set_phase(Phase::Dead);
        } else if self.hatched && self.time <= 0 {
            self.time = 0;
            if self.player_state == PlayerState::Alive {
                self.set_player_state(PlayerState::TimedOut);
            }
            self.outcome = Some(CaveOutcome::Timeout);
            self.global_sound(config, Sound::Timeout);
            self.set_phase(Phase::Timeout);
        }
        changed
    }

    /// converts one second left in to score
    fn count_bonus(&mut self, config: &EngineConfig) {
        if self.time > 0 {
            self.time = (self.time - self.timing_factor).max(0);
            self.score += self.params.time_value;
            self.global_sound(config, Sound::Bonus);
        } else {
            self.set_phase(Phase::GameOver);
        }
    }

    fn frame_length(&self, config: &EngineConfig) -> u32 {
        frame_length(
            config.scheduling,
            FrameTiming {
                speed: self.params.speed,
                c64_timing: self.params.c64_timing,
                ckdelay: self.ckdelay,
                intermission: self.intermission,
                hammered_walls_reappear: self.effects.hammered_walls_reappear,
            },
        )
    }
}

impl SimulableCave for CaveInstance {
    #[instrument(level = "trace", skip_all)]
    fn tick(&mut self, config: &EngineConfig, input: PlayerInput) -> TickReport {
        self.frame = self.frame.wrapping_add(1);
        self.ckdelay = 0;
        let before = self.dirty.len();
        let changed = match self.phase {
            Phase::Uncovering => {
                self.uncover();
                self.frame_ms = self.frame_length(config);
                self.dirty.len().saturating_sub(before)
            }
            Phase::Playing => self.playing(config, input),
            Phase::Success => {
                self.count_bonus(config);
                0
            }
            Phase::Timeout | Phase::Dead => {
                self.set_phase(Phase::GameOver);
                0
            }
            Phase::GameOver => 0,
        };
        self.flash_ticks = self.flash_ticks.saturating_sub(1);
        TickReport {
            phase: self.phase,
            player_state: self.player_state,
            frame_ms: self.frame_ms,
            changed_cells: changed,
        }
    }
}

#[cfg(test)]
mod tests;
