use super::Scan;
use crate::element::{Element, ExplosionKind, Side, Sound, PRE_PLAYER_STAGES};
use crate::engine::instance::{ParticleKind, PlayerState, ReappearingWall};
use crate::types::{Coordinate, Direction};

/// the horizontal half of a diagonal, for engines without diagonal movement
fn horizontal_part(dir: Direction) -> Direction {
    match dir {
        Direction::UpRight | Direction::DownRight => Direction::Right,
        Direction::UpLeft | Direction::DownLeft => Direction::Left,
        other => other,
    }
}

impl Scan<'_> {
    /// One diamond more collected, from a player or a voodoo doll.
    pub(super) fn collect_diamond(&mut self, pos: Coordinate) {
        self.count_diamond();
        self.particles(ParticleKind::Sparkle, pos);
        self.sound(Sound::DiamondCollect, pos);
    }

    fn count_diamond(&mut self) {
        let cave = &mut *self.cave;
        cave.diamonds_collected += 1;
        cave.score += cave.diamond_value;
        cave.diamonds_needed = cave.diamonds_needed.saturating_sub(1);
    }

    /// The player moving, digging, collecting and pushing.
    ///
    /// With `active_is_first_found` only the first player element of the
    /// scan follows the input; the others stand still.
    pub(super) fn player(&mut self, pos: Coordinate, element: Element) {
        if self.player_seen && self.config.active_is_first_found {
            return;
        }
        self.player_seen = true;
        self.cave.player_pos = Some(pos);
        if self.cave.player_state != PlayerState::Alive || !self.cave.hatched {
            return;
        }
        if self.input.suicide {
            self.explode(pos, ExplosionKind::Space);
            return;
        }

        let mut dir = self.input.direction;
        if dir.is_diagonal() && !self.config.diagonal_movements {
            dir = horizontal_part(dir);
        }
        self.cave.last_move = dir;
        if dir == Direction::Still {
            return;
        }
        self.cave.player_moved = true;

        let fire = self.input.fire;
        if fire && element == Element::PlayerBomb && self.place_bomb(pos, dir) {
            return;
        }
        if fire && self.start_hammer(pos, dir) {
            return;
        }

        let target_pos = pos.step(dir);
        let target = self.get(target_pos);
        match target {
            Element::Outbox | Element::InvisibleOutbox if !fire && self.cave.gate_open => {
                self.store(pos, Element::Space);
                self.cave.player_pos = self.wrap(target_pos);
                self.cave.set_player_state(PlayerState::Exited);
            }
            Element::TimePenalty => {
                let penalty = self.cave.params.penalty_time * self.cave.timing_factor;
                self.cave.time = (self.cave.time - penalty).max(0);
                self.store(target_pos, Element::Gravestone);
            }
            Element::Teleporter if !fire => self.teleport(pos, dir, element),
            Element::GravitySwitch
            | Element::CreatureSwitch
            | Element::ExpandingWallSwitch
            | Element::BiterSwitch
            | Element::ReplicatorSwitch
            | Element::ConveyorSwitch
            | Element::ConveyorDirSwitch => self.flip_switch(target_pos, target, dir),
            Element::Bomb if element == Element::Player => {
                if fire {
                    let snapped = self.cave.effects.snap_element;
                    self.store(target_pos, snapped);
                    self.store(pos, Element::PlayerBomb);
                } else {
                    self.move_dir(pos, dir, Element::PlayerBomb);
                    self.cave.player_pos = self.wrap(target_pos);
                }
                self.sound(Sound::Bomb, target_pos);
            }
            Element::Space if fire => {}
            _ if self.take(target_pos, target) => {
                if fire {
                    let snapped = self.cave.effects.snap_element;
                    self.store(target_pos, snapped);
                } else {
                    self.move_dir(pos, dir, element);
                    self.cave.player_pos = self.wrap(target_pos);
                }
            }
            _ if !fire && target.properties().pushable => {
                self.push(pos, dir, element, target_pos, target)
            }
            _ => {}
        }
    }

    /// Picks up or digs what is at `at`. False if the player can not enter
    /// the cell; nothing changes then.
    fn take(&mut self, at: Coordinate, element: Element) -> bool {
        let props = element.properties();
        match element {
            Element::Space => {
                self.sound(Sound::Walk, at);
                true
            }
            _ if props.diggable => {
                self.particles(ParticleKind::Dust, at);
                self.sound(props.sound.unwrap_or(Sound::Dirt), at);
                true
            }
            Element::Diamond | Element::FlyingDiamond => {
                self.collect_diamond(at);
                true
            }
            Element::Clock => {
                let cave = &mut *self.cave;
                let max = self.config.max_time * cave.timing_factor;
                let bonus = cave.params.bonus_time * cave.timing_factor;
                cave.time = (cave.time + bonus).min(max);
                self.sound(Sound::Clock, at);
                true
            }
            Element::Sweet => {
                self.cave.sweet_eaten = true;
                self.sound(Sound::Sweet, at);
                true
            }
            Element::PneumaticHammer => {
                self.cave.got_pneumatic_hammer = true;
                self.sound(Sound::Pneumatic, at);
                true
            }
            Element::Key(color) => {
                self.cave.keys[color.as_index()] += 1;
                self.sound(Sound::Key, at);
                true
            }
            Element::Door(color) => {
                let keys = &mut self.cave.keys[color.as_index()];
                if *keys == 0 {
                    return false;
                }
                *keys -= 1;
                self.sound(Sound::Door, at);
                true
            }
            Element::DiamondKey => {
                self.cave.diamond_key_collected = true;
                self.sound(Sound::Key, at);
                true
            }
            Element::Skeleton => {
                self.cave.skeletons_collected += 1;
                for _ in 0..self.cave.effects.skeletons_worth_diamonds {
                    self.count_diamond();
                }
                self.sound(Sound::Skeleton, at);
                true
            }
            _ => false,
        }
    }

    /// Pushes the element in front of the player one cell further. Only
    /// sideways to gravity, except for bladders.
    fn push(
        &mut self,
        pos: Coordinate,
        dir: Direction,
        element: Element,
        target_pos: Coordinate,
        target: Element,
    ) {
        let down = self.gravity();
        if !dir.is_main() || (target != Element::Bladder && (dir == down || dir == down.opposite())) {
            return;
        }
        let beyond = target_pos.step(dir);
        if !self.is_space(beyond) {
            return;
        }
        let sweet = self.cave.sweet_eaten;
        let pushed = match target {
            Element::MegaStone => sweet && self.cave.effects.mega_stones_pushable_with_sweet,
            Element::NitroPack | Element::Bladder => true,
            _ => {
                let prob = if sweet {
                    self.cave.effects.pushing_stone_prob_sweet
                } else {
                    self.cave.effects.pushing_stone_prob
                };
                self.rand_prob(prob)
            }
        };
        if pushed {
            self.store(beyond, target);
            self.move_dir(pos, dir, element);
            self.cave.player_pos = self.wrap(target_pos);
            self.sound(Sound::Push, target_pos);
        }
    }

    fn place_bomb(&mut self, pos: Coordinate, dir: Direction) -> bool {
        if !dir.is_main() || !self.is_space_dir(pos, dir) {
            return false;
        }
        self.store_dir(pos, dir, Element::BombTick(1));
        self.store(pos, Element::Player);
        self.sound(Sound::Bomb, pos);
        true
    }

    /// Starts breaking the wall diagonally below the player, to the left or
    /// right. The side cell must be empty for the hammer.
    fn start_hammer(&mut self, pos: Coordinate, dir: Direction) -> bool {
        let side = match dir {
            Direction::Left => Side::Left,
            Direction::Right => Side::Right,
            _ => return false,
        };
        if !self.cave.got_pneumatic_hammer || !self.is_space_dir(pos, dir) {
            return false;
        }
        let wall = pos.step(dir).step(self.gravity());
        if !self.get(wall).properties().can_be_hammered {
            return false;
        }
        let frames = self.cave.effects.pneumatic_hammer_frames.max(1);
        self.store(pos, Element::PlayerPneumatic(side));
        self.store_dir(pos, dir, Element::PneumaticActive(side));
        self.cave.pneumatic_hammer = Some((wall, frames));
        self.sound(Sound::Pneumatic, wall);
        true
    }

    /// the player working the hammer
    pub(super) fn hammering(&mut self, pos: Coordinate, side: Side) {
        self.player_seen = true;
        self.cave.player_pos = Some(pos);
        let (wall, frames) = match self.cave.pneumatic_hammer {
            Some(hammer) => hammer,
            None => {
                self.store(pos, Element::Player);
                return;
            }
        };
        if frames > 1 {
            self.cave.pneumatic_hammer = Some((wall, frames - 1));
            return;
        }
        self.cave.pneumatic_hammer = None;
        let broken = self.get(wall);
        if self.cave.effects.hammered_walls_reappear {
            if let Some(wrapped) = self.wrap(wall) {
                self.cave.reappearing_walls.push(ReappearingWall {
                    pos: wrapped,
                    element: broken,
                    frames_left: self.cave.effects.hammered_wall_reappear_frames,
                });
            }
        }
        self.store(wall, Element::Space);
        self.store_dir(pos, side.direction(), Element::Space);
        self.store(pos, Element::Player);
        self.particles(ParticleKind::Debris, wall);
    }

    /// Sends the player through the teleporter in front of it. The next
    /// teleporter in scan order with room behind it, in the direction of
    /// the move, is the exit.
    fn teleport(&mut self, pos: Coordinate, dir: Direction, element: Element) {
        let entry = match self.wrap(pos.step(dir)) {
            Some(entry) => entry,
            None => return,
        };
        let width = self.cave.map.width();
        let total = width * self.cave.map.height();
        let start = entry.y * width + entry.x;
        let exit = (1..=total)
            .map(|offset| {
                let index = (start + offset) % total;
                Coordinate::new(index % width, index / width)
            })
            .filter(|candidate| self.get(*candidate) == Element::Teleporter)
            .map(|teleporter| teleporter.step(dir))
            .find(|exit| self.is_space(*exit));
        if let Some(exit) = exit {
            self.store(exit, element);
            self.store(pos, Element::Space);
            self.cave.player_pos = self.wrap(exit);
            self.sound(Sound::Teleporter, exit);
        }
    }

    fn flip_switch(&mut self, at: Coordinate, switch: Element, dir: Direction) {
        let factor = self.cave.timing_factor;
        let change_time = self.cave.effects.gravity_change_time as i32;
        let switches = &mut self.cave.switches;
        match switch {
            Element::GravitySwitch => {
                if !switches.gravity_switch_active || !dir.is_main() {
                    return;
                }
                switches.gravity_next = dir;
                switches.gravity_will_change = (change_time * factor).max(1);
            }
            Element::CreatureSwitch => switches.creatures_backwards = !switches.creatures_backwards,
            Element::ExpandingWallSwitch => {
                switches.expanding_wall_changed = !switches.expanding_wall_changed
            }
            Element::BiterSwitch => switches.biter_delay_frame = (switches.biter_delay_frame + 1) % 4,
            Element::ReplicatorSwitch => switches.replicators_active = !switches.replicators_active,
            Element::ConveyorSwitch => switches.conveyors_active = !switches.conveyors_active,
            Element::ConveyorDirSwitch => switches.conveyors_left = !switches.conveyors_left,
            _ => return,
        }
        self.sound(Sound::Switch, at);
    }

    /// the inbox turns in to the player once the cave hatched
    pub(super) fn inbox(&mut self, pos: Coordinate) {
        if self.cave.hatched && self.cave.player_state == PlayerState::NotYetBorn {
            self.store(pos, Element::PrePlayer(1));
        }
    }

    pub(super) fn pre_player(&mut self, pos: Coordinate, stage: u8) {
        if stage < PRE_PLAYER_STAGES {
            self.store(pos, Element::PrePlayer(stage + 1));
        } else {
            self.store(pos, Element::Player);
            self.cave.player_pos = Some(pos);
            self.cave.set_player_state(PlayerState::Alive);
        }
    }
}
