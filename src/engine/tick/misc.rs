use super::Scan;
use crate::element::{Axis, Element, Sound};
use crate::types::{Coordinate, Direction};

impl Scan<'_> {
    /// crumbles after something heavy rested on it long enough
    pub(super) fn loose_dirt(&mut self, pos: Coordinate) {
        let above = self.get_dir(pos, self.gravity().opposite());
        if !above.properties().can_fall {
            self.set_timer(pos, 0);
            return;
        }
        let timer = self.timer(pos) + 1;
        if timer >= self.cave.effects.loose_dirt_decay_ticks {
            self.store(pos, Element::Space);
            self.sound(Sound::Dirt, pos);
        } else {
            self.set_timer(pos, timer);
        }
    }

    fn slime_lets_through(&mut self) -> bool {
        if self.config.slime_predictable {
            let mask = self.cave.params.slime_permeability_c64;
            self.cave.c64_rng.next_byte() & mask == 0
        } else {
            let permeability = self.cave.params.slime_permeability;
            self.rand_prob(permeability)
        }
    }

    /// lets some elements resting on it drop through, converted
    pub(super) fn slime(&mut self, pos: Coordinate) {
        if !self.slime_lets_through() {
            return;
        }
        let down = self.gravity();
        let above = self.get_dir(pos, down.opposite());
        if !self.is_space_dir(pos, down) {
            return;
        }
        let effects = &self.cave.effects;
        let converted = effects
            .slime_eats
            .iter()
            .zip(effects.slime_converts_to.iter())
            .find(|(eats, _)| **eats == above)
            .map(|(_, to)| *to);
        if let Some(converted) = converted {
            self.store_dir(pos, down, converted);
            self.store_dir(pos, down.opposite(), Element::Space);
            self.sound(Sound::Slime, pos);
        }
    }

    /// eats its neighbours now and then, and is used up doing so
    pub(super) fn acid(&mut self, pos: Coordinate) {
        let ratio = self.cave.effects.acid_spread_ratio;
        if !self.rand_prob(ratio) {
            return;
        }
        let eats = self.cave.effects.acid_eats;
        let mut ate = false;
        for dir in Direction::MAIN.iter() {
            if self.get_dir(pos, *dir) == eats {
                self.store_dir(pos, *dir, Element::Acid);
                ate = true;
            }
        }
        if ate {
            let turns_to = self.cave.effects.acid_turns_to;
            self.store(pos, turns_to);
            self.sound(Sound::Acid, pos);
        }
    }

    /// floods every empty neighbour
    pub(super) fn water(&mut self, pos: Coordinate) {
        let down = self.gravity();
        let mut flowed = false;
        for dir in Direction::MAIN.iter() {
            if *dir == down && self.cave.effects.water_does_not_flow_down {
                continue;
            }
            if self.is_space_dir(pos, *dir) {
                self.store_dir(pos, *dir, Element::Water);
                flowed = true;
            }
        }
        if flowed {
            self.sound(Sound::Water, pos);
        }
    }

    /// copies what sits on top of it in to the space below it
    pub(super) fn replicator(&mut self, pos: Coordinate) {
        if !self.cave.switches.replicators_active || self.cave.replicator_counter != 0 {
            return;
        }
        let down = self.gravity();
        let above = self.get_dir(pos, down.opposite());
        if above.properties().can_fall && self.is_space_dir(pos, down) {
            self.store_dir(pos, down, above.falling().unwrap_or(above));
            self.sound(Sound::Replicator, pos);
        }
    }

    pub(super) fn conveyor(&mut self, pos: Coordinate, element: Element) {
        if !self.cave.switches.conveyors_active {
            return;
        }
        let down = self.gravity();
        let top = pos.step(down.opposite());
        let carried = self.get(top);
        if !carried.properties().moved_by_conveyor {
            return;
        }
        let moves_left = (element == Element::ConveyorLeft) == self.cave.switches.conveyors_left;
        let dir = if moves_left {
            down.cw_fourth()
        } else {
            down.ccw_fourth()
        };
        if self.is_space_dir(top, dir) {
            self.move_dir(top, dir, carried);
        }
    }

    pub(super) fn expanding_wall(&mut self, pos: Coordinate, axis: Axis) {
        let grows = match (axis, self.cave.switches.expanding_wall_changed) {
            (Axis::Horizontal, false) | (Axis::Vertical, true) => Axis::Horizontal,
            (Axis::Vertical, false) | (Axis::Horizontal, true) => Axis::Vertical,
            (Axis::Both, _) => Axis::Both,
        };
        let dirs: &[Direction] = match grows {
            Axis::Horizontal => &[Direction::Left, Direction::Right],
            Axis::Vertical => &[Direction::Up, Direction::Down],
            Axis::Both => &Direction::MAIN,
        };
        let mut grew = false;
        for dir in dirs.iter() {
            if self.is_space_dir(pos, *dir) {
                self.store_dir(pos, *dir, Element::ExpandingWall(axis));
                grew = true;
            }
        }
        if grew {
            self.sound(Sound::ExpandingWall, pos);
        }
    }

    /// rises against gravity, and turns in to a clock when it touches its converter
    pub(super) fn bladder(&mut self, pos: Coordinate) {
        let converter = self.cave.effects.bladder_converts_by;
        if Direction::MAIN
            .iter()
            .any(|d| self.get_dir(pos, *d) == converter)
        {
            self.store(pos, Element::Clock);
            self.sound(Sound::Bladder, pos);
            return;
        }
        let up = self.gravity().opposite();
        if self.is_space_dir(pos, up) {
            self.move_dir(pos, up, Element::Bladder);
        } else if let Some(side) = self.roll_side(pos, up) {
            self.move_dir(pos, side, Element::Bladder);
        }
    }

    pub(super) fn bladder_spender(&mut self, pos: Coordinate) {
        let up = self.gravity().opposite();
        if self.is_space_dir(pos, up) {
            self.store_dir(pos, up, Element::Bladder);
            self.store(pos, Element::Steel);
            self.sound(Sound::Bladder, pos);
        }
    }

    pub(super) fn pre_outbox(&mut self, pos: Coordinate, element: Element) {
        if !self.cave.gate_open {
            return;
        }
        let open = match element {
            Element::PreInvisibleOutbox => Element::InvisibleOutbox,
            _ => Element::Outbox,
        };
        self.store(pos, open);
    }
}
