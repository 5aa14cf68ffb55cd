use super::Scan;
use crate::element::{CreatureKind, Element, ExplosionKind, COW_ENCLOSED_TICKS};
use crate::types::{Coordinate, Dir4, Direction};

impl Scan<'_> {
    pub(super) fn creature(&mut self, pos: Coordinate, kind: CreatureKind, dir: Dir4) {
        match kind {
            CreatureKind::Cow => self.cow(pos, dir),
            CreatureKind::Biter => self.biter(pos, dir),
            _ => self.fly(pos, kind, dir),
        }
    }

    /// The turn a creature tries first and the one it falls back to.
    /// Switching creatures backwards swaps them.
    fn turns(&self, kind: CreatureKind, dir: Dir4) -> (Dir4, Dir4) {
        if kind.rotates_ccw() != self.cave.switches.creatures_backwards {
            (dir.ccw(), dir.cw())
        } else {
            (dir.cw(), dir.ccw())
        }
    }

    /// fireflies, butterflies and their relatives
    fn fly(&mut self, pos: Coordinate, kind: CreatureKind, dir: Dir4) {
        let touching = Direction::MAIN
            .iter()
            .any(|d| self.get_dir(pos, *d).properties().blows_up_flies);
        if touching {
            let explosion = self.explosion_kind_of(Element::Creature(kind, dir));
            self.explode(pos, explosion);
            return;
        }

        let (preferred, fallback) = self.turns(kind, dir);
        if kind == CreatureKind::Dragonfly {
            if self.is_space_dir(pos, dir.direction()) {
                self.move_dir(pos, dir.direction(), Element::Creature(kind, dir));
            } else {
                self.store(pos, Element::Creature(kind, preferred));
            }
        } else if self.is_space_dir(pos, preferred.direction()) {
            self.move_dir(pos, preferred.direction(), Element::Creature(kind, preferred));
        } else if self.is_space_dir(pos, dir.direction()) {
            self.move_dir(pos, dir.direction(), Element::Creature(kind, dir));
        } else {
            self.store(pos, Element::Creature(kind, fallback));
        }
    }

    fn has_space_around(&self, pos: Coordinate) -> bool {
        Direction::MAIN.iter().any(|d| self.is_space_dir(pos, *d))
    }

    /// cows wander like fireflies, and give up when they are shut in
    fn cow(&mut self, pos: Coordinate, dir: Dir4) {
        if !self.has_space_around(pos) {
            self.store(pos, Element::CowEnclosed(0));
            return;
        }
        let (preferred, fallback) = self.turns(CreatureKind::Cow, dir);
        let cow = |d| Element::Creature(CreatureKind::Cow, d);
        if self.is_space_dir(pos, preferred.direction()) {
            self.move_dir(pos, preferred.direction(), cow(preferred));
        } else if self.is_space_dir(pos, dir.direction()) {
            self.move_dir(pos, dir.direction(), cow(dir));
        } else {
            self.store(pos, cow(fallback));
        }
    }

    pub(super) fn cow_enclosed(&mut self, pos: Coordinate, ticks: u8) {
        if self.has_space_around(pos) {
            self.store(pos, Element::Creature(CreatureKind::Cow, Dir4::Left));
        } else if ticks + 1 >= COW_ENCLOSED_TICKS {
            self.store(pos, Element::Skeleton);
        } else {
            self.store(pos, Element::CowEnclosed(ticks + 1));
        }
    }

    /// Biters eat their way forward. Dirt is preferred over food, food over
    /// empty space; a stone in the way is thrown back behind the biter.
    fn biter(&mut self, pos: Coordinate, dir: Dir4) {
        if let Some(player) = Direction::MAIN.iter().find(|d| self.get_dir(pos, **d).is_player()) {
            let player_pos = pos.step(*player);
            self.explode(player_pos, ExplosionKind::Space);
            return;
        }
        if self.cave.biter_counter != 0 {
            return;
        }
        let wanted = [
            Element::Dirt,
            self.cave.effects.biter_eats,
            Element::Space,
            Element::Stone,
        ];
        for target in wanted.iter() {
            for facing in [dir, dir.ccw(), dir.cw()].iter() {
                if self.get_dir(pos, facing.direction()) != *target {
                    continue;
                }
                let left_behind = if *target == Element::Stone {
                    Element::Stone
                } else {
                    Element::Space
                };
                self.store_dir(pos, facing.direction(), Element::Creature(CreatureKind::Biter, *facing));
                self.store(pos, left_behind);
                return;
            }
        }
        self.store(pos, Element::Creature(CreatureKind::Biter, dir.cw()));
    }
}
