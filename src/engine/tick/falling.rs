use super::Scan;
use crate::element::{Element, ExplosionKind, Sound};
use crate::engine::instance::MagicWallState;
use crate::types::{Coordinate, Direction};

impl Scan<'_> {
    /// flying elements fall against gravity
    fn fall_direction(&self, element: Element) -> Direction {
        match element {
            Element::FlyingStone
            | Element::FlyingStoneFlying
            | Element::FlyingDiamond
            | Element::FlyingDiamondFlying => self.gravity().opposite(),
            _ => self.gravity(),
        }
    }

    /// Side an element falling towards `down` can roll off to. The element
    /// below must slope towards us and towards the side, and both the side
    /// and the cell below it must be empty.
    pub(super) fn roll_side(&self, pos: Coordinate, down: Direction) -> Option<Direction> {
        let slopes = self.get_dir(pos, down).properties().slopes;
        if !slopes.toward(down.opposite()) {
            return None;
        }
        [down.cw_fourth(), down.ccw_fourth()]
            .iter()
            .copied()
            .find(|side| {
                slopes.toward(*side)
                    && self.is_space_dir(pos, *side)
                    && self.is_space(pos.step(*side).step(down))
            })
    }

    /// a stone, diamond or similar at rest
    pub(super) fn resting(&mut self, pos: Coordinate, element: Element) {
        let down = self.fall_direction(element);
        let falling = element.falling().unwrap_or(element);
        if self.is_space_dir(pos, down) {
            self.move_dir(pos, down, falling);
        } else if let Some(side) = self.roll_side(pos, down) {
            self.move_dir(pos, side, falling);
        }
    }

    /// what the magic wall makes of a falling element, if it takes it at all
    fn magic_wall_conversion(&self, element: Element) -> Option<Element> {
        let effects = &self.cave.effects;
        match element {
            Element::StoneFalling => Some(effects.magic_wall_stone_to),
            Element::DiamondFalling => Some(effects.magic_wall_diamond_to),
            Element::MegaStoneFalling => Some(effects.magic_wall_mega_stone_to),
            Element::NitroPackFalling => Some(effects.magic_wall_nitro_pack_to),
            Element::NutFalling => Some(effects.magic_wall_nut_to),
            Element::FlyingStoneFlying => Some(effects.magic_wall_flying_stone_to),
            Element::FlyingDiamondFlying => Some(effects.magic_wall_flying_diamond_to),
            _ => None,
        }
    }

    /// what a falling element turns in to when it stops
    fn landed(&self, element: Element) -> Element {
        match element {
            Element::StoneFalling => self.cave.effects.stone_bouncing_to,
            Element::DiamondFalling => self.cave.effects.diamond_bouncing_to,
            other => other.stationary(),
        }
    }

    fn is_heavy(element: Element) -> bool {
        !matches!(element, Element::DirtBallFalling)
    }

    /// an element in motion
    pub(super) fn falling(&mut self, pos: Coordinate, element: Element) {
        let down = self.fall_direction(element);
        let below_pos = pos.step(down);
        let below = self.get(below_pos);

        if below == Element::Space {
            self.move_dir(pos, down, element);
            return;
        }
        if element == Element::NitroPackFalling {
            self.explode(pos, ExplosionKind::Nitro);
            return;
        }
        if Self::is_heavy(element) && self.hit(pos, element, below_pos, below) {
            return;
        }
        if below == Element::MagicWall && self.cave.magic_wall != MagicWallState::Expired {
            if let Some(converted) = self.magic_wall_conversion(element) {
                self.magic_wall(pos, down, converted);
                return;
            }
        }
        if let Some(side) = self.roll_side(pos, down) {
            self.move_dir(pos, side, element);
            return;
        }

        let landed = self.landed(element);
        self.store(pos, landed);
        if let Some(sound) = element.properties().sound {
            self.sound(sound, pos);
        }
    }

    /// A falling element hits what is below it. True if that used up the
    /// falling element's move.
    fn hit(&mut self, pos: Coordinate, element: Element, below_pos: Coordinate, below: Element) -> bool {
        let diamond = element.properties().counts_as_diamond;
        match below {
            Element::Voodoo => {
                if diamond && self.config.voodoo_collects_diamonds {
                    self.store(pos, Element::Space);
                    self.collect_diamond(below_pos);
                    true
                } else if !diamond && self.config.voodoo_dies_by_stone {
                    self.explode(below_pos, ExplosionKind::Space);
                    true
                } else {
                    false
                }
            }
            Element::Nut if matches!(element, Element::StoneFalling | Element::MegaStoneFalling) => {
                let crushed = self.cave.effects.nut_crushed_to;
                self.store(below_pos, crushed);
                self.store(pos, element.stationary());
                self.sound(Sound::NutCrack, below_pos);
                true
            }
            _ if below.properties().explodes_by_hit => {
                let kind = self.explosion_kind_of(below);
                self.explode(below_pos, kind);
                true
            }
            _ => false,
        }
    }

    /// the falling element disappears in the wall, and comes out converted
    /// below it if there is room
    fn magic_wall(&mut self, pos: Coordinate, down: Direction, converted: Element) {
        if self.cave.magic_wall == MagicWallState::Dormant {
            self.cave.magic_wall = MagicWallState::Active;
        }
        let exit = pos.step(down).step(down);
        if self.is_space(exit) {
            self.store(exit, converted);
        }
        self.store(pos, Element::Space);
        self.sound(Sound::MagicWall, pos);
    }
}
