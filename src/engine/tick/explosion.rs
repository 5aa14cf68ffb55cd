use super::Scan;
use crate::element::{CreatureKind, Element, ExplosionKind, Sound, BOMB_TICKS};
use crate::engine::instance::{ParticleKind, PlayerState};
use crate::engine::scheduling::CKDELAY_EXPLOSION;
use crate::types::{Coordinate, Direction};

impl Scan<'_> {
    /// what an element leaves behind when it explodes
    pub(super) fn explosion_kind_of(&self, element: Element) -> ExplosionKind {
        let effects = &self.cave.effects;
        match element.creature() {
            Some((CreatureKind::Firefly, _)) => effects.firefly_explode_to,
            Some((CreatureKind::AltFirefly, _)) => effects.alt_firefly_explode_to,
            Some((CreatureKind::Butterfly, _)) => effects.butterfly_explode_to,
            Some((CreatureKind::AltButterfly, _)) => effects.alt_butterfly_explode_to,
            Some((CreatureKind::Stonefly, _)) => effects.stonefly_explode_to,
            Some((CreatureKind::Dragonfly, _)) => effects.dragonfly_explode_to,
            _ => element.properties().explosion_result,
        }
    }

    /// Starts an explosion of the given kind in the 3x3 block around `center`.
    /// Cells that can not be destroyed keep their element.
    pub(super) fn explode(&mut self, center: Coordinate, kind: ExplosionKind) {
        let first_stage = if self.config.short_explosions { 2 } else { 1 };
        let explosion = Element::Explosion(kind, first_stage);
        self.cave.ckdelay += CKDELAY_EXPLOSION;
        self.sound(Sound::Explosion, center);
        self.particles(ParticleKind::Debris, center);

        let around = [
            Direction::UpLeft,
            Direction::Up,
            Direction::UpRight,
            Direction::Left,
            Direction::Still,
            Direction::Right,
            Direction::DownLeft,
            Direction::Down,
            Direction::DownRight,
        ];
        for dir in around.iter() {
            let pos = center.step(*dir);
            let element = self.get(pos);
            if *dir != Direction::Still && !element.properties().explodable {
                continue;
            }
            match element {
                Element::Voodoo => {
                    if self.config.voodoo_any_hurt_kills_player {
                        self.cave.kill_player = true;
                    }
                    if self.config.voodoo_disappear_in_explosion {
                        self.store(pos, explosion);
                    } else {
                        self.store(pos, Element::TimePenalty);
                    }
                }
                Element::NitroPack | Element::NitroPackFalling if *dir != Direction::Still => {
                    self.store(pos, Element::NitroPackExplode);
                }
                e if e.is_player() => {
                    if self.cave.player_state == PlayerState::Alive {
                        self.cave.player_exploding = kind.stages() as u32 + 1;
                        self.cave.set_player_state(PlayerState::Exploding);
                    }
                    self.store(pos, explosion);
                }
                _ => self.store(pos, explosion),
            }
        }
    }

    /// one stage of an explosion in progress
    pub(super) fn explosion(&mut self, pos: Coordinate, kind: ExplosionKind, stage: u8) {
        if stage < kind.stages() {
            self.store(pos, Element::Explosion(kind, stage + 1));
        } else {
            self.store(pos, kind.result());
        }
    }

    /// a lit bomb counting down
    pub(super) fn bomb_tick(&mut self, pos: Coordinate, stage: u8) {
        if stage < BOMB_TICKS {
            self.store(pos, Element::BombTick(stage + 1));
        } else {
            self.explode(pos, ExplosionKind::Bomb);
        }
    }
}
