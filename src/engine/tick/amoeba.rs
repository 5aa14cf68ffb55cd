use super::Scan;
use crate::element::{Element, ExplosionKind, Sound};
use crate::engine::instance::AmoebaState;
use crate::engine::scheduling::CKDELAY_AMOEBA;
use crate::types::{Coordinate, Direction};
use rand::Rng;

impl Scan<'_> {
    /// Amoeba grows in to space and dirt around it. Once it is too big or has
    /// no room left, every cell of it turns in to something else.
    pub(super) fn amoeba(&mut self, pos: Coordinate, element: Element) {
        let index = if element == Element::Amoeba { 0 } else { 1 };
        self.cave.ckdelay += CKDELAY_AMOEBA;

        if element == Element::Amoeba2
            && Direction::MAIN
                .iter()
                .any(|d| self.get_dir(pos, *d) == Element::Amoeba)
        {
            self.explode(pos, ExplosionKind::Diamond);
            return;
        }

        let effects = &self.cave.effects;
        let tracker = if index == 0 {
            self.cave.amoeba
        } else {
            self.cave.amoeba2
        };
        let (too_big, enclosed) = if index == 0 {
            (effects.amoeba_too_big_to, effects.amoeba_enclosed_to)
        } else {
            (effects.amoeba2_too_big_to, effects.amoeba2_enclosed_to)
        };
        let probability = if tracker.time_left > 0 {
            effects.amoeba_growth_prob
        } else {
            effects.amoeba_fast_growth_prob
        };

        match tracker.state {
            AmoebaState::TooBig => self.store(pos, too_big),
            AmoebaState::Enclosed => self.store(pos, enclosed),
            AmoebaState::Sleeping => {}
            AmoebaState::Awake => {
                let consumes = |e: Element| e.properties().amoeba_consumes;
                if !self.amoeba_room[index]
                    && Direction::MAIN
                        .iter()
                        .any(|d| consumes(self.get_dir(pos, *d)))
                {
                    self.amoeba_room[index] = true;
                }
                if !self.rand_prob(probability) {
                    return;
                }
                // the neighbours are tried in turn from a random one on
                let first = self.cave.rng.gen_range(0..4);
                let dir = (0..4)
                    .map(|i| Direction::MAIN[(first + i) % 4])
                    .find(|d| consumes(self.get_dir(pos, *d)));
                if let Some(dir) = dir {
                    self.store_dir(pos, dir, element);
                    self.sound(Sound::Amoeba, pos);
                }
            }
        }
    }
}
