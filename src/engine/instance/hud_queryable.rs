use crate::{engine::Hud, types::HudQueryableCave};

use super::CaveInstance;

impl HudQueryableCave for CaveInstance {
    fn hud(&self) -> Hud {
        Hud {
            time: self.time_left(),
            score: self.score,
            diamonds_needed: self.diamonds_needed,
            diamonds_collected: self.diamonds_collected,
            diamond_value: self.diamond_value,
            lives: None,
        }
    }
}
