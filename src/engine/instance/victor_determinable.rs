use crate::{engine::CaveOutcome, types::VictorDeterminableCave};

use super::{CaveInstance, Phase};

impl VictorDeterminableCave for CaveInstance {
    fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    fn get_outcome(&self) -> Option<CaveOutcome> {
        match self.phase {
            Phase::Uncovering | Phase::Playing => None,
            _ => self.outcome,
        }
    }
}
