#![deny(
    warnings,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs
)]
//! A cave engine for [Boulder Dash](https://en.wikipedia.org/wiki/Boulder_Dash)
//! style games.
//!
//! A [cave::CaveTemplate] describes a cave the way it is authored: per level
//! parameters, a random fill and a list of drawing objects (or a fixed map).
//! [engine::bake] turns a template in to a [engine::CaveInstance] for one
//! play, and [types::SimulableCave::tick] advances that instance one frame
//! at a time. Baking and ticking are deterministic: the same template, level,
//! seed, configuration and inputs always give the same cave, which is what
//! [replay] relies on.
//!
//! The rules of several historical engines are available through
//! [engine::EngineConfig::for_engine]; the default follows this crate's own
//! rules. `cargo bench` times baking and ticking the caves in `fixtures/`.

use cave::CaveTemplate;

pub mod c64_random;
pub mod cave;
pub mod element;
pub mod engine;
pub mod error;
pub mod replay;
pub mod types;

/// Loads a fixture from a given string
pub fn cave_fixture(cave_fixture: &str) -> CaveTemplate {
    let c: Result<CaveTemplate, _> = serde_json::from_str(cave_fixture);
    c.expect("the json literal is valid")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{bake, EngineConfig};
    use crate::types::{ElementQueryableCave, Level};
    use element::Element;

    #[test]
    fn test_fixtures_bake() {
        let config = EngineConfig::default();
        for fixture in [
            include_str!("../fixtures/rolling_stones.json"),
            include_str!("../fixtures/amoeba_pit.json"),
        ]
        .iter()
        {
            let template = cave_fixture(fixture);
            template.validate().unwrap();
            for level in Level::ALL.iter() {
                let cave = bake(&template, *level, 7, &config).unwrap();
                assert_eq!(cave.count_elements(|e| e == Element::Inbox), 1);
                assert_eq!(cave.element_at(types::Coordinate::new(0, 0)), Element::Steel);
            }
        }
    }
}
