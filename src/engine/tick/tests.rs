use super::*;
use crate::cave::{CaveTemplate, LevelParam};
use crate::element::{Axis, CreatureKind, KeyColor, Side};
use crate::engine::instance::Cell;
use crate::engine::{bake, Engine};
use crate::replay::checksum;
use crate::types::{Dir4, ElementQueryableCave, Level, VictorDeterminableCave};
use proptest::prelude::*;

fn cave_with(text: &str, edit: impl FnOnce(&mut CaveTemplate)) -> CaveInstance {
    let mut template = CaveTemplate::from_ascii(text).unwrap();
    edit(&mut template);
    bake(&template, Level::ONE, 0, &EngineConfig::default()).unwrap()
}

fn cave(text: &str) -> CaveInstance {
    cave_with(text, |_| {})
}

fn at(cave: &CaveInstance, x: i32, y: i32) -> Element {
    cave.element_at(Coordinate::new(x, y))
}

fn run(cave: &mut CaveInstance, input: PlayerInput, ticks: usize) {
    let config = EngineConfig::default();
    for _ in 0..ticks {
        cave.tick(&config, input);
    }
}

fn idle(cave: &mut CaveInstance, ticks: usize) {
    run(cave, PlayerInput::idle(), ticks);
}

fn step(cave: &mut CaveInstance, dir: Direction) {
    run(cave, PlayerInput::moving(dir), 1);
}

/// a cave baked with the rules of another engine
fn engine_cave(engine: Engine, text: &str) -> (CaveInstance, EngineConfig) {
    let config = EngineConfig::for_engine(engine);
    let template = CaveTemplate::from_ascii(text).unwrap();
    (bake(&template, Level::ONE, 0, &config).unwrap(), config)
}

fn run_on(cave: &mut CaveInstance, config: &EngineConfig, input: PlayerInput, ticks: usize) {
    for _ in 0..ticks {
        cave.tick(config, input);
    }
}

#[test]
fn test_boulder_falls_and_stops() {
    let mut cave = cave("WrW\nW W\nW W");
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 1, 0), Element::Space);
    assert_eq!(at(&cave, 1, 1), Element::StoneFalling);
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 1, 1), Element::Space);
    assert_eq!(at(&cave, 1, 2), Element::StoneFalling);
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 1, 2), Element::Stone);

    let settled = checksum(&cave);
    idle(&mut cave, 5);
    assert_eq!(checksum(&cave), settled);
    assert_eq!(at(&cave, 1, 2), Element::Stone);
}

#[test]
fn test_static_cave_does_not_change() {
    let mut cave = cave("WWWWW\nW   W\nW.w.W\nWWWWW");
    let before = cave.to_ascii();
    let config = EngineConfig::default();
    for _ in 0..10 {
        let report = cave.tick(&config, PlayerInput::idle());
        assert_eq!(report.changed_cells, 0);
    }
    assert_eq!(cave.to_ascii(), before);
}

#[test]
fn test_boulder_rolls_off_boulder() {
    let mut cave = cave("WWWWW\nW r.W\nW r.W\nWWWWW");
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 2, 1), Element::Space);
    assert_eq!(at(&cave, 1, 1), Element::StoneFalling);
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 1, 2), Element::StoneFalling);
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 1, 2), Element::Stone);
    assert_eq!(at(&cave, 2, 2), Element::Stone);
}

#[test]
fn test_boulder_does_not_roll_off_dirt() {
    let mut cave = cave("WWWWW\nW r W\nW . W\nWWWWW");
    idle(&mut cave, 3);
    assert_eq!(at(&cave, 2, 1), Element::Stone);
}

#[test]
fn test_gravity_rotates_falling() {
    let mut cave = cave_with("WWWWW\nW  rW\nWWWWW", |t| {
        t.effects.gravity = Direction::Left;
    });
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 2, 1), Element::StoneFalling);
    idle(&mut cave, 2);
    assert_eq!(at(&cave, 1, 1), Element::Stone);
}

const AMOEBA_PIT: &str = "WWWWWWW\nW.....W\nW.....W\nW..a..W\nW.....W\nW.....W\nWWWWWWW";

#[test]
fn test_amoeba_without_growth_stays() {
    let mut cave = cave_with(AMOEBA_PIT, |t| {
        t.effects.amoeba_growth_prob = 0;
        t.effects.amoeba_fast_growth_prob = 0;
    });
    for _ in 0..50 {
        idle(&mut cave, 1);
        assert_eq!(cave.count_elements(|e| e == Element::Amoeba), 1);
    }
    assert_eq!(cave.amoeba_state(), AmoebaState::Awake);
}

#[test]
fn test_amoeba_fills_and_turns_to_diamonds() {
    let mut cave = cave_with(AMOEBA_PIT, |t| {
        t.effects.amoeba_growth_prob = PROBABILITY_ONE;
        t.effects.amoeba_fast_growth_prob = PROBABILITY_ONE;
    });
    let mut count = 1;
    for _ in 0..500 {
        idle(&mut cave, 1);
        let now = cave.count_elements(|e| e == Element::Amoeba);
        if cave.amoeba_state() == AmoebaState::Awake {
            assert!(now > count, "amoeba stopped growing at {}", now);
            count = now;
        }
        if cave.count_elements(|e| e == Element::Diamond) == 25 {
            break;
        }
    }
    assert_eq!(cave.amoeba_state(), AmoebaState::Enclosed);
    assert_eq!(cave.count_elements(|e| e == Element::Dirt), 0);
    assert_eq!(cave.count_elements(|e| e == Element::Amoeba), 0);
    assert_eq!(cave.count_elements(|e| e == Element::Diamond), 25);
}

#[test]
fn test_amoeba_always_finds_its_only_free_neighbour() {
    let mut template = CaveTemplate::from_ascii("WWWWWW\nWa...W\nWWWWWW").unwrap();
    template.effects.amoeba_growth_prob = PROBABILITY_ONE;
    template.effects.amoeba_fast_growth_prob = PROBABILITY_ONE;
    let config = EngineConfig::default();
    for seed in 0..20 {
        let mut cave = bake(&template, Level::ONE, seed, &config).unwrap();
        cave.tick(&config, PlayerInput::idle());
        assert_eq!(
            cave.count_elements(|e| e == Element::Amoeba),
            2,
            "seed {}",
            seed
        );
    }
}

#[test]
fn test_amoeba_too_big_counts_cells_grown_this_tick() {
    let mut cave = cave_with("WWWWWW\nWa...W\nWWWWWW", |t| {
        t.effects.amoeba_growth_prob = PROBABILITY_ONE;
        t.set_parameter_all_levels(LevelParam::AmoebaThreshold, 2)
            .unwrap();
    });
    idle(&mut cave, 1);
    assert_eq!(cave.count_elements(|e| e == Element::Amoeba), 2);
    assert_eq!(cave.amoeba_state(), AmoebaState::TooBig);
}

#[test]
fn test_amoeba2_meeting_amoeba_explodes() {
    let mut cave = cave_with("WWWWW\nWaA W\nWWWWW", |t| {
        t.effects.amoeba_growth_prob = 0;
        t.effects.amoeba_fast_growth_prob = 0;
    });
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 1, 1), Element::Explosion(ExplosionKind::Diamond, 1));
    assert_eq!(at(&cave, 2, 1), Element::Explosion(ExplosionKind::Diamond, 1));
    assert_eq!(at(&cave, 3, 1), Element::Explosion(ExplosionKind::Diamond, 1));
    idle(&mut cave, 5);
    assert_eq!(at(&cave, 2, 1), Element::Diamond);
}

const MAGIC_AND_AMOEBA: &str = "WWWWWWW\nW r  .W\nW    .W\nWwMw .W\nW    aW\nWWWWWWW";

#[test]
fn test_active_magic_wall_encloses_amoeba() {
    let mut cave = cave_with(MAGIC_AND_AMOEBA, |t| {
        t.effects.amoeba_growth_prob = 0;
        t.effects.amoeba_fast_growth_prob = 0;
    });
    idle(&mut cave, 1);
    assert_eq!(cave.amoeba_state(), AmoebaState::Awake);
    idle(&mut cave, 1);
    assert_eq!(cave.magic_wall_state(), MagicWallState::Active);
    assert_eq!(cave.amoeba_state(), AmoebaState::Enclosed);
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 5, 4), Element::Diamond);
    assert_eq!(cave.count_elements(|e| e == Element::Amoeba), 0);
}

#[test]
fn test_bd2_magic_wall_leaves_amoeba_alone() {
    let config = EngineConfig::for_engine(Engine::Bd2);
    let mut template = CaveTemplate::from_ascii(MAGIC_AND_AMOEBA).unwrap();
    template.effects.amoeba_growth_prob = 0;
    template.effects.amoeba_fast_growth_prob = 0;
    let mut cave = bake(&template, Level::ONE, 0, &config).unwrap();
    run_on(&mut cave, &config, PlayerInput::idle(), 2);
    assert_eq!(at(&cave, 2, 4), Element::DiamondFalling);
    assert_eq!(cave.amoeba_state(), AmoebaState::Awake);
    assert_eq!(at(&cave, 5, 4), Element::Amoeba);
}

#[test]
fn test_amoeba_too_big_turns_to_stones() {
    let mut cave = cave_with(AMOEBA_PIT, |t| {
        t.effects.amoeba_growth_prob = PROBABILITY_ONE;
        t.set_parameter_all_levels(LevelParam::AmoebaThreshold, 4)
            .unwrap();
    });
    for _ in 0..100 {
        idle(&mut cave, 1);
        if cave.amoeba_state() == AmoebaState::TooBig {
            break;
        }
    }
    assert_eq!(cave.amoeba_state(), AmoebaState::TooBig);
    idle(&mut cave, 1);
    assert_eq!(cave.count_elements(|e| e == Element::Amoeba), 0);
    assert!(cave.count_elements(|e| e.stationary() == Element::Stone) >= 4);
}

fn exit_cave(text: &str, needed: i32) -> CaveInstance {
    cave_with(text, |t| {
        t.set_parameter_all_levels(LevelParam::DiamondsNeeded, needed)
            .unwrap();
        t.set_parameter_all_levels(LevelParam::DiamondValue, 10)
            .unwrap();
        t.set_parameter_all_levels(LevelParam::ExtraDiamondValue, 20)
            .unwrap();
    })
}

#[test]
fn test_collecting_a_diamond_scores() {
    let mut cave = exit_cave("WWWWWW\nW@dd W\nWWWWWW", 2);
    step(&mut cave, Direction::Right);
    assert_eq!(cave.score(), 10);
    assert_eq!(cave.diamonds_collected(), 1);
    assert_eq!(cave.diamonds_needed(), 1);
    assert_eq!(cave.player_pos(), Some(Coordinate::new(2, 1)));
    assert!(!cave.gate_open());

    step(&mut cave, Direction::Right);
    assert_eq!(cave.score(), 20);
    assert_eq!(cave.diamonds_needed(), 0);
    assert!(cave.gate_open());
    assert_eq!(cave.diamond_value(), 20);
}

#[test]
fn test_needed_never_goes_negative() {
    let mut cave = exit_cave("WWWWWWW\nW@ddd W\nWWWWWWW", 1);
    run(&mut cave, PlayerInput::moving(Direction::Right), 3);
    assert_eq!(cave.diamonds_needed(), 0);
    assert_eq!(cave.diamonds_collected(), 3);
    assert_eq!(cave.score(), 10 + 20 + 20);
}

#[test]
fn test_exit_only_opens_with_enough_diamonds() {
    let mut cave = exit_cave("WWWWWW\nWd@X W\nWWWWWW", 1);
    step(&mut cave, Direction::Right);
    assert_eq!(cave.player_pos(), Some(Coordinate::new(2, 1)));
    assert_eq!(cave.phase(), Phase::Playing);

    step(&mut cave, Direction::Left);
    assert!(cave.gate_open());
    step(&mut cave, Direction::Right);
    assert_eq!(at(&cave, 3, 1), Element::Outbox);
    step(&mut cave, Direction::Right);
    assert_eq!(cave.player_state(), PlayerState::Exited);
    assert_eq!(cave.phase(), Phase::Success);
    assert_eq!(cave.get_outcome(), Some(CaveOutcome::Success));
}

#[test]
fn test_closed_exit_keeps_player_in() {
    let mut cave = cave("WWWWW\nW@O W\nWWWWW");
    assert_eq!(cave.diamonds_needed(), 10);
    step(&mut cave, Direction::Right);
    assert_eq!(cave.player_pos(), Some(Coordinate::new(1, 1)));
    assert_eq!(at(&cave, 2, 1), Element::Outbox);
    assert_eq!(cave.player_state(), PlayerState::Alive);
    assert_eq!(cave.phase(), Phase::Playing);
    assert_eq!(cave.get_outcome(), None);
}

#[test]
fn test_success_counts_time_as_score() {
    let mut cave = cave_with("WWWWWW\nW@dO W\nWWWWWW", |t| {
        t.set_parameter_all_levels(LevelParam::DiamondsNeeded, 1)
            .unwrap();
        t.set_parameter_all_levels(LevelParam::DiamondValue, 0)
            .unwrap();
        t.set_parameter_all_levels(LevelParam::Time, 3).unwrap();
        t.set_parameter_all_levels(LevelParam::TimeValue, 5).unwrap();
    });
    step(&mut cave, Direction::Right);
    assert!(cave.gate_open());
    assert_eq!(cave.phase(), Phase::Playing);
    step(&mut cave, Direction::Right);
    assert_eq!(cave.diamonds_collected(), 1);
    assert_eq!(cave.phase(), Phase::Success);
    let left = cave.time_left();
    assert!(left > 0);
    idle(&mut cave, 10);
    assert!(cave.is_over());
    assert_eq!(cave.score(), 5 * left as u32);
    assert_eq!(cave.time_left(), 0);
}

#[test]
fn test_timeout() {
    let mut cave = cave_with("WWWW\nW@ W\nWWWW", |t| {
        t.set_parameter_all_levels(LevelParam::Time, 1).unwrap();
        t.set_parameter_all_levels(LevelParam::Speed, 200).unwrap();
    });
    idle(&mut cave, 4);
    assert_eq!(cave.phase(), Phase::Playing);
    assert_eq!(cave.get_outcome(), None);
    idle(&mut cave, 1);
    assert_eq!(cave.phase(), Phase::Timeout);
    assert_eq!(cave.player_state(), PlayerState::TimedOut);
    assert_eq!(cave.get_outcome(), Some(CaveOutcome::Timeout));
    idle(&mut cave, 1);
    assert!(cave.is_over());
}

#[test]
fn test_push_sideways() {
    let mut cave = cave_with("WWWWWW\nW@r  W\nWWWWWW", |t| {
        t.effects.pushing_stone_prob = PROBABILITY_ONE;
    });
    step(&mut cave, Direction::Right);
    assert_eq!(at(&cave, 2, 1), Element::Player);
    assert_eq!(at(&cave, 3, 1), Element::Stone);
}

#[test]
fn test_push_needs_room_and_luck() {
    let mut cave = cave_with("WWWWW\nW@rrW\nWWWWW", |t| {
        t.effects.pushing_stone_prob = PROBABILITY_ONE;
    });
    step(&mut cave, Direction::Right);
    assert_eq!(at(&cave, 1, 1), Element::Player);

    let mut cave = cave_with("WWWWWW\nW@r  W\nWWWWWW", |t| {
        t.effects.pushing_stone_prob = 0;
    });
    run(&mut cave, PlayerInput::moving(Direction::Right), 10);
    assert_eq!(at(&cave, 2, 1), Element::Stone);
}

#[test]
fn test_snap_collects_without_moving() {
    let mut cave = exit_cave("WWWWW\nW@d W\nWWWWW", 5);
    run(&mut cave, PlayerInput::snapping(Direction::Right), 1);
    assert_eq!(at(&cave, 1, 1), Element::Player);
    assert_eq!(at(&cave, 2, 1), Element::Space);
    assert_eq!(cave.diamonds_collected(), 1);
}

#[test]
fn test_diagonal_input_moves_horizontally() {
    let mut cave = cave("WWWWW\nW@..W\nW...W\nWWWWW");
    step(&mut cave, Direction::DownRight);
    assert_eq!(cave.player_pos(), Some(Coordinate::new(2, 1)));
}

#[test]
fn test_key_opens_door() {
    let mut keyed = cave("WWWWWW\nW@14 W\nWWWWWW");
    step(&mut keyed, Direction::Right);
    step(&mut keyed, Direction::Right);
    assert_eq!(keyed.player_pos(), Some(Coordinate::new(3, 1)));

    let mut locked = cave("WWWWW\nW@4 W\nWWWWW");
    step(&mut locked, Direction::Right);
    assert_eq!(locked.player_pos(), Some(Coordinate::new(1, 1)));
    assert_eq!(at(&locked, 2, 1), Element::Door(KeyColor::One));
}

#[test]
fn test_clock_adds_time() {
    let mut cave = cave_with("WWWWW\nW@t W\nWWWWW", |t| {
        t.set_parameter_all_levels(LevelParam::Time, 10).unwrap();
        t.set_parameter_all_levels(LevelParam::BonusTime, 30).unwrap();
    });
    step(&mut cave, Direction::Right);
    assert_eq!(cave.time_left(), 40);
}

#[test]
fn test_time_penalty() {
    let mut cave = cave_with("WWWWW\nW@  W\nWWWWW", |t| {
        t.set_parameter_all_levels(LevelParam::Time, 100).unwrap();
        t.set_parameter_all_levels(LevelParam::PenaltyTime, 30).unwrap();
    });
    cave.map
        .set(Coordinate::new(2, 1), Cell::new(Element::TimePenalty, false));
    step(&mut cave, Direction::Right);
    assert_eq!(cave.time_left(), 70);
    assert_eq!(at(&cave, 2, 1), Element::Gravestone);
    assert_eq!(cave.player_pos(), Some(Coordinate::new(1, 1)));
}

#[test]
fn test_firefly_turns_towards_its_preferred_side() {
    let mut cave = cave("WWWWW\nW   W\nW q W\nW   W\nWWWWW");
    idle(&mut cave, 1);
    assert_eq!(
        at(&cave, 2, 3),
        Element::Creature(CreatureKind::Firefly, Dir4::Down)
    );
    assert_eq!(at(&cave, 2, 2), Element::Space);
}

#[test]
fn test_butterfly_turns_the_other_way() {
    let mut cave = cave("WWWWW\nW   W\nW b W\nW   W\nWWWWW");
    idle(&mut cave, 1);
    assert_eq!(
        at(&cave, 2, 1),
        Element::Creature(CreatureKind::Butterfly, Dir4::Up)
    );
}

#[test]
fn test_firefly_next_to_player_explodes() {
    let mut cave = cave("WWWWW\nW@q W\nWWWWW");
    idle(&mut cave, 1);
    assert_eq!(cave.player_state(), PlayerState::Exploding);
    assert_eq!(at(&cave, 2, 1), Element::Explosion(ExplosionKind::Space, 1));
    assert_eq!(at(&cave, 1, 1), Element::Explosion(ExplosionKind::Space, 1));
    assert_eq!(at(&cave, 0, 1), Element::Steel);
    idle(&mut cave, 10);
    assert!(cave.is_over());
    assert_eq!(cave.get_outcome(), Some(CaveOutcome::Dead));
    assert_eq!(at(&cave, 1, 1), Element::Space);
}

#[test]
fn test_stone_on_butterfly_leaves_diamonds() {
    let mut cave = cave("WWWWW\nW r W\nW   W\nWwcwW\nWwwwW\nWWWWW");
    // the butterfly is boxed in and only turns, the stone falls on it
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 2, 2), Element::StoneFalling);
    idle(&mut cave, 1);
    assert!(matches!(at(&cave, 2, 3), Element::Explosion(ExplosionKind::Diamond, _)));
    idle(&mut cave, 6);
    assert_eq!(at(&cave, 2, 3), Element::Diamond);
}

#[test]
fn test_magic_wall_converts_stone() {
    let mut cave = cave("WWWWW\nW r W\nW   W\nWwMwW\nW   W\nWWWWW");
    idle(&mut cave, 2);
    assert_eq!(cave.magic_wall_state(), MagicWallState::Active);
    assert_eq!(at(&cave, 2, 2), Element::Space);
    assert_eq!(at(&cave, 2, 4), Element::DiamondFalling);
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 2, 4), Element::Diamond);
}

#[test]
fn test_magic_wall_expires() {
    let mut cave = cave_with("WWWWW\nW r W\nW   W\nWwMwW\nW   W\nWWWWW", |t| {
        t.set_parameter_all_levels(LevelParam::MagicWallTime, 1)
            .unwrap();
    });
    idle(&mut cave, 10);
    assert_eq!(cave.magic_wall_state(), MagicWallState::Expired);
}

#[test]
fn test_inbox_hatches_player() {
    let mut cave = cave_with("WWWWW\nWP  W\nWWWWW", |t| {
        t.set_parameter_all_levels(LevelParam::HatchingDelay, 2)
            .unwrap();
    });
    assert_eq!(cave.player_state(), PlayerState::NotYetBorn);
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 1, 1), Element::Inbox);
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 1, 1), Element::PrePlayer(1));
    idle(&mut cave, 3);
    assert_eq!(at(&cave, 1, 1), Element::Player);
    assert_eq!(cave.player_state(), PlayerState::Alive);
}

#[test]
fn test_suicide() {
    let mut cave = cave("WWWWW\nW@  W\nWWWWW");
    let input = PlayerInput {
        suicide: true,
        ..PlayerInput::idle()
    };
    run(&mut cave, input, 1);
    assert_eq!(cave.player_state(), PlayerState::Exploding);
}

#[test]
fn test_uncovering_comes_first() {
    let template = CaveTemplate::from_ascii("WWWWW\nW@  W\nWWWWW").unwrap();
    let config = EngineConfig {
        uncover_ticks: 3,
        ..EngineConfig::default()
    };
    let mut cave = bake(&template, Level::ONE, 0, &config).unwrap();
    for _ in 0..2 {
        cave.tick(&config, PlayerInput::moving(Direction::Right));
        assert_eq!(cave.phase(), Phase::Uncovering);
    }
    cave.tick(&config, PlayerInput::moving(Direction::Right));
    assert_eq!(cave.phase(), Phase::Playing);
    assert!(cave.cells().iter().all(|c| !c.covered));
    assert_eq!(cave.player_pos(), Some(Coordinate::new(1, 1)));
}

#[test]
fn test_water_floods_space() {
    let mut cave = cave("WWWWW\nW = W\nW   W\nWWWWW");
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 1, 1), Element::Water);
    assert_eq!(at(&cave, 3, 1), Element::Water);
    assert_eq!(at(&cave, 2, 2), Element::Water);
}

#[test]
fn test_effects_are_queued_and_drained() {
    let mut cave = exit_cave("WWWWW\nW@d W\nWWWWW", 5);
    step(&mut cave, Direction::Right);
    let effects = cave.drain_effects();
    assert!(effects.contains(&Effect::Sound {
        sound: Sound::DiamondCollect,
        pos: Some(Coordinate::new(2, 1))
    }));
    assert!(cave.drain_effects().is_empty());
    let dirty = cave.take_dirty_cells();
    assert!(dirty.contains(&Coordinate::new(1, 1)));
    assert!(dirty.contains(&Coordinate::new(2, 1)));
}

#[test]
fn test_conveyor_carries_what_lies_on_it() {
    let mut cave = cave("WWWWWW\nW  r W\nWWW<WW");
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 2, 1), Element::Stone);
    assert_eq!(at(&cave, 3, 1), Element::Space);
    idle(&mut cave, 2);
    assert_eq!(at(&cave, 2, 1), Element::Stone);
}

#[test]
fn test_conveyor_switch_stops_belts() {
    let mut cave = cave("WWWWWW\nW@/ rW\nWWWW<W");
    step(&mut cave, Direction::Right);
    idle(&mut cave, 3);
    assert_eq!(at(&cave, 4, 1), Element::Stone);
    assert_eq!(at(&cave, 3, 1), Element::Space);
}

#[test]
fn test_conveyor_direction_switch_reverses_belts() {
    let mut cave = cave("WWWWWWW\nW@\\ r W\nWWWW<WW");
    step(&mut cave, Direction::Right);
    assert_eq!(cave.player_pos(), Some(Coordinate::new(1, 1)));
    assert_eq!(at(&cave, 5, 1), Element::Stone);
    assert_eq!(at(&cave, 3, 1), Element::Space);
}

#[test]
fn test_gravity_switch_turns_gravity() {
    let mut switched = cave_with("WWWWW\nWG  W\nW@ rW\nWWWWW", |t| {
        t.effects.gravity_switch_active = true;
        t.effects.gravity_change_time = 0;
    });
    step(&mut switched, Direction::Up);
    assert_eq!(switched.gravity(), Direction::Up);
    assert_eq!(at(&switched, 3, 2), Element::Stone);
    idle(&mut switched, 1);
    assert_eq!(at(&switched, 3, 1), Element::StoneFalling);
    idle(&mut switched, 1);
    assert_eq!(at(&switched, 3, 1), Element::Stone);

    let mut inactive = cave("WWWWW\nWG  W\nW@ rW\nWWWWW");
    step(&mut inactive, Direction::Up);
    idle(&mut inactive, 3);
    assert_eq!(inactive.gravity(), Direction::Down);
    assert_eq!(at(&inactive, 3, 2), Element::Stone);
}

#[test]
fn test_creature_switch_reverses_turning() {
    let mut cave = cave("WWWWWWW\nW@!   W\nW     W\nW   q W\nW     W\nWWWWWWW");
    step(&mut cave, Direction::Right);
    assert_eq!(
        at(&cave, 4, 2),
        Element::Creature(CreatureKind::Firefly, Dir4::Up)
    );
    assert_eq!(at(&cave, 4, 4), Element::Space);
}

#[test]
fn test_replicator_copies_what_sits_on_it() {
    let mut cave = cave("WWWWW\nW r W\nW % W\nW   W\nW   W\nWWWWW");
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 2, 1), Element::Stone);
    assert_eq!(at(&cave, 2, 3), Element::StoneFalling);
}

#[test]
fn test_replicator_switch_turns_replicators_off() {
    let mut cave = cave("WWWWWW\nW@^r W\nW  % W\nW    W\nWWWWWW");
    step(&mut cave, Direction::Right);
    idle(&mut cave, 8);
    assert_eq!(at(&cave, 3, 3), Element::Space);
    assert_eq!(cave.count_elements(|e| e.stationary() == Element::Stone), 1);
}

#[test]
fn test_expanding_wall_grows_sideways() {
    let mut cave = cave("WWWWW\nW x W\nW   W\nWWWWW");
    idle(&mut cave, 1);
    let wall = Element::ExpandingWall(Axis::Horizontal);
    assert_eq!(at(&cave, 1, 1), wall);
    assert_eq!(at(&cave, 3, 1), wall);
    assert_eq!(at(&cave, 2, 2), Element::Space);
}

#[test]
fn test_expanding_wall_switch_swaps_axes() {
    let mut cave = cave("WWWWWW\nW@|  W\nW  x W\nW    W\nWWWWWW");
    step(&mut cave, Direction::Right);
    let wall = Element::ExpandingWall(Axis::Horizontal);
    assert_eq!(at(&cave, 3, 1), wall);
    assert_eq!(at(&cave, 3, 3), wall);
    assert_eq!(at(&cave, 2, 2), Element::Space);
    assert_eq!(at(&cave, 4, 2), Element::Space);
}

#[test]
fn test_biter_prefers_dirt() {
    let mut cave = cave("WWWWW\nW d W\nW.T W\nWWWWW");
    idle(&mut cave, 1);
    assert_eq!(
        at(&cave, 1, 2),
        Element::Creature(CreatureKind::Biter, Dir4::Left)
    );
    assert_eq!(at(&cave, 2, 2), Element::Space);
    assert_eq!(at(&cave, 2, 1), Element::Diamond);
}

#[test]
fn test_biter_switch_slows_biters() {
    let corridor = "WWWWW\nW@$WW\nWWW.W\nWWW.W\nWWW.W\nWWW.W\nWWWTW\nWWWWW";
    let biter = Element::Creature(CreatureKind::Biter, Dir4::Up);

    let mut fast = cave(&corridor.replace('$', "W"));
    idle(&mut fast, 4);
    assert_eq!(at(&fast, 3, 2), biter);

    let mut slow = cave(corridor);
    step(&mut slow, Direction::Right);
    idle(&mut slow, 3);
    assert_eq!(at(&slow, 3, 4), biter);
    assert_eq!(at(&slow, 3, 3), Element::Dirt);
}

#[test]
fn test_teleporter_sends_player_to_the_next_one() {
    let mut cave = cave("WWWWWW\nW@&  W\nWWWWWW\nW &  W\nWWWWWW");
    step(&mut cave, Direction::Right);
    assert_eq!(cave.player_pos(), Some(Coordinate::new(3, 3)));
    assert_eq!(at(&cave, 3, 3), Element::Player);
    assert_eq!(at(&cave, 1, 1), Element::Space);
    assert_eq!(at(&cave, 2, 1), Element::Teleporter);
}

#[test]
fn test_slime_lets_stone_through() {
    let mut cave = cave_with("WWWWW\nW r W\nW s W\nW   W\nWWWWW", |t| {
        t.set_parameter_all_levels(LevelParam::SlimePermeabilityC64, 0)
            .unwrap();
    });
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 2, 1), Element::Space);
    assert_eq!(at(&cave, 2, 2), Element::Slime);
    assert_eq!(at(&cave, 2, 3), Element::StoneFalling);
}

#[test]
fn test_acid_eats_dirt_and_is_used_up() {
    let mut cave = cave_with("WWWWW\nW.~.W\nWWWWW", |t| {
        t.effects.acid_spread_ratio = PROBABILITY_ONE;
    });
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 1, 1), Element::Acid);
    assert_eq!(at(&cave, 3, 1), Element::Acid);
    assert_eq!(at(&cave, 2, 1), Element::Explosion(ExplosionKind::Space, 3));
}

#[test]
fn test_bladder_spender_releases_a_rising_bladder() {
    let mut cave = cave("WWWWW\nW   W\nW   W\nW l W\nWWWWW");
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 2, 2), Element::Bladder);
    assert_eq!(at(&cave, 2, 3), Element::Steel);
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 2, 1), Element::Bladder);
    assert_eq!(at(&cave, 2, 2), Element::Space);
    idle(&mut cave, 2);
    assert_eq!(at(&cave, 2, 1), Element::Bladder);
}

#[test]
fn test_bladder_touching_voodoo_becomes_clock() {
    let mut cave = cave("WWWWW\nWFL W\nWWWWW");
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 2, 1), Element::Clock);
}

#[test]
fn test_shut_in_cow_becomes_skeleton() {
    let mut cave = cave("WWW\nWiW\nWWW");
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 1, 1), Element::CowEnclosed(0));
    idle(&mut cave, 6);
    assert!(matches!(at(&cave, 1, 1), Element::CowEnclosed(_)));
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 1, 1), Element::Skeleton);
}

#[test]
fn test_skeleton_worth_diamonds() {
    let mut cave = cave_with("WWWW\nW@zW\nWWWW", |t| {
        t.effects.skeletons_worth_diamonds = 2;
        t.set_parameter_all_levels(LevelParam::DiamondsNeeded, 5)
            .unwrap();
    });
    step(&mut cave, Direction::Right);
    assert_eq!(cave.skeletons_collected(), 1);
    assert_eq!(cave.diamonds_collected(), 2);
    assert_eq!(cave.diamonds_needed(), 3);
}

#[test]
fn test_bomb_is_picked_up_placed_and_explodes() {
    let mut cave = cave("WWWWWWW\nW@*   W\nW     W\nWWWWWWW");
    step(&mut cave, Direction::Right);
    assert_eq!(at(&cave, 2, 1), Element::PlayerBomb);
    step(&mut cave, Direction::Right);
    run(&mut cave, PlayerInput::snapping(Direction::Down), 1);
    assert_eq!(at(&cave, 3, 1), Element::Player);
    assert_eq!(at(&cave, 3, 2), Element::BombTick(1));
    step(&mut cave, Direction::Right);
    step(&mut cave, Direction::Right);
    assert_eq!(cave.player_pos(), Some(Coordinate::new(5, 1)));
    idle(&mut cave, 4);
    assert_eq!(at(&cave, 3, 2), Element::BombTick(7));
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 3, 2), Element::Explosion(ExplosionKind::Bomb, 1));
    assert_eq!(at(&cave, 4, 1), Element::Explosion(ExplosionKind::Bomb, 1));
    assert_eq!(cave.player_state(), PlayerState::Alive);
    idle(&mut cave, 5);
    assert_eq!(at(&cave, 3, 2), Element::Space);
}

#[test]
fn test_falling_nitro_pack_explodes_on_landing() {
    let mut cave = cave("WWWWW\nW N W\nW   W\nW   W\nWWWWW");
    idle(&mut cave, 2);
    assert_eq!(at(&cave, 2, 3), Element::NitroPackFalling);
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 2, 3), Element::Explosion(ExplosionKind::Nitro, 1));
    assert_eq!(at(&cave, 1, 2), Element::Explosion(ExplosionKind::Nitro, 1));
}

const VOODOO: &str = "WWWWWWW\nW r  @W\nW     W\nW F   W\nWWWWWWW";

#[test]
fn test_stone_on_voodoo_kills_player_in_firstb() {
    let (mut firstb, config) = engine_cave(Engine::FirstB, VOODOO);
    run_on(&mut firstb, &config, PlayerInput::idle(), 2);
    assert_eq!(at(&firstb, 2, 3), Element::Explosion(ExplosionKind::Space, 2));
    assert_eq!(firstb.player_state(), PlayerState::Exploding);

    let mut native = cave(VOODOO);
    idle(&mut native, 3);
    assert_eq!(at(&native, 2, 2), Element::Stone);
    assert_eq!(at(&native, 2, 3), Element::Voodoo);
    assert_eq!(native.player_state(), PlayerState::Alive);
}

#[test]
fn test_voodoo_collects_diamonds_in_firstb() {
    let (mut cave, config) = engine_cave(Engine::FirstB, &VOODOO.replace('r', "d"));
    run_on(&mut cave, &config, PlayerInput::idle(), 2);
    assert_eq!(cave.diamonds_collected(), 1);
    assert_eq!(at(&cave, 2, 2), Element::Space);
    assert_eq!(at(&cave, 2, 3), Element::Voodoo);
    assert_eq!(cave.player_state(), PlayerState::Alive);
}

const HAMMER: &str = "WWWWWW\nW@h  W\nWwwwwW\nWWWWWW";

#[test]
fn test_pneumatic_hammer_breaks_wall() {
    let mut cave = cave_with(HAMMER, |t| {
        t.effects.pneumatic_hammer_frames = 2;
    });
    step(&mut cave, Direction::Right);
    run(&mut cave, PlayerInput::snapping(Direction::Right), 1);
    assert_eq!(at(&cave, 2, 1), Element::PlayerPneumatic(Side::Right));
    assert_eq!(at(&cave, 3, 1), Element::PneumaticActive(Side::Right));
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 3, 2), Element::Brick);
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 3, 2), Element::Space);
    assert_eq!(at(&cave, 3, 1), Element::Space);
    assert_eq!(at(&cave, 2, 1), Element::Player);
    idle(&mut cave, 10);
    assert_eq!(at(&cave, 3, 2), Element::Space);
}

#[test]
fn test_hammered_wall_reappears() {
    let mut cave = cave_with(HAMMER, |t| {
        t.effects.pneumatic_hammer_frames = 1;
        t.effects.hammered_walls_reappear = true;
        t.effects.hammered_wall_reappear_frames = 3;
    });
    step(&mut cave, Direction::Right);
    run(&mut cave, PlayerInput::snapping(Direction::Right), 1);
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 3, 2), Element::Space);
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 3, 2), Element::Space);
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 3, 2), Element::Brick);
}

#[test]
fn test_loose_dirt_gives_way_under_a_stone() {
    let mut cave = cave_with("WWWWW\nW r W\nW ; W\nW   W\nWWWWW", |t| {
        t.effects.loose_dirt_decay_ticks = 3;
    });
    idle(&mut cave, 2);
    assert_eq!(at(&cave, 2, 2), Element::DirtLoose);
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 2, 2), Element::Space);
    idle(&mut cave, 1);
    assert_eq!(at(&cave, 2, 2), Element::StoneFalling);
}

#[test]
fn test_lineshift_wraps_in_to_the_next_row() {
    let map = "WWWW\nW  @\n.  W\nWWWW";
    let (mut bd1, config) = engine_cave(Engine::Bd1, map);
    run_on(&mut bd1, &config, PlayerInput::moving(Direction::Right), 1);
    assert_eq!(bd1.player_pos(), Some(Coordinate::new(0, 2)));
    assert_eq!(at(&bd1, 0, 2), Element::Player);
    assert_eq!(at(&bd1, 3, 1), Element::Space);

    let mut closed = cave(map);
    step(&mut closed, Direction::Right);
    assert_eq!(closed.player_pos(), Some(Coordinate::new(3, 1)));
}

#[test]
fn test_torus_wraps_in_to_the_same_row() {
    let (mut cave, config) = engine_cave(Engine::CrDr, "WWWW\n.  @\nWWWW");
    run_on(&mut cave, &config, PlayerInput::moving(Direction::Right), 1);
    assert_eq!(cave.player_pos(), Some(Coordinate::new(0, 1)));
    assert_eq!(at(&cave, 0, 1), Element::Player);
    assert_eq!(at(&cave, 3, 1), Element::Space);
}

#[test]
fn test_short_explosions_skip_the_first_stage() {
    let suicide = PlayerInput {
        suicide: true,
        ..PlayerInput::idle()
    };
    let (mut short, config) = engine_cave(Engine::CrDr, "WWWWW\nW@  W\nWWWWW");
    run_on(&mut short, &config, suicide, 1);
    assert_eq!(at(&short, 1, 1), Element::Explosion(ExplosionKind::Space, 2));

    let mut native = cave("WWWWW\nW@  W\nWWWWW");
    run(&mut native, suicide, 1);
    assert_eq!(at(&native, 1, 1), Element::Explosion(ExplosionKind::Space, 1));
}

fn input_strategy() -> impl Strategy<Value = Vec<PlayerInput>> {
    proptest::collection::vec((0u8..9, any::<bool>()), 1..80).prop_map(|raw| {
        raw.into_iter()
            .map(|(dir, fire)| PlayerInput {
                direction: Direction::from_index(dir),
                fire,
                suicide: false,
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]
    #[test]
    fn prop_ticks_are_deterministic(seed in 0u64..1000, inputs in input_strategy()) {
        let template = crate::cave_fixture(include_str!("../../../fixtures/amoeba_pit.json"));
        let config = EngineConfig::default();
        let mut a = bake(&template, Level::ONE, seed, &config).unwrap();
        let mut b = bake(&template, Level::ONE, seed, &config).unwrap();
        for input in inputs.iter() {
            let ra = a.tick(&config, *input);
            let rb = b.tick(&config, *input);
            prop_assert_eq!(ra, rb);
        }
        prop_assert_eq!(a.snapshot(), b.snapshot());
        prop_assert_eq!(checksum(&a), checksum(&b));
    }
}
