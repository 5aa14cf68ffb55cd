//! Turning a cave template in to a playable instance.
use super::draw::{pick_fill, Canvas};
use super::instance::{
    AmoebaTracker, CaveInstance, Cell, DirtyCells, MagicWallState, Phase, PlayerState,
    ResolvedParams, Switches,
};
use super::EngineConfig;
use crate::c64_random::C64Random;
use crate::cave::{CaveMap, CaveTemplate, LevelParam};
use crate::element::Element;
use crate::error::{BakeError, TemplateError};
use crate::types::{Coordinate, Direction, Level};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

/// seed of the slime generator when neither the cave nor its fill gives one
const DEFAULT_SLIME_SEED: (u8, u8) = (0, 0x1e);

/// Draws the cave of `template` for one play on `level`.
///
/// The result only depends on the arguments: the same template, level, seed
/// and configuration always give the same instance, which then only changes
/// through [crate::types::SimulableCave::tick].
#[instrument(level = "trace", skip_all)]
pub fn bake(
    template: &CaveTemplate,
    level: Level,
    seed: u64,
    config: &EngineConfig,
) -> Result<CaveInstance, BakeError> {
    if template.width() <= 0 || template.height() <= 0 {
        return Err(BakeError::EmptyCave);
    }
    template.validate()?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let (elements, fill_rng) = draw_elements(template, level, &mut rng, config);
    if let Some(bad) = elements.iter().find(|e| !e.is_valid()) {
        return Err(TemplateError::InvalidElement(*bad).into());
    }

    let inbox = elements
        .positions()
        .find(|pos| elements.get(*pos) == Some(&Element::Inbox));
    if config.require_inbox && inbox.is_none() {
        return Err(BakeError::NoInbox);
    }
    let player_pos = inbox.or_else(|| {
        elements
            .positions()
            .find(|pos| elements.get(*pos).map_or(false, |e| e.is_player()))
    });

    let params = resolve_params(template, level);
    let timing_factor = config.timing_factor();
    let diamonds_needed = if params.diamonds_needed <= 0 {
        let on_map = elements
            .iter()
            .filter(|e| e.properties().counts_as_diamond)
            .count() as i32;
        (on_map + params.diamonds_needed).max(0)
    } else {
        params.diamonds_needed
    };

    let slime_seed = template.levels.get(level, LevelParam::SlimeSeedC64);
    let c64_rng = if slime_seed >= 0 {
        C64Random::new(0, slime_seed as u8)
    } else {
        fill_rng.unwrap_or_else(|| C64Random::new(DEFAULT_SLIME_SEED.0, DEFAULT_SLIME_SEED.1))
    };

    let effects = template.effects;
    let auto_change = effects.creatures_direction_auto_change_time as i32 * timing_factor;
    let switches = Switches {
        gravity: effects.gravity,
        gravity_next: effects.gravity,
        gravity_will_change: 0,
        gravity_switch_active: effects.gravity_switch_active,
        creatures_backwards: effects.creatures_backwards
            ^ (auto_change > 0 && effects.creatures_direction_auto_change_on_start),
        creatures_direction_will_change: auto_change,
        expanding_wall_changed: effects.expanding_wall_changed,
        replicators_active: effects.replicators_active,
        conveyors_active: effects.conveyors_active,
        conveyors_left: effects.conveyors_left,
        biter_delay_frame: effects.biter_delay_frame,
    };

    let covered = config.uncover_ticks > 0;
    let map = elements.map(|e| Cell::new(*e, covered));
    let player_state = match player_pos.and_then(|pos| elements.get_cloned(pos)) {
        Some(e) if e.is_player() => PlayerState::Alive,
        _ => PlayerState::NotYetBorn,
    };

    let instance = CaveInstance {
        name: template.name.clone(),
        level,
        seed,
        intermission: template.intermission,
        map,
        wrap: config.wrap,
        effects,
        switches,
        phase: if covered { Phase::Uncovering } else { Phase::Playing },
        outcome: None,
        player_state,
        player_pos,
        player_unseen: 0,
        player_exploding: 0,
        kill_player: false,
        player_moved: false,
        last_move: Direction::Still,
        score: 0,
        diamonds_collected: 0,
        diamonds_needed: diamonds_needed as u32,
        diamond_value: params.diamond_value,
        gate_open: false,
        flash_ticks: 0,
        time: params.time * timing_factor,
        timing_factor,
        hatching_delay: params.hatching_delay,
        hatched: player_state == PlayerState::Alive,
        amoeba: AmoebaTracker::new(params.amoeba_time, params.amoeba_threshold, timing_factor),
        amoeba2: AmoebaTracker::new(params.amoeba2_time, params.amoeba2_threshold, timing_factor),
        magic_wall: MagicWallState::Dormant,
        magic_wall_time_left: params.magic_wall_time * timing_factor,
        keys: [0; 3],
        diamond_key_collected: false,
        sweet_eaten: false,
        got_pneumatic_hammer: false,
        pneumatic_hammer: None,
        reappearing_walls: Vec::new(),
        skeletons_collected: 0,
        replicator_counter: 0,
        biter_counter: 0,
        ckdelay: 0,
        frame_ms: 0,
        frame: 0,
        uncover_left: config.uncover_ticks,
        rng,
        c64_rng,
        dirty: DirtyCells::default(),
        effect_queue: Vec::new(),
        params,
    };
    debug!(
        width = template.width(),
        height = template.height(),
        diamonds_needed,
        "baked"
    );
    Ok(instance)
}

/// The elements of the cave, and the state of the C64 generator if the
/// random fill used it.
fn draw_elements(
    template: &CaveTemplate,
    level: Level,
    rng: &mut ChaCha8Rng,
    config: &EngineConfig,
) -> (CaveMap<Element>, Option<C64Random>) {
    if let Some(map) = template.map() {
        return (map.clone(), None);
    }
    let (width, height) = (template.width(), template.height());
    let fill = &template.fill;
    let mut map = CaveMap::new(width, height, fill.initial);

    let fill_seed = template.levels.get(level, LevelParam::RandomSeed);
    let mut c64 = if fill_seed >= 0 {
        Some(C64Random::from_cave_seed(fill_seed as u8))
    } else {
        None
    };
    for y in 1..height - 1 {
        for x in 0..width {
            let byte = match c64.as_mut() {
                Some(c64) => c64.next_byte(),
                None => rng.gen(),
            };
            map.set(Coordinate::new(x, y), pick_fill(byte, fill.initial, &fill.entries));
        }
    }
    for pos in map.positions().collect::<Vec<_>>() {
        if pos.x == 0 || pos.y == 0 || pos.x == width - 1 || pos.y == height - 1 {
            map.set(pos, fill.border);
        }
    }

    let mut canvas = Canvas::new(&mut map, config.object_wrap());
    for stored in template.objects().filter(|o| o.levels.contains(level)) {
        canvas.draw(&stored.object, level, rng);
    }
    (map, c64)
}

fn resolve_params(template: &CaveTemplate, level: Level) -> ResolvedParams {
    let get = |param| template.levels.get(level, param);
    ResolvedParams {
        time: get(LevelParam::Time),
        diamonds_needed: get(LevelParam::DiamondsNeeded),
        diamond_value: get(LevelParam::DiamondValue).max(0) as u32,
        extra_diamond_value: get(LevelParam::ExtraDiamondValue).max(0) as u32,
        time_value: get(LevelParam::TimeValue).max(0) as u32,
        speed: get(LevelParam::Speed),
        c64_timing: get(LevelParam::C64Timing),
        magic_wall_time: get(LevelParam::MagicWallTime),
        amoeba_time: get(LevelParam::AmoebaTime),
        amoeba_threshold: get(LevelParam::AmoebaThreshold).max(0) as usize,
        amoeba2_time: get(LevelParam::Amoeba2Time),
        amoeba2_threshold: get(LevelParam::Amoeba2Threshold).max(0) as usize,
        slime_permeability: get(LevelParam::SlimePermeability),
        slime_permeability_c64: get(LevelParam::SlimePermeabilityC64) as u8,
        hatching_delay: get(LevelParam::HatchingDelay).max(0) as u32,
        bonus_time: get(LevelParam::BonusTime),
        penalty_time: get(LevelParam::PenaltyTime),
    }
}
