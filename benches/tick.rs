use bd_cave_engine::cave::CaveTemplate;
use bd_cave_engine::engine::{bake, CaveInstance, EngineConfig};
use bd_cave_engine::types::{Direction, Level, PlayerInput, SimulableCave, TickInstruments};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

#[derive(Debug)]
struct Instruments {}

impl TickInstruments for Instruments {
    fn observe_tick(&self, _: std::time::Duration) {}
}

fn load(fixture: &str) -> CaveTemplate {
    let t: Result<CaveTemplate, _> = serde_json::from_slice(fixture.as_bytes());
    t.expect("the json literal is valid")
}

/// an instance some way in to play, so the amoeba and creatures are moving
fn warmed_up(template: &CaveTemplate, config: &EngineConfig) -> CaveInstance {
    let mut cave = bake(template, Level::ONE, 7, config).expect("fixture bakes");
    for _ in 0..40 {
        cave.tick(config, PlayerInput::idle());
    }
    cave
}

fn bench_this(cave: &mut CaveInstance, config: &EngineConfig, instruments: &Instruments, ticks: usize) {
    for i in 0..ticks {
        let direction = Direction::MAIN[i % 4];
        cave.tick_instrumented(instruments, config, PlayerInput::moving(direction));
    }
}

fn tick_rolling_stones(c: &mut Criterion) {
    if std::env::var("BENCH_TRACE").is_ok() {
        tracing_subscriber::fmt::init();
    }
    let template = load(include_str!("../fixtures/rolling_stones.json"));
    let config = EngineConfig::default();
    let cave = warmed_up(&template, &config);
    let instruments = Instruments {};
    c.bench_function("tick rolling stones", |b| {
        b.iter_batched_ref(
            || cave.clone(),
            |cave| bench_this(black_box(cave), &config, &instruments, 1),
            criterion::BatchSize::SmallInput,
        )
    });
}

fn tick_amoeba_pit(c: &mut Criterion) {
    let template = load(include_str!("../fixtures/amoeba_pit.json"));
    let config = EngineConfig::default();
    let cave = warmed_up(&template, &config);
    let instruments = Instruments {};
    c.bench_function("tick amoeba pit x100", |b| {
        b.iter_batched_ref(
            || cave.clone(),
            |cave| bench_this(black_box(cave), &config, &instruments, 100),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, tick_rolling_stones, tick_amoeba_pit);
criterion_main!(benches);
