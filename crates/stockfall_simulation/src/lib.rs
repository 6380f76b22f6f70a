//! STOCKFALL Simulation Core
//!
//! Боевое ядро на Bevy 0.16 (headless ECS):
//! - stock: накопление "заряда" от попаданий
//! - combat: state machine Active → Vulnerable → Defeated, AttackResolver
//! - boss: выбор паттерна + таймлайн sub-attacks
//!
//! Рендер, анимация, звук, камера, ввод — на стороне хоста. Наружу ядро
//! отдаёт только CombatEvent и pooled entities (эффекты, снаряды).

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod boss;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod pool;
pub mod spawn;
pub mod stock;
pub mod targeting;

// Re-exports для удобства
pub use boss::{BossAttackSequencer, BossDecisionEngine, BossPatternConfig, BossPatternSet, BossPlugin, PatternKind};
pub use combat::{
    AttackDefinition, AttackIntent, AttackResolver, CombatEvent, CombatLog, CombatPlugin, CombatSet, CombatState,
    CombatStateMachine, CombatantKind, HitShape, TargetFilter,
};
pub use components::*;
pub use config::{CombatConfig, ConfigError};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel, LogPrinter,
};
pub use stock::{StockGauge, StockSignal};

/// Частота симуляции (FixedUpdate)
pub const SIMULATION_HZ: f64 = 60.0;

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            // Seed задаёт create_headless_app; если RNG ещё нет — seed по умолчанию
            .init_resource::<DeterministicRng>()
            .add_plugins((CombatPlugin, BossPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается вручную: один `app.update()` = ровно один FixedUpdate тик.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / SIMULATION_HZ,
        )));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> Vec<u8> {
    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| *entity);

    let mut snapshot = Vec::new();
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.to_bits().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
