//! Combat module: stock → vulnerability → damage.
//!
//! Слои:
//! - state_machine: Active/Vulnerable/Defeated per entity
//! - capability: Damageable/Stockable контракты целей
//! - attack + resolver: данные атаки и их применение к целям
//! - events: CombatEvent канал наружу (эффекты, звук, UI)
//! - systems: ECS обвязка (FixedUpdate)

use bevy::prelude::*;

pub mod attack;
pub mod capability;
pub mod events;
pub mod resolver;
pub mod state_machine;
pub mod systems;
pub mod targets;

#[cfg(test)]
mod resolver_tests;

pub use attack::{AttackDefinition, AttackIntent, HitShape, TargetFilter};
pub use capability::{Damageable, StateMachineTarget, Stockable};
pub use events::{CombatEvent, CombatEventSink};
pub use resolver::{AttackResolver, CombatTargets, DamageReport, SpatialQuery};
pub use state_machine::{CombatState, CombatStateMachine, CombatantKind, Hit, HitOutcome};
pub use systems::CombatLog;
pub use targets::{CombatTargetQuery, EcsCombatTargets};

/// Фазы боевого тика (FixedUpdate), строго по порядку
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CombatSet {
    /// Decay таймеры, lifetime пуловых объектов
    Timers,
    /// Решения (босс, AI) → AttackIntent / снаряды
    Decide,
    /// AttackResolver: intents и снаряды
    Resolve,
    /// Defeated, despawn, журнал событий
    Cleanup,
}

/// Combat Plugin
///
/// Порядок выполнения:
/// 1. Timers — tick stock decay, expire transient effects
/// 2. Decide — (BossPlugin) выбор и продвижение паттернов
/// 3. Resolve — AttackIntent → AttackResolver
/// 4. Cleanup — Defeated маркер, despawn, CombatLog
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CombatEvent>()
            .add_event::<AttackIntent>()
            .init_resource::<crate::pool::EntityPool>()
            .init_resource::<crate::config::CombatConfig>()
            .init_resource::<CombatLog>()
            .register_type::<CombatStateMachine>()
            .register_type::<crate::stock::StockGauge>();

        app.configure_sets(
            FixedUpdate,
            (CombatSet::Timers, CombatSet::Decide, CombatSet::Resolve, CombatSet::Cleanup).chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                systems::tick_combat_states,
                crate::stock::tick_stock_gauges,
                crate::pool::expire_transients,
            )
                .chain()
                .in_set(CombatSet::Timers),
        );

        app.add_systems(
            FixedUpdate,
            systems::resolve_attack_intents.in_set(CombatSet::Resolve),
        );

        app.add_systems(
            FixedUpdate,
            (
                systems::mark_defeated,
                systems::despawn_after_timeout,
                systems::record_combat_events,
            )
                .chain()
                .in_set(CombatSet::Cleanup),
        );
    }
}
