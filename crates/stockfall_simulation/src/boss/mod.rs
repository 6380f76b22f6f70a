//! Boss module: decision engine + attack sequencer.
//!
//! Босс — обычный combatant (Health + CombatStateMachine + Hurtbox) плюс
//! BossPatternSet, BossDecisionEngine и BossAttackSequencer. Никакого
//! отдельного типа врага: отличия — только данные.

use bevy::prelude::*;

use crate::combat::CombatSet;

pub mod config;
pub mod decision;
pub mod projectile;
pub mod sequencer;
pub mod systems;


pub use config::{BossPatternConfig, BossPatternSet, BossPhaseThresholds, PatternKind};
pub use decision::BossDecisionEngine;
pub use projectile::Projectile;
pub use sequencer::{BossAttackSequencer, SequencerContext, SequencerStatus, SequencerTick, SubAction};

pub struct BossPlugin;

impl Plugin for BossPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<BossDecisionEngine>();

        app.add_systems(
            FixedUpdate,
            (systems::announce_boss_appearance, systems::run_boss_patterns)
                .chain()
                .in_set(CombatSet::Decide),
        );

        // Снаряды разрешаются раньше мгновенных ударов этого тика
        app.add_systems(
            FixedUpdate,
            (projectile::move_projectiles, projectile::resolve_projectile_hits)
                .chain()
                .in_set(CombatSet::Resolve)
                .before(crate::combat::systems::resolve_attack_intents),
        );
    }
}
