//! Spawn helpers: один набор компонентов на всех, различия — из конфига.

use bevy::prelude::*;

use crate::boss::{BossAttackSequencer, BossDecisionEngine};
use crate::combat::{CombatStateMachine, CombatantKind};
use crate::components::{Boss, Enemy, Facing, Health, Hurtbox, Player, TargetTag};
use crate::config::{CombatConfig, CombatantProfile};
use crate::stock::StockGauge;

fn combatant(kind: CombatantKind, profile: &CombatantProfile) -> (Health, CombatStateMachine) {
    (
        Health::new(profile.max_hp),
        CombatStateMachine::new(kind, StockGauge::new(profile.stock_capacity, profile.decay_duration)),
    )
}

pub fn spawn_weak_enemy(commands: &mut Commands, config: &CombatConfig, position: Vec2) -> Entity {
    let profile = &config.weak_enemy;
    let (health, machine) = combatant(CombatantKind::Enemy, profile);

    commands
        .spawn((
            Enemy,
            health,
            machine,
            Facing(-1),
            Hurtbox::new(profile.hurtbox_radius, TargetTag::Enemy),
            Transform::from_xyz(position.x, position.y, 0.0),
        ))
        .id()
}

/// Босс появляется с пустым таймлайном; BossAppear публикует `announce_boss_appearance`.
pub fn spawn_boss(commands: &mut Commands, config: &CombatConfig, position: Vec2) -> Entity {
    let profile = &config.boss;
    let (health, machine) = combatant(CombatantKind::Boss, &profile.combatant);

    commands
        .spawn((
            Boss,
            health,
            machine,
            Facing(-1),
            Hurtbox::new(profile.combatant.hurtbox_radius, TargetTag::Boss),
            Transform::from_xyz(position.x, position.y, 0.0),
            profile.patterns.clone(),
            BossDecisionEngine::new(profile.thresholds),
            BossAttackSequencer::default(),
        ))
        .id()
}

/// Игрок — только голое HP (Damageable без stock)
pub fn spawn_player(commands: &mut Commands, config: &CombatConfig, position: Vec2) -> Entity {
    commands
        .spawn((
            Player,
            Health::new(config.player.max_hp),
            Facing(1),
            Hurtbox::new(config.player.hurtbox_radius, TargetTag::Player),
            Transform::from_xyz(position.x, position.y, 0.0),
        ))
        .id()
}
