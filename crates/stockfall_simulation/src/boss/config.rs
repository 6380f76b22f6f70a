//! Boss pattern data: per-pattern параметры + пороги фаз.
//!
//! Всё здесь — read-only конфигурация (из `CombatConfig`), не per-entity state.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::attack::{AttackDefinition, HitShape, TargetFilter};
use crate::components::TargetTag;

/// Один из трёх паттернов босса
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum PatternKind {
    /// Melee combo: один удар в сторону цели
    RotatingAttack,
    /// Веер снарядов в сторону цели
    FireballBarrage,
    /// Ground slam: радиальный удар по кругу
    SpawnMinions,
}

impl PatternKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternKind::RotatingAttack => "rotating_attack",
            PatternKind::FireballBarrage => "fireball_barrage",
            PatternKind::SpawnMinions => "spawn_minions",
        }
    }
}

/// Параметры одного паттерна.
///
/// `duration` — длина анимации удара на стороне хоста, таймлайн её не ждёт.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossPatternConfig {
    pub damage: u32,
    pub range: f32,
    pub duration: f32,
    pub animation_duration: f32,
    pub projectile_count: u32,
    pub projectile_interval: f32,
    pub projectile_speed: f32,
    pub projectile_lifetime: f32,
    /// Радиус хитбокса удара / снаряда
    pub hit_radius: f32,
    pub stock_award: u32,
    pub hit_effect: Option<String>,
    /// Prefab id снаряда в пуле
    pub projectile_prefab: String,
}

impl Default for BossPatternConfig {
    fn default() -> Self {
        Self {
            damage: 10,
            range: 80.0,
            duration: 0.5,
            animation_duration: 1.2,
            projectile_count: 5,
            projectile_interval: 0.2,
            projectile_speed: 400.0,
            projectile_lifetime: 3.0,
            hit_radius: 40.0,
            stock_award: 0,
            hit_effect: Some("boss_hit".to_string()),
            projectile_prefab: "fireball".to_string(),
        }
    }
}

impl BossPatternConfig {
    /// AttackDefinition, которым бьют sub-actions этого паттерна (всегда по игроку).
    pub fn attack_definition(&self, kind: PatternKind) -> AttackDefinition {
        AttackDefinition {
            name: kind.as_str().to_string(),
            damage: self.damage,
            range: self.range,
            shape: HitShape::Circle {
                radius: self.hit_radius,
            },
            target_filter: TargetFilter::only(TargetTag::Player),
            stock_award: self.stock_award,
            hit_effect: self.hit_effect.clone(),
        }
    }
}

/// Набор паттернов одного босса. None — паттерн не сконфигурирован.
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossPatternSet {
    pub rotating_attack: Option<BossPatternConfig>,
    pub fireball_barrage: Option<BossPatternConfig>,
    pub spawn_minions: Option<BossPatternConfig>,
}

impl BossPatternSet {
    pub fn get(&self, kind: PatternKind) -> Option<&BossPatternConfig> {
        match kind {
            PatternKind::RotatingAttack => self.rotating_attack.as_ref(),
            PatternKind::FireballBarrage => self.fireball_barrage.as_ref(),
            PatternKind::SpawnMinions => self.spawn_minions.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rotating_attack.is_none() && self.fireball_barrage.is_none() && self.spawn_minions.is_none()
    }

    /// Полностью сконфигурированный набор (используется по умолчанию в `CombatConfig`)
    pub fn standard() -> Self {
        Self {
            rotating_attack: Some(BossPatternConfig {
                damage: 15,
                range: 90.0,
                hit_radius: 70.0,
                projectile_count: 0,
                ..Default::default()
            }),
            fireball_barrage: Some(BossPatternConfig {
                damage: 8,
                range: 0.0,
                hit_radius: 20.0,
                ..Default::default()
            }),
            spawn_minions: Some(BossPatternConfig {
                damage: 12,
                range: 120.0,
                hit_radius: 30.0,
                animation_duration: 1.5,
                projectile_count: 0,
                ..Default::default()
            }),
        }
    }
}

/// Пороги решений босса
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct BossPhaseThresholds {
    /// Минимальный интервал между паттернами (секунды)
    pub base_attack_cooldown: f32,
    pub melee_attack_range: f32,
    pub ranged_attack_range: f32,
    /// hp_ratio ≤ этого значения → low-HP фаза
    pub ground_slam_hp_threshold: f32,
}

impl Default for BossPhaseThresholds {
    fn default() -> Self {
        Self {
            base_attack_cooldown: 2.0,
            melee_attack_range: 300.0,
            ranged_attack_range: 800.0,
            ground_slam_hp_threshold: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_set_lookup() {
        let set = BossPatternSet {
            fireball_barrage: Some(BossPatternConfig::default()),
            ..Default::default()
        };

        assert!(set.get(PatternKind::FireballBarrage).is_some());
        assert!(set.get(PatternKind::RotatingAttack).is_none());
        assert!(!set.is_empty());
        assert!(BossPatternSet::default().is_empty());
    }

    #[test]
    fn test_boss_attack_targets_player_only() {
        let attack = BossPatternConfig::default().attack_definition(PatternKind::RotatingAttack);

        assert_eq!(attack.name, "rotating_attack");
        assert!(attack.target_filter.matches(TargetTag::Player));
        assert!(!attack.target_filter.matches(TargetTag::Boss));
    }

    #[test]
    fn test_partial_pattern_json_uses_defaults() {
        let json = r#"{ "fireball_barrage": { "projectile_count": 3, "damage": 4 } }"#;

        let set: BossPatternSet = serde_json::from_str(json).expect("valid pattern json");
        let fireball = set.fireball_barrage.expect("fireball configured");

        assert_eq!(fireball.projectile_count, 3);
        assert_eq!(fireball.damage, 4);
        assert_eq!(fireball.projectile_prefab, "fireball");
        assert!(set.spawn_minions.is_none());
    }
}
