//! CombatConfig: профили бойцов, паттерны босса, атаки игрока.
//!
//! Загружается из JSON (`serde_json`), всё поле-за-полем с defaults —
//! пустой `{}` даёт рабочий конфиг. Единственное место, где бывают ошибки.

use std::path::Path;
use std::sync::Arc;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::boss::config::{BossPatternSet, BossPhaseThresholds};
use crate::combat::attack::{AttackDefinition, HitShape, TargetFilter};
use crate::components::TargetTag;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read combat config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse combat config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid combat config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Общие параметры бойца с state machine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatantProfile {
    pub max_hp: u32,
    pub stock_capacity: u32,
    /// Через сколько секунд без попаданий частичный stock забывается
    pub decay_duration: f32,
    pub hurtbox_radius: f32,
}

impl CombatantProfile {
    pub fn weak_enemy() -> Self {
        Self {
            max_hp: 30,
            stock_capacity: 4,
            decay_duration: 3.0,
            hurtbox_radius: 20.0,
        }
    }

    pub fn boss() -> Self {
        Self {
            max_hp: 200,
            stock_capacity: 20,
            decay_duration: 3.0,
            hurtbox_radius: 60.0,
        }
    }
}

impl Default for CombatantProfile {
    fn default() -> Self {
        Self::weak_enemy()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossProfile {
    pub combatant: CombatantProfile,
    pub thresholds: BossPhaseThresholds,
    pub patterns: BossPatternSet,
}

impl Default for BossProfile {
    fn default() -> Self {
        Self {
            combatant: CombatantProfile::boss(),
            thresholds: BossPhaseThresholds::default(),
            patterns: BossPatternSet::standard(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProfile {
    pub max_hp: u32,
    pub hurtbox_radius: f32,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            max_hp: 100,
            hurtbox_radius: 16.0,
        }
    }
}

/// Весь боевой конфиг (Resource)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub weak_enemy: CombatantProfile,
    pub boss: BossProfile,
    pub player: PlayerProfile,
    pub player_attacks: Vec<AttackDefinition>,
    /// Сколько секунд Defeated entity остаётся в мире (эффекты поражения)
    pub defeat_linger: f32,
    /// Время жизни pooled hit effect (секунды)
    pub hit_effect_lifetime: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            weak_enemy: CombatantProfile::weak_enemy(),
            boss: BossProfile::default(),
            player: PlayerProfile::default(),
            player_attacks: vec![
                AttackDefinition {
                    name: "slash".to_string(),
                    damage: 5,
                    range: 40.0,
                    shape: HitShape::Circle { radius: 30.0 },
                    target_filter: TargetFilter::any_of(&[TargetTag::Enemy, TargetTag::Boss, TargetTag::Prop]),
                    stock_award: 1,
                    hit_effect: Some("hit_spark".to_string()),
                },
                AttackDefinition {
                    name: "heavy".to_string(),
                    damage: 20,
                    range: 50.0,
                    shape: HitShape::Rect {
                        width: 80.0,
                        height: 40.0,
                    },
                    target_filter: TargetFilter::any_of(&[TargetTag::Enemy, TargetTag::Boss]),
                    stock_award: 2,
                    hit_effect: Some("hit_spark".to_string()),
                },
            ],
            defeat_linger: 2.0,
            hit_effect_lifetime: 0.5,
        }
    }
}

impl CombatConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CombatConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json_str(&json)?;
        crate::logger::log_info(&format!("Combat config loaded from {}", path.as_ref().display()));
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_profile("weak_enemy", &self.weak_enemy)?;
        validate_profile("boss.combatant", &self.boss.combatant)?;

        let t = &self.boss.thresholds;
        if !(0.0..=1.0).contains(&t.ground_slam_hp_threshold) {
            return Err(invalid("boss.thresholds.ground_slam_hp_threshold", "must be within [0, 1]"));
        }
        if t.base_attack_cooldown < 0.0 {
            return Err(invalid("boss.thresholds.base_attack_cooldown", "must not be negative"));
        }
        if t.ranged_attack_range < t.melee_attack_range {
            return Err(invalid(
                "boss.thresholds.ranged_attack_range",
                "must not be shorter than melee_attack_range",
            ));
        }

        if self.boss.patterns.is_empty() {
            // Не ошибка: такой босс просто никогда не атакует
            crate::logger::log_warning("Combat config: boss has no attack patterns configured");
        }

        for attack in &self.player_attacks {
            if attack.range < 0.0 {
                return Err(invalid("player_attacks.range", "must not be negative"));
            }
        }

        if self.defeat_linger < 0.0 {
            return Err(invalid("defeat_linger", "must not be negative"));
        }
        if self.hit_effect_lifetime < 0.0 {
            return Err(invalid("hit_effect_lifetime", "must not be negative"));
        }

        Ok(())
    }

    /// Атака игрока по имени (shared `Arc`, для AttackIntent)
    pub fn player_attack(&self, name: &str) -> Option<Arc<AttackDefinition>> {
        self.player_attacks
            .iter()
            .find(|attack| attack.name == name)
            .map(|attack| Arc::new(attack.clone()))
    }
}

fn validate_profile(field: &'static str, profile: &CombatantProfile) -> Result<(), ConfigError> {
    if profile.stock_capacity == 0 {
        return Err(invalid(field, "stock_capacity must be greater than 0"));
    }
    if profile.decay_duration < 0.0 {
        return Err(invalid(field, "decay_duration must not be negative"));
    }
    if profile.max_hp == 0 {
        return Err(invalid(field, "max_hp must be greater than 0"));
    }
    Ok(())
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
