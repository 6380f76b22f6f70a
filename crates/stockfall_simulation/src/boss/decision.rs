//! BossDecisionEngine — какой паттерн запускать следующим.
//!
//! Приоритет (first match wins):
//! 1. hp_ratio ≤ threshold → FireballBarrage (30%) / SpawnMinions (70%)
//! 2. distance ≤ melee range → RotatingAttack
//! 3. distance ≤ ranged range → FireballBarrage
//! 4. иначе → RotatingAttack

use bevy::prelude::*;
use rand::Rng;

use crate::boss::config::{BossPatternSet, BossPhaseThresholds, PatternKind};

/// Вероятность FireballBarrage в low-HP фазе
pub const LOW_HP_FIREBALL_CHANCE: f64 = 0.3;

#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct BossDecisionEngine {
    pub thresholds: BossPhaseThresholds,
    /// Время завершения последнего паттерна (секунды симуляции)
    pub last_attack_at: f32,
}

impl Default for BossDecisionEngine {
    fn default() -> Self {
        Self::new(BossPhaseThresholds::default())
    }
}

impl BossDecisionEngine {
    pub fn new(thresholds: BossPhaseThresholds) -> Self {
        Self {
            thresholds,
            last_attack_at: 0.0,
        }
    }

    /// Cooldown gate. Without a single configured pattern the boss never attacks.
    pub fn can_attack(&self, now: f32, patterns: &BossPatternSet) -> bool {
        if patterns.is_empty() {
            return false;
        }
        now - self.last_attack_at >= self.thresholds.base_attack_cooldown
    }

    /// Distance and HP ratio are read fresh by the caller on every selection.
    pub fn select_pattern(&self, distance_to_target: f32, hp_ratio: f32, rng: &mut impl Rng) -> PatternKind {
        let t = &self.thresholds;

        // Low-HP фаза важнее дистанции: в melee не откатываемся
        if hp_ratio <= t.ground_slam_hp_threshold {
            return if rng.gen_bool(LOW_HP_FIREBALL_CHANCE) {
                PatternKind::FireballBarrage
            } else {
                PatternKind::SpawnMinions
            };
        }

        if distance_to_target <= t.melee_attack_range {
            PatternKind::RotatingAttack
        } else if distance_to_target <= t.ranged_attack_range {
            PatternKind::FireballBarrage
        } else {
            PatternKind::RotatingAttack
        }
    }

    pub fn record_attack(&mut self, now: f32) {
        self.last_attack_at = now;
    }
}
