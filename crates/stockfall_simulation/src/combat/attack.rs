//! Attack definitions (immutable data) и AttackIntent событие.

use std::sync::Arc;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::TargetTag;

/// Форма хитбокса атаки, центр = origin + direction × range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HitShape {
    Circle { radius: f32 },
    /// Axis-aligned прямоугольник (без поворота по direction)
    Rect { width: f32, height: f32 },
}

impl HitShape {
    /// Пересекает ли форма с центром `center` круглый hurtbox.
    pub fn overlaps_circle(&self, center: Vec2, point: Vec2, radius: f32) -> bool {
        match *self {
            HitShape::Circle { radius: shape_radius } => center.distance(point) <= shape_radius + radius,
            HitShape::Rect { width, height } => {
                let half = Vec2::new(width, height) * 0.5;
                let closest = point.clamp(center - half, center + half);
                closest.distance(point) <= radius
            }
        }
    }
}

/// Which collider tags an attack may hit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetFilter(pub Vec<TargetTag>);

impl TargetFilter {
    pub fn only(tag: TargetTag) -> Self {
        Self(vec![tag])
    }

    pub fn any_of(tags: &[TargetTag]) -> Self {
        Self(tags.to_vec())
    }

    pub fn matches(&self, tag: TargetTag) -> bool {
        self.0.contains(&tag)
    }
}

/// Одна атака: урон, дальность, форма, фильтр целей, stock за попадание.
///
/// Shared read-only: в рантайме живёт за `Arc`, пересоздаётся только из конфига.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackDefinition {
    pub name: String,
    pub damage: u32,
    pub range: f32,
    pub shape: HitShape,
    pub target_filter: TargetFilter,
    #[serde(default)]
    pub stock_award: u32,
    /// Prefab id эффекта попадания (пул), None — без эффекта
    #[serde(default)]
    pub hit_effect: Option<String>,
}

impl AttackDefinition {
    pub fn hit_center(&self, origin: Vec2, direction: Vec2) -> Vec2 {
        origin + direction.normalize_or_zero() * self.range
    }
}

/// Event: один swing, который надо разрешить ровно один раз.
///
/// EventReader читает каждое событие один раз — это и есть per-swing latch
/// для мгновенных атак. Несколько `directions` = один swing с несколькими
/// формами (ground slam), каждая цель получает максимум одно попадание.
/// Снаряды несут свой latch (`Projectile::resolved`).
#[derive(Event, Debug, Clone)]
pub struct AttackIntent {
    pub attacker: Entity,
    pub attack: Arc<AttackDefinition>,
    /// None → позиция атакующего
    pub origin: Option<Vec2>,
    /// Пусто → `Facing` атакующего
    pub directions: Vec<Vec2>,
}
