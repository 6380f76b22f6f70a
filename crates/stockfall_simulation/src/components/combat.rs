//! Combat компоненты: Hurtbox, теги целей, маркеры поражения

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Тег коллайдера (слой) — по нему фильтруются цели атаки
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum TargetTag {
    Player,
    Enemy,
    Boss,
    Prop,
}

/// Круглый коллайдер, по которому попадают атаки
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Hurtbox {
    pub radius: f32,
    pub tag: TargetTag,
}

impl Hurtbox {
    pub fn new(radius: f32, tag: TargetTag) -> Self {
        Self { radius, tag }
    }
}

/// Компонент-маркер: entity побеждён (state machine в Defeated)
///
/// Entity не удаляется сразу — внешние эффекты поражения ещё проигрываются.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Defeated;

/// Деспавн entity после указанного времени
#[derive(Component, Debug, Clone, Copy)]
pub struct DespawnAfter {
    /// Время деспавна (секунды от старта симуляции)
    pub despawn_time: f32,
}
