//! Target/position provider: где сейчас активный игрок.
//!
//! Босс читает позицию цели заново каждый тик. None → шаги решения и
//! таймлайна с целью пропускаются до следующего тика.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::components::{Defeated, Health, Player};

pub trait TargetProvider {
    fn target_position(&self) -> Option<Vec2>;
}

/// Фиксированная позиция (тесты, скриптовые сцены)
impl TargetProvider for Option<Vec2> {
    fn target_position(&self) -> Option<Vec2> {
        *self
    }
}

/// ECS lookup: первый живой `Player`.
#[derive(SystemParam)]
pub struct PlayerTarget<'w, 's> {
    players: Query<'w, 's, (Entity, &'static Transform, &'static Health), (With<Player>, Without<Defeated>)>,
}

impl TargetProvider for PlayerTarget<'_, '_> {
    fn target_position(&self) -> Option<Vec2> {
        self.players
            .iter()
            .filter(|(_, _, health)| health.is_alive())
            .min_by_key(|(entity, ..)| *entity)
            .map(|(_, transform, _)| transform.translation.truncate())
    }
}
