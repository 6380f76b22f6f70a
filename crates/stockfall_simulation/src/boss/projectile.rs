//! Boss projectiles: pooled entities с one-shot latch.
//!
//! Снаряд летит по прямой, на первом попадании разрешается через
//! `AttackResolver::strike` (ровно одна цель), потом возвращается в пул.

use std::sync::Arc;

use bevy::prelude::*;

use crate::combat::attack::{AttackDefinition, HitShape};
use crate::combat::events::CombatEvent;
use crate::combat::resolver::{AttackResolver, CombatTargets, SpatialQuery};
use crate::combat::targets::{CombatTargetQuery, EcsCombatTargets};
use crate::config::CombatConfig;
use crate::pool::{EntityPool, PooledCommands, Released, TransientPool};

#[derive(Component, Debug, Clone)]
pub struct Projectile {
    pub owner: Entity,
    pub attack: Arc<AttackDefinition>,
    pub velocity: Vec2,
    /// Оставшееся время жизни (секунды)
    pub remaining: f32,
    /// One-shot latch: снаряд уже кого-то ударил
    pub resolved: bool,
}

impl Projectile {
    pub fn new(owner: Entity, attack: Arc<AttackDefinition>, direction: Vec2, speed: f32, lifetime: f32) -> Self {
        Self {
            owner,
            attack,
            velocity: direction.normalize_or_zero() * speed,
            remaining: lifetime,
            resolved: false,
        }
    }

    /// Хитбокс снаряда — круг вокруг его позиции
    pub fn hit_shape(&self) -> HitShape {
        match self.attack.shape {
            HitShape::Circle { radius } => HitShape::Circle { radius },
            HitShape::Rect { width, height } => HitShape::Circle {
                radius: width.max(height) * 0.5,
            },
        }
    }
}

/// System: движение снарядов + release по истечении lifetime
pub fn move_projectiles(
    mut projectiles: Query<(Entity, &mut Transform, &mut Projectile), Without<Released>>,
    mut pool: ResMut<EntityPool>,
    mut commands: Commands,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let mut pooled = PooledCommands::new(&mut pool, &mut commands);

    for (entity, mut transform, mut projectile) in projectiles.iter_mut() {
        if projectile.resolved {
            continue;
        }

        transform.translation += projectile.velocity.extend(0.0) * delta;
        projectile.remaining -= delta;

        if projectile.remaining <= 0.0 {
            pooled.release(entity);
        }
    }
}

/// System: попадания снарядов (ближайшая подходящая цель, максимум одна)
pub fn resolve_projectile_hits(
    mut projectiles: Query<(Entity, &Transform, &mut Projectile), Without<Released>>,
    mut targets: CombatTargetQuery,
    mut pool: ResMut<EntityPool>,
    mut commands: Commands,
    mut events: EventWriter<CombatEvent>,
    config: Res<CombatConfig>,
) {
    for (entity, transform, mut projectile) in projectiles.iter_mut() {
        // Latch: уже разрешённый снаряд — no-op
        if projectile.resolved {
            continue;
        }

        let position = transform.translation.truncate();
        let mut world = EcsCombatTargets::new(&mut targets);

        let mut candidates: Vec<(Entity, f32)> = world
            .overlap(&projectile.hit_shape(), position)
            .into_iter()
            .filter(|(target, tag)| *target != projectile.owner && projectile.attack.target_filter.matches(*tag))
            .filter_map(|(target, _)| {
                world
                    .position(target)
                    .map(|p| (target, p.distance_squared(position)))
            })
            .collect();
        candidates.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

        let mut effects = PooledCommands::new(&mut pool, &mut commands).with_lifetime(config.hit_effect_lifetime);
        let hit = candidates
            .into_iter()
            .find(|(target, _)| AttackResolver::strike(&projectile.attack, *target, &mut world, &mut effects, &mut events));

        if let Some((target, _)) = hit {
            projectile.resolved = true;
            effects.release(entity);
            crate::logger::log(&format!("Projectile {:?} hit {:?}", entity, target));
        }
    }
}
