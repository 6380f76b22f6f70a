//! AttackResolver — stateless: атака + origin/direction → попадания.
//!
//! Resolver не помнит прошлых вызовов. Защита от двойного попадания одним
//! swing/снарядом — на стороне вызывающего (latch в AttackIntent/Projectile).

use bevy::prelude::*;

use crate::combat::attack::{AttackDefinition, HitShape};
use crate::combat::events::CombatEventSink;
use crate::combat::state_machine::{Hit, HitOutcome};
use crate::components::TargetTag;
use crate::pool::TransientPool;
use crate::stock::StockSignal;

/// Spatial overlap query: все коллайдеры, пересекающие форму.
pub trait SpatialQuery {
    fn overlap(&self, shape: &HitShape, center: Vec2) -> Vec<(Entity, TargetTag)>;
}

/// Что resolver узнал о попадании через `Damageable`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageReport {
    pub outcome: HitOutcome,
    pub stock_routed: bool,
}

/// Everything the resolver needs from the world: the overlap query plus
/// the capability lookup on the found colliders.
pub trait CombatTargets: SpatialQuery {
    fn position(&self, entity: Entity) -> Option<Vec2>;

    /// None → entity не `Damageable`
    fn take_damage(
        &mut self,
        entity: Entity,
        hit: &Hit,
        events: &mut dyn CombatEventSink,
    ) -> Option<DamageReport>;

    /// None → entity не `Stockable` отдельным интерфейсом
    fn add_stock(&mut self, entity: Entity, amount: u32) -> Option<StockSignal>;
}

pub struct AttackResolver;

impl AttackResolver {
    /// Resolves one attack against everything in its hit shape.
    /// Returns the number of distinct targets hit.
    pub fn execute(
        attack: &AttackDefinition,
        origin: Vec2,
        direction: Vec2,
        acting: Entity,
        targets: &mut impl CombatTargets,
        effects: &mut impl TransientPool,
        events: &mut impl CombatEventSink,
    ) -> usize {
        Self::execute_burst(attack, origin, &[direction], acting, targets, effects, events)
    }

    /// One swing with several hit shapes (ground slam spokes). A target
    /// overlapped by more than one shape is struck once.
    pub fn execute_burst(
        attack: &AttackDefinition,
        origin: Vec2,
        directions: &[Vec2],
        acting: Entity,
        targets: &mut impl CombatTargets,
        effects: &mut impl TransientPool,
        events: &mut impl CombatEventSink,
    ) -> usize {
        let mut resolved: Vec<Entity> = Vec::new();

        for direction in directions {
            let center = attack.hit_center(origin, *direction);
            for (entity, tag) in targets.overlap(&attack.shape, center) {
                if entity == acting || resolved.contains(&entity) {
                    continue;
                }
                if !attack.target_filter.matches(tag) {
                    continue;
                }

                if Self::strike(attack, entity, targets, effects, events) {
                    resolved.push(entity);
                }
            }
        }

        resolved.len()
    }

    /// Applies `attack` to one already-selected target. Returns false when
    /// the target accepted nothing (not damageable/stockable, or defeated).
    pub fn strike(
        attack: &AttackDefinition,
        target: Entity,
        targets: &mut impl CombatTargets,
        effects: &mut impl TransientPool,
        events: &mut impl CombatEventSink,
    ) -> bool {
        let hit = Hit {
            damage: attack.damage,
            stock_award: attack.stock_award,
        };

        let report = targets.take_damage(target, &hit, events);
        let stock_routed = report.is_some_and(|r| r.stock_routed);

        let stocked = if attack.stock_award > 0 && !stock_routed {
            targets.add_stock(target, attack.stock_award).is_some()
        } else {
            false
        };

        let landed = report.is_some_and(|r| r.outcome.landed()) || stocked;
        if !landed {
            return false;
        }

        if let Some(effect) = attack.hit_effect.as_deref() {
            if let Some(position) = targets.position(target) {
                effects.acquire(effect, position, 0.0);
            }
        }

        true
    }
}
