//! ECS-backed `CombatTargets`: brute-force overlap по Hurtbox + lookup capability.
//!
//! Позиция в плоскости XY (`Transform.translation.truncate()`).

use bevy::prelude::*;

use crate::combat::attack::HitShape;
use crate::combat::capability::{Damageable, StateMachineTarget, Stockable};
use crate::combat::events::CombatEventSink;
use crate::combat::resolver::{CombatTargets, DamageReport, SpatialQuery};
use crate::combat::state_machine::{CombatStateMachine, Hit};
use crate::components::{Health, Hurtbox, TargetTag};
use crate::stock::{StockGauge, StockSignal};

pub type TargetQueryData = (
    Entity,
    &'static Transform,
    &'static Hurtbox,
    Option<&'static mut Health>,
    Option<&'static mut CombatStateMachine>,
    Option<&'static mut StockGauge>,
);

pub type CombatTargetQuery<'w, 's> = Query<'w, 's, TargetQueryData>;

pub struct EcsCombatTargets<'a, 'w, 's> {
    query: &'a mut CombatTargetQuery<'w, 's>,
}

impl<'a, 'w, 's> EcsCombatTargets<'a, 'w, 's> {
    pub fn new(query: &'a mut CombatTargetQuery<'w, 's>) -> Self {
        Self { query }
    }
}

impl SpatialQuery for EcsCombatTargets<'_, '_, '_> {
    fn overlap(&self, shape: &HitShape, center: Vec2) -> Vec<(Entity, TargetTag)> {
        self.query
            .iter()
            .filter(|(_, transform, hurtbox, ..)| {
                shape.overlaps_circle(center, transform.translation.truncate(), hurtbox.radius)
            })
            .map(|(entity, _, hurtbox, ..)| (entity, hurtbox.tag))
            .collect()
    }
}

impl CombatTargets for EcsCombatTargets<'_, '_, '_> {
    fn position(&self, entity: Entity) -> Option<Vec2> {
        self.query
            .get(entity)
            .ok()
            .map(|(_, transform, ..)| transform.translation.truncate())
    }

    fn take_damage(
        &mut self,
        entity: Entity,
        hit: &Hit,
        events: &mut dyn CombatEventSink,
    ) -> Option<DamageReport> {
        let Ok((_, _, _, health, machine, _)) = self.query.get_mut(entity) else {
            return None;
        };

        match (machine, health) {
            (Some(machine), Some(health)) => {
                let mut target = StateMachineTarget {
                    machine: machine.into_inner(),
                    health: health.into_inner(),
                };
                let outcome = target.take_damage(entity, hit, events);
                Some(DamageReport {
                    outcome,
                    stock_routed: target.routes_stock(),
                })
            }
            (None, Some(health)) => {
                let health = health.into_inner();
                let outcome = Damageable::take_damage(&mut *health, entity, hit, events);
                Some(DamageReport {
                    outcome,
                    stock_routed: health.routes_stock(),
                })
            }
            // State machine без HP не может получить урон
            _ => None,
        }
    }

    fn add_stock(&mut self, entity: Entity, amount: u32) -> Option<StockSignal> {
        let Ok((.., gauge)) = self.query.get_mut(entity) else {
            return None;
        };
        gauge.map(|gauge| Stockable::add_stock(gauge.into_inner(), amount))
    }
}
