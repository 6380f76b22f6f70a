//! Capability interfaces for combat targets.
//!
//! Любой entity, у которого есть одна или обе capability, участвует в бою
//! без наследования: игрок — только `Damageable` (голое HP), враг и босс —
//! `Damageable` через state machine, standalone `StockGauge` — `Stockable`.

use bevy::prelude::*;

use crate::combat::events::CombatEventSink;
use crate::combat::state_machine::{CombatStateMachine, Hit, HitOutcome};
use crate::components::Health;
use crate::stock::{StockGauge, StockSignal};

pub trait Damageable {
    fn take_damage(&mut self, entity: Entity, hit: &Hit, events: &mut dyn CombatEventSink) -> HitOutcome;

    /// True when the damage path already applies `hit.stock_award`
    /// (state machine targets), so the resolver must not award it twice.
    fn routes_stock(&self) -> bool {
        false
    }
}

pub trait Stockable {
    fn add_stock(&mut self, amount: u32) -> StockSignal;
    fn clear_stock(&mut self);
}

/// Plain HP: урон применяется напрямую, без stock-механики.
impl Damageable for Health {
    fn take_damage(&mut self, _entity: Entity, hit: &Hit, _events: &mut dyn CombatEventSink) -> HitOutcome {
        if !self.is_alive() || hit.damage == 0 {
            return HitOutcome::Ignored;
        }

        let amount = Health::take_damage(self, hit.damage);
        if self.is_alive() {
            HitOutcome::Damaged { amount }
        } else {
            HitOutcome::Defeated { amount }
        }
    }
}

impl Stockable for StockGauge {
    fn add_stock(&mut self, amount: u32) -> StockSignal {
        StockGauge::add_stock(self, amount)
    }

    fn clear_stock(&mut self) {
        StockGauge::clear_stock(self);
    }
}

/// Borrowed view of a state-machine target: the machine plus the HP it guards.
pub struct StateMachineTarget<'a> {
    pub machine: &'a mut CombatStateMachine,
    pub health: &'a mut Health,
}

impl Damageable for StateMachineTarget<'_> {
    fn take_damage(&mut self, entity: Entity, hit: &Hit, events: &mut dyn CombatEventSink) -> HitOutcome {
        self.machine.receive_hit(entity, self.health, hit, events)
    }

    fn routes_stock(&self) -> bool {
        true
    }
}
