//! Combat state machine: Active → Vulnerable → Defeated
//!
//! - Active: попадания копят stock, HP не трогают
//! - Vulnerable: следующее попадание с уроном снимает HP и сбрасывает stock
//! - Defeated: терминальное, все попадания игнорируются

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::events::{CombatEvent, CombatEventSink};
use crate::components::Health;
use crate::stock::{StockGauge, StockSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum CombatState {
    #[default]
    Active,
    /// "Ready to launch": поведение на паузе, ждём попадания
    Vulnerable,
    Defeated,
}

/// Какие события публиковать (EnemyDamaged vs BossDamaged и т.д.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum CombatantKind {
    #[default]
    Enemy,
    Boss,
}

/// Одно попадание по entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub damage: u32,
    pub stock_award: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Попадание не имело эффекта (Defeated или урон 0 по Vulnerable)
    Ignored,
    /// Active-попадание без изменения stock (stock_award == 0)
    Absorbed,
    /// Active-попадание добавило stock
    Stocked,
    /// Active-попадание заполнило gauge → Vulnerable
    BecameVulnerable,
    /// Vulnerable-попадание сняло HP, entity снова Active
    Damaged { amount: u32 },
    /// Vulnerable-попадание обнулило HP
    Defeated { amount: u32 },
}

impl HitOutcome {
    pub fn landed(&self) -> bool {
        !matches!(self, HitOutcome::Ignored)
    }
}

/// Per-entity combat state machine, owns the entity's stock gauge.
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CombatStateMachine {
    pub state: CombatState,
    pub stock: StockGauge,
    pub kind: CombatantKind,
}

impl CombatStateMachine {
    pub fn new(kind: CombatantKind, stock: StockGauge) -> Self {
        Self {
            state: CombatState::Active,
            stock,
            kind,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state != CombatState::Defeated
    }

    pub fn is_vulnerable(&self) -> bool {
        self.state == CombatState::Vulnerable
    }

    /// Applies one hit. The whole transition (stock, HP, state, events)
    /// happens inside this call.
    pub fn receive_hit(
        &mut self,
        entity: Entity,
        health: &mut Health,
        hit: &Hit,
        events: &mut dyn CombatEventSink,
    ) -> HitOutcome {
        match self.state {
            CombatState::Defeated => HitOutcome::Ignored,
            CombatState::Active => match self.stock.add_stock(hit.stock_award) {
                StockSignal::ThresholdReached => {
                    self.state = CombatState::Vulnerable;
                    events.publish(CombatEvent::StockFull { entity });
                    crate::logger::log(&format!(
                        "Stock full: {:?} is vulnerable ({}/{})",
                        entity, self.stock.count, self.stock.capacity
                    ));
                    HitOutcome::BecameVulnerable
                }
                StockSignal::Progress => HitOutcome::Stocked,
                StockSignal::Unchanged => HitOutcome::Absorbed,
            },
            CombatState::Vulnerable => {
                if hit.damage == 0 {
                    return HitOutcome::Ignored;
                }

                let amount = health.take_damage(hit.damage);
                self.stock.clear_stock();
                events.publish(self.damaged_event(entity, amount));

                if health.is_alive() {
                    self.state = CombatState::Active;
                    crate::logger::log(&format!(
                        "Vulnerable hit: {:?} took {} damage (HP: {}/{})",
                        entity, amount, health.current, health.max
                    ));
                    HitOutcome::Damaged { amount }
                } else {
                    self.state = CombatState::Defeated;
                    events.publish(self.defeated_event(entity));
                    crate::logger::log_info(&format!("{:?} {:?} defeated", self.kind, entity));
                    HitOutcome::Defeated { amount }
                }
            }
        }
    }

    /// Stock decay. Only Active entities forget partial progress;
    /// a Vulnerable gauge stays frozen at capacity.
    pub fn tick(&mut self, delta: f32) -> bool {
        if self.state != CombatState::Active {
            return false;
        }
        self.stock.tick(delta)
    }

    fn damaged_event(&self, entity: Entity, amount: u32) -> CombatEvent {
        match self.kind {
            CombatantKind::Enemy => CombatEvent::EnemyDamaged { entity, amount },
            CombatantKind::Boss => CombatEvent::BossDamaged { amount },
        }
    }

    fn defeated_event(&self, entity: Entity) -> CombatEvent {
        match self.kind {
            CombatantKind::Enemy => CombatEvent::EnemyDefeated { entity },
            CombatantKind::Boss => CombatEvent::BossDefeated,
        }
    }
}
