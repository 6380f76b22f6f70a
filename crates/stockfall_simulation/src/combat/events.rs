//! Combat events — fire-and-forget канал наружу (эффекты, звук, UI).

use bevy::prelude::*;

/// Событие боевой симуляции
///
/// Причинный порядок сохраняется только для событий одного entity.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatEvent {
    /// Gauge заполнен, entity перешёл в Vulnerable
    StockFull { entity: Entity },
    /// Уязвимый враг получил реальный урон
    EnemyDamaged { entity: Entity, amount: u32 },
    /// Уязвимый босс получил реальный урон
    BossDamaged { amount: u32 },
    EnemyDefeated { entity: Entity },
    BossDefeated,
    /// Босс появился на сцене
    BossAppear,
}

/// Куда state machine и resolver публикуют события.
///
/// В ECS это `EventWriter<CombatEvent>`, в unit-тестах — обычный `Vec`.
pub trait CombatEventSink {
    fn publish(&mut self, event: CombatEvent);
}

impl CombatEventSink for Vec<CombatEvent> {
    fn publish(&mut self, event: CombatEvent) {
        self.push(event);
    }
}

impl CombatEventSink for EventWriter<'_, CombatEvent> {
    fn publish(&mut self, event: CombatEvent) {
        self.write(event);
    }
}
