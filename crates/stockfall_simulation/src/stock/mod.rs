//! Stock mechanic: накопление "заряда" от не-летальных попаданий.
//!
//! Полный gauge открывает окно уязвимости (см. `combat::state_machine`).

use bevy::prelude::*;

pub mod gauge;

pub use gauge::{StockGauge, StockSignal};

/// System: decay standalone gauges (entities stockable через отдельный интерфейс).
///
/// Gauges внутри `CombatStateMachine` тикаются в `combat::systems::tick_combat_states`.
pub fn tick_stock_gauges(mut gauges: Query<&mut StockGauge>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut gauge in gauges.iter_mut() {
        if gauge.timer_active {
            gauge.tick(delta);
        }
    }
}
