//! StockGauge — ограниченный счётчик "стока" с таймером забывания.

use bevy::prelude::*;

/// Результат `StockGauge::add_stock`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockSignal {
    /// Ничего не изменилось (amount == 0 или gauge уже полон)
    Unchanged,
    /// Частичный прогресс, decay timer перезапущен
    Progress,
    /// count только что достиг capacity (edge-triggered, ровно один раз)
    ThresholdReached,
}

/// Per-entity stock counter.
///
/// Invariant: `0 ≤ count ≤ capacity`. The decay timer only runs while the
/// gauge holds partial progress (`0 < count < capacity`); when it runs out
/// the progress is forgotten.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct StockGauge {
    pub count: u32,
    pub capacity: u32,
    /// Remaining time before partial progress is cleared (seconds)
    pub decay_timer: f32,
    pub decay_duration: f32,
    pub timer_active: bool,
}

impl Default for StockGauge {
    fn default() -> Self {
        Self::new(4, 3.0)
    }
}

impl StockGauge {
    /// Capacity 0 would make every gauge permanently full; clamp to 1.
    pub fn new(capacity: u32, decay_duration: f32) -> Self {
        Self {
            count: 0,
            capacity: capacity.max(1),
            decay_timer: 0.0,
            decay_duration: decay_duration.max(0.0),
            timer_active: false,
        }
    }

    pub fn is_full(&self) -> bool {
        self.count >= self.capacity
    }

    pub fn add_stock(&mut self, amount: u32) -> StockSignal {
        if amount == 0 || self.is_full() {
            return StockSignal::Unchanged;
        }

        self.count = self.count.saturating_add(amount).min(self.capacity);

        if self.is_full() {
            // Полный gauge не забывается — его сбрасывает state machine
            self.timer_active = false;
            self.decay_timer = 0.0;
            StockSignal::ThresholdReached
        } else {
            self.decay_timer = self.decay_duration;
            self.timer_active = true;
            StockSignal::Progress
        }
    }

    pub fn clear_stock(&mut self) {
        self.count = 0;
        self.decay_timer = 0.0;
        self.timer_active = false;
    }

    /// Advances the decay timer. Returns true when partial progress was
    /// cleared on this tick.
    pub fn tick(&mut self, delta: f32) -> bool {
        if !self.timer_active {
            return false;
        }

        self.decay_timer -= delta;
        if self.decay_timer <= 0.0 {
            self.clear_stock();
            return true;
        }
        false
    }
}
