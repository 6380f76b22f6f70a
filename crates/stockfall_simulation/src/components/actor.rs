//! Базовые компоненты акторов: Health, Facing, роли (Player/Enemy/Boss)

use bevy::prelude::*;

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Returns the amount actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let applied = amount.min(self.current);
        self.current -= applied;
        applied
    }

    /// current / max, 0.0 для max == 0
    pub fn ratio(&self) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        self.current as f32 / self.max as f32
    }
}

/// Направление взгляда по горизонтали (+1 вправо, -1 влево)
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct Facing(pub i8);

impl Default for Facing {
    fn default() -> Self {
        Self(1)
    }
}

impl Facing {
    pub fn sign(&self) -> f32 {
        if self.0 < 0 {
            -1.0
        } else {
            1.0
        }
    }

    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.sign(), 0.0)
    }
}

/// Игрок — цель для босса, источник AttackIntent
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Health, Facing)]
pub struct Player;

/// Обычный враг (zako)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Health, Facing)]
pub struct Enemy;

/// Босс: помимо state machine несёт decision engine + sequencer
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Health, Facing)]
pub struct Boss;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(100);

        assert_eq!(health.take_damage(30), 30);
        assert_eq!(health.current, 70);
        assert!(health.is_alive());

        assert_eq!(health.take_damage(100), 70); // Saturating
        assert_eq!(health.current, 0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_health_ratio() {
        let mut health = Health::new(200);
        health.take_damage(120);
        assert_eq!(health.ratio(), 0.4);

        assert_eq!(Health { current: 0, max: 0 }.ratio(), 0.0);
    }

    #[test]
    fn test_facing_direction() {
        assert_eq!(Facing(-1).direction(), Vec2::new(-1.0, 0.0));
        assert_eq!(Facing::default().direction(), Vec2::X);
    }
}
