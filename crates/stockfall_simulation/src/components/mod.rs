//! ECS Components для боевых entity
//!
//! Организация по доменам:
//! - actor: здоровье, направление взгляда, роли (Player/Enemy/Boss)
//! - combat: hurtbox, теги целей, маркеры поражения

pub mod actor;
pub mod combat;

pub use actor::*;
pub use combat::*;
