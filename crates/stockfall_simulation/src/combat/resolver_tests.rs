//! Tests for AttackResolver against an in-memory target world.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use crate::combat::attack::{AttackDefinition, HitShape, TargetFilter};
    use crate::combat::capability::{Damageable, StateMachineTarget, Stockable};
    use crate::combat::events::{CombatEvent, CombatEventSink};
    use crate::combat::resolver::{AttackResolver, CombatTargets, DamageReport, SpatialQuery};
    use crate::combat::state_machine::{CombatState, CombatStateMachine, CombatantKind, Hit};
    use crate::components::{Health, TargetTag};
    use crate::pool::{InstanceHandle, TransientPool};
    use crate::stock::{StockGauge, StockSignal};

    struct FakeTarget {
        entity: Entity,
        tag: TargetTag,
        position: Vec2,
        health: Option<Health>,
        machine: Option<CombatStateMachine>,
        gauge: Option<StockGauge>,
    }

    impl FakeTarget {
        fn new(index: u32, tag: TargetTag, position: Vec2) -> Self {
            Self {
                entity: Entity::from_raw(index),
                tag,
                position,
                health: None,
                machine: None,
                gauge: None,
            }
        }

        fn enemy(index: u32, position: Vec2) -> Self {
            Self {
                health: Some(Health::new(20)),
                machine: Some(CombatStateMachine::new(CombatantKind::Enemy, StockGauge::new(4, 3.0))),
                ..Self::new(index, TargetTag::Enemy, position)
            }
        }
    }

    #[derive(Default)]
    struct FakeWorld {
        targets: Vec<FakeTarget>,
        /// Overlap возвращает каждый коллайдер дважды
        duplicate_overlaps: bool,
    }

    impl FakeWorld {
        fn get(&self, entity: Entity) -> Option<&FakeTarget> {
            self.targets.iter().find(|t| t.entity == entity)
        }

        fn get_mut(&mut self, entity: Entity) -> Option<&mut FakeTarget> {
            self.targets.iter_mut().find(|t| t.entity == entity)
        }
    }

    impl SpatialQuery for FakeWorld {
        fn overlap(&self, shape: &HitShape, center: Vec2) -> Vec<(Entity, TargetTag)> {
            let repeat = if self.duplicate_overlaps { 2 } else { 1 };
            self.targets
                .iter()
                .filter(|t| shape.overlaps_circle(center, t.position, 1.0))
                .flat_map(|t| std::iter::repeat((t.entity, t.tag)).take(repeat))
                .collect()
        }
    }

    impl CombatTargets for FakeWorld {
        fn position(&self, entity: Entity) -> Option<Vec2> {
            self.get(entity).map(|t| t.position)
        }

        fn take_damage(
            &mut self,
            entity: Entity,
            hit: &Hit,
            events: &mut dyn CombatEventSink,
        ) -> Option<DamageReport> {
            let target = self.get_mut(entity)?;
            match (target.machine.as_mut(), target.health.as_mut()) {
                (Some(machine), Some(health)) => {
                    let mut view = StateMachineTarget { machine, health };
                    let outcome = view.take_damage(entity, hit, events);
                    Some(DamageReport { outcome, stock_routed: true })
                }
                (None, Some(health)) => {
                    let outcome = Damageable::take_damage(health, entity, hit, events);
                    Some(DamageReport { outcome, stock_routed: false })
                }
                _ => None,
            }
        }

        fn add_stock(&mut self, entity: Entity, amount: u32) -> Option<StockSignal> {
            let gauge = self.get_mut(entity)?.gauge.as_mut()?;
            Some(Stockable::add_stock(gauge, amount))
        }
    }

    #[derive(Default)]
    struct RecordingPool {
        acquired: Vec<(String, Vec2)>,
    }

    impl TransientPool for RecordingPool {
        fn acquire(&mut self, prefab: &str, position: Vec2, _rotation: f32) -> InstanceHandle {
            self.acquired.push((prefab.to_string(), position));
            Entity::from_raw(1000 + self.acquired.len() as u32)
        }

        fn release(&mut self, _handle: InstanceHandle) {}
    }

    fn slash() -> AttackDefinition {
        AttackDefinition {
            name: "slash".to_string(),
            damage: 5,
            range: 10.0,
            shape: HitShape::Circle { radius: 10.0 },
            target_filter: TargetFilter::any_of(&[TargetTag::Enemy, TargetTag::Boss]),
            stock_award: 1,
            hit_effect: Some("spark".to_string()),
        }
    }

    #[test]
    fn test_execute_hits_matching_targets_only() {
        let acting = Entity::from_raw(99);
        let mut world = FakeWorld {
            targets: vec![
                FakeTarget::enemy(1, Vec2::new(10.0, 0.0)),
                FakeTarget::enemy(2, Vec2::new(15.0, 3.0)),
                FakeTarget::enemy(3, Vec2::new(200.0, 0.0)), // вне формы
                FakeTarget { health: Some(Health::new(50)), ..FakeTarget::new(4, TargetTag::Player, Vec2::new(12.0, 0.0)) },
                FakeTarget { health: Some(Health::new(50)), ..FakeTarget::new(99, TargetTag::Enemy, Vec2::new(8.0, 0.0)) },
            ],
            ..Default::default()
        };
        let mut pool = RecordingPool::default();
        let mut events: Vec<CombatEvent> = Vec::new();

        let hits = AttackResolver::execute(&slash(), Vec2::ZERO, Vec2::X, acting, &mut world, &mut pool, &mut events);

        assert_eq!(hits, 2);
        assert_eq!(world.targets[0].machine.as_ref().map(|m| m.stock.count), Some(1));
        assert_eq!(world.targets[2].machine.as_ref().map(|m| m.stock.count), Some(0));
        assert_eq!(world.targets[3].health.map(|h| h.current), Some(50)); // игрок отфильтрован
        assert_eq!(world.targets[4].health.map(|h| h.current), Some(50)); // сам атакующий
        assert_eq!(pool.acquired.len(), 2);
        assert_eq!(pool.acquired[0], ("spark".to_string(), Vec2::new(10.0, 0.0)));
    }

    #[test]
    fn test_state_machine_target_is_not_stocked_twice() {
        let mut world = FakeWorld {
            targets: vec![FakeTarget {
                gauge: Some(StockGauge::new(10, 3.0)),
                ..FakeTarget::enemy(1, Vec2::new(10.0, 0.0))
            }],
            ..Default::default()
        };
        let mut pool = RecordingPool::default();
        let mut events: Vec<CombatEvent> = Vec::new();

        AttackResolver::execute(&slash(), Vec2::ZERO, Vec2::X, Entity::PLACEHOLDER, &mut world, &mut pool, &mut events);

        let target = &world.targets[0];
        assert_eq!(target.machine.as_ref().map(|m| m.stock.count), Some(1));
        assert_eq!(target.gauge.map(|g| g.count), Some(0));
    }

    #[test]
    fn test_separate_stockable_gets_direct_award() {
        let mut world = FakeWorld {
            targets: vec![
                FakeTarget {
                    health: Some(Health::new(30)),
                    gauge: Some(StockGauge::new(4, 3.0)),
                    ..FakeTarget::new(1, TargetTag::Enemy, Vec2::new(10.0, 0.0))
                },
                // Только stock, без HP
                FakeTarget {
                    gauge: Some(StockGauge::new(4, 3.0)),
                    ..FakeTarget::new(2, TargetTag::Enemy, Vec2::new(12.0, 0.0))
                },
            ],
            ..Default::default()
        };
        let mut pool = RecordingPool::default();
        let mut events: Vec<CombatEvent> = Vec::new();

        let hits = AttackResolver::execute(&slash(), Vec2::ZERO, Vec2::X, Entity::PLACEHOLDER, &mut world, &mut pool, &mut events);

        assert_eq!(hits, 2);
        assert_eq!(world.targets[0].health.map(|h| h.current), Some(25));
        assert_eq!(world.targets[0].gauge.map(|g| g.count), Some(1));
        assert_eq!(world.targets[1].gauge.map(|g| g.count), Some(1));
    }

    #[test]
    fn test_defeated_target_is_not_counted() {
        let mut defeated = FakeTarget::enemy(1, Vec2::new(10.0, 0.0));
        if let Some(machine) = defeated.machine.as_mut() {
            machine.state = CombatState::Defeated;
        }
        let mut world = FakeWorld {
            targets: vec![defeated],
            ..Default::default()
        };
        let mut pool = RecordingPool::default();
        let mut events: Vec<CombatEvent> = Vec::new();

        let hits = AttackResolver::execute(&slash(), Vec2::ZERO, Vec2::X, Entity::PLACEHOLDER, &mut world, &mut pool, &mut events);

        assert_eq!(hits, 0);
        assert!(pool.acquired.is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn test_duplicate_overlaps_count_once() {
        let mut world = FakeWorld {
            targets: vec![FakeTarget::enemy(1, Vec2::new(10.0, 0.0))],
            duplicate_overlaps: true,
        };
        let mut pool = RecordingPool::default();
        let mut events: Vec<CombatEvent> = Vec::new();

        let hits = AttackResolver::execute(&slash(), Vec2::ZERO, Vec2::X, Entity::PLACEHOLDER, &mut world, &mut pool, &mut events);

        assert_eq!(hits, 1);
        assert_eq!(world.targets[0].machine.as_ref().map(|m| m.stock.count), Some(1));
    }

    #[test]
    fn test_vulnerable_target_loses_hp_and_publishes() {
        let mut target = FakeTarget::enemy(1, Vec2::new(10.0, 0.0));
        if let Some(machine) = target.machine.as_mut() {
            machine.stock.add_stock(4);
            machine.state = CombatState::Vulnerable;
        }
        let entity = target.entity;
        let mut world = FakeWorld {
            targets: vec![target],
            ..Default::default()
        };
        let mut pool = RecordingPool::default();
        let mut events: Vec<CombatEvent> = Vec::new();

        AttackResolver::execute(&slash(), Vec2::ZERO, Vec2::X, Entity::PLACEHOLDER, &mut world, &mut pool, &mut events);

        assert_eq!(world.targets[0].health.map(|h| h.current), Some(15));
        assert_eq!(events, vec![CombatEvent::EnemyDamaged { entity, amount: 5 }]);
    }

    #[test]
    fn test_burst_strikes_target_between_spokes_once() {
        // Цель между двумя соседними направлениями, попадает в обе формы
        let mut target = FakeTarget::enemy(1, Vec2::from_angle(0.2) * 10.0);
        if let Some(machine) = target.machine.as_mut() {
            machine.stock.add_stock(4);
            machine.state = CombatState::Vulnerable;
        }
        let mut world = FakeWorld {
            targets: vec![target],
            ..Default::default()
        };
        let mut pool = RecordingPool::default();
        let mut events: Vec<CombatEvent> = Vec::new();
        let directions = [Vec2::X, Vec2::from_angle(0.4)];

        let hits = AttackResolver::execute_burst(
            &slash(),
            Vec2::ZERO,
            &directions,
            Entity::PLACEHOLDER,
            &mut world,
            &mut pool,
            &mut events,
        );

        assert_eq!(hits, 1);
        assert_eq!(world.targets[0].health.map(|h| h.current), Some(15));
        // Второе направление не добавило stock после выхода из Vulnerable
        assert_eq!(world.targets[0].machine.as_ref().map(|m| m.stock.count), Some(0));
        assert_eq!(pool.acquired.len(), 1);
    }
}
