//! Boss ECS systems: появление, выбор паттерна, продвижение таймлайна.

use bevy::prelude::*;

use crate::boss::config::BossPatternSet;
use crate::boss::decision::BossDecisionEngine;
use crate::boss::projectile::Projectile;
use crate::boss::sequencer::{BossAttackSequencer, SequencerContext, SequencerStatus, SubAction};
use crate::combat::attack::AttackIntent;
use crate::combat::events::{CombatEvent, CombatEventSink};
use crate::combat::state_machine::CombatStateMachine;
use crate::components::{Boss, Health};
use crate::pool::{EntityPool, PooledCommands, TransientPool};
use crate::targeting::{PlayerTarget, TargetProvider};
use crate::DeterministicRng;

/// System: BossAppear при появлении босса в мире
pub fn announce_boss_appearance(bosses: Query<Entity, Added<Boss>>, mut events: EventWriter<CombatEvent>) {
    for entity in bosses.iter() {
        events.publish(CombatEvent::BossAppear);
        crate::logger::log_info(&format!("Boss {:?} appeared", entity));
    }
}

/// System: BossDecisionEngine + BossAttackSequencer
///
/// Без активного таймлайна: cooldown → select_pattern → start (delta 0,
/// первый шаг выполняется в этом же тике). С таймлайном: advance(delta).
/// Strike/Burst → AttackIntent (разрешается в `CombatSet::Resolve`),
/// Projectile → pooled entity с `Projectile`.
pub fn run_boss_patterns(
    mut bosses: Query<
        (
            Entity,
            &Transform,
            &Health,
            &CombatStateMachine,
            &BossPatternSet,
            &mut BossDecisionEngine,
            &mut BossAttackSequencer,
        ),
        With<Boss>,
    >,
    target: PlayerTarget,
    mut rng: ResMut<DeterministicRng>,
    mut intents: EventWriter<AttackIntent>,
    mut pool: ResMut<EntityPool>,
    mut commands: Commands,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();
    let target_position = target.target_position();
    let mut pooled = PooledCommands::new(&mut pool, &mut commands);

    for (entity, transform, health, machine, patterns, mut engine, mut sequencer) in bosses.iter_mut() {
        let origin = transform.translation.truncate();
        let alive = machine.is_alive();

        // Vulnerable = "ready to launch": поведение на паузе
        if alive && machine.is_vulnerable() {
            continue;
        }

        let delta = if sequencer.is_attacking() {
            time.delta_secs()
        } else {
            if !alive || !engine.can_attack(now, patterns) {
                continue;
            }
            // Нет цели — повторим на следующем тике
            let Some(target) = target_position else {
                continue;
            };

            let kind = engine.select_pattern(origin.distance(target), health.ratio(), &mut rng.rng);
            if !sequencer.start(kind, patterns) {
                // Паттерн без данных: попытка тратит cooldown, чтобы не спамить каждый тик
                engine.record_attack(now);
                continue;
            }

            crate::logger::log_info(&format!(
                "Boss {:?} starts {} (distance {:.0}, hp {:.2})",
                entity,
                kind.as_str(),
                origin.distance(target),
                health.ratio()
            ));
            0.0
        };

        let ctx = SequencerContext {
            alive,
            origin,
            target: target_position,
        };
        let tick = sequencer.advance(delta, &ctx);

        for action in tick.actions {
            match action {
                SubAction::Strike { attack, direction } => {
                    intents.write(AttackIntent {
                        attacker: entity,
                        attack,
                        origin: Some(origin),
                        directions: vec![direction],
                    });
                }
                SubAction::Burst { attack, directions } => {
                    intents.write(AttackIntent {
                        attacker: entity,
                        attack,
                        origin: Some(origin),
                        directions,
                    });
                }
                SubAction::Projectile {
                    attack,
                    direction,
                    params,
                    index,
                } => {
                    let handle = pooled.acquire(&params.prefab, origin, direction.y.atan2(direction.x));
                    pooled
                        .commands()
                        .entity(handle)
                        .insert(Projectile::new(entity, attack, direction, params.speed, params.lifetime));
                    crate::logger::log(&format!("Boss {:?} fired projectile #{} ({:?})", entity, index, handle));
                }
            }
        }

        match tick.status {
            SequencerStatus::Completed => {
                engine.record_attack(now);
            }
            SequencerStatus::Aborted => {
                crate::logger::log_info(&format!("Boss {:?} timeline aborted", entity));
            }
            SequencerStatus::Idle | SequencerStatus::Running => {}
        }
    }
}
