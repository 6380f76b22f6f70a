//! Combat ECS systems (FixedUpdate)

use bevy::prelude::*;

use crate::combat::attack::AttackIntent;
use crate::combat::events::CombatEvent;
use crate::combat::resolver::AttackResolver;
use crate::combat::state_machine::CombatStateMachine;
use crate::combat::targets::{CombatTargetQuery, EcsCombatTargets};
use crate::components::{Defeated, DespawnAfter, Facing, Health};
use crate::config::CombatConfig;
use crate::pool::{EntityPool, PooledCommands};

/// System: decay stock внутри state machine
pub fn tick_combat_states(mut machines: Query<(Entity, &mut CombatStateMachine)>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for (entity, mut machine) in machines.iter_mut() {
        // Без timer_active тикать нечего — не трогаем Changed
        if !machine.stock.timer_active {
            continue;
        }
        if machine.tick(delta) {
            crate::logger::log(&format!("Stock decayed: {:?} forgot partial progress", entity));
        }
    }
}

/// System: AttackIntent → AttackResolver
///
/// Каждый intent читается ровно один раз (per-swing latch).
/// Origin/direction по умолчанию берутся у атакующего.
pub fn resolve_attack_intents(
    mut intents: EventReader<AttackIntent>,
    attackers: Query<(&Transform, Option<&Facing>), Without<Defeated>>,
    mut targets: CombatTargetQuery,
    mut pool: ResMut<EntityPool>,
    mut commands: Commands,
    mut events: EventWriter<CombatEvent>,
    config: Res<CombatConfig>,
) {
    for intent in intents.read() {
        let attacker = attackers.get(intent.attacker).ok();

        let Some(origin) = intent
            .origin
            .or_else(|| attacker.map(|(transform, _)| transform.translation.truncate()))
        else {
            crate::logger::log(&format!(
                "AttackIntent '{}' dropped: attacker {:?} is gone or defeated",
                intent.attack.name, intent.attacker
            ));
            continue;
        };

        let facing = [attacker
            .and_then(|(_, facing)| facing.map(Facing::direction))
            .unwrap_or(Vec2::X)];
        let directions = if intent.directions.is_empty() {
            &facing[..]
        } else {
            &intent.directions[..]
        };

        let mut world = EcsCombatTargets::new(&mut targets);
        let mut effects = PooledCommands::new(&mut pool, &mut commands).with_lifetime(config.hit_effect_lifetime);

        let hits = AttackResolver::execute_burst(
            &intent.attack,
            origin,
            directions,
            intent.attacker,
            &mut world,
            &mut effects,
            &mut events,
        );

        if hits > 0 {
            crate::logger::log(&format!(
                "{:?} '{}' hit {} target(s)",
                intent.attacker, intent.attack.name, hits
            ));
        }
    }
}

/// System: Defeated маркер + отложенный despawn
///
/// State machine уже в Defeated (или голое HP = 0) — entity остаётся в мире
/// `defeat_linger` секунд, чтобы внешние эффекты поражения доиграли.
pub fn mark_defeated(
    mut commands: Commands,
    query: Query<(Entity, &Health, Option<&CombatStateMachine>), Without<Defeated>>,
    config: Res<CombatConfig>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for (entity, health, machine) in query.iter() {
        let defeated = match machine {
            Some(machine) => !machine.is_alive(),
            None => !health.is_alive(),
        };
        if !defeated {
            continue;
        }

        commands.entity(entity).insert((
            Defeated,
            DespawnAfter {
                despawn_time: now + config.defeat_linger,
            },
        ));
        crate::logger::log_info(&format!("Entity {:?} defeated, despawn in {:.1}s", entity, config.defeat_linger));
    }
}

/// System: удаление entity по DespawnAfter
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    let current_time = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if current_time >= despawn_after.despawn_time {
            crate::logger::log(&format!("Despawning entity {:?} (timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}

/// Накопленные CombatEvent (демо, интеграционные тесты, хост без подписчиков)
#[derive(Resource, Debug, Default)]
pub struct CombatLog {
    pub events: Vec<CombatEvent>,
}

impl CombatLog {
    pub fn count(&self, predicate: impl Fn(&CombatEvent) -> bool) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }
}

/// System: CombatEvent → CombatLog
pub fn record_combat_events(mut reader: EventReader<CombatEvent>, mut log: ResMut<CombatLog>) {
    log.events.extend(reader.read().copied());
}
