//! Headless симуляция STOCKFALL
//!
//! Игрок против босса и двух врагов без рендера. Игрок бьёт "heavy" в
//! сторону босса каждые SWING_EVERY тиков, в конце печатается сводка
//! CombatLog.
//!
//! Usage: stockfall_simulation [combat_config.json]

use bevy::prelude::*;
use stockfall_simulation::spawn::{spawn_boss, spawn_player, spawn_weak_enemy};
use stockfall_simulation::{
    create_headless_app, log_error, set_log_level, AttackIntent, CombatConfig, CombatEvent, CombatLog, Health, LogLevel,
    SimulationPlugin,
};

const TICKS: u32 = 3600;
const SWING_EVERY: u32 = 10;

fn main() {
    let seed = 42;
    // Debug-лог каждого попадания слишком шумный для демо
    set_log_level(LogLevel::Info);
    println!("Starting STOCKFALL headless simulation (seed: {})", seed);

    let config = match std::env::args().nth(1) {
        Some(path) => match CombatConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                log_error(&format!("{}; falling back to default config", err));
                CombatConfig::default()
            }
        },
        None => CombatConfig::default(),
    };

    let Some(heavy) = config.player_attack("heavy").or_else(|| config.player_attack("slash")) else {
        log_error("Config has no player attacks, nothing to simulate");
        return;
    };

    let mut app = create_headless_app(seed);
    app.insert_resource(config.clone()).add_plugins(SimulationPlugin);

    let (player, boss) = {
        let mut commands = app.world_mut().commands();
        let player = spawn_player(&mut commands, &config, Vec2::ZERO);
        let boss = spawn_boss(&mut commands, &config, Vec2::new(100.0, 0.0));
        spawn_weak_enemy(&mut commands, &config, Vec2::new(60.0, 30.0));
        spawn_weak_enemy(&mut commands, &config, Vec2::new(60.0, -30.0));
        (player, boss)
    };
    app.world_mut().flush();

    for tick in 0..TICKS {
        if tick % SWING_EVERY == 0 {
            app.world_mut().send_event(AttackIntent {
                attacker: player,
                attack: heavy.clone(),
                origin: None,
                directions: vec![Vec2::X],
            });
        }

        app.update();

        if tick % 300 == 0 {
            let world = app.world();
            let hp = |entity| world.get::<Health>(entity).map_or(0, |h| h.current);
            println!(
                "Tick {}: player HP {}, boss HP {}, {} entities",
                tick,
                hp(player),
                hp(boss),
                world.entities().len()
            );
        }

        let log = app.world().resource::<CombatLog>();
        if log.count(|e| matches!(e, CombatEvent::BossDefeated)) > 0 {
            println!("Boss defeated on tick {}", tick);
            break;
        }
        if app.world().get::<Health>(player).map_or(true, |h| !h.is_alive()) {
            println!("Player defeated on tick {}", tick);
            break;
        }
    }

    let log = app.world().resource::<CombatLog>();
    println!("Combat events: {}", log.events.len());
    println!("  StockFull:     {}", log.count(|e| matches!(e, CombatEvent::StockFull { .. })));
    println!("  EnemyDamaged:  {}", log.count(|e| matches!(e, CombatEvent::EnemyDamaged { .. })));
    println!("  EnemyDefeated: {}", log.count(|e| matches!(e, CombatEvent::EnemyDefeated { .. })));
    println!("  BossDamaged:   {}", log.count(|e| matches!(e, CombatEvent::BossDamaged { .. })));
    println!("Simulation complete!");
}
