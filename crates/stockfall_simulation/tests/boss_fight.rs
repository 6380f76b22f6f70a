//! Интеграционные тесты босса: появление, выбор паттерна, таймлайн, отмена.

use std::sync::Arc;

use bevy::prelude::*;
use rstest::rstest;
use stockfall_simulation::boss::{BossAttackSequencer, BossPatternConfig, BossPatternSet, PatternKind, Projectile};
use stockfall_simulation::spawn::{spawn_boss, spawn_player};
use stockfall_simulation::{
    create_headless_app, AttackDefinition, AttackIntent, CombatConfig, CombatEvent, CombatLog, CombatState,
    CombatStateMachine, Health, SimulationPlugin,
};

/// Игрок в (0,0), босс на `distance` вправо
fn setup(seed: u64, config: CombatConfig, distance: f32) -> (App, Entity, Entity) {
    let mut app = create_headless_app(seed);
    app.insert_resource(config.clone()).add_plugins(SimulationPlugin);

    let (player, boss) = {
        let mut commands = app.world_mut().commands();
        (
            spawn_player(&mut commands, &config, Vec2::ZERO),
            spawn_boss(&mut commands, &config, Vec2::new(distance, 0.0)),
        )
    };
    app.world_mut().flush();

    (app, player, boss)
}

fn player_hp(app: &App, player: Entity) -> u32 {
    app.world().get::<Health>(player).map_or(0, |h| h.current)
}

fn sequencer(app: &App, boss: Entity) -> BossAttackSequencer {
    app.world()
        .get::<BossAttackSequencer>(boss)
        .cloned()
        .expect("boss has a sequencer")
}

fn projectile_count(app: &mut App) -> usize {
    let world = app.world_mut();
    let mut query = world.query::<&Projectile>();
    query.iter(world).count()
}

/// Тикает, пока босс не начнёт паттерн; возвращает его kind
fn wait_for_pattern(app: &mut App, boss: Entity) -> PatternKind {
    for _ in 0..600 {
        app.update();
        if let Some(timeline) = sequencer(app, boss).timeline() {
            return timeline.kind;
        }
    }
    panic!("boss never started a pattern");
}

#[test]
fn test_boss_appear_is_published_once() {
    let (mut app, _player, _boss) = setup(1, CombatConfig::default(), 100.0);

    for _ in 0..10 {
        app.update();
    }

    let log = app.world().resource::<CombatLog>();
    assert_eq!(log.count(|e| matches!(e, CombatEvent::BossAppear)), 1);
}

#[test]
fn test_healthy_boss_in_melee_range_uses_rotating_attack() {
    let (mut app, player, boss) = setup(1, CombatConfig::default(), 100.0);

    assert_eq!(wait_for_pattern(&mut app, boss), PatternKind::RotatingAttack);

    // Первый удар в тике старта; следующий паттерн не раньше cooldown + rotation
    for _ in 0..60 {
        app.update();
    }
    assert_eq!(player_hp(&app, player), 85);
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
#[case(42)]
#[case(1337)]
fn test_low_hp_boss_never_melees(#[case] seed: u64) {
    let (mut app, _player, boss) = setup(seed, CombatConfig::default(), 250.0);
    if let Some(mut health) = app.world_mut().get_mut::<Health>(boss) {
        health.current = 80; // 0.4
    }

    let kind = wait_for_pattern(&mut app, boss);

    assert!(
        matches!(kind, PatternKind::FireballBarrage | PatternKind::SpawnMinions),
        "seed {} picked {:?}",
        seed,
        kind
    );
}

fn fireball_only() -> CombatConfig {
    let mut config = CombatConfig::default();
    config.boss.patterns = BossPatternSet {
        fireball_barrage: Some(BossPatternConfig {
            projectile_count: 5,
            projectile_interval: 0.2,
            ..Default::default()
        }),
        ..Default::default()
    };
    config
}

#[test]
fn test_barrage_spawns_five_projectiles() {
    let (mut app, _player, boss) = setup(1, fireball_only(), 500.0);

    assert_eq!(wait_for_pattern(&mut app, boss), PatternKind::FireballBarrage);
    for _ in 0..120 {
        app.update();
    }

    assert_eq!(projectile_count(&mut app), 5);
    assert!(!sequencer(&app, boss).is_attacking());
}

#[test]
fn test_defeat_mid_barrage_stops_remaining_projectiles() {
    let (mut app, _player, boss) = setup(1, fireball_only(), 500.0);

    wait_for_pattern(&mut app, boss);
    for _ in 0..60 {
        if projectile_count(&mut app) == 2 {
            break;
        }
        app.update();
    }
    assert_eq!(projectile_count(&mut app), 2);

    if let Some(mut machine) = app.world_mut().get_mut::<CombatStateMachine>(boss) {
        machine.state = CombatState::Defeated;
    }
    for _ in 0..120 {
        app.update();
    }

    assert_eq!(projectile_count(&mut app), 2);
}

#[test]
fn test_projectile_hits_player_at_most_once() {
    let mut config = fireball_only();
    if let Some(fireball) = config.boss.patterns.fireball_barrage.as_mut() {
        fireball.projectile_count = 1;
        fireball.damage = 8;
    }
    // Дальше melee range — только так выбирается FireballBarrage
    let (mut app, player, _boss) = setup(1, config, 400.0);

    // Старт на 2.0s, 364px при 400px/s ≈ 55 тиков, следующий залп не раньше 4.0s
    for _ in 0..200 {
        app.update();
    }

    assert_eq!(player_hp(&app, player), 92);
}

#[test]
fn test_ground_slam_hits_player_between_spokes_once() {
    let mut config = CombatConfig::default();
    config.boss.patterns = BossPatternSet {
        spawn_minions: BossPatternSet::standard().spawn_minions,
        ..Default::default()
    };
    // Пропущенные fireball-ходы не должны растянуть ожидание
    config.boss.thresholds.base_attack_cooldown = 0.25;
    let slam_damage = config.boss.patterns.spawn_minions.as_ref().map_or(0, |p| p.damage);
    let (mut app, player, boss) = setup(1, config, 500.0);
    if let Some(mut health) = app.world_mut().get_mut::<Health>(boss) {
        health.current = 80; // 0.4 → только ground slam
    }
    // Ровно между спицами 0° и 22.5°: задевают обе формы
    if let Some(mut transform) = app.world_mut().get_mut::<Transform>(player) {
        let offset = Vec2::from_angle(11.25_f32.to_radians()) * 120.0;
        transform.translation = (Vec2::new(500.0, 0.0) + offset).extend(0.0);
    }

    assert_eq!(wait_for_pattern(&mut app, boss), PatternKind::SpawnMinions);

    assert_eq!(player_hp(&app, player), 100 - slam_damage);
}

#[test]
fn test_unconfigured_pattern_in_range_is_not_replaced() {
    // Только fireball: здоровый босс вплотную всегда выбирает melee и пропускает ход
    let (mut app, player, boss) = setup(1, fireball_only(), 100.0);

    for _ in 0..600 {
        app.update();
        assert!(!sequencer(&app, boss).is_attacking());
    }

    assert_eq!(projectile_count(&mut app), 0);
    assert_eq!(player_hp(&app, player), 100);
}

#[test]
fn test_unconfigured_boss_never_attacks() {
    let mut config = CombatConfig::default();
    config.boss.patterns = BossPatternSet::default();
    let (mut app, player, boss) = setup(1, config, 100.0);

    for _ in 0..600 {
        app.update();
    }

    assert!(!sequencer(&app, boss).is_attacking());
    assert_eq!(player_hp(&app, player), 100);
}

#[test]
fn test_player_stocks_boss_until_vulnerable_then_damages() {
    let mut config = CombatConfig::default();
    config.boss.patterns = BossPatternSet::default();
    let (mut app, player, boss) = setup(1, config, 100.0);
    let heavy: Arc<AttackDefinition> = app
        .world()
        .resource::<CombatConfig>()
        .player_attack("heavy")
        .expect("default config has heavy");

    let mut swing = |app: &mut App| {
        app.world_mut().send_event(AttackIntent {
            attacker: player,
            attack: heavy.clone(),
            origin: None,
            directions: Vec::new(),
        });
        app.update();
    };

    // capacity 20, stock 2 за удар
    for _ in 0..10 {
        swing(&mut app);
    }
    let state = app.world().get::<CombatStateMachine>(boss).map(|m| m.state);
    assert_eq!(state, Some(CombatState::Vulnerable));
    assert_eq!(app.world().get::<Health>(boss).map(|h| h.current), Some(200));

    swing(&mut app);

    assert_eq!(app.world().get::<Health>(boss).map(|h| h.current), Some(180));
    let log = app.world().resource::<CombatLog>();
    assert_eq!(log.count(|e| matches!(e, CombatEvent::BossDamaged { amount: 20 })), 1);
    assert_eq!(log.count(|e| matches!(e, CombatEvent::StockFull { .. })), 1);
}

#[test]
fn test_vulnerable_boss_holds_its_attacks() {
    let (mut app, player, boss) = setup(1, CombatConfig::default(), 100.0);
    if let Some(mut machine) = app.world_mut().get_mut::<CombatStateMachine>(boss) {
        machine.stock.add_stock(20);
        machine.state = CombatState::Vulnerable;
    }

    for _ in 0..300 {
        app.update();
    }

    assert!(!sequencer(&app, boss).is_attacking());
    assert_eq!(player_hp(&app, player), 100);
}
