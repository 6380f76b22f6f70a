//! BossAttackSequencer — выполнение выбранного паттерна как таймлайна.
//!
//! Таймлайн = очередь шагов. Каждый `Wait` — именованная точка приостановки
//! с оставшимся временем; `advance()` продвигает очередь на delta и
//! возвращает sub-actions, которые надо выполнить в этом тике.
//!
//! Перед КАЖДЫМ шагом проверяется liveness владельца: мёртвый босс
//! обрывает остаток таймлайна без побочных эффектов.

use std::collections::VecDeque;
use std::sync::Arc;

use bevy::prelude::*;

use crate::boss::config::{BossPatternSet, PatternKind};
use crate::combat::attack::AttackDefinition;

/// Пауза после RotatingAttack (секунды)
pub const ROTATION_COOLDOWN: f32 = 1.0;
/// Количество ударов ground slam по кругу
pub const RADIAL_BURST_COUNT: u32 = 16;
/// Шаг веера FireballBarrage (градусы)
pub const FAN_SPREAD_DEGREES: f32 = 15.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineStep {
    /// Один удар в сторону цели
    Strike,
    /// `count` форм по кругу одним swing, направление i = i × 360/count градусов
    RadialBurst { count: u32 },
    /// Снаряд `index` из `count` (веер вокруг направления на цель)
    Projectile { index: u32, count: u32 },
    Wait { label: &'static str, remaining: f32 },
}

impl TimelineStep {
    fn needs_target(&self) -> bool {
        matches!(self, TimelineStep::Strike | TimelineStep::Projectile { .. })
    }
}

/// Параметры снарядов паттерна
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileParams {
    pub prefab: String,
    pub speed: f32,
    pub lifetime: f32,
}

#[derive(Debug, Clone)]
pub struct Timeline {
    pub kind: PatternKind,
    pub attack: Arc<AttackDefinition>,
    pub projectile: ProjectileParams,
    steps: VecDeque<TimelineStep>,
}

impl Timeline {
    /// Label текущей точки приостановки, если таймлайн сейчас ждёт
    pub fn waiting_on(&self) -> Option<&'static str> {
        match self.steps.front() {
            Some(TimelineStep::Wait { label, .. }) => Some(label),
            _ => None,
        }
    }
}

/// Что выполнить в этом тике (вызывающий превращает в AttackIntent / снаряд)
#[derive(Debug, Clone, PartialEq)]
pub enum SubAction {
    Strike {
        attack: Arc<AttackDefinition>,
        direction: Vec2,
    },
    /// Один swing по нескольким направлениям: цель получает максимум одно попадание
    Burst {
        attack: Arc<AttackDefinition>,
        directions: Vec<Vec2>,
    },
    Projectile {
        attack: Arc<AttackDefinition>,
        direction: Vec2,
        params: ProjectileParams,
        index: u32,
    },
}

impl SubAction {
    pub fn directions(&self) -> &[Vec2] {
        match self {
            SubAction::Strike { direction, .. } | SubAction::Projectile { direction, .. } => {
                std::slice::from_ref(direction)
            }
            SubAction::Burst { directions, .. } => directions,
        }
    }
}

/// Состояние мира, прочитанное заново на этом тике
#[derive(Debug, Clone, Copy)]
pub struct SequencerContext {
    /// Владелец жив и активен
    pub alive: bool,
    pub origin: Vec2,
    /// None → нет активной цели, шаги с целью ждут следующего тика
    pub target: Option<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerStatus {
    Idle,
    Running,
    Completed,
    Aborted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SequencerTick {
    pub actions: Vec<SubAction>,
    pub status: SequencerStatus,
}

impl SequencerTick {
    fn new(actions: Vec<SubAction>, status: SequencerStatus) -> Self {
        Self { actions, status }
    }
}

/// Single-flight: одновременно выполняется не больше одного таймлайна.
#[derive(Component, Debug, Clone, Default)]
pub struct BossAttackSequencer {
    timeline: Option<Timeline>,
}

impl BossAttackSequencer {
    pub fn is_attacking(&self) -> bool {
        self.timeline.is_some()
    }

    pub fn timeline(&self) -> Option<&Timeline> {
        self.timeline.as_ref()
    }

    /// Builds the timeline for `kind`. Returns false when a timeline is
    /// already in flight or the pattern has no usable data.
    pub fn start(&mut self, kind: PatternKind, patterns: &BossPatternSet) -> bool {
        if self.is_attacking() {
            return false;
        }

        let Some(config) = patterns.get(kind) else {
            crate::logger::log_warning(&format!("Boss pattern {} is not configured, skipping", kind.as_str()));
            return false;
        };

        let steps: VecDeque<TimelineStep> = match kind {
            PatternKind::RotatingAttack => VecDeque::from([
                TimelineStep::Strike,
                TimelineStep::Wait {
                    label: "rotation_cooldown",
                    remaining: ROTATION_COOLDOWN,
                },
            ]),
            PatternKind::SpawnMinions => VecDeque::from([
                TimelineStep::RadialBurst {
                    count: RADIAL_BURST_COUNT,
                },
                TimelineStep::Wait {
                    label: "animation",
                    remaining: config.animation_duration.max(0.0),
                },
            ]),
            PatternKind::FireballBarrage => {
                let count = config.projectile_count;
                if count == 0 {
                    crate::logger::log_warning("Boss pattern fireball_barrage has projectile_count 0, skipping");
                    return false;
                }

                let mut steps = VecDeque::with_capacity(count as usize * 2);
                for index in 0..count {
                    if index > 0 {
                        steps.push_back(TimelineStep::Wait {
                            label: "projectile_interval",
                            remaining: config.projectile_interval.max(0.0),
                        });
                    }
                    steps.push_back(TimelineStep::Projectile { index, count });
                }
                steps
            }
        };

        self.timeline = Some(Timeline {
            kind,
            attack: Arc::new(config.attack_definition(kind)),
            projectile: ProjectileParams {
                prefab: config.projectile_prefab.clone(),
                speed: config.projectile_speed,
                lifetime: config.projectile_lifetime,
            },
            steps,
        });
        true
    }

    /// Advances the running timeline by `delta` seconds.
    ///
    /// Leftover time after a finished wait flows into the following steps,
    /// so a tick may execute several steps. A step that needs a target is
    /// held (no time consumed) while `ctx.target` is None.
    pub fn advance(&mut self, delta: f32, ctx: &SequencerContext) -> SequencerTick {
        let Some(timeline) = self.timeline.as_mut() else {
            return SequencerTick::new(Vec::new(), SequencerStatus::Idle);
        };

        let mut actions = Vec::new();
        let mut budget = delta.max(0.0);

        loop {
            if !ctx.alive {
                crate::logger::log(&format!(
                    "Boss timeline {} aborted: owner no longer active",
                    timeline.kind.as_str()
                ));
                self.timeline = None;
                return SequencerTick::new(Vec::new(), SequencerStatus::Aborted);
            }

            let Some(step) = timeline.steps.front_mut() else {
                self.timeline = None;
                return SequencerTick::new(actions, SequencerStatus::Completed);
            };

            if step.needs_target() && ctx.target.is_none() {
                return SequencerTick::new(actions, SequencerStatus::Running);
            }

            match step {
                TimelineStep::Wait { remaining, .. } => {
                    if *remaining > budget {
                        *remaining -= budget;
                        return SequencerTick::new(actions, SequencerStatus::Running);
                    }
                    budget -= *remaining;
                }
                TimelineStep::Strike => {
                    let direction = aim(ctx);
                    actions.push(SubAction::Strike {
                        attack: timeline.attack.clone(),
                        direction,
                    });
                }
                TimelineStep::RadialBurst { count } => {
                    actions.push(SubAction::Burst {
                        attack: timeline.attack.clone(),
                        directions: radial_directions(*count).collect(),
                    });
                }
                TimelineStep::Projectile { index, count } => {
                    let direction = fan_direction(aim(ctx), *index, *count);
                    actions.push(SubAction::Projectile {
                        attack: timeline.attack.clone(),
                        direction,
                        params: timeline.projectile.clone(),
                        index: *index,
                    });
                }
            }

            timeline.steps.pop_front();
        }
    }
}

/// Нормализованное направление на цель; цель в точке босса → вправо
fn aim(ctx: &SequencerContext) -> Vec2 {
    ctx.target
        .and_then(|target| (target - ctx.origin).try_normalize())
        .unwrap_or(Vec2::X)
}

/// Направление i = (cos θ, sin θ), θ = i × 360/count
pub fn radial_directions(count: u32) -> impl Iterator<Item = Vec2> {
    let step = std::f32::consts::TAU / count.max(1) as f32;
    (0..count).map(move |i| Vec2::from_angle(i as f32 * step))
}

/// Базовое направление, повёрнутое на (index − (count − 1)/2) × 15°.
///
/// Веер симметричен для любого count: 5 → −30..+30, 4 → −22.5..+22.5.
pub fn fan_direction(base: Vec2, index: u32, count: u32) -> Vec2 {
    let offset = index as f32 - count.saturating_sub(1) as f32 / 2.0;
    let angle = (offset * FAN_SPREAD_DEGREES).to_radians();
    Vec2::from_angle(angle).rotate(base)
}
