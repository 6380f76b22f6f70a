//! Transient object pool (hit effects, projectiles)
//!
//! Рендер/анимация эффектов — на стороне хоста. Симуляция только выдаёт
//! entity с Transform и возвращает их в пул. Пустой пул → обычный spawn.

use std::collections::HashMap;

use bevy::prelude::*;

pub type InstanceHandle = Entity;

/// Acquire/Release контракт пула, которым пользуется боевое ядро.
pub trait TransientPool {
    fn acquire(&mut self, prefab: &str, position: Vec2, rotation: f32) -> InstanceHandle;
    fn release(&mut self, handle: InstanceHandle);
}

/// Entity выдан пулом под этот prefab id
#[derive(Component, Debug, Clone)]
pub struct Pooled {
    pub prefab: String,
}

/// Компонент-маркер: entity вернулся в пул и ждёт переиспользования
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Released;

/// Сколько ещё живёт выданный entity до автоматического release
#[derive(Component, Debug, Clone, Copy)]
pub struct TransientLifetime {
    pub remaining: f32,
}

#[derive(Resource, Debug, Default)]
pub struct EntityPool {
    free: HashMap<String, Vec<Entity>>,
    live: HashMap<Entity, String>,
    /// Сколько entity пришлось создать (пул был пуст)
    pub spawned: usize,
}

impl EntityPool {
    pub fn free_count(&self, prefab: &str) -> usize {
        self.free.get(prefab).map_or(0, Vec::len)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, handle: InstanceHandle) -> bool {
        self.live.contains_key(&handle)
    }
}

/// `TransientPool` поверх `EntityPool` + `Commands` на время одной системы.
pub struct PooledCommands<'a, 'w, 's> {
    pool: &'a mut EntityPool,
    commands: &'a mut Commands<'w, 's>,
    lifetime: Option<f32>,
}

impl<'a, 'w, 's> PooledCommands<'a, 'w, 's> {
    pub fn new(pool: &'a mut EntityPool, commands: &'a mut Commands<'w, 's>) -> Self {
        Self {
            pool,
            commands,
            lifetime: None,
        }
    }

    /// Acquired instances get a `TransientLifetime` and are released by
    /// `expire_transients` when it runs out.
    pub fn with_lifetime(mut self, seconds: f32) -> Self {
        self.lifetime = Some(seconds);
        self
    }

    pub fn commands(&mut self) -> &mut Commands<'w, 's> {
        &mut *self.commands
    }
}

impl TransientPool for PooledCommands<'_, '_, '_> {
    fn acquire(&mut self, prefab: &str, position: Vec2, rotation: f32) -> InstanceHandle {
        let transform = Transform::from_xyz(position.x, position.y, 0.0)
            .with_rotation(Quat::from_rotation_z(rotation));

        let recycled = self.pool.free.get_mut(prefab).and_then(Vec::pop);
        let entity = match recycled {
            Some(entity) => {
                self.commands.entity(entity).remove::<Released>().insert(transform);
                entity
            }
            None => {
                self.pool.spawned += 1;
                self.commands
                    .spawn((Pooled { prefab: prefab.to_string() }, transform))
                    .id()
            }
        };

        if let Some(remaining) = self.lifetime {
            self.commands.entity(entity).insert(TransientLifetime { remaining });
        }

        self.pool.live.insert(entity, prefab.to_string());
        entity
    }

    fn release(&mut self, handle: InstanceHandle) {
        // Повторный release — no-op
        let Some(prefab) = self.pool.live.remove(&handle) else {
            return;
        };

        self.commands
            .entity(handle)
            .remove::<TransientLifetime>()
            .insert(Released);
        self.pool.free.entry(prefab).or_default().push(handle);
    }
}

/// System: release выданных entity с истёкшим TransientLifetime
pub fn expire_transients(
    mut query: Query<(Entity, &mut TransientLifetime), Without<Released>>,
    mut pool: ResMut<EntityPool>,
    mut commands: Commands,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let mut pooled = PooledCommands::new(&mut pool, &mut commands);

    for (entity, mut lifetime) in query.iter_mut() {
        lifetime.remaining -= delta;
        if lifetime.remaining <= 0.0 {
            pooled.release(entity);
        }
    }
}
