// In src/systems/movement.rs
use crate::components::{Enemy, Player};
use crate::config::DodgeConfig;
use crate::resources::Arena;
use bevy::prelude::*;
use std::f32::consts::SQRT_2;

/// Pixels moved along each axis this tick.
pub fn player_step(player: &Player) -> Vec2 {
    let mut speed = if player.direction.x != 0.0 && player.direction.y != 0.0 {
        player.speed / SQRT_2
    } else {
        player.speed
    };
    if player.sprinting {
        speed *= player.sprint_multiplier;
    }
    player.direction * speed
}

pub fn player_movement_system(
    arena: Res<Arena>,
    config: Res<DodgeConfig>,
    mut query: Query<(&mut Transform, &Player)>,
) {
    for (mut transform, player) in query.iter_mut() {
        let step = player_step(player);
        if step == Vec2::ZERO {
            continue;
        }
        let moved = transform.translation.truncate() + step;
        let clamped = arena.clamp(moved, config.player.size as f32);
        transform.translation.x = clamped.x;
        transform.translation.y = clamped.y;
    }
}

pub fn enemy_movement_system(mut query: Query<(&mut Transform, &Enemy)>) {
    for (mut transform, enemy) in query.iter_mut() {
        transform.translation += enemy.velocity.extend(0.0);
    }
}

/// Removes enemies that are outside the arena and still heading away from it.
pub fn despawn_offscreen_enemies(
    mut commands: Commands,
    arena: Res<Arena>,
    config: Res<DodgeConfig>,
    query: Query<(Entity, &Transform, &Enemy)>,
) {
    for (entity, transform, enemy) in query.iter() {
        let pos = transform.translation.truncate();
        let outside = !arena.contains(pos, config.enemy.despawn_margin);
        let leaving = enemy.velocity.dot(pos) > 0.0;
        if outside && leaving {
            commands.entity(entity).despawn_recursive();
        }
    }
}
