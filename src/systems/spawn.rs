use crate::components::{Body, Enemy, GameplayEntity, Player};
use crate::config::DodgeConfig;
use crate::mask::Mask;
use crate::resources::{spawn_delay_ms, Arena, RunClock, Spawner};
use bevy::prelude::*;
use rand::Rng;

pub const ENEMY_COLOR: Color = Color::srgb(1.0, 0.0, 0.0);

/// Which pair of arena edges an enemy enters from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Bottom,
    Top,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Launch {
    pub start: Vec2,
    /// Pixels per tick.
    pub velocity: Vec2,
}

/// Places an enemy on `edge` so that it travels along the line of slope
/// `dy / dx` through `target`, heading towards the target.
///
/// `dx` and `dy` must be non-zero.
pub fn launch(dx: i32, dy: i32, target: Vec2, edge: Edge, arena: &Arena, speed_multiplier: f32) -> Launch {
    let slope = dy as f32 / dx as f32;
    let half = arena.half_size;
    let start = match edge {
        Edge::Left | Edge::Right => {
            let x = if edge == Edge::Right { half.x } else { -half.x };
            Vec2::new(x, slope * (x - target.x) + target.y)
        }
        Edge::Bottom | Edge::Top => {
            let y = if edge == Edge::Top { half.y } else { -half.y };
            Vec2::new((y - target.y) / slope + target.x, y)
        }
    };
    let mut velocity = Vec2::new(dx as f32, dy as f32) * speed_multiplier;
    if velocity.dot(target - start) < 0.0 {
        velocity = -velocity;
    }
    Launch { start, velocity }
}

fn nonzero_component(rng: &mut impl Rng, range: i32) -> i32 {
    let value = rng.random_range(-range..=range);
    if value != 0 {
        value
    } else if rng.random_bool(0.5) {
        1
    } else {
        -1
    }
}

pub fn random_launch(rng: &mut impl Rng, player_pos: Vec2, arena: &Arena, config: &DodgeConfig) -> Launch {
    let range = config.enemy.slope_range.max(1);
    let dx = nonzero_component(rng, range);
    let dy = nonzero_component(rng, range);

    let spread = config.enemy.target_spread.max(0.0);
    let target = player_pos
        + Vec2::new(
            rng.random_range(-spread..=spread),
            rng.random_range(-spread..=spread),
        );

    let edge = match rng.random_range(0..4) {
        0 => Edge::Left,
        1 => Edge::Right,
        2 => Edge::Bottom,
        _ => Edge::Top,
    };
    launch(dx, dy, target, edge, arena, config.enemy.speed_multiplier)
}

pub fn tick_run_clock(time: Res<Time>, mut clock: ResMut<RunClock>) {
    clock.elapsed_ms += time.delta_secs() * 1000.0;
}

pub fn enemy_spawn_system(
    mut commands: Commands,
    config: Res<DodgeConfig>,
    arena: Res<Arena>,
    clock: Res<RunClock>,
    mut spawner: ResMut<Spawner>,
    player_query: Query<&Transform, With<Player>>,
) {
    let Ok(player_transform) = player_query.get_single() else {
        return;
    };
    let delay = spawn_delay_ms(clock.elapsed_ms, &config.enemy);
    if clock.elapsed_ms <= spawner.last_spawn_ms + delay {
        return;
    }

    let launch = random_launch(
        &mut rand::rng(),
        player_transform.translation.truncate(),
        &arena,
        &config,
    );
    let size = config.enemy.size;
    commands.spawn((
        Sprite {
            color: ENEMY_COLOR,
            custom_size: Some(Vec2::splat(size as f32)),
            ..default()
        },
        Transform::from_translation(launch.start.extend(0.5)),
        Enemy {
            velocity: launch.velocity,
            counted: false,
        },
        Body(Mask::full(size, size)),
        GameplayEntity,
    ));

    spawner.last_spawn_ms = clock.elapsed_ms;
    spawner.spawned += 1;
    debug!(
        target: "play",
        "enemy #{} at {:?} (elapsed {:.0} ms, delay {:.0} ms)",
        spawner.spawned, launch.start, clock.elapsed_ms, delay
    );
}
