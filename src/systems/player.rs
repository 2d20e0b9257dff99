use crate::components::{GameplayEntity, Hitboxes, Player};
use crate::config::DodgeConfig;
use crate::events::{GrazeEvent, PlayerHitEvent};
use crate::resources::{LastRun, RunClock, RunStats, Spawner};
use crate::scoring::ScoreCard;
use crate::state::GameScene;
use bevy::prelude::*;

pub const PLAYER_COLOR: Color = Color::srgb(0.0, 0.0, 1.0);

/// Fresh run: clears the previous field, resets counters and places the
/// player in the middle of the arena.
pub fn start_run(
    mut commands: Commands,
    config: Res<DodgeConfig>,
    mut clock: ResMut<RunClock>,
    mut spawner: ResMut<Spawner>,
    mut stats: ResMut<RunStats>,
    leftovers: Query<Entity, With<GameplayEntity>>,
) {
    for entity in leftovers.iter() {
        commands.entity(entity).despawn_recursive();
    }
    *clock = RunClock::default();
    *spawner = Spawner::default();
    *stats = RunStats::default();

    let size = config.player.size;
    commands.spawn((
        Sprite {
            color: PLAYER_COLOR,
            custom_size: Some(Vec2::splat(size as f32)),
            ..default()
        },
        Transform::from_translation(Vec3::new(0.0, 0.0, 1.0)),
        Player {
            speed: config.player.speed,
            sprint_multiplier: config.player.sprint_multiplier,
            direction: Vec2::ZERO,
            sprinting: false,
        },
        Hitboxes::new(size, config.player.graze_margin),
        GameplayEntity,
    ));
    info!(target: "play", "run started");
}

pub fn clear_gameplay(mut commands: Commands, query: Query<Entity, With<GameplayEntity>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

pub fn handle_grazes(mut graze_events: EventReader<GrazeEvent>, mut stats: ResMut<RunStats>) {
    for _ in graze_events.read() {
        stats.grazes += 1;
    }
}

// Ends the run on the first hit and freezes the score
pub fn handle_player_hit(
    mut commands: Commands,
    mut hit_events: EventReader<PlayerHitEvent>,
    config: Res<DodgeConfig>,
    clock: Res<RunClock>,
    stats: Res<RunStats>,
    mut last_run: ResMut<LastRun>,
    mut next_scene: ResMut<NextState<GameScene>>,
) {
    let Some(event) = hit_events.read().last() else {
        return;
    };

    let card = ScoreCard::new(
        clock.elapsed_ms as u32,
        stats.grazes,
        config.scoring.points_per_graze,
    );
    info!(
        target: "play",
        "player hit by {:?} after {} ms with {} near misses (overall {})",
        event.enemy_entity, card.time_score, stats.grazes, card.overall_score
    );

    if let Some(mut entity) = commands.get_entity(event.player_entity) {
        entity.despawn();
    }
    last_run.card = Some(card);
    next_scene.set(GameScene::Result);
}
