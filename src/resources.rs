// resources.rs
use crate::client::ScoreClient;
use crate::config::{DodgeConfig, EnemyConfig};
use crate::scoring::ScoreCard;
use bevy::prelude::*;

/// Playfield bounds in world space, centred on the origin.
#[derive(Resource, Clone, Copy, Debug)]
pub struct Arena {
    pub half_size: Vec2,
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            half_size: Vec2::new(width / 2.0, height / 2.0),
        }
    }

    pub fn from_config(config: &DodgeConfig) -> Self {
        Self::new(config.window.width, config.window.height)
    }

    pub fn contains(&self, pos: Vec2, margin: f32) -> bool {
        pos.x.abs() <= self.half_size.x + margin && pos.y.abs() <= self.half_size.y + margin
    }

    /// Keeps a square of side `size` centred at `pos` fully inside the arena.
    pub fn clamp(&self, pos: Vec2, size: f32) -> Vec2 {
        let limit = (self.half_size - Vec2::splat(size / 2.0)).max(Vec2::ZERO);
        pos.clamp(-limit, limit)
    }
}

/// Top-left pixel of a `size` wide sprite centred at `center`, in
/// screen-style coordinates (y grows downwards) for mask tests.
pub fn mask_origin(center: Vec2, size: UVec2) -> IVec2 {
    IVec2::new(
        (center.x - size.x as f32 / 2.0).round() as i32,
        (-center.y - size.y as f32 / 2.0).round() as i32,
    )
}

/// Milliseconds since the current run started, advanced on the fixed tick.
#[derive(Resource, Default, Debug)]
pub struct RunClock {
    pub elapsed_ms: f32,
}

#[derive(Resource, Default, Debug)]
pub struct Spawner {
    pub last_spawn_ms: f32,
    pub spawned: u32,
}

/// Delay before the next enemy: shrinks quadratically with run time and
/// bottoms out at the configured minimum.
pub fn spawn_delay_ms(elapsed_ms: f32, enemy: &EnemyConfig) -> f32 {
    let delay = -enemy.spawn_delay_coefficient * elapsed_ms * elapsed_ms + enemy.initial_spawn_delay_ms;
    delay.max(enemy.min_spawn_delay_ms)
}

#[derive(Resource, Default, Debug)]
pub struct RunStats {
    pub grazes: u32,
}

/// Scores of the run that just ended.
#[derive(Resource, Default, Debug)]
pub struct LastRun {
    pub card: Option<ScoreCard>,
}

#[derive(Resource, Default, Debug)]
pub struct StudentProfile {
    pub id: String,
}

pub const MAX_STUDENT_ID_LEN: usize = 10;

/// Latest message for the status line.
#[derive(Resource, Default, Debug)]
pub struct StatusMessage(pub String);

/// Client for the score server; `None` when playing offline.
#[derive(Resource, Default)]
pub struct ScoreApi {
    pub client: Option<ScoreClient>,
    pub max_plays: u32,
}

impl ScoreApi {
    pub fn from_config(config: &DodgeConfig) -> Self {
        match &config.api {
            Some(api) => Self {
                client: Some(ScoreClient::new(&api.base_url, &api.auth_key)),
                max_plays: api.max_plays,
            },
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_delay_follows_curve_then_floors() {
        let enemy = EnemyConfig::default();
        assert_eq!(spawn_delay_ms(0.0, &enemy), 500.0);
        assert!((spawn_delay_ms(4000.0, &enemy) - 420.0).abs() < 1e-3);
        assert_eq!(spawn_delay_ms(9000.0, &enemy), 100.0);
        assert_eq!(spawn_delay_ms(60_000.0, &enemy), 100.0);
    }

    #[test]
    fn clamp_keeps_square_inside() {
        let arena = Arena::new(800.0, 800.0);
        assert_eq!(arena.clamp(Vec2::new(1000.0, -1000.0), 10.0), Vec2::new(395.0, -395.0));
        assert_eq!(arena.clamp(Vec2::new(12.0, 3.0), 10.0), Vec2::new(12.0, 3.0));
    }

    #[test]
    fn mask_origin_flips_y() {
        assert_eq!(mask_origin(Vec2::new(0.0, 0.0), UVec2::new(10, 10)), IVec2::new(-5, -5));
        assert_eq!(mask_origin(Vec2::new(20.0, 10.0), UVec2::new(10, 10)), IVec2::new(15, -15));
    }
}
