// config.rs
use bevy::prelude::*;
use serde::Deserialize;
use std::{fs, path::Path};

pub const DEFAULT_CONFIG_PATH: &str = "assets/config/dodge.ron";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 800.0,
            title: "DodgeGame".into(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Side length of the player square in pixels.
    pub size: u32,
    /// Pixels moved per fixed tick along one axis.
    pub speed: f32,
    pub sprint_multiplier: f32,
    /// Extra pixels on each side of the player counted as a near miss.
    pub graze_margin: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: 10,
            speed: 3.0,
            sprint_multiplier: 2.0,
            graze_margin: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct EnemyConfig {
    pub size: u32,
    pub speed_multiplier: f32,
    /// Slope components are drawn from `-slope_range..=slope_range`.
    pub slope_range: i32,
    /// Enemies aim at a point within this many pixels of the player.
    pub target_spread: f32,
    pub initial_spawn_delay_ms: f32,
    pub spawn_delay_coefficient: f32,
    pub min_spawn_delay_ms: f32,
    pub despawn_margin: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            size: 10,
            speed_multiplier: 2.0,
            slope_range: 5,
            target_spread: 50.0,
            initial_spawn_delay_ms: 500.0,
            spawn_delay_coefficient: 0.000005,
            min_spawn_delay_ms: 100.0,
            despawn_margin: 50.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ScoringConfig {
    pub points_per_graze: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            points_per_graze: 100,
        }
    }
}

/// Connection to the score server. Leaving the whole section out of the
/// config file means offline play.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub auth_key: String,
    pub max_plays: u32,
    pub student_id: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            auth_key: String::new(),
            max_plays: 3,
            student_id: None,
        }
    }
}

#[derive(Debug, Deserialize, Resource, Clone, PartialEq, Default)]
#[serde(default)]
pub struct DodgeConfig {
    pub window: WindowConfig,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub scoring: ScoringConfig,
    pub api: Option<ApiConfig>,
}

impl DodgeConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let data = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("read {}: {e}", path.as_ref().display()))?;
        Self::from_ron(&data)
    }

    pub fn from_ron(data: &str) -> Result<Self, String> {
        ron::from_str(data).map_err(|e| format!("parse RON: {e}"))
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<String>) {
        match Self::load_from_file(path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Human-readable warnings for values the game can run with but
    /// probably shouldn't.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            warnings.push(format!(
                "window size {}x{} is not positive",
                self.window.width, self.window.height
            ));
        }
        if self.player.size == 0 {
            warnings.push("player.size is 0; the player cannot be hit".into());
        }
        if self.player.speed <= 0.0 {
            warnings.push("player.speed <= 0; the player cannot move".into());
        }
        if self.enemy.size == 0 {
            warnings.push("enemy.size is 0; enemies cannot collide".into());
        }
        if self.enemy.slope_range < 1 {
            warnings.push("enemy.slope_range < 1; enemies only move diagonally".into());
        }
        if self.enemy.min_spawn_delay_ms <= 0.0 {
            warnings.push("enemy.min_spawn_delay_ms <= 0; one enemy spawns every tick".into());
        }
        if self.enemy.min_spawn_delay_ms > self.enemy.initial_spawn_delay_ms {
            warnings.push(format!(
                "enemy.min_spawn_delay_ms ({}) exceeds initial_spawn_delay_ms ({})",
                self.enemy.min_spawn_delay_ms, self.enemy.initial_spawn_delay_ms
            ));
        }
        if let Some(api) = &self.api {
            if api.base_url.is_empty() {
                warnings.push("api.base_url is empty".into());
            }
            if api.auth_key.is_empty() {
                warnings.push("api.auth_key is empty; score uploads will be rejected".into());
            }
            if api.max_plays == 0 {
                warnings.push("api.max_plays is 0; nobody can play".into());
            }
        }
        warnings
    }
}
