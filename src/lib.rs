//! Dodge: a small avoidance game plus the score server it reports to.
//!
//! The game lives in the Bevy modules (`components`, `systems`, ...). The
//! `api` and `admin` modules back the `score_api` and `admin_web` binaries.

pub mod admin;
pub mod api;
pub mod client;
pub mod components;
pub mod config;
pub mod events;
pub mod mask;
pub mod resources;
pub mod scoring;
pub mod server;
pub mod state;
pub mod systems;
