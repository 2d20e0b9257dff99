use bevy::prelude::*;

/// Top-level screen the game is showing.
/// Menu -> Playing -> Result -> (Playing | Menu), Menu <-> Help
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameScene {
    #[default]
    Menu,
    /// A run is in progress.
    Playing,
    /// Run finished; the field stays frozen behind the score screen.
    Result,
    Help,
}
