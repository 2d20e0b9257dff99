use crate::components::ButtonAction;
use bevy::prelude::*;

// Sent when an enemy touches the player's body; ends the run
#[derive(Event)]
pub struct PlayerHitEvent {
    pub player_entity: Entity,
    pub enemy_entity: Entity,
}

// Sent once per enemy the first time it passes through the near-miss area
#[derive(Event)]
pub struct GrazeEvent {
    pub enemy_entity: Entity,
}

// A menu button was released while hovered
#[derive(Event)]
pub struct ButtonClicked {
    pub action: ButtonAction,
}
