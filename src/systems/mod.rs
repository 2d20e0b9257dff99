pub mod buttons;
pub mod collision;
pub mod effects;
pub mod input;
pub mod movement;
pub mod network;
pub mod player;
pub mod spawn;
pub mod ui;
