use crate::components::{ButtonAction, ButtonPalette, MenuButton};
use crate::events::ButtonClicked;
use crate::resources::{ScoreApi, StatusMessage, StudentProfile};
use crate::state::GameScene;
use crate::systems::network::{request_play, PlayGate};
use bevy::prelude::*;

/// Buttons fire on release while the cursor is still over them.
pub fn button_system(
    mut query: Query<
        (&Interaction, &ButtonPalette, &mut MenuButton, &mut BackgroundColor),
        Changed<Interaction>,
    >,
    mut clicks: EventWriter<ButtonClicked>,
) {
    for (interaction, palette, mut button, mut background) in query.iter_mut() {
        match *interaction {
            Interaction::Pressed => {
                button.armed = true;
                background.0 = palette.pressed;
            }
            Interaction::Hovered => {
                if button.armed {
                    clicks.send(ButtonClicked {
                        action: button.action,
                    });
                }
                button.armed = false;
                background.0 = palette.hovered;
            }
            Interaction::None => {
                button.armed = false;
                background.0 = palette.normal;
            }
        }
    }
}

pub fn button_action_system(
    mut clicks: EventReader<ButtonClicked>,
    api: Res<ScoreApi>,
    profile: Res<StudentProfile>,
    mut gate: ResMut<PlayGate>,
    mut status: ResMut<StatusMessage>,
    mut next_scene: ResMut<NextState<GameScene>>,
    mut exit: EventWriter<AppExit>,
) {
    for click in clicks.read() {
        debug!(target: "menu", "button {:?}", click.action);
        match click.action {
            ButtonAction::Start | ButtonAction::Restart => {
                request_play(&api, &profile, &mut gate, &mut status, &mut next_scene);
            }
            ButtonAction::Help => next_scene.set(GameScene::Help),
            ButtonAction::Menu => next_scene.set(GameScene::Menu),
            ButtonAction::Quit => {
                info!(target: "menu", "quit requested");
                exit.send(AppExit::Success);
            }
        }
    }
}
