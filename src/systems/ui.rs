use crate::components::{
    ButtonAction, ButtonPalette, CountUp, HudActionText, HudTimeText, MenuButton, SlideIn, StatusText,
    StudentIdText,
};
use crate::config::DodgeConfig;
use crate::resources::{LastRun, ScoreApi, StatusMessage, StudentProfile};
use crate::state::GameScene;
use bevy::prelude::*;

const SLIDE_SECONDS: f32 = 0.25;
const COUNT_UP_SECONDS: f32 = 1.0;
const TEXT_COLOR: Color = Color::BLACK;

const ORANGE: Color = Color::srgb(1.0, 165.0 / 255.0, 0.0);
const RED: Color = Color::srgb(1.0, 0.0, 0.0);
const CYAN: Color = Color::srgb(0.0, 1.0, 1.0);
const BLUE: Color = Color::srgb(0.0, 0.0, 1.0);

pub const MENU_PALETTE: ButtonPalette = ButtonPalette {
    normal: ORANGE,
    hovered: RED,
    pressed: Color::srgb(155.0 / 255.0, 0.0, 0.0),
};

pub const RESULT_PALETTE: ButtonPalette = ButtonPalette {
    normal: CYAN,
    hovered: BLUE,
    pressed: Color::srgb(0.0, 0.0, 155.0 / 255.0),
};

fn scene_root(scene: GameScene, background: Color, slide_from: f32) -> impl Bundle {
    (
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            left: Val::Px(slide_from),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            row_gap: Val::Px(16.0),
            ..default()
        },
        BackgroundColor(background),
        SlideIn::new(slide_from, SLIDE_SECONDS),
        StateScoped(scene),
    )
}

fn label(text: impl Into<String>, size: f32, color: Color) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
    )
}

fn spawn_button(parent: &mut ChildBuilder, text: &str, action: ButtonAction, palette: ButtonPalette) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(200.0),
                height: Val::Px(50.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(palette.normal),
            palette,
            MenuButton::new(action),
        ))
        .with_children(|button| {
            button.spawn(label(text, 20.0, Color::WHITE));
        });
}

pub fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

pub fn spawn_menu(
    mut commands: Commands,
    config: Res<DodgeConfig>,
    api: Res<ScoreApi>,
    profile: Res<StudentProfile>,
    mut status: ResMut<StatusMessage>,
) {
    status.0.clear();
    info!(target: "menu", "=== MAIN MENU ===");

    commands
        .spawn(scene_root(GameScene::Menu, Color::WHITE, config.window.width))
        .with_children(|root| {
            root.spawn(label(config.window.title.clone(), 40.0, TEXT_COLOR));
            root.spawn(label("Coding Club 2022", 20.0, Color::srgb(0.4, 0.4, 0.4)));

            if api.client.is_some() {
                root.spawn((
                    label(format!("Student ID: {}", profile.id), 24.0, TEXT_COLOR),
                    StudentIdText,
                ));
                root.spawn(label(
                    format!("Type your ID, Backspace to erase. {} plays per season.", api.max_plays),
                    16.0,
                    Color::srgb(0.4, 0.4, 0.4),
                ));
            }
            root.spawn((label("", 18.0, RED), StatusText));

            spawn_button(root, "Start", ButtonAction::Start, MENU_PALETTE);
            spawn_button(root, "Help", ButtonAction::Help, MENU_PALETTE);
            spawn_button(root, "Quit", ButtonAction::Quit, MENU_PALETTE);
        });
}

pub fn spawn_help(mut commands: Commands, config: Res<DodgeConfig>) {
    let points = config.scoring.points_per_graze;
    commands
        .spawn(scene_root(GameScene::Help, Color::WHITE, config.window.width))
        .with_children(|root| {
            root.spawn(label("How to play", 40.0, TEXT_COLOR));
            root.spawn(label(
                "Move with W A S D or the arrow keys. Hold Shift to move twice as fast.",
                18.0,
                TEXT_COLOR,
            ));
            root.spawn(label(
                "Red squares fly towards you. Touching one ends the run.",
                18.0,
                TEXT_COLOR,
            ));
            root.spawn(label(
                format!("Time score: milliseconds survived. Action score: {points} per near miss."),
                18.0,
                TEXT_COLOR,
            ));
            spawn_button(root, "Back", ButtonAction::Menu, MENU_PALETTE);
        });
}

pub fn spawn_hud(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(12.0),
                top: Val::Px(12.0),
                flex_direction: FlexDirection::Column,
                ..default()
            },
            StateScoped(GameScene::Playing),
        ))
        .with_children(|hud| {
            hud.spawn((label("Time: 0", 18.0, TEXT_COLOR), HudTimeText));
            hud.spawn((label("Action: 0", 18.0, TEXT_COLOR), HudActionText));
        });
}

pub fn spawn_result(mut commands: Commands, config: Res<DodgeConfig>, last_run: Res<LastRun>) {
    let card = last_run.card.unwrap_or_default();
    commands
        .spawn(scene_root(
            GameScene::Result,
            Color::srgba(1.0, 1.0, 1.0, 0.6),
            config.window.width,
        ))
        .with_children(|root| {
            root.spawn(label("Game Over", 40.0, TEXT_COLOR));
            root.spawn((
                label("Time score: 0", 24.0, TEXT_COLOR),
                CountUp::new("Time score", card.time_score, COUNT_UP_SECONDS),
            ));
            root.spawn((
                label("Action score: 0", 24.0, TEXT_COLOR),
                CountUp::new("Action score", card.action_score, COUNT_UP_SECONDS),
            ));
            root.spawn((
                label("Overall score: 0", 28.0, TEXT_COLOR),
                CountUp::new("Overall score", card.overall_score, COUNT_UP_SECONDS),
            ));
            root.spawn((label("", 18.0, Color::srgb(0.3, 0.3, 0.3)), StatusText));

            spawn_button(root, "Restart", ButtonAction::Restart, RESULT_PALETTE);
            spawn_button(root, "Menu", ButtonAction::Menu, RESULT_PALETTE);
            spawn_button(root, "Quit", ButtonAction::Quit, RESULT_PALETTE);
        });
}
