use bevy::prelude::*;
use bevy::window::WindowResolution;
use dodge::config::{DodgeConfig, DEFAULT_CONFIG_PATH};
use dodge::events::{ButtonClicked, GrazeEvent, PlayerHitEvent};
use dodge::resources::*;
use dodge::state::GameScene;
use dodge::systems::buttons::*;
use dodge::systems::collision::*;
use dodge::systems::effects::*;
use dodge::systems::input::*;
use dodge::systems::movement::*;
use dodge::systems::network::*;
use dodge::systems::player::*;
use dodge::systems::spawn::*;
use dodge::systems::ui::*;

/// Problems found while loading the config, reported once logging is up.
#[derive(Resource, Default)]
struct ConfigWarnings(Vec<String>);

fn main() {
    let (config, load_error) = DodgeConfig::load_or_default(DEFAULT_CONFIG_PATH);
    let mut warnings = config.validate();
    if let Some(err) = load_error {
        warnings.insert(0, format!("using default config: {err}"));
    }

    let profile = StudentProfile {
        id: config
            .api
            .as_ref()
            .and_then(|api| api.student_id.clone())
            .unwrap_or_default(),
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: config.window.title.clone(),
                resolution: WindowResolution::new(config.window.width, config.window.height),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .init_state::<GameScene>()
        .enable_state_scoped_entities::<GameScene>()
        .insert_resource(ClearColor(Color::WHITE))
        .insert_resource(Time::<Fixed>::from_hz(60.0))
        .add_event::<PlayerHitEvent>()
        .add_event::<GrazeEvent>()
        .add_event::<ButtonClicked>()
        .insert_resource(Arena::from_config(&config))
        .insert_resource(ScoreApi::from_config(&config))
        .insert_resource(profile)
        .insert_resource(config)
        .insert_resource(ConfigWarnings(warnings))
        .init_resource::<RunClock>()
        .init_resource::<Spawner>()
        .init_resource::<RunStats>()
        .init_resource::<LastRun>()
        .init_resource::<StatusMessage>()
        .init_resource::<PlayGate>()
        .init_resource::<PendingSaves>()
        .add_systems(Startup, (setup_camera, report_config))
        .add_systems(OnEnter(GameScene::Menu), (clear_gameplay, spawn_menu))
        .add_systems(OnEnter(GameScene::Help), spawn_help)
        .add_systems(OnEnter(GameScene::Playing), (start_run, spawn_hud))
        .add_systems(OnEnter(GameScene::Result), (spawn_result, save_score))
        .add_systems(
            FixedUpdate,
            (
                tick_run_clock,
                player_input_system,
                player_movement_system,
                enemy_movement_system,
                collision_detection_system,
                handle_grazes,
                handle_player_hit,
                enemy_spawn_system,
                despawn_offscreen_enemies,
            )
                .chain()
                .run_if(in_state(GameScene::Playing)),
        )
        .add_systems(
            Update,
            (
                (button_system, button_action_system).chain(),
                slide_in_system,
                count_up_system,
                update_status_text,
                student_id_input_system.run_if(in_state(GameScene::Menu)),
                update_hud_system.run_if(in_state(GameScene::Playing)),
                poll_play_gate,
                poll_saves,
            ),
        )
        .run();
}

fn report_config(warnings: Res<ConfigWarnings>, config: Res<DodgeConfig>) {
    for warning in &warnings.0 {
        warn!(target: "config", "{}", warning);
    }
    match &config.api {
        Some(api) => info!(target: "config", "scores go to {}", api.base_url),
        None => info!(target: "config", "no api section; playing offline"),
    }
}
