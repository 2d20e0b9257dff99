use crate::components::Player;
use bevy::prelude::*;

pub fn player_input_system(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut query: Query<&mut Player>,
) {
    if let Ok(mut player) = query.get_single_mut() {
        let up = keyboard_input.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]);
        let down = keyboard_input.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]);
        let left = keyboard_input.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]);
        let right = keyboard_input.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]);

        // Opposite keys cancel out
        player.direction = Vec2::new(axis(right, left), axis(up, down));
        player.sprinting = keyboard_input.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app_with_keys(keys: &[KeyCode]) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        let mut input = ButtonInput::<KeyCode>::default();
        for key in keys {
            input.press(*key);
        }
        app.insert_resource(input);
        app.add_systems(Update, player_input_system);
        app.world_mut().spawn(Player {
            speed: 3.0,
            sprint_multiplier: 2.0,
            direction: Vec2::ZERO,
            sprinting: false,
        });
        app
    }

    fn player(app: &mut App) -> (Vec2, bool) {
        let world = app.world_mut();
        let player = world.query::<&Player>().single(world);
        (player.direction, player.sprinting)
    }

    #[test]
    fn diagonal_with_sprint() {
        let mut app = app_with_keys(&[KeyCode::KeyW, KeyCode::KeyD, KeyCode::ShiftLeft]);
        app.update();
        assert_eq!(player(&mut app), (Vec2::new(1.0, 1.0), true));
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut app = app_with_keys(&[KeyCode::KeyW, KeyCode::KeyS, KeyCode::ArrowLeft]);
        app.update();
        assert_eq!(player(&mut app), (Vec2::new(-1.0, 0.0), false));
    }
}
