use crate::components::{CountUp, HudActionText, HudTimeText, SlideIn, StatusText, StudentIdText};
use crate::config::DodgeConfig;
use crate::resources::{RunClock, RunStats, StatusMessage, StudentProfile, MAX_STUDENT_ID_LEN};
use crate::scoring::ScoreCard;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;

pub fn slide_in_system(time: Res<Time>, mut query: Query<(&mut SlideIn, &mut Node)>) {
    for (mut slide, mut node) in query.iter_mut() {
        if slide.elapsed >= slide.duration {
            continue;
        }
        slide.elapsed += time.delta_secs();
        node.left = Val::Px(slide.offset());
    }
}

pub fn count_up_system(time: Res<Time>, mut query: Query<(&mut CountUp, &mut Text)>) {
    for (mut count, mut text) in query.iter_mut() {
        count.elapsed += time.delta_secs();
        let shown = format!("{}: {}", count.label, count.shown());
        if text.0 != shown {
            text.0 = shown;
        }
    }
}

pub fn update_hud_system(
    clock: Res<RunClock>,
    stats: Res<RunStats>,
    config: Res<DodgeConfig>,
    mut time_text: Query<&mut Text, (With<HudTimeText>, Without<HudActionText>)>,
    mut action_text: Query<&mut Text, (With<HudActionText>, Without<HudTimeText>)>,
) {
    let card = ScoreCard::new(clock.elapsed_ms as u32, stats.grazes, config.scoring.points_per_graze);
    if let Ok(mut text) = time_text.get_single_mut() {
        text.0 = format!("Time: {}", card.time_score);
    }
    if let Ok(mut text) = action_text.get_single_mut() {
        text.0 = format!("Action: {}", card.action_score);
    }
}

pub fn update_status_text(status: Res<StatusMessage>, mut query: Query<&mut Text, With<StatusText>>) {
    for mut text in query.iter_mut() {
        if text.0 != status.0 {
            text.0 = status.0.clone();
        }
    }
}

/// Applies one key press to a student ID: digits append up to the length
/// cap, Backspace erases. Returns whether the ID changed.
pub fn edit_student_id(id: &mut String, key: &Key) -> bool {
    match key {
        Key::Character(chars) => {
            let before = id.len();
            for c in chars.chars().filter(char::is_ascii_digit) {
                if id.len() < MAX_STUDENT_ID_LEN {
                    id.push(c);
                }
            }
            id.len() != before
        }
        Key::Backspace => id.pop().is_some(),
        _ => false,
    }
}

pub fn student_id_input_system(
    mut keyboard_events: EventReader<KeyboardInput>,
    mut profile: ResMut<StudentProfile>,
    mut id_text: Query<&mut Text, With<StudentIdText>>,
) {
    let mut changed = false;
    for event in keyboard_events.read() {
        if event.state.is_pressed() {
            changed |= edit_student_id(&mut profile.id, &event.logical_key);
        }
    }
    if changed {
        for mut text in id_text.iter_mut() {
            text.0 = format!("Student ID: {}", profile.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Key {
        Key::Character(s.into())
    }

    #[test]
    fn digits_append_and_backspace_erases() {
        let mut id = String::from("101");
        assert!(edit_student_id(&mut id, &chars("0")));
        assert!(!edit_student_id(&mut id, &chars("x")));
        assert!(edit_student_id(&mut id, &chars("2")));
        assert!(edit_student_id(&mut id, &Key::Backspace));
        assert!(edit_student_id(&mut id, &chars("1")));
        assert!(!edit_student_id(&mut id, &Key::Enter));
        assert_eq!(id, "10101");
    }

    #[test]
    fn student_id_is_capped() {
        let mut id = "9".repeat(MAX_STUDENT_ID_LEN);
        assert!(!edit_student_id(&mut id, &chars("1")));
        assert_eq!(id.len(), MAX_STUDENT_ID_LEN);

        let mut empty = String::new();
        assert!(!edit_student_id(&mut empty, &Key::Backspace));
    }

    #[test]
    fn count_up_text_finishes_on_target() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_systems(Update, count_up_system);
        let mut count = CountUp::new("Overall score", 22_000, 1.0);
        count.elapsed = 5.0;
        let entity = app.world_mut().spawn((Text::new(""), count)).id();
        app.update();
        assert_eq!(app.world().get::<Text>(entity).unwrap().0, "Overall score: 22000");
    }

    #[test]
    fn hud_matches_result_scoring_on_huge_counts() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(DodgeConfig::default());
        app.insert_resource(RunClock { elapsed_ms: 1500.0 });
        app.insert_resource(RunStats { grazes: u32::MAX });
        app.add_systems(Update, update_hud_system);
        let time = app.world_mut().spawn((Text::new(""), HudTimeText)).id();
        let action = app.world_mut().spawn((Text::new(""), HudActionText)).id();
        app.update();
        assert_eq!(app.world().get::<Text>(time).unwrap().0, "Time: 1500");
        assert_eq!(
            app.world().get::<Text>(action).unwrap().0,
            format!("Action: {}", u32::MAX)
        );
    }

    #[test]
    fn status_line_follows_message() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(StatusMessage("No plays left".into()));
        app.add_systems(Update, update_status_text);
        let entity = app.world_mut().spawn((Text::new(""), StatusText)).id();
        app.update();
        assert_eq!(app.world().get::<Text>(entity).unwrap().0, "No plays left");
    }
}
