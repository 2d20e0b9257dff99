use crate::components::{Body, Enemy, Hitboxes, Player};
use crate::events::{GrazeEvent, PlayerHitEvent};
use crate::resources::mask_origin;
use bevy::prelude::*;

pub fn collision_detection_system(
    player_query: Query<(Entity, &Transform, &Hitboxes), With<Player>>,
    mut enemy_query: Query<(Entity, &Transform, &Body, &mut Enemy)>,
    mut hit_events: EventWriter<PlayerHitEvent>,
    mut graze_events: EventWriter<GrazeEvent>,
) {
    let Ok((player_entity, player_transform, hitboxes)) = player_query.get_single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();
    let normal_origin = mask_origin(player_pos, hitboxes.normal.size());
    let point_origin = mask_origin(player_pos, hitboxes.point.size());

    for (enemy_entity, enemy_transform, body, mut enemy) in enemy_query.iter_mut() {
        let enemy_origin = mask_origin(enemy_transform.translation.truncate(), body.0.size());

        if hitboxes
            .normal
            .overlap(&body.0, enemy_origin - normal_origin)
            .is_some()
        {
            hit_events.send(PlayerHitEvent {
                player_entity,
                enemy_entity,
            });
            // The run is over; nothing else this tick counts.
            return;
        }

        if !enemy.counted
            && hitboxes
                .point
                .overlap(&body.0, enemy_origin - point_origin)
                .is_some()
        {
            enemy.counted = true;
            graze_events.send(GrazeEvent { enemy_entity });
        }
    }
}
