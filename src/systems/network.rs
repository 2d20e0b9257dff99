//! Talking to the score server without stalling frames.
//!
//! Requests run on the IO task pool; systems here poll them once per frame.

use crate::client::{ClientError, ScoreClient};
use crate::resources::{LastRun, ScoreApi, StatusMessage, StudentProfile};
use crate::scoring::ScoreRecord;
use crate::state::GameScene;
use bevy::prelude::*;
use bevy::tasks::{block_on, futures_lite::future, IoTaskPool, Task};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// Play recorded; `plays` now includes this run.
    Allowed { plays: i64 },
    Denied { plays: i64 },
    /// The server could not be asked; the run goes ahead anyway.
    Unreachable(String),
    /// The server answered with an error; the run does not start.
    Rejected(String),
}

fn gate_failure(err: ClientError) -> GateOutcome {
    match err {
        ClientError::Transport(_) => GateOutcome::Unreachable(err.to_string()),
        ClientError::Status { ref detail, .. } if !detail.is_empty() => {
            GateOutcome::Rejected(detail.clone())
        }
        ClientError::Status { .. } | ClientError::Decode(_) => GateOutcome::Rejected(err.to_string()),
    }
}

/// Reads the student's play count and, if below the limit, records one
/// more play.
pub fn check_and_count_play(client: &ScoreClient, student_id: &str, max_plays: u32) -> GateOutcome {
    let current = match client.get_playcount(student_id) {
        Ok(record) => record.count,
        Err(err) => return gate_failure(err),
    };
    if current >= max_plays as i64 {
        return GateOutcome::Denied { plays: current };
    }
    match client.put_playcount(student_id, current + 1) {
        Ok(record) => GateOutcome::Allowed { plays: record.count },
        Err(err) => gate_failure(err),
    }
}

#[derive(Resource, Default)]
pub struct PlayGate {
    task: Option<Task<GateOutcome>>,
}

impl PlayGate {
    pub fn busy(&self) -> bool {
        self.task.is_some()
    }
}

/// Start or Restart was clicked.
pub fn request_play(
    api: &ScoreApi,
    profile: &StudentProfile,
    gate: &mut PlayGate,
    status: &mut StatusMessage,
    next_scene: &mut NextState<GameScene>,
) {
    let Some(client) = api.client.clone() else {
        next_scene.set(GameScene::Playing);
        return;
    };
    if gate.busy() {
        return;
    }
    if profile.id.is_empty() {
        status.0 = "Enter your student ID".into();
        return;
    }

    let student_id = profile.id.clone();
    let max_plays = api.max_plays;
    info!(target: "network", "checking play count for {}", student_id);
    status.0 = "Checking play count...".into();
    gate.task = Some(
        IoTaskPool::get().spawn(async move { check_and_count_play(&client, &student_id, max_plays) }),
    );
}

pub fn poll_play_gate(
    mut gate: ResMut<PlayGate>,
    mut status: ResMut<StatusMessage>,
    scene: Res<State<GameScene>>,
    api: Res<ScoreApi>,
    mut next_scene: ResMut<NextState<GameScene>>,
) {
    let Some(task) = gate.task.as_mut() else {
        return;
    };
    let Some(outcome) = block_on(future::poll_once(task)) else {
        return;
    };
    gate.task = None;

    let waiting = matches!(scene.get(), GameScene::Menu | GameScene::Result);
    match outcome {
        GateOutcome::Allowed { plays } => {
            info!(target: "network", "play {} of {} recorded", plays, api.max_plays);
            status.0.clear();
            if waiting {
                next_scene.set(GameScene::Playing);
            }
        }
        GateOutcome::Denied { plays } => {
            info!(target: "network", "play refused: {} of {} used", plays, api.max_plays);
            status.0 = format!("No plays left ({plays} of {} used)", api.max_plays);
        }
        GateOutcome::Rejected(detail) => {
            warn!(target: "network", "play count request rejected: {}", detail);
            status.0 = format!("Score server refused the play: {detail}");
        }
        GateOutcome::Unreachable(err) => {
            warn!(target: "network", "play count unavailable, starting anyway: {}", err);
            status.0 = "Score server unreachable; playing anyway".into();
            if waiting {
                next_scene.set(GameScene::Playing);
            }
        }
    }
}

/// Score uploads still in flight. Nothing waits on them; they are only
/// polled to report how they went.
#[derive(Resource, Default)]
pub struct PendingSaves {
    tasks: Vec<Task<Result<ScoreRecord, ClientError>>>,
}

impl PendingSaves {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

pub fn save_score(
    last_run: Res<LastRun>,
    api: Res<ScoreApi>,
    profile: Res<StudentProfile>,
    mut saves: ResMut<PendingSaves>,
    mut status: ResMut<StatusMessage>,
) {
    let Some(card) = last_run.card else {
        return;
    };
    let Some(client) = api.client.clone() else {
        status.0 = "Offline; score not saved".into();
        return;
    };
    if profile.id.is_empty() {
        status.0 = "No student ID; score not saved".into();
        return;
    }

    let student_id = profile.id.clone();
    info!(
        target: "network",
        "saving score for {}: time {} action {} overall {}",
        student_id, card.time_score, card.action_score, card.overall_score
    );
    status.0 = "Saving score...".into();
    let task = IoTaskPool::get().spawn(async move {
        client.put_score(
            &student_id,
            card.time_score as i64,
            card.action_score as i64,
            Some(card.overall_score as i64),
        )
    });
    saves.tasks.push(task);
}

pub fn poll_saves(mut saves: ResMut<PendingSaves>, mut status: ResMut<StatusMessage>) {
    if saves.tasks.is_empty() {
        return;
    }
    saves.tasks.retain_mut(|task| match block_on(future::poll_once(task)) {
        None => true,
        Some(Ok(record)) => {
            info!(
                target: "network",
                "score saved for {} (season {})",
                record.student_id, record.season
            );
            status.0 = "Score saved".into();
            false
        }
        Some(Err(err)) => {
            error!(target: "network", "saving score failed: {}", err);
            status.0 = format!("Saving score failed: {err}");
            false
        }
    });
}
