//! REST API storing per-student scores and play counts.

pub mod auth;
pub mod error;
pub mod store;

use crate::scoring::{PlayCount, ScoreRecord, Season};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

pub use error::ApiError;
pub use store::{MemoryStore, ScoreStore, SqliteStore, StoreError};

/// Query string extractor whose failures answer with the usual `detail` body.
type Params<T> = WithRejection<Query<T>, ApiError>;

#[derive(Clone)]
pub struct ApiState {
    pub store: ScoreStore,
    auth_key: Arc<str>,
}

impl ApiState {
    pub fn new(store: ScoreStore, auth_key: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            auth_key: auth_key.into(),
        }
    }

    fn authorize(&self, key: Option<&str>) -> Result<(), ApiError> {
        match key {
            Some(key) if !self.auth_key.is_empty() && key == &*self.auth_key => Ok(()),
            _ => {
                tracing::warn!("rejected request with invalid auth key");
                Err(ApiError::Forbidden)
            }
        }
    }

    async fn season_or_current(&self, season: Option<i64>) -> Result<i64, ApiError> {
        match season {
            Some(s) => Ok(s),
            None => Ok(self.store.current_season().await?),
        }
    }
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/check", get(check))
        .route("/get-score", get(get_score))
        .route("/put-score", put(put_score))
        .route("/get-playcount", get(get_playcount))
        .route("/put-playcount", put(put_playcount))
        .route("/get-season", get(get_season))
        .route("/set-season", put(set_season))
        .with_state(state)
}

/// Student IDs are stored trimmed; blank ones are refused.
fn normalized_id(player_id: &str) -> Result<String, ApiError> {
    let id = player_id.trim();
    if id.is_empty() {
        return Err(ApiError::BadRequest("player_id must not be empty".into()));
    }
    Ok(id.to_string())
}

async fn check() -> Json<serde_json::Value> {
    Json(json!({ "alive": true }))
}

#[derive(Debug, Deserialize)]
struct GetScoreQuery {
    player_id: Option<String>,
    season: Option<i64>,
}

/// One student's score, or every score of the season when no student is given.
async fn get_score(
    State(state): State<ApiState>,
    WithRejection(Query(q), _): Params<GetScoreQuery>,
) -> Result<Response, ApiError> {
    let season = state.season_or_current(q.season).await?;
    match q.player_id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => match state.store.get_score(id, season).await? {
            Some(record) => Ok(Json(record).into_response()),
            None => Err(ApiError::NotFound(format!("no score for {id} in season {season}"))),
        },
        None => Ok(Json(state.store.list_scores(season).await?).into_response()),
    }
}

#[derive(Debug, Deserialize)]
struct PutScoreQuery {
    key: Option<String>,
    player_id: String,
    time: i64,
    action: i64,
    score: Option<i64>,
    season: Option<i64>,
}

async fn put_score(
    State(state): State<ApiState>,
    WithRejection(Query(q), _): Params<PutScoreQuery>,
) -> Result<(StatusCode, Json<ScoreRecord>), ApiError> {
    state.authorize(q.key.as_deref())?;
    let student_id = normalized_id(&q.player_id)?;
    if q.time < 0 || q.action < 0 || q.score.is_some_and(|s| s < 0) {
        return Err(ApiError::BadRequest("scores must not be negative".into()));
    }
    let overall = match q.score {
        Some(score) => score,
        None => q
            .time
            .checked_add(q.action)
            .ok_or_else(|| ApiError::BadRequest("score out of range".into()))?,
    };
    let record = ScoreRecord {
        student_id,
        time_score: q.time,
        action_score: q.action,
        overall_score: overall,
        season: state.season_or_current(q.season).await?,
    };
    state.store.put_score(&record).await?;
    tracing::info!(
        student = %record.student_id,
        season = record.season,
        overall = record.overall_score,
        "score saved"
    );
    Ok((StatusCode::CREATED, Json(record)))
}

#[derive(Debug, Deserialize)]
struct GetPlaycountQuery {
    player_id: String,
    season: Option<i64>,
}

async fn get_playcount(
    State(state): State<ApiState>,
    WithRejection(Query(q), _): Params<GetPlaycountQuery>,
) -> Result<Json<PlayCount>, ApiError> {
    let student_id = q.player_id.trim().to_string();
    let season = state.season_or_current(q.season).await?;
    let count = state.store.get_playcount(&student_id, season).await?;
    Ok(Json(PlayCount { id: student_id, count }))
}

#[derive(Debug, Deserialize)]
struct PutPlaycountQuery {
    key: Option<String>,
    player_id: String,
    count: i64,
    season: Option<i64>,
}

async fn put_playcount(
    State(state): State<ApiState>,
    WithRejection(Query(q), _): Params<PutPlaycountQuery>,
) -> Result<(StatusCode, Json<PlayCount>), ApiError> {
    state.authorize(q.key.as_deref())?;
    let student_id = normalized_id(&q.player_id)?;
    if q.count < 0 {
        return Err(ApiError::BadRequest("count must not be negative".into()));
    }
    let season = state.season_or_current(q.season).await?;
    state.store.put_playcount(&student_id, season, q.count).await?;
    tracing::info!(student = %student_id, season, count = q.count, "playcount saved");
    Ok((
        StatusCode::CREATED,
        Json(PlayCount {
            id: student_id,
            count: q.count,
        }),
    ))
}

async fn get_season(State(state): State<ApiState>) -> Result<Json<Season>, ApiError> {
    Ok(Json(Season {
        season: state.store.current_season().await?,
    }))
}

#[derive(Debug, Deserialize)]
struct SetSeasonQuery {
    key: Option<String>,
    season: i64,
}

async fn set_season(
    State(state): State<ApiState>,
    WithRejection(Query(q), _): Params<SetSeasonQuery>,
) -> Result<Json<Season>, ApiError> {
    state.authorize(q.key.as_deref())?;
    if q.season < 1 {
        return Err(ApiError::BadRequest("season must be at least 1".into()));
    }
    state.store.set_season(q.season).await?;
    tracing::info!(season = q.season, "season changed");
    Ok(Json(Season { season: q.season }))
}
