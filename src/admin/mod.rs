//! Minimal admin site: log in, change the season, look at and edit scores.
//!
//! Everything goes through the score API; the site only keeps sessions and
//! the last fetched score list.

pub mod pages;
pub mod session;

use crate::client::{ClientError, ScoreClient};
use crate::scoring::ScoreRecord;
use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use pages::IndexView;
use serde::Deserialize;
use session::{session_cookie, SessionStore, SESSION_COOKIE};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Dashboard {
    scores: Vec<ScoreRecord>,
    notice: Option<String>,
}

#[derive(Clone)]
pub struct AdminState {
    client: ScoreClient,
    admin_id: Arc<str>,
    admin_pw: Arc<str>,
    sessions: SessionStore,
    dashboard: Arc<RwLock<Dashboard>>,
}

impl AdminState {
    pub fn new(client: ScoreClient, admin_id: impl Into<Arc<str>>, admin_pw: impl Into<Arc<str>>) -> Self {
        Self {
            client,
            admin_id: admin_id.into(),
            admin_pw: admin_pw.into(),
            sessions: SessionStore::default(),
            dashboard: Arc::new(RwLock::new(Dashboard::default())),
        }
    }

    /// Runs a blocking API call off the async workers.
    async fn call<T, F>(&self, f: F) -> Result<T, ClientError>
    where
        T: Send + 'static,
        F: FnOnce(&ScoreClient) -> Result<T, ClientError> + Send + 'static,
    {
        let client = self.client.clone();
        match tokio::task::spawn_blocking(move || f(&client)).await {
            Ok(result) => result,
            Err(join) => Err(ClientError::Transport(join.to_string())),
        }
    }

    async fn set_notice(&self, notice: Option<String>) {
        self.dashboard.write().await.notice = notice;
    }

    /// Unparseable form input becomes a notice on the index page.
    async fn accept_form<T>(&self, form: Result<Form<T>, FormRejection>, action: &str) -> Option<Form<T>> {
        match form {
            Ok(form) => Some(form),
            Err(rejection) => {
                tracing::info!(error = %rejection.body_text(), "rejected admin form");
                self.set_notice(Some(format!("{action}: {}", rejection.body_text())))
                    .await;
                None
            }
        }
    }
}

pub fn router(state: AdminState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
        .route("/get-season", get(get_season))
        .route("/set-season", post(set_season))
        .route("/set-score", post(set_score))
        .route("/get-score", post(get_score))
        .with_state(state)
}

async fn index(State(state): State<AdminState>, jar: CookieJar) -> Response {
    if !state.sessions.is_valid(&jar).await {
        tracing::info!("index: not logged in");
        return Redirect::to("/login").into_response();
    }
    let season = match state.call(|c| c.get_season()).await {
        Ok(season) => Some(season),
        Err(err) => {
            tracing::warn!(error = %err, "could not fetch season");
            None
        }
    };
    let dashboard = state.dashboard.read().await;
    Html(pages::index_page(&IndexView {
        season,
        scores: &dashboard.scores,
        notice: dashboard.notice.as_deref(),
    }))
    .into_response()
}

async fn login_form() -> Html<String> {
    Html(pages::login_page())
}

#[derive(Deserialize)]
struct LoginForm {
    #[serde(default)]
    id: String,
    #[serde(default)]
    pw: String,
}

async fn login(State(state): State<AdminState>, jar: CookieJar, Form(form): Form<LoginForm>) -> (CookieJar, Redirect) {
    if form.id.is_empty() || form.pw.is_empty() {
        return (jar, Redirect::to("/login"));
    }
    if form.id != *state.admin_id || form.pw != *state.admin_pw {
        tracing::warn!(id = %form.id, "login failed: wrong id or password");
        return (jar, Redirect::to("/login"));
    }
    let token = state.sessions.open().await;
    tracing::info!("admin logged in");
    (jar.add(session_cookie(token)), Redirect::to("/"))
}

async fn logout(State(state): State<AdminState>, jar: CookieJar) -> (CookieJar, Redirect) {
    state.sessions.close(&jar).await;
    (jar.remove(Cookie::from(SESSION_COOKIE)), Redirect::to("/login"))
}

async fn get_season(State(state): State<AdminState>) -> Response {
    match state.call(|c| c.get_season()).await {
        Ok(season) => season.to_string().into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "could not fetch season");
            (axum::http::StatusCode::BAD_GATEWAY, err.to_string()).into_response()
        }
    }
}

#[derive(Deserialize)]
struct SeasonForm {
    season: i64,
}

async fn set_season(
    State(state): State<AdminState>,
    jar: CookieJar,
    form: Result<Form<SeasonForm>, FormRejection>,
) -> Redirect {
    if !state.sessions.is_valid(&jar).await {
        return Redirect::to("/login");
    }
    let Some(Form(form)) = state.accept_form(form, "Setting season failed").await else {
        return Redirect::to("/");
    };
    let season = form.season;
    let notice = match state.call(move |c| c.set_season(season)).await {
        Ok(season) => {
            tracing::info!(season, "season set");
            None
        }
        Err(err) => {
            tracing::warn!(error = %err, "could not set season");
            Some(format!("Setting season failed: {err}"))
        }
    };
    state.set_notice(notice).await;
    Redirect::to("/")
}

#[derive(Deserialize)]
struct ScoreForm {
    player_id: String,
    time: i64,
    action: i64,
}

async fn set_score(
    State(state): State<AdminState>,
    jar: CookieJar,
    form: Result<Form<ScoreForm>, FormRejection>,
) -> Redirect {
    if !state.sessions.is_valid(&jar).await {
        return Redirect::to("/login");
    }
    let Some(Form(form)) = state.accept_form(form, "Saving score failed").await else {
        return Redirect::to("/");
    };
    let ScoreForm { player_id, time, action } = form;
    let notice = match state.call(move |c| c.put_score(&player_id, time, action, None)).await {
        Ok(record) => {
            tracing::info!(student = %record.student_id, overall = record.overall_score, "score set by admin");
            None
        }
        Err(err) => {
            tracing::warn!(error = %err, "could not set score");
            Some(format!("Saving score failed: {err}"))
        }
    };
    state.set_notice(notice).await;
    Redirect::to("/")
}

async fn get_score(State(state): State<AdminState>, jar: CookieJar) -> Redirect {
    if !state.sessions.is_valid(&jar).await {
        return Redirect::to("/login");
    }
    match state.call(|c| c.list_scores(None)).await {
        Ok(scores) => {
            let mut dashboard = state.dashboard.write().await;
            dashboard.scores = scores;
            dashboard.notice = None;
        }
        Err(err) => {
            tracing::warn!(error = %err, "could not fetch scores");
            state.set_notice(Some(format!("Loading scores failed: {err}"))).await;
        }
    }
    Redirect::to("/")
}
