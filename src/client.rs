//! Blocking client for the score server.
//!
//! Calls block the current thread, so the game runs them on the IO task
//! pool and the admin site wraps them in `spawn_blocking`.

use crate::scoring::{PlayCount, ScoreRecord, Season};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("score server returned {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("could not reach score server: {0}")]
    Transport(String),
    #[error("unexpected response from score server: {0}")]
    Decode(#[from] std::io::Error),
}

impl From<ureq::Error> for ClientError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::Status(status, response) => {
                #[derive(Deserialize)]
                struct Detail {
                    detail: String,
                }
                let detail = response
                    .into_json::<Detail>()
                    .map(|d| d.detail)
                    .unwrap_or_default();
                ClientError::Status { status, detail }
            }
            ureq::Error::Transport(transport) => ClientError::Transport(transport.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct Alive {
    alive: bool,
}

#[derive(Clone)]
pub struct ScoreClient {
    agent: ureq::Agent,
    base_url: String,
    auth_key: String,
}

impl ScoreClient {
    pub fn new(base_url: &str, auth_key: &str) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(TIMEOUT).build(),
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_key: auth_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ClientError> {
        let mut request = self.agent.get(&self.url(path));
        for (name, value) in query {
            request = request.query(name, value);
        }
        Ok(request.call()?.into_json()?)
    }

    fn put<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, ClientError> {
        let mut request = self.agent.put(&self.url(path)).query("key", &self.auth_key);
        for (name, value) in query {
            request = request.query(name, value);
        }
        Ok(request.call()?.into_json()?)
    }

    pub fn check(&self) -> Result<bool, ClientError> {
        let alive: Alive = self.get("/check", &[])?;
        Ok(alive.alive)
    }

    /// Score of one student in the server's current season, `None` if the
    /// student has not played yet.
    pub fn get_score(&self, student_id: &str) -> Result<Option<ScoreRecord>, ClientError> {
        match self.get("/get-score", &[("player_id", student_id.to_string())]) {
            Ok(record) => Ok(Some(record)),
            Err(ClientError::Status { status: 404, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn list_scores(&self, season: Option<i64>) -> Result<Vec<ScoreRecord>, ClientError> {
        let query: Vec<(&str, String)> = season.map(|s| ("season", s.to_string())).into_iter().collect();
        self.get("/get-score", &query)
    }

    pub fn put_score(
        &self,
        student_id: &str,
        time_score: i64,
        action_score: i64,
        overall_score: Option<i64>,
    ) -> Result<ScoreRecord, ClientError> {
        let mut query = vec![
            ("player_id", student_id.to_string()),
            ("time", time_score.to_string()),
            ("action", action_score.to_string()),
        ];
        if let Some(score) = overall_score {
            query.push(("score", score.to_string()));
        }
        self.put("/put-score", &query)
    }

    pub fn get_playcount(&self, student_id: &str) -> Result<PlayCount, ClientError> {
        self.get("/get-playcount", &[("player_id", student_id.to_string())])
    }

    pub fn put_playcount(&self, student_id: &str, count: i64) -> Result<PlayCount, ClientError> {
        self.put(
            "/put-playcount",
            &[("player_id", student_id.to_string()), ("count", count.to_string())],
        )
    }

    pub fn get_season(&self) -> Result<i64, ClientError> {
        let season: Season = self.get("/get-season", &[])?;
        Ok(season.season)
    }

    pub fn set_season(&self, season: i64) -> Result<i64, ClientError> {
        let season: Season = self.put("/set-season", &[("season", season.to_string())])?;
        Ok(season.season)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let client = ScoreClient::new("http://localhost:8000/", "k");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/check"), "http://localhost:8000/check");
    }

    #[test]
    fn unreachable_server_is_a_transport_error() {
        // Port 9 (discard) is essentially never served on loopback.
        let client = ScoreClient::new("http://127.0.0.1:9", "k");
        match client.check() {
            Err(ClientError::Transport(_)) => {}
            other => panic!("expected transport error, got {:?}", other.map(|_| ())),
        }
    }
}
