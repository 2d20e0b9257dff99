use crate::api::auth::token_hex;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

pub const SESSION_COOKIE: &str = "dodge_admin_session";

/// Sessions older than this must log in again.
pub const SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Opening more sessions than this drops the oldest.
pub const MAX_SESSIONS: usize = 16;

#[derive(Clone, Copy)]
struct Opened {
    seq: u64,
    at: Instant,
}

#[derive(Default)]
struct Sessions {
    tokens: HashMap<String, Opened>,
    next_seq: u64,
}

/// Logged-in admin sessions, keyed by the random token kept in a cookie.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Sessions>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(SESSION_TTL)
    }
}

impl SessionStore {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            inner: Arc::default(),
            ttl,
        }
    }

    pub async fn open(&self) -> String {
        let token = token_hex(20);
        let now = Instant::now();
        let mut sessions = self.inner.write().await;
        sessions
            .tokens
            .retain(|_, opened| now.duration_since(opened.at) < self.ttl);
        while sessions.tokens.len() >= MAX_SESSIONS {
            let oldest = sessions
                .tokens
                .iter()
                .min_by_key(|(_, opened)| opened.seq)
                .map(|(token, _)| token.clone());
            match oldest {
                Some(oldest) => sessions.tokens.remove(&oldest),
                None => break,
            };
        }
        let seq = sessions.next_seq;
        sessions.next_seq += 1;
        sessions.tokens.insert(token.clone(), Opened { seq, at: now });
        token
    }

    pub async fn is_valid(&self, jar: &CookieJar) -> bool {
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return false;
        };
        match self.inner.read().await.tokens.get(cookie.value()) {
            Some(opened) => opened.at.elapsed() < self.ttl,
            None => false,
        }
    }

    pub async fn close(&self, jar: &CookieJar) {
        if let Some(cookie) = jar.get(SESSION_COOKIE) {
            self.inner.write().await.tokens.remove(cookie.value());
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.tokens.len()
    }
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn opened_session_is_valid_until_closed() {
        let sessions = SessionStore::default();
        let jar = CookieJar::new();
        assert!(!sessions.is_valid(&jar).await);

        let token = sessions.open().await;
        let jar = jar.add(session_cookie(token));
        assert!(sessions.is_valid(&jar).await);

        sessions.close(&jar).await;
        assert!(!sessions.is_valid(&jar).await);
        assert_eq!(sessions.len().await, 0);
    }

    #[tokio::test]
    async fn unknown_token_is_rejected() {
        let sessions = SessionStore::default();
        sessions.open().await;
        let jar = CookieJar::new().add(session_cookie("forged".into()));
        assert!(!sessions.is_valid(&jar).await);
    }

    #[tokio::test]
    async fn expired_session_is_rejected() {
        let sessions = SessionStore::with_ttl(Duration::ZERO);
        let jar = CookieJar::new().add(session_cookie(sessions.open().await));
        assert!(!sessions.is_valid(&jar).await);
    }

    #[tokio::test]
    async fn logins_do_not_grow_without_bound() {
        let sessions = SessionStore::default();
        let first = sessions.open().await;
        for _ in 0..MAX_SESSIONS * 2 {
            sessions.open().await;
        }
        assert_eq!(sessions.len().await, MAX_SESSIONS);

        let jar = CookieJar::new().add(session_cookie(first));
        assert!(!sessions.is_valid(&jar).await);
    }
}
