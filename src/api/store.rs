//! Score storage behind the API.
//!
//! Two interchangeable backends: SQLite tables through `sqlx`, and a plain
//! in-memory key-value store. Writes are last-write-wins on
//! `(student_id, season)`.

use crate::scoring::{ScoreRecord, DEFAULT_SEASON};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored season {0:?} is not a number")]
    CorruptSeason(String),
}

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS scores (
        student_id TEXT NOT NULL,
        season INTEGER NOT NULL,
        time_score INTEGER NOT NULL,
        action_score INTEGER NOT NULL,
        overall_score INTEGER NOT NULL,
        PRIMARY KEY (student_id, season)
    )",
    "CREATE TABLE IF NOT EXISTS playcount (
        student_id TEXT NOT NULL,
        season INTEGER NOT NULL,
        playcount INTEGER NOT NULL,
        PRIMARY KEY (student_id, season)
    )",
    "CREATE TABLE IF NOT EXISTS settings (
        name TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )",
];

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if needed) the database at `url`, e.g.
    /// `sqlite://db.sqlite3` or `sqlite::memory:`.
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let in_memory = url.contains(":memory:");
        let mut pool = SqlitePoolOptions::new();
        if in_memory {
            // Every connection to :memory: is a separate database; keep exactly one alive.
            pool = pool.max_connections(1).idle_timeout(None).max_lifetime(None);
        }
        let pool = pool.connect_with(options).await?;
        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }
        Ok(Self { pool })
    }

    fn record(row: &SqliteRow) -> Result<ScoreRecord, sqlx::Error> {
        Ok(ScoreRecord {
            student_id: row.try_get("student_id")?,
            time_score: row.try_get("time_score")?,
            action_score: row.try_get("action_score")?,
            overall_score: row.try_get("overall_score")?,
            season: row.try_get("season")?,
        })
    }

    async fn get_score(&self, student_id: &str, season: i64) -> Result<Option<ScoreRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT student_id, season, time_score, action_score, overall_score
             FROM scores WHERE student_id = ? AND season = ?",
        )
        .bind(student_id)
        .bind(season)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(Self::record).transpose()?)
    }

    async fn list_scores(&self, season: i64) -> Result<Vec<ScoreRecord>, StoreError> {
        let rows = sqlx::query(
            "SELECT student_id, season, time_score, action_score, overall_score
             FROM scores WHERE season = ?
             ORDER BY overall_score DESC, student_id ASC",
        )
        .bind(season)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(Self::record).collect::<Result<_, _>>()?)
    }

    async fn put_score(&self, record: &ScoreRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO scores (student_id, season, time_score, action_score, overall_score)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (student_id, season) DO UPDATE SET
                time_score = excluded.time_score,
                action_score = excluded.action_score,
                overall_score = excluded.overall_score",
        )
        .bind(&record.student_id)
        .bind(record.season)
        .bind(record.time_score)
        .bind(record.action_score)
        .bind(record.overall_score)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_playcount(&self, student_id: &str, season: i64) -> Result<i64, StoreError> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT playcount FROM playcount WHERE student_id = ? AND season = ?")
                .bind(student_id)
                .bind(season)
                .fetch_optional(&self.pool)
                .await?;
        Ok(count.unwrap_or(0))
    }

    async fn put_playcount(&self, student_id: &str, season: i64, count: i64) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO playcount (student_id, season, playcount) VALUES (?, ?, ?)
             ON CONFLICT (student_id, season) DO UPDATE SET playcount = excluded.playcount",
        )
        .bind(student_id)
        .bind(season)
        .bind(count)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn current_season(&self) -> Result<i64, StoreError> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE name = 'season'")
            .fetch_optional(&self.pool)
            .await?;
        match value {
            None => Ok(DEFAULT_SEASON),
            Some(v) => v.parse().map_err(|_| StoreError::CorruptSeason(v)),
        }
    }

    async fn set_season(&self, season: i64) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO settings (name, value) VALUES ('season', ?)
             ON CONFLICT (name) DO UPDATE SET value = excluded.value",
        )
        .bind(season.to_string())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[derive(Default)]
struct MemoryTables {
    scores: BTreeMap<(String, i64), ScoreRecord>,
    playcounts: BTreeMap<(String, i64), i64>,
    season: Option<i64>,
}

/// Key-value backend; contents live as long as the process.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<MemoryTables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn get_score(&self, student_id: &str, season: i64) -> Option<ScoreRecord> {
        let tables = self.tables.read().await;
        tables.scores.get(&(student_id.to_string(), season)).cloned()
    }

    async fn list_scores(&self, season: i64) -> Vec<ScoreRecord> {
        let tables = self.tables.read().await;
        let mut records: Vec<ScoreRecord> = tables
            .scores
            .values()
            .filter(|r| r.season == season)
            .cloned()
            .collect();
        records.sort_by(|a, b| {
            b.overall_score
                .cmp(&a.overall_score)
                .then_with(|| a.student_id.cmp(&b.student_id))
        });
        records
    }

    async fn put_score(&self, record: &ScoreRecord) {
        let mut tables = self.tables.write().await;
        tables
            .scores
            .insert((record.student_id.clone(), record.season), record.clone());
    }

    async fn get_playcount(&self, student_id: &str, season: i64) -> i64 {
        let tables = self.tables.read().await;
        tables
            .playcounts
            .get(&(student_id.to_string(), season))
            .copied()
            .unwrap_or(0)
    }

    async fn put_playcount(&self, student_id: &str, season: i64, count: i64) {
        let mut tables = self.tables.write().await;
        tables.playcounts.insert((student_id.to_string(), season), count);
    }

    async fn current_season(&self) -> i64 {
        self.tables.read().await.season.unwrap_or(DEFAULT_SEASON)
    }

    async fn set_season(&self, season: i64) {
        self.tables.write().await.season = Some(season);
    }
}

#[derive(Clone)]
pub enum ScoreStore {
    Sqlite(SqliteStore),
    Memory(MemoryStore),
}

impl ScoreStore {
    pub async fn get_score(&self, student_id: &str, season: i64) -> Result<Option<ScoreRecord>, StoreError> {
        match self {
            ScoreStore::Sqlite(store) => store.get_score(student_id, season).await,
            ScoreStore::Memory(store) => Ok(store.get_score(student_id, season).await),
        }
    }

    /// All scores of a season, best overall score first.
    pub async fn list_scores(&self, season: i64) -> Result<Vec<ScoreRecord>, StoreError> {
        match self {
            ScoreStore::Sqlite(store) => store.list_scores(season).await,
            ScoreStore::Memory(store) => Ok(store.list_scores(season).await),
        }
    }

    /// Inserts the record or overwrites the existing one for the same
    /// student and season.
    pub async fn put_score(&self, record: &ScoreRecord) -> Result<(), StoreError> {
        match self {
            ScoreStore::Sqlite(store) => store.put_score(record).await,
            ScoreStore::Memory(store) => {
                store.put_score(record).await;
                Ok(())
            }
        }
    }

    /// Plays recorded for the student; 0 if never recorded.
    pub async fn get_playcount(&self, student_id: &str, season: i64) -> Result<i64, StoreError> {
        match self {
            ScoreStore::Sqlite(store) => store.get_playcount(student_id, season).await,
            ScoreStore::Memory(store) => Ok(store.get_playcount(student_id, season).await),
        }
    }

    pub async fn put_playcount(&self, student_id: &str, season: i64, count: i64) -> Result<(), StoreError> {
        match self {
            ScoreStore::Sqlite(store) => store.put_playcount(student_id, season, count).await,
            ScoreStore::Memory(store) => {
                store.put_playcount(student_id, season, count).await;
                Ok(())
            }
        }
    }

    pub async fn current_season(&self) -> Result<i64, StoreError> {
        match self {
            ScoreStore::Sqlite(store) => store.current_season().await,
            ScoreStore::Memory(store) => Ok(store.current_season().await),
        }
    }

    pub async fn set_season(&self, season: i64) -> Result<(), StoreError> {
        match self {
            ScoreStore::Sqlite(store) => store.set_season(season).await,
            ScoreStore::Memory(store) => {
                store.set_season(season).await;
                Ok(())
            }
        }
    }
}
