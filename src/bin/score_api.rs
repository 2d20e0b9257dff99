use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dodge::api::auth::{token_hex, write_auth_file};
use dodge::api::{router, ApiState, MemoryStore, ScoreStore, SqliteStore};
use dodge::server::{init_tracing, serve};
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StoreKind {
    Sqlite,
    Memory,
}

/// Score and play-count API for DodgeGame.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "0.0.0.0:8000")]
    bind: String,
    #[arg(long, value_enum, default_value = "sqlite")]
    store: StoreKind,
    /// SQLite database URL.
    #[arg(long, default_value = "sqlite://db.sqlite3")]
    database: String,
    /// Use this key instead of generating one.
    #[arg(long, env = "DODGE_AUTH_KEY")]
    auth_key: Option<String>,
    /// Where the active key is written.
    #[arg(long, default_value = "auth.txt")]
    auth_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let auth_key = args.auth_key.unwrap_or_else(|| token_hex(20));
    write_auth_file(&args.auth_file, &auth_key)
        .with_context(|| format!("writing {}", args.auth_file.display()))?;
    tracing::info!(path = %args.auth_file.display(), "auth key written");

    let store = match args.store {
        StoreKind::Sqlite => {
            let store = SqliteStore::connect(&args.database)
                .await
                .with_context(|| format!("opening {}", args.database))?;
            tracing::info!(database = %args.database, "using sqlite store");
            ScoreStore::Sqlite(store)
        }
        StoreKind::Memory => {
            tracing::warn!("using in-memory store; scores are lost on exit");
            ScoreStore::Memory(MemoryStore::new())
        }
    };

    serve(router(ApiState::new(store, auth_key)), &args.bind).await
}
