use anyhow::Result;
use clap::Parser;
use dodge::admin::{router, AdminState};
use dodge::api::auth::token_hex;
use dodge::client::ScoreClient;
use dodge::server::{init_tracing, serve};

/// Admin pages for DodgeGame's score server.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "0.0.0.0:5000")]
    bind: String,
    #[arg(long, default_value = "http://localhost:8000")]
    api_url: String,
    /// Auth key printed in the score server's auth file.
    #[arg(long, env = "DODGE_AUTH_KEY", default_value = "")]
    auth_key: String,
    #[arg(long, default_value = "admin")]
    admin_id: String,
    /// Generated at startup when not given.
    #[arg(long, env = "DODGE_ADMIN_PASSWORD")]
    admin_password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    if args.auth_key.is_empty() {
        tracing::warn!("no auth key given; season and score changes will be rejected by the API");
    }
    let admin_pw = args.admin_password.unwrap_or_else(|| token_hex(15));
    tracing::info!("ADMIN ID: {}", args.admin_id);
    tracing::info!("ADMIN PW: {}", admin_pw);

    let client = ScoreClient::new(&args.api_url, &args.auth_key);
    let state = AdminState::new(client, args.admin_id, admin_pw);
    serve(router(state), &args.bind).await
}
