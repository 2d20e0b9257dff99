use dodge::api::{router, ApiState, MemoryStore, ScoreStore};
use tokio::net::TcpListener;

pub const KEY: &str = "test-key";

/// Starts a score API with an in-memory store on a free local port and
/// returns its base URL.
pub async fn spawn_api() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(ApiState::new(ScoreStore::Memory(MemoryStore::new()), KEY));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
