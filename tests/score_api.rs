use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use dodge::api::{router, ApiState, MemoryStore, ScoreStore, SqliteStore};
use serde_json::Value;
use tower::ServiceExt;

const KEY: &str = "test-key";

async fn send(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn memory_app() -> Router {
    router(ApiState::new(ScoreStore::Memory(MemoryStore::new()), KEY))
}

#[tokio::test]
async fn check_reports_alive() {
    let app = memory_app();
    let (status, body) = send(&app, Method::GET, "/check").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alive"], true);
}

#[tokio::test]
async fn put_then_get_score() {
    let app = memory_app();
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/put-score?key={KEY}&player_id=10101&time=21000&action=300"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["overall_score"], 21300);

    let (status, body) = send(&app, Method::GET, "/get-score?player_id=10101").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["key"], "10101");
    assert_eq!(body["time_score"], 21000);
    assert_eq!(body["action_score"], 300);
    assert_eq!(body["season"], 1);
}

#[tokio::test]
async fn later_score_replaces_earlier() {
    let app = memory_app();
    send(&app, Method::PUT, &format!("/put-score?key={KEY}&player_id=7&time=900&action=0")).await;
    send(&app, Method::PUT, &format!("/put-score?key={KEY}&player_id=7&time=100&action=0")).await;
    let (_, body) = send(&app, Method::GET, "/get-score?player_id=7").await;
    assert_eq!(body["overall_score"], 100);
}

#[tokio::test]
async fn listing_is_sorted_by_overall_score() {
    let app = memory_app();
    for (id, time) in [("a", 10), ("b", 30), ("c", 20)] {
        send(
            &app,
            Method::PUT,
            &format!("/put-score?key={KEY}&player_id={id}&time={time}&action=0"),
        )
        .await;
    }
    let (status, body) = send(&app, Method::GET, "/get-score").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["key"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["b", "c", "a"]);
}

#[tokio::test]
async fn wrong_key_is_forbidden() {
    let app = memory_app();
    let (status, body) = send(&app, Method::PUT, "/put-score?key=nope&player_id=1&time=1&action=1").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["detail"].is_string());

    let (status, _) = send(&app, Method::PUT, "/put-playcount?player_id=1&count=1").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, Method::GET, "/get-score?player_id=1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn empty_server_key_rejects_everything() {
    let app = router(ApiState::new(ScoreStore::Memory(MemoryStore::new()), ""));
    let (status, _) = send(&app, Method::PUT, "/put-score?key=&player_id=1&time=1&action=1").await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn negative_scores_are_rejected() {
    let app = memory_app();
    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/put-score?key={KEY}&player_id=1&time=-5&action=0"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn playcount_defaults_to_zero_and_counts_up() {
    let app = memory_app();
    let (status, body) = send(&app, Method::GET, "/get-playcount?player_id=10101").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "10101");
    assert_eq!(body["count"], 0);

    let (status, _) = send(
        &app,
        Method::PUT,
        &format!("/put-playcount?key={KEY}&player_id=10101&count=1"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, body) = send(&app, Method::GET, "/get-playcount?player_id=10101").await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn new_season_starts_with_clean_slate() {
    let app = router(ApiState::new(
        ScoreStore::Sqlite(SqliteStore::connect("sqlite::memory:").await.unwrap()),
        KEY,
    ));
    send(&app, Method::PUT, &format!("/put-score?key={KEY}&player_id=1&time=50&action=0")).await;
    send(&app, Method::PUT, &format!("/put-playcount?key={KEY}&player_id=1&count=3")).await;

    let (status, body) = send(&app, Method::PUT, &format!("/set-season?key={KEY}&season=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["season"], 2);
    let (_, body) = send(&app, Method::GET, "/get-season").await;
    assert_eq!(body["season"], 2);

    let (status, _) = send(&app, Method::GET, "/get-score?player_id=1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, body) = send(&app, Method::GET, "/get-playcount?player_id=1").await;
    assert_eq!(body["count"], 0);

    let (status, body) = send(&app, Method::GET, "/get-score?player_id=1&season=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overall_score"], 50);

    let (status, _) = send(&app, Method::PUT, &format!("/set-season?key={KEY}&season=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn oversized_total_is_a_bad_request() {
    let app = memory_app();
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/put-score?key={KEY}&player_id=1&time=9223372036854775807&action=1"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "score out of range");
}

#[tokio::test]
async fn malformed_query_answers_with_detail() {
    let app = memory_app();
    let (status, body) = send(&app, Method::PUT, &format!("/put-score?key={KEY}&time=1&action=1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("player_id"));

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/put-playcount?key={KEY}&player_id=1&count=many"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());

    let (status, body) = send(&app, Method::GET, "/get-score?season=two").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn playcount_ids_are_trimmed_like_score_ids() {
    let app = memory_app();
    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/put-playcount?key={KEY}&player_id=%2010101%20&count=2"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "10101");

    let (_, body) = send(&app, Method::GET, "/get-playcount?player_id=10101").await;
    assert_eq!(body["count"], 2);

    let (status, _) = send(&app, Method::PUT, &format!("/put-playcount?key={KEY}&player_id=%20&count=1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
