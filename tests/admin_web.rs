mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use dodge::admin::{router, AdminState};
use dodge::client::ScoreClient;
use tower::ServiceExt;

const ADMIN_ID: &str = "admin";
const ADMIN_PW: &str = "hunter2";

async fn admin_app() -> (Router, ScoreClient) {
    let base_url = common::spawn_api().await;
    let client = ScoreClient::new(&base_url, common::KEY);
    (router(AdminState::new(client.clone(), ADMIN_ID, ADMIN_PW)), client)
}

async fn request(app: &Router, method: Method, uri: &str, cookie: Option<&str>, form: Option<&str>) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = match form {
        Some(form) => {
            builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            Body::from(form.to_string())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
}

fn location(response: &axum::response::Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

async fn log_in(app: &Router) -> String {
    let response = request(
        app,
        Method::POST,
        "/login",
        None,
        Some(&format!("id={ADMIN_ID}&pw={ADMIN_PW}")),
    )
    .await;
    assert_eq!(location(&response), "/");
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}


#[tokio::test(flavor = "multi_thread")]
async fn pages_need_a_session() {
    let (app, _) = admin_app().await;
    let response = request(&app, Method::GET, "/", None, None).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");

    let response = request(&app, Method::POST, "/set-season", None, Some("season=4")).await;
    assert_eq!(location(&response), "/login");

    let response = request(&app, Method::GET, "/login", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test(flavor = "multi_thread")]
async fn wrong_password_does_not_log_in() {
    let (app, _) = admin_app().await;
    let response = request(&app, Method::POST, "/login", None, Some("id=admin&pw=wrong")).await;
    assert_eq!(location(&response), "/login");
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn admin_changes_season_through_the_api() {
    let (app, client) = admin_app().await;
    let cookie = log_in(&app).await;

    let response = request(&app, Method::POST, "/set-season", Some(&cookie), Some("season=3")).await;
    assert_eq!(location(&response), "/");

    let season = tokio::task::spawn_blocking(move || client.get_season()).await.unwrap().unwrap();
    assert_eq!(season, 3);

    let response = request(&app, Method::GET, "/get-season", None, None).await;
    assert_eq!(body_text(response).await, "3");

    let response = request(&app, Method::GET, "/", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Season 3"));
}

#[tokio::test(flavor = "multi_thread")]
async fn admin_sets_and_lists_scores() {
    let (app, _) = admin_app().await;
    let cookie = log_in(&app).await;

    let response = request(
        &app,
        Method::POST,
        "/set-score",
        Some(&cookie),
        Some("player_id=20231&time=4500&action=200"),
    )
    .await;
    assert_eq!(location(&response), "/");

    request(&app, Method::POST, "/get-score", Some(&cookie), None).await;
    let page = body_text(request(&app, Method::GET, "/", Some(&cookie), None).await).await;
    assert!(page.contains("20231"));
    assert!(page.contains("4700"));
}

#[tokio::test(flavor = "multi_thread")]
async fn logout_ends_the_session() {
    let (app, _) = admin_app().await;
    let cookie = log_in(&app).await;
    let response = request(&app, Method::GET, "/logout", Some(&cookie), None).await;
    assert_eq!(location(&response), "/login");

    let response = request(&app, Method::GET, "/", Some(&cookie), None).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test(flavor = "multi_thread")]
async fn bad_form_without_session_still_redirects_to_login() {
    let (app, _) = admin_app().await;
    let response = request(&app, Method::POST, "/set-season", None, Some("season=abc")).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");

    let response = request(&app, Method::POST, "/set-score", None, Some("")).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");
}

#[tokio::test(flavor = "multi_thread")]
async fn bad_form_from_admin_becomes_a_notice() {
    let (app, client) = admin_app().await;
    let cookie = log_in(&app).await;

    let response = request(&app, Method::POST, "/set-season", Some(&cookie), Some("season=")).await;
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/");

    let page = body_text(request(&app, Method::GET, "/", Some(&cookie), None).await).await;
    assert!(page.contains("Setting season failed"));

    let season = tokio::task::spawn_blocking(move || client.get_season()).await.unwrap().unwrap();
    assert_eq!(season, 1);
}
