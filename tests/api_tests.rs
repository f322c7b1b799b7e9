mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use lingua_backend::services::users;
use lingua_backend::services::vocabulary::{self, NewWordEntry};

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn entry(word: &str, translation: &str) -> NewWordEntry {
    NewWordEntry {
        word: word.to_string(),
        translation: translation.to_string(),
        transcription: None,
        part_of_speech: None,
        examples: Vec::new(),
    }
}

#[tokio::test]
async fn health_reports_connected_database() {
    let app = common::create_test_app().await;

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = common::create_test_app().await;

    let response = app.oneshot(get("/nonexistent/path")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn resolve_creates_and_returns_the_same_user() {
    let app = common::create_test_app().await;

    let request = json!({ "externalId": 42, "username": "alice" });

    let response = app
        .clone()
        .oneshot(post_json("/api/users/resolve", request.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;
    assert_eq!(first["success"], true);
    assert_eq!(first["data"]["externalId"], 42);

    let response = app
        .oneshot(post_json("/api/users/resolve", request))
        .await
        .unwrap();
    let second = body_json(response).await;
    assert_eq!(second["data"]["id"], first["data"]["id"]);
}

#[tokio::test]
async fn stats_for_unknown_user_is_404() {
    let app = common::create_test_app().await;

    let response = app.oneshot(get("/api/users/999/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn word_lookup_degrades_when_dictionary_is_down() {
    // The test app's dictionary client points at an unreachable address.
    let app = common::create_test_app().await;

    let response = app
        .oneshot(post_json("/api/users/1/words", json!({ "query": "hello" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(response).await;
    assert_eq!(body["code"], "UPSTREAM_UNAVAILABLE");
}

#[tokio::test]
async fn word_list_and_mastery_flow() {
    let pool = common::create_test_pool().await;
    let user = users::get_or_create_user(&pool, 5, None, None).await.unwrap();
    vocabulary::add_word(&pool, &user.id, &entry("cat", "кошка")).await.unwrap();
    vocabulary::add_word(&pool, &user.id, &entry("dog", "собака")).await.unwrap();

    let app = common::create_test_app_with_pool(pool).await;

    let response = app.clone().oneshot(get("/api/users/5/words")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["words"][0]["word"], "dog");

    let response = app
        .clone()
        .oneshot(post_json("/api/users/5/words/cat/mastered", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.clone().oneshot(get("/api/users/5/review")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["word"], "dog");

    let response = app
        .oneshot(post_json("/api/users/5/words/ghost/mastered", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], "WORD_NOT_FOUND");
}

#[tokio::test]
async fn quiz_flow_round_trips_the_correct_index() {
    let pool = common::create_test_pool().await;
    let user = users::get_or_create_user(&pool, 9, None, None).await.unwrap();
    vocabulary::add_word(&pool, &user.id, &entry("cat", "кошка")).await.unwrap();
    vocabulary::add_word(&pool, &user.id, &entry("dog", "собака")).await.unwrap();

    let app = common::create_test_app_with_pool(pool).await;

    let response = app.clone().oneshot(get("/api/users/9/quiz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let correct_index = body["data"]["correctIndex"].as_u64().unwrap();
    let options = body["data"]["options"].as_array().unwrap();
    assert_eq!(options.len(), 2);

    let answer = json!({ "correctIndex": correct_index, "chosenIndex": correct_index });
    let response = app
        .oneshot(post_json("/api/users/9/quiz/answer", answer))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["correct"], true);
    assert_eq!(body["data"]["stats"]["correctAnswers"], 1);
    assert_eq!(body["data"]["stats"]["accuracy"], 100.0);
}

#[tokio::test]
async fn quiz_without_vocabulary_is_unprocessable() {
    let pool = common::create_test_pool().await;
    users::get_or_create_user(&pool, 3, None, None).await.unwrap();

    let app = common::create_test_app_with_pool(pool).await;

    let response = app.oneshot(get("/api/users/3/quiz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["code"], "INSUFFICIENT_VOCABULARY");
}
