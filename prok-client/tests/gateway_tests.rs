mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use client::{ApiClient, ApiOutcome, GatewayError, MemoryStorage, SessionStore};
use common::{MockApi, unreachable_base, user};
use serde_json::json;
use shared::models::{LoginRequest, MediaAttachment, NewPost, ProfileUpdate};

fn login_request() -> LoginRequest {
    LoginRequest {
        username_or_email: "ada".to_string(),
        password: "secret".to_string(),
    }
}

#[tokio::test]
async fn login_is_public_and_uses_camel_case_body() {
    let api = MockApi::spawn().await;
    api.reply(
        "POST /api/auth/login",
        StatusCode::OK,
        json!({"message": "Login successful", "access_token": "tok-1", "user": {"id": 7, "username": "ada", "email": "ada@example.com"}}),
    );
    let gateway = api.signed_in_client("stale");

    let response = gateway.login(&login_request()).await.ok().unwrap();

    assert_eq!(response.access_token, "tok-1");
    assert_eq!(response.user, user());
    let request = api.last_request();
    assert_eq!(request.authorization, None);
    assert_eq!(request.json()["usernameOrEmail"], "ada");
}

#[tokio::test]
async fn rejected_login_is_an_application_error() {
    let api = MockApi::spawn().await;
    api.reply(
        "POST /api/auth/login",
        StatusCode::UNAUTHORIZED,
        json!({"error": "Invalid credentials"}),
    );
    let gateway = api.signed_in_client("tok");

    let outcome = gateway.login(&login_request()).await;

    assert!(matches!(outcome, ApiOutcome::Application(ref m) if m == "Invalid credentials"));
    assert!(gateway.session().is_authenticated());
}

#[tokio::test]
async fn authenticated_calls_carry_bearer_token() {
    let api = MockApi::spawn().await;
    api.reply(
        "GET /api/profile",
        StatusCode::OK,
        json!({"name": "Ada", "skills": "Rust", "activity": {}}),
    );
    let gateway = api.signed_in_client("tok-9");

    let profile = gateway.get_profile().await.ok().unwrap();

    assert_eq!(profile.name, "Ada");
    assert_eq!(
        api.last_request().authorization.as_deref(),
        Some("Bearer tok-9")
    );
}

#[tokio::test]
async fn anonymous_calls_send_no_authorization() {
    let api = MockApi::spawn().await;
    api.reply("GET /api/feed", StatusCode::OK, json!({"feed": []}));

    let feed = api.client().get_feed().await.ok().unwrap();

    assert!(feed.feed.is_empty());
    assert_eq!(api.last_request().authorization, None);
}

#[tokio::test]
async fn unauthorized_response_clears_session() {
    let api = MockApi::spawn().await;
    api.reply(
        "GET /api/profile",
        StatusCode::UNAUTHORIZED,
        json!({"msg": "Token has expired"}),
    );
    let gateway = api.signed_in_client("expired");

    let outcome = gateway.get_profile().await;

    assert!(matches!(outcome, ApiOutcome::AuthRequired));
    assert!(!gateway.session().is_authenticated());
    assert_eq!(gateway.session().access_token(), None);
}

#[tokio::test]
async fn unprocessable_token_clears_persisted_session() {
    let api = MockApi::spawn().await;
    api.reply(
        "PUT /api/profile",
        StatusCode::UNPROCESSABLE_ENTITY,
        json!({"msg": "Not enough segments"}),
    );
    let storage = Arc::new(MemoryStorage::new());
    let session = SessionStore::initialize(storage.clone());
    session.establish(user(), "garbled").unwrap();
    let gateway = ApiClient::new(api.base.clone(), session).unwrap();

    let outcome = gateway.update_profile(&ProfileUpdate::default()).await;

    assert!(matches!(outcome, ApiOutcome::AuthRequired));
    assert!(!SessionStore::initialize(storage).is_authenticated());
}

#[tokio::test]
async fn error_field_on_not_found_is_application_error() {
    let api = MockApi::spawn().await;
    api.reply(
        "GET /api/profile",
        StatusCode::NOT_FOUND,
        json!({"error": "Profile not found"}),
    );

    let outcome = api.signed_in_client("tok").get_profile().await;

    assert!(matches!(outcome, ApiOutcome::Application(ref m) if m == "Profile not found"));
}

#[tokio::test]
async fn error_field_in_successful_response_is_application_error() {
    let api = MockApi::spawn().await;
    api.reply(
        "GET /api/feed",
        StatusCode::OK,
        json!({"error": "Feed unavailable"}),
    );

    let outcome = api.signed_in_client("tok").get_feed().await;

    assert!(matches!(outcome, ApiOutcome::Application(ref m) if m == "Feed unavailable"));
}

#[tokio::test]
async fn server_error_without_body_is_status_failure() {
    let api = MockApi::spawn().await;
    api.reply_raw("GET /api/feed", StatusCode::INTERNAL_SERVER_ERROR, "boom");

    let outcome = api.signed_in_client("tok").get_feed().await;

    match outcome {
        ApiOutcome::Failed(GatewayError::Status { status, body }) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_network_failure() {
    let session = SessionStore::initialize(Arc::new(MemoryStorage::new()));
    let gateway = ApiClient::new(unreachable_base().await, session).unwrap();

    let outcome = gateway.login(&login_request()).await;

    assert!(matches!(outcome, ApiOutcome::Failed(ref err) if err.is_network()));
}

#[tokio::test]
async fn user_feed_targets_user_path() {
    let api = MockApi::spawn().await;
    api.reply(
        "GET /api/feed/user/42",
        StatusCode::OK,
        json!({"feed": [{"id": 1, "user_id": 42, "content": "hi", "created_at": "2024-06-01T10:00:00", "likes": 2, "media_url": null}]}),
    );

    let feed = api
        .signed_in_client("tok")
        .get_user_feed(42)
        .await
        .ok()
        .unwrap();

    assert_eq!(feed.feed.len(), 1);
    assert_eq!(feed.feed[0].likes, 2);
}

#[tokio::test]
async fn update_profile_sends_joined_skills() {
    let api = MockApi::spawn().await;
    api.reply(
        "PUT /api/profile",
        StatusCode::OK,
        json!({"message": "Profile updated successfully", "profile": {"name": "Ada"}}),
    );
    let update = ProfileUpdate {
        name: "Ada".to_string(),
        skills: vec!["Rust".to_string(), "Go".to_string()],
        ..ProfileUpdate::default()
    };

    let response = api
        .signed_in_client("tok")
        .update_profile(&update)
        .await
        .ok()
        .unwrap();

    assert_eq!(response.profile.unwrap().name, "Ada");
    let body = api.last_request().json();
    assert_eq!(body["skills"], "Rust, Go");
    assert_eq!(body["education"], json!([]));
}

#[tokio::test]
async fn avatar_upload_uses_image_field() {
    let api = MockApi::spawn().await;
    api.reply(
        "POST /api/profile/image",
        StatusCode::OK,
        json!({"message": "ok", "image_url": "/uploads/profile_images/p.png", "thumbnail_url": null, "filename": "p.png"}),
    );
    let image = MediaAttachment {
        file_name: "me.png".to_string(),
        mime_type: "image/png".to_string(),
        bytes: b"PNGDATA".to_vec(),
    };

    let response = api
        .signed_in_client("tok")
        .upload_avatar(image)
        .await
        .ok()
        .unwrap();

    assert_eq!(response.filename, "p.png");
    let request = api.last_request();
    assert!(
        request
            .content_type
            .as_ref()
            .unwrap()
            .starts_with("multipart/form-data")
    );
    let body = request.text();
    assert!(body.contains(r#"name="image"; filename="me.png""#));
    assert!(body.contains("PNGDATA"));
}

#[tokio::test]
async fn create_post_sends_multipart_fields() {
    let api = MockApi::spawn().await;
    api.reply(
        "POST /api/posts",
        StatusCode::CREATED,
        json!({"message": "Post created successfully", "post": {"id": 3, "user_id": "7", "content": "<h2>T</h2>\nC", "media_url": null, "is_public": false, "allow_comments": true}}),
    );
    let post = NewPost {
        content: "<h2>T</h2>\nC".to_string(),
        media: None,
        is_public: false,
        allow_comments: true,
    };

    let response = api
        .signed_in_client("tok")
        .create_post(post)
        .await
        .ok()
        .unwrap();

    assert_eq!(response.post.author_id, 7);
    let body = api.last_request().text();
    assert!(body.contains(r#"name="content""#));
    assert!(body.contains("<h2>T</h2>\r\nC") || body.contains("<h2>T</h2>\nC"));
    assert!(body.contains(r#"name="is_public""#));
    assert!(body.contains("false"));
    assert!(body.contains(r#"name="allow_comments""#));
    assert!(!body.contains(r#"name="media""#));
}
