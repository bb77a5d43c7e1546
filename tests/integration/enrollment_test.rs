//! Integration tests for registration and sign-in confirmation.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use account_database::repositories::{ProfileStore, UserStore};
use helpers::{TestApp, TestRequest};

fn confirmation(password: &str) -> serde_json::Value {
    json!({
        "title": "Acme",
        "industry": "wholesale_retail",
        "role": "executive",
        "people": 12,
        "links": { "telegram": "@acme" },
        "password": password,
    })
}

fn signin_path(email: &str, token: impl std::fmt::Display) -> String {
    format!("/api/user/signin/{email}/{token}/")
}

#[tokio::test]
async fn test_register_creates_user_and_account() {
    let app = TestApp::new().await;

    let response = app.register("Yuri08", "yuri@mail.ru").await;

    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
    assert_eq!(response.body["user"]["username"], "Yuri08");
    assert_eq!(response.body["user"]["email"], "yuri@mail.ru");
    assert_eq!(response.body["account"]["is_admin"], false);
    assert_eq!(response.body["account"]["user_id"], response.body["user"]["id"]);
    assert!(response.body["account"].get("enrollment_token").is_none());
    assert!(response.cookie("csrftoken").is_some());
}

#[tokio::test]
async fn test_register_mails_link_and_password() {
    let app = TestApp::new().await;
    app.register("Yuri08", "yuri@mail.ru").await;

    let password = app.mailed_password("yuri@mail.ru").await;
    let token = app.enrollment_token("Yuri08").await;

    assert_eq!(password.len(), app.config.enrollment.password_length);
    assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_eq!(app.mail_count().await, 1);

    let sent = app.outbox_bodies().await;
    assert!(sent[0].contains(&format!("https://crm.example.com/signin/yuri@mail.ru/{token}")));
}

#[tokio::test]
async fn test_register_duplicate_username_conflicts() {
    let app = TestApp::new().await;
    app.register("Yuri08", "yuri@mail.ru").await;

    let response = app.register("Yuri08", "other@mail.ru").await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.detail(), "A user with that username already exists.");
    assert!(
        UserStore::find_by_email(app.store.as_ref(), "other@mail.ru")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = TestApp::new().await;
    app.register("Yuri08", "yuri@mail.ru").await;

    let response = app.register("Yuri09", "yuri@mail.ru").await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    assert!(
        UserStore::find_by_username(app.store.as_ref(), "Yuri09")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let app = TestApp::new().await;

    let bad_email = app.register("Yuri08", "not-an-email").await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);

    let bad_username = app.register("Yuri 08!", "yuri@mail.ru").await;
    assert_eq!(bad_username.status, StatusCode::BAD_REQUEST);

    let missing_field = app
        .send(TestRequest::post("/api/user/registration/").json(json!({ "username": "Yuri08" })))
        .await;
    assert_eq!(missing_field.status, StatusCode::BAD_REQUEST);

    assert!(
        UserStore::find_by_username(app.store.as_ref(), "Yuri08")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_signin_prompt_returns_message() {
    let app = TestApp::new().await;
    app.register("Yuri08", "yuri@mail.ru").await;
    let token = app.enrollment_token("Yuri08").await;

    let response = app
        .send(TestRequest::get(&signin_path("yuri@mail.ru", token)))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body["message"],
        "To finish registration, tell us about your company!"
    );
    assert!(response.cookie("csrftoken").is_some());
}

#[tokio::test]
async fn test_confirm_creates_profile_and_session() {
    let app = TestApp::new().await;
    app.register("Yuri08", "yuri@mail.ru").await;
    let password = app.mailed_password("yuri@mail.ru").await;
    let token = app.enrollment_token("Yuri08").await;

    let response = app
        .send(TestRequest::post(&signin_path("yuri@mail.ru", token)).json(confirmation(&password)))
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert!(response.body["access_token"].as_str().is_some());

    let refresh = response
        .cookie_attributes("refreshtoken")
        .expect("refresh cookie");
    assert!(!refresh["value"].is_empty());
    assert!(refresh.contains_key("httponly"));
    assert_eq!(refresh["path"], "/");

    let profile = ProfileStore::find_by_id(app.store.as_ref(), token)
        .await
        .unwrap()
        .expect("profile created");
    assert_eq!(profile.id, token);
    assert_eq!(profile.name, "Yuri08");
    assert_eq!(profile.email, "yuri@mail.ru");
    assert!(profile.company_id.is_some());
}

#[tokio::test]
async fn test_confirm_is_single_use() {
    let app = TestApp::new().await;
    app.register("Yuri08", "yuri@mail.ru").await;
    let password = app.mailed_password("yuri@mail.ru").await;
    let token = app.enrollment_token("Yuri08").await;
    let path = signin_path("yuri@mail.ru", token);

    let first = app
        .send(TestRequest::post(&path).json(confirmation(&password)))
        .await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app
        .send(TestRequest::post(&path).json(confirmation(&password)))
        .await;
    assert_eq!(second.status, StatusCode::UNAUTHORIZED);
    assert_eq!(second.detail(), "Invalid credentials or one-time password");
}

#[tokio::test]
async fn test_confirm_wrong_password_keeps_secret() {
    let app = TestApp::new().await;
    app.register("Yuri08", "yuri@mail.ru").await;
    let password = app.mailed_password("yuri@mail.ru").await;
    let token = app.enrollment_token("Yuri08").await;
    let path = signin_path("yuri@mail.ru", token);

    let wrong = app
        .send(TestRequest::post(&path).json(confirmation("definitely-wrong")))
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert!(wrong.cookie("refreshtoken").is_none());
    assert!(
        ProfileStore::find_by_id(app.store.as_ref(), token)
            .await
            .unwrap()
            .is_none()
    );

    let right = app
        .send(TestRequest::post(&path).json(confirmation(&password)))
        .await;
    assert_eq!(right.status, StatusCode::OK);
}

#[tokio::test]
async fn test_confirm_with_other_email_is_not_found() {
    let app = TestApp::new().await;
    app.register("Yuri08", "yuri@mail.ru").await;
    app.register("Anna", "anna@mail.ru").await;
    let password = app.mailed_password("yuri@mail.ru").await;
    let token = app.enrollment_token("Yuri08").await;

    let response = app
        .send(TestRequest::post(&signin_path("anna@mail.ru", token)).json(confirmation(&password)))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_confirm_with_malformed_token_is_not_found() {
    let app = TestApp::new().await;
    app.register("Yuri08", "yuri@mail.ru").await;

    let response = app
        .send(TestRequest::post(&signin_path("yuri@mail.ru", "not-a-uuid")).json(confirmation("x")))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_confirm_rejects_invalid_company() {
    let app = TestApp::new().await;
    app.register("Yuri08", "yuri@mail.ru").await;
    let password = app.mailed_password("yuri@mail.ru").await;
    let token = app.enrollment_token("Yuri08").await;
    let path = signin_path("yuri@mail.ru", token);

    let mut body = confirmation(&password);
    body["people"] = json!(0);
    let response = app.send(TestRequest::post(&path).json(body)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    // Validation failed before the secret was touched.
    let response = app
        .send(TestRequest::post(&path).json(confirmation(&password)))
        .await;
    assert_eq!(response.status, StatusCode::OK);
}
