//! Integration tests for token login, refresh, logout, and admin access.

mod helpers;

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use account_database::repositories::UserStore;
use account_entity::mail_profile::MailProfile;
use helpers::{TestApp, TestRequest, test_config};

const REFRESH: &str = "/api/user/login/token/refresh/";
const LOGOUT: &str = "/api/user/logout/token/";
const PROFILE_MAIL: &str = "/api/user/profile_mail/";

#[tokio::test]
async fn test_login_sets_session_cookies() {
    let app = TestApp::new().await;
    app.register("Yuri08", "yuri@mail.ru").await;

    let response = app
        .send(TestRequest::post("/api/user/login/token/").json(json!({ "username": "Yuri08" })))
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert!(response.body["access_token"].as_str().is_some());
    assert_eq!(response.body["account"]["is_admin"], false);

    let refresh = response
        .cookie_attributes("refreshtoken")
        .expect("refresh cookie");
    assert!(refresh.contains_key("httponly"));
    assert_eq!(refresh["samesite"], "Lax");

    let csrf = response.cookie_attributes("csrftoken").expect("csrf cookie");
    assert!(!csrf.contains_key("httponly"));
}

#[tokio::test]
async fn test_login_unknown_user_is_not_found() {
    let app = TestApp::new().await;

    let response = app
        .send(TestRequest::post("/api/user/login/token/").json(json!({ "username": "ghost" })))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.cookie("refreshtoken").is_none());
}

#[tokio::test]
async fn test_login_requires_username() {
    let app = TestApp::new().await;

    let response = app
        .send(TestRequest::post("/api/user/login/token/").json(json!({ "username": "" })))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_password_policy() {
    let mut config = test_config();
    config.auth.require_password_on_login = true;
    let app = TestApp::with_config(config).await;
    app.register("Yuri08", "yuri@mail.ru").await;
    let password = app.mailed_password("yuri@mail.ru").await;
    let login = |password: Option<&str>| {
        let mut body = json!({ "username": "Yuri08" });
        if let Some(password) = password {
            body["password"] = json!(password);
        }
        TestRequest::post("/api/user/login/token/").json(body)
    };

    assert_eq!(app.send(login(None)).await.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        app.send(login(Some("wrong-password"))).await.status,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(app.send(login(Some(password.as_str()))).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_ignores_stale_bearer() {
    let app = TestApp::new().await;
    let session = app.registered_session("Yuri08", "yuri@mail.ru").await;
    let login = || {
        TestRequest::post("/api/user/login/token/").json(json!({ "username": "Yuri08" }))
    };

    let stale = app.send(login().bearer("stale.access.token")).await;
    assert_eq!(stale.status, StatusCode::OK, "{:?}", stale.body);
    assert!(stale.cookie("refreshtoken").is_some());

    // A valid bearer does not pull login under the CSRF check either.
    let valid = app.send(login().bearer(&session.access)).await;
    assert_eq!(valid.status, StatusCode::OK, "{:?}", valid.body);
}

#[tokio::test]
async fn test_login_replaces_malformed_csrf_cookie() {
    let app = TestApp::new().await;
    app.register("Yuri08", "yuri@mail.ru").await;
    let malformed = "a".repeat(64);

    let response = app
        .send(
            TestRequest::post("/api/user/login/token/")
                .cookie("csrftoken", &malformed)
                .json(json!({ "username": "Yuri08" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

    let csrf = response.cookie("csrftoken").expect("fresh csrf cookie");
    assert_ne!(csrf, malformed);
    assert_eq!(csrf.len(), 43);

    let refresh = response.cookie("refreshtoken").expect("refresh cookie");
    let response = app
        .send(
            TestRequest::post(REFRESH)
                .cookie("refreshtoken", &refresh)
                .cookie("csrftoken", &csrf)
                .header("x-csrftoken", &csrf),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
}

#[tokio::test]
async fn test_login_keeps_well_formed_csrf_cookie() {
    let app = TestApp::new().await;
    let session = app.registered_session("Yuri08", "yuri@mail.ru").await;

    let response = app
        .send(
            TestRequest::post("/api/user/login/token/")
                .cookie("csrftoken", &session.csrf)
                .json(json!({ "username": "Yuri08" })),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.cookie("csrftoken").is_none());
}

#[tokio::test]
async fn test_refresh_issues_new_access_token() {
    let app = TestApp::new().await;
    let session = app.registered_session("Yuri08", "yuri@mail.ru").await;

    let response = app.send(session.post(REFRESH)).await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let access = response.body["access_token"].as_str().expect("access_token");

    // The new access token authenticates the same user.
    let admin = app
        .send(TestRequest::get(PROFILE_MAIL).bearer(access))
        .await;
    assert_eq!(admin.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_refresh_with_matching_bearer() {
    let app = TestApp::new().await;
    let session = app.registered_session("Yuri08", "yuri@mail.ru").await;

    let response = app.send(session.post(REFRESH).bearer(&session.access)).await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
}

#[tokio::test]
async fn test_refresh_with_stale_bearer() {
    let app = TestApp::new().await;
    let session = app.registered_session("Yuri08", "yuri@mail.ru").await;

    let response = app
        .send(session.post(REFRESH).bearer("stale.access.token"))
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert!(response.body["access_token"].as_str().is_some());
}

#[tokio::test]
async fn test_refresh_without_csrf_header_is_forbidden() {
    let app = TestApp::new().await;
    let session = app.registered_session("Yuri08", "yuri@mail.ru").await;

    let response = app
        .send(session.post(REFRESH).without("x-csrftoken"))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.detail(), "CSRF Failed: CSRF token missing.");
}

#[tokio::test]
async fn test_refresh_with_mismatched_csrf_is_forbidden() {
    let app = TestApp::new().await;
    let session = app.registered_session("Yuri08", "yuri@mail.ru").await;

    let response = app
        .send(
            session
                .post(REFRESH)
                .without("x-csrftoken")
                .header("x-csrftoken", &"A".repeat(43)),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.detail(), "CSRF Failed: CSRF token incorrect.");
}

#[tokio::test]
async fn test_refresh_without_cookie_is_unauthorized() {
    let app = TestApp::new().await;
    let session = app.registered_session("Yuri08", "yuri@mail.ru").await;

    let response = app
        .send(session.post(REFRESH).without("refreshtoken"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.detail(),
        "Authentication credentials were not provided."
    );
}

#[tokio::test]
async fn test_refresh_with_garbage_cookie_is_unauthorized() {
    let app = TestApp::new().await;
    let session = app.registered_session("Yuri08", "yuri@mail.ru").await;

    let response = app
        .send(
            session
                .post(REFRESH)
                .without("refreshtoken")
                .cookie("refreshtoken", "not-a-jwt"),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_with_foreign_bearer_is_forbidden() {
    let app = TestApp::new().await;
    let yuri = app.registered_session("Yuri08", "yuri@mail.ru").await;
    let anna = app.registered_session("Anna", "anna@mail.ru").await;

    let response = app.send(yuri.post(REFRESH).bearer(&anna.access)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(
        response.detail(),
        "Access and refresh tokens belong to different users"
    );
}

#[tokio::test]
async fn test_logout_revokes_refresh_token() {
    let app = TestApp::new().await;
    let session = app.registered_session("Yuri08", "yuri@mail.ru").await;

    let response = app.send(session.post(LOGOUT)).await;
    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    assert_eq!(response.body["message"], "You have successfully logged out");

    let refresh = app.send(session.post(REFRESH)).await;
    assert_eq!(refresh.status, StatusCode::UNAUTHORIZED);
    assert_eq!(refresh.detail(), "Refresh token has been revoked");

    let again = app.send(session.post(LOGOUT)).await;
    assert_eq!(again.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_leaves_other_sessions() {
    let app = TestApp::new().await;
    let first = app.registered_session("Yuri08", "yuri@mail.ru").await;
    let second = app.login("Yuri08").await;

    assert_eq!(app.send(first.post(LOGOUT)).await.status, StatusCode::OK);
    assert_eq!(app.send(second.post(REFRESH)).await.status, StatusCode::OK);
}

#[tokio::test]
async fn test_bearer_without_prefix_is_unauthorized() {
    let app = TestApp::new().await;
    let session = app.registered_session("Yuri08", "yuri@mail.ru").await;

    let response = app
        .send(TestRequest::get(PROFILE_MAIL).header("authorization", &session.access))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.detail(), "Token prefix missing");
}

#[tokio::test]
async fn test_invalid_bearer_is_unauthorized() {
    let app = TestApp::new().await;

    let response = app
        .send(TestRequest::get(PROFILE_MAIL).bearer("not-a-jwt"))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.detail(), "Invalid access token");
}

#[tokio::test]
async fn test_refresh_token_is_not_an_access_token() {
    let app = TestApp::new().await;
    let session = app.registered_session("Yuri08", "yuri@mail.ru").await;

    let response = app
        .send(TestRequest::get(PROFILE_MAIL).bearer(&session.refresh))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_profile_mail_requires_authentication() {
    let app = TestApp::new().await;

    let response = app.send(TestRequest::get(PROFILE_MAIL)).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.detail(),
        "Authentication credentials were not provided."
    );
}

#[tokio::test]
async fn test_profile_mail_forbidden_for_non_admin() {
    let app = TestApp::new().await;
    let session = app.registered_session("Yuri08", "yuri@mail.ru").await;

    let response = app
        .send(TestRequest::get(PROFILE_MAIL).bearer(&session.access))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_profile_mail_lists_profiles_for_admin() {
    let app = TestApp::new().await;
    let session = app.registered_session("Yuri08", "yuri@mail.ru").await;
    let user = UserStore::find_by_username(app.store.as_ref(), "Yuri08")
        .await
        .unwrap()
        .unwrap();
    app.store.set_admin(user.id, true).await.unwrap();
    app.store
        .insert_mail_profile(MailProfile {
            id: Uuid::new_v4(),
            name: "primary".to_string(),
            is_active: true,
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "relay".to_string(),
            password: "relay-secret".to_string(),
            from_email: "noreply@example.com".to_string(),
            use_tls: true,
            use_ssl: false,
            timeout_seconds: 10,
            created_at: Utc::now(),
        })
        .await;

    let response = app
        .send(TestRequest::get(PROFILE_MAIL).bearer(&session.access))
        .await;

    assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    let profiles = response.body.as_array().expect("array");
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0]["host"], "smtp.example.com");
    assert!(profiles[0].get("password").is_none());
}

#[tokio::test]
async fn test_health_reports_memory_backends() {
    let app = TestApp::new().await;

    let response = app.send(TestRequest::get("/api/health")).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "ok");
    assert_eq!(response.body["database"], "memory");
}
