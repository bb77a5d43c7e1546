//! Shared test helpers for integration tests.
//!
//! Every `TestApp` runs on the in-memory store, the moka cache, and a
//! recording notifier, so tests need no external services.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use tokio::sync::Mutex;
use tower::ServiceExt;
use uuid::Uuid;

use account_api::state::AppState;
use account_api::build_app;
use account_auth::csrf::CsrfGuard;
use account_auth::ledger::RevocationLedger;
use account_auth::password::PasswordHasher;
use account_auth::secret::EnrollmentSecretStore;
use account_auth::session::SessionManager;
use account_cache::memory::MemoryCacheProvider;
use account_cache::provider::CacheManager;
use account_core::config::AppConfig;
use account_core::result::AppResult;
use account_database::Stores;
use account_database::memory::MemoryStore;
use account_database::repositories::{AccountStore, UserStore};
use account_service::enrollment::EnrollmentService;
use account_service::notify::{MailDispatcher, MailMessage, Notifier};

/// Notifier that keeps every message it is handed.
#[derive(Debug, Default)]
pub struct Outbox {
    sent: Mutex<Vec<MailMessage>>,
}

#[async_trait]
impl Notifier for Outbox {
    fn name(&self) -> &'static str {
        "outbox"
    }

    async fn send(&self, message: &MailMessage) -> AppResult<()> {
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Direct handle to the in-memory tables
    pub store: Arc<MemoryStore>,
    /// Mail handed to the notifier
    pub outbox: Arc<Outbox>,
    /// Application config
    pub config: AppConfig,
}

/// Test configuration with valid secrets and memory backends.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.database.provider = "memory".to_string();
    config.cache.provider = "memory".to_string();
    config.auth.access_token_secret = "test-access-secret-0123456789abcdef".to_string();
    config.auth.refresh_token_secret = "test-refresh-secret-0123456789abcdef".to_string();
    config.enrollment.domain = "https://crm.example.com".to_string();
    config
}

impl TestApp {
    /// Create a new test application
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    /// Create a test application from a custom configuration
    pub async fn with_config(config: AppConfig) -> Self {
        config.validate().expect("test config must be valid");

        let store = Arc::new(MemoryStore::new());
        let stores = Stores::from_memory(Arc::clone(&store));
        let cache = Arc::new(CacheManager::from_provider(Arc::new(
            MemoryCacheProvider::new(&config.cache.memory),
        )));

        let password_hasher = Arc::new(PasswordHasher::new());
        let ledger = Arc::new(RevocationLedger::new(stores.revocations.clone()));
        let session_manager = Arc::new(SessionManager::new(
            config.auth.clone(),
            stores.users.clone(),
            stores.accounts.clone(),
            ledger,
            Arc::clone(&password_hasher),
        ));
        let secrets = Arc::new(EnrollmentSecretStore::new(
            Arc::clone(&cache),
            Duration::from_secs(config.enrollment.secret_ttl_hours * 3600),
        ));

        let outbox = Arc::new(Outbox::default());
        let (mailer, _worker) = MailDispatcher::start(
            outbox.clone(),
            config.notifier.queue_capacity,
            Duration::from_secs(5),
        );

        let enrollment_service = Arc::new(EnrollmentService::new(
            &stores,
            secrets,
            password_hasher,
            Arc::clone(&session_manager),
            mailer,
            config.enrollment.clone(),
        ));

        let app_state = AppState {
            config: Arc::new(config.clone()),
            db_pool: None,
            cache,
            stores,
            session_manager,
            csrf: Arc::new(CsrfGuard::new(&config.csrf)),
            enrollment_service,
        };

        Self {
            router: build_app(app_state),
            store,
            outbox,
            config,
        }
    }

    /// Send a request through the router
    pub async fn send(&self, request: TestRequest) -> TestResponse {
        let mut req = Request::builder()
            .method(request.method)
            .uri(&request.path)
            .header(CONTENT_TYPE, "application/json");

        if let Some(token) = &request.bearer {
            req = req.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        if !request.cookies.is_empty() {
            let cookie = request
                .cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; ");
            req = req.header(COOKIE, cookie);
        }
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }

        let body = request
            .body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        let req = req.body(Body::from(body)).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let set_cookies = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect::<Vec<_>>();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");
        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            body,
            set_cookies,
        }
    }

    /// Register a user through the API
    pub async fn register(&self, username: &str, email: &str) -> TestResponse {
        self.send(TestRequest::post("/api/user/registration/").json(serde_json::json!({
            "username": username,
            "email": email,
        })))
        .await
    }

    /// Enrollment token of a registered user
    pub async fn enrollment_token(&self, username: &str) -> Uuid {
        let user = UserStore::find_by_username(self.store.as_ref(), username)
            .await
            .expect("user lookup")
            .expect("user exists");
        AccountStore::find_by_user_id(self.store.as_ref(), user.id)
            .await
            .expect("account lookup")
            .expect("account exists")
            .enrollment_token
    }

    /// One-time password from the enrollment mail sent to `email`.
    ///
    /// Waits briefly for the background mail worker.
    pub async fn mailed_password(&self, email: &str) -> String {
        const MARKER: &str = "One-time password: ";

        for _ in 0..50 {
            {
                let sent = self.outbox.sent.lock().await;
                let latest = sent
                    .iter()
                    .rev()
                    .find(|m| m.to.iter().any(|to| to == email));
                if let Some(message) = latest {
                    let start = message.body.find(MARKER).expect("password in mail") + MARKER.len();
                    let rest = &message.body[start..];
                    let end = rest.find('<').unwrap_or(rest.len());
                    return rest[..end].to_string();
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("no enrollment mail for {email}");
    }

    /// Number of messages handed to the notifier
    pub async fn mail_count(&self) -> usize {
        self.outbox.sent.lock().await.len()
    }

    /// Bodies of all delivered messages, oldest first
    pub async fn outbox_bodies(&self) -> Vec<String> {
        self.outbox
            .sent
            .lock()
            .await
            .iter()
            .map(|m| m.body.clone())
            .collect()
    }

    /// Register then log in, returning the session material
    pub async fn registered_session(&self, username: &str, email: &str) -> TestSession {
        let response = self.register(username, email).await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        self.login(username).await
    }

    /// Log in and return the session material
    pub async fn login(&self, username: &str) -> TestSession {
        let response = self
            .send(TestRequest::post("/api/user/login/token/").json(serde_json::json!({
                "username": username,
            })))
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);

        TestSession {
            access: response.body["access_token"]
                .as_str()
                .expect("access_token")
                .to_string(),
            refresh: response.cookie("refreshtoken").expect("refresh cookie"),
            csrf: response.cookie("csrftoken").expect("csrf cookie"),
        }
    }
}

/// Tokens returned by a login
#[derive(Debug, Clone)]
pub struct TestSession {
    /// Bearer access token
    pub access: String,
    /// Refresh cookie value
    pub refresh: String,
    /// CSRF cookie value
    pub csrf: String,
}

impl TestSession {
    /// A POST carrying the refresh cookie and a matching CSRF pair
    pub fn post(&self, path: &str) -> TestRequest {
        TestRequest::post(path)
            .cookie("refreshtoken", &self.refresh)
            .cookie("csrftoken", &self.csrf)
            .header("x-csrftoken", &self.csrf)
    }
}

/// Request under construction
#[derive(Debug, Clone)]
pub struct TestRequest {
    method: Method,
    path: String,
    body: Option<Value>,
    bearer: Option<String>,
    cookies: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl TestRequest {
    fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            body: None,
            bearer: None,
            cookies: Vec::new(),
            headers: Vec::new(),
        }
    }

    /// GET request
    pub fn get(path: &str) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST request
    pub fn post(path: &str) -> Self {
        Self::new(Method::POST, path)
    }

    /// Set a JSON body
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Authenticate with a bearer token
    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    /// Add a cookie
    pub fn cookie(mut self, name: &str, value: &str) -> Self {
        self.cookies.push((name.to_string(), value.to_string()));
        self
    }

    /// Add a header
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Drop all cookies and headers named `name`
    pub fn without(mut self, name: &str) -> Self {
        self.cookies.retain(|(n, _)| n != name);
        self.headers.retain(|(n, _)| n != name);
        self
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
    /// Raw `Set-Cookie` header values
    pub set_cookies: Vec<String>,
}

impl TestResponse {
    /// Value of a cookie set by the response
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.cookie_attributes(name).map(|attrs| attrs["value"].clone())
    }

    /// Cookie value and lowercase attributes (`httponly`, `path`, ...)
    pub fn cookie_attributes(&self, name: &str) -> Option<HashMap<String, String>> {
        self.set_cookies.iter().find_map(|raw| {
            let mut parts = raw.split(';').map(str::trim);
            let (cookie_name, value) = parts.next()?.split_once('=')?;
            if cookie_name != name {
                return None;
            }

            let mut attrs = HashMap::from([("value".to_string(), value.to_string())]);
            for attr in parts {
                let (key, val) = attr.split_once('=').unwrap_or((attr, ""));
                attrs.insert(key.to_ascii_lowercase(), val.to_string());
            }
            Some(attrs)
        })
    }

    /// The `detail` field of an error body
    pub fn detail(&self) -> &str {
        self.body["detail"].as_str().unwrap_or_default()
    }
}
