#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use finrecon360_api::auth::PasswordService;
use finrecon360_api::config::AppConfig;
use finrecon360_api::store::{InMemoryUserStore, StoreError, User, UserChange, UserStore};
use finrecon360_api::{app, AppState};

pub const ADMIN_EMAIL: &str = "admin@test.com";
pub const ADMIN_PASSWORD: &str = "Admin@123";
pub const USER_EMAIL: &str = "user@test.com";
pub const USER_PASSWORD: &str = "User@123";

// Spawned binary

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Cargo builds the server binary for integration tests and exposes its path
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_finrecon360-api"));
        cmd.env("FINRECON_API_PORT", port.to_string())
            .env("FINRECON_API_HOST", "127.0.0.1")
            .env("APP_ENV", "development")
            .env("SEED_DEMO_USERS", "true")
            .env("RECOVERY_DEMO_CODES", "true")
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == reqwest::StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}

// In-process router

/// Fresh router over a seeded store, using the development defaults.
pub fn test_app() -> Router {
    test_app_with(AppConfig::development())
}

pub fn test_app_with(config: AppConfig) -> Router {
    let state = AppState::from_config(config).expect("failed to build app state");
    app(state)
}

/// Router over the given store, using the development defaults.
pub fn test_app_with_store(store: Arc<dyn UserStore>) -> Router {
    app(AppState::with_store(AppConfig::development(), store))
}

// Interleaved writes

/// A write from some other request, applied between a handler's read and
/// its own write.
pub enum Interleaved {
    Deactivate,
    SetPhone(String),
    SetPasswordHash(String),
}

/// Seeded store that, once armed, applies one `Interleaved` write to the
/// user returned by the next lookup, right after the lookup completes.
pub struct InterleavingStore {
    pub inner: InMemoryUserStore,
    armed: Mutex<Option<Interleaved>>,
}

impl InterleavingStore {
    pub fn seeded() -> Arc<Self> {
        let inner = InMemoryUserStore::seeded(&PasswordService::new()).unwrap();
        Arc::new(Self {
            inner,
            armed: Mutex::new(None),
        })
    }

    pub fn arm(&self, write: Interleaved) {
        *self.armed.lock().unwrap() = Some(write);
    }

    async fn after_read(&self, user: Option<User>) -> Option<User> {
        let armed = self.armed.lock().unwrap().take();
        if let (Some(write), Some(found)) = (armed, user.as_ref()) {
            let id = found.id;
            match write {
                Interleaved::Deactivate => {
                    self.inner.soft_delete(id).await;
                }
                Interleaved::SetPhone(phone) => {
                    self.inner
                        .modify(id, Box::new(move |u| u.phone_number = Some(phone)))
                        .await
                        .unwrap();
                }
                Interleaved::SetPasswordHash(hash) => {
                    self.inner
                        .modify(id, Box::new(move |u| u.password_hash = hash))
                        .await
                        .unwrap();
                }
            }
        }
        user
    }
}

#[async_trait::async_trait]
impl UserStore for InterleavingStore {
    async fn get_by_email(&self, email: &str) -> Option<User> {
        let user = self.inner.get_by_email(email).await;
        self.after_read(user).await
    }

    async fn get_by_id(&self, id: Uuid) -> Option<User> {
        let user = self.inner.get_by_id(id).await;
        self.after_read(user).await
    }

    async fn get_all(&self) -> Vec<User> {
        self.inner.get_all().await
    }

    async fn count(&self) -> usize {
        self.inner.count().await
    }

    async fn insert(&self, user: User) -> Result<User, StoreError> {
        self.inner.insert(user).await
    }

    async fn insert_first_as(
        &self,
        user: User,
        first_role: finrecon360_api::rbac::Role,
    ) -> Result<User, StoreError> {
        self.inner.insert_first_as(user, first_role).await
    }

    async fn modify(&self, id: Uuid, change: UserChange) -> Result<User, StoreError> {
        self.inner.modify(id, change).await
    }

    async fn soft_delete(&self, id: Uuid) -> bool {
        self.inner.soft_delete(id).await
    }

    async fn restore(&self, id: Uuid) -> bool {
        self.inner.restore(id).await
    }
}

/// Send a JSON request through the router and decode the JSON reply.
/// Non-JSON bodies come back as a string value.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::GET, uri, token, None).await
}

pub async fn post(app: &Router, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, token, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, token, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, token, None).await
}

/// Log in and return the access token, panicking on failure.
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = post(
        app,
        "/api/auth/login",
        None,
        json!({ "email": email, "password": password }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed for {}: {}", email, body);
    body["accessToken"]
        .as_str()
        .expect("accessToken missing")
        .to_string()
}

pub async fn admin_token(app: &Router) -> String {
    login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

pub async fn user_token(app: &Router) -> String {
    login(app, USER_EMAIL, USER_PASSWORD).await
}
