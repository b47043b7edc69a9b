mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
    assert!(body["users"].as_u64().unwrap_or(0) >= 2, "seeded users missing: {}", body);
    Ok(())
}

#[tokio::test]
async fn root_describes_service() -> Result<()> {
    let server = common::ensure_server().await?;
    let body = reqwest::get(format!("{}/", server.base_url))
        .await?
        .json::<Value>()
        .await?;

    assert_eq!(body["name"], "FinRecon360 API");
    assert!(body["endpoints"]["auth"].is_string());
    Ok(())
}

#[tokio::test]
async fn login_then_fetch_profile_over_http() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/auth/login", server.base_url))
        .json(&json!({ "email": common::USER_EMAIL, "password": common::USER_PASSWORD }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let login = res.json::<Value>().await?;
    let token = login["accessToken"].as_str().unwrap_or_default().to_string();
    assert!(!token.is_empty());

    let profile = client
        .get(format!("{}/api/profile/me", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(profile.status(), StatusCode::OK);
    let profile = profile.json::<Value>().await?;
    assert_eq!(profile["email"], common::USER_EMAIL);
    assert_eq!(profile["role"], "User");
    Ok(())
}

#[tokio::test]
async fn cors_preflight_allows_spa_origin() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .request(
            reqwest::Method::OPTIONS,
            format!("{}/api/dashboard/summary", server.base_url),
        )
        .header("Origin", "http://localhost:4200")
        .header("Access-Control-Request-Method", "GET")
        .header("Access-Control-Request-Headers", "authorization")
        .send()
        .await?;

    let headers = res.headers();
    assert_eq!(
        headers
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:4200")
    );
    assert_eq!(
        headers
            .get("access-control-allow-credentials")
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
    Ok(())
}
