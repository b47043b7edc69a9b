mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{
    get, login, post, test_app, test_app_with, test_app_with_store, Interleaved,
    InterleavingStore, ADMIN_EMAIL, USER_EMAIL, USER_PASSWORD,
};
use finrecon360_api::config::AppConfig;
use finrecon360_api::store::UserStore;

#[tokio::test]
async fn login_returns_token_and_user() {
    let app = test_app();
    let (status, body) = post(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": USER_EMAIL, "password": USER_PASSWORD }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["accessToken"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["expiresIn"], 3600);
    assert_eq!(body["user"]["email"], USER_EMAIL);
    assert_eq!(body["user"]["fullName"], "Finance User");
    assert_eq!(body["user"]["role"], "User");
    assert!(body["user"]["permissions"]
        .as_array()
        .unwrap()
        .contains(&json!("ACCOUNT.DELETE")));
}

#[tokio::test]
async fn login_email_is_case_insensitive() {
    let app = test_app();
    let token = login(&app, "ADMIN@Test.com", "Admin@123").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn bad_credentials_share_one_message() {
    let app = test_app();

    for payload in [
        json!({ "email": USER_EMAIL, "password": "wrong" }),
        json!({ "email": "nobody@test.com", "password": USER_PASSWORD }),
        json!({ "email": "", "password": "" }),
    ] {
        let (status, body) = post(&app, "/api/auth/login", None, payload).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid email or password.");
    }
}

#[tokio::test]
async fn deleted_user_cannot_log_in() {
    let app = test_app();
    let token = login(&app, USER_EMAIL, USER_PASSWORD).await;
    let (status, _) = common::delete(&app, "/api/profile/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": USER_EMAIL, "password": USER_PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password.");
}

fn registration(email: &str) -> serde_json::Value {
    json!({
        "email": email,
        "firstName": " Jane ",
        "lastName": "Doe",
        "country": "LK",
        "gender": "F",
        "password": "Secret@123",
        "confirmPassword": "Secret@123"
    })
}

#[tokio::test]
async fn register_then_login_as_user() {
    let app = test_app();
    let (status, body) = post(&app, "/api/auth/register", None, registration("jane@corp.com")).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "User registered successfully.");

    let (status, body) = post(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": "jane@corp.com", "password": "Secret@123" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "User");
    assert_eq!(body["user"]["fullName"], "Jane Doe");
}

#[tokio::test]
async fn first_registration_in_empty_store_becomes_admin() {
    let mut config = AppConfig::development();
    config.seed.demo_users = false;
    let app = test_app_with(config);

    let (status, _) = post(&app, "/api/auth/register", None, registration("first@corp.com")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = post(&app, "/api/auth/register", None, registration("second@corp.com")).await;
    assert_eq!(status, StatusCode::OK);

    let (_, first) = post(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": "first@corp.com", "password": "Secret@123" }),
    )
    .await;
    assert_eq!(first["user"]["role"], "Admin");

    let (_, second) = post(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": "second@corp.com", "password": "Secret@123" }),
    )
    .await;
    assert_eq!(second["user"]["role"], "User");
}

#[tokio::test]
async fn register_rejects_duplicates_and_mismatches() {
    let app = test_app();

    let (status, body) = post(&app, "/api/auth/register", None, registration(ADMIN_EMAIL)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already registered.");

    let mut mismatch = registration("new@corp.com");
    mismatch["confirmPassword"] = json!("Different@1");
    let (status, body) = post(&app, "/api/auth/register", None, mismatch).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Passwords do not match.");

    let (status, body) = post(&app, "/api/auth/register", None, registration("not-an-email")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    for password in ["", "   "] {
        let mut blank = registration("blank@corp.com");
        blank["password"] = json!(password);
        blank["confirmPassword"] = json!(password);
        let (status, body) = post(&app, "/api/auth/register", None, blank).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{:?}", password);
        assert_eq!(body["fieldErrors"]["password"], "Password is required.");
    }
    let (status, _) = post(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": "blank@corp.com", "password": "   " }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_registrations_promote_one_admin() {
    for round in 0..5 {
        let mut config = AppConfig::development();
        config.seed.demo_users = false;
        let app = test_app_with(config);

        let emails: Vec<String> = (0..4).map(|i| format!("racer{}-{}@corp.com", round, i)).collect();
        let handles: Vec<_> = emails
            .iter()
            .map(|email| {
                let app = app.clone();
                let payload = registration(email);
                tokio::spawn(async move { post(&app, "/api/auth/register", None, payload).await })
            })
            .collect();
        for handle in handles {
            let (status, body) = handle.await.unwrap();
            assert_eq!(status, StatusCode::OK, "{}", body);
        }

        let mut admins = 0;
        for email in &emails {
            let (_, body) = post(
                &app,
                "/api/auth/login",
                None,
                json!({ "email": email, "password": "Secret@123" }),
            )
            .await;
            if body["user"]["role"] == "Admin" {
                admins += 1;
            }
        }
        assert_eq!(admins, 1, "round {}", round);
    }
}

#[tokio::test]
async fn recovery_code_flow_in_demo_mode() {
    let app = test_app();

    let (status, body) = post(
        &app,
        "/api/auth/forgot-password",
        None,
        json!({ "email": "ghost@test.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "If that email exists, a code was sent.");

    let (status, body) = post(
        &app,
        "/api/auth/forgot-password",
        None,
        json!({ "email": USER_EMAIL }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Verification code sent (demo: 123456).");

    let (status, body) = post(
        &app,
        "/api/auth/verify-code",
        None,
        json!({ "email": USER_EMAIL, "code": "000000" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or expired verification code.");

    let (status, body) = post(
        &app,
        "/api/auth/verify-code",
        None,
        json!({ "email": USER_EMAIL, "code": "123456" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Code verified successfully.");

    // Consumed codes cannot be replayed
    let (status, _) = post(
        &app,
        "/api/auth/verify-code",
        None,
        json!({ "email": USER_EMAIL, "code": "123456" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn expired_recovery_code_is_rejected() {
    let mut config = AppConfig::development();
    config.recovery.code_ttl_minutes = -1;
    let app = test_app_with(config);

    let (status, _) = post(
        &app,
        "/api/auth/forgot-password",
        None,
        json!({ "email": USER_EMAIL }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = post(
        &app,
        "/api/auth/verify-code",
        None,
        json!({ "email": USER_EMAIL, "code": "123456" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid or expired verification code.");
}

#[tokio::test]
async fn recovery_request_racing_deactivation_keeps_user_deactivated() {
    let store = InterleavingStore::seeded();
    let app = test_app_with_store(store.clone());

    // The admin deactivates the account right after the handler's lookup.
    store.arm(Interleaved::Deactivate);
    let (status, body) = post(
        &app,
        "/api/auth/forgot-password",
        None,
        json!({ "email": USER_EMAIL }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "If that email exists, a code was sent.");

    let stored = store.inner.get_by_email(USER_EMAIL).await.unwrap();
    assert!(stored.is_deleted);
    assert!(stored.verification_code.is_none());

    let (status, _) = post(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": USER_EMAIL, "password": USER_PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn recovery_request_keeps_a_password_changed_meanwhile() {
    let store = InterleavingStore::seeded();
    let app = test_app_with_store(store.clone());
    let new_hash = finrecon360_api::auth::PasswordService::new()
        .hash("Changed@789")
        .unwrap();

    store.arm(Interleaved::SetPasswordHash(new_hash));
    let (status, _) = post(
        &app,
        "/api/auth/forgot-password",
        None,
        json!({ "email": USER_EMAIL }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    login(&app, USER_EMAIL, "Changed@789").await;
    let stored = store.inner.get_by_email(USER_EMAIL).await.unwrap();
    assert_eq!(stored.verification_code.as_deref(), Some("123456"));
}

#[tokio::test]
async fn non_demo_recovery_hides_the_code() {
    let mut config = AppConfig::development();
    config.recovery.demo_codes = false;
    let app = test_app_with(config);

    let (status, body) = post(
        &app,
        "/api/auth/forgot-password",
        None,
        json!({ "email": USER_EMAIL }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "If that email exists, a code was sent.");
}

#[tokio::test]
async fn health_reports_user_count() {
    let app = test_app();
    let (status, body) = get(&app, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["users"], 2);
}
