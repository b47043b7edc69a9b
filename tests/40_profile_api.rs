mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{
    admin_token, delete, get, login, post, put, test_app, test_app_with_store, user_token,
    Interleaved, InterleavingStore, ADMIN_EMAIL, USER_EMAIL, USER_PASSWORD,
};
use finrecon360_api::auth::PasswordService;
use finrecon360_api::store::UserStore;

const ME: &str = "/api/profile/me";
const CHANGE_PASSWORD: &str = "/api/profile/me/change-password";

#[tokio::test]
async fn get_profile_for_current_user() {
    let app = test_app();
    let token = admin_token(&app).await;

    let (status, body) = get(&app, ME, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], ADMIN_EMAIL);
    assert_eq!(body["fullName"], "System Admin");
    assert_eq!(body["role"], "Admin");
    assert!(body["phoneNumber"].is_null());
    assert!(body["id"].is_string());
}

#[tokio::test]
async fn profile_requires_token() {
    let app = test_app();
    let (status, _) = get(&app, ME, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_updates_name_and_phone() {
    let app = test_app();
    let token = user_token(&app).await;

    let (status, body) = put(
        &app,
        ME,
        Some(&token),
        json!({ "fullName": "  Renamed User ", "phoneNumber": " +94 77 123 4567 " }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fullName"], "Renamed User");
    assert_eq!(body["phoneNumber"], "+94 77 123 4567");

    // Blank names are ignored
    let (status, body) = put(&app, ME, Some(&token), json!({ "fullName": "   " })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fullName"], "Renamed User");
    assert_eq!(body["phoneNumber"], "+94 77 123 4567");
}

#[tokio::test]
async fn admin_phone_update_is_refused_without_side_effects() {
    let app = test_app();
    let token = admin_token(&app).await;

    let (status, body) = put(
        &app,
        ME,
        Some(&token),
        json!({ "fullName": "Should Not Stick", "phoneNumber": "+1 555 0100" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "Admins cannot update phone numbers via this endpoint."
    );

    let (_, profile) = get(&app, ME, Some(&token)).await;
    assert_eq!(profile["fullName"], "System Admin");
    assert!(profile["phoneNumber"].is_null());

    // Name-only updates are fine for admins
    let (status, body) = put(&app, ME, Some(&token), json!({ "fullName": "Chief Admin" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fullName"], "Chief Admin");
}

#[tokio::test]
async fn change_password_validation() {
    let app = test_app();
    let token = user_token(&app).await;

    let cases = [
        (json!({ "currentPassword": "", "newPassword": "x" }), "Current password is required."),
        (json!({ "currentPassword": USER_PASSWORD, "newPassword": " " }), "New password is required."),
        (json!({ "currentPassword": "wrong", "newPassword": "New@123" }), "Current password is incorrect."),
    ];
    for (payload, message) in cases {
        let (status, body) = post(&app, CHANGE_PASSWORD, Some(&token), payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], message);
    }
}

#[tokio::test]
async fn change_password_then_login_with_new_one() {
    let app = test_app();
    let token = user_token(&app).await;

    let (status, body) = post(
        &app,
        CHANGE_PASSWORD,
        Some(&token),
        json!({ "currentPassword": USER_PASSWORD, "newPassword": "Fresh@456" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Password updated successfully.");

    let (status, _) = post(
        &app,
        "/api/auth/login",
        None,
        json!({ "email": USER_EMAIL, "password": USER_PASSWORD }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    login(&app, USER_EMAIL, "Fresh@456").await;
}

#[tokio::test]
async fn admins_cannot_change_password_or_delete_here() {
    let app = test_app();
    let token = admin_token(&app).await;

    let (status, body) = post(
        &app,
        CHANGE_PASSWORD,
        Some(&token),
        json!({ "currentPassword": "Admin@123", "newPassword": "Other@123" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "Only non-admin users may change their password here."
    );

    let (status, body) = delete(&app, ME, Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Only non-admin users may delete their account.");
}

#[tokio::test]
async fn deleted_account_token_stops_working() {
    let app = test_app();
    let token = user_token(&app).await;

    let (status, body) = delete(&app, ME, Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Account deleted.");

    // The token is still cryptographically valid, but the user is gone.
    let (status, _) = get(&app, ME, Some(&token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn password_change_keeps_a_concurrent_profile_edit() {
    let store = InterleavingStore::seeded();
    let app = test_app_with_store(store.clone());
    let token = user_token(&app).await;

    // Another request sets the phone after user validation read the record.
    store.arm(Interleaved::SetPhone("+94 11 222 3333".to_string()));
    let (status, _) = post(
        &app,
        CHANGE_PASSWORD,
        Some(&token),
        json!({ "currentPassword": USER_PASSWORD, "newPassword": "Fresh@456" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let stored = store.inner.get_by_email(USER_EMAIL).await.unwrap();
    assert_eq!(stored.phone_number.as_deref(), Some("+94 11 222 3333"));
    login(&app, USER_EMAIL, "Fresh@456").await;
}

#[tokio::test]
async fn profile_edit_does_not_roll_back_a_password_change() {
    let store = InterleavingStore::seeded();
    let app = test_app_with_store(store.clone());
    let token = user_token(&app).await;

    let new_hash = PasswordService::new().hash("Moved@789").unwrap();
    store.arm(Interleaved::SetPasswordHash(new_hash));
    let (status, body) = put(&app, ME, Some(&token), json!({ "fullName": "Late Writer" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fullName"], "Late Writer");

    login(&app, USER_EMAIL, "Moved@789").await;
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
async fn profile_edit_racing_deactivation_is_refused() {
    let store = InterleavingStore::seeded();
    let app = test_app_with_store(store.clone());
    let token = user_token(&app).await;

    store.arm(Interleaved::Deactivate);
    let (status, _) = put(&app, ME, Some(&token), json!({ "fullName": "Ghost" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let stored = store.inner.get_by_email(USER_EMAIL).await.unwrap();
    assert!(stored.is_deleted);
    assert_eq!(stored.full_name, "Finance User");
}
