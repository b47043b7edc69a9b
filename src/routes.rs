use axum::{
    extract::State,
    http::HeaderValue,
    middleware::from_fn_with_state,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::SecurityConfig;
use crate::handlers;
use crate::middleware::{jwt_auth_middleware, validate_user_middleware};
use crate::state::AppState;

/// Full application router. Public so integration tests can drive it in-process.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.security);

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Protected (bearer token)
        .merge(dashboard_routes(&state))
        .merge(profile_routes(&state))
        .merge(admin_routes(&state))
        // Global middleware (outermost first)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/api/auth/login", post(auth::login_post))
        .route("/api/auth/register", post(auth::register_post))
        .route("/api/auth/forgot-password", post(auth::forgot_password_post))
        .route("/api/auth/verify-code", post(auth::verify_code_post))
}

fn dashboard_routes(state: &AppState) -> Router<AppState> {
    use handlers::protected::dashboard;

    Router::new()
        .route("/api/dashboard/summary", get(dashboard::summary_get))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn profile_routes(state: &AppState) -> Router<AppState> {
    use handlers::protected::profile;

    // Layers run bottom-up: the token is validated before the user is resolved.
    Router::new()
        .route(
            "/api/profile/me",
            get(profile::me_get)
                .put(profile::me_put)
                .delete(profile::me_delete),
        )
        .route(
            "/api/profile/me/change-password",
            post(profile::change_password_post),
        )
        .route_layer(from_fn_with_state(state.clone(), validate_user_middleware))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    use handlers::admin;

    Router::new()
        // User administration
        .route("/api/admin/users", get(admin::users_get))
        .route("/api/admin/users/:id/deactivate", post(admin::user_deactivate))
        .route("/api/admin/users/:id/reactivate", post(admin::user_reactivate))
        // Roles
        .route("/api/admin/roles", get(admin::roles_get).post(admin::role_post))
        .route("/api/admin/roles/:id", put(admin::role_put))
        .route("/api/admin/roles/:id/deactivate", post(admin::role_deactivate))
        .route("/api/admin/roles/:id/reactivate", post(admin::role_reactivate))
        // Components
        .route(
            "/api/admin/components",
            get(admin::components_get).post(admin::component_post),
        )
        .route("/api/admin/components/:id", put(admin::component_put))
        .route(
            "/api/admin/components/:id/deactivate",
            post(admin::component_deactivate),
        )
        .route(
            "/api/admin/components/:id/reactivate",
            post(admin::component_reactivate),
        )
        // Permission matrix
        .route("/api/admin/permissions/actions", get(admin::actions_get))
        .route(
            "/api/admin/permissions/matrix",
            get(admin::matrix_get).put(admin::matrix_put),
        )
        .route(
            "/api/admin/permissions/roles/:code",
            get(admin::role_permissions_get),
        )
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

/// Credentialed CORS for the configured origins. A `*` entry mirrors the
/// request origin, since a literal wildcard cannot be combined with credentials.
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origin = if security.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = security
            .cors_origins
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "FinRecon360 API",
        "version": version,
        "description": "Authentication, dashboard and profile backend for FinRecon360",
        "endpoints": {
            "home": "/ (public)",
            "health": "/health (public)",
            "auth": "/api/auth/login, /api/auth/register, /api/auth/forgot-password, /api/auth/verify-code (public)",
            "dashboard": "/api/dashboard/summary (protected)",
            "profile": "/api/profile/me[/change-password] (protected)",
            "admin": "/api/admin/users|roles|components|permissions (protected, admin permissions)",
        }
    }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now(),
        "users": state.store.count().await,
    }))
}
