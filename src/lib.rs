pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    extract::State,
    middleware as axum_middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Assemble the full application router around shared state.
pub fn app(state: AppState) -> Router {
    use handlers::{protected, public};

    let protected_routes = Router::new()
        .route("/api/auth/me", get(protected::auth::me))
        .route(
            "/api/datasets",
            post(protected::datasets::create).get(protected::datasets::list),
        )
        .route(
            "/api/datasets/:id",
            get(protected::datasets::show).delete(protected::datasets::destroy),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::jwt_auth,
        ));

    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Public auth routes (token acquisition)
        .route("/auth/register", post(public::auth::register))
        .route("/auth/login", post(public::auth::login))
        // Protected API
        .merge(protected_routes)
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Dataset Platform API",
            "version": version,
            "description": "Multi-user dataset management backend with JWT authentication and role-based access control",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/auth/register, /auth/login (public - token acquisition)",
                "me": "/api/auth/me (protected)",
                "datasets": "/api/datasets[/:id] (protected)"
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match database::manager::health_check(&state.pool).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
