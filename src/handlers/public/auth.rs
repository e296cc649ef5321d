// Public authentication endpoints: registration and login.

use axum::{
    extract::State,
    http::{header, HeaderName},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::Role;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    /// Defaults to `user`; any value outside the closed role set is
    /// rejected during deserialization.
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

fn validate_register(req: &RegisterRequest) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();

    if !req.email.contains('@') || req.email.len() > 255 {
        field_errors.insert("email".to_string(), "Invalid email address".to_string());
    }
    if req.username.len() < 3 || req.username.len() > 50 {
        field_errors.insert(
            "username".to_string(),
            "Username must be between 3 and 50 characters".to_string(),
        );
    }
    if req.password.len() < 6 {
        field_errors.insert(
            "password".to_string(),
            "Password must be at least 6 characters".to_string(),
        );
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error(
            "Invalid registration data",
            Some(field_errors),
        ))
    }
}

/// POST /auth/register - create a new user account
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_register(&payload)?;

    if User::find_by_email(&state.pool, &payload.email)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict("Email already registered"));
    }
    if User::find_by_username(&state.pool, &payload.username)
        .await?
        .is_some()
    {
        return Err(ApiError::conflict("Username already taken"));
    }

    let password_hash = hash_password(&payload.password)?;
    let role = payload.role.unwrap_or(Role::User);
    let user = User::insert(
        &state.pool,
        &payload.email,
        &payload.username,
        &password_hash,
        role,
    )
    .await?;

    tracing::info!("User registered: {}", user.email);
    Ok(ApiResponse::created(user))
}

/// Headers preventing token responses from being cached anywhere along
/// the path, including legacy HTTP/1.0 intermediaries.
fn no_store_headers() -> [(HeaderName, &'static str); 3] {
    [
        (
            header::CACHE_CONTROL,
            "no-store, no-cache, must-revalidate, max-age=0",
        ),
        (header::PRAGMA, "no-cache"),
        (header::EXPIRES, "0"),
    ]
}

/// POST /auth/login - authenticate and receive an access token
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = User::find_by_email(&state.pool, &payload.email).await?;

    // Unknown email and wrong password answer identically.
    let user = match user {
        Some(u) if verify_password(&u.password_hash, &payload.password) => u,
        _ => return Err(ApiError::unauthorized("Invalid email or password")),
    };

    let access_token = state.verifier.issue(user.id, user.role)?;

    tracing::info!("User logged in: {}", user.email);
    Ok((
        no_store_headers(),
        ApiResponse::success(TokenResponse {
            access_token,
            token_type: "bearer",
        }),
    ))
}
