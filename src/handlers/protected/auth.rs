// Authenticated user endpoints.

use axum::{extract::State, response::IntoResponse, Extension};

use crate::auth::token::Identity;
use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;
use crate::state::AppState;

/// GET /api/auth/me - return the authenticated user's profile
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<impl IntoResponse, ApiError> {
    let user = User::find_by_id(&state.pool, identity.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(user))
}
