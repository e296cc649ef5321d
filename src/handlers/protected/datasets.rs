// Dataset CRUD endpoints. Every operation consults the authorization
// policy before touching data; the policy itself stays pure.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Deserialize;
use std::collections::HashMap;

use crate::auth::policy::{authorize, Action, Decision, Scope};
use crate::auth::token::Identity;
use crate::database::models::{Dataset, DatasetWithOwner};
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DatasetCreateRequest {
    pub name: String,
    pub description: Option<String>,
}

/// POST /api/datasets - create a dataset owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<DatasetCreateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.name.is_empty() || payload.name.len() > 255 {
        let mut field_errors = HashMap::new();
        field_errors.insert(
            "name".to_string(),
            "Name must be between 1 and 255 characters".to_string(),
        );
        return Err(ApiError::validation_error(
            "Invalid dataset data",
            Some(field_errors),
        ));
    }

    if !authorize(&identity, Action::CreateDataset, None).is_allowed() {
        return Err(ApiError::forbidden("Access denied"));
    }

    let dataset = Dataset::insert(
        &state.pool,
        &payload.name,
        payload.description.as_deref(),
        identity.user_id,
    )
    .await?;

    tracing::info!(
        "Dataset {} created by user {}",
        dataset.id,
        identity.user_id
    );
    Ok(ApiResponse::created(dataset))
}

/// GET /api/datasets - list datasets visible to the caller
///
/// Users see their own datasets; admins see every dataset with owner
/// identity attached per item.
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response, ApiError> {
    match authorize(&identity, Action::ListDatasets, None) {
        Decision::Allow {
            scope: Some(Scope::All),
        } => {
            let datasets = DatasetWithOwner::list_all(&state.pool).await?;
            Ok(ApiResponse::success(datasets).into_response())
        }
        Decision::Allow {
            scope: Some(Scope::Own),
        } => {
            let datasets = Dataset::list_by_owner(&state.pool, identity.user_id).await?;
            Ok(ApiResponse::success(datasets).into_response())
        }
        _ => Err(ApiError::forbidden("Access denied")),
    }
}

/// The response for a dataset that does not exist. Denied item-level
/// access reuses this verbatim so the two cases are indistinguishable.
fn dataset_not_found() -> ApiError {
    ApiError::not_found("Dataset not found")
}

/// Gate an item-level action on one dataset. A `Deny` answers exactly
/// like a missing row, never 403, so responses cannot be used to probe
/// which dataset ids exist.
fn check_item_access(
    identity: &Identity,
    action: Action,
    dataset: &Dataset,
) -> Result<(), ApiError> {
    if authorize(identity, action, Some(&dataset.ownership())).is_allowed() {
        Ok(())
    } else {
        Err(dataset_not_found())
    }
}

/// GET /api/datasets/:id - fetch a single dataset
pub async fn show(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let dataset = Dataset::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(dataset_not_found)?;

    check_item_access(&identity, Action::GetDataset, &dataset)?;

    Ok(ApiResponse::success(dataset))
}

/// DELETE /api/datasets/:id - delete a dataset (owner only, all roles)
pub async fn destroy(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let dataset = Dataset::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(dataset_not_found)?;

    check_item_access(&identity, Action::DeleteDataset, &dataset)?;

    if !Dataset::delete_by_id(&state.pool, dataset.id).await? {
        // Row vanished between the ownership read and the delete.
        return Err(dataset_not_found());
    }

    tracing::info!(
        "Dataset {} deleted by user {}",
        dataset.id,
        identity.user_id
    );
    Ok(ApiResponse::<()>::no_content())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::Role;
    use chrono::Utc;

    fn user(id: i32) -> Identity {
        Identity {
            user_id: id,
            role: Role::User,
        }
    }

    fn admin(id: i32) -> Identity {
        Identity {
            user_id: id,
            role: Role::Admin,
        }
    }

    fn dataset_owned_by(owner_id: i32) -> Dataset {
        Dataset {
            id: 1,
            name: "Customer Analysis Dataset".to_string(),
            description: None,
            owner_id,
            created_at: Utc::now(),
        }
    }

    fn assert_answers_like_missing(err: ApiError) {
        // Same status and body as a dataset that does not exist.
        let missing = dataset_not_found();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.status_code(), missing.status_code());
        assert_eq!(err.message(), missing.message());
        assert_eq!(err.to_json(), missing.to_json());
    }

    #[test]
    fn owner_passes_item_access_checks() {
        let dataset = dataset_owned_by(5);
        assert!(check_item_access(&user(5), Action::GetDataset, &dataset).is_ok());
        assert!(check_item_access(&user(5), Action::DeleteDataset, &dataset).is_ok());
    }

    #[test]
    fn foreign_read_answers_like_a_missing_dataset() {
        let dataset = dataset_owned_by(9);
        let err = check_item_access(&user(5), Action::GetDataset, &dataset).unwrap_err();
        assert_answers_like_missing(err);
    }

    #[test]
    fn foreign_delete_answers_like_a_missing_dataset() {
        let dataset = dataset_owned_by(9);
        let err = check_item_access(&user(5), Action::DeleteDataset, &dataset).unwrap_err();
        assert_answers_like_missing(err);
    }

    #[test]
    fn admin_reads_any_dataset_but_deletes_only_its_own() {
        let dataset = dataset_owned_by(9);
        assert!(check_item_access(&admin(1), Action::GetDataset, &dataset).is_ok());

        let err = check_item_access(&admin(1), Action::DeleteDataset, &dataset).unwrap_err();
        assert_answers_like_missing(err);
    }
}
