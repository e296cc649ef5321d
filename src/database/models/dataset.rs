use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::auth::policy::Ownership;
use crate::database::manager::DatabaseError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Dataset {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i32,
    pub created_at: DateTime<Utc>,
}

/// Dataset row joined with its owner, returned by the admin-scoped listing.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DatasetWithOwner {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: i32,
    pub created_at: DateTime<Utc>,
    pub owner_username: String,
    pub owner_email: String,
}

impl Dataset {
    /// The point-in-time ownership fact the authorization decision consumes.
    pub fn ownership(&self) -> Ownership {
        Ownership {
            dataset_id: self.id,
            owner_id: self.owner_id,
        }
    }

    pub async fn insert(
        pool: &PgPool,
        name: &str,
        description: Option<&str>,
        owner_id: i32,
    ) -> Result<Dataset, DatabaseError> {
        let dataset = sqlx::query_as::<_, Dataset>(
            r#"
            INSERT INTO datasets (name, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, owner_id, created_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

        Ok(dataset)
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Dataset>, DatabaseError> {
        let dataset = sqlx::query_as::<_, Dataset>(
            "SELECT id, name, description, owner_id, created_at FROM datasets WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(dataset)
    }

    pub async fn list_by_owner(pool: &PgPool, owner_id: i32) -> Result<Vec<Dataset>, DatabaseError> {
        let datasets = sqlx::query_as::<_, Dataset>(
            "SELECT id, name, description, owner_id, created_at \
             FROM datasets WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(datasets)
    }

    pub async fn delete_by_id(pool: &PgPool, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM datasets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl DatasetWithOwner {
    /// Admin-scoped listing: every dataset, each row carrying its owner's
    /// identity.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<DatasetWithOwner>, DatabaseError> {
        let datasets = sqlx::query_as::<_, DatasetWithOwner>(
            r#"
            SELECT d.id, d.name, d.description, d.owner_id, d.created_at,
                   u.username AS owner_username, u.email AS owner_email
            FROM datasets d
            JOIN users u ON d.owner_id = u.id
            ORDER BY d.created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(datasets)
    }
}
