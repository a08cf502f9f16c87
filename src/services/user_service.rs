use sqlx::PgPool;
use uuid::Uuid;

use crate::api::error::{conflict_on_unique, ApiError};
use crate::auth::password::is_valid_email;
use crate::auth::UserRole;
use crate::models::{UpdateProfileRequest, User, UserResponse};

#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

impl UserService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<UserResponse>, ApiError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user.map(UserResponse::from))
    }

    pub async fn list_users(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<UserResponse>, ApiError> {
        let limit = limit.unwrap_or(50).min(100);
        let offset = offset.unwrap_or(0);

        let users = sqlx::query_as::<_, User>(
            "SELECT * FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn update_profile(
        &self,
        user_id: Uuid,
        request: UpdateProfileRequest,
    ) -> Result<Option<UserResponse>, ApiError> {
        if let Some(ref email) = request.email {
            if !is_valid_email(email) {
                return Err(ApiError::Validation(format!(
                    "'{email}' is not a valid email address"
                )));
            }
        }

        let user = sqlx::query_as::<_, User>(
            "UPDATE users
             SET username = COALESCE($2, username),
                 email = COALESCE($3, email),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(user_id)
        .bind(request.username)
        .bind(request.email)
        .fetch_optional(&self.db)
        .await
        .map_err(|e| conflict_on_unique(e, "Username or email already taken"))?;

        Ok(user.map(UserResponse::from))
    }

    pub async fn update_role(
        &self,
        user_id: Uuid,
        role: UserRole,
    ) -> Result<Option<UserResponse>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(role)
        .fetch_optional(&self.db)
        .await?;

        Ok(user.map(UserResponse::from))
    }

    /// Assign (or clear, with `None`) the tariff plan of a user
    pub async fn assign_rate(
        &self,
        user_id: Uuid,
        rate_id: Option<Uuid>,
    ) -> Result<Option<UserResponse>, ApiError> {
        if let Some(rate_id) = rate_id {
            let exists = sqlx::query("SELECT 1 FROM rates WHERE id = $1")
                .bind(rate_id)
                .fetch_optional(&self.db)
                .await?;
            if exists.is_none() {
                return Err(ApiError::NotFound("Rate"));
            }
        }

        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET rate_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(rate_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user.map(UserResponse::from))
    }

    pub async fn set_license_image(
        &self,
        user_id: Uuid,
        path: &str,
    ) -> Result<Option<UserResponse>, ApiError> {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET license_image = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(user_id)
        .bind(path)
        .fetch_optional(&self.db)
        .await?;

        Ok(user.map(UserResponse::from))
    }

    pub async fn delete_user(&self, user_id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
