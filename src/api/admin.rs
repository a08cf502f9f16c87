use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, put},
    Router,
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::error::ApiError;
use crate::auth::{admin_only_middleware, jwt_auth_middleware, AuthService};
use crate::models::{AssignRateRequest, UpdateRoleRequest, UserResponse};
use crate::services::UserService;

/// User administration routes (admin only)
pub fn admin_routes(db: PgPool, auth_service: AuthService) -> Router {
    let service = UserService::new(db);

    Router::new()
        .route("/users", get(list_users))
        .route("/users/:id", get(get_user).delete(delete_user))
        .route("/users/:id/role", put(update_user_role))
        .route("/users/:id/rate", put(assign_user_rate))
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(
            auth_service,
            jwt_auth_middleware,
        ))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
struct ListUsersQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

/// List all users
#[tracing::instrument(skip(service))]
async fn list_users(
    State(service): State<UserService>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = service.list_users(query.limit, query.offset).await?;
    Ok(Json(users))
}

/// Get a single user
#[tracing::instrument(skip(service))]
async fn get_user(
    State(service): State<UserService>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = service
        .get_user(user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(user))
}

/// Update a user's role
#[tracing::instrument(skip(service, request))]
async fn update_user_role(
    State(service): State<UserService>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateRoleRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = service
        .update_role(user_id, request.role)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(user))
}

/// Assign or clear a user's tariff plan
#[tracing::instrument(skip(service, request))]
async fn assign_user_rate(
    State(service): State<UserService>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<AssignRateRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = service
        .assign_rate(user_id, request.rate_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(user))
}

/// Delete a user
#[tracing::instrument(skip(service))]
async fn delete_user(
    State(service): State<UserService>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !service.delete_user(user_id).await? {
        return Err(ApiError::NotFound("User"));
    }

    Ok(StatusCode::NO_CONTENT)
}
