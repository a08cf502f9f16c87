use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use super::error::ApiError;
use crate::auth::{admin_only_middleware, jwt_auth_middleware, AuthService};
use crate::models::{CreateRateRequest, Rate, UpdateRateRequest};
use crate::services::RateService;

/// Tariff routes. Reading requires authentication; mutations are admin only.
pub fn rate_routes(db: PgPool, auth_service: AuthService) -> Router {
    let service = RateService::new(db);

    let authed = Router::new()
        .route("/", get(list_rates))
        .route("/:id", get(get_rate))
        .route_layer(middleware::from_fn_with_state(
            auth_service.clone(),
            jwt_auth_middleware,
        ));

    let admin = Router::new()
        .route("/", post(create_rate))
        .route("/:id", put(update_rate).delete(delete_rate))
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(
            auth_service,
            jwt_auth_middleware,
        ));

    authed.merge(admin).with_state(service)
}

/// List all tariff plans
#[tracing::instrument(skip(service))]
async fn list_rates(State(service): State<RateService>) -> Result<Json<Vec<Rate>>, ApiError> {
    let rates = service.list_rates().await?;
    Ok(Json(rates))
}

/// Get a single tariff plan
#[tracing::instrument(skip(service))]
async fn get_rate(
    State(service): State<RateService>,
    Path(rate_id): Path<Uuid>,
) -> Result<Json<Rate>, ApiError> {
    let rate = service
        .get_rate(rate_id)
        .await?
        .ok_or(ApiError::NotFound("Rate"))?;

    Ok(Json(rate))
}

/// Create a tariff plan (admin only)
#[tracing::instrument(skip(service, request))]
async fn create_rate(
    State(service): State<RateService>,
    Json(request): Json<CreateRateRequest>,
) -> Result<(StatusCode, Json<Rate>), ApiError> {
    let rate = service.create_rate(request).await?;
    Ok((StatusCode::CREATED, Json(rate)))
}

/// Update a tariff plan (admin only)
#[tracing::instrument(skip(service, request))]
async fn update_rate(
    State(service): State<RateService>,
    Path(rate_id): Path<Uuid>,
    Json(request): Json<UpdateRateRequest>,
) -> Result<Json<Rate>, ApiError> {
    let rate = service
        .update_rate(rate_id, request)
        .await?
        .ok_or(ApiError::NotFound("Rate"))?;

    Ok(Json(rate))
}

/// Delete a tariff plan (admin only)
#[tracing::instrument(skip(service))]
async fn delete_rate(
    State(service): State<RateService>,
    Path(rate_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !service.delete_rate(rate_id).await? {
        return Err(ApiError::NotFound("Rate"));
    }

    Ok(StatusCode::NO_CONTENT)
}
