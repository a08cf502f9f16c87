use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use super::error::ApiError;
use crate::auth::{admin_only_middleware, jwt_auth_middleware, AuthService};
use crate::models::{Car, CreateCarRequest, UpdateCarRequest};
use crate::services::CarService;

/// Car inventory routes. Browsing is open to guests; mutations are admin only.
pub fn car_routes(db: PgPool, auth_service: AuthService) -> Router {
    let service = CarService::new(db);

    let public = Router::new()
        .route("/", get(list_cars))
        .route("/:id", get(get_car));

    let admin = Router::new()
        .route("/", post(create_car))
        .route("/:id", put(update_car).delete(delete_car))
        .route_layer(middleware::from_fn(admin_only_middleware))
        .route_layer(middleware::from_fn_with_state(
            auth_service,
            jwt_auth_middleware,
        ));

    public.merge(admin).with_state(service)
}

#[derive(Debug, Deserialize)]
struct ListCarsQuery {
    available: Option<bool>,
}

/// List the car inventory
#[tracing::instrument(skip(service))]
async fn list_cars(
    State(service): State<CarService>,
    Query(query): Query<ListCarsQuery>,
) -> Result<Json<Vec<Car>>, ApiError> {
    let cars = service.list_cars(query.available.unwrap_or(false)).await?;
    Ok(Json(cars))
}

/// Get a single car
#[tracing::instrument(skip(service))]
async fn get_car(
    State(service): State<CarService>,
    Path(car_id): Path<Uuid>,
) -> Result<Json<Car>, ApiError> {
    let car = service
        .get_car(car_id)
        .await?
        .ok_or(ApiError::NotFound("Car"))?;

    Ok(Json(car))
}

/// Create a car (admin only)
#[tracing::instrument(skip(service, request))]
async fn create_car(
    State(service): State<CarService>,
    Json(request): Json<CreateCarRequest>,
) -> Result<(StatusCode, Json<Car>), ApiError> {
    let car = service.create_car(request).await?;
    Ok((StatusCode::CREATED, Json(car)))
}

/// Update a car (admin only)
#[tracing::instrument(skip(service, request))]
async fn update_car(
    State(service): State<CarService>,
    Path(car_id): Path<Uuid>,
    Json(request): Json<UpdateCarRequest>,
) -> Result<Json<Car>, ApiError> {
    let car = service
        .update_car(car_id, request)
        .await?
        .ok_or(ApiError::NotFound("Car"))?;

    Ok(Json(car))
}

/// Delete a car (admin only)
#[tracing::instrument(skip(service))]
async fn delete_car(
    State(service): State<CarService>,
    Path(car_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if !service.delete_car(car_id).await? {
        return Err(ApiError::NotFound("Car"));
    }

    Ok(StatusCode::NO_CONTENT)
}
