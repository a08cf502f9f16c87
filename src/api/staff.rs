use axum::{
    extract::{Path, State},
    middleware,
    response::Json,
    routing::{get, put},
    Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use super::error::ApiError;
use crate::auth::{jwt_auth_middleware, staff_or_admin_middleware, AuthService};
use crate::models::{Car, ReservationDetail, SetAvailabilityRequest};
use crate::services::{CarService, ReservationService};

#[derive(Clone)]
pub struct StaffAppState {
    pub cars: CarService,
    pub reservations: ReservationService,
}

/// Back-office routes (staff or admin)
pub fn staff_routes(db: PgPool, auth_service: AuthService) -> Router {
    let state = StaffAppState {
        cars: CarService::new(db.clone()),
        reservations: ReservationService::new(db),
    };

    Router::new()
        .route("/cars/:id/availability", put(set_car_availability))
        .route("/reservations", get(list_reservations_detailed))
        .route_layer(middleware::from_fn(staff_or_admin_middleware))
        .route_layer(middleware::from_fn_with_state(
            auth_service,
            jwt_auth_middleware,
        ))
        .with_state(state)
}

/// Toggle a car in or out of service
#[tracing::instrument(skip(state, request))]
async fn set_car_availability(
    State(state): State<StaffAppState>,
    Path(car_id): Path<Uuid>,
    Json(request): Json<SetAvailabilityRequest>,
) -> Result<Json<Car>, ApiError> {
    let car = state
        .cars
        .set_availability(car_id, request.is_available)
        .await?
        .ok_or(ApiError::NotFound("Car"))?;

    Ok(Json(car))
}

/// Full reservation overview with user and car context
#[tracing::instrument(skip(state))]
async fn list_reservations_detailed(
    State(state): State<StaffAppState>,
) -> Result<Json<Vec<ReservationDetail>>, ApiError> {
    let reservations = state.reservations.list_all_detailed().await?;
    Ok(Json(reservations))
}
