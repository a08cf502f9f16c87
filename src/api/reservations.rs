use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware,
    response::Json,
    routing::get,
    Extension, Router,
};
use sqlx::PgPool;
use uuid::Uuid;

use super::error::ApiError;
use crate::auth::{jwt_auth_middleware, AuthService, UserSession};
use crate::models::{CreateReservationRequest, Reservation, UpdateReservationRequest};
use crate::services::ReservationService;

pub fn reservation_routes(db: PgPool, auth_service: AuthService) -> Router {
    let service = ReservationService::new(db);

    Router::new()
        .route("/", get(list_reservations).post(create_reservation))
        .route(
            "/:id",
            get(get_reservation)
                .put(update_reservation)
                .delete(delete_reservation),
        )
        .route_layer(middleware::from_fn_with_state(
            auth_service,
            jwt_auth_middleware,
        ))
        .with_state(service)
}

/// Create a reservation
#[tracing::instrument(skip(service, session, request))]
async fn create_reservation(
    State(service): State<ReservationService>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<CreateReservationRequest>,
) -> Result<(StatusCode, Json<Reservation>), ApiError> {
    let reservation = service.create_reservation(&session, request).await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

/// List reservations: own for plain users, all for staff/admin
#[tracing::instrument(skip(service, session))]
async fn list_reservations(
    State(service): State<ReservationService>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<Vec<Reservation>>, ApiError> {
    let reservations = if session.role.is_staff() {
        service.list_all().await?
    } else {
        service.list_for_user(session.user_id).await?
    };

    Ok(Json(reservations))
}

/// Get a single reservation; owner or staff/admin
#[tracing::instrument(skip(service, session))]
async fn get_reservation(
    State(service): State<ReservationService>,
    Extension(session): Extension<UserSession>,
    Path(reservation_id): Path<Uuid>,
) -> Result<Json<Reservation>, ApiError> {
    let reservation = service
        .get_reservation(reservation_id)
        .await?
        .ok_or(ApiError::NotFound("Reservation"))?;

    if !reservation.accessible_by(&session) {
        return Err(ApiError::Forbidden);
    }

    Ok(Json(reservation))
}

/// Update a reservation's status and/or interval
#[tracing::instrument(skip(service, session, request))]
async fn update_reservation(
    State(service): State<ReservationService>,
    Extension(session): Extension<UserSession>,
    Path(reservation_id): Path<Uuid>,
    Json(request): Json<UpdateReservationRequest>,
) -> Result<Json<Reservation>, ApiError> {
    let reservation = service
        .update_reservation(&session, reservation_id, request)
        .await?;

    Ok(Json(reservation))
}

/// Delete a reservation; owner or admin
#[tracing::instrument(skip(service, session))]
async fn delete_reservation(
    State(service): State<ReservationService>,
    Extension(session): Extension<UserSession>,
    Path(reservation_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    service
        .delete_reservation(&session, reservation_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
