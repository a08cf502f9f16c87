use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::auth::UserSession;
use crate::models::{
    compute_total_cost, Car, CreateReservationRequest, Reservation, ReservationDetail,
    UpdateReservationRequest,
};

#[derive(Clone)]
pub struct ReservationService {
    db: PgPool,
}

impl ReservationService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a reservation for the requesting user, or, for staff/admin,
    /// on behalf of the user named in the request.
    ///
    /// The availability check, the overlap check and the insert run inside a
    /// single SERIALIZABLE transaction so two concurrent requests for the
    /// same car cannot both succeed.
    pub async fn create_reservation(
        &self,
        session: &UserSession,
        request: CreateReservationRequest,
    ) -> Result<Reservation, ApiError> {
        let target_user = match request.user_id {
            Some(user_id) if user_id != session.user_id => {
                if !session.role.is_staff() {
                    return Err(ApiError::Forbidden);
                }
                user_id
            }
            _ => session.user_id,
        };

        if request.start_time >= request.end_time {
            return Err(ApiError::Validation(
                "start_time must be before end_time".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        if target_user != session.user_id {
            let exists = sqlx::query("SELECT 1 FROM users WHERE id = $1")
                .bind(target_user)
                .fetch_optional(&mut *tx)
                .await?;
            if exists.is_none() {
                return Err(ApiError::NotFound("User"));
            }
        }

        let car = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1")
            .bind(request.car_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ApiError::NotFound("Car"))?;

        if !car.is_available {
            return Err(ApiError::Validation(
                "Car is currently not available".to_string(),
            ));
        }

        self.check_no_overlap(
            &mut tx,
            request.car_id,
            request.start_time,
            request.end_time,
            None,
        )
        .await?;

        let total_cost = compute_total_cost(car.daily_rate, request.start_time, request.end_time);

        let reservation = sqlx::query_as::<_, Reservation>(
            "INSERT INTO reservations (id, user_id, car_id, start_time, end_time, total_cost, status, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, $7)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(target_user)
        .bind(request.car_id)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(total_cost)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(reservation)
    }

    pub async fn get_reservation(
        &self,
        reservation_id: Uuid,
    ) -> Result<Option<Reservation>, ApiError> {
        let reservation =
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservations WHERE id = $1")
                .bind(reservation_id)
                .fetch_optional(&self.db)
                .await?;

        Ok(reservation)
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Reservation>, ApiError> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE user_id = $1 ORDER BY start_time DESC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(reservations)
    }

    pub async fn list_all(&self) -> Result<Vec<Reservation>, ApiError> {
        let reservations =
            sqlx::query_as::<_, Reservation>("SELECT * FROM reservations ORDER BY start_time DESC")
                .fetch_all(&self.db)
                .await?;

        Ok(reservations)
    }

    /// Reservations joined with user and car context, for the staff overview
    pub async fn list_all_detailed(&self) -> Result<Vec<ReservationDetail>, ApiError> {
        let reservations = sqlx::query_as::<_, ReservationDetail>(
            "SELECT r.id, r.user_id, u.username, r.car_id, c.license_plate, c.brand, c.model,
                    r.start_time, r.end_time, r.total_cost, r.status
             FROM reservations AS r
             INNER JOIN users AS u ON r.user_id = u.id
             INNER JOIN cars AS c ON r.car_id = c.id
             ORDER BY r.start_time DESC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(reservations)
    }

    /// Update status and/or interval of a reservation.
    ///
    /// The owner may only cancel; staff/admin may set any status and move the
    /// interval, which re-runs the overlap check and recomputes the cost.
    pub async fn update_reservation(
        &self,
        session: &UserSession,
        reservation_id: Uuid,
        request: UpdateReservationRequest,
    ) -> Result<Reservation, ApiError> {
        let existing = self
            .get_reservation(reservation_id)
            .await?
            .ok_or(ApiError::NotFound("Reservation"))?;

        if !existing.accessible_by(session) {
            return Err(ApiError::Forbidden);
        }

        if let Some(status) = request.status {
            if !status.settable_by(session.role) {
                return Err(ApiError::Forbidden);
            }
        }

        let status = request.status.unwrap_or(existing.status);

        if request.start_time.is_none() && request.end_time.is_none() {
            // Reactivating a cancelled reservation re-contends for the car,
            // so it must pass the overlap check again
            if status.blocks_car() && !existing.status.blocks_car() {
                let mut tx = self.db.begin().await?;
                set_transaction_serializable(&mut tx).await?;

                self.check_no_overlap(
                    &mut tx,
                    existing.car_id,
                    existing.start_time,
                    existing.end_time,
                    Some(reservation_id),
                )
                .await?;

                let reservation = sqlx::query_as::<_, Reservation>(
                    "UPDATE reservations SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
                )
                .bind(reservation_id)
                .bind(status)
                .fetch_one(&mut *tx)
                .await?;

                tx.commit().await?;

                return Ok(reservation);
            }

            let reservation = sqlx::query_as::<_, Reservation>(
                "UPDATE reservations SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
            )
            .bind(reservation_id)
            .bind(status)
            .fetch_one(&self.db)
            .await?;

            return Ok(reservation);
        }

        // Interval changes are a staff operation
        if !session.role.is_staff() {
            return Err(ApiError::Forbidden);
        }

        let start_time = request.start_time.unwrap_or(existing.start_time);
        let end_time = request.end_time.unwrap_or(existing.end_time);
        if start_time >= end_time {
            return Err(ApiError::Validation(
                "start_time must be before end_time".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;
        set_transaction_serializable(&mut tx).await?;

        self.check_no_overlap(
            &mut tx,
            existing.car_id,
            start_time,
            end_time,
            Some(reservation_id),
        )
        .await?;

        let daily_rate: (f64,) = sqlx::query_as("SELECT daily_rate FROM cars WHERE id = $1")
            .bind(existing.car_id)
            .fetch_one(&mut *tx)
            .await?;
        let total_cost = compute_total_cost(daily_rate.0, start_time, end_time);

        let reservation = sqlx::query_as::<_, Reservation>(
            "UPDATE reservations
             SET start_time = $2, end_time = $3, total_cost = $4, status = $5, updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(reservation_id)
        .bind(start_time)
        .bind(end_time)
        .bind(total_cost)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(reservation)
    }

    /// Delete a reservation; allowed for its owner or an admin
    pub async fn delete_reservation(
        &self,
        session: &UserSession,
        reservation_id: Uuid,
    ) -> Result<(), ApiError> {
        let existing = self
            .get_reservation(reservation_id)
            .await?
            .ok_or(ApiError::NotFound("Reservation"))?;

        if !existing.deletable_by(session) {
            return Err(ApiError::Forbidden);
        }

        sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(reservation_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Reject the candidate interval if a non-cancelled reservation for the
    /// same car overlaps it. The SQL mirrors `reservation_conflicts`:
    /// cancelled releases the car, and `[start, end)` intervals overlap iff
    /// `existing.start < end AND existing.end > start`.
    async fn check_no_overlap(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        car_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> Result<(), ApiError> {
        let overlap = sqlx::query(
            "SELECT 1 FROM reservations
             WHERE car_id = $1
               AND status <> 'cancelled'
               AND start_time < $3
               AND end_time > $2
               AND ($4::uuid IS NULL OR id <> $4)
             LIMIT 1",
        )
        .bind(car_id)
        .bind(start_time)
        .bind(end_time)
        .bind(exclude)
        .fetch_optional(&mut **tx)
        .await?;

        if overlap.is_some() {
            return Err(ApiError::Conflict(
                "Car is already reserved in the requested time range".to_string(),
            ));
        }

        Ok(())
    }
}

async fn set_transaction_serializable(
    tx: &mut Transaction<'_, Postgres>,
) -> Result<(), ApiError> {
    sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
        .execute(&mut **tx)
        .await?;
    Ok(())
}
