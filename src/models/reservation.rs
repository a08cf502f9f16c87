use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::auth::{UserRole, UserSession};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    /// Whether a requester with the given role may set this status.
    /// Plain users may only cancel their own reservation; staff and admin
    /// drive the full lifecycle.
    pub fn settable_by(self, role: UserRole) -> bool {
        match role {
            UserRole::Staff | UserRole::Admin => true,
            UserRole::User => self == ReservationStatus::Cancelled,
        }
    }

    /// Whether a reservation in this status holds its time range against
    /// other bookings. Cancelling releases the car.
    pub fn blocks_car(self) -> bool {
        self != ReservationStatus::Cancelled
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Reservation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub car_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_cost: f64,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// The owner and the back office may view and update a reservation
    pub fn accessible_by(&self, session: &UserSession) -> bool {
        self.user_id == session.user_id || session.role.is_staff()
    }

    /// Deletion is restricted to the owner or an admin
    pub fn deletable_by(&self, session: &UserSession) -> bool {
        self.user_id == session.user_id || session.role == UserRole::Admin
    }
}

/// Reservation joined with user and car context, for the staff listing
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReservationDetail {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub car_id: Uuid,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_cost: f64,
    pub status: ReservationStatus,
}

#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub car_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Staff/admin may book on behalf of another user
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateReservationRequest {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: Option<ReservationStatus>,
}

/// Open-interval overlap test over `[start, end)` intervals
pub fn intervals_overlap(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && a_end > b_start
}

/// A candidate interval conflicts with an existing reservation when that
/// reservation still blocks the car and the `[start, end)` intervals overlap
pub fn reservation_conflicts(
    existing_status: ReservationStatus,
    existing_start: DateTime<Utc>,
    existing_end: DateTime<Utc>,
    candidate_start: DateTime<Utc>,
    candidate_end: DateTime<Utc>,
) -> bool {
    existing_status.blocks_car()
        && intervals_overlap(existing_start, existing_end, candidate_start, candidate_end)
}

/// Reservation cost: the car's daily rate scaled linearly by duration,
/// rounded to two decimals. A 24 hour reservation costs exactly one daily rate.
pub fn compute_total_cost(
    daily_rate: f64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> f64 {
    let duration_hours = (end - start).num_seconds() as f64 / 3600.0;
    let cost = daily_rate * duration_hours / 24.0;
    (cost * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_full_day_costs_one_daily_rate() {
        let start = at(8, 0);
        let end = start + chrono::Duration::hours(24);
        assert_eq!(compute_total_cost(55.0, start, end), 55.0);
    }

    #[test]
    fn test_two_hour_reservation_cost() {
        // 100 EUR/day for 10:00-12:00 -> 100 * 2 / 24 = 8.33
        assert_eq!(compute_total_cost(100.0, at(10, 0), at(12, 0)), 8.33);
    }

    #[test]
    fn test_cost_rounds_to_two_decimals() {
        // 90 minutes at 47 EUR/day -> 47 * 1.5 / 24 = 2.9375 -> 2.94
        assert_eq!(compute_total_cost(47.0, at(9, 0), at(10, 30)), 2.94);
    }

    #[test]
    fn test_overlapping_intervals() {
        assert!(intervals_overlap(at(10, 0), at(12, 0), at(11, 0), at(13, 0)));
        assert!(intervals_overlap(at(10, 0), at(12, 0), at(9, 0), at(13, 0)));
        assert!(intervals_overlap(at(10, 0), at(12, 0), at(10, 30), at(11, 30)));
    }

    #[test]
    fn test_touching_intervals_do_not_overlap() {
        // [10, 12) and [12, 14) share only the boundary
        assert!(!intervals_overlap(at(10, 0), at(12, 0), at(12, 0), at(14, 0)));
        assert!(!intervals_overlap(at(12, 0), at(14, 0), at(10, 0), at(12, 0)));
    }

    #[test]
    fn test_disjoint_intervals_do_not_overlap() {
        assert!(!intervals_overlap(at(8, 0), at(9, 0), at(10, 0), at(11, 0)));
    }

    #[test]
    fn test_only_cancelled_releases_the_car() {
        assert!(ReservationStatus::Pending.blocks_car());
        assert!(ReservationStatus::Confirmed.blocks_car());
        assert!(ReservationStatus::Completed.blocks_car());
        assert!(!ReservationStatus::Cancelled.blocks_car());
    }

    #[test]
    fn test_status_transitions_by_role() {
        // Plain users may only cancel
        assert!(ReservationStatus::Cancelled.settable_by(UserRole::User));
        assert!(!ReservationStatus::Confirmed.settable_by(UserRole::User));
        assert!(!ReservationStatus::Completed.settable_by(UserRole::User));
        assert!(!ReservationStatus::Pending.settable_by(UserRole::User));

        // Staff and admin may set anything
        for status in [
            ReservationStatus::Pending,
            ReservationStatus::Confirmed,
            ReservationStatus::Completed,
            ReservationStatus::Cancelled,
        ] {
            assert!(status.settable_by(UserRole::Staff));
            assert!(status.settable_by(UserRole::Admin));
        }
    }
}
