use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use movesmart::auth::{UserRole, UserSession};
use movesmart::models::{
    compute_total_cost, intervals_overlap, reservation_conflicts, Reservation, ReservationStatus,
};

fn june(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, day, hour, minute, 0).unwrap()
}

fn session(user_id: Uuid, role: UserRole) -> UserSession {
    UserSession {
        user_id,
        username: "tester".to_string(),
        email: "tester@example.com".to_string(),
        role,
        jti: "jti".to_string(),
    }
}

fn booking(owner: Uuid, status: ReservationStatus) -> Reservation {
    Reservation {
        id: Uuid::new_v4(),
        user_id: owner,
        car_id: Uuid::new_v4(),
        start_time: june(2, 10, 0),
        end_time: june(2, 14, 0),
        total_cost: 16.67,
        status,
        created_at: june(1, 9, 0),
        updated_at: june(1, 9, 0),
    }
}

#[test]
fn test_full_day_reservation_costs_exactly_the_daily_rate() {
    for daily_rate in [35.0, 79.9, 120.0] {
        let start = june(1, 9, 0);
        let end = start + Duration::hours(24);
        assert_eq!(compute_total_cost(daily_rate, start, end), daily_rate);
    }
}

#[test]
fn test_short_reservation_is_prorated_linearly() {
    // 100 EUR/day, 10:00-12:00 -> 100 * (2 / 24) = 8.33
    assert_eq!(compute_total_cost(100.0, june(1, 10, 0), june(1, 12, 0)), 8.33);

    // Half a day costs half the rate
    assert_eq!(compute_total_cost(80.0, june(1, 0, 0), june(1, 12, 0)), 40.0);
}

#[test]
fn test_multi_day_reservation_cost() {
    // 50 EUR/day for three full days
    assert_eq!(compute_total_cost(50.0, june(1, 8, 0), june(4, 8, 0)), 150.0);
}

#[test]
fn test_cost_is_rounded_to_cents() {
    // 45 minutes at 99 EUR/day -> 99 * 0.75 / 24 = 3.09375 -> 3.09
    assert_eq!(compute_total_cost(99.0, june(1, 9, 0), june(1, 9, 45)), 3.09);
}

#[test]
fn test_candidate_interval_conflicts_with_contained_booking() {
    let existing = (june(2, 10, 0), june(2, 14, 0));
    let candidate = (june(2, 11, 0), june(2, 12, 0));
    assert!(intervals_overlap(candidate.0, candidate.1, existing.0, existing.1));
}

#[test]
fn test_candidate_interval_conflicts_with_partial_overlap() {
    let existing = (june(2, 10, 0), june(2, 14, 0));

    // Overlaps the tail of the existing booking
    assert!(intervals_overlap(june(2, 13, 0), june(2, 16, 0), existing.0, existing.1));
    // Overlaps the head
    assert!(intervals_overlap(june(2, 8, 0), june(2, 11, 0), existing.0, existing.1));
    // Fully encloses it
    assert!(intervals_overlap(june(2, 9, 0), june(2, 15, 0), existing.0, existing.1));
}

#[test]
fn test_back_to_back_bookings_are_allowed() {
    // A return at 12:00 frees the car for a 12:00 pickup
    let morning = (june(2, 8, 0), june(2, 12, 0));
    let afternoon = (june(2, 12, 0), june(2, 18, 0));
    assert!(!intervals_overlap(afternoon.0, afternoon.1, morning.0, morning.1));
    assert!(!intervals_overlap(morning.0, morning.1, afternoon.0, afternoon.1));
}

#[test]
fn test_bookings_on_different_days_do_not_conflict() {
    assert!(!intervals_overlap(
        june(1, 10, 0),
        june(1, 18, 0),
        june(3, 10, 0),
        june(3, 18, 0),
    ));
}

#[test]
fn test_cancelled_bookings_release_the_car() {
    let existing = (june(2, 10, 0), june(2, 14, 0));
    let candidate = (june(2, 11, 0), june(2, 12, 0));

    // The interval is occupied while the booking is active
    for status in [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::Completed,
    ] {
        assert!(reservation_conflicts(
            status,
            existing.0,
            existing.1,
            candidate.0,
            candidate.1,
        ));
    }

    // Cancelling frees it for other bookings
    assert!(!reservation_conflicts(
        ReservationStatus::Cancelled,
        existing.0,
        existing.1,
        candidate.0,
        candidate.1,
    ));
}

#[test]
fn test_reactivated_booking_occupies_its_interval_again() {
    // A cancelled booking set back to an active status re-enters the
    // conflict domain with its old interval
    let existing = (june(2, 10, 0), june(2, 14, 0));
    let candidate = (june(2, 11, 0), june(2, 12, 0));

    assert!(!reservation_conflicts(
        ReservationStatus::Cancelled,
        existing.0,
        existing.1,
        candidate.0,
        candidate.1,
    ));
    assert!(reservation_conflicts(
        ReservationStatus::Confirmed,
        existing.0,
        existing.1,
        candidate.0,
        candidate.1,
    ));
}

#[test]
fn test_foreign_reservation_access_requires_staff() {
    let owner = Uuid::new_v4();
    let reservation = booking(owner, ReservationStatus::Confirmed);

    assert!(reservation.accessible_by(&session(owner, UserRole::User)));
    assert!(reservation.accessible_by(&session(Uuid::new_v4(), UserRole::Staff)));
    assert!(reservation.accessible_by(&session(Uuid::new_v4(), UserRole::Admin)));

    assert!(!reservation.accessible_by(&session(Uuid::new_v4(), UserRole::User)));
}

#[test]
fn test_deletion_is_restricted_to_owner_or_admin() {
    let owner = Uuid::new_v4();
    let reservation = booking(owner, ReservationStatus::Pending);

    assert!(reservation.deletable_by(&session(owner, UserRole::User)));
    assert!(reservation.deletable_by(&session(Uuid::new_v4(), UserRole::Admin)));

    assert!(!reservation.deletable_by(&session(Uuid::new_v4(), UserRole::User)));
    assert!(!reservation.deletable_by(&session(Uuid::new_v4(), UserRole::Staff)));
}

#[test]
fn test_plain_users_may_only_cancel() {
    assert!(ReservationStatus::Cancelled.settable_by(UserRole::User));

    assert!(!ReservationStatus::Pending.settable_by(UserRole::User));
    assert!(!ReservationStatus::Confirmed.settable_by(UserRole::User));
    assert!(!ReservationStatus::Completed.settable_by(UserRole::User));
}

#[test]
fn test_staff_and_admin_drive_the_full_lifecycle() {
    let all_statuses = [
        ReservationStatus::Pending,
        ReservationStatus::Confirmed,
        ReservationStatus::Completed,
        ReservationStatus::Cancelled,
    ];

    for status in all_statuses {
        assert!(status.settable_by(UserRole::Staff));
        assert!(status.settable_by(UserRole::Admin));
    }
}

#[test]
fn test_status_serialization_matches_the_api_contract() {
    let json = serde_json::to_string(&ReservationStatus::Confirmed).unwrap();
    assert_eq!(json, "\"confirmed\"");

    let parsed: ReservationStatus = serde_json::from_str("\"cancelled\"").unwrap();
    assert_eq!(parsed, ReservationStatus::Cancelled);
}
