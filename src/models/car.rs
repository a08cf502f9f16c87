use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Car {
    pub id: Uuid,
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub location: String,
    pub daily_rate: f64,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCarRequest {
    pub license_plate: String,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub location: String,
    pub daily_rate: f64,
    pub is_available: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCarRequest {
    pub license_plate: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub color: Option<String>,
    pub location: Option<String>,
    pub daily_rate: Option<f64>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct SetAvailabilityRequest {
    pub is_available: bool,
}
