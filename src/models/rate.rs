use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A tariff plan that can be assigned to users
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Rate {
    pub id: Uuid,
    pub name: String,
    pub price_per_hour: f64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRateRequest {
    pub name: String,
    pub price_per_hour: f64,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRateRequest {
    pub name: Option<String>,
    pub price_per_hour: Option<f64>,
    pub description: Option<String>,
}
