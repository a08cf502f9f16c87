use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::error::{conflict_on_unique, ApiError};
use crate::models::{CreateRateRequest, Rate, UpdateRateRequest};

#[derive(Clone)]
pub struct RateService {
    db: PgPool,
}

impl RateService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_rate(&self, request: CreateRateRequest) -> Result<Rate, ApiError> {
        if request.price_per_hour < 0.0 {
            return Err(ApiError::Validation(
                "price_per_hour must not be negative".to_string(),
            ));
        }

        let rate = sqlx::query_as::<_, Rate>(
            "INSERT INTO rates (id, name, price_per_hour, description, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&request.name)
        .bind(request.price_per_hour)
        .bind(&request.description)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await
        .map_err(|e| conflict_on_unique(e, "A rate with this name already exists"))?;

        Ok(rate)
    }

    pub async fn get_rate(&self, rate_id: Uuid) -> Result<Option<Rate>, ApiError> {
        let rate = sqlx::query_as::<_, Rate>("SELECT * FROM rates WHERE id = $1")
            .bind(rate_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(rate)
    }

    pub async fn list_rates(&self) -> Result<Vec<Rate>, ApiError> {
        let rates = sqlx::query_as::<_, Rate>("SELECT * FROM rates ORDER BY name")
            .fetch_all(&self.db)
            .await?;

        Ok(rates)
    }

    pub async fn update_rate(
        &self,
        rate_id: Uuid,
        request: UpdateRateRequest,
    ) -> Result<Option<Rate>, ApiError> {
        if let Some(price) = request.price_per_hour {
            if price < 0.0 {
                return Err(ApiError::Validation(
                    "price_per_hour must not be negative".to_string(),
                ));
            }
        }

        let rate = sqlx::query_as::<_, Rate>(
            "UPDATE rates
             SET name = COALESCE($2, name),
                 price_per_hour = COALESCE($3, price_per_hour),
                 description = COALESCE($4, description),
                 updated_at = $5
             WHERE id = $1
             RETURNING *",
        )
        .bind(rate_id)
        .bind(request.name)
        .bind(request.price_per_hour)
        .bind(request.description)
        .bind(Utc::now())
        .fetch_optional(&self.db)
        .await
        .map_err(|e| conflict_on_unique(e, "A rate with this name already exists"))?;

        Ok(rate)
    }

    pub async fn delete_rate(&self, rate_id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM rates WHERE id = $1")
            .bind(rate_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
