use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::api::error::{conflict_on_unique, ApiError};
use crate::models::{Car, CreateCarRequest, UpdateCarRequest};

#[derive(Clone)]
pub struct CarService {
    db: PgPool,
}

impl CarService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_car(&self, request: CreateCarRequest) -> Result<Car, ApiError> {
        if request.daily_rate < 0.0 {
            return Err(ApiError::Validation(
                "daily_rate must not be negative".to_string(),
            ));
        }

        let car = sqlx::query_as::<_, Car>(
            "INSERT INTO cars (id, license_plate, brand, model, year, color, location, daily_rate, is_available, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&request.license_plate)
        .bind(&request.brand)
        .bind(&request.model)
        .bind(request.year)
        .bind(&request.color)
        .bind(&request.location)
        .bind(request.daily_rate)
        .bind(request.is_available.unwrap_or(true))
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await
        .map_err(|e| conflict_on_unique(e, "A car with this license plate already exists"))?;

        Ok(car)
    }

    pub async fn get_car(&self, car_id: Uuid) -> Result<Option<Car>, ApiError> {
        let car = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1")
            .bind(car_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(car)
    }

    pub async fn list_cars(&self, available_only: bool) -> Result<Vec<Car>, ApiError> {
        let cars = if available_only {
            sqlx::query_as::<_, Car>(
                "SELECT * FROM cars WHERE is_available ORDER BY brand, model",
            )
            .fetch_all(&self.db)
            .await?
        } else {
            sqlx::query_as::<_, Car>("SELECT * FROM cars ORDER BY brand, model")
                .fetch_all(&self.db)
                .await?
        };

        Ok(cars)
    }

    pub async fn update_car(
        &self,
        car_id: Uuid,
        request: UpdateCarRequest,
    ) -> Result<Option<Car>, ApiError> {
        if let Some(rate) = request.daily_rate {
            if rate < 0.0 {
                return Err(ApiError::Validation(
                    "daily_rate must not be negative".to_string(),
                ));
            }
        }

        let car = sqlx::query_as::<_, Car>(
            "UPDATE cars
             SET license_plate = COALESCE($2, license_plate),
                 brand = COALESCE($3, brand),
                 model = COALESCE($4, model),
                 year = COALESCE($5, year),
                 color = COALESCE($6, color),
                 location = COALESCE($7, location),
                 daily_rate = COALESCE($8, daily_rate),
                 is_available = COALESCE($9, is_available),
                 updated_at = $10
             WHERE id = $1
             RETURNING *",
        )
        .bind(car_id)
        .bind(request.license_plate)
        .bind(request.brand)
        .bind(request.model)
        .bind(request.year)
        .bind(request.color)
        .bind(request.location)
        .bind(request.daily_rate)
        .bind(request.is_available)
        .bind(Utc::now())
        .fetch_optional(&self.db)
        .await
        .map_err(|e| conflict_on_unique(e, "A car with this license plate already exists"))?;

        Ok(car)
    }

    pub async fn set_availability(
        &self,
        car_id: Uuid,
        is_available: bool,
    ) -> Result<Option<Car>, ApiError> {
        let car = sqlx::query_as::<_, Car>(
            "UPDATE cars SET is_available = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(car_id)
        .bind(is_available)
        .fetch_optional(&self.db)
        .await?;

        Ok(car)
    }

    pub async fn delete_car(&self, car_id: Uuid) -> Result<bool, ApiError> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(car_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
