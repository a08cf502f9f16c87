use axum::{routing::get, Router};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::admin::admin_routes;
use super::auth::auth_routes;
use super::cars::car_routes;
use super::health::health_check;
use super::rates::rate_routes;
use super::reservations::reservation_routes;
use super::staff::staff_routes;
use super::users::user_routes;
use crate::auth::{cors_layer, security_headers_layer, AuthService};
use crate::config::AppConfig;

pub fn create_routes(db: PgPool, config: &AppConfig) -> Router {
    let auth_service = AuthService::new(db.clone(), &config.jwt_secret);

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes(auth_service.clone()))
        .nest(
            "/api/users",
            user_routes(db.clone(), auth_service.clone(), config.upload_dir.clone()),
        )
        .nest("/api/cars", car_routes(db.clone(), auth_service.clone()))
        .nest("/api/rates", rate_routes(db.clone(), auth_service.clone()))
        .nest(
            "/api/reservations",
            reservation_routes(db.clone(), auth_service.clone()),
        )
        .nest("/api/admin", admin_routes(db.clone(), auth_service.clone()))
        .nest("/api/staff", staff_routes(db, auth_service))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security_headers_layer())
                .layer(cors_layer()),
        )
}
