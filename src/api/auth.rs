use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Json,
    routing::post,
    Extension, Router,
};

use crate::auth::{
    jwt_auth_middleware, rate_limit_middleware, AuthError, AuthResponse, AuthService,
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, MessageResponse, RateLimiter,
    RefreshTokenRequest, RegisterRequest, ResetPasswordRequest, TokenResponse, UserSession,
};

/// Authentication routes. The credential endpoints are rate limited per
/// client IP to slow down guessing.
pub fn auth_routes(auth_service: AuthService) -> Router {
    let limiter = RateLimiter::new(10, Duration::from_secs(300));
    let credential_limiter = move |request: Request, next: Next| {
        let limiter = limiter.clone();
        async move { rate_limit_middleware(request, next, limiter).await }
    };

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route_layer(middleware::from_fn(credential_limiter))
        .route("/refresh", post(refresh_token))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route(
            "/logout",
            post(logout).route_layer(middleware::from_fn_with_state(
                auth_service.clone(),
                jwt_auth_middleware,
            )),
        )
        .route(
            "/change-password",
            post(change_password).route_layer(middleware::from_fn_with_state(
                auth_service.clone(),
                jwt_auth_middleware,
            )),
        )
        .with_state(auth_service)
}

/// Register a new user
#[tracing::instrument(skip(auth_service, request))]
async fn register(
    State(auth_service): State<AuthService>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = auth_service.register(request).await?;
    Ok(Json(response))
}

/// Login user
#[tracing::instrument(skip(auth_service, request))]
async fn login(
    State(auth_service): State<AuthService>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = auth_service.login(request).await?;
    Ok(Json(response))
}

/// Refresh access token
#[tracing::instrument(skip(auth_service, request))]
async fn refresh_token(
    State(auth_service): State<AuthService>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let response = auth_service.refresh_token(request).await?;
    Ok(Json(response))
}

/// Logout user
#[tracing::instrument(skip(auth_service, request))]
async fn logout(
    State(auth_service): State<AuthService>,
    request: Request,
) -> Result<Json<MessageResponse>, AuthError> {
    // The raw token is needed to blacklist its jti
    let auth_header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;

    let token = crate::auth::extract_bearer_token(auth_header)?;
    let response = auth_service.logout(token).await?;
    Ok(Json(response))
}

/// Change the authenticated user's password
#[tracing::instrument(skip(auth_service, session, request))]
async fn change_password(
    State(auth_service): State<AuthService>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    let response = auth_service.change_password(&session, request).await?;
    Ok(Json(response))
}

/// Start a password reset flow
#[tracing::instrument(skip(auth_service, request))]
async fn forgot_password(
    State(auth_service): State<AuthService>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    let response = auth_service.forgot_password(request).await?;
    Ok(Json(response))
}

/// Complete a password reset
#[tracing::instrument(skip(auth_service, request))]
async fn reset_password(
    State(auth_service): State<AuthService>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    let response = auth_service.reset_password(request).await?;
    Ok(Json(response))
}
