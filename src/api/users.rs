use axum::{
    extract::{Multipart, State},
    middleware,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use bytes::Bytes;
use sqlx::PgPool;

use super::error::ApiError;
use crate::auth::{jwt_auth_middleware, AuthService, UserSession};
use crate::models::{UpdateProfileRequest, UserResponse};
use crate::services::UserService;

const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Clone)]
pub struct UsersAppState {
    pub users: UserService,
    pub upload_dir: String,
}

pub fn user_routes(db: PgPool, auth_service: AuthService, upload_dir: String) -> Router {
    let state = UsersAppState {
        users: UserService::new(db),
        upload_dir,
    };

    Router::new()
        .route("/me", get(get_me).put(update_me))
        .route("/me/license", post(upload_license))
        .route_layer(middleware::from_fn_with_state(
            auth_service,
            jwt_auth_middleware,
        ))
        .with_state(state)
}

/// Get the authenticated user's profile
#[tracing::instrument(skip(state, session))]
async fn get_me(
    State(state): State<UsersAppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .get_user(session.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(user))
}

/// Update the authenticated user's profile
#[tracing::instrument(skip(state, session, request))]
async fn update_me(
    State(state): State<UsersAppState>,
    Extension(session): Extension<UserSession>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .update_profile(session.user_id, request)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(user))
}

/// Upload a driver's-license image for the authenticated user
#[tracing::instrument(skip(state, session, multipart))]
async fn upload_license(
    State(state): State<UsersAppState>,
    Extension(session): Extension<UserSession>,
    mut multipart: Multipart,
) -> Result<Json<UserResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field
            .content_type()
            .ok_or_else(|| ApiError::Validation("Missing content type".to_string()))?;
        let mime_type: mime::Mime = content_type
            .parse()
            .map_err(|_| ApiError::Validation(format!("Invalid content type '{content_type}'")))?;
        if mime_type.type_() != mime::IMAGE {
            return Err(ApiError::Validation(
                "Only image uploads are accepted".to_string(),
            ));
        }
        let extension = match mime_type.subtype().as_str() {
            "jpeg" => "jpg",
            "png" => "png",
            other => {
                return Err(ApiError::Validation(format!(
                    "Unsupported image format '{other}'"
                )))
            }
        };

        let data: Bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::Validation(e.to_string()))?;
        if data.len() > MAX_IMAGE_BYTES {
            return Err(ApiError::Validation(
                "Image exceeds the 5 MB size limit".to_string(),
            ));
        }

        tokio::fs::create_dir_all(&state.upload_dir)
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;
        let path = format!("{}/{}.{}", state.upload_dir, session.user_id, extension);
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;

        let user = state
            .users
            .set_license_image(session.user_id, &path)
            .await?
            .ok_or(ApiError::NotFound("User"))?;

        return Ok(Json(user));
    }

    Err(ApiError::Validation(
        "Missing multipart field 'image'".to_string(),
    ))
}
