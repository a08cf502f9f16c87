use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::auth::password::{
    generate_reset_token, hash_password, is_valid_email, verify_password,
};
use crate::auth::{
    AuthError, AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, JwtService,
    LoginRequest, MessageResponse, RefreshTokenRequest, RegisterRequest, ResetPasswordRequest,
    TokenResponse, UserInfo, UserRole, UserSession,
};
use crate::models::User;

#[derive(Debug, Clone)]
pub struct AuthService {
    jwt_service: JwtService,
    db: PgPool,
}

impl AuthService {
    pub fn new(db: PgPool, jwt_secret: &str) -> Self {
        Self {
            jwt_service: JwtService::new(jwt_secret),
            db,
        }
    }

    /// Register a new user with the default `user` role
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AuthError> {
        if !is_valid_email(&request.email) {
            return Err(AuthError::EmailValidation(format!(
                "'{}' is not a valid email address",
                request.email
            )));
        }

        if self.get_user_by_email(&request.email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists);
        }
        if self.get_user_by_username(&request.username).await?.is_some() {
            return Err(AuthError::UsernameAlreadyExists);
        }

        let password_hash = hash_password(&request.password)
            .map_err(|e| AuthError::PasswordValidation(e.to_string()))?;
        let now = Utc::now();

        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (id, username, email, password_hash, role, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&request.username)
        .bind(&request.email)
        .bind(&password_hash)
        .bind(UserRole::User)
        .bind(now)
        .fetch_one(&self.db)
        .await
        .map_err(AuthError::Database)?;

        self.issue_tokens(user).await
    }

    /// Login user
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let user = self
            .get_user_by_email(&request.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_tokens(user).await
    }

    /// Refresh access token
    pub async fn refresh_token(
        &self,
        request: RefreshTokenRequest,
    ) -> Result<TokenResponse, AuthError> {
        let claims = self.jwt_service.validate_token(&request.refresh_token)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        if !self
            .is_refresh_token_valid(user_id, &request.refresh_token)
            .await?
        {
            return Err(AuthError::InvalidToken);
        }

        let access_token = self.jwt_service.create_access_token(
            user_id,
            &claims.username,
            &claims.email,
            claims.role,
        )?;

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.access_token_expires_in_seconds(),
        })
    }

    /// Logout user (blacklist token, revoke refresh tokens)
    pub async fn logout(&self, token: &str) -> Result<MessageResponse, AuthError> {
        let claims = self.jwt_service.validate_token(token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;

        self.blacklist_token(&claims.jti, claims.exp as i64).await?;
        self.revoke_user_refresh_tokens(user_id).await?;

        Ok(MessageResponse {
            message: "Successfully logged out".to_string(),
        })
    }

    /// Change password of the authenticated user
    pub async fn change_password(
        &self,
        session: &UserSession,
        request: ChangePasswordRequest,
    ) -> Result<MessageResponse, AuthError> {
        let user = self
            .get_user_by_email(&session.email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !verify_password(&request.current_password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let password_hash = hash_password(&request.new_password)
            .map_err(|e| AuthError::PasswordValidation(e.to_string()))?;
        self.update_password_hash(user.id, &password_hash).await?;

        // Existing refresh tokens are no longer trustworthy
        self.revoke_user_refresh_tokens(user.id).await?;

        Ok(MessageResponse {
            message: "Password changed successfully".to_string(),
        })
    }

    /// Start a password reset flow. Always answers with the same message so the
    /// endpoint cannot be used to probe for registered addresses.
    pub async fn forgot_password(
        &self,
        request: ForgotPasswordRequest,
    ) -> Result<MessageResponse, AuthError> {
        if let Some(user) = self.get_user_by_email(&request.email).await? {
            let token = generate_reset_token();
            let expires_at = Utc::now() + Duration::hours(1);

            sqlx::query(
                "INSERT INTO password_reset_tokens (token, user_id, expires_at) VALUES ($1, $2, $3)",
            )
            .bind(&token)
            .bind(user.id)
            .bind(expires_at)
            .execute(&self.db)
            .await
            .map_err(AuthError::Database)?;

            // No mail delivery configured; operators pick the token up from the log
            info!(user_id = %user.id, token = %token, "password reset token issued");
        }

        Ok(MessageResponse {
            message: "If an account with that email exists, a password reset link has been sent."
                .to_string(),
        })
    }

    /// Complete a password reset using a previously issued token
    pub async fn reset_password(
        &self,
        request: ResetPasswordRequest,
    ) -> Result<MessageResponse, AuthError> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            "SELECT user_id FROM password_reset_tokens
             WHERE token = $1 AND expires_at > NOW() AND NOT used",
        )
        .bind(&request.token)
        .fetch_optional(&self.db)
        .await
        .map_err(AuthError::Database)?;

        let (user_id,) = row.ok_or(AuthError::InvalidToken)?;

        let password_hash = hash_password(&request.new_password)
            .map_err(|e| AuthError::PasswordValidation(e.to_string()))?;
        self.update_password_hash(user_id, &password_hash).await?;

        sqlx::query("UPDATE password_reset_tokens SET used = TRUE WHERE token = $1")
            .bind(&request.token)
            .execute(&self.db)
            .await
            .map_err(AuthError::Database)?;

        self.revoke_user_refresh_tokens(user_id).await?;

        Ok(MessageResponse {
            message: "Password reset successfully".to_string(),
        })
    }

    /// Check if token is blacklisted
    pub async fn is_token_blacklisted(&self, jti: &str) -> Result<bool, AuthError> {
        let result =
            sqlx::query("SELECT 1 FROM token_blacklist WHERE jti = $1 AND expires_at > NOW()")
                .bind(jti)
                .fetch_optional(&self.db)
                .await
                .map_err(AuthError::Database)?;

        Ok(result.is_some())
    }

    /// Validate user session from token
    pub async fn validate_session(&self, token: &str) -> Result<UserSession, AuthError> {
        let session = self.jwt_service.extract_user_session(token)?;

        if self.is_token_blacklisted(&session.jti).await? {
            return Err(AuthError::InvalidToken);
        }

        Ok(session)
    }

    // Private helper methods

    async fn issue_tokens(&self, user: User) -> Result<AuthResponse, AuthError> {
        let (access_token, refresh_token) =
            self.jwt_service
                .create_token_pair(user.id, &user.username, &user.email, user.role)?;

        self.store_refresh_token(user.id, &refresh_token).await?;

        Ok(AuthResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt_service.access_token_expires_in_seconds(),
            user: UserInfo {
                id: user.id,
                username: user.username,
                email: user.email,
                role: user.role,
                rate_id: user.rate_id,
                created_at: user.created_at,
                updated_at: user.updated_at,
            },
        })
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.db)
            .await
            .map_err(AuthError::Database)?;

        Ok(user)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AuthError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.db)
            .await
            .map_err(AuthError::Database)?;

        Ok(user)
    }

    async fn update_password_hash(
        &self,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<(), AuthError> {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(password_hash)
            .execute(&self.db)
            .await
            .map_err(AuthError::Database)?;

        Ok(())
    }

    async fn store_refresh_token(
        &self,
        user_id: Uuid,
        refresh_token: &str,
    ) -> Result<(), AuthError> {
        let claims = self.jwt_service.validate_token(refresh_token)?;
        let expires_at =
            chrono::DateTime::from_timestamp(claims.exp as i64, 0).ok_or(AuthError::InvalidToken)?;

        sqlx::query(
            "INSERT INTO refresh_tokens (id, user_id, token_hash, expires_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(format!("{:x}", md5::compute(refresh_token)))
        .bind(expires_at)
        .execute(&self.db)
        .await
        .map_err(AuthError::Database)?;

        Ok(())
    }

    async fn is_refresh_token_valid(
        &self,
        user_id: Uuid,
        refresh_token: &str,
    ) -> Result<bool, AuthError> {
        let token_hash = format!("{:x}", md5::compute(refresh_token));

        let result = sqlx::query(
            "SELECT 1 FROM refresh_tokens
             WHERE user_id = $1 AND token_hash = $2 AND expires_at > NOW() AND NOT revoked",
        )
        .bind(user_id)
        .bind(token_hash)
        .fetch_optional(&self.db)
        .await
        .map_err(AuthError::Database)?;

        Ok(result.is_some())
    }

    async fn revoke_user_refresh_tokens(&self, user_id: Uuid) -> Result<(), AuthError> {
        sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .map_err(AuthError::Database)?;

        Ok(())
    }

    async fn blacklist_token(&self, jti: &str, exp: i64) -> Result<(), AuthError> {
        let expires_at =
            chrono::DateTime::from_timestamp(exp, 0).ok_or(AuthError::InvalidToken)?;

        sqlx::query(
            "INSERT INTO token_blacklist (jti, expires_at) VALUES ($1, $2)
             ON CONFLICT (jti) DO NOTHING",
        )
        .bind(jti)
        .bind(expires_at)
        .execute(&self.db)
        .await
        .map_err(AuthError::Database)?;

        Ok(())
    }
}
