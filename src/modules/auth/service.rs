use anyhow::{Context, anyhow};
use axum::http::StatusCode;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use mukando_auth::{Claims, create_access_token};
use mukando_config::JwtConfig;
use mukando_core::errors::AppError;
use mukando_core::password::hash_password;
use mukando_core::password::verify_password;

use super::model::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, RefreshResponse, RegisterRequestDto,
    ResetPasswordRequest, StoredToken,
};
use crate::modules::users::model::{CreateUserDto, USER_COLUMNS, User};
use crate::modules::users::service::UserService;
use crate::utils::email::EmailService;

const TOKEN_TYPE: &str = "Bearer";

/// Password reset tokens are valid for one hour.
const RESET_TOKEN_TTL_SECS: i64 = 3600;

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, dto), fields(username = %dto.username))]
    pub async fn register_user(db: &PgPool, dto: RegisterRequestDto) -> Result<User, AppError> {
        let user = UserService::create_user(
            db,
            CreateUserDto {
                username: dto.username,
                email: dto.email,
                password: dto.password,
                first_name: dto.first_name,
                last_name: dto.last_name,
                phone_number: dto.phone_number,
                address: dto.address,
                city: dto.city,
                country: dto.country,
                role: dto.role,
            },
        )
        .await?;

        info!(username = %user.username, "user registered");
        Ok(user)
    }

    /// Looks up the account and checks the password and enabled flag.
    ///
    /// Every failure answers the same 401 message so callers cannot probe
    /// which usernames exist; the log lines tell the failure modes apart.
    pub async fn verify_credentials(
        db: &PgPool,
        username: &str,
        password: &str,
    ) -> Result<User, AppError> {
        #[derive(sqlx::FromRow)]
        struct UserWithPassword {
            #[sqlx(flatten)]
            user: User,
            password: String,
        }

        let sql = format!("SELECT {USER_COLUMNS}, password FROM users WHERE username = $1");
        let row = sqlx::query_as::<_, UserWithPassword>(&sql)
            .bind(username)
            .fetch_optional(db)
            .await
            .context("Failed to look up user for login")
            .map_err(AppError::database)?
            .ok_or_else(|| {
                debug!(username, "login attempt for unknown username");
                AppError::unauthorized(anyhow!("Invalid username or password"))
            })?;

        if !verify_password(password, &row.password)? {
            debug!(username, "login attempt with wrong password");
            return Err(AppError::unauthorized(anyhow!("Invalid username or password")));
        }

        if !row.user.enabled {
            debug!(username, "login attempt on disabled account");
            return Err(AppError::unauthorized(anyhow!("Invalid username or password")));
        }

        Ok(row.user)
    }

    #[instrument(skip(db, dto, jwt_config), fields(username = %dto.username))]
    pub async fn login_user(
        db: &PgPool,
        dto: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let user = Self::verify_credentials(db, &dto.username, &dto.password).await?;

        let access_token = create_access_token(user.id, &user.username, user.role, jwt_config)
            .map_err(|err| AppError::internal(anyhow!("Failed to create access token: {err}")))?;
        let refresh = Self::issue_refresh_token(db, user.id, jwt_config).await?;

        info!(username = %user.username, "user logged in");
        Ok(LoginResponse {
            access_token,
            refresh_token: refresh.token,
            token_type: TOKEN_TYPE.to_string(),
            user,
        })
    }

    /// Stores a fresh opaque refresh token for the user.
    ///
    /// `user_id` is unique in `refresh_tokens`, so a second login replaces
    /// the previous token rather than accumulating rows.
    pub async fn issue_refresh_token(
        db: &PgPool,
        user_id: Uuid,
        jwt_config: &JwtConfig,
    ) -> Result<StoredToken, AppError> {
        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + Duration::seconds(jwt_config.refresh_token_expiry);

        let stored = sqlx::query_as::<_, StoredToken>(
            "INSERT INTO refresh_tokens (user_id, token, expires_at) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id) DO UPDATE \
               SET token = EXCLUDED.token, expires_at = EXCLUDED.expires_at, created_at = NOW() \
             RETURNING id, user_id, token, expires_at, created_at",
        )
        .bind(user_id)
        .bind(&token)
        .bind(expires_at)
        .fetch_one(db)
        .await
        .context("Failed to store refresh token")
        .map_err(AppError::database)?;

        Ok(stored)
    }

    /// Exchanges a refresh token for a new token pair.
    ///
    /// The DELETE .. RETURNING claims the token atomically: of two requests
    /// racing with the same token, exactly one gets the row and the other
    /// fails with 401. Expired tokens are consumed by the same statement.
    #[instrument(skip_all)]
    pub async fn rotate_refresh_token(
        db: &PgPool,
        token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<RefreshResponse, AppError> {
        let claimed = sqlx::query_as::<_, StoredToken>(
            "DELETE FROM refresh_tokens WHERE token = $1 \
             RETURNING id, user_id, token, expires_at, created_at",
        )
        .bind(token)
        .fetch_optional(db)
        .await
        .context("Failed to claim refresh token")
        .map_err(AppError::database)?
        .ok_or_else(|| {
            debug!("refresh attempt with unknown token");
            AppError::unauthorized(anyhow!("Invalid refresh token"))
        })?;

        if claimed.is_expired() {
            debug!(user_id = %claimed.user_id, "refresh attempt with expired token");
            return Err(AppError::unauthorized(anyhow!(
                "Refresh token expired. Please log in again."
            )));
        }

        let user = match UserService::get_user(db, claimed.user_id).await {
            Ok(user) => user,
            Err(err) if err.status == StatusCode::NOT_FOUND => {
                return Err(AppError::unauthorized(anyhow!("Invalid refresh token")));
            }
            Err(err) => return Err(err),
        };

        if !user.enabled {
            debug!(username = %user.username, "refresh attempt on disabled account");
            return Err(AppError::unauthorized(anyhow!("Account is disabled")));
        }

        let access_token = create_access_token(user.id, &user.username, user.role, jwt_config)
            .map_err(|err| AppError::internal(anyhow!("Failed to create access token: {err}")))?;
        let refresh = Self::issue_refresh_token(db, user.id, jwt_config).await?;

        info!(username = %user.username, "refresh token rotated");
        Ok(RefreshResponse {
            access_token,
            refresh_token: refresh.token,
            token_type: TOKEN_TYPE.to_string(),
        })
    }

    /// Deletes the refresh token. Logging out an already-invalid token is
    /// not an error.
    #[instrument(skip_all)]
    pub async fn logout(db: &PgPool, token: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token = $1")
            .bind(token)
            .execute(db)
            .await
            .context("Failed to delete refresh token")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            debug!("logout with unknown refresh token");
        }
        Ok(())
    }

    /// Resolves the claims of an already-verified access token to the
    /// current account record.
    pub async fn current_user(db: &PgPool, claims: &Claims) -> Result<User, AppError> {
        let user_id = claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| AppError::unauthorized(anyhow!("Invalid or expired token")))?;

        match UserService::get_user(db, user_id).await {
            Ok(user) => Ok(user),
            // The token outlived the account.
            Err(err) if err.status == StatusCode::NOT_FOUND => {
                Err(AppError::unauthorized(anyhow!("Invalid or expired token")))
            }
            Err(err) => Err(err),
        }
    }

    /// Issues a password reset token and emails the reset link.
    ///
    /// Succeeds whether or not the email maps to an account so the endpoint
    /// cannot be used to enumerate registered addresses.
    #[instrument(skip_all)]
    pub async fn forgot_password(
        db: &PgPool,
        dto: ForgotPasswordRequest,
        email_service: &EmailService,
    ) -> Result<(), AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&dto.email)
            .fetch_optional(db)
            .await
            .context("Failed to look up user for password reset")
            .map_err(AppError::database)?;

        let Some(user) = user else {
            debug!("password reset requested for unknown email");
            return Ok(());
        };

        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + Duration::seconds(RESET_TOKEN_TTL_SECS);

        sqlx::query(
            "INSERT INTO password_reset_tokens (user_id, token, expires_at) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id) DO UPDATE \
               SET token = EXCLUDED.token, expires_at = EXCLUDED.expires_at, created_at = NOW()",
        )
        .bind(user.id)
        .bind(&token)
        .bind(expires_at)
        .execute(db)
        .await
        .context("Failed to store password reset token")
        .map_err(AppError::database)?;

        email_service
            .send_password_reset_email(&user.email, &token)
            .await?;

        info!(username = %user.username, "password reset email queued");
        Ok(())
    }

    /// Completes a password reset.
    ///
    /// The token is consumed by DELETE .. RETURNING before any check, so it
    /// is single-use even when the request ultimately fails.
    #[instrument(skip_all)]
    pub async fn reset_password(
        db: &PgPool,
        dto: ResetPasswordRequest,
        email_service: &EmailService,
    ) -> Result<(), AppError> {
        let claimed = sqlx::query_as::<_, StoredToken>(
            "DELETE FROM password_reset_tokens WHERE token = $1 \
             RETURNING id, user_id, token, expires_at, created_at",
        )
        .bind(&dto.token)
        .fetch_optional(db)
        .await
        .context("Failed to claim password reset token")
        .map_err(AppError::database)?
        .ok_or_else(|| {
            debug!("password reset with unknown token");
            AppError::bad_request(anyhow!("Invalid password reset token"))
        })?;

        if claimed.is_expired() {
            debug!(user_id = %claimed.user_id, "password reset with expired token");
            return Err(AppError::bad_request(anyhow!(
                "Password reset token has expired"
            )));
        }

        let hashed = hash_password(&dto.new_password)?;
        let email = sqlx::query_scalar::<_, String>(
            "UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1 RETURNING email",
        )
        .bind(claimed.user_id)
        .bind(&hashed)
        .fetch_optional(db)
        .await
        .context("Failed to update password")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::bad_request(anyhow!("Invalid password reset token")))?;

        // A reset invalidates any active session.
        sqlx::query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(claimed.user_id)
            .execute(db)
            .await
            .context("Failed to revoke refresh token")
            .map_err(AppError::database)?;

        if let Err(err) = email_service.send_password_changed_email(&email).await {
            warn!(error = ?err.error, "failed to send password change confirmation");
        }

        info!(user_id = %claimed.user_id, "password reset completed");
        Ok(())
    }
}
