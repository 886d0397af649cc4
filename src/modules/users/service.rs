use anyhow::{Context, anyhow};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use mukando_auth::Role;
use mukando_core::errors::AppError;
use mukando_core::pagination::{PaginationMeta, PaginationParams};
use mukando_core::password::{hash_password, verify_password};

use super::model::{CreateUserDto, PaginatedUsersResponse, USER_COLUMNS, UpdateUserDto, User};

pub struct UserService;

impl UserService {
    #[instrument(skip(db, dto), fields(username = %dto.username))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        let username_taken = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE username = $1")
            .bind(&dto.username)
            .fetch_optional(db)
            .await?;
        if username_taken.is_some() {
            return Err(AppError::conflict(anyhow!("Username already exists")));
        }

        let email_taken = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE email = $1")
            .bind(&dto.email)
            .fetch_optional(db)
            .await?;
        if email_taken.is_some() {
            return Err(AppError::conflict(anyhow!("Email already exists")));
        }

        let hashed_password = hash_password(&dto.password)?;
        let role = dto.role.unwrap_or(Role::Member);

        let sql = format!(
            "INSERT INTO users (username, email, password, first_name, last_name, phone_number, \
             address, city, country, role) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(&dto.username)
            .bind(&dto.email)
            .bind(&hashed_password)
            .bind(&dto.first_name)
            .bind(&dto.last_name)
            .bind(&dto.phone_number)
            .bind(&dto.address)
            .bind(&dto.city)
            .bind(&dto.country)
            .bind(role)
            .fetch_one(db)
            .await
            .context("Failed to insert user")
            .map_err(AppError::database)?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn get_users(
        db: &PgPool,
        params: PaginationParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let limit = params.limit();
        let offset = params.offset();

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(db)
            .await
            .context("Failed to count users")
            .map_err(AppError::database)?;

        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        let users = sqlx::query_as::<_, User>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(db)
            .await
            .context("Failed to fetch users")
            .map_err(AppError::database)?;

        let has_more = offset + (users.len() as i64) < total;

        Ok(PaginatedUsersResponse {
            data: users,
            meta: PaginationMeta {
                total,
                limit,
                offset,
                has_more,
            },
        })
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
            .context("Failed to fetch user by ID")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow!("User with id {} not found", id)))?;

        Ok(user)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_user(db: &PgPool, id: Uuid, dto: UpdateUserDto) -> Result<User, AppError> {
        let current = Self::get_user(db, id).await?;

        if dto.is_empty() {
            return Ok(current);
        }

        // A changed email must stay unique across other accounts.
        if let Some(email) = &dto.email
            && email != &current.email
        {
            let taken = sqlx::query_scalar::<_, Uuid>(
                "SELECT id FROM users WHERE email = $1 AND id != $2",
            )
            .bind(email)
            .bind(id)
            .fetch_optional(db)
            .await?;
            if taken.is_some() {
                return Err(AppError::conflict(anyhow!("Email already exists")));
            }
        }

        let sql = format!(
            "UPDATE users SET \
               email = COALESCE($2, email), \
               first_name = COALESCE($3, first_name), \
               last_name = COALESCE($4, last_name), \
               phone_number = COALESCE($5, phone_number), \
               address = COALESCE($6, address), \
               city = COALESCE($7, city), \
               country = COALESCE($8, country), \
               updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&dto.email)
            .bind(&dto.first_name)
            .bind(&dto.last_name)
            .bind(&dto.phone_number)
            .bind(&dto.address)
            .bind(&dto.city)
            .bind(&dto.country)
            .fetch_one(db)
            .await
            .context("Failed to update user")
            .map_err(AppError::database)?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete user")
            .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("User with id {} not found", id)));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn assign_role(db: &PgPool, id: Uuid, role: Role) -> Result<User, AppError> {
        let sql = format!(
            "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(role)
            .fetch_optional(db)
            .await
            .context("Failed to assign role")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow!("User with id {} not found", id)))?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn update_status(db: &PgPool, id: Uuid, enabled: bool) -> Result<User, AppError> {
        let sql = format!(
            "UPDATE users SET enabled = $2, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(enabled)
            .fetch_optional(db)
            .await
            .context("Failed to update user status")
            .map_err(AppError::database)?
            .ok_or_else(|| AppError::not_found(anyhow!("User with id {} not found", id)))?;

        Ok(user)
    }

    #[instrument(skip(db, current_password, new_password))]
    pub async fn change_password(
        db: &PgPool,
        id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let stored_hash = sqlx::query_scalar::<_, String>("SELECT password FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User with id {} not found", id)))?;

        if !verify_password(current_password, &stored_hash)? {
            return Err(AppError::unauthorized(anyhow!("Current password is incorrect")));
        }

        let hashed = hash_password(new_password)?;
        sqlx::query("UPDATE users SET password = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(&hashed)
            .execute(db)
            .await
            .context("Failed to update password")
            .map_err(AppError::database)?;

        Ok(())
    }
}
