use sqlx::PgPool;

use mukando_auth::Role;
use mukando_core::password::hash_password;

/// Creates an enabled SUPERADMIN account.
///
/// Returns `true` when the account was created and `false` when a user with
/// that username already exists, so the command can be re-run safely.
pub async fn create_super_admin(
    db: &PgPool,
    username: &str,
    email: &str,
    password: &str,
) -> Result<bool, Box<dyn std::error::Error>> {
    let hashed_password =
        hash_password(password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let result = sqlx::query(
        "INSERT INTO users (username, email, password, role, enabled)
         VALUES ($1, $2, $3, $4, TRUE)
         ON CONFLICT (username) DO NOTHING",
    )
    .bind(username)
    .bind(email)
    .bind(hashed_password)
    .bind(Role::SuperAdmin)
    .execute(db)
    .await?;

    Ok(result.rows_affected() > 0)
}
