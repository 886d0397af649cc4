use sqlx::PgPool;

use mukando_config::{CorsConfig, EmailConfig, JwtConfig};
use mukando_db::init_db_pool;

use crate::utils::email::EmailService;

/// Shared application state for the API service.
///
/// Cheap to clone: the pool is reference-counted internally and everything
/// else is read-only configuration loaded at startup.
#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub email: EmailService,
}

pub async fn init_app_state() -> AppState {
    AppState {
        db: init_db_pool().await,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        email: EmailService::new(EmailConfig::from_env()),
    }
}
