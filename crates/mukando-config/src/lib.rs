//! # Mukando Config
//!
//! Configuration types for the Mukando backend.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`jwt`]: JWT authentication configuration
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`email`]: Email/SMTP configuration
//! - [`server`]: API service bind address
//! - [`gateway`]: Gateway bind address and upstream route table
//!
//! # Example
//!
//! ```ignore
//! use mukando_config::{JwtConfig, CorsConfig, EmailConfig, ServerConfig};
//!
//! // Load all configs from environment
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let email_config = EmailConfig::from_env();
//! let server_config = ServerConfig::from_env();
//! ```

pub mod cors;
pub mod email;
pub mod gateway;
pub mod jwt;
pub mod server;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use email::EmailConfig;
pub use gateway::{GatewayConfig, RouteTable};
pub use jwt::JwtConfig;
pub use server::ServerConfig;
