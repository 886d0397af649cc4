//! # Mukando Auth
//!
//! Authentication types and JWT utilities for the Mukando backend.
//!
//! This crate provides:
//!
//! - [`role`]: The platform role enum ([`Role`])
//! - [`claims`]: JWT claim structure for access tokens ([`Claims`])
//! - [`jwt`]: Token creation and decoding
//! - [`error`]: Decoding failure kinds ([`TokenError`])
//!
//! Access tokens are HMAC-SHA-256 signed JWTs carrying the user id as the
//! subject plus the username and role needed for gateway authorization.
//! Refresh tokens are not JWTs; they are opaque single-use strings stored
//! server-side by the auth service.
//!
//! # Example
//!
//! ```ignore
//! use mukando_auth::{Role, create_access_token, decode_access_token};
//! use mukando_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//!
//! // Create an access token
//! let token = create_access_token(user_id, "tendai", Role::Member, &config)?;
//!
//! // Decode and verify it
//! let claims = decode_access_token(&token, &config)?;
//! println!("User ID: {}", claims.sub);
//! ```

pub mod claims;
pub mod error;
pub mod jwt;
pub mod role;

/// Trusted identity headers.
///
/// The gateway strips these from every inbound request and sets them from
/// verified claims before forwarding; services behind the gateway read
/// identity from them and from nothing else.
pub mod headers {
    pub const X_USER_ID: &str = "x-user-id";
    pub const X_USERNAME: &str = "x-username";
    pub const X_USER_ROLE: &str = "x-user-role";
}

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use error::TokenError;
pub use jwt::{create_access_token, decode_access_token};
pub use role::Role;
