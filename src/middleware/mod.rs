//! Middleware and extractors for request processing.
//!
//! The API service normally sits behind the gateway, which has already
//! verified the caller's JWT and forwards the identity as trusted headers
//! (`X-User-Id`, `X-Username`, `X-User-Role`).
//!
//! - [`auth`]: extractors reading that forwarded identity ([`auth::AuthUser`])
//!   or decoding a bearer token directly ([`auth::BearerUser`])
//! - [`role`]: role-gating middleware for admin-only route groups
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//!
//! async fn get_profile(auth_user: AuthUser) -> impl IntoResponse {
//!     // auth_user.user_id is the verified caller
//! }
//! ```

pub mod auth;
pub mod role;
