//! JWT claim structure for access tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::role::Role;

/// Claims embedded in access tokens.
///
/// These carry everything the gateway needs for an authorization decision
/// without a database lookup.
///
/// # Fields
///
/// - `sub`: User ID (subject)
/// - `username`: The user's login name
/// - `role`: The user's platform role
/// - `exp`: Token expiration timestamp
/// - `iat`: Token issued-at timestamp
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    /// The user's login name
    pub username: String,
    /// The user's platform role
    pub role: Role,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}
