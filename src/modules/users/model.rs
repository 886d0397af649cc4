//! User data models and DTOs.
//!
//! This module contains all data structures related to user management,
//! including the user entity and the request/response DTOs for the admin
//! and self-service endpoints.
//!
//! # Core Types
//!
//! - [`User`] - Base user entity from the database (never carries the
//!   password hash)
//!
//! # Request DTOs
//!
//! - [`CreateUserDto`] - Create a new user (admin)
//! - [`UpdateUserDto`] - Partial update of contact and profile fields
//! - [`AssignRoleDto`] - Change a user's role (admin)
//! - [`StatusParams`] - Enable or disable an account (admin)
//! - [`ChangePasswordDto`] - Change own password

use mukando_auth::Role;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// A user in the system.
///
/// This struct represents the user entity as it is returned to clients.
/// The password hash lives in the same database row but is never selected
/// into this type, so it cannot leak through serialization.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub role: Role,
    pub enabled: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Column list matching the field order of [`User`].
///
/// Every query that returns a user selects exactly these columns.
pub const USER_COLUMNS: &str = "id, username, email, first_name, last_name, phone_number, \
     address, city, country, role, enabled, created_at, updated_at";

/// DTO for creating a new user.
///
/// Used by admins to provision accounts directly, typically for group
/// treasurers or other members who did not self-register.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(length(max = 20))]
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    /// Role to assign. Defaults to `MEMBER` when absent.
    pub role: Option<Role>,
}

/// DTO for updating a user's contact and profile fields.
///
/// All fields are optional; only the fields present in the request are
/// changed. Username, password, and role have their own endpoints.
#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct UpdateUserDto {
    #[validate(email)]
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[validate(length(max = 20))]
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
}

impl UpdateUserDto {
    /// Returns true when no field is present, i.e. there is nothing to do.
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone_number.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.country.is_none()
    }
}

/// DTO for assigning a role to a user.
#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct AssignRoleDto {
    pub role: Role,
}

/// Query parameters for enabling or disabling an account.
#[derive(Deserialize, Debug, Clone, IntoParams, ToSchema)]
pub struct StatusParams {
    pub enabled: bool,
}

/// DTO for changing the caller's own password.
///
/// Requires the current password for verification before
/// allowing the password change.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordDto {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 8))]
    #[schema(example = "newPassword123")]
    pub new_password: String,
}

/// Paginated response containing users.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub data: Vec<User>,
    pub meta: mukando_core::PaginationMeta,
}
