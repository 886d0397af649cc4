//! # Mukando Core
//!
//! Core types, errors, and utilities for the Mukando backend.
//!
//! This crate provides foundational types used by the API service and the gateway:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`logging`]: Request logging middleware
//! - [`pagination`]: Pagination utilities for list endpoints
//! - [`password`]: Secure password hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use mukando_core::errors::AppError;
//! use mukando_core::pagination::PaginationParams;
//! use mukando_core::password::{hash_password, verify_password};
//!
//! // Create an error
//! let error = AppError::not_found(anyhow::anyhow!("User not found"));
//!
//! // Hash a password
//! let hash = hash_password("secure_password")?;
//!
//! // Use pagination
//! let params = PaginationParams::default();
//! let limit = params.limit();
//! ```

pub mod errors;
pub mod logging;
pub mod pagination;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{Paginated, PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_password};
