//! Authentication module.
//!
//! Registration, login, refresh token rotation, logout, and the password
//! reset flow. Access tokens are issued here and verified at the gateway;
//! refresh and reset tokens are opaque single-use strings stored in the
//! database.

pub mod controller;
pub mod model;
pub mod router;
pub mod service;

pub use model::*;
pub use router::init_auth_router;
