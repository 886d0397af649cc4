//! Utility modules for the Mukando API.
//!
//! Error handling, pagination, and password hashing live in `mukando-core`
//! so the gateway can share them; what remains here is specific to this
//! service:
//!
//! - [`email`]: outbound email for the password reset flow

pub mod email;
