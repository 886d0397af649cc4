//! # Mukando Gateway
//!
//! The authenticating API gateway for the Mukando backend.
//!
//! Every request passes one gate before anything else happens:
//!
//! 1. Inbound identity headers (`X-User-Id`, `X-Username`, `X-User-Role`)
//!    are stripped; only the gate may set them.
//! 2. Public path prefixes (`/auth`, docs, `/health`) pass through untouched.
//! 3. Everything else needs a `Bearer` access token that decodes and
//!    verifies; failures answer 401 with one generic message while the log
//!    records the exact failure kind.
//! 4. The [`policy::RolePolicy`] table maps path prefixes to allowed roles;
//!    a mismatch answers 403.
//! 5. Verified identity is written into the trust headers and the request
//!    is forwarded to the upstream selected by the route table.
//!
//! The gate holds only immutable shared state ([`state::GatewayState`]
//! behind an `Arc`), so concurrent requests need no synchronization.
//!
//! ## Modules
//!
//! - [`gate`]: The authentication/authorization middleware
//! - [`policy`]: Path-prefix role policy table
//! - [`proxy`]: Buffered reverse proxy to the upstream services
//! - [`router`]: Router assembly
//! - [`state`]: Shared gateway state

pub mod gate;
pub mod policy;
pub mod proxy;
pub mod router;
pub mod state;
