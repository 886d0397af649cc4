use mukando_config::{JwtConfig, RouteTable};

use crate::policy::RolePolicy;

/// Immutable state shared by every gateway request.
///
/// Wrapped in an `Arc` by the router; nothing here mutates after startup.
#[derive(Clone, Debug)]
pub struct GatewayState {
    pub jwt_config: JwtConfig,
    pub policy: RolePolicy,
    pub routes: RouteTable,
    pub http: reqwest::Client,
}

impl GatewayState {
    pub fn new(jwt_config: JwtConfig, policy: RolePolicy, routes: RouteTable) -> Self {
        Self {
            jwt_config,
            policy,
            routes,
            http: reqwest::Client::new(),
        }
    }
}
