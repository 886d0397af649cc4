//! Gateway bind address and upstream route table.
//!
//! Routes are declared in `GATEWAY_ROUTES` as a semicolon-separated list of
//! `prefix=base_url` pairs, for example:
//!
//! ```text
//! GATEWAY_ROUTES=/auth=http://localhost:8081;/users=http://localhost:8081
//! ```
//!
//! The most specific (longest) matching prefix wins, so a `/` entry can act
//! as a catch-all behind more specific routes.

use std::env;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteTarget {
    pub prefix: String,
    pub upstream: String,
}

#[derive(Clone, Debug)]
pub struct RouteTable {
    routes: Vec<RouteTarget>,
}

impl RouteTable {
    /// Parses a `prefix=base_url;prefix=base_url` list, skipping entries
    /// that are missing either side.
    pub fn parse(spec: &str) -> Self {
        let routes = spec
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|entry| {
                let (prefix, upstream) = entry.split_once('=')?;
                let prefix = prefix.trim();
                let upstream = upstream.trim().trim_end_matches('/');
                if prefix.is_empty() || upstream.is_empty() {
                    tracing::warn!(entry, "skipping malformed gateway route");
                    return None;
                }
                Some(RouteTarget {
                    prefix: prefix.to_string(),
                    upstream: upstream.to_string(),
                })
            })
            .collect();

        Self { routes }
    }

    /// Returns the upstream base URL for the longest prefix matching `path`.
    pub fn upstream_for(&self, path: &str) -> Option<&str> {
        self.routes
            .iter()
            .filter(|r| path.starts_with(&r.prefix))
            .max_by_key(|r| r.prefix.len())
            .map(|r| r.upstream.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub bind_addr: String,
    pub routes: RouteTable,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        let spec = env::var("GATEWAY_ROUTES")
            .unwrap_or_else(|_| "/=http://localhost:8081".to_string());

        Self {
            bind_addr: env::var("GATEWAY_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            routes: RouteTable::parse(&spec),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_route() {
        let table = RouteTable::parse("/auth=http://localhost:8081");
        assert_eq!(table.upstream_for("/auth/login"), Some("http://localhost:8081"));
    }

    #[test]
    fn test_parse_multiple_routes() {
        let table =
            RouteTable::parse("/auth=http://auth:8081;/users=http://users:8082");
        assert_eq!(table.upstream_for("/auth/login"), Some("http://auth:8081"));
        assert_eq!(table.upstream_for("/users/123"), Some("http://users:8082"));
    }

    #[test]
    fn test_longest_prefix_wins() {
        let table = RouteTable::parse("/=http://core:8081;/reports=http://reporting:8090");
        assert_eq!(table.upstream_for("/reports/monthly"), Some("http://reporting:8090"));
        assert_eq!(table.upstream_for("/loans"), Some("http://core:8081"));
    }

    #[test]
    fn test_unmatched_path_has_no_upstream() {
        let table = RouteTable::parse("/auth=http://auth:8081");
        assert_eq!(table.upstream_for("/groups"), None);
    }

    #[test]
    fn test_trailing_slash_stripped_from_upstream() {
        let table = RouteTable::parse("/auth=http://localhost:8081/");
        assert_eq!(table.upstream_for("/auth"), Some("http://localhost:8081"));
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let table = RouteTable::parse("nonsense;=http://x;/auth=;/users=http://users:8082");
        assert!(table.upstream_for("/auth").is_none());
        assert_eq!(table.upstream_for("/users"), Some("http://users:8082"));
    }

    #[test]
    fn test_empty_spec() {
        let table = RouteTable::parse("");
        assert!(table.is_empty());
    }
}
