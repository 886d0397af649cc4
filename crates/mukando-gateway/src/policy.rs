//! The role policy table.
//!
//! Authorization at the gateway is a static table mapping path prefixes to
//! the roles allowed through. The table is plain data: it can be built,
//! inspected, and unit tested like any other value.
//!
//! Matching picks the longest prefix with an entry, on path segment
//! boundaries, so the `/loans` rule does not govern `/loansharks`. Paths
//! with no matching rule require authentication but no particular role.

use mukando_auth::Role;

/// One path-prefix rule: who may pass.
#[derive(Clone, Debug)]
pub struct PolicyRule {
    pub prefix: String,
    pub allowed: Vec<Role>,
}

#[derive(Clone, Debug)]
pub struct RolePolicy {
    public_prefixes: Vec<String>,
    rules: Vec<PolicyRule>,
}

impl RolePolicy {
    pub fn new(public_prefixes: Vec<String>, rules: Vec<PolicyRule>) -> Self {
        Self {
            public_prefixes,
            rules,
        }
    }

    /// The platform policy table.
    ///
    /// Public prefixes skip token checks entirely; the rules restrict
    /// roles per path family.
    pub fn defaults() -> Self {
        use Role::*;

        let rule = |prefix: &str, allowed: &[Role]| PolicyRule {
            prefix: prefix.to_string(),
            allowed: allowed.to_vec(),
        };

        Self::new(
            vec![
                "/auth".to_string(),
                "/swagger-ui".to_string(),
                "/api-docs".to_string(),
                "/scalar".to_string(),
                "/health".to_string(),
            ],
            vec![
                rule("/admin", &[SuperAdmin, Admin]),
                rule("/groups", &[SuperAdmin, Admin, Treasurer]),
                rule("/contributions", &[SuperAdmin, Treasurer, Member]),
                rule("/loans", &[SuperAdmin, Admin, Treasurer, Member]),
                rule("/reports", &[SuperAdmin, Admin, Treasurer]),
                rule("/users", &[SuperAdmin, Admin]),
                rule("/notifications", &[SuperAdmin, Admin]),
            ],
        )
    }

    /// Whether the path bypasses token checks.
    pub fn is_public(&self, path: &str) -> bool {
        self.public_prefixes
            .iter()
            .any(|p| prefix_matches(p, path))
    }

    /// Returns the allowed roles of the longest matching rule, or `None`
    /// when no rule governs the path.
    pub fn allowed_roles(&self, path: &str) -> Option<&[Role]> {
        self.rules
            .iter()
            .filter(|r| prefix_matches(&r.prefix, path))
            .max_by_key(|r| r.prefix.len())
            .map(|r| r.allowed.as_slice())
    }
}

/// Matches on whole path segments: `/loans` covers `/loans` and
/// `/loans/42` but not `/loansharks`. A bare `/` matches everything.
pub(crate) fn prefix_matches(prefix: &str, path: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_not_allowed_on_admin_paths() {
        let policy = RolePolicy::defaults();
        let allowed = policy.allowed_roles("/admin/settings").unwrap();
        assert!(!allowed.contains(&Role::Member));
        assert!(allowed.contains(&Role::Admin));
        assert!(allowed.contains(&Role::SuperAdmin));
    }

    #[test]
    fn test_member_allowed_on_contributions() {
        let policy = RolePolicy::defaults();
        let allowed = policy.allowed_roles("/contributions").unwrap();
        assert!(allowed.contains(&Role::Member));
        assert!(!allowed.contains(&Role::Admin));
    }

    #[test]
    fn test_every_role_allowed_on_loans() {
        let policy = RolePolicy::defaults();
        let allowed = policy.allowed_roles("/loans/42/repayments").unwrap();
        for role in [Role::SuperAdmin, Role::Admin, Role::Treasurer, Role::Member] {
            assert!(allowed.contains(&role), "{role} should be allowed on /loans");
        }
    }

    #[test]
    fn test_users_paths_are_admin_only() {
        let policy = RolePolicy::defaults();
        let allowed = policy.allowed_roles("/users/8f7c1d7e").unwrap();
        assert_eq!(allowed, &[Role::SuperAdmin, Role::Admin]);
    }

    #[test]
    fn test_unlisted_prefix_has_no_rule() {
        let policy = RolePolicy::defaults();
        assert!(policy.allowed_roles("/savings").is_none());
    }

    #[test]
    fn test_auth_paths_are_public() {
        let policy = RolePolicy::defaults();
        assert!(policy.is_public("/auth/login"));
        assert!(policy.is_public("/auth"));
        assert!(policy.is_public("/health"));
        assert!(!policy.is_public("/users"));
    }

    #[test]
    fn test_prefix_requires_segment_boundary() {
        let policy = RolePolicy::defaults();
        assert!(!policy.is_public("/authors"));
        assert!(policy.allowed_roles("/loansharks").is_none());
    }

    #[test]
    fn test_longest_prefix_wins() {
        let policy = RolePolicy::new(
            vec![],
            vec![
                PolicyRule {
                    prefix: "/reports".to_string(),
                    allowed: vec![Role::Admin, Role::Treasurer],
                },
                PolicyRule {
                    prefix: "/reports/audit".to_string(),
                    allowed: vec![Role::SuperAdmin],
                },
            ],
        );

        assert_eq!(
            policy.allowed_roles("/reports/audit/2024"),
            Some(&[Role::SuperAdmin][..])
        );
        assert_eq!(
            policy.allowed_roles("/reports/monthly"),
            Some(&[Role::Admin, Role::Treasurer][..])
        );
    }

    #[test]
    fn test_rule_order_does_not_matter() {
        let mut rules = vec![
            PolicyRule {
                prefix: "/reports/audit".to_string(),
                allowed: vec![Role::SuperAdmin],
            },
            PolicyRule {
                prefix: "/reports".to_string(),
                allowed: vec![Role::Admin],
            },
        ];

        let forward = RolePolicy::new(vec![], rules.clone());
        rules.reverse();
        let backward = RolePolicy::new(vec![], rules);

        assert_eq!(
            forward.allowed_roles("/reports/audit"),
            backward.allowed_roles("/reports/audit")
        );
    }
}
