//! The platform role enum.
//!
//! Every user holds exactly one role. The wire form (JWT claim, `X-User-Role`
//! header, database column) is the uppercase name, e.g. `"SUPERADMIN"`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum Role {
    #[serde(rename = "SUPERADMIN")]
    #[cfg_attr(feature = "db", sqlx(rename = "SUPERADMIN"))]
    SuperAdmin,
    #[serde(rename = "ADMIN")]
    #[cfg_attr(feature = "db", sqlx(rename = "ADMIN"))]
    Admin,
    #[serde(rename = "TREASURER")]
    #[cfg_attr(feature = "db", sqlx(rename = "TREASURER"))]
    Treasurer,
    #[serde(rename = "MEMBER")]
    #[cfg_attr(feature = "db", sqlx(rename = "MEMBER"))]
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SUPERADMIN",
            Role::Admin => "ADMIN",
            Role::Treasurer => "TREASURER",
            Role::Member => "MEMBER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SUPERADMIN" => Ok(Role::SuperAdmin),
            "ADMIN" => Ok(Role::Admin),
            "TREASURER" => Ok(Role::Treasurer),
            "MEMBER" => Ok(Role::Member),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_form_round_trip() {
        for role in [Role::SuperAdmin, Role::Admin, Role::Treasurer, Role::Member] {
            let parsed: Role = role.as_str().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" Treasurer ".parse::<Role>().unwrap(), Role::Treasurer);
    }

    #[test]
    fn test_role_parse_unknown() {
        assert!("MANAGER".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_uses_uppercase_names() {
        let serialized = serde_json::to_string(&Role::SuperAdmin).unwrap();
        assert_eq!(serialized, r#""SUPERADMIN""#);

        let role: Role = serde_json::from_str(r#""MEMBER""#).unwrap();
        assert_eq!(role, Role::Member);
    }

    #[test]
    fn test_role_serde_rejects_unknown_variant() {
        let result: Result<Role, _> = serde_json::from_str(r#""MANAGER""#);
        assert!(result.is_err());
    }
}
