// src/models/role.rs
//! Roles of the three-tier trust hierarchy.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A role a principal may hold.
///
/// Roles are not mutually exclusive: the seed organization can also join as
/// a university, and every role is tracked as an independent set membership.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Root authority. Manages organizations and universities.
    Organization,
    /// Delegated authority. Manages its own certifiers.
    University,
    /// Leaf identity that registers certificates.
    Certifier,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Organization, Role::University, Role::Certifier];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Organization => "organization",
            Role::University => "university",
            Role::Certifier => "certifier",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a role.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role `{0}`")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}
