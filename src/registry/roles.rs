// src/registry/roles.rs
//! Role membership table.

use crate::models::role::Role;
use ethers::types::Address;
use std::collections::{BTreeMap, BTreeSet};

/// Tracks which principals hold which roles.
///
/// Membership is an independent fact per (role, principal) pair. Grants and
/// revocations are internal primitives; callers outside the registry go
/// through the guarded operations on [`Registry`](super::Registry).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleRegistry {
    members: BTreeMap<Role, BTreeSet<Address>>,
}

impl RoleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_role(&self, role: Role, principal: Address) -> bool {
        self.members
            .get(&role)
            .map_or(false, |holders| holders.contains(&principal))
    }

    pub fn is_organization(&self, principal: Address) -> bool {
        self.has_role(Role::Organization, principal)
    }

    /// Returns `true` if the principal did not already hold the role.
    pub(crate) fn grant_role(&mut self, role: Role, principal: Address) -> bool {
        self.members.entry(role).or_default().insert(principal)
    }

    /// Returns `true` if the principal held the role.
    pub(crate) fn revoke_role(&mut self, role: Role, principal: Address) -> bool {
        self.members
            .get_mut(&role)
            .map_or(false, |holders| holders.remove(&principal))
    }

    /// All holders of a role in address order.
    pub fn holders(&self, role: Role) -> impl Iterator<Item = Address> + '_ {
        self.members.get(&role).into_iter().flatten().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_and_revoke() {
        let mut roles = RoleRegistry::new();
        let alice = Address::repeat_byte(1);

        assert!(!roles.has_role(Role::University, alice));
        assert!(roles.grant_role(Role::University, alice));
        assert!(!roles.grant_role(Role::University, alice));
        assert!(roles.has_role(Role::University, alice));

        assert!(roles.revoke_role(Role::University, alice));
        assert!(!roles.revoke_role(Role::University, alice));
        assert!(!roles.has_role(Role::University, alice));
    }

    #[test]
    fn test_roles_are_independent() {
        let mut roles = RoleRegistry::new();
        let alice = Address::repeat_byte(1);

        roles.grant_role(Role::Organization, alice);
        roles.grant_role(Role::University, alice);
        roles.revoke_role(Role::University, alice);

        assert!(roles.is_organization(alice));
        assert!(!roles.has_role(Role::University, alice));
        assert!(!roles.has_role(Role::Certifier, alice));
    }

    #[test]
    fn test_holders_are_sorted() {
        let mut roles = RoleRegistry::new();
        roles.grant_role(Role::Certifier, Address::repeat_byte(9));
        roles.grant_role(Role::Certifier, Address::repeat_byte(3));

        let holders: Vec<_> = roles.holders(Role::Certifier).collect();
        assert_eq!(holders, vec![Address::repeat_byte(3), Address::repeat_byte(9)]);
        assert_eq!(roles.holders(Role::Organization).count(), 0);
    }
}
