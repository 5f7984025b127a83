//! Capability guard
//!
//! A capability is held by holding a named role. This is a pure membership
//! test against the actor's current role set, independent of hierarchy
//! validation; every mutating command checks it before doing anything else.

use crate::directory::{Member, RoleId};

/// Whether the actor currently holds the capability role
pub fn has_capability(actor: &Member, capability: RoleId) -> bool {
    actor.has_role(capability)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{member_with_roles, role};

    #[test]
    fn test_holder_passes() {
        let actor = member_with_roles(1, vec![role(100, 5)]);
        assert!(has_capability(&actor, RoleId(100)));
    }

    #[test]
    fn test_non_holder_fails() {
        let actor = member_with_roles(1, vec![role(100, 5)]);
        assert!(!has_capability(&actor, RoleId(200)));
    }

    #[test]
    fn test_roleless_actor_fails() {
        let actor = member_with_roles(1, vec![]);
        assert!(!has_capability(&actor, RoleId(100)));
    }
}
