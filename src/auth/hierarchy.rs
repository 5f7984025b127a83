//! Role-hierarchy validation for discharge requests
//!
//! A requester may only target members whose authority does not exceed their
//! own. A target is a violation iff it holds at least one role that the
//! requester does not hold and whose hierarchy position strictly exceeds the
//! requester's highest-role position. Administrators bypass the check
//! entirely.
//!
//! Any violation aborts the whole batch: the allowed subset is still
//! computed (so the caller can say how many valid targets were ignored) but
//! is never processed. Discharge is all-or-nothing with respect to
//! hierarchy safety.

use crate::directory::{Member, Role};

/// A target that the requester is not permitted to act on
#[derive(Debug, Clone)]
pub struct HierarchyViolation {
    pub member: Member,
    /// The target's roles that outrank the requester
    pub offending_roles: Vec<Role>,
}

impl HierarchyViolation {
    /// Human-readable justification for the denial
    pub fn describe(&self) -> String {
        let names: Vec<&str> = self.offending_roles.iter().map(|r| r.name.as_str()).collect();
        format!(
            "{} ({}) has higher role(s): {}",
            self.member.display_name,
            self.member.id,
            names.join(", ")
        )
    }
}

/// Per-target allow/deny decisions for one batch
#[derive(Debug, Clone, Default)]
pub struct HierarchyOutcome {
    pub allowed: Vec<Member>,
    pub violations: Vec<HierarchyViolation>,
}

impl HierarchyOutcome {
    /// Whether the batch may proceed
    pub fn is_clear(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Validate a batch of targets against the requester's authority
pub fn validate(
    requester: &Member,
    targets: Vec<Member>,
    administrator_override: bool,
) -> HierarchyOutcome {
    if administrator_override {
        return HierarchyOutcome {
            allowed: targets,
            violations: Vec::new(),
        };
    }

    let ceiling = requester.highest_position();
    let mut outcome = HierarchyOutcome::default();

    for target in targets {
        let offending: Vec<Role> = target
            .roles
            .iter()
            .filter(|r| !requester.has_role(r.id) && r.position > ceiling)
            .cloned()
            .collect();

        if offending.is_empty() {
            outcome.allowed.push(target);
        } else {
            outcome.violations.push(HierarchyViolation {
                member: target,
                offending_roles: offending,
            });
        }
    }

    outcome
}
