//! Authorization: capability checks and role-hierarchy validation

pub mod guard;
pub mod hierarchy;

pub use guard::has_capability;
pub use hierarchy::{validate, HierarchyOutcome, HierarchyViolation};
