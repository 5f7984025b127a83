//! Membership directory types and collaborator seams
//!
//! The member directory is owned by the hosting chat platform; Quarterdeck
//! only reads it. Platform adapters implement [`MemberDirectory`] for lookups
//! and [`MemberEditor`] for the nickname/role mutations an approved
//! discharge performs.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable platform user id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberId(pub u64);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable platform role id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleId(pub u64);

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A role within the community's authority ordering
///
/// Roles are compared only by `position` (higher = more authority), never by
/// name or id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub position: i64,
}

/// A community member as read from the directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub display_name: String,
    pub roles: Vec<Role>,
    /// Administrative override capability; bypasses hierarchy checks
    pub is_administrator: bool,
}

impl Member {
    /// The member's highest role by hierarchy position
    pub fn highest_role(&self) -> Option<&Role> {
        self.roles.iter().max_by_key(|r| r.position)
    }

    /// Hierarchy position of the highest role (i64::MIN when roleless)
    pub fn highest_position(&self) -> i64 {
        self.highest_role().map_or(i64::MIN, |r| r.position)
    }

    /// Whether the member currently holds the given role
    pub fn has_role(&self, role: RoleId) -> bool {
        self.roles.iter().any(|r| r.id == role)
    }
}

/// Errors from member resolution
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    #[error("Invalid ID: {0}")]
    InvalidId(String),

    #[error("Member not found: {0}")]
    NotFound(String),

    #[error("Error ({0}): {1}")]
    Other(String, String),
}

/// Read access to the platform's member directory
#[async_trait]
pub trait MemberDirectory: Send + Sync {
    /// Fetch a member by id
    async fn fetch_member(&self, id: MemberId) -> Result<Member, DirectoryError>;
}

/// Errors from platform member mutations, categorized for reporting
#[derive(Debug, Clone, Error)]
pub enum EditError {
    #[error("Missing permissions ({0})")]
    Permission(String),

    #[error("API error ({0})")]
    Transport(String),

    #[error("Unexpected error ({0})")]
    Unexpected(String),
}

/// Write access to member nickname and roles
///
/// `audit_reason` is forwarded to the platform's audit log.
#[async_trait]
pub trait MemberEditor: Send + Sync {
    /// Set a member's nickname
    async fn set_nickname(
        &self,
        id: MemberId,
        nickname: &str,
        audit_reason: &str,
    ) -> Result<(), EditError>;

    /// Replace a member's entire role set
    async fn replace_roles(
        &self,
        id: MemberId,
        roles: &[RoleId],
        audit_reason: &str,
    ) -> Result<(), EditError>;
}
