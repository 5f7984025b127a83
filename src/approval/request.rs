//! Approval request types
//!
//! An `ApprovalRequest` is created Pending by the request builder, posted to
//! the review surface, and transitions state exactly once. It lives only in
//! memory; a process restart loses any pending request.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::directory::Member;

/// Direction of a medal ledger mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MedalDirection {
    Award,
    Removal,
}

impl MedalDirection {
    /// The flag value written to the ledger
    pub fn as_flag(&self) -> bool {
        matches!(self, MedalDirection::Award)
    }

    /// Past-tense verb for reports
    pub fn verb(&self) -> &'static str {
        match self {
            MedalDirection::Award => "awarded",
            MedalDirection::Removal => "removed",
        }
    }
}

/// The action a request proposes
#[derive(Debug, Clone)]
pub enum ApprovalAction {
    /// Revoke standing: templated nickname + role replacement
    Discharge { targets: Vec<Member> },
    /// Set or clear one medal flag per target
    Medal {
        targets: Vec<Member>,
        medal_name: String,
        direction: MedalDirection,
    },
}

impl ApprovalAction {
    /// The proposed targets, in submission order
    pub fn targets(&self) -> &[Member] {
        match self {
            ApprovalAction::Discharge { targets } => targets,
            ApprovalAction::Medal { targets, .. } => targets,
        }
    }

    /// Short label for logging and surface titles
    pub fn kind_label(&self) -> &'static str {
        match self {
            ApprovalAction::Discharge { .. } => "discharge",
            ApprovalAction::Medal {
                direction: MedalDirection::Award,
                ..
            } => "medal award",
            ApprovalAction::Medal {
                direction: MedalDirection::Removal,
                ..
            } => "medal removal",
        }
    }
}

/// Workflow state; both non-pending states are terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Pending,
    Approved,
    Denied,
}

impl RequestState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestState::Pending)
    }
}

/// A pending (or decided) change proposal
#[derive(Debug, Clone)]
pub struct ApprovalRequest {
    pub id: Uuid,
    pub requester: Member,
    pub action: ApprovalAction,
    pub reason: String,
    pub state: RequestState,
    pub created_at: DateTime<Utc>,
    /// Per-identifier resolution errors carried as information only
    pub resolution_notes: Vec<String>,
}

impl ApprovalRequest {
    /// Create a new pending request
    pub fn new(
        requester: Member,
        action: ApprovalAction,
        reason: String,
        resolution_notes: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            requester,
            action,
            reason,
            state: RequestState::Pending,
            created_at: Utc::now(),
            resolution_notes,
        }
    }

    /// Human-readable summary for the review surface
    pub fn summary(&self) -> String {
        let targets: Vec<String> = self
            .action
            .targets()
            .iter()
            .map(|m| format!("{} ({})", m.display_name, m.id))
            .collect();

        let mut text = format!(
            "New {} request from {}\nTargets:\n{}\nReason: {}",
            self.action.kind_label(),
            self.requester.display_name,
            targets.join("\n"),
            self.reason
        );

        if let ApprovalAction::Medal { medal_name, .. } = &self.action {
            text.push_str(&format!("\nMedal: {medal_name}"));
        }

        if !self.resolution_notes.is_empty() {
            text.push_str(&format!(
                "\nUnresolved identifiers:\n{}",
                self.resolution_notes.join("\n")
            ));
        }

        text
    }
}
