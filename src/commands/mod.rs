//! Command surface - capability-gated entry points
//!
//! One method per operator command. Every mutating command enforces its own
//! capability check before touching the core, and every terminal outcome
//! produces exactly one [`Reply`] for the acting user. Decisions
//! additionally finalize the shared review surface through the state
//! machine.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::approval::{
    ApprovalStateMachine, Decision, DecisionOutcome, MedalDirection, RequestStore, ReviewSurface,
};
use crate::auth::has_capability;
use crate::directory::{Member, RoleId};
use crate::ledger::Ledger;
use crate::request::RequestBuilder;

/// A single acknowledgment for the acting user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    /// Private replies are visible only to the acting user
    pub private: bool,
}

impl Reply {
    pub fn private(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            private: true,
        }
    }

    pub fn public(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            private: false,
        }
    }
}

/// Longest distribution block rendered in a stats reply
const MAX_DISTRIBUTION_CHARS: usize = 1000;

/// The operator-facing command surface
pub struct CommandService {
    builder: RequestBuilder,
    machine: Arc<ApprovalStateMachine>,
    store: Arc<RequestStore>,
    surface: Arc<dyn ReviewSurface>,
    ledger: Arc<dyn Ledger>,
    requester_role: RoleId,
    approver_role: RoleId,
}

impl CommandService {
    pub fn new(
        builder: RequestBuilder,
        machine: Arc<ApprovalStateMachine>,
        store: Arc<RequestStore>,
        surface: Arc<dyn ReviewSurface>,
        ledger: Arc<dyn Ledger>,
        requester_role: RoleId,
        approver_role: RoleId,
    ) -> Self {
        Self {
            builder,
            machine,
            store,
            surface,
            ledger,
            requester_role,
            approver_role,
        }
    }

    /// Submit a discharge request for review
    pub async fn request_discharge(&self, actor: &Member, raw_ids: &str, reason: &str) -> Reply {
        if !has_capability(actor, self.requester_role) {
            return Reply::private("You lack permission to request discharges.");
        }

        match self.builder.build_discharge(actor, raw_ids, reason).await {
            Err(e) => Reply::private(e.to_string()),
            Ok(request) => self.post_for_review(request).await,
        }
    }

    /// Submit a medal award request for review
    pub async fn request_medal_award(
        &self,
        actor: &Member,
        raw_ids: &str,
        medal_name: &str,
        reason: &str,
    ) -> Reply {
        self.request_medal(actor, raw_ids, medal_name, reason, MedalDirection::Award)
            .await
    }

    /// Submit a medal removal request for review
    pub async fn request_medal_removal(
        &self,
        actor: &Member,
        raw_ids: &str,
        medal_name: &str,
        reason: &str,
    ) -> Reply {
        self.request_medal(actor, raw_ids, medal_name, reason, MedalDirection::Removal)
            .await
    }

    async fn request_medal(
        &self,
        actor: &Member,
        raw_ids: &str,
        medal_name: &str,
        reason: &str,
        direction: MedalDirection,
    ) -> Reply {
        if !has_capability(actor, self.requester_role) {
            return Reply::private(format!(
                "You lack permission to request medal {}s.",
                match direction {
                    MedalDirection::Award => "award",
                    MedalDirection::Removal => "removal",
                }
            ));
        }

        match self
            .builder
            .build_medal(actor, raw_ids, medal_name, reason, direction)
            .await
        {
            Err(e) => Reply::private(e.to_string()),
            Ok(request) => self.post_for_review(request).await,
        }
    }

    /// Track the request and post it to the review surface
    async fn post_for_review(&self, request: crate::approval::ApprovalRequest) -> Reply {
        let id = request.id;
        let kind = request.action.kind_label();
        self.store.insert(request.clone());

        if let Err(e) = self.surface.post_pending(&request).await {
            // Nothing was applied; forget the request rather than leave an
            // undecidable pending entry behind.
            self.store.remove(id);
            return Reply::private(format!("Could not post request for review: {e}"));
        }

        info!(request_id = %id, kind, "request posted for review");
        Reply::private("Request submitted for review.")
    }

    /// Decide a pending request (approve/deny button press)
    pub async fn decide(&self, actor: &Member, request_id: Uuid, decision: Decision) -> Reply {
        match self.machine.decide(actor, request_id, decision).await {
            DecisionOutcome::NotAuthorized => {
                Reply::private("Only approved personnel can confirm.")
            }
            DecisionOutcome::NotFound => Reply::private("Request not found."),
            DecisionOutcome::AlreadyDecided => {
                Reply::private("This request has already been decided.")
            }
            DecisionOutcome::Denied => Reply::private("Request denied."),
            DecisionOutcome::Approved(report) => Reply::private(report.render()),
        }
    }

    /// Show a member's medals (no capability required)
    ///
    /// Callers pass the acting member when no explicit target was given.
    pub async fn show_medals(&self, target: &Member) -> Reply {
        let medals = self.ledger.get_user_medals(target.id).await;

        if medals.is_empty() {
            return Reply::public(format!(
                "{} has no medals awarded yet.",
                target.display_name
            ));
        }

        let lines: Vec<String> = medals.iter().map(|m| format!("- {m}")).collect();
        Reply::public(format!(
            "{}'s medals ({} total):\n{}",
            target.display_name,
            medals.len(),
            lines.join("\n")
        ))
    }

    /// Add a medal type to the registry (approver only)
    pub async fn add_medal_type(&self, actor: &Member, medal_name: &str) -> Reply {
        if !has_capability(actor, self.approver_role) {
            return Reply::private("You lack permission to add medal types.");
        }

        if self.ledger.add_medal_type(medal_name).await {
            info!(medal_name, actor = %actor.id, "medal type added");
            Reply::private(format!("Medal type added: {medal_name}"))
        } else {
            Reply::private(format!("Failed to add medal type '{medal_name}'."))
        }
    }

    /// Delete a medal type from the registry (approver only)
    pub async fn delete_medal_type(&self, actor: &Member, medal_name: &str, reason: &str) -> Reply {
        if !has_capability(actor, self.approver_role) {
            return Reply::private("You lack permission to delete medal types.");
        }

        if self.ledger.delete_medal_type(medal_name).await {
            info!(medal_name, actor = %actor.id, reason, "medal type deleted");
            Reply::private(format!("Medal type deleted: {medal_name}\nReason: {reason}"))
        } else {
            Reply::private(format!("Failed to delete medal type '{medal_name}'."))
        }
    }

    /// List all medal types (no capability required)
    pub async fn list_medal_types(&self) -> Reply {
        let types = self.ledger.medal_types().await;

        if types.is_empty() {
            return Reply::private(
                "No medal types configured yet. An approver must add one first.",
            );
        }

        let lines: Vec<String> = types.iter().map(|m| format!("- {m}")).collect();
        Reply::public(format!(
            "Available medal types ({} total):\n{}",
            types.len(),
            lines.join("\n")
        ))
    }

    /// Show aggregate medal statistics (no capability required)
    pub async fn medal_stats(&self) -> Reply {
        let stats = match self.ledger.medal_stats().await {
            Some(stats) => stats,
            None => return Reply::private("Could not retrieve medal statistics."),
        };

        let mut text = format!(
            "Medal statistics\nTotal members: {}\nTotal medal types: {}",
            stats.total_users, stats.total_medal_types
        );

        if let Some(most) = &stats.most_awarded {
            text.push_str(&format!(
                "\nMost awarded: {} ({} awards)",
                most.name, most.count
            ));
        }

        if !stats.medal_distribution.is_empty() {
            let lines: Vec<String> = stats
                .medal_distribution
                .iter()
                .map(|(name, count)| format!("{name}: {count} awards"))
                .collect();
            let mut block = lines.join("\n");
            if block.len() > MAX_DISTRIBUTION_CHARS {
                // Medal names are arbitrary UTF-8; cut at a char boundary.
                let cut = (0..=MAX_DISTRIBUTION_CHARS)
                    .rev()
                    .find(|&i| block.is_char_boundary(i))
                    .unwrap_or(0);
                block.truncate(cut);
                block.push_str("...");
            }
            text.push_str(&format!("\nDistribution:\n{block}"));
        }

        Reply::public(text)
    }

    /// Probe ledger connectivity (approver only)
    pub async fn connectivity_test(&self, actor: &Member) -> Reply {
        if !has_capability(actor, self.approver_role) {
            return Reply::private("Only approvers can test the connection.");
        }

        if !self.ledger.probe().await {
            return Reply::private("Connection test failed: no response from ledger.");
        }

        let types = self.ledger.medal_types().await;
        Reply::private(format!(
            "Connection test successful. Found {} medal type(s).",
            types.len()
        ))
    }
}
