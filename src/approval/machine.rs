//! Approval state machine
//!
//! Handles approver decisions on pending requests. The approver capability
//! is re-checked at the moment of the decision, not at request construction.
//! A winning `Approved` transition applies the action's effect; targets are
//! processed independently, per-target failures are accumulated, and one
//! aggregate report is produced after the whole batch.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::has_capability;
use crate::directory::{EditError, Member, MemberEditor, RoleId};
use crate::ledger::{Ledger, UserRegistrar};

use super::request::{ApprovalAction, ApprovalRequest, MedalDirection};
use super::store::{RequestStore, TransitionError};
use super::surface::{Decision, ReviewSurface};

/// Aggregate result of applying an approved action
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// One-line outcome summary
    pub headline: String,
    pub succeeded: usize,
    pub attempted: usize,
    /// Per-target failures, in processing order
    pub errors: Vec<String>,
}

impl BatchReport {
    /// The single acknowledgment text for the approver
    pub fn render(&self) -> String {
        let mut text = self.headline.clone();
        if !self.errors.is_empty() {
            text.push_str("\n\nErrors:\n");
            text.push_str(&self.errors.join("\n"));
        }
        text
    }
}

/// Result of one decision attempt
#[derive(Debug, Clone)]
pub enum DecisionOutcome {
    /// Actor lacks the approver capability; state unchanged
    NotAuthorized,
    /// No such request in the store
    NotFound,
    /// A prior decision already won; no effect re-applied
    AlreadyDecided,
    /// Denied: state/visual transition only
    Denied,
    /// Approved: effects applied, aggregate report attached
    Approved(BatchReport),
}

/// Two-outcome workflow over pending requests
pub struct ApprovalStateMachine {
    store: Arc<RequestStore>,
    surface: Arc<dyn ReviewSurface>,
    editor: Arc<dyn MemberEditor>,
    registrar: Arc<UserRegistrar>,
    ledger: Arc<dyn Ledger>,
    approver_role: RoleId,
    /// The two roles that replace a discharged member's role set
    discharge_roles: [RoleId; 2],
}

impl ApprovalStateMachine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<RequestStore>,
        surface: Arc<dyn ReviewSurface>,
        editor: Arc<dyn MemberEditor>,
        registrar: Arc<UserRegistrar>,
        ledger: Arc<dyn Ledger>,
        approver_role: RoleId,
        discharge_roles: [RoleId; 2],
    ) -> Self {
        Self {
            store,
            surface,
            editor,
            registrar,
            ledger,
            approver_role,
            discharge_roles,
        }
    }

    /// Decide a pending request
    pub async fn decide(
        &self,
        actor: &Member,
        request_id: Uuid,
        decision: Decision,
    ) -> DecisionOutcome {
        if !has_capability(actor, self.approver_role) {
            warn!(
                actor = %actor.id,
                %request_id,
                "decision attempt without approver capability"
            );
            return DecisionOutcome::NotAuthorized;
        }

        let request = match self.store.transition(request_id, decision) {
            Ok(request) => request,
            Err(TransitionError::NotFound(_)) => return DecisionOutcome::NotFound,
            Err(TransitionError::AlreadyDecided(_)) => return DecisionOutcome::AlreadyDecided,
        };

        // Finalize the shared surface first so onlookers see the terminal
        // state before effects start landing.
        if let Err(e) = self.surface.finalize(request_id, decision).await {
            warn!(%request_id, error = %e, "failed to finalize review surface");
        }

        match decision {
            Decision::Denied => {
                info!(
                    %request_id,
                    actor = %actor.id,
                    kind = request.action.kind_label(),
                    "request denied"
                );
                DecisionOutcome::Denied
            }
            Decision::Approved => {
                info!(
                    %request_id,
                    actor = %actor.id,
                    kind = request.action.kind_label(),
                    targets = request.action.targets().len(),
                    "request approved, applying effects"
                );
                DecisionOutcome::Approved(self.apply(&request).await)
            }
        }
    }

    async fn apply(&self, request: &ApprovalRequest) -> BatchReport {
        match &request.action {
            ApprovalAction::Discharge { targets } => {
                self.apply_discharge(targets, &request.reason).await
            }
            ApprovalAction::Medal {
                targets,
                medal_name,
                direction,
            } => {
                self.apply_medal(targets, medal_name, *direction, &request.reason)
                    .await
            }
        }
    }

    /// Rename each target and replace its role set; failures never stop the
    /// rest of the batch.
    async fn apply_discharge(&self, targets: &[Member], reason: &str) -> BatchReport {
        let nickname = format!("Discharged for {reason}");
        let audit = format!("Discharge approved - {reason}");
        let roles = self.discharge_roles;

        let mut succeeded = 0;
        let mut errors = Vec::new();

        for target in targets {
            let result = async {
                self.editor.set_nickname(target.id, &nickname, &audit).await?;
                self.editor.replace_roles(target.id, &roles, &audit).await
            }
            .await;

            match result {
                Ok(()) => succeeded += 1,
                Err(e) => {
                    let category = match e {
                        EditError::Permission(_) => "permission",
                        EditError::Transport(_) => "transport",
                        EditError::Unexpected(_) => "unexpected",
                    };
                    warn!(target = %target.id, category, error = %e, "discharge step failed");
                    errors.push(format!("{}: {}", target.display_name, e));
                }
            }
        }

        BatchReport {
            headline: format!(
                "Approved - processed {}/{} member(s). Nickname set to `{}`",
                succeeded,
                targets.len(),
                nickname
            ),
            succeeded,
            attempted: targets.len(),
            errors,
        }
    }

    /// Register and flag each target in the ledger; same independent-failure
    /// policy as discharge.
    async fn apply_medal(
        &self,
        targets: &[Member],
        medal_name: &str,
        direction: MedalDirection,
        reason: &str,
    ) -> BatchReport {
        let mut succeeded = 0;
        let mut errors = Vec::new();

        for target in targets {
            if self.registrar.ensure_registered(target.id).await.is_none() {
                errors.push(format!(
                    "{}: Failed to register in ledger",
                    target.display_name
                ));
                continue;
            }

            if self
                .ledger
                .update_medal(target.id, medal_name, direction.as_flag())
                .await
            {
                succeeded += 1;
            } else {
                errors.push(format!(
                    "{}: Failed to update medal status",
                    target.display_name
                ));
            }
        }

        let mut headline = format!(
            "Approved - {} medal(s) {} for {} member(s).",
            succeeded,
            direction.verb(),
            targets.len()
        );
        if !reason.is_empty() {
            headline.push_str(&format!("\nReason: {reason}"));
        }

        BatchReport {
            headline,
            succeeded,
            attempted: targets.len(),
            errors,
        }
    }
}
