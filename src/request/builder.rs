//! Request Builder - turn raw operator input into a pending request
//!
//! Raw target identifiers arrive as one whitespace-separated string. Each
//! identifier resolves independently; failures are collected rather than
//! thrown on first error. The build fails only when zero targets resolve,
//! when a discharge batch trips hierarchy validation, or when an award names
//! a medal type absent from the registry.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::approval::{ApprovalAction, ApprovalRequest, MedalDirection};
use crate::auth::hierarchy::{self, HierarchyViolation};
use crate::directory::{Member, MemberDirectory, MemberId};
use crate::ledger::Ledger;

/// Fatal, batch-aborting build failures
///
/// The `Display` text is the operator-facing remediation message.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("No valid targets.{}", format_notes(.errors))]
    NoTargets { errors: Vec<String> },

    #[error("{}", format_violations(.violations, *.ignored_allowed))]
    HierarchyViolations {
        violations: Vec<HierarchyViolation>,
        /// How many otherwise-valid targets were ignored by the abort
        ignored_allowed: usize,
    },

    #[error("Medal '{medal_name}' doesn't exist.\nExisting medals: {}", format_known(.known))]
    UnknownMedal {
        medal_name: String,
        known: Vec<String>,
    },
}

fn format_notes(errors: &[String]) -> String {
    if errors.is_empty() {
        String::new()
    } else {
        format!("\n{}", errors.join("\n"))
    }
}

fn format_violations(violations: &[HierarchyViolation], ignored_allowed: usize) -> String {
    let mut text = String::from("Cannot discharge members with higher roles:\n");
    let lines: Vec<String> = violations.iter().map(|v| v.describe()).collect();
    text.push_str(&lines.join("\n"));
    if ignored_allowed > 0 {
        text.push_str("\n\nNote: other valid targets were ignored due to hierarchy violations.");
    }
    text
}

fn format_known(known: &[String]) -> String {
    if known.is_empty() {
        "No medal types configured yet. Add one first.".to_string()
    } else {
        known.join(", ")
    }
}

/// Builds validated pending requests from raw input
pub struct RequestBuilder {
    directory: Arc<dyn MemberDirectory>,
    ledger: Arc<dyn Ledger>,
}

impl RequestBuilder {
    pub fn new(directory: Arc<dyn MemberDirectory>, ledger: Arc<dyn Ledger>) -> Self {
        Self { directory, ledger }
    }

    /// Resolve whitespace-separated identifiers, collecting per-id errors
    async fn resolve_targets(&self, raw_ids: &str) -> (Vec<Member>, Vec<String>) {
        let mut targets = Vec::new();
        let mut errors = Vec::new();

        for token in raw_ids.split_whitespace() {
            let id = match token.parse::<u64>() {
                Ok(id) => MemberId(id),
                Err(_) => {
                    errors.push(format!("Invalid ID: {token}"));
                    continue;
                }
            };

            match self.directory.fetch_member(id).await {
                Ok(member) => targets.push(member),
                Err(e) => errors.push(e.to_string()),
            }
        }

        debug!(
            resolved = targets.len(),
            failed = errors.len(),
            "resolved raw target identifiers"
        );
        (targets, errors)
    }

    /// Build a discharge request
    ///
    /// Hierarchy validation runs after resolution; any violation aborts the
    /// whole batch even when other targets were valid.
    pub async fn build_discharge(
        &self,
        requester: &Member,
        raw_ids: &str,
        reason: &str,
    ) -> Result<ApprovalRequest, BuildError> {
        let (resolved, errors) = self.resolve_targets(raw_ids).await;

        let outcome = hierarchy::validate(requester, resolved, requester.is_administrator);
        if !outcome.is_clear() {
            return Err(BuildError::HierarchyViolations {
                ignored_allowed: outcome.allowed.len(),
                violations: outcome.violations,
            });
        }

        if outcome.allowed.is_empty() {
            return Err(BuildError::NoTargets { errors });
        }

        Ok(ApprovalRequest::new(
            requester.clone(),
            ApprovalAction::Discharge {
                targets: outcome.allowed,
            },
            reason.to_string(),
            errors,
        ))
    }

    /// Build a medal award or removal request
    ///
    /// Awards require the medal type to already exist in the registry;
    /// removals skip the check so a stale flag can still be cleared after
    /// its medal type was deleted.
    pub async fn build_medal(
        &self,
        requester: &Member,
        raw_ids: &str,
        medal_name: &str,
        reason: &str,
        direction: MedalDirection,
    ) -> Result<ApprovalRequest, BuildError> {
        if direction == MedalDirection::Award {
            let known = self.ledger.medal_types().await;
            if !known.iter().any(|m| m == medal_name) {
                return Err(BuildError::UnknownMedal {
                    medal_name: medal_name.to_string(),
                    known,
                });
            }
        }

        let (targets, errors) = self.resolve_targets(raw_ids).await;
        if targets.is_empty() {
            return Err(BuildError::NoTargets { errors });
        }

        Ok(ApprovalRequest::new(
            requester.clone(),
            ApprovalAction::Medal {
                targets,
                medal_name: medal_name.to_string(),
                direction,
            },
            reason.to_string(),
            errors,
        ))
    }
}
