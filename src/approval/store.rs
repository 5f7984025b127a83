//! In-memory keyed store for pending requests
//!
//! The state transition is a compare-and-swap against the stored state:
//! `Pending -> terminal` succeeds only while the stored state is still
//! `Pending`. Two approvers racing on the same request (or one
//! double-clicking) get exactly one winner; the loser sees
//! [`TransitionError::AlreadyDecided`] and no effect is re-applied.

use dashmap::DashMap;
use thiserror::Error;
use uuid::Uuid;

use super::request::{ApprovalRequest, RequestState};
use super::surface::Decision;

/// Transition failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Request {0} not found")]
    NotFound(Uuid),

    #[error("Request {0} has already been decided")]
    AlreadyDecided(Uuid),
}

/// Request store keyed by request id
///
/// Decided requests are retained, not evicted: a late decision attempt on a
/// still-visible surface must answer "already decided" rather than "not
/// found". The map is bounded by the process lifetime; nothing persists
/// across a restart.
#[derive(Default)]
pub struct RequestStore {
    requests: DashMap<Uuid, ApprovalRequest>,
}

impl RequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a newly built pending request
    pub fn insert(&self, request: ApprovalRequest) {
        self.requests.insert(request.id, request);
    }

    /// Drop a request (used when posting to the surface fails)
    pub fn remove(&self, id: Uuid) {
        self.requests.remove(&id);
    }

    /// Snapshot of a request by id
    pub fn get(&self, id: Uuid) -> Option<ApprovalRequest> {
        self.requests.get(&id).map(|r| r.value().clone())
    }

    /// Compare-and-swap the request from Pending to the decided state
    ///
    /// Returns the decided request snapshot on success. The dashmap entry
    /// guard serializes concurrent callers, so at most one transition wins.
    pub fn transition(
        &self,
        id: Uuid,
        decision: Decision,
    ) -> Result<ApprovalRequest, TransitionError> {
        let mut entry = self
            .requests
            .get_mut(&id)
            .ok_or(TransitionError::NotFound(id))?;

        if entry.state != RequestState::Pending {
            return Err(TransitionError::AlreadyDecided(id));
        }

        entry.state = match decision {
            Decision::Approved => RequestState::Approved,
            Decision::Denied => RequestState::Denied,
        };

        Ok(entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}
