//! Review surface seam
//!
//! The review surface is the shared artifact (message plus decision
//! controls) that represents a pending request to approver-capability
//! holders. The platform adapter implements posting and finalization;
//! finalization removes the decision controls and recolors the status
//! indicator so everyone who can see the surface sees the terminal state.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use super::request::ApprovalRequest;

/// The two terminal decisions an approver can make
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Denied,
}

/// Errors from the review surface
#[derive(Debug, Clone, Error)]
pub enum SurfaceError {
    #[error("Review surface unavailable: {0}")]
    Unavailable(String),
}

/// The shared review surface for pending requests
#[async_trait]
pub trait ReviewSurface: Send + Sync {
    /// Post a pending request for approver review
    async fn post_pending(&self, request: &ApprovalRequest) -> Result<(), SurfaceError>;

    /// Mark the posted request terminal: strip controls, recolor status
    async fn finalize(&self, request_id: Uuid, decision: Decision) -> Result<(), SurfaceError>;
}
