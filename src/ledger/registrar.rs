//! User Registrar - find-or-create ledger registration
//!
//! A member must have a row in the ledger before any per-member flag can be
//! written. The remote store enforces no uniqueness constraint, so a naive
//! check-then-act can race and create duplicate rows; registrations for a
//! given member id are serialized through a per-member async mutex instead.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::directory::MemberId;

use super::Ledger;

/// Ensures members are registered in the ledger before flag writes
pub struct UserRegistrar {
    ledger: Arc<dyn Ledger>,
    /// Per-member registration locks. Never evicted: one mutex per member
    /// id ever registered through this process, bounded by the community's
    /// membership.
    locks: DashMap<MemberId, Arc<Mutex<()>>>,
}

impl UserRegistrar {
    /// Create a new registrar over the given ledger
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self {
            ledger,
            locks: DashMap::new(),
        }
    }

    /// Find the member's ledger row, creating it if absent
    ///
    /// Returns `None` when the ledger gives no result at any step.
    pub async fn ensure_registered(&self, member_id: MemberId) -> Option<i64> {
        let lock = self
            .locks
            .entry(member_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        if let Some(row) = self.ledger.find_user_row(member_id).await {
            debug!(%member_id, row, "member already registered");
            return Some(row);
        }

        self.ledger.add_user(member_id).await?;
        let row = self.ledger.find_user_row(member_id).await;
        if let Some(row) = row {
            info!(%member_id, row, "registered member in ledger");
        }
        row
    }
}
