//! Medal ledger - RPC facade over the spreadsheet-backed store
//!
//! The ledger holds one row per member (column A is the member id) and one
//! column per medal type (row 1 is the medal-type registry). Every operation
//! is a single named remote call; see [`client::LedgerClient`] for the wire
//! contract and failure normalization.

pub mod client;
pub mod registrar;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::directory::MemberId;

pub use client::{LedgerClient, LedgerConfig};
pub use registrar::UserRegistrar;

/// The medal ledger operations
///
/// Failures are uniformly collapsed: callers get "no result" (`None`, an
/// empty list or `false`) and cannot distinguish a transport error from a
/// bad response body. No operation retries.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Row number for a member, or None when absent (or on failure)
    async fn find_user_row(&self, user_id: MemberId) -> Option<i64>;

    /// Append a row for a member; returns the new row number
    async fn add_user(&self, user_id: MemberId) -> Option<i64>;

    /// Medal names currently held by a member (empty on failure)
    async fn get_user_medals(&self, user_id: MemberId) -> Vec<String>;

    /// Set or clear one medal flag for a member
    async fn update_medal(&self, user_id: MemberId, medal_name: &str, has_medal: bool) -> bool;

    /// All medal types in the registry (empty on failure)
    async fn medal_types(&self) -> Vec<String>;

    /// Add a medal type to the registry
    async fn add_medal_type(&self, medal_name: &str) -> bool;

    /// Delete a medal type from the registry
    async fn delete_medal_type(&self, medal_name: &str) -> bool;

    /// Aggregate statistics over the whole ledger
    async fn medal_stats(&self) -> Option<MedalStats>;

    /// Connectivity probe
    async fn probe(&self) -> bool;
}

/// Aggregate statistics payload from the ledger
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedalStats {
    #[serde(default)]
    pub total_users: u64,

    #[serde(default)]
    pub total_medal_types: u64,

    #[serde(default)]
    pub most_awarded: Option<MostAwarded>,

    /// Award counts per medal name, ordered for stable rendering
    #[serde(default)]
    pub medal_distribution: BTreeMap<String, u64>,
}

/// The single most-awarded medal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MostAwarded {
    pub name: String,
    pub count: u64,
}
