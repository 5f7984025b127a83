//! Configuration for Quarterdeck
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;

use crate::directory::RoleId;
use crate::ledger::LedgerConfig;

/// Quarterdeck - approval-gated personnel and decoration management
#[derive(Parser, Debug, Clone)]
#[command(name = "quarterdeck")]
#[command(about = "Approval workflow core for community personnel and medals")]
pub struct Args {
    /// Medal ledger web-app endpoint URL
    /// (e.g., "https://script.example.com/macros/s/xxx/exec")
    #[arg(long, env = "LEDGER_URL")]
    pub ledger_url: String,

    /// Role permitted to submit discharge and medal change requests
    #[arg(long, env = "REQUESTER_ROLE_ID")]
    pub requester_role_id: u64,

    /// Role permitted to approve or deny pending requests
    #[arg(long, env = "APPROVER_ROLE_ID")]
    pub approver_role_id: u64,

    /// First role assigned to a member on approved discharge
    #[arg(long, env = "DISCHARGE_ROLE_1_ID")]
    pub discharge_role_1_id: u64,

    /// Second role assigned to a member on approved discharge
    #[arg(long, env = "DISCHARGE_ROLE_2_ID")]
    pub discharge_role_2_id: u64,

    /// Channel hosting the shared review surface for pending requests
    #[arg(long, env = "APPROVAL_CHANNEL_ID")]
    pub approval_channel_id: u64,

    /// Ledger request timeout in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value = "30000")]
    pub request_timeout_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Requester capability role
    pub fn requester_role(&self) -> RoleId {
        RoleId(self.requester_role_id)
    }

    /// Approver capability role
    pub fn approver_role(&self) -> RoleId {
        RoleId(self.approver_role_id)
    }

    /// The two roles that replace a discharged member's role set
    pub fn discharge_roles(&self) -> [RoleId; 2] {
        [RoleId(self.discharge_role_1_id), RoleId(self.discharge_role_2_id)]
    }

    /// Ledger client configuration derived from these args
    pub fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig {
            base_url: self.ledger_url.clone(),
            timeout_ms: self.request_timeout_ms,
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.ledger_url.is_empty() {
            return Err("LEDGER_URL must not be empty".to_string());
        }

        if !self.ledger_url.starts_with("http://") && !self.ledger_url.starts_with("https://") {
            return Err("LEDGER_URL must be an http(s) URL".to_string());
        }

        if self.discharge_role_1_id == self.discharge_role_2_id {
            return Err("discharge roles must be two distinct roles".to_string());
        }

        Ok(())
    }
}
