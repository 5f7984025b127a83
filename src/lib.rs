//! Quarterdeck - approval-gated personnel and decoration management
//!
//! Quarterdeck mediates privileged, human-reviewed state changes inside a
//! membership community: discharging members (nickname + role replacement)
//! and mutating a per-member medal ledger held in a remote tabular store.
//!
//! ## Services
//!
//! - **Auth**: capability checks and role-hierarchy validation
//! - **Ledger**: RPC facade over the spreadsheet-backed medal store
//! - **Approval**: two-outcome request workflow (pending -> approved | denied)
//! - **Commands**: capability-gated entry points for operators
//!
//! The chat-platform connection, command registration and rendering live
//! outside this crate; they plug in through the `MemberDirectory`,
//! `MemberEditor` and `ReviewSurface` traits.

pub mod approval;
pub mod auth;
pub mod commands;
pub mod config;
pub mod directory;
pub mod ledger;
pub mod request;
pub mod types;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::Args;
pub use types::{QuarterdeckError, Result};
