//! Approval workflow - pending requests and the two-outcome decision machine

pub mod machine;
pub mod request;
pub mod store;
pub mod surface;

pub use machine::{ApprovalStateMachine, BatchReport, DecisionOutcome};
pub use request::{ApprovalAction, ApprovalRequest, MedalDirection, RequestState};
pub use store::{RequestStore, TransitionError};
pub use surface::{Decision, ReviewSurface, SurfaceError};
