//! The association registry and the policy that runs on top of it
//!
//! - `registry`: ownership, id issuance, registration, lookups, lifecycle
//! - `matching`: best-provider selection and qualified-provider listings
//! - `remediation`: randomized task offers for members below the credit floor
//! - `reports`: read-only aggregates

pub mod registry;
pub mod matching;
pub mod remediation;
pub mod reports;

pub use registry::Association;
pub use matching::NO_ELIGIBLE_MEMBERS;
pub use remediation::{RemediationOutcome, RemediationReport};
pub use reports::{AssociationSummary, MemberSummary, TaskSummary};
