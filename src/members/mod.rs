//! Members of the association
//!
//! A member is either a provider (skills, task fulfilment) or a producer
//! (products). Balances are always derived from history, never stored.

pub mod member;
pub mod provider;
pub mod producer;

pub use member::{Member, MemberKind};
pub use producer::{ProducerProfile, Product, POINTS_PER_CREDIT, PRODUCT_POINT_VALUES};
pub use provider::ProviderProfile;

use crate::tasks::TaskBook;

/// Type-specific earned component of a credit balance
pub trait Creditable {
    fn earned(&self, tasks: &TaskBook) -> i64;
}
