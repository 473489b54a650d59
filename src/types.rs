//! Shared types used across modules
//!
//! Entity ids live here so that skills, tasks and members can refer to each
//! other without circular module dependencies.

use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }
    };
}

entity_id!(
    /// Identifier of a registered skill
    SkillId
);
entity_id!(
    /// Identifier of a task
    TaskId
);
entity_id!(
    /// Identifier of an association member
    MemberId
);

/// Monotonic id generator for one entity kind, owned by a registry instance
#[derive(Debug)]
pub struct IdSequence<T> {
    next: u64,
    _kind: PhantomData<T>,
}

impl<T: From<u64>> IdSequence<T> {
    pub fn new() -> Self {
        Self {
            next: 1,
            _kind: PhantomData,
        }
    }

    /// Issue the next id
    pub fn next_id(&mut self) -> T {
        let id = self.next;
        self.next += 1;
        T::from(id)
    }
}

impl<T: From<u64>> Default for IdSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Capability tag of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    Provider,
    Producer,
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberRole::Provider => write!(f, "Provider"),
            MemberRole::Producer => write!(f, "Producer"),
        }
    }
}
