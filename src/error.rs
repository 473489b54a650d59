//! Error hierarchy for the association engine
//!
//! Every fallible core operation returns [`AssociationError`]. The four
//! top-level variants map to the four kinds of failure a caller may want to
//! react to differently; [`AssociationError::kind`] flattens them for matching.

use thiserror::Error;

use crate::types::{MemberId, SkillId, TaskId};

// ─── Top-level error ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssociationError {
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),

    #[error("conflict: {0}")]
    Conflict(#[from] ConflictError),

    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),

    #[error("policy: {0}")]
    Policy(#[from] PolicyError),
}

/// Coarse error category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Policy,
}

impl AssociationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AssociationError::Validation(_) => ErrorKind::Validation,
            AssociationError::Conflict(_) => ErrorKind::Conflict,
            AssociationError::NotFound(_) => ErrorKind::NotFound,
            AssociationError::Policy(_) => ErrorKind::Policy,
        }
    }

    /// True for the insufficient-credit gate, the usual trigger for remediation
    pub fn is_insufficient_credit(&self) -> bool {
        matches!(
            self,
            AssociationError::Policy(PolicyError::InsufficientCredit { .. })
        )
    }
}

// ─── Validation ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("skill points must be 1, 2 or 3 (got {0})")]
    SkillPoints(i64),

    #[error("product points must be 1, 2, 3 or 5 (got {0})")]
    ProductPoints(i64),

    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: i64 },

    #[error("{field} is too large (got {value}, max {max})")]
    TooLarge { field: &'static str, value: i64, max: i64 },
}

// ─── Conflict ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConflictError {
    #[error("a member with cpf {0} is already registered")]
    DuplicateCpf(String),

    #[error("member {0} is already registered")]
    DuplicateMemberId(MemberId),

    #[error("skill {0} is already registered")]
    DuplicateSkillId(SkillId),

    #[error("a skill named '{0}' is already registered")]
    DuplicateSkillName(String),

    #[error("task {0} is already registered")]
    DuplicateTaskId(TaskId),

    #[error("task {task} was already accepted by member {provider}")]
    AlreadyAccepted { task: TaskId, provider: MemberId },

    #[error("task {0} is finalized; its required skills are frozen")]
    TaskFinalized(TaskId),

    #[error("task {0} is already completed")]
    AlreadyCompleted(TaskId),

    #[error("schedule variance is only defined for completed tasks (task {0} is open)")]
    TaskNotCompleted(TaskId),
}

// ─── Not found ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundError {
    #[error("no member with cpf {0}")]
    Member(String),

    #[error("no member with id {0}")]
    MemberId(MemberId),

    #[error("no skill with id {0}")]
    Skill(SkillId),

    #[error("no task with id {0}")]
    Task(TaskId),
}

// ─── Policy ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("insufficient credit to author a task: balance {balance} is below the floor of {floor}")]
    InsufficientCredit { balance: i64, floor: i64 },

    #[error("member {provider} lacks skills required by task {task}: {}", missing.join(", "))]
    MissingSkills {
        task: TaskId,
        provider: MemberId,
        missing: Vec<String>,
    },

    #[error("member {0} is not a provider")]
    NotAProvider(String),

    #[error("member {0} is not a producer")]
    NotAProducer(String),

    #[error("no provider holds every skill required by task {0}")]
    NoEligibleProvider(TaskId),
}

pub type Result<T> = std::result::Result<T, AssociationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err: AssociationError = ValidationError::Empty("name").into();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err: AssociationError = PolicyError::InsufficientCredit { balance: -11, floor: -10 }.into();
        assert_eq!(err.kind(), ErrorKind::Policy);
        assert!(err.is_insufficient_credit());

        let err: AssociationError = NotFoundError::Task(TaskId(4)).into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(!err.is_insufficient_credit());
    }

    #[test]
    fn test_missing_skills_message() {
        let err = PolicyError::MissingSkills {
            task: TaskId(3),
            provider: MemberId(1),
            missing: vec!["painter".to_string(), "plumber".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "member 1 lacks skills required by task 3: painter, plumber"
        );
    }
}
