//! Mutual Aid - Association credit and matching engine
//!
//! Members trade work for credit:
//! - Providers hold skills and complete tasks for credit
//! - Producers log products for credit
//! - Authoring a task costs credit and is gated by a floor
//! - Tasks are matched to the least loaded qualified provider
//! - Members below the floor are offered random tasks to recover
//!
//! # Example
//!
//! ```
//! use mutual_aid::Association;
//!
//! let mut amx = Association::new();
//! amx.add_producer("Ana", "00000000001").unwrap();
//! amx.add_provider("Bia", "00000000002").unwrap();
//! let plumber = amx.add_skill("plumber", 2).unwrap();
//! amx.assign_skill("00000000002", plumber).unwrap();
//!
//! let task = amx.create_task("00000000001", "fix the sink", 12, 7).unwrap();
//! amx.tag_task_skill(task, plumber).unwrap();
//! amx.accept_task("00000000002", task).unwrap();
//!
//! assert_eq!(amx.credit_balance("00000000002").unwrap(), 4);
//! assert_eq!(amx.credit_balance("00000000001").unwrap(), -6);
//! ```

// Core modules (order matters for cross-module dependencies)
pub mod types;
pub mod error;
pub mod clock;
pub mod config;
pub mod skills;
pub mod tasks;
pub mod members;
pub mod association;
pub mod cli;

// Feature modules
pub mod simulation;

// Re-export commonly used types for convenience
pub use association::{
    Association,
    RemediationOutcome,
    RemediationReport,
    NO_ELIGIBLE_MEMBERS,
};

pub use error::{AssociationError, ErrorKind, Result};

pub use types::{MemberId, MemberRole, SkillId, TaskId};

pub use skills::{DifficultyTier, Skill};

pub use tasks::Task;

pub use members::{Creditable, Member, MemberKind, Product};

pub use clock::{Clock, FixedClock, SystemClock};

pub use config::Config;

pub use simulation::{simulate, SimulationReport};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get the library info
pub fn info() -> String {
    format!("{} v{} - Association credit and matching engine", NAME, VERSION)
}
