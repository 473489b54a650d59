//! Tasks: requested work and its lifecycle

pub mod task;

pub use task::{Completion, Task};

use std::collections::BTreeMap;

use crate::types::TaskId;

/// All tasks of an association, in creation order
pub type TaskBook = BTreeMap<TaskId, Task>;
