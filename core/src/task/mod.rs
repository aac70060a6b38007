//! # Task coordination
//!
//! Uploaded files become tasks: each gets a UUID, runs the
//! load → clean → validate → predict workflow on a bounded worker pool, and
//! publishes its terminal status and result for polling clients.
//!
//! ## Invariants
//!
//! 1. Status moves `processing → completed` or `processing → failed` exactly once.
//! 2. The status map and the result map each have their own lock, held only for
//!    one map operation; a task never holds both.
//! 3. The status is written before the result, so a result never exists for a
//!    task still reported as `processing`.
//! 4. A failure (or panic) inside one task only ever marks that task failed.

pub mod coordinator;
pub mod registry;
pub mod types;
pub mod workflow;

pub use coordinator::TaskCoordinator;
pub use registry::TaskRegistry;
pub use types::{
    status_label, FailureReport, TaskRecord, TaskResult, TaskStats, TaskStatus,
    UNKNOWN_TASK_STATUS,
};
pub use workflow::{load_clean_validate, PredictionWorkflow, Workflow};
