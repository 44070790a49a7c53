/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::{Pid, Priority, ResourceId, Tick};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for every simulator entry point
pub type SimResult<T> = Result<T, SimError>;

/// Simulator errors with serialization support
///
/// A blocked `acquire` and an idle `schedule` are normal outcomes and never
/// show up here. Everything below aborts the current simulation step.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SimError {
    #[error("Process {0} not found")]
    #[diagnostic(
        code(process::not_found),
        help("The process may have exited or was never spawned. Check PID validity.")
    )]
    ProcessNotFound(Pid),

    #[error("Resource {resource} out of range (table holds {limit})")]
    #[diagnostic(
        code(resource::invalid),
        help("Resource ids are indices into the fixed resource table.")
    )]
    InvalidResource { resource: ResourceId, limit: usize },

    #[error("No current process for {0}")]
    #[diagnostic(
        code(scheduler::no_current),
        help("acquire/release are issued on behalf of the running process; call schedule first.")
    )]
    NoCurrentProcess(String),

    #[error("Process {caller} released resource {resource} owned by {owner}")]
    #[diagnostic(
        code(resource::not_owner),
        help("Only the owner may release a resource.")
    )]
    NotOwner {
        resource: ResourceId,
        owner: Pid,
        caller: Pid,
    },

    #[error("Process {caller} released resource {resource} which has no owner")]
    #[diagnostic(code(resource::not_held))]
    ResourceNotHeld { resource: ResourceId, caller: Pid },

    #[error("Process {pid} already owns resource {resource}")]
    #[diagnostic(
        code(resource::already_owned),
        help("Resources are not reentrant; acquiring one twice would block forever.")
    )]
    AlreadyOwned { resource: ResourceId, pid: Pid },

    #[error("Queue corrupted: {0}")]
    #[diagnostic(
        code(queue::corrupted),
        help("A process link disagrees with the list it claims to be on.")
    )]
    QueueCorrupted(String),

    #[error("Invariant violation: {0}")]
    #[diagnostic(code(simulation::invariant))]
    InvariantViolation(String),

    #[error("Priority {priority} exceeds maximum ({max})")]
    #[diagnostic(code(process::invalid_priority))]
    InvalidPriority { priority: Priority, max: Priority },

    #[error("Lifespan must be at least 1 tick, got {0}")]
    #[diagnostic(code(process::invalid_lifespan))]
    InvalidLifespan(u32),

    #[error("Process {pid} cannot exit: {reason}")]
    #[diagnostic(
        code(process::busy),
        help("Exiting processes must be off every queue and hold no resources.")
    )]
    ProcessBusy { pid: Pid, reason: String },

    #[error("Deadlock at tick {tick}: {waiting} process(es) blocked with nothing runnable")]
    #[diagnostic(
        code(scheduler::deadlock_detected),
        help("Circular resource dependency between processes. Review the workload.")
    )]
    Deadlock { tick: Tick, waiting: usize },

    #[error("Invalid scheduling policy: {0}")]
    #[diagnostic(
        code(scheduler::invalid_policy),
        help("Use fifo, sjf, srtf, rr, prio, pcp or pip.")
    )]
    InvalidPolicy(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(
        code(simulation::configuration_error),
        help("Invalid configuration. Review configuration parameters.")
    )]
    Configuration(String),

    #[error("Workload error: {0}")]
    #[diagnostic(code(workload::invalid))]
    Workload(String),

    #[error("I/O error: {0}")]
    #[diagnostic(
        code(simulation::io_error),
        help("Filesystem operation failed. Check the workload path and permissions.")
    )]
    Io(String),
}

impl SimError {
    /// Whether this error means the shared state can no longer be trusted
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            SimError::NotOwner { .. }
                | SimError::ResourceNotHeld { .. }
                | SimError::AlreadyOwned { .. }
                | SimError::QueueCorrupted(_)
                | SimError::InvariantViolation(_)
        )
    }
}

impl From<std::io::Error> for SimError {
    fn from(err: std::io::Error) -> Self {
        SimError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SimError {
    fn from(err: serde_json::Error) -> Self {
        SimError::Workload(err.to_string())
    }
}
