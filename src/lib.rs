/*!
 * Scheduling Simulator Library
 * Discrete-tick CPU scheduling with exclusive resources and
 * priority-inversion avoidance
 */

pub mod core;
pub mod monitoring;
pub mod process;
pub mod queue;
pub mod resource;
pub mod scheduler;
pub mod simulation;

// Re-exports
pub use crate::core::errors::{SimError, SimResult};
pub use crate::core::types::{Pid, Priority, ResourceId, Tick};
pub use monitoring::init_tracing;
pub use process::{Process, ProcessStatus};
pub use resource::{BoostMode, Resource, ResourceProtocol};
pub use scheduler::{Policy, Scheduler, SchedulerOps, SchedulerStats};
pub use simulation::{
    SharedSimulation, SimConfig, Simulation, SimulationReport, SimulationState, Workload,
};
