/*!
 * Simulation Module
 * Shared simulation state, configuration, workloads and the tick driver
 */

pub mod config;
pub mod driver;
mod invariants;
pub mod shared;
pub mod state;
pub mod workload;

pub use config::SimConfig;
pub use driver::{Completion, Simulation, SimulationReport, StepOutcome};
pub use shared::SharedSimulation;
pub use state::SimulationState;
pub use workload::{ProcessSpec, ResourceDemand, Workload};
