/*!
 * Scheduler Module
 * Scheduling policies and the descriptor that binds them to a resource
 * protocol
 */

mod operations;
pub mod stats;
pub mod traits;
pub mod types;

// Re-export public API
pub use stats::SchedulerStats;
pub use traits::SchedulerOps;
pub use types::{Policy, Selection};

use crate::core::errors::SimResult;
use crate::core::types::{Pid, ResourceId};
use crate::resource::ResourceProtocol;
use crate::simulation::SimulationState;
use log::info;

/// Immutable scheduler descriptor
///
/// Chosen once when a simulation starts. The resource protocol is fixed by
/// the policy, so the ceiling/inheritance mode never changes mid-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduler {
    policy: Policy,
    protocol: ResourceProtocol,
}

impl Scheduler {
    pub fn new(policy: Policy) -> Self {
        info!("Scheduler selected: {} ({})", policy.name(), policy.as_str());
        Self {
            policy,
            protocol: policy.protocol(),
        }
    }

    #[inline]
    pub fn policy(&self) -> Policy {
        self.policy
    }

    #[inline]
    pub fn protocol(&self) -> ResourceProtocol {
        self.protocol
    }
}

impl From<Policy> for Scheduler {
    fn from(policy: Policy) -> Self {
        Self::new(policy)
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Policy::Fifo)
    }
}

impl SchedulerOps for Scheduler {
    fn name(&self) -> &'static str {
        self.policy.name()
    }

    fn schedule(&self, state: &mut SimulationState) -> SimResult<Option<Pid>> {
        operations::schedule(state, self.policy)
    }

    fn acquire(&self, state: &mut SimulationState, resource: ResourceId) -> SimResult<bool> {
        self.protocol.acquire(state, resource)
    }

    fn release(&self, state: &mut SimulationState, resource: ResourceId) -> SimResult<()> {
        self.protocol.release(state, resource)
    }
}
