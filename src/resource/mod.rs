/*!
 * Resource Module
 * Fixed table of exclusive resources and their acquire/release protocols
 */

pub mod fcfs;
pub mod prioritized;
pub mod types;

pub use types::{BoostMode, Resource, ResourceProtocol};

use crate::core::errors::SimResult;
use crate::core::types::ResourceId;
use crate::simulation::SimulationState;

impl ResourceProtocol {
    /// Acquire `resource` for the running process; `false` means it blocked
    pub fn acquire(self, state: &mut SimulationState, resource: ResourceId) -> SimResult<bool> {
        match self {
            ResourceProtocol::Fcfs => fcfs::acquire(state, resource),
            ResourceProtocol::Prioritized(mode) => prioritized::acquire(state, resource, mode),
        }
    }

    /// Release `resource` held by the running process
    pub fn release(self, state: &mut SimulationState, resource: ResourceId) -> SimResult<()> {
        match self {
            ResourceProtocol::Fcfs => fcfs::release(state, resource),
            ResourceProtocol::Prioritized(_) => prioritized::release(state, resource),
        }
    }

    /// Whether one release wakes every waiter instead of just the oldest
    #[inline]
    pub fn wakes_all(self) -> bool {
        matches!(self, ResourceProtocol::Prioritized(_))
    }
}
