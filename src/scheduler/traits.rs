/*!
 * Scheduler Traits
 * Interface the simulation driver calls into
 */

use crate::core::errors::SimResult;
use crate::core::types::{Pid, ResourceId};
use crate::simulation::SimulationState;

/// The three entry points a driver needs, plus a display name
pub trait SchedulerOps: Send + Sync {
    /// Human-readable scheduler name
    fn name(&self) -> &'static str;

    /// Pick the process for the coming tick; `None` is an idle tick
    fn schedule(&self, state: &mut SimulationState) -> SimResult<Option<Pid>>;

    /// Acquire `resource` for the running process
    ///
    /// `Ok(false)` means the process is now WAITING and `schedule` must be
    /// called before anything runs.
    fn acquire(&self, state: &mut SimulationState, resource: ResourceId) -> SimResult<bool>;

    /// Release `resource` held by the running process
    fn release(&self, state: &mut SimulationState, resource: ResourceId) -> SimResult<()>;
}
