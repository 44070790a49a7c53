/*!
 * FCFS Resource Protocol
 * Serve a resource in request order, ignoring priorities
 */

use crate::core::errors::{SimError, SimResult};
use crate::core::types::ResourceId;
use crate::simulation::SimulationState;
use log::debug;

/// Take `resource` for the running process
///
/// Returns `Ok(false)` when the resource is held by someone else; the caller
/// is then WAITING at the tail of the wait-queue and the driver must call
/// `schedule` before anything runs again.
pub fn acquire(state: &mut SimulationState, resource: ResourceId) -> SimResult<bool> {
    let caller = state.running_pid("acquire")?;
    state.check_resource(resource)?;

    match state.resources[resource].owner {
        None => {
            state.resources[resource].owner = Some(caller);
            debug!("Process {} acquired resource {}", caller, resource);
            Ok(true)
        }
        Some(owner) if owner == caller => Err(SimError::AlreadyOwned {
            resource,
            pid: caller,
        }),
        Some(owner) => {
            state.block(caller, resource)?;
            debug!(
                "Process {} blocked on resource {} (owner: {})",
                caller, resource, owner
            );
            Ok(false)
        }
    }
}

/// Give `resource` up and wake at most one waiter, the oldest
pub fn release(state: &mut SimulationState, resource: ResourceId) -> SimResult<()> {
    let caller = state.running_pid("release")?;
    state.check_resource(resource)?;
    state.disown(resource, caller)?;
    debug!("Process {} released resource {}", caller, resource);

    if let Some(waiter) = state.dequeue_waiter(resource)? {
        state.ready.push_back(&mut state.processes, waiter)?;
        debug!("Process {} woken from resource {}", waiter, resource);
    }
    Ok(())
}
