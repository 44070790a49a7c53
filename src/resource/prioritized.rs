/*!
 * Prioritized Resource Protocol
 * Shared acquire/release for the priority schedulers, with optional
 * priority ceiling or priority inheritance
 */

use super::types::BoostMode;
use crate::core::errors::{SimError, SimResult};
use crate::core::types::ResourceId;
use crate::simulation::SimulationState;
use log::debug;

/// Take `resource` for the running process
///
/// Under `Ceiling` an uncontended acquisition immediately raises the new
/// owner to the system ceiling. Under `Inheritance` a contending requester
/// with a strictly higher priority lends it to the owner.
pub fn acquire(
    state: &mut SimulationState,
    resource: ResourceId,
    mode: BoostMode,
) -> SimResult<bool> {
    let caller = state.running_pid("acquire")?;
    state.check_resource(resource)?;

    let owner = match state.resources[resource].owner {
        None => {
            state.resources[resource].owner = Some(caller);
            if mode == BoostMode::Ceiling {
                let ceiling = state.priority_ceiling;
                state.boost(caller, ceiling)?;
                state.resources[resource].boosted = true;
            }
            debug!("Process {} acquired resource {}", caller, resource);
            return Ok(true);
        }
        Some(owner) if owner == caller => {
            return Err(SimError::AlreadyOwned {
                resource,
                pid: caller,
            });
        }
        Some(owner) => owner,
    };

    if mode == BoostMode::Inheritance {
        let requested = state.processes.get(caller)?.priority;
        if requested > state.processes.get(owner)?.priority {
            state.boost(owner, requested)?;
            state.resources[resource].boosted = true;
            debug!(
                "Process {} inherits priority {} from process {}",
                owner, requested, caller
            );
        }
    }

    state.block(caller, resource)?;
    debug!(
        "Process {} blocked on resource {} (owner: {})",
        caller, resource, owner
    );
    Ok(false)
}

/// Give `resource` up, undo its boost and wake every waiter
///
/// Waiters are taken oldest first and each is pushed onto the *head* of the
/// ready queue, so the newest waiter ends up first. All of them will retry
/// the acquisition; only one can win, the rest block again.
pub fn release(state: &mut SimulationState, resource: ResourceId) -> SimResult<()> {
    let caller = state.running_pid("release")?;
    state.check_resource(resource)?;

    let was_boosted = state.disown(resource, caller)?;
    if was_boosted && !state.holds_boosted(caller) {
        state.restore(caller)?;
    }
    debug!("Process {} released resource {}", caller, resource);

    while let Some(waiter) = state.dequeue_waiter(resource)? {
        state.ready.push_front(&mut state.processes, waiter)?;
        debug!("Process {} woken from resource {}", waiter, resource);
    }
    Ok(())
}
