/*!
 * Scheduler Core Operations
 * Per-tick scheduling decision shared by every policy
 */

use super::types::{Policy, Selection};
use crate::core::errors::SimResult;
use crate::core::types::Pid;
use crate::process::ProcessStatus;
use crate::simulation::SimulationState;
use log::debug;

/// Decide who runs in the coming tick
///
/// 1. No current process, or the current one is blocked: pick next.
/// 2. Current process still has lifespan left: non-preemptive policies keep
///    it; preemptive ones put it at the ready-queue tail and pick next.
/// 3. Current process finished: pick next. Reaping it is up to the driver.
pub(crate) fn schedule(state: &mut SimulationState, policy: Policy) -> SimResult<Option<Pid>> {
    let prev = state.current;
    let mut requeued = false;

    if let Some(pid) = prev {
        let process = state.processes.get_mut(pid)?;
        if process.is_running() && !process.is_finished() {
            if !policy.is_preemptive() {
                state.stats.inc_scheduled();
                return Ok(Some(pid));
            }

            process.status = ProcessStatus::Ready;
            state.ready.push_back(&mut state.processes, pid)?;
            requeued = true;
        }
    }

    let next = select(state, policy.selection())?;
    state.current = next;

    match next {
        Some(pid) => {
            state.processes.get_mut(pid)?.status = ProcessStatus::Running;
            state.stats.inc_scheduled();
            if prev != Some(pid) {
                state.stats.inc_context_switches();
                if requeued {
                    state.stats.inc_preemptions();
                }
            }
            debug!(
                "Tick {}: scheduled process {} ({})",
                state.tick,
                pid,
                policy.as_str()
            );
        }
        None => debug!("Tick {}: nothing to schedule", state.tick),
    }

    Ok(next)
}

/// Find the next process per `selection` and take it off the ready queue
pub(crate) fn select(state: &mut SimulationState, selection: Selection) -> SimResult<Option<Pid>> {
    let chosen = match selection {
        Selection::Head => state.ready.first(),
        Selection::ShortestLifespan => best_by(state, |lifespan, _| lifespan, |a, b| a < b)?,
        Selection::HighestPriority => best_by(state, |_, priority| priority, |a, b| a > b)?,
    };

    if let Some(pid) = chosen {
        state.ready.remove(&mut state.processes, pid)?;
    }
    Ok(chosen)
}

/// Scan the whole ready queue keeping the first strictly better candidate
fn best_by<K, B>(state: &SimulationState, key: K, better: B) -> SimResult<Option<Pid>>
where
    K: Fn(u32, u32) -> u32,
    B: Fn(u32, u32) -> bool,
{
    let mut best: Option<(Pid, u32)> = None;
    let mut cursor = state.ready.cursor();

    while let Some(pid) = cursor.next(&state.processes) {
        let process = state.processes.get(pid)?;
        let value = key(process.lifespan, process.priority);
        match best {
            Some((_, current)) if !better(value, current) => {}
            _ => best = Some((pid, value)),
        }
    }

    Ok(best.map(|(pid, _)| pid))
}
