/*!
 * Shared Simulation
 * Single mutual-exclusion boundary for hosts that drive ticks from
 * several threads
 */

use super::state::SimulationState;
use crate::scheduler::Scheduler;
use parking_lot::Mutex;
use std::sync::Arc;

struct Inner {
    state: SimulationState,
    scheduler: Scheduler,
}

/// Cloneable handle to one simulation
///
/// The core never locks internally; `with_tick` holds the lock for a whole
/// tick's worth of entry-point calls so they stay atomic with respect to
/// each other.
#[derive(Clone)]
pub struct SharedSimulation {
    inner: Arc<Mutex<Inner>>,
}

impl SharedSimulation {
    pub fn new(state: SimulationState, scheduler: Scheduler) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner { state, scheduler })),
        }
    }

    /// Run `f` with exclusive access to the state and the scheduler
    pub fn with_tick<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut SimulationState, &Scheduler) -> R,
    {
        let mut guard = self.inner.lock();
        let Inner { state, scheduler } = &mut *guard;
        f(state, scheduler)
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> SimulationState {
        self.inner.lock().state.clone()
    }

    pub fn scheduler(&self) -> Scheduler {
        self.inner.lock().scheduler
    }
}
