/*!
 * Simulation State
 * Everything the schedule/acquire/release entry points read and mutate
 */

use super::config::SimConfig;
use crate::core::errors::{SimError, SimResult};
use crate::core::limits::{MAX_PRIORITY, MIN_LIFESPAN};
use crate::core::types::{Pid, Priority, ResourceId, Tick};
use crate::process::{Process, ProcessStatus, ProcessTable};
use crate::queue::{ProcessList, QueueId};
use crate::resource::Resource;
use crate::scheduler::SchedulerStats;
use log::{debug, info};

/// Process table, ready queue, resource table and the running slot
///
/// Passed by `&mut` into every entry point. There is exactly one caller at a
/// time; see `SharedSimulation` for hosts that need to share it.
#[derive(Debug, Clone)]
pub struct SimulationState {
    pub(crate) processes: ProcessTable,
    pub(crate) ready: ProcessList,
    pub(crate) resources: Vec<Resource>,
    pub(crate) current: Option<Pid>,
    pub(crate) tick: Tick,
    pub(crate) priority_ceiling: Priority,
    pub(crate) stats: SchedulerStats,
}

impl SimulationState {
    /// Fresh state: no processes, every resource free
    pub fn new(config: &SimConfig) -> Self {
        info!(
            "Simulation state initialized: {} resources, priority ceiling {}",
            config.nr_resources, config.priority_ceiling
        );

        Self {
            processes: ProcessTable::new(),
            ready: ProcessList::new(QueueId::Ready),
            resources: (0..config.nr_resources).map(Resource::new).collect(),
            current: None,
            tick: 0,
            priority_ceiling: config.priority_ceiling,
            stats: SchedulerStats::default(),
        }
    }

    // =========================================================================
    // Driver-facing operations
    // =========================================================================

    /// Create a process and append it to the ready queue
    pub fn spawn(&mut self, lifespan: u32, priority: Priority) -> SimResult<Pid> {
        if lifespan < MIN_LIFESPAN {
            return Err(SimError::InvalidLifespan(lifespan));
        }
        if priority > MAX_PRIORITY {
            return Err(SimError::InvalidPriority {
                priority,
                max: MAX_PRIORITY,
            });
        }

        let pid = self.processes.insert(lifespan, priority);
        self.ready.push_back(&mut self.processes, pid)?;

        debug!(
            "Process {} spawned at tick {} (lifespan: {}, priority: {})",
            pid, self.tick, lifespan, priority
        );
        Ok(pid)
    }

    /// Remove a finished process from the simulation
    ///
    /// The process must be off every queue, must not be the running process
    /// and must not own any resource.
    pub fn reap(&mut self, pid: Pid) -> SimResult<Process> {
        let process = self.processes.get(pid)?;
        if let Some(queue) = process.queue() {
            return Err(SimError::ProcessBusy {
                pid,
                reason: format!("still linked on the {}", queue),
            });
        }
        if self.current == Some(pid) {
            return Err(SimError::ProcessBusy {
                pid,
                reason: "still the current process".into(),
            });
        }
        if let Some(r) = self.resources.iter().find(|r| r.owner == Some(pid)) {
            return Err(SimError::ProcessBusy {
                pid,
                reason: format!("still owns resource {}", r.id),
            });
        }

        let process = self.processes.remove(pid)?;
        info!(
            "Process {} exited at tick {} (lifespan: {})",
            pid, self.tick, process.lifespan
        );
        Ok(process)
    }

    /// Run the current process for one tick
    ///
    /// Returns the process that ran, or `None` on an idle tick.
    pub fn execute_current(&mut self) -> SimResult<Option<Pid>> {
        let Some(pid) = self.current else {
            self.stats.inc_idle();
            return Ok(None);
        };

        let process = self.processes.get_mut(pid)?;
        if !process.is_running() {
            return Err(SimError::InvariantViolation(format!(
                "process {} cannot execute while {:?}",
                pid, process.status
            )));
        }
        if process.is_finished() {
            return Err(SimError::InvariantViolation(format!(
                "process {} executed past its lifespan {}",
                pid, process.lifespan
            )));
        }
        process.age += 1;
        Ok(Some(pid))
    }

    pub fn advance_tick(&mut self) -> Tick {
        self.tick += 1;
        self.tick
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn tick(&self) -> Tick {
        self.tick
    }

    #[inline]
    pub fn current(&self) -> Option<Pid> {
        self.current
    }

    #[inline]
    pub fn priority_ceiling(&self) -> Priority {
        self.priority_ceiling
    }

    #[inline]
    pub fn process(&self, pid: Pid) -> SimResult<&Process> {
        self.processes.get(pid)
    }

    #[inline]
    pub fn process_mut(&mut self, pid: Pid) -> SimResult<&mut Process> {
        self.processes.get_mut(pid)
    }

    #[inline]
    pub fn processes(&self) -> &ProcessTable {
        &self.processes
    }

    pub fn ready_queue_pids(&self) -> Vec<Pid> {
        self.ready.pids(&self.processes)
    }

    #[inline]
    pub fn ready_len(&self) -> usize {
        self.ready.len()
    }

    pub fn resource(&self, id: ResourceId) -> SimResult<&Resource> {
        self.resources.get(id).ok_or(SimError::InvalidResource {
            resource: id,
            limit: self.resources.len(),
        })
    }

    #[inline]
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn waitqueue_pids(&self, id: ResourceId) -> SimResult<Vec<Pid>> {
        Ok(self.resource(id)?.waitqueue.pids(&self.processes))
    }

    /// Processes blocked across every wait-queue
    pub fn waiting_count(&self) -> usize {
        self.resources.iter().map(|r| r.waitqueue.len()).sum()
    }

    #[inline]
    pub fn stats(&self) -> SchedulerStats {
        self.stats.clone()
    }

    /// Resources currently owned by `pid`
    pub fn owned_by(&self, pid: Pid) -> Vec<ResourceId> {
        self.resources
            .iter()
            .filter(|r| r.owner == Some(pid))
            .map(|r| r.id)
            .collect()
    }

    // =========================================================================
    // Building blocks for the scheduling and resource entry points
    // =========================================================================

    /// The running process issuing a resource call
    pub(crate) fn running_pid(&self, op: &str) -> SimResult<Pid> {
        let pid = self
            .current
            .ok_or_else(|| SimError::NoCurrentProcess(op.to_string()))?;
        let process = self.processes.get(pid)?;
        if !process.is_running() {
            return Err(SimError::InvariantViolation(format!(
                "{} issued by process {} while {:?}",
                op, pid, process.status
            )));
        }
        Ok(pid)
    }

    pub(crate) fn check_resource(&self, id: ResourceId) -> SimResult<()> {
        self.resource(id).map(|_| ())
    }

    /// Move the caller into the wait-queue of `id`
    pub(crate) fn block(&mut self, pid: Pid, id: ResourceId) -> SimResult<()> {
        self.processes.get_mut(pid)?.status = ProcessStatus::Waiting;
        self.resources[id]
            .waitqueue
            .push_back(&mut self.processes, pid)?;
        self.stats.inc_blocks();
        Ok(())
    }

    /// Clear ownership of `id` on behalf of `caller`
    ///
    /// Returns whether the resource carried an outstanding priority boost.
    pub(crate) fn disown(&mut self, id: ResourceId, caller: Pid) -> SimResult<bool> {
        let resource = &mut self.resources[id];
        match resource.owner {
            None => Err(SimError::ResourceNotHeld {
                resource: id,
                caller,
            }),
            Some(owner) if owner != caller => Err(SimError::NotOwner {
                resource: id,
                owner,
                caller,
            }),
            Some(_) => {
                resource.owner = None;
                Ok(std::mem::take(&mut resource.boosted))
            }
        }
    }

    /// Pop the oldest waiter of `id` and mark it ready (not yet queued)
    pub(crate) fn dequeue_waiter(&mut self, id: ResourceId) -> SimResult<Option<Pid>> {
        let Some(pid) = self.resources[id]
            .waitqueue
            .pop_front(&mut self.processes)?
        else {
            return Ok(None);
        };

        let waiter = self.processes.get_mut(pid)?;
        if !waiter.is_waiting() {
            return Err(SimError::InvariantViolation(format!(
                "process {} on the wait-queue of resource {} is {:?}",
                pid, id, waiter.status
            )));
        }
        waiter.status = ProcessStatus::Ready;
        self.stats.inc_wakeups();
        Ok(Some(pid))
    }

    /// Raise `pid` to at least `to`, saving the base priority on first boost
    pub(crate) fn boost(&mut self, pid: Pid, to: Priority) -> SimResult<()> {
        let process = self.processes.get_mut(pid)?;
        if process.priority_orig.is_none() {
            process.priority_orig = Some(process.priority);
        }
        let from = process.priority;
        if to > from {
            process.priority = to;
            self.stats.inc_boosts();
            debug!("Process {} priority boosted {} -> {}", pid, from, to);
        }
        Ok(())
    }

    /// Put `pid` back to its base priority
    pub(crate) fn restore(&mut self, pid: Pid) -> SimResult<()> {
        let process = self.processes.get_mut(pid)?;
        if let Some(orig) = process.priority_orig.take() {
            if process.priority != orig {
                debug!(
                    "Process {} priority restored {} -> {}",
                    pid, process.priority, orig
                );
                process.priority = orig;
                self.stats.inc_restores();
            }
        }
        Ok(())
    }

    /// Whether `pid` still owns a resource that boosted it
    pub(crate) fn holds_boosted(&self, pid: Pid) -> bool {
        self.resources
            .iter()
            .any(|r| r.owner == Some(pid) && r.boosted)
    }
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new(&SimConfig::default())
    }
}
