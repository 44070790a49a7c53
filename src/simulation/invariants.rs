/*!
 * Invariant Checks
 * Cross-checks queue membership, process status and resource ownership
 */

use super::state::SimulationState;
use crate::core::errors::{SimError, SimResult};
use crate::core::types::Pid;
use crate::process::ProcessStatus;
use crate::queue::{ProcessList, QueueId};
use ahash::AHashMap;

/// Where a live process was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    Queue(QueueId),
    Current,
    /// Finished, detached, awaiting reap by the driver
    Exited,
}

impl SimulationState {
    /// Verify every global invariant of the simulation
    ///
    /// - each live process is in exactly one of: ready queue, one wait-queue,
    ///   the running slot (or finished and awaiting reap)
    /// - link tags agree with the lists that hold them
    /// - READY processes sit in the ready queue, WAITING ones in a wait-queue
    /// - resource owners are live and never wait on what they own
    pub fn check_invariants(&self) -> SimResult<()> {
        let mut seen: AHashMap<Pid, Location> = AHashMap::with_capacity(self.processes.len());

        self.walk_list(&self.ready, &mut seen)?;
        for resource in &self.resources {
            self.walk_list(&resource.waitqueue, &mut seen)?;
        }

        if let Some(pid) = self.current {
            let process = self.processes.get(pid).map_err(|_| {
                SimError::InvariantViolation(format!("current process {} is not live", pid))
            })?;
            match process.status {
                // A blocked current process is accounted for by its wait-queue
                ProcessStatus::Waiting => {
                    if !matches!(seen.get(&pid), Some(Location::Queue(QueueId::Wait(_)))) {
                        return Err(violation(format!(
                            "current process {} is WAITING but on no wait-queue",
                            pid
                        )));
                    }
                }
                ProcessStatus::Running => {
                    if let Some(loc) = seen.insert(pid, Location::Current) {
                        return Err(violation(format!(
                            "running process {} is also on {:?}",
                            pid, loc
                        )));
                    }
                }
                ProcessStatus::Ready => {
                    return Err(violation(format!("current process {} is READY", pid)));
                }
            }
        }

        for process in self.processes.iter() {
            let location = match seen.get(&process.pid) {
                Some(loc) => *loc,
                None if process.is_finished() && process.link.is_unlinked() => {
                    Location::Exited
                }
                None => {
                    return Err(violation(format!(
                        "process {} is on no queue and not running",
                        process.pid
                    )));
                }
            };

            let consistent = match (location, process.status) {
                (Location::Queue(QueueId::Ready), ProcessStatus::Ready) => true,
                (Location::Queue(QueueId::Wait(_)), ProcessStatus::Waiting) => true,
                (Location::Current, ProcessStatus::Running) => true,
                (Location::Exited, _) => true,
                _ => false,
            };
            if !consistent {
                return Err(violation(format!(
                    "process {} is {:?} but located at {:?}",
                    process.pid, process.status, location
                )));
            }
        }

        for resource in &self.resources {
            let Some(owner) = resource.owner else {
                if resource.boosted {
                    return Err(violation(format!(
                        "free resource {} still marked as boosting",
                        resource.id
                    )));
                }
                continue;
            };
            if !self.processes.contains(owner) {
                return Err(violation(format!(
                    "resource {} owned by dead process {}",
                    resource.id, owner
                )));
            }
            if seen.get(&owner) == Some(&Location::Queue(QueueId::Wait(resource.id))) {
                return Err(violation(format!(
                    "process {} waits on resource {} it already owns",
                    owner, resource.id
                )));
            }
        }

        Ok(())
    }

    fn walk_list(&self, list: &ProcessList, seen: &mut AHashMap<Pid, Location>) -> SimResult<()> {
        let mut count = 0usize;
        let mut cursor = list.cursor();

        while let Some(pid) = cursor.next(&self.processes) {
            count += 1;
            if count > list.len() {
                return Err(SimError::QueueCorrupted(format!(
                    "{} is longer than its recorded length {}",
                    list.id(),
                    list.len()
                )));
            }

            let process = self.processes.get(pid).map_err(|_| {
                SimError::QueueCorrupted(format!("{} holds dead process {}", list.id(), pid))
            })?;
            if process.queue() != Some(list.id()) {
                return Err(SimError::QueueCorrupted(format!(
                    "process {} found on the {} but tagged {:?}",
                    pid,
                    list.id(),
                    process.queue()
                )));
            }
            if let Some(prev) = seen.insert(pid, Location::Queue(list.id())) {
                return Err(violation(format!(
                    "process {} is on the {} and on {:?}",
                    pid,
                    list.id(),
                    prev
                )));
            }
        }

        if count != list.len() {
            return Err(SimError::QueueCorrupted(format!(
                "{} walked {} entries, recorded length {}",
                list.id(),
                count,
                list.len()
            )));
        }
        Ok(())
    }
}

fn violation(msg: String) -> SimError {
    SimError::InvariantViolation(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{Policy, Scheduler, SchedulerOps};
    use crate::simulation::SimConfig;

    #[test]
    fn test_fresh_state_is_consistent() {
        let mut state = SimulationState::new(&SimConfig::default());
        state.spawn(2, 1).unwrap();
        state.spawn(3, 2).unwrap();
        state.check_invariants().unwrap();
    }

    #[test]
    fn test_blocked_current_is_consistent() {
        let mut state = SimulationState::new(&SimConfig::default());
        let sched = Scheduler::new(Policy::Fifo);
        state.spawn(2, 1).unwrap();
        state.spawn(2, 1).unwrap();

        sched.schedule(&mut state).unwrap();
        assert!(sched.acquire(&mut state, 0).unwrap());
        // hand the CPU to the second process without finishing the first
        state.processes.get_mut(Pid(0)).unwrap().status = ProcessStatus::Ready;
        state.ready.push_back(&mut state.processes, Pid(0)).unwrap();
        state.current = None;
        sched.schedule(&mut state).unwrap();
        assert!(!sched.acquire(&mut state, 0).unwrap());

        state.check_invariants().unwrap();
    }

    #[test]
    fn test_orphan_process_is_detected() {
        let mut state = SimulationState::new(&SimConfig::default());
        let pid = state.spawn(2, 1).unwrap();
        state.ready.remove(&mut state.processes, pid).unwrap();

        let err = state.check_invariants().unwrap_err();
        assert!(matches!(err, SimError::InvariantViolation(_)));
    }

    #[test]
    fn test_status_mismatch_is_detected() {
        let mut state = SimulationState::new(&SimConfig::default());
        let pid = state.spawn(2, 1).unwrap();
        state.process_mut(pid).unwrap().status = ProcessStatus::Waiting;

        assert!(state.check_invariants().is_err());
    }
}
