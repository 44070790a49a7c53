/*!
 * Process Table
 * Arena storage for every live simulated process
 */

use super::types::Process;
use crate::core::errors::{SimError, SimResult};
use crate::core::types::{Pid, Priority};
use crate::queue::Link;

/// Slot-per-pid arena
///
/// Pids are handed out sequentially and never recycled, so a stale pid
/// resolves to an empty slot instead of to a different process.
#[derive(Debug, Default, Clone)]
pub struct ProcessTable {
    slots: Vec<Option<Process>>,
    live: usize,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new process and return its pid
    pub fn insert(&mut self, lifespan: u32, priority: Priority) -> Pid {
        let pid = Pid(self.slots.len() as u32);
        self.slots.push(Some(Process::new(pid, lifespan, priority)));
        self.live += 1;
        pid
    }

    /// Drop a process from the table
    pub fn remove(&mut self, pid: Pid) -> SimResult<Process> {
        let process = self
            .slots
            .get_mut(pid.index())
            .and_then(Option::take)
            .ok_or(SimError::ProcessNotFound(pid))?;
        self.live -= 1;
        Ok(process)
    }

    #[inline]
    pub fn get(&self, pid: Pid) -> SimResult<&Process> {
        self.slots
            .get(pid.index())
            .and_then(Option::as_ref)
            .ok_or(SimError::ProcessNotFound(pid))
    }

    #[inline]
    pub fn get_mut(&mut self, pid: Pid) -> SimResult<&mut Process> {
        self.slots
            .get_mut(pid.index())
            .and_then(Option::as_mut)
            .ok_or(SimError::ProcessNotFound(pid))
    }

    #[inline]
    pub fn contains(&self, pid: Pid) -> bool {
        matches!(self.slots.get(pid.index()), Some(Some(_)))
    }

    #[inline]
    pub(crate) fn link(&self, pid: Pid) -> SimResult<&Link> {
        self.get(pid).map(|p| &p.link)
    }

    #[inline]
    pub(crate) fn link_mut(&mut self, pid: Pid) -> SimResult<&mut Link> {
        self.get_mut(pid).map(|p| &mut p.link)
    }

    /// Number of live processes
    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Live processes in pid order
    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.slots.iter().filter_map(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_remove() {
        let mut table = ProcessTable::new();
        let a = table.insert(3, 1);
        let b = table.insert(4, 2);

        assert_eq!(a, Pid(0));
        assert_eq!(b, Pid(1));
        assert_eq!(table.len(), 2);

        let removed = table.remove(a).unwrap();
        assert_eq!(removed.lifespan, 3);
        assert!(!table.contains(a));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_pids_are_not_recycled() {
        let mut table = ProcessTable::new();
        let a = table.insert(1, 0);
        table.remove(a).unwrap();

        let b = table.insert(1, 0);
        assert_ne!(a, b);
        assert_eq!(table.get(a).unwrap_err(), SimError::ProcessNotFound(a));
    }

    #[test]
    fn test_double_remove_is_reported() {
        let mut table = ProcessTable::new();
        let a = table.insert(1, 0);
        table.remove(a).unwrap();
        assert!(table.remove(a).is_err());
    }
}
