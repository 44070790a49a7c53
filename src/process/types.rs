/*!
 * Process Types
 * Simulated process record and status
 */

use crate::core::types::{Pid, Priority};
use crate::queue::{Link, QueueId};
use serde::{Deserialize, Serialize};

/// Process status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    /// Eligible to run, sitting in the ready queue
    Ready,
    /// Currently holding the CPU
    Running,
    /// Blocked in a resource wait-queue
    Waiting,
}

/// Simulated process
///
/// Carries its own queue link, so a process can sit on at most one list
/// (the ready queue or a single resource wait-queue) at any instant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Process {
    pub pid: Pid,
    pub status: ProcessStatus,
    /// Ticks executed so far
    pub age: u32,
    /// Total ticks required, fixed at creation
    pub lifespan: u32,
    pub priority: Priority,
    /// Base priority, present only while `priority` is boosted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_orig: Option<Priority>,
    #[serde(skip)]
    pub(crate) link: Link,
}

impl Process {
    #[inline]
    #[must_use]
    pub fn new(pid: Pid, lifespan: u32, priority: Priority) -> Self {
        Self {
            pid,
            status: ProcessStatus::Ready,
            age: 0,
            lifespan,
            priority,
            priority_orig: None,
            link: Link::new(),
        }
    }

    /// Age has reached lifespan
    #[inline(always)]
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.age >= self.lifespan
    }

    #[inline(always)]
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.lifespan.saturating_sub(self.age)
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_waiting(&self) -> bool {
        matches!(self.status, ProcessStatus::Waiting)
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.status, ProcessStatus::Running)
    }

    /// Priority currently raised above its base value
    #[inline(always)]
    #[must_use]
    pub const fn is_boosted(&self) -> bool {
        self.priority_orig.is_some()
    }

    /// Queue this process is linked on, if any
    #[inline]
    #[must_use]
    pub fn queue(&self) -> Option<QueueId> {
        self.link.queue()
    }

    /// Base priority, ignoring any outstanding boost
    #[inline]
    #[must_use]
    pub fn base_priority(&self) -> Priority {
        self.priority_orig.unwrap_or(self.priority)
    }
}
