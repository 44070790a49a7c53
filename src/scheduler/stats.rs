/*!
 * Scheduler Statistics
 * Counters updated by the schedule/acquire/release entry points
 */

use serde::{Deserialize, Serialize};

#[inline]
fn is_zero(v: &u64) -> bool {
    *v == 0
}

/// Scheduling statistics
///
/// Plain counters: every entry point runs under exclusive access to the
/// simulation state, so no atomics are needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedulerStats {
    /// Decisions that returned a process
    #[serde(default, skip_serializing_if = "is_zero")]
    pub total_scheduled: u64,
    /// Decisions that handed the CPU to a different process
    #[serde(default, skip_serializing_if = "is_zero")]
    pub context_switches: u64,
    /// Running processes put back on the ready queue unfinished
    #[serde(default, skip_serializing_if = "is_zero")]
    pub preemptions: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub idle_ticks: u64,
    /// Acquisitions that ended up in a wait-queue
    #[serde(default, skip_serializing_if = "is_zero")]
    pub blocks: u64,
    /// Waiters moved back to the ready queue
    #[serde(default, skip_serializing_if = "is_zero")]
    pub wakeups: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub priority_boosts: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub priority_restores: u64,
}

impl SchedulerStats {
    #[inline(always)]
    pub fn inc_scheduled(&mut self) {
        self.total_scheduled += 1;
    }

    #[inline(always)]
    pub fn inc_context_switches(&mut self) {
        self.context_switches += 1;
    }

    #[inline(always)]
    pub fn inc_preemptions(&mut self) {
        self.preemptions += 1;
    }

    #[inline(always)]
    pub fn inc_idle(&mut self) {
        self.idle_ticks += 1;
    }

    #[inline(always)]
    pub fn inc_blocks(&mut self) {
        self.blocks += 1;
    }

    #[inline(always)]
    pub fn inc_wakeups(&mut self) {
        self.wakeups += 1;
    }

    #[inline(always)]
    pub fn inc_boosts(&mut self) {
        self.priority_boosts += 1;
    }

    #[inline(always)]
    pub fn inc_restores(&mut self) {
        self.priority_restores += 1;
    }
}
