/*!
 * Core Types
 * Common types used across the simulator
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simulated process ID
///
/// Doubles as the slot index into the process table, so lookups are O(1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pid(pub u32);

impl Pid {
    #[inline(always)]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline(always)]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Slot index in the process table
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Pid {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Priority level (higher is more important)
pub type Priority = u32;

/// Index into the fixed resource table
pub type ResourceId = usize;

/// Discrete unit of simulated CPU time
pub type Tick = u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pid_display() {
        let pid = Pid(42);
        assert_eq!(format!("{}", pid), "42");
        assert_eq!(pid.index(), 42);
    }

    #[test]
    fn test_pid_serializes_transparently() {
        let json = serde_json::to_string(&Pid(7)).unwrap();
        assert_eq!(json, "7");
        let back: Pid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Pid(7));
    }
}
