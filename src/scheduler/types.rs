/*!
 * Scheduler Types
 * Domain types for scheduling policies
 */

use crate::core::errors::SimError;
use crate::resource::{BoostMode, ResourceProtocol};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Scheduling policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Run to completion in arrival order
    Fifo,
    /// Non-preemptive, shortest lifespan first
    Sjf,
    /// Preemptive, shortest lifespan first, re-evaluated every tick
    Srtf,
    /// One tick each, rotating through the ready queue
    RoundRobin,
    /// Preemptive, highest priority first
    Priority,
    /// Priority with the priority ceiling protocol
    PriorityPcp,
    /// Priority with the priority inheritance protocol
    PriorityPip,
}

/// How the next process is picked from the ready queue
///
/// Ties always go to the process met first in ready-queue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Head of the ready queue
    Head,
    /// Smallest total lifespan
    ShortestLifespan,
    /// Largest current priority
    HighestPriority,
}

impl Policy {
    pub const ALL: [Policy; 7] = [
        Policy::Fifo,
        Policy::Sjf,
        Policy::Srtf,
        Policy::RoundRobin,
        Policy::Priority,
        Policy::PriorityPcp,
        Policy::PriorityPip,
    ];

    /// Short identifier used on the command line and in serialized output
    ///
    /// # Performance
    /// Hot path - used for logging on every scheduling decision
    #[inline(always)]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fifo => "fifo",
            Self::Sjf => "sjf",
            Self::Srtf => "srtf",
            Self::RoundRobin => "round_robin",
            Self::Priority => "priority",
            Self::PriorityPcp => "pcp",
            Self::PriorityPip => "pip",
        }
    }

    /// Human-readable scheduler name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Fifo => "FIFO",
            Self::Sjf => "Shortest-Job First",
            Self::Srtf => "Shortest Remaining Time First",
            Self::RoundRobin => "Round-Robin",
            Self::Priority => "Priority",
            Self::PriorityPcp => "Priority + Priority Ceiling Protocol",
            Self::PriorityPip => "Priority + Priority Inheritance Protocol",
        }
    }

    /// Whether an unfinished running process goes back to the ready queue
    /// every tick
    #[inline(always)]
    pub const fn is_preemptive(&self) -> bool {
        !matches!(self, Self::Fifo | Self::Sjf)
    }

    #[inline(always)]
    pub const fn selection(&self) -> Selection {
        match self {
            Self::Fifo | Self::RoundRobin => Selection::Head,
            Self::Sjf | Self::Srtf => Selection::ShortestLifespan,
            Self::Priority | Self::PriorityPcp | Self::PriorityPip => Selection::HighestPriority,
        }
    }

    /// Acquire/release behaviour this policy runs with
    pub const fn protocol(&self) -> ResourceProtocol {
        match self {
            Self::Fifo | Self::Sjf | Self::Srtf | Self::RoundRobin => ResourceProtocol::Fcfs,
            Self::Priority => ResourceProtocol::Prioritized(BoostMode::None),
            Self::PriorityPcp => ResourceProtocol::Prioritized(BoostMode::Ceiling),
            Self::PriorityPip => ResourceProtocol::Prioritized(BoostMode::Inheritance),
        }
    }
}

impl FromStr for Policy {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fifo" | "fcfs" => Ok(Self::Fifo),
            "sjf" => Ok(Self::Sjf),
            "srtf" => Ok(Self::Srtf),
            "round_robin" | "roundrobin" | "rr" => Ok(Self::RoundRobin),
            "priority" | "prio" => Ok(Self::Priority),
            "pcp" | "priority_pcp" => Ok(Self::PriorityPcp),
            "pip" | "priority_pip" => Ok(Self::PriorityPip),
            _ => Err(SimError::InvalidPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Policy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Policy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
