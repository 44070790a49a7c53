/*!
 * Workload Description
 * JSON model of the processes a simulation run creates
 */

use crate::core::errors::{SimError, SimResult};
use crate::core::limits::{MAX_PRIORITY, MIN_LIFESPAN};
use crate::core::types::{Priority, ResourceId, Tick};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// A resource demand: hold `resource` while the process ages from `at` to
/// `at + duration`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ResourceDemand {
    pub resource: ResourceId,
    /// Process age at which the resource is acquired
    pub at: u32,
    /// Ticks of execution the resource is held for
    pub duration: u32,
}

impl ResourceDemand {
    /// Process age at which the resource is released, `None` on overflow
    #[inline]
    pub fn release_at(&self) -> Option<u32> {
        self.at.checked_add(self.duration)
    }
}

/// One process of the workload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessSpec {
    /// Tick at which the process is created
    #[serde(default)]
    pub start: Tick,
    pub lifespan: u32,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResourceDemand>,
}

impl ProcessSpec {
    pub fn new(start: Tick, lifespan: u32, priority: Priority) -> Self {
        Self {
            start,
            lifespan,
            priority,
            resources: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_demand(mut self, resource: ResourceId, at: u32, duration: u32) -> Self {
        self.resources.push(ResourceDemand {
            resource,
            at,
            duration,
        });
        self
    }
}

/// Full workload, processes in creation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Workload {
    pub processes: Vec<ProcessSpec>,
}

impl Workload {
    pub fn new(processes: Vec<ProcessSpec>) -> Self {
        Self { processes }
    }

    /// Load a workload from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SimError::Io(format!("{}: {}", path.display(), e)))?;
        raw.parse()
    }

    /// Check the workload against a resource table of `nr_resources`
    pub fn validate(&self, nr_resources: usize) -> SimResult<()> {
        for (idx, spec) in self.processes.iter().enumerate() {
            if spec.lifespan < MIN_LIFESPAN {
                return Err(SimError::Workload(format!(
                    "process #{}: lifespan must be at least {}",
                    idx, MIN_LIFESPAN
                )));
            }
            if spec.priority > MAX_PRIORITY {
                return Err(SimError::Workload(format!(
                    "process #{}: priority {} exceeds maximum {}",
                    idx, spec.priority, MAX_PRIORITY
                )));
            }
            for demand in &spec.resources {
                if demand.resource >= nr_resources {
                    return Err(SimError::Workload(format!(
                        "process #{}: resource {} out of range (table holds {})",
                        idx, demand.resource, nr_resources
                    )));
                }
                if demand.duration == 0 {
                    return Err(SimError::Workload(format!(
                        "process #{}: resource {} held for zero ticks",
                        idx, demand.resource
                    )));
                }
                if demand.release_at().map_or(true, |end| end > spec.lifespan) {
                    return Err(SimError::Workload(format!(
                        "process #{}: resource {} held past lifespan {}",
                        idx, demand.resource, spec.lifespan
                    )));
                }
            }
        }
        Ok(())
    }
}

impl FromStr for Workload {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}
