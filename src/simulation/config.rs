/*!
 * Simulation Configuration
 *
 * Runtime configuration: defaults, environment overlay, validation
 */

use crate::core::errors::{SimError, SimResult};
use crate::core::limits::{DEFAULT_MAX_TICKS, MAX_PRIORITY, NR_RESOURCES, PRIORITY_CEILING};
use crate::core::types::{Priority, Tick};
use crate::scheduler::Policy;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const ENV_POLICY: &str = "SCHED_SIM_POLICY";
pub const ENV_MAX_TICKS: &str = "SCHED_SIM_MAX_TICKS";
pub const ENV_RESOURCES: &str = "SCHED_SIM_RESOURCES";
pub const ENV_CEILING: &str = "SCHED_SIM_CEILING";

/// Simulation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SimConfig {
    pub policy: Policy,
    /// Size of the fixed resource table
    pub nr_resources: usize,
    /// Priority a holder is raised to under the ceiling protocol
    pub priority_ceiling: Priority,
    /// Horizon; the run stops here even if work remains
    pub max_ticks: Tick,
    /// Validate queue/ownership invariants after every tick
    pub check_invariants: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            policy: Policy::Fifo,
            nr_resources: NR_RESOURCES,
            priority_ceiling: PRIORITY_CEILING,
            max_ticks: DEFAULT_MAX_TICKS,
            check_invariants: true,
        }
    }
}

impl SimConfig {
    /// Defaults overlaid with `SCHED_SIM_*` environment variables
    pub fn from_env() -> SimResult<Self> {
        Self::default().with_env()
    }

    /// Overlay `SCHED_SIM_*` environment variables that are set
    pub fn with_env(mut self) -> SimResult<Self> {
        if let Some(policy) = env_var::<Policy>(ENV_POLICY)? {
            self.policy = policy;
        }
        if let Some(max_ticks) = env_var::<Tick>(ENV_MAX_TICKS)? {
            self.max_ticks = max_ticks;
        }
        if let Some(nr) = env_var::<usize>(ENV_RESOURCES)? {
            self.nr_resources = nr;
        }
        if let Some(ceiling) = env_var::<Priority>(ENV_CEILING)? {
            self.priority_ceiling = ceiling;
        }
        Ok(self)
    }

    #[must_use]
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_resources(mut self, nr_resources: usize) -> Self {
        self.nr_resources = nr_resources;
        self
    }

    #[must_use]
    pub fn with_ceiling(mut self, ceiling: Priority) -> Self {
        self.priority_ceiling = ceiling;
        self
    }

    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: Tick) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    #[must_use]
    pub fn with_invariant_checks(mut self, enabled: bool) -> Self {
        self.check_invariants = enabled;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.nr_resources == 0 {
            return Err(SimError::Configuration(
                "at least one resource is required".into(),
            ));
        }
        if self.priority_ceiling < MAX_PRIORITY {
            return Err(SimError::Configuration(format!(
                "priority ceiling {} is below the maximum process priority {}",
                self.priority_ceiling, MAX_PRIORITY
            )));
        }
        if self.max_ticks == 0 {
            return Err(SimError::Configuration("max_ticks must be positive".into()));
        }
        Ok(())
    }
}

fn env_var<T>(key: &str) -> SimResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| SimError::Configuration(format!("{}={:?}: {}", key, raw, e))),
        Err(_) => Ok(None),
    }
}
