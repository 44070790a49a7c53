/*!
 * Simulation Driver
 * Advances the virtual clock and calls into the scheduler on behalf of the
 * running process
 */

use super::config::SimConfig;
use super::state::SimulationState;
use super::workload::{ProcessSpec, ResourceDemand, Workload};
use crate::core::errors::{SimError, SimResult};
use crate::core::types::{Pid, Tick};
use crate::monitoring::run_span;
use crate::scheduler::{Policy, Scheduler, SchedulerOps, SchedulerStats};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Process completion record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Completion {
    pub pid: Pid,
    /// Tick count when the process was reaped
    pub tick: Tick,
}

/// Result of a full run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SimulationReport {
    pub policy: Policy,
    pub scheduler: String,
    pub ticks: Tick,
    /// Process that ran in each tick, `None` for idle ticks
    pub timeline: Vec<Option<Pid>>,
    pub completions: Vec<Completion>,
    pub stats: SchedulerStats,
    /// Horizon reached with work left over
    pub truncated: bool,
}

impl SimulationReport {
    /// Pids in the order they ran, idle ticks skipped
    pub fn run_order(&self) -> Vec<Pid> {
        self.timeline.iter().flatten().copied().collect()
    }

    pub fn completion_of(&self, pid: Pid) -> Option<Tick> {
        self.completions
            .iter()
            .find(|c| c.pid == pid)
            .map(|c| c.tick)
    }
}

/// Outcome of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Ran(Pid),
    Idle,
    Finished,
}

/// Tick-by-tick driver for a workload
pub struct Simulation {
    config: SimConfig,
    scheduler: Scheduler,
    state: SimulationState,
    pending: VecDeque<ProcessSpec>,
    demands: AHashMap<Pid, Vec<ResourceDemand>>,
    timeline: Vec<Option<Pid>>,
    completions: Vec<Completion>,
}

impl Simulation {
    pub fn new(config: SimConfig, workload: Workload) -> SimResult<Self> {
        config.validate()?;
        workload.validate(config.nr_resources)?;

        // Stable sort keeps file order among processes created in the same tick
        let mut pending = workload.processes;
        pending.sort_by_key(|spec| spec.start);

        let scheduler = Scheduler::new(config.policy);
        info!(
            policy = config.policy.as_str(),
            scheduler = scheduler.name(),
            processes = pending.len(),
            resources = config.nr_resources,
            "Simulation created"
        );

        Ok(Self {
            state: SimulationState::new(&config),
            scheduler,
            config,
            pending: pending.into(),
            demands: AHashMap::new(),
            timeline: Vec::new(),
            completions: Vec::new(),
        })
    }

    #[inline]
    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    #[inline]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Run until every process completes or the horizon is reached
    pub fn run(mut self) -> SimResult<SimulationReport> {
        let span = run_span(self.config.policy.as_str(), self.pending.len());
        let _entered = span.enter();
        let mut truncated = false;

        loop {
            if self.state.tick() >= self.config.max_ticks {
                truncated = self.has_work();
                if !truncated {
                    // Reap a process that finished in the final tick
                    self.dispatch()?;
                } else {
                    warn!(
                        tick = self.state.tick(),
                        ready = self.state.ready_len(),
                        waiting = self.state.waiting_count(),
                        pending = self.pending.len(),
                        "Horizon reached with work remaining"
                    );
                }
                break;
            }
            if self.step()? == StepOutcome::Finished {
                break;
            }
        }

        info!(
            ticks = self.state.tick(),
            completed = self.completions.len(),
            truncated,
            "Simulation finished"
        );

        Ok(SimulationReport {
            policy: self.config.policy,
            scheduler: self.scheduler.name().to_string(),
            ticks: self.state.tick(),
            timeline: self.timeline,
            completions: self.completions,
            stats: self.state.stats(),
            truncated,
        })
    }

    /// Advance the simulation by one tick
    pub fn step(&mut self) -> SimResult<StepOutcome> {
        self.fork_arrivals()?;

        let mut next = self.dispatch()?;
        let mut blocked = 0usize;
        while let Some(pid) = next {
            if self.acquire_due(pid)? {
                break;
            }
            blocked += 1;
            if blocked > self.state.processes().len() {
                return Err(SimError::InvariantViolation(format!(
                    "tick {}: more blocks than live processes",
                    self.state.tick()
                )));
            }
            next = self.dispatch()?;
        }

        let outcome = match next {
            None => {
                if self.pending.is_empty() && self.state.ready_len() == 0 {
                    let waiting = self.state.waiting_count();
                    if waiting > 0 {
                        warn!(tick = self.state.tick(), waiting, "Deadlock detected");
                        return Err(SimError::Deadlock {
                            tick: self.state.tick(),
                            waiting,
                        });
                    }
                    return Ok(StepOutcome::Finished);
                }
                self.state.execute_current()?;
                debug!(tick = self.state.tick(), "Idle tick");
                StepOutcome::Idle
            }
            Some(pid) => {
                self.state.execute_current()?;
                self.release_due(pid)?;
                StepOutcome::Ran(pid)
            }
        };

        self.timeline.push(match outcome {
            StepOutcome::Ran(pid) => Some(pid),
            _ => None,
        });

        if self.config.check_invariants {
            self.state.check_invariants()?;
        }
        self.state.advance_tick();
        Ok(outcome)
    }

    fn has_work(&self) -> bool {
        !self.pending.is_empty()
            || self.state.ready_len() > 0
            || self.state.waiting_count() > 0
            || self
                .state
                .current()
                .and_then(|pid| self.state.process(pid).ok())
                .is_some_and(|p| !p.is_finished())
    }

    fn fork_arrivals(&mut self) -> SimResult<()> {
        let tick = self.state.tick();
        while self.pending.front().is_some_and(|spec| spec.start <= tick) {
            let Some(spec) = self.pending.pop_front() else {
                break;
            };
            let pid = self.state.spawn(spec.lifespan, spec.priority)?;
            debug!(
                tick,
                pid = %pid,
                lifespan = spec.lifespan,
                priority = spec.priority,
                "Process forked"
            );
            self.demands.insert(pid, spec.resources);
        }
        Ok(())
    }

    /// Call `schedule` and reap the outgoing process if it finished
    fn dispatch(&mut self) -> SimResult<Option<Pid>> {
        let prev = self.state.current();
        let next = self.scheduler.schedule(&mut self.state)?;

        if let Some(prev) = prev.filter(|&p| Some(p) != next) {
            let finished = self
                .state
                .process(prev)
                .map(|p| p.is_finished() && p.queue().is_none())
                .unwrap_or(false);
            if finished {
                self.state.reap(prev)?;
                self.demands.remove(&prev);
                self.completions.push(Completion {
                    pid: prev,
                    tick: self.state.tick(),
                });
            }
        }
        Ok(next)
    }

    /// Acquire everything `pid` needs at its current age
    ///
    /// Returns `false` as soon as one acquisition blocks.
    fn acquire_due(&mut self, pid: Pid) -> SimResult<bool> {
        let age = self.state.process(pid)?.age;
        let due: Vec<ResourceDemand> = self
            .demands
            .get(&pid)
            .map(|d| d.iter().filter(|d| d.at == age).copied().collect())
            .unwrap_or_default();

        for demand in due {
            if self.state.resource(demand.resource)?.owner == Some(pid) {
                continue;
            }
            if !self.scheduler.acquire(&mut self.state, demand.resource)? {
                debug!(
                    tick = self.state.tick(),
                    pid = %pid,
                    resource = demand.resource,
                    "Blocked on resource"
                );
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Release everything `pid` is done with after its last tick
    fn release_due(&mut self, pid: Pid) -> SimResult<()> {
        let age = self.state.process(pid)?.age;
        let due: Vec<ResourceDemand> = self
            .demands
            .get(&pid)
            .map(|d| d.iter().filter(|d| d.release_at() == Some(age)).copied().collect())
            .unwrap_or_default();

        for demand in due {
            if self.state.resource(demand.resource)?.owner == Some(pid) {
                self.scheduler.release(&mut self.state, demand.resource)?;
            }
        }
        Ok(())
    }
}
