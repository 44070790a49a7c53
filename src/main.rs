/*!
 * Scheduling Simulator - Command Line Entry Point
 *
 * Loads a JSON workload, runs it under one scheduling policy and prints the
 * per-tick timeline.
 */

use clap::Parser;
use miette::IntoDiagnostic;
use std::path::PathBuf;
use tracing::info;

use sched_sim::{init_tracing, Policy, SimConfig, Simulation, SimulationReport, Workload};

#[derive(Debug, Parser)]
#[clap(name = "sched-sim", version, about = "Discrete-tick process scheduling simulator")]
struct Opts {
    /// Workload description (JSON).
    workload: PathBuf,

    /// Scheduling policy: fifo, sjf, srtf, rr, prio, pcp or pip.
    #[clap(short = 'p', long)]
    policy: Option<Policy>,

    /// Stop after this many ticks even if processes remain.
    #[clap(short = 't', long)]
    max_ticks: Option<u64>,

    /// Number of resources in the system.
    #[clap(short = 'r', long)]
    resources: Option<usize>,

    /// Priority a holder is raised to under the ceiling protocol.
    #[clap(long)]
    ceiling: Option<u32>,

    /// Skip the per-tick invariant check.
    #[clap(long)]
    no_check: bool,

    /// Only print the summary.
    #[clap(short = 'q', long)]
    quiet: bool,

    /// Print the full report as JSON.
    #[clap(long)]
    json: bool,
}

impl Opts {
    /// CLI values override environment, which overrides defaults
    fn config(&self) -> sched_sim::SimResult<SimConfig> {
        let mut config = SimConfig::from_env()?;
        if let Some(policy) = self.policy {
            config = config.with_policy(policy);
        }
        if let Some(max_ticks) = self.max_ticks {
            config = config.with_max_ticks(max_ticks);
        }
        if let Some(resources) = self.resources {
            config = config.with_resources(resources);
        }
        if let Some(ceiling) = self.ceiling {
            config = config.with_ceiling(ceiling);
        }
        if self.no_check {
            config = config.with_invariant_checks(false);
        }
        Ok(config)
    }
}

fn main() -> miette::Result<()> {
    let opts = Opts::parse();
    init_tracing();

    let config = opts.config()?;
    let workload = Workload::from_path(&opts.workload)?;
    info!(
        workload = %opts.workload.display(),
        policy = config.policy.as_str(),
        "Starting simulation"
    );

    let report = Simulation::new(config, workload)?.run()?;

    if opts.json {
        let out = serde_json::to_string_pretty(&report).into_diagnostic()?;
        println!("{}", out);
        return Ok(());
    }

    if !opts.quiet {
        print_timeline(&report);
    }
    print_summary(&report);
    Ok(())
}

fn print_timeline(report: &SimulationReport) {
    for (tick, slot) in report.timeline.iter().enumerate() {
        match slot {
            Some(pid) => println!("{:>5}: {}", tick, pid),
            None => println!("{:>5}: -", tick),
        }
    }
}

fn print_summary(report: &SimulationReport) {
    println!();
    println!("Scheduler   : {}", report.scheduler);
    println!("Ticks       : {}", report.ticks);
    println!("Completed   : {}", report.completions.len());
    for completion in &report.completions {
        println!("  pid {:>3} finished at tick {}", completion.pid, completion.tick);
    }
    println!(
        "Switches    : {} (preemptions: {})",
        report.stats.context_switches, report.stats.preemptions
    );
    println!(
        "Resources   : {} blocks, {} wakeups, {} boosts",
        report.stats.blocks, report.stats.wakeups, report.stats.priority_boosts
    );
    if report.truncated {
        println!("Horizon reached before all processes completed");
    }
}
