//! Constellation Connectivity CLI
//!
//! Builds a scenario, refreshes every node on a fixed interval through the
//! event queue and writes the links that are up at the end.
//!
//! Usage:
//!   constellation-sim --scenario data/scenario.json \
//!                     --duration-s 600 --report-interval-s 60 \
//!                     --output data/links.json

use anyhow::{Context, Result};
use clap::Parser;
use leo_link::LinkPreset;
use leo_orbit::SimTime;
use leo_topology::{
    CourseChangeCounter, EventQueue, LinkKind, LinkRecord, ScenarioConfig, Scheduler, TracingObserver,
};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "constellation-sim",
    about = "Propagate a LEO constellation and report link connectivity"
)]
struct Args {
    /// Scenario JSON file
    #[arg(short, long, default_value = "data/scenario.json")]
    scenario: PathBuf,

    /// Simulated duration in seconds
    #[arg(short, long, default_value_t = 600)]
    duration_s: i64,

    /// Interval between connectivity summaries in seconds
    #[arg(short, long, default_value_t = 60)]
    report_interval_s: i64,

    /// Output JSON file for the final link report
    #[arg(short, long, default_value = "data/links.json")]
    output: PathBuf,

    /// Replace the ground link budget with a published preset and its EIRP
    #[arg(long)]
    ground_preset: Option<LinkPreset>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy)]
enum Event {
    /// Resample every node's mobility
    Refresh,
    Report,
    Finish,
}

#[derive(Debug, Serialize)]
struct StepSummary {
    t_s: f64,
    isl_up: usize,
    ground_up: usize,
}

#[derive(Debug, Serialize)]
struct SimulationReport {
    generated_at: String,
    scenario: PathBuf,
    nodes: usize,
    satellites: usize,
    duration_s: i64,
    course_changes: usize,
    steps: Vec<StepSummary>,
    links: Vec<LinkRecord>,
}

fn summarize(t: SimTime, links: &[LinkRecord]) -> StepSummary {
    let up = |kind| links.iter().filter(|r| r.up && r.kind == kind).count();
    StepSummary {
        t_s: t.num_milliseconds() as f64 / 1000.0,
        isl_up: up(LinkKind::Isl),
        ground_up: up(LinkKind::Ground),
    }
}

/// Whole seconds from a CLI flag as simulated time
fn seconds(flag: &str, value: i64) -> Result<SimTime> {
    SimTime::try_seconds(value)
        .with_context(|| format!("{flag} {value} is outside the simulated time range"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "constellation_sim=debug,leo_topology=debug,leo_link=debug"
    } else {
        "constellation_sim=info,leo_topology=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    anyhow::ensure!(args.duration_s >= 0, "--duration-s must not be negative");
    anyhow::ensure!(args.report_interval_s > 0, "--report-interval-s must be positive");

    info!("{}", "=".repeat(60));
    info!("LEO Constellation Connectivity");
    info!("{}", "=".repeat(60));

    let mut config = ScenarioConfig::from_path(&args.scenario)
        .with_context(|| format!("loading scenario {:?}", args.scenario))?;
    if let Some(preset) = args.ground_preset {
        info!("Ground link preset {} ({} dBm EIRP)", preset, preset.eirp_dbm());
        config = config
            .with_ground_link(preset.parameters())
            .with_tx_power_dbm(preset.eirp_dbm());
    }

    let mut scenario = config.build()?;
    let changes = CourseChangeCounter::new();
    scenario.registry.subscribe(Box::new(changes.clone()));
    scenario.registry.subscribe(Box::new(TracingObserver));
    let satellites = scenario.registry.satellites().count();
    if satellites == 0 {
        warn!("Scenario has no satellites");
    }

    let end = seconds("--duration-s", args.duration_s)?;
    let interval = seconds("--report-interval-s", args.report_interval_s)?;
    let mut queue = EventQueue::new();
    let mut t = SimTime::zero();
    while t < end {
        queue.schedule(t, Event::Report)?;
        let Some(next) = t.checked_add(&interval) else {
            break;
        };
        t = next;
    }
    queue.schedule(end, Event::Finish)?;

    // Exact-precision scenarios never cache, so there is nothing to refresh
    let precision = config.precision()?;
    if precision > SimTime::zero() {
        queue.schedule(precision, Event::Refresh)?;
    }

    let mut steps = Vec::new();
    let mut links = Vec::new();
    while let Some((now, event)) = queue.pop() {
        if let Event::Refresh = event {
            scenario.registry.snapshot(now);
            if now.checked_add(&precision).is_some_and(|next| next < end) {
                queue.schedule_in(precision, Event::Refresh)?;
            }
            continue;
        }

        let report = scenario.connectivity.link_report(
            &mut scenario.registry,
            scenario.tx_power_dbm,
            now,
        );
        let summary = summarize(now, &report);
        info!(
            "t={:>8.1}s | ISL up {:>6} | ground up {:>5}",
            summary.t_s, summary.isl_up, summary.ground_up
        );
        steps.push(summary);
        if let Event::Finish = event {
            links = report.into_iter().filter(|r| r.up).collect();
        }
    }

    let result = SimulationReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        scenario: args.scenario.clone(),
        nodes: scenario.registry.len(),
        satellites,
        duration_s: args.duration_s,
        course_changes: changes.count(),
        steps,
        links,
    };

    info!("\nWriting output to {:?}", args.output);
    let file = File::create(&args.output)
        .with_context(|| format!("creating {:?}", args.output))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &result)?;

    info!("\n{}", "=".repeat(60));
    info!("SUMMARY");
    info!("{}", "=".repeat(60));
    info!("Nodes: {} ({} satellites)", result.nodes, result.satellites);
    info!("Course changes: {}", result.course_changes);
    info!("Links up at end: {}", result.links.len());

    Ok(())
}
