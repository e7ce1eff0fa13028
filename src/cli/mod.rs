use crate::config::{AnnealingConfig, SchedulerConfig};
use crate::metrics::MetricsCollector;
use crate::pipeline::ExamScheduler;
use crate::scheduler::{Algorithm, ConflictGraph};
use crate::types::Snapshot;
use clap::{Parser, Subcommand};
use std::io::BufReader;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "exam-scheduler")]
#[command(about = "Exam period and room scheduler", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Schedule {
        /// JSON snapshot with enrollments, courses, rooms and timeslots
        #[arg(long)]
        input: String,

        /// Build the conflict graph from a student file (one line per student)
        #[arg(long)]
        stu: Option<String>,

        #[arg(long, default_value = "dsatur")]
        algorithm: Algorithm,

        /// Starting coloring for simulated annealing
        #[arg(long, default_value = "greedy")]
        refine_from: Algorithm,

        #[arg(long, default_value = "1.0")]
        t0: f64,

        #[arg(long, default_value = "0.995")]
        alpha: f64,

        #[arg(long, default_value = "10000")]
        max_iters: usize,

        #[arg(long, default_value = "42")]
        seed: u64,

        #[arg(long, default_value = "42")]
        room_seed: u64,

        #[arg(long, default_value = "schedule.json")]
        output: String,

        #[arg(long)]
        metrics: Option<String>,
    },

    Compare {
        #[arg(long)]
        input: String,

        #[arg(long)]
        stu: Option<String>,

        #[arg(long, default_value = "greedy")]
        refine_from: Algorithm,

        #[arg(long, default_value = "1.0")]
        t0: f64,

        #[arg(long, default_value = "0.995")]
        alpha: f64,

        #[arg(long, default_value = "10000")]
        max_iters: usize,

        #[arg(long, default_value = "42")]
        seed: u64,

        #[arg(long, default_value = "comparison.json")]
        output: String,
    },
}

pub fn handle_command(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Schedule {
            input,
            stu,
            algorithm,
            refine_from,
            t0,
            alpha,
            max_iters,
            seed,
            room_seed,
            output,
            metrics,
        } => {
            let config = SchedulerConfig {
                algorithm,
                refine_from,
                annealing: AnnealingConfig {
                    initial_temperature: t0,
                    cooling_rate: alpha,
                    max_iters,
                    seed,
                },
                room_seed,
            };
            handle_schedule(&input, stu.as_deref(), config, &output, metrics.as_deref())
        }

        Commands::Compare {
            input,
            stu,
            refine_from,
            t0,
            alpha,
            max_iters,
            seed,
            output,
        } => {
            let config = SchedulerConfig {
                refine_from,
                annealing: AnnealingConfig {
                    initial_temperature: t0,
                    cooling_rate: alpha,
                    max_iters,
                    seed,
                },
                ..Default::default()
            };
            handle_compare(&input, stu.as_deref(), config, &output)
        }
    }
}

fn load_snapshot(path: &str) -> Result<Snapshot, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&json)?;
    info!(
        "Loaded {}: {} enrollments, {} courses, {} rooms, {} timeslots",
        path,
        snapshot.enrollments.len(),
        snapshot.courses.len(),
        snapshot.rooms.len(),
        snapshot.timeslots.len()
    );
    Ok(snapshot)
}

fn load_graph(
    snapshot: &Snapshot,
    stu: Option<&str>,
) -> Result<ConflictGraph, Box<dyn std::error::Error>> {
    match stu {
        Some(path) => {
            let file = std::fs::File::open(path)?;
            let roster = snapshot.roster();
            Ok(ConflictGraph::from_student_lines(BufReader::new(file), Some(&roster))?)
        }
        None => Ok(ExamScheduler::build_graph(snapshot)),
    }
}

fn handle_schedule(
    input: &str,
    stu: Option<&str>,
    config: SchedulerConfig,
    output: &str,
    metrics_path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = load_snapshot(input)?;
    let graph = load_graph(&snapshot, stu)?;

    let report = ExamScheduler::new(config).run_on_graph(&snapshot, &graph)?;

    for shortfall in &report.rooms.shortfalls {
        warn!(
            "Under capacity: {} needs {} seats, room {} has {} (period {})",
            shortfall.course, shortfall.required, shortfall.room, shortfall.capacity, shortfall.period
        );
    }

    let json = serde_json::to_string_pretty(&report)?;
    std::fs::write(output, json)?;
    info!("Wrote schedule to {}", output);

    let collector = MetricsCollector::new();
    collector.print_metrics(&report.metrics);
    if let Some(path) = metrics_path {
        collector.export_json(&report.metrics, path)?;
    }

    Ok(())
}

fn handle_compare(
    input: &str,
    stu: Option<&str>,
    config: SchedulerConfig,
    output: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = load_snapshot(input)?;
    let graph = load_graph(&snapshot, stu)?;

    let runs = ExamScheduler::new(config).compare_on_graph(&graph)?;

    let json = serde_json::to_string_pretty(&runs)?;
    std::fs::write(output, json)?;
    info!("Wrote comparison of {} algorithms to {}", runs.len(), output);

    Ok(())
}
