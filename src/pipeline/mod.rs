use crate::config::{ConfigError, SchedulerConfig};
use crate::metrics::{MetricsCollector, ScheduleMetrics};
use crate::rooms::{RoomAllocation, RoomAllocator};
use crate::scheduler::{
    dsatur_coloring, greedy_coloring, simulated_annealing, Algorithm, ConflictGraph,
    ScheduleResult,
};
use crate::types::Snapshot;
use crate::validation::{validate_durations, DurationCheck};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

/// Everything one run produces for downstream reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub generated_at: String,
    pub schedule: ScheduleResult,
    /// Present only for simulated annealing.
    pub trajectory: Option<Vec<usize>>,
    pub rooms: RoomAllocation,
    pub durations: Vec<DurationCheck>,
    pub metrics: ScheduleMetrics,
}

/// One algorithm's result in a side-by-side comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmRun {
    pub schedule: ScheduleResult,
    pub trajectory: Option<Vec<usize>>,
    pub runtime_ms: f64,
}

pub struct ExamScheduler {
    config: SchedulerConfig,
}

impl ExamScheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn build_graph(snapshot: &Snapshot) -> ConflictGraph {
        let roster = snapshot.roster();
        ConflictGraph::build(&snapshot.enrollments, Some(&roster))
    }

    /// Full pipeline: graph, periods, rooms, durations, metrics.
    pub fn run(&self, snapshot: &Snapshot) -> Result<ScheduleReport, ConfigError> {
        let graph = Self::build_graph(snapshot);
        self.run_on_graph(snapshot, &graph)
    }

    /// Same as [`run`](Self::run) with a graph built elsewhere, e.g. from
    /// a line-oriented student file. Exam sizes come from the graph, so
    /// `snapshot.enrollments` is not consulted here.
    pub fn run_on_graph(
        &self,
        snapshot: &Snapshot,
        graph: &ConflictGraph,
    ) -> Result<ScheduleReport, ConfigError> {
        self.config.validate()?;

        info!(
            "Scheduling {} courses ({} conflicts) with {}",
            graph.node_count(),
            graph.edge_count(),
            self.config.algorithm
        );

        let start = Instant::now();
        let run = self.color(graph, self.config.algorithm);

        let sizes = graph.course_sizes();
        let allocator = RoomAllocator::with_seed(&snapshot.rooms, self.config.room_seed);
        let rooms = allocator.allocate(&run.schedule.periods, &sizes);
        let durations =
            validate_durations(&run.schedule.periods, &snapshot.courses, &snapshot.timeslots);
        let runtime_ms = start.elapsed().as_secs_f64() * 1000.0;

        if run.schedule.conflicts > 0 {
            warn!(
                "{} left {} conflicting course pairs",
                run.schedule.algorithm, run.schedule.conflicts
            );
        }

        let metrics =
            MetricsCollector::new().collect(graph, &run.schedule, &rooms, &durations, runtime_ms);

        info!(
            "{}: {} periods, {} conflicts, {} rooms unassigned in {:.2} ms",
            run.schedule.algorithm,
            run.schedule.period_count,
            run.schedule.conflicts,
            metrics.unassigned_rooms,
            runtime_ms
        );

        Ok(ScheduleReport {
            generated_at: chrono::Utc::now().to_rfc3339(),
            schedule: run.schedule,
            trajectory: run.trajectory,
            rooms,
            durations,
            metrics,
        })
    }

    /// Run every algorithm over one shared graph, in parallel.
    pub fn compare(&self, snapshot: &Snapshot) -> Result<Vec<AlgorithmRun>, ConfigError> {
        let graph = Self::build_graph(snapshot);
        self.compare_on_graph(&graph)
    }

    pub fn compare_on_graph(&self, graph: &ConflictGraph) -> Result<Vec<AlgorithmRun>, ConfigError> {
        self.config.validate()?;

        let runs: Vec<AlgorithmRun> = Algorithm::ALL[..]
            .par_iter()
            .map(|&algorithm| self.color(graph, algorithm))
            .collect();

        for run in &runs {
            info!(
                "{:<20} periods={:<4} conflicts={:<4} {:.2} ms",
                run.schedule.algorithm.to_string(),
                run.schedule.period_count,
                run.schedule.conflicts,
                run.runtime_ms
            );
        }
        Ok(runs)
    }

    fn color(&self, graph: &ConflictGraph, algorithm: Algorithm) -> AlgorithmRun {
        let start = Instant::now();
        let (schedule, trajectory) = match algorithm {
            Algorithm::Greedy => (greedy_coloring(graph), None),
            Algorithm::Dsatur => (dsatur_coloring(graph), None),
            Algorithm::SimulatedAnnealing => {
                // Each annealing run gets its own seed assignment.
                let seed = match self.config.refine_from {
                    Algorithm::Dsatur => dsatur_coloring(graph).periods,
                    _ => greedy_coloring(graph).periods,
                };
                let outcome = simulated_annealing(graph, Some(&seed), &self.config.annealing);
                (outcome.result, Some(outcome.trajectory))
            }
        };

        AlgorithmRun {
            schedule,
            trajectory,
            runtime_ms: start.elapsed().as_secs_f64() * 1000.0,
        }
    }
}

impl Default for ExamScheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnnealingConfig;
    use crate::types::{Course, Enrollment, Room, Timeslot};

    fn snapshot() -> Snapshot {
        Snapshot {
            enrollments: vec![
                Enrollment::new("1", "A"),
                Enrollment::new("1", "B"),
                Enrollment::new("2", "B"),
                Enrollment::new("2", "C"),
                Enrollment::new("3", "A"),
                Enrollment::new("3", "C"),
            ],
            courses: vec![
                Course::new("A", 90),
                Course::new("B", 120),
                Course::new("C", 60),
                Course::new("D", 60),
            ],
            rooms: vec![Room::new(1, 30), Room::new(2, 60)],
            timeslots: vec![Timeslot::new(1, 120), Timeslot::new(2, 90), Timeslot::new(3, 90)],
        }
    }

    #[test]
    fn test_run_default_pipeline() {
        let report = ExamScheduler::default().run(&snapshot()).unwrap();

        assert_eq!(report.schedule.algorithm, Algorithm::Dsatur);
        assert_eq!(report.schedule.period_count, 3);
        assert_eq!(report.schedule.conflicts, 0);
        assert_eq!(report.schedule.periods.len(), 4);
        assert_eq!(report.rooms.assignments.len(), 4);
        assert_eq!(report.durations.len(), 4);
        assert!(report.trajectory.is_none());
        assert_eq!(report.metrics.courses, 4);
    }

    #[test]
    fn test_run_annealing_reports_trajectory() {
        let config = SchedulerConfig {
            algorithm: Algorithm::SimulatedAnnealing,
            refine_from: Algorithm::Dsatur,
            annealing: AnnealingConfig {
                max_iters: 200,
                ..Default::default()
            },
            ..Default::default()
        };
        let report = ExamScheduler::new(config).run(&snapshot()).unwrap();

        let trajectory = report.trajectory.unwrap();
        assert!(!trajectory.is_empty() && trajectory.len() <= 200);
        assert_eq!(report.schedule.algorithm, Algorithm::SimulatedAnnealing);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SchedulerConfig {
            annealing: AnnealingConfig {
                cooling_rate: 1.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(ExamScheduler::new(config).run(&snapshot()).is_err());
    }

    #[test]
    fn test_compare_runs_all_algorithms() {
        let runs = ExamScheduler::default().compare(&snapshot()).unwrap();
        let algorithms: Vec<Algorithm> = runs.iter().map(|r| r.schedule.algorithm).collect();

        assert_eq!(algorithms, Algorithm::ALL.to_vec());
        assert_eq!(runs[0].schedule.conflicts, 0);
        assert_eq!(runs[1].schedule.conflicts, 0);
        assert!(runs[2].trajectory.is_some());
    }

    #[test]
    fn test_student_file_sizes_drive_rooms() {
        let mut snapshot = snapshot();
        snapshot.enrollments.clear();
        snapshot.rooms = vec![Room::new(1, 1), Room::new(2, 100)];
        let graph = ConflictGraph::from_student_text("A B\nA\nA\nA\n", Some(&snapshot.roster()));

        let report = ExamScheduler::default().run_on_graph(&snapshot, &graph).unwrap();

        assert_eq!(report.rooms.room_of(&"A".into()), Some(crate::types::RoomId(2)));
        assert!(report.rooms.shortfalls.is_empty());
    }

    #[test]
    fn test_empty_snapshot() {
        for algorithm in Algorithm::ALL {
            let config = SchedulerConfig {
                algorithm,
                ..Default::default()
            };
            let report = ExamScheduler::new(config).run(&Snapshot::default()).unwrap();
            assert_eq!(report.schedule.period_count, 0);
            assert_eq!(report.schedule.conflicts, 0);
            assert!(report.rooms.assignments.is_empty());
        }
    }
}
