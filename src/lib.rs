pub mod types;
pub mod config;
pub mod scheduler;
pub mod rooms;
pub mod validation;
pub mod metrics;
pub mod pipeline;
pub mod cli;

// Re-export commonly used types
pub use types::{
    CapacityShortfall, Course, CourseId, Enrollment, Period, PeriodAssignment, Room,
    RoomAssignment, RoomId, Snapshot, StudentId, Timeslot,
};

pub use config::{AnnealingConfig, ConfigError, SchedulerConfig};
pub use scheduler::{
    count_assignment_conflicts, dsatur_coloring, greedy_coloring,
    simulated_annealing, simulated_annealing_with_rng, Algorithm, AnnealingOutcome,
    ConflictGraph, ScheduleResult,
};
pub use rooms::{course_sizes, RoomAllocation, RoomAllocator};
pub use validation::{validate_durations, DurationCheck, DurationStatus};
pub use metrics::{MetricsCollector, ScheduleMetrics};
pub use pipeline::{AlgorithmRun, ExamScheduler, ScheduleReport};
