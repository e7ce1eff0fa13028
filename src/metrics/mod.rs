use crate::rooms::RoomAllocation;
use crate::scheduler::{ConflictGraph, ScheduleResult};
use crate::validation::DurationCheck;
use serde::{Deserialize, Serialize};

/// Summary of one scheduling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetrics {
    pub algorithm: String,
    pub courses: usize,
    pub edges: usize,
    pub density: f64,
    pub max_degree: usize,
    pub avg_degree: f64,
    pub periods: u32,
    pub conflicts: usize,
    pub conflict_ratio: f64,
    pub rooms_assigned: usize,
    pub unassigned_rooms: usize,
    pub under_capacity: usize,
    pub duration_failures: usize,
    pub runtime_ms: f64,
}

/// Conflicting edges over all edges; 0 when the graph has no edges.
pub fn conflict_ratio(edges: usize, conflicts: usize) -> f64 {
    if edges == 0 {
        0.0
    } else {
        conflicts as f64 / edges as f64
    }
}

/// Metrics collector for schedule quality
pub struct MetricsCollector;

impl MetricsCollector {
    pub fn new() -> Self {
        Self
    }

    pub fn collect(
        &self,
        graph: &ConflictGraph,
        schedule: &ScheduleResult,
        rooms: &RoomAllocation,
        durations: &[DurationCheck],
        runtime_ms: f64,
    ) -> ScheduleMetrics {
        tracing::debug!("Collecting metrics for {}", schedule.algorithm);

        let unassigned_rooms = rooms.unassigned_count();

        ScheduleMetrics {
            algorithm: schedule.algorithm.to_string(),
            courses: graph.node_count(),
            edges: graph.edge_count(),
            density: graph.density(),
            max_degree: graph.max_degree(),
            avg_degree: graph.avg_degree(),
            periods: schedule.period_count,
            conflicts: schedule.conflicts,
            conflict_ratio: conflict_ratio(graph.edge_count(), schedule.conflicts),
            rooms_assigned: rooms.assignments.len() - unassigned_rooms,
            unassigned_rooms,
            under_capacity: rooms.shortfalls.len(),
            duration_failures: durations.iter().filter(|d| !d.is_ok()).count(),
            runtime_ms,
        }
    }

    /// Export metrics to JSON file
    pub fn export_json(&self, metrics: &ScheduleMetrics, path: &str) -> Result<(), std::io::Error> {
        let json = serde_json::to_string_pretty(metrics)?;
        std::fs::write(path, json)?;
        tracing::info!("Exported metrics to {}", path);
        Ok(())
    }

    /// Print metrics to console
    pub fn print_metrics(&self, metrics: &ScheduleMetrics) {
        println!("\n═══════════════════════════════════════════════════");
        println!("           Exam Schedule Metrics ({})", metrics.algorithm);
        println!("═══════════════════════════════════════════════════\n");

        println!("📊 Conflict Graph:");
        println!("  Courses:          {}", metrics.courses);
        println!("  Edges:            {}", metrics.edges);
        println!("  Density:          {:.1}%", metrics.density * 100.0);
        println!("  Max Degree:       {}", metrics.max_degree);
        println!("  Avg Degree:       {:.2}", metrics.avg_degree);

        println!("\n📅 Periods:");
        println!("  Periods Used:     {}", metrics.periods);
        println!("  Conflicts:        {}", metrics.conflicts);
        println!("  Conflict Ratio:   {:.1}%", metrics.conflict_ratio * 100.0);

        println!("\n🏫 Rooms:");
        println!("  Assigned:         {}", metrics.rooms_assigned);
        println!("  Unassigned:       {}", metrics.unassigned_rooms);
        println!("  Under Capacity:   {}", metrics.under_capacity);

        println!("\n⏱️  Durations:");
        println!("  Failures:         {}", metrics.duration_failures);
        println!("  Runtime:          {:.2} ms", metrics.runtime_ms);

        println!("\n═══════════════════════════════════════════════════\n");
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rooms::RoomAllocator;
    use crate::scheduler::dsatur_coloring;
    use crate::types::{CourseId, Enrollment, Room};
    use std::collections::BTreeMap;

    #[test]
    fn test_conflict_ratio_guarded() {
        assert_eq!(conflict_ratio(0, 0), 0.0);
        assert_eq!(conflict_ratio(4, 1), 0.25);
    }

    #[test]
    fn test_collect_empty_run() {
        let graph = ConflictGraph::new();
        let schedule = dsatur_coloring(&graph);
        let metrics = MetricsCollector::new().collect(
            &graph,
            &schedule,
            &RoomAllocation::default(),
            &[],
            0.0,
        );

        assert_eq!(metrics.courses, 0);
        assert_eq!(metrics.periods, 0);
        assert_eq!(metrics.density, 0.0);
        assert_eq!(metrics.avg_degree, 0.0);
        assert_eq!(metrics.conflict_ratio, 0.0);
        assert_eq!(metrics.algorithm, "DSATUR");
    }

    #[test]
    fn test_collect_counts_rooms() {
        let enrollments = vec![Enrollment::new("s", "A"), Enrollment::new("s", "B")];
        let graph = ConflictGraph::build(&enrollments, None);
        let schedule = dsatur_coloring(&graph);
        let sizes: BTreeMap<CourseId, u32> =
            [("A".into(), 5), ("B".into(), 50)].into_iter().collect();
        let rooms =
            RoomAllocator::with_seed(&[Room::new(1, 20)], 0).allocate(&schedule.periods, &sizes);

        let metrics = MetricsCollector::new().collect(&graph, &schedule, &rooms, &[], 1.5);
        assert_eq!(metrics.periods, 2);
        assert_eq!(metrics.rooms_assigned, 2);
        assert_eq!(metrics.unassigned_rooms, 0);
        assert_eq!(metrics.under_capacity, 1);
    }

    #[test]
    fn test_metrics_export() {
        let graph = ConflictGraph::new();
        let schedule = dsatur_coloring(&graph);
        let collector = MetricsCollector::new();
        let metrics = collector.collect(&graph, &schedule, &RoomAllocation::default(), &[], 0.0);

        let temp_file = std::env::temp_dir().join("exam_scheduler_test_metrics.json");
        let path = temp_file.to_string_lossy().to_string();
        collector.export_json(&metrics, &path).unwrap();

        assert!(temp_file.exists());
        std::fs::remove_file(&temp_file).ok();
    }
}
