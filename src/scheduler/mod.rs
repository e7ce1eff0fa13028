pub mod annealing;
pub mod conflict_graph;
pub mod dsatur;
pub mod greedy;

pub use annealing::{simulated_annealing, simulated_annealing_with_rng, AnnealingOutcome};
pub use conflict_graph::ConflictGraph;
pub use dsatur::dsatur_coloring;
pub use greedy::greedy_coloring;

use crate::types::{CourseId, Period, PeriodAssignment};
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    Greedy,
    #[serde(rename = "DSATUR")]
    Dsatur,
    SimulatedAnnealing,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::Greedy,
        Algorithm::Dsatur,
        Algorithm::SimulatedAnnealing,
    ];
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Greedy => write!(f, "Greedy"),
            Algorithm::Dsatur => write!(f, "DSATUR"),
            Algorithm::SimulatedAnnealing => write!(f, "SimulatedAnnealing"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "greedy" => Ok(Algorithm::Greedy),
            "dsatur" => Ok(Algorithm::Dsatur),
            "sa" | "annealing" | "simulated-annealing" | "simulatedannealing" => {
                Ok(Algorithm::SimulatedAnnealing)
            }
            other => Err(format!("Unknown algorithm: {}", other)),
        }
    }
}

/// Output shared by every period-assignment algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub periods: PeriodAssignment,
    /// Highest period used; 0 for an empty graph.
    pub period_count: Period,
    /// Edges whose endpoints share a period.
    pub conflicts: usize,
    pub algorithm: Algorithm,
}

impl ScheduleResult {
    /// `coloring` is indexed by graph node.
    pub(crate) fn from_coloring(
        graph: &ConflictGraph,
        coloring: &[Period],
        algorithm: Algorithm,
    ) -> Self {
        let periods = graph
            .courses()
            .iter()
            .cloned()
            .zip(coloring.iter().copied())
            .collect();

        Self {
            periods,
            period_count: coloring.iter().copied().max().unwrap_or(0),
            conflicts: count_conflicts(graph, coloring),
            algorithm,
        }
    }

    pub fn period_of(&self, course: &CourseId) -> Option<Period> {
        self.periods.get(course).copied()
    }

    /// Courses grouped by period, ascending.
    pub fn courses_by_period(&self) -> BTreeMap<Period, Vec<CourseId>> {
        let mut grouped: BTreeMap<Period, Vec<CourseId>> = BTreeMap::new();
        for (course, &period) in &self.periods {
            grouped.entry(period).or_default().push(course.clone());
        }
        grouped
    }
}

/// Count edges whose endpoints share a period, scanning every edge.
pub(crate) fn count_conflicts(graph: &ConflictGraph, coloring: &[Period]) -> usize {
    graph
        .edges()
        .into_iter()
        .filter(|&(a, b)| coloring[a] == coloring[b])
        .count()
}

/// Conflicting edges under a course-keyed assignment. Courses
/// missing from the assignment never conflict.
pub fn count_assignment_conflicts(graph: &ConflictGraph, periods: &PeriodAssignment) -> usize {
    graph
        .course_edges()
        .into_iter()
        .filter(|(a, b)| match (periods.get(a), periods.get(b)) {
            (Some(pa), Some(pb)) => pa == pb,
            _ => false,
        })
        .count()
}

/// Smallest positive period absent from `used`.
pub(crate) fn smallest_free_period(used: &AHashSet<Period>) -> Period {
    let mut period = 1;
    while used.contains(&period) {
        period += 1;
    }
    period
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Enrollment;

    #[test]
    fn test_algorithm_parse_and_display() {
        assert_eq!("greedy".parse::<Algorithm>().unwrap(), Algorithm::Greedy);
        assert_eq!("DSATUR".parse::<Algorithm>().unwrap(), Algorithm::Dsatur);
        assert_eq!(
            "sa".parse::<Algorithm>().unwrap(),
            Algorithm::SimulatedAnnealing
        );
        assert!("tabu".parse::<Algorithm>().is_err());
        assert_eq!(Algorithm::Dsatur.to_string(), "DSATUR");
        assert_eq!(
            serde_json::to_string(&Algorithm::Dsatur).unwrap(),
            "\"DSATUR\""
        );
    }

    #[test]
    fn test_smallest_free_period() {
        let used: AHashSet<Period> = [1, 2, 4].into_iter().collect();
        assert_eq!(smallest_free_period(&used), 3);
        assert_eq!(smallest_free_period(&AHashSet::new()), 1);
    }

    #[test]
    fn test_conflict_count_recomputed_from_edges() {
        let enrollments = vec![
            Enrollment::new("s", "A"),
            Enrollment::new("s", "B"),
            Enrollment::new("t", "B"),
            Enrollment::new("t", "C"),
        ];
        let graph = ConflictGraph::build(&enrollments, None);

        let result = ScheduleResult::from_coloring(&graph, &[1, 1, 1], Algorithm::Greedy);
        assert_eq!(result.conflicts, 2);
        assert_eq!(result.period_count, 1);
        assert_eq!(count_assignment_conflicts(&graph, &result.periods), 2);

        let result = ScheduleResult::from_coloring(&graph, &[1, 2, 1], Algorithm::Greedy);
        assert_eq!(result.conflicts, 0);
        assert_eq!(result.courses_by_period()[&1].len(), 2);
    }

    #[test]
    fn test_partial_assignment_counts_known_pairs_only() {
        let enrollments = vec![
            Enrollment::new("s", "A"),
            Enrollment::new("s", "B"),
            Enrollment::new("s", "C"),
        ];
        let graph = ConflictGraph::build(&enrollments, None);
        let periods: PeriodAssignment = [(CourseId::new("A"), 1), (CourseId::new("B"), 1)]
            .into_iter()
            .collect();

        assert_eq!(count_assignment_conflicts(&graph, &periods), 1);
        assert_eq!(count_assignment_conflicts(&graph, &PeriodAssignment::new()), 0);
    }
}
