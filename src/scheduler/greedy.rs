use super::{smallest_free_period, Algorithm, ConflictGraph, ScheduleResult};
use crate::types::Period;
use ahash::AHashSet;
use std::cmp::Reverse;
use tracing::debug;

/// Largest-degree-first greedy coloring.
///
/// Courses are visited by decreasing degree; equal degrees keep canonical
/// node order (ascending course id) because the sort is stable. Each
/// course takes the smallest period no colored neighbor already holds,
/// so the result never has conflicts and uses at most max degree + 1
/// periods.
pub fn greedy_coloring(graph: &ConflictGraph) -> ScheduleResult {
    let mut order: Vec<usize> = (0..graph.node_count()).collect();
    order.sort_by_key(|&node| Reverse(graph.degree(node)));

    // 0 = not yet colored
    let mut coloring: Vec<Period> = vec![0; graph.node_count()];

    for node in order {
        let used: AHashSet<Period> = graph
            .neighbors(node)
            .map(|n| coloring[n])
            .filter(|&p| p > 0)
            .collect();
        coloring[node] = smallest_free_period(&used);
    }

    let result = ScheduleResult::from_coloring(graph, &coloring, Algorithm::Greedy);
    debug!(
        "Greedy: {} courses in {} periods",
        graph.node_count(),
        result.period_count
    );
    result
}
