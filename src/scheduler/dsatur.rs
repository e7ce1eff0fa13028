use super::{smallest_free_period, Algorithm, ConflictGraph, ScheduleResult};
use crate::types::Period;
use ahash::AHashSet;
use tracing::debug;

/// Degree-of-saturation (DSATUR) coloring.
///
/// Repeatedly colors the uncolored course whose colored neighbors span
/// the most distinct periods. Ties go to the course with the most
/// uncolored neighbors, then to the lowest canonical node index.
///
/// Saturation sets and uncolored degrees are updated incrementally after
/// each pick; the values match a full recomputation over the uncolored
/// set. Selection is a linear scan, O(V^2) overall.
pub fn dsatur_coloring(graph: &ConflictGraph) -> ScheduleResult {
    let n = graph.node_count();
    let mut coloring: Vec<Period> = vec![0; n];
    let mut neighbor_periods: Vec<AHashSet<Period>> = vec![AHashSet::new(); n];
    let mut uncolored_degree: Vec<usize> = (0..n).map(|v| graph.degree(v)).collect();
    let mut colored = vec![false; n];

    for _ in 0..n {
        let mut pick: Option<usize> = None;
        for v in (0..n).filter(|&v| !colored[v]) {
            let better = match pick {
                None => true,
                Some(best) => {
                    (neighbor_periods[v].len(), uncolored_degree[v])
                        > (neighbor_periods[best].len(), uncolored_degree[best])
                }
            };
            if better {
                pick = Some(v);
            }
        }

        let Some(v) = pick else { break };
        let period = smallest_free_period(&neighbor_periods[v]);
        coloring[v] = period;
        colored[v] = true;

        for u in graph.neighbors(v) {
            if !colored[u] {
                neighbor_periods[u].insert(period);
                uncolored_degree[u] -= 1;
            }
        }
    }

    let result = ScheduleResult::from_coloring(graph, &coloring, Algorithm::Dsatur);
    debug!(
        "DSATUR: {} courses in {} periods",
        n, result.period_count
    );
    result
}
