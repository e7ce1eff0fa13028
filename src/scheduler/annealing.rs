use super::{count_conflicts, greedy_coloring, Algorithm, ConflictGraph, ScheduleResult};
use crate::config::AnnealingConfig;
use crate::types::{Period, PeriodAssignment};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Floor applied to the temperature in the acceptance test.
const MIN_TEMPERATURE: f64 = 1e-8;

/// Terminal annealing result plus the per-iteration conflict trajectory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnealingOutcome {
    pub result: ScheduleResult,
    /// Conflict count after each iteration, in order.
    pub trajectory: Vec<usize>,
    pub final_temperature: f64,
    pub accepted: usize,
    pub rejected: usize,
    /// Proposals equal to the current period.
    pub skipped: usize,
}

/// Refine `initial` (or the greedy coloring when `None`) with a generator
/// seeded from `config.seed`.
pub fn simulated_annealing(
    graph: &ConflictGraph,
    initial: Option<&PeriodAssignment>,
    config: &AnnealingConfig,
) -> AnnealingOutcome {
    let mut rng = StdRng::seed_from_u64(config.seed);
    simulated_annealing_with_rng(graph, initial, config, &mut rng)
}

/// Simulated annealing over period assignments.
///
/// The period ceiling is the highest period in the seed assignment and
/// proposals never exceed it. Every iteration picks a course and a target
/// period uniformly at random. A proposal equal to the current period is
/// skipped, but it still cools the temperature and consumes one iteration
/// of the budget. Otherwise the move is accepted when it does not add
/// conflicts, or with probability `exp(-delta / max(T, 1e-8))`. The loop
/// stops as soon as the conflict count reaches zero or the budget runs out.
///
/// Courses missing from `initial` start in period 1; entries for courses
/// outside the graph are ignored. The caller's assignment is not mutated.
pub fn simulated_annealing_with_rng<R: Rng>(
    graph: &ConflictGraph,
    initial: Option<&PeriodAssignment>,
    config: &AnnealingConfig,
    rng: &mut R,
) -> AnnealingOutcome {
    let mut current = match initial {
        Some(seed) => seed_coloring(graph, seed),
        None => seed_coloring(graph, &greedy_coloring(graph).periods),
    };

    let n = current.len();
    let ceiling = current.iter().copied().max().unwrap_or(0);
    let mut conflicts = count_conflicts(graph, &current);
    let mut temperature = config.initial_temperature;
    let mut trajectory = Vec::new();
    let (mut accepted, mut rejected, mut skipped) = (0usize, 0usize, 0usize);

    debug!(
        "Annealing {} courses: ceiling={}, start conflicts={}, T0={}, alpha={}",
        n, ceiling, conflicts, config.initial_temperature, config.cooling_rate
    );

    if n > 0 {
        for _ in 0..config.max_iters {
            let node = rng.gen_range(0..n);
            let proposal = rng.gen_range(1..=ceiling);
            let old = current[node];

            if proposal == old {
                skipped += 1;
            } else {
                let delta = conflict_delta(graph, &current, node, proposal);
                let accept = delta <= 0
                    || rng.gen::<f64>()
                        < (-(delta as f64) / temperature.max(MIN_TEMPERATURE)).exp();

                if accept {
                    current[node] = proposal;
                    conflicts = (conflicts as i64 + delta) as usize;
                    accepted += 1;
                } else {
                    rejected += 1;
                }
            }

            temperature *= config.cooling_rate;
            trajectory.push(conflicts);

            if conflicts == 0 {
                break;
            }
        }
    }

    let result = ScheduleResult::from_coloring(graph, &current, Algorithm::SimulatedAnnealing);
    debug_assert_eq!(result.conflicts, conflicts);

    info!(
        "Annealing finished after {} iterations: {} conflicts, {} periods (accepted={}, rejected={}, skipped={})",
        trajectory.len(),
        result.conflicts,
        result.period_count,
        accepted,
        rejected,
        skipped
    );

    AnnealingOutcome {
        result,
        trajectory,
        final_temperature: temperature,
        accepted,
        rejected,
        skipped,
    }
}

fn seed_coloring(graph: &ConflictGraph, seed: &PeriodAssignment) -> Vec<Period> {
    let mut filled = 0usize;
    let coloring = graph
        .courses()
        .iter()
        .map(|course| match seed.get(course) {
            Some(&p) if p >= 1 => p,
            _ => {
                filled += 1;
                1
            }
        })
        .collect();

    if filled > 0 {
        warn!("Seed assignment missing {} courses; placed them in period 1", filled);
    }
    coloring
}

/// Change in total conflicts if `node` moves to `target`.
fn conflict_delta(graph: &ConflictGraph, coloring: &[Period], node: usize, target: Period) -> i64 {
    let old = coloring[node];
    graph.neighbors(node).fold(0i64, |delta, n| {
        let p = coloring[n];
        delta + i64::from(p == target) - i64::from(p == old)
    })
}
