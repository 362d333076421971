use fxhash::FxHashSet;
use rand::Rng;
use tracing::trace;

use crate::{
    error::OptimizerError,
    problem::{
        arrangement::{ArrangementIdx, Path},
        distance_table::Waypoint,
        oracle::CompatibilityOracle,
        passenger::PassengerIdx,
        trip_problem::TripProblem,
    },
};

use super::{
    annealing::{self, AnnealingSchedule},
    candidates::{Candidate, SubsetCandidates},
    context::BatchContext,
    path::optimize_path,
    score,
};

/// Fills one arrangement from the remaining pool and commits the result:
/// the best subset's path is written to the arrangement and its passengers
/// leave the pool. Already-full arrangements and empty pools are no-ops.
///
/// When the pool fits outright, only the pickup order is searched. When it
/// does not, candidate subsets of exactly the free-seat count are annealed,
/// each scored by a nested path search blended with the subset's social
/// incompatibility.
pub fn optimize_arrangement<C>(
    problem: &mut TripProblem,
    arrangement_idx: ArrangementIdx,
    pool: &mut Vec<PassengerIdx>,
    ctx: &mut BatchContext<'_, C>,
) -> Result<(), OptimizerError>
where
    C: CompatibilityOracle,
{
    let (capacity, path_len) = {
        let arrangement = problem.arrangement(arrangement_idx);
        (arrangement.capacity(), arrangement.path().len())
    };

    if path_len > capacity {
        return Err(OptimizerError::InvalidCapacity {
            arrangement: arrangement_idx,
            len: path_len,
            capacity,
        });
    }

    if path_len >= capacity || pool.is_empty() {
        return Ok(());
    }

    let origin = Waypoint::Origin(arrangement_idx);
    let destination = Waypoint::Destination(arrangement_idx);
    let lambda = score::path_lambda(ctx.distances.distance(origin, destination));

    let best_path = if pool.len() + path_len <= capacity {
        // Everyone fits; only the pickup order needs searching.
        let (path, _) = optimize_path(problem, arrangement_idx, pool, lambda, ctx);
        path
    } else {
        let seats = capacity - path_len;
        let candidates = SubsetCandidates::new(pool.clone(), seats);

        let mut current = candidates.first();
        let (current_path, current_path_score) =
            optimize_path(problem, arrangement_idx, &current, lambda, ctx);
        let current_incompatibility =
            score::score_incompatibility(problem, &current, ctx.compatibility)?;
        let mut current_score =
            score::combine_scores(ctx.params, current_path_score, current_incompatibility);

        let mut best = current_path;
        let mut best_score = current_score;

        let mut evaluations: usize = 1;
        let max_evaluations = annealing::max_evaluations(ctx.params, pool.len());
        let mut schedule = AnnealingSchedule::new(ctx.params);

        'search: loop {
            let mut tried: FxHashSet<Candidate> = FxHashSet::default();
            tried.insert(current.clone());

            let mut accepted = false;
            while let Some(candidate) = candidates.draw(&mut ctx.rng, &mut tried) {
                if evaluations >= max_evaluations {
                    break 'search;
                }
                evaluations += 1;

                let (candidate_path, candidate_path_score) =
                    optimize_path(problem, arrangement_idx, &candidate, lambda, ctx);
                let candidate_incompatibility =
                    score::score_incompatibility(problem, &candidate, ctx.compatibility)?;
                let candidate_score = score::combine_scores(
                    ctx.params,
                    candidate_path_score,
                    candidate_incompatibility,
                );

                if candidate_score < best_score {
                    best = candidate_path;
                    best_score = candidate_score;
                }

                let probability = annealing::acceptance_probability(
                    current_score,
                    candidate_score,
                    schedule.temperature(),
                );
                if ctx.rng.random::<f64>() < probability {
                    current = candidate;
                    current_score = candidate_score;
                    accepted = true;
                    break;
                }
            }

            if !accepted {
                break;
            }

            schedule.cool();
        }

        trace!(
            arrangement = %problem.arrangement(arrangement_idx).external_id(),
            evaluations,
            best_score,
            "subset search finished"
        );

        best
    };

    pool.retain(|passenger| !best_path.contains(passenger));
    problem
        .arrangement_mut(arrangement_idx)
        .set_path(Path::from_vec(best_path));

    Ok(())
}
