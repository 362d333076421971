use fxhash::FxHashSet;
use rand::Rng;
use tracing::trace;

use crate::problem::{
    arrangement::ArrangementIdx, distance_table::Waypoint, passenger::PassengerIdx,
    trip_problem::TripProblem,
};

use super::{
    annealing::{self, AnnealingSchedule},
    candidates::{Candidate, PermutationCandidates},
    context::BatchContext,
    score,
};

/// Orders the arrangement's current riders together with `new_passengers`
/// into a low-distance pickup route from origin to destination, annealing
/// over permutations. Returns the best-ever ordering seen and its score; the
/// arrangement itself is left untouched.
///
/// `lambda` is the arrangement's own normalization constant (see
/// [`score::path_lambda`]) and must come from the same arrangement's
/// endpoints.
pub fn optimize_path<C>(
    problem: &TripProblem,
    arrangement_idx: ArrangementIdx,
    new_passengers: &[PassengerIdx],
    lambda: f64,
    ctx: &mut BatchContext<'_, C>,
) -> (Vec<PassengerIdx>, f64) {
    let arrangement = problem.arrangement(arrangement_idx);
    let origin = Waypoint::Origin(arrangement_idx);
    let destination = Waypoint::Destination(arrangement_idx);

    let existing: Vec<PassengerIdx> = arrangement.path().to_vec();
    let existing_score = score::score_path(ctx.distances, lambda, origin, &existing, destination);

    if new_passengers.is_empty()
        || arrangement.is_full()
        || existing.len() + new_passengers.len() > arrangement.capacity()
    {
        return (existing, existing_score);
    }

    if existing.is_empty() && new_passengers.len() == 1 {
        let path = new_passengers.to_vec();
        let path_score = score::score_path(ctx.distances, lambda, origin, &path, destination);
        return (path, path_score);
    }

    let mut combined = existing;
    combined.extend_from_slice(new_passengers);
    let candidates = PermutationCandidates::new(combined);

    let mut current = candidates.first();
    let mut current_score =
        score::score_path(ctx.distances, lambda, origin, &current, destination);
    let mut best = current.clone();
    let mut best_score = current_score;

    let mut evaluations: usize = 1;
    let max_evaluations = annealing::max_evaluations(ctx.params, candidates.len());
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

            let candidate_score =
                score::score_path(ctx.distances, lambda, origin, &candidate, destination);

            if candidate_score < best_score {
                best = candidate.clone();
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

        // A full sweep with no accepted move ends the search.
        if !accepted {
            break;
        }

        schedule.cool();
    }

    trace!(
        arrangement = %problem.arrangement(arrangement_idx).external_id(),
        evaluations,
        best_score,
        "path search finished"
    );

    (best, best_score)
}
