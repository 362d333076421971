use crate::{
    error::OptimizerError,
    problem::{
        distance_table::{DistanceTable, Waypoint},
        oracle::CompatibilityOracle,
        passenger::PassengerIdx,
        trip_problem::TripProblem,
    },
};

use super::params::SolverParams;

/// Normalization constant for one arrangement's path scores, chosen so the
/// transform is unit-free: `λ = -ln(0.9) / direct`, where `direct` is the
/// origin-to-destination distance. A degenerate direct leg of zero yields
/// `λ = 0`, keeping every score finite (all paths then score 0 and the
/// incompatibility term decides).
///
/// Never reuse a λ across arrangements; it is calibrated to one pair of
/// endpoints.
pub(crate) fn path_lambda(direct_distance: f64) -> f64 {
    if direct_distance <= 0.0 {
        0.0
    } else {
        -(0.9_f64.ln()) / direct_distance
    }
}

/// Total leg distance `origin → pickups → destination`, squashed into
/// `[0, 1)` by the exponential CDF `1 - exp(-λ·d)`. Lower is better.
pub(crate) fn score_path(
    distances: &DistanceTable,
    lambda: f64,
    origin: Waypoint,
    path: &[PassengerIdx],
    destination: Waypoint,
) -> f64 {
    let mut total = 0.0;
    let mut previous = origin;

    for &passenger in path {
        let waypoint = Waypoint::Passenger(passenger);
        total += distances.distance(previous, waypoint);
        previous = waypoint;
    }

    total += distances.distance(previous, destination);

    1.0 - (-lambda * total).exp()
}

/// Mean pairwise incompatibility over a passenger group, in `[0, 1]`.
/// Vacuously 0 for fewer than two passengers.
pub fn score_incompatibility<C>(
    problem: &TripProblem,
    passengers: &[PassengerIdx],
    oracle: &C,
) -> Result<f64, OptimizerError>
where
    C: CompatibilityOracle,
{
    if passengers.len() < 2 {
        return Ok(0.0);
    }

    let mut total = 0.0;
    let mut pairs = 0usize;

    for (i, &a) in passengers.iter().enumerate() {
        for &b in passengers.iter().skip(i + 1) {
            let first = problem.passenger(a);
            let second = problem.passenger(b);
            let value = oracle.incompatibility(first, second)?;

            if !value.is_finite() {
                return Err(OptimizerError::NonFiniteIncompatibility {
                    a: first.external_id().to_owned(),
                    b: second.external_id().to_owned(),
                });
            }

            total += value;
            pairs += 1;
        }
    }

    Ok(total / pairs as f64)
}

/// Equal-weighted blend (by default) of routing efficiency and social
/// compatibility used to rank candidate subsets.
pub(crate) fn combine_scores(
    params: &SolverParams,
    distance_score: f64,
    incompatibility_score: f64,
) -> f64 {
    params.distance_weight * distance_score + params.incompatibility_weight * incompatibility_score
}
