use tracing::{debug, trace};

use crate::{
    error::OptimizerError,
    problem::{
        arrangement::ArrangementIdx,
        distance_table::DistanceTable,
        oracle::{CompatibilityOracle, DistanceOracle},
        trip_problem::TripProblem,
    },
};

use super::{context::BatchContext, params::SolverParams, subset::optimize_arrangement};

/// Distributes the unassigned pool over the trip's arrangements, strictly in
/// the order the caller listed them: earlier arrangements get first pick of
/// passengers, and each one consumes from the pool the previous ones left
/// behind. A single forward pass; arrangements are never reordered and
/// assignments are never revisited.
///
/// Empty arrangements or an empty pool make this a no-op. The same seed over
/// identical inputs reproduces the same assignment.
pub fn assign_all<D, C>(
    problem: &mut TripProblem,
    distance_oracle: &D,
    compatibility_oracle: &C,
    params: &SolverParams,
) -> Result<(), OptimizerError>
where
    D: DistanceOracle,
    C: CompatibilityOracle,
{
    let mut pool = problem.unassigned_passengers();

    if problem.arrangements().is_empty() || pool.is_empty() {
        return Ok(());
    }

    for (index, arrangement) in problem.arrangements().iter().enumerate() {
        if arrangement.path().len() > arrangement.capacity() {
            return Err(OptimizerError::InvalidCapacity {
                arrangement: ArrangementIdx::new(index),
                len: arrangement.path().len(),
                capacity: arrangement.capacity(),
            });
        }
    }

    let distances = DistanceTable::build(problem, &pool, distance_oracle)?;

    debug!(
        arrangements = problem.arrangements().len(),
        passengers = pool.len(),
        distances = distances.len(),
        "assigning passengers"
    );

    let mut ctx = BatchContext::new(&distances, compatibility_oracle, params);

    for index in 0..problem.arrangements().len() {
        let arrangement_idx = ArrangementIdx::new(index);
        optimize_arrangement(problem, arrangement_idx, &mut pool, &mut ctx)?;

        trace!(
            arrangement = %problem.arrangement(arrangement_idx).external_id(),
            riders = problem.arrangement(arrangement_idx).path().len(),
            remaining = pool.len(),
            "arrangement filled"
        );
    }

    debug!(unassigned = pool.len(), "assignment complete");

    Ok(())
}

#[cfg(test)]
mod tests {

    use fxhash::FxHashSet;

    use super::*;
    use crate::problem::passenger::PassengerIdx;
    use crate::test_utils::{
        FailingDistanceOracle, UniformCompatibilityOracle, create_arrangement,
        create_line_oracle, create_passengers, create_problem,
    };

    fn assigned_paths(problem: &TripProblem) -> Vec<Vec<PassengerIdx>> {
        problem
            .arrangements()
            .iter()
            .map(|arrangement| arrangement.path().to_vec())
            .collect()
    }

    #[test]
    fn test_empty_inputs_are_a_no_op() {
        let mut no_passengers = create_problem(
            create_passengers(0),
            vec![create_arrangement("a-0", 0, 1, 2, vec![])],
        );
        let oracle = create_line_oracle(vec![0.0, 10.0]);
        let compatibility = UniformCompatibilityOracle(0.0);
        let params = SolverParams::default();

        assign_all(&mut no_passengers, &oracle, &compatibility, &params).unwrap();
        assert!(no_passengers.arrangement(ArrangementIdx::new(0)).path().is_empty());

        let mut no_arrangements = create_problem(create_passengers(2), vec![]);
        let oracle = create_line_oracle(vec![1.0, 2.0]);
        assign_all(&mut no_arrangements, &oracle, &compatibility, &params).unwrap();
        assert_eq!(no_arrangements.unassigned_passengers().len(), 2);
    }

    #[test]
    fn test_capacity_is_never_exceeded() {
        let mut problem = create_problem(
            create_passengers(6),
            vec![
                create_arrangement("a-0", 6, 7, 2, vec![]),
                create_arrangement("a-1", 6, 7, 3, vec![]),
            ],
        );
        let oracle =
            create_line_oracle(vec![1.0, 2.0, 3.0, 5.0, 7.0, 9.0, 0.0, 10.0]);
        let compatibility = UniformCompatibilityOracle(0.2);
        let params = SolverParams::default();

        assign_all(&mut problem, &oracle, &compatibility, &params).unwrap();

        for arrangement in problem.arrangements() {
            assert!(arrangement.path().len() <= arrangement.capacity());
        }
    }

    #[test]
    fn test_no_passenger_rides_twice() {
        let mut problem = create_problem(
            create_passengers(6),
            vec![
                create_arrangement("a-0", 6, 7, 3, vec![]),
                create_arrangement("a-1", 6, 7, 3, vec![]),
            ],
        );
        let oracle =
            create_line_oracle(vec![1.0, 2.0, 3.0, 5.0, 7.0, 9.0, 0.0, 10.0]);
        let compatibility = UniformCompatibilityOracle(0.2);
        let params = SolverParams::default();

        assign_all(&mut problem, &oracle, &compatibility, &params).unwrap();

        let mut seen: FxHashSet<PassengerIdx> = FxHashSet::default();
        for arrangement in problem.arrangements() {
            for &passenger in arrangement.path() {
                assert!(seen.insert(passenger), "{passenger} rides twice");
            }
        }
        // Six passengers, six seats: everyone rides exactly once.
        assert_eq!(seen.len(), 6);
        assert!(problem.unassigned_passengers().is_empty());
    }

    #[test]
    fn test_earlier_arrangements_pick_first() {
        // One passenger, two arrangements that could both take them; the
        // caller's first arrangement wins.
        let mut problem = create_problem(
            create_passengers(1),
            vec![
                create_arrangement("a-0", 1, 2, 1, vec![]),
                create_arrangement("a-1", 1, 2, 1, vec![]),
            ],
        );
        let oracle = create_line_oracle(vec![5.0, 0.0, 10.0]);
        let compatibility = UniformCompatibilityOracle(0.0);
        let params = SolverParams::default();

        assign_all(&mut problem, &oracle, &compatibility, &params).unwrap();

        assert_eq!(
            problem.arrangement(ArrangementIdx::new(0)).path(),
            &[PassengerIdx::new(0)]
        );
        assert!(problem.arrangement(ArrangementIdx::new(1)).path().is_empty());
    }

    #[test]
    fn test_fixed_seed_reproduces_the_batch() {
        let build = || {
            create_problem(
                create_passengers(7),
                vec![
                    create_arrangement("a-0", 7, 8, 2, vec![]),
                    create_arrangement("a-1", 7, 8, 3, vec![]),
                ],
            )
        };
        let oracle =
            create_line_oracle(vec![1.0, 2.0, 3.0, 4.0, 6.0, 8.0, 9.0, 0.0, 10.0]);
        let compatibility = UniformCompatibilityOracle(0.3);
        let params = SolverParams::default();

        let mut first = build();
        assign_all(&mut first, &oracle, &compatibility, &params).unwrap();

        let mut second = build();
        assign_all(&mut second, &oracle, &compatibility, &params).unwrap();

        assert_eq!(assigned_paths(&first), assigned_paths(&second));
    }

    #[test]
    fn test_two_seats_two_passengers_scenario() {
        // Direct distance 10 calibrates lambda; both passengers fit, so the
        // fast path orders them along the line for the minimal score.
        let mut problem = create_problem(
            create_passengers(2),
            vec![create_arrangement("a-0", 2, 3, 2, vec![])],
        );
        let oracle = create_line_oracle(vec![7.0, 3.0, 0.0, 10.0]);
        let compatibility = UniformCompatibilityOracle(0.0);
        let params = SolverParams::default();

        assign_all(&mut problem, &oracle, &compatibility, &params).unwrap();

        assert_eq!(
            problem.arrangement(ArrangementIdx::new(0)).path(),
            &[PassengerIdx::new(1), PassengerIdx::new(0)]
        );
    }

    #[test]
    fn test_oracle_failure_is_propagated() {
        let mut problem = create_problem(
            create_passengers(2),
            vec![create_arrangement("a-0", 2, 3, 2, vec![])],
        );
        let compatibility = UniformCompatibilityOracle(0.0);
        let params = SolverParams::default();

        let result = assign_all(
            &mut problem,
            &FailingDistanceOracle,
            &compatibility,
            &params,
        );
        assert!(matches!(result, Err(OptimizerError::Oracle(_))));
    }

    #[test]
    fn test_preassigned_overflow_fails_fast() {
        let mut problem = create_problem(
            create_passengers(3),
            vec![create_arrangement(
                "a-0",
                3,
                4,
                1,
                vec![PassengerIdx::new(0), PassengerIdx::new(1)],
            )],
        );
        let oracle = create_line_oracle(vec![1.0, 2.0, 3.0, 0.0, 10.0]);
        let compatibility = UniformCompatibilityOracle(0.0);
        let params = SolverParams::default();

        let result = assign_all(&mut problem, &oracle, &compatibility, &params);
        assert!(matches!(
            result,
            Err(OptimizerError::InvalidCapacity { .. })
        ));
    }
}
