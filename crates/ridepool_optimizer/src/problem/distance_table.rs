use fxhash::FxHashMap;

use crate::error::OptimizerError;

use super::{
    arrangement::ArrangementIdx, location::LocationId, oracle::DistanceOracle,
    passenger::PassengerIdx, trip_problem::TripProblem,
};

/// A stop the vehicle can be at while scoring a path: an arrangement's own
/// endpoints, or a passenger pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Waypoint {
    Origin(ArrangementIdx),
    Destination(ArrangementIdx),
    Passenger(PassengerIdx),
}

/// Pairwise distances over every waypoint relevant to one batch, resolved
/// through the oracle once per unordered pair and mirrored. Read-only after
/// `build`.
pub struct DistanceTable {
    distances: FxHashMap<(Waypoint, Waypoint), f64>,
}

impl DistanceTable {
    pub fn build<D>(
        problem: &TripProblem,
        pool: &[PassengerIdx],
        oracle: &D,
    ) -> Result<DistanceTable, OptimizerError>
    where
        D: DistanceOracle,
    {
        let mut table = DistanceTable {
            distances: FxHashMap::default(),
        };

        if problem.arrangements().is_empty() || pool.is_empty() {
            return Ok(table);
        }

        for (index, arrangement) in problem.arrangements().iter().enumerate() {
            let arrangement_idx = ArrangementIdx::new(index);
            let origin = Waypoint::Origin(arrangement_idx);
            let destination = Waypoint::Destination(arrangement_idx);

            let mut members: Vec<PassengerIdx> = arrangement.path().to_vec();
            members.extend_from_slice(pool);

            for (i, &a) in members.iter().enumerate() {
                for &b in members.iter().skip(i + 1) {
                    table.insert_pair(
                        oracle,
                        Waypoint::Passenger(a),
                        problem.passenger(a).location(),
                        Waypoint::Passenger(b),
                        problem.passenger(b).location(),
                    )?;
                }
            }

            for &passenger in members.iter() {
                let location = problem.passenger(passenger).location();
                table.insert_pair(
                    oracle,
                    origin,
                    arrangement.origin(),
                    Waypoint::Passenger(passenger),
                    location,
                )?;
                table.insert_pair(
                    oracle,
                    destination,
                    arrangement.destination(),
                    Waypoint::Passenger(passenger),
                    location,
                )?;
            }

            table.insert_pair(
                oracle,
                origin,
                arrangement.origin(),
                destination,
                arrangement.destination(),
            )?;
        }

        Ok(table)
    }

    /// Looks up a cached distance. Both directions of every built pair are
    /// present; asking for a pair outside the batch is a caller bug.
    pub fn distance(&self, from: Waypoint, to: Waypoint) -> f64 {
        if from == to {
            return 0.0;
        }

        match self.distances.get(&(from, to)) {
            Some(&distance) => distance,
            None => panic!("No cached distance between {from:?} and {to:?}"),
        }
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    fn insert_pair<D>(
        &mut self,
        oracle: &D,
        a: Waypoint,
        a_location: LocationId,
        b: Waypoint,
        b_location: LocationId,
    ) -> Result<(), OptimizerError>
    where
        D: DistanceOracle,
    {
        if self.distances.contains_key(&(a, b)) {
            return Ok(());
        }

        let distance = oracle.distance(a_location, b_location)?;

        if !distance.is_finite() {
            return Err(OptimizerError::NonFiniteDistance {
                from: a_location,
                to: b_location,
            });
        }

        if distance < 0.0 {
            return Err(OptimizerError::NegativeDistance {
                from: a_location,
                to: b_location,
            });
        }

        self.distances.insert((a, b), distance);
        self.distances.insert((b, a), distance);

        Ok(())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::test_utils::{
        CountingDistanceOracle, LineDistanceOracle, create_arrangement, create_passengers,
        create_problem,
    };

    #[test]
    fn test_empty_inputs_build_empty_table() {
        let problem = create_problem(
            create_passengers(0),
            vec![create_arrangement("a-0", 0, 1, 2, vec![])],
        );
        let oracle = LineDistanceOracle::new(vec![0.0, 10.0]);

        let table = DistanceTable::build(&problem, &[], &oracle).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_table_is_symmetric() {
        let problem = create_problem(
            create_passengers(2),
            vec![create_arrangement("a-0", 2, 3, 2, vec![])],
        );
        let oracle = LineDistanceOracle::new(vec![1.0, 4.0, 0.0, 10.0]);
        let pool = problem.unassigned_passengers();

        let table = DistanceTable::build(&problem, &pool, &oracle).unwrap();

        let a = Waypoint::Passenger(PassengerIdx::new(0));
        let b = Waypoint::Passenger(PassengerIdx::new(1));
        assert_eq!(table.distance(a, b), table.distance(b, a));
        assert_eq!(table.distance(a, b), 3.0);

        let origin = Waypoint::Origin(ArrangementIdx::new(0));
        let destination = Waypoint::Destination(ArrangementIdx::new(0));
        assert_eq!(table.distance(origin, destination), 10.0);
        assert_eq!(table.distance(destination, origin), 10.0);
    }

    #[test]
    fn test_each_pair_queried_once() {
        let problem = create_problem(
            create_passengers(3),
            vec![
                create_arrangement("a-0", 3, 4, 2, vec![]),
                create_arrangement("a-1", 5, 6, 2, vec![]),
            ],
        );
        let oracle = CountingDistanceOracle::new(vec![0.0, 1.0, 2.0, 5.0, 9.0, 14.0, 20.0]);
        let pool = problem.unassigned_passengers();

        DistanceTable::build(&problem, &pool, &oracle).unwrap();

        assert!(oracle.max_queries_per_pair() <= 1);
    }

    #[test]
    fn test_non_finite_distance_is_rejected() {
        let problem = create_problem(
            create_passengers(2),
            vec![create_arrangement("a-0", 2, 3, 2, vec![])],
        );
        let oracle = LineDistanceOracle::new(vec![0.0, f64::NAN, 1.0, 2.0]);
        let pool = problem.unassigned_passengers();

        let result = DistanceTable::build(&problem, &pool, &oracle);
        assert!(matches!(
            result,
            Err(OptimizerError::NonFiniteDistance { .. })
        ));
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let problem = create_problem(
            create_passengers(1),
            vec![create_arrangement("a-0", 1, 1, 2, vec![])],
        );
        let oracle = LineDistanceOracle::new(vec![5.0, 0.0]);
        let pool = problem.unassigned_passengers();

        let table = DistanceTable::build(&problem, &pool, &oracle).unwrap();
        let a = Waypoint::Passenger(PassengerIdx::new(0));
        assert_eq!(table.distance(a, a), 0.0);
    }
}
