use std::cell::RefCell;

use fxhash::FxHashMap;

use crate::problem::{
    arrangement::{Arrangement, ArrangementBuilder},
    location::LocationId,
    oracle::{CompatibilityOracle, DistanceOracle},
    passenger::{Passenger, PassengerBuilder, PassengerIdx},
    trip_problem::{TripProblem, TripProblemBuilder},
};

/// Distance oracle over points on a line; `LocationId` indexes `positions`.
pub struct LineDistanceOracle {
    positions: Vec<f64>,
}

impl LineDistanceOracle {
    pub fn new(positions: Vec<f64>) -> Self {
        LineDistanceOracle { positions }
    }
}

impl DistanceOracle for LineDistanceOracle {
    fn distance(&self, from: LocationId, to: LocationId) -> Result<f64, anyhow::Error> {
        Ok((self.positions[from.get()] - self.positions[to.get()]).abs())
    }
}

pub fn create_line_oracle(positions: Vec<f64>) -> LineDistanceOracle {
    LineDistanceOracle::new(positions)
}

/// Line oracle that records how often each unordered location pair is asked.
pub struct CountingDistanceOracle {
    inner: LineDistanceOracle,
    queries: RefCell<FxHashMap<(LocationId, LocationId), usize>>,
}

impl CountingDistanceOracle {
    pub fn new(positions: Vec<f64>) -> Self {
        CountingDistanceOracle {
            inner: LineDistanceOracle::new(positions),
            queries: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn max_queries_per_pair(&self) -> usize {
        self.queries.borrow().values().copied().max().unwrap_or(0)
    }
}

impl DistanceOracle for CountingDistanceOracle {
    fn distance(&self, from: LocationId, to: LocationId) -> Result<f64, anyhow::Error> {
        let key = if from <= to { (from, to) } else { (to, from) };
        *self.queries.borrow_mut().entry(key).or_insert(0) += 1;
        self.inner.distance(from, to)
    }
}

/// Oracle standing in for an unreachable geocoder.
pub struct FailingDistanceOracle;

impl DistanceOracle for FailingDistanceOracle {
    fn distance(&self, _from: LocationId, _to: LocationId) -> Result<f64, anyhow::Error> {
        Err(anyhow::anyhow!("geocoder unavailable"))
    }
}

/// Same incompatibility for every pair.
pub struct UniformCompatibilityOracle(pub f64);

impl CompatibilityOracle for UniformCompatibilityOracle {
    fn incompatibility(&self, _a: &Passenger, _b: &Passenger) -> Result<f64, anyhow::Error> {
        Ok(self.0)
    }
}

/// Pairwise incompatibilities keyed by external id; unlisted pairs score 0.
pub struct TableCompatibilityOracle {
    scores: FxHashMap<(String, String), f64>,
}

impl TableCompatibilityOracle {
    pub fn new(entries: Vec<(&str, &str, f64)>) -> Self {
        let mut scores = FxHashMap::default();
        for (a, b, value) in entries {
            scores.insert((a.to_owned(), b.to_owned()), value);
            scores.insert((b.to_owned(), a.to_owned()), value);
        }

        TableCompatibilityOracle { scores }
    }
}

impl CompatibilityOracle for TableCompatibilityOracle {
    fn incompatibility(&self, a: &Passenger, b: &Passenger) -> Result<f64, anyhow::Error> {
        let key = (a.external_id().to_owned(), b.external_id().to_owned());
        Ok(self.scores.get(&key).copied().unwrap_or(0.0))
    }
}

/// Passengers `p-0..p-count`, each located at the matching `LocationId`.
pub fn create_passengers(count: usize) -> Vec<Passenger> {
    (0..count)
        .map(|index| {
            let mut builder = PassengerBuilder::default();
            builder.set_external_id(format!("p-{index}"));
            builder.set_location(LocationId::new(index));
            builder.build()
        })
        .collect()
}

pub fn create_arrangement(
    external_id: &str,
    origin: usize,
    destination: usize,
    capacity: usize,
    path: Vec<PassengerIdx>,
) -> Arrangement {
    let mut builder = ArrangementBuilder::default();
    builder.set_external_id(external_id.to_owned());
    builder.set_origin(LocationId::new(origin));
    builder.set_destination(LocationId::new(destination));
    builder.set_capacity(capacity);
    builder.set_path(path);
    builder.build()
}

pub fn create_problem(passengers: Vec<Passenger>, arrangements: Vec<Arrangement>) -> TripProblem {
    let mut builder = TripProblemBuilder::default();
    builder.set_passengers(passengers);
    builder.set_arrangements(arrangements);
    builder.build()
}
