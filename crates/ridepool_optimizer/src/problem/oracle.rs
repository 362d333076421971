use super::{location::LocationId, passenger::Passenger};

/// Resolves two locations to a road (or straight-line) distance. Expected to
/// be symmetric and non-negative; the triangle inequality is not assumed.
pub trait DistanceOracle {
    fn distance(&self, from: LocationId, to: LocationId) -> Result<f64, anyhow::Error>;
}

/// Social mismatch between two passengers, in `[0, 1]`. `0.0` means the two
/// ride together without friction.
pub trait CompatibilityOracle {
    fn incompatibility(&self, a: &Passenger, b: &Passenger) -> Result<f64, anyhow::Error>;
}
