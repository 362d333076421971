use serde::Serialize;

/// Opaque handle for a geocodable place. The optimizer never interprets it;
/// only the [`DistanceOracle`](super::oracle::DistanceOracle) can resolve a
/// pair of these to a distance.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LocationId(usize);

impl LocationId {
    pub const fn new(id: usize) -> Self {
        Self(id)
    }

    pub const fn get(&self) -> usize {
        self.0
    }
}

impl From<usize> for LocationId {
    fn from(id: usize) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
