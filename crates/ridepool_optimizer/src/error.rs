use thiserror::Error;

use crate::problem::{arrangement::ArrangementIdx, location::LocationId};

#[derive(Error, Debug)]
pub enum OptimizerError {
    #[error("arrangement {arrangement} holds {len} passengers but only has capacity for {capacity}")]
    InvalidCapacity {
        arrangement: ArrangementIdx,
        len: usize,
        capacity: usize,
    },
    #[error("oracle lookup failed: {0}")]
    Oracle(anyhow::Error),
    #[error("distance oracle returned a non-finite value for ({from}, {to})")]
    NonFiniteDistance { from: LocationId, to: LocationId },
    #[error("distance oracle returned a negative value for ({from}, {to})")]
    NegativeDistance { from: LocationId, to: LocationId },
    #[error("incompatibility oracle returned a non-finite value for ({a}, {b})")]
    NonFiniteIncompatibility { a: String, b: String },
}

impl From<anyhow::Error> for OptimizerError {
    fn from(error: anyhow::Error) -> Self {
        OptimizerError::Oracle(error)
    }
}
