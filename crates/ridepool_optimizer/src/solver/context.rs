use rand::{SeedableRng, rngs::SmallRng};

use crate::problem::distance_table::DistanceTable;

use super::params::SolverParams;

/// Per-invocation search state: the batch's distance table, the
/// incompatibility collaborator, the tuning parameters, and the seeded
/// generator every stochastic draw flows through. Nothing in here outlives
/// one batch, so independent batches share no state.
pub struct BatchContext<'a, C> {
    pub(crate) distances: &'a DistanceTable,
    pub(crate) compatibility: &'a C,
    pub(crate) params: &'a SolverParams,
    pub(crate) rng: SmallRng,
}

impl<'a, C> BatchContext<'a, C> {
    pub fn new(
        distances: &'a DistanceTable,
        compatibility: &'a C,
        params: &'a SolverParams,
    ) -> Self {
        BatchContext {
            distances,
            compatibility,
            params,
            rng: SmallRng::seed_from_u64(params.seed),
        }
    }
}
