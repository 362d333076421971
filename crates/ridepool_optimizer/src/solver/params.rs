#[derive(Clone, Debug)]
pub struct SolverParams {
    /// Seed for the batch's random generator. Identical inputs and seed
    /// reproduce the batch exactly.
    pub seed: u64,

    pub initial_temperature: f64,
    /// Applied after each accepted move, not after each evaluation.
    pub cooling_rate: f64,

    pub distance_weight: f64,
    pub incompatibility_weight: f64,

    /// Evaluation budget `ceil(scale * (1 - exp(-rate * size)))`.
    pub evaluation_scale: f64,
    pub evaluation_rate: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            seed: 2427121,
            initial_temperature: 10.0,
            cooling_rate: 0.9999,
            distance_weight: 0.5,
            incompatibility_weight: 0.5,
            evaluation_scale: 1000.0,
            evaluation_rate: 0.0725,
        }
    }
}
