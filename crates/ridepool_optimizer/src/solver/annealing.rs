use super::params::SolverParams;

/// Evaluation budget for a candidate space spanned by `size` elements.
/// Saturates towards `evaluation_scale` for large sizes and stays sharply
/// smaller for small ones, bounding worst-case search time per arrangement.
pub(crate) fn max_evaluations(params: &SolverParams, size: usize) -> usize {
    let saturation = 1.0 - (-params.evaluation_rate * size as f64).exp();
    (params.evaluation_scale * saturation).ceil() as usize
}

/// Chance of adopting `candidate` over `current`: 1 for a strict
/// improvement, otherwise decaying with the temperature.
pub(crate) fn acceptance_probability(current: f64, candidate: f64, temperature: f64) -> f64 {
    if candidate < current {
        1.0
    } else {
        (-(current - candidate).abs() / temperature).exp()
    }
}

/// Cooling schedule that advances only on accepted moves, so temperature is
/// a function of the accepted-move count rather than the evaluation count.
pub(crate) struct AnnealingSchedule {
    temperature: f64,
    cooling_rate: f64,
}

impl AnnealingSchedule {
    pub(crate) fn new(params: &SolverParams) -> Self {
        AnnealingSchedule {
            temperature: params.initial_temperature,
            cooling_rate: params.cooling_rate,
        }
    }

    pub(crate) fn temperature(&self) -> f64 {
        self.temperature
    }

    pub(crate) fn cool(&mut self) {
        self.temperature *= self.cooling_rate;
    }
}
