use fxhash::FxHashSet;
use rand::{Rng, seq::SliceRandom};

use crate::problem::passenger::PassengerIdx;

pub(crate) type Candidate = Vec<PassengerIdx>;

/// `n!`, or `None` once it no longer fits in a `u64` (the space is then
/// treated as inexhaustible, which the evaluation budget bounds anyway).
fn factorial(n: usize) -> Option<u64> {
    (2..=n as u64).try_fold(1u64, |product, k| product.checked_mul(k))
}

/// `C(n, k)` with the same overflow convention as [`factorial`].
fn binomial(n: usize, k: usize) -> Option<u64> {
    if k > n {
        return Some(0);
    }

    let k = k.min(n - k);
    let mut result: u64 = 1;
    for i in 0..k {
        result = result.checked_mul((n - i) as u64)?;
        result /= (i + 1) as u64;
    }

    Some(result)
}

/// All orderings of a fixed passenger set, drawn lazily and without
/// duplicates rather than materialized up front.
pub(crate) struct PermutationCandidates {
    items: Vec<PassengerIdx>,
    space: Option<u64>,
}

impl PermutationCandidates {
    pub(crate) fn new(items: Vec<PassengerIdx>) -> Self {
        let space = factorial(items.len());
        PermutationCandidates { items, space }
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    /// The deterministic starting candidate: the set in its given order.
    pub(crate) fn first(&self) -> Candidate {
        self.items.clone()
    }

    /// Draws a random ordering not yet in `tried`, recording it there, or
    /// `None` once every distinct ordering has been tried. `tried` is the
    /// per-temperature-step memory; seeding it with the current solution
    /// excludes that solution from the draw.
    pub(crate) fn draw<R>(&self, rng: &mut R, tried: &mut FxHashSet<Candidate>) -> Option<Candidate>
    where
        R: Rng,
    {
        loop {
            if let Some(space) = self.space
                && tried.len() as u64 >= space
            {
                return None;
            }

            let mut candidate = self.items.clone();
            candidate.shuffle(rng);

            if tried.insert(candidate.clone()) {
                return Some(candidate);
            }
        }
    }
}

/// All size-`size` subsets of a passenger pool, drawn lazily and without
/// duplicates. Subsets are canonicalized to pool order so that two draws of
/// the same members compare equal.
pub(crate) struct SubsetCandidates {
    items: Vec<PassengerIdx>,
    size: usize,
    space: Option<u64>,
}

impl SubsetCandidates {
    pub(crate) fn new(items: Vec<PassengerIdx>, size: usize) -> Self {
        let space = binomial(items.len(), size);
        SubsetCandidates { items, size, space }
    }

    /// The deterministic starting candidate: the first `size` passengers in
    /// pool order.
    pub(crate) fn first(&self) -> Candidate {
        self.items[..self.size].to_vec()
    }

    pub(crate) fn draw<R>(&self, rng: &mut R, tried: &mut FxHashSet<Candidate>) -> Option<Candidate>
    where
        R: Rng,
    {
        loop {
            if let Some(space) = self.space
                && tried.len() as u64 >= space
            {
                return None;
            }

            let mut indices =
                rand::seq::index::sample(rng, self.items.len(), self.size).into_vec();
            indices.sort_unstable();
            let candidate: Candidate = indices.iter().map(|&index| self.items[index]).collect();

            if tried.insert(candidate.clone()) {
                return Some(candidate);
            }
        }
    }
}
