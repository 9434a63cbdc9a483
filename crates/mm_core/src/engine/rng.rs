//! Injectable seeded randomness.
//!
//! Every simulation owns exactly one `RandomSource`; there is no global
//! generator. Sharing one source across concurrently running sessions breaks
//! both determinism and thread-safety (the cursor mutates on every draw), so
//! callers must create one per session — see `engine::simulate_batch`.

use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: ChaCha8Rng,
}

impl RandomSource {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    /// Derive an independent child stream. Used to give rating finalization
    /// its own stream so mid-match draws do not shift it.
    pub fn fork(&mut self) -> Self {
        Self::from_seed(self.rng.gen())
    }

    /// Bernoulli roll. Out-of-range probabilities are clamped rather than
    /// panicking, matching the engine's degrade-don't-abort policy.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.rng.gen_bool(probability.clamp(0.0, 1.0))
    }

    /// Uniform draw in [0, 1).
    pub fn uniform(&mut self) -> f64 {
        self.rng.gen()
    }

    /// Uniform draw from an integer or float range.
    pub fn range<T, R>(&mut self, range: R) -> T
    where
        T: SampleUniform,
        R: SampleRange<T>,
    {
        self.rng.gen_range(range)
    }

    /// Uniform pick from a slice; `None` on an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            let idx = self.rng.gen_range(0..items.len());
            Some(&items[idx])
        }
    }

    /// Weighted categorical pick. Items with non-positive weight are never
    /// selected; if every weight is non-positive the pick falls back to
    /// uniform.
    pub fn pick_weighted<'a, T>(
        &mut self,
        items: &'a [T],
        weight: impl Fn(&T) -> f64,
    ) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let total: f64 = items.iter().map(|item| weight(item).max(0.0)).sum();
        if total <= 0.0 {
            return self.pick(items);
        }
        let mut roll = self.rng.gen_range(0.0..total);
        for item in items {
            let w = weight(item).max(0.0);
            if roll < w {
                return Some(item);
            }
            roll -= w;
        }
        // Floating-point edge: fall back to the last item.
        items.last()
    }

    /// Normal draw; returns the mean when the deviation is degenerate.
    pub fn normal(&mut self, mean: f64, std_dev: f64) -> f64 {
        match Normal::new(mean, std_dev.max(0.0)) {
            Ok(dist) => dist.sample(&mut self.rng),
            Err(_) => mean,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = RandomSource::from_seed(42);
        let mut b = RandomSource::from_seed(42);
        for _ in 0..100 {
            assert_eq!(a.uniform(), b.uniform());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = RandomSource::from_seed(1);
        let mut b = RandomSource::from_seed(2);
        let draws_a: Vec<f64> = (0..10).map(|_| a.uniform()).collect();
        let draws_b: Vec<f64> = (0..10).map(|_| b.uniform()).collect();
        assert_ne!(draws_a, draws_b);
    }

    #[test]
    fn test_chance_clamps_out_of_range() {
        let mut rng = RandomSource::from_seed(7);
        assert!(rng.chance(2.0));
        assert!(!rng.chance(-1.0));
    }

    #[test]
    fn test_pick_empty_slice() {
        let mut rng = RandomSource::from_seed(7);
        let empty: [u8; 0] = [];
        assert!(rng.pick(&empty).is_none());
        assert!(rng.pick_weighted(&empty, |_| 1.0).is_none());
    }

    #[test]
    fn test_pick_weighted_respects_zero_weight() {
        let mut rng = RandomSource::from_seed(11);
        let items = [("never", 0.0), ("always", 5.0)];
        for _ in 0..200 {
            let picked = rng.pick_weighted(&items, |(_, w)| *w).unwrap();
            assert_eq!(picked.0, "always");
        }
    }

    #[test]
    fn test_pick_weighted_all_zero_falls_back_to_uniform() {
        let mut rng = RandomSource::from_seed(13);
        let items = [1, 2, 3];
        assert!(rng.pick_weighted(&items, |_| 0.0).is_some());
    }

    #[test]
    fn test_normal_degenerate_std() {
        let mut rng = RandomSource::from_seed(3);
        assert_eq!(rng.normal(5.0, 0.0), 5.0);
        assert_eq!(rng.normal(5.0, -1.0), 5.0);
    }

    #[test]
    fn test_fork_is_deterministic() {
        let mut a = RandomSource::from_seed(99);
        let mut b = RandomSource::from_seed(99);
        let mut fa = a.fork();
        let mut fb = b.fork();
        assert_eq!(fa.uniform(), fb.uniform());
    }
}
