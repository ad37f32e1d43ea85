use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source d'aléa du générateur : tirage de `k` valeurs distinctes dans `pool`.
pub trait DistinctSampler {
    /// Retourne `min(k, pool.len())` éléments distincts de `pool`, sans remise.
    fn sample_distinct(&mut self, pool: &[u8], k: usize) -> Vec<u8>;
}

/// Adaptateur autour d'un générateur `rand`.
pub struct RngSampler<R: Rng> {
    rng: R,
}

impl<R: Rng> RngSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSampler<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_rng(&mut rand::rng()))
    }

    /// Seed explicite si fournie, sinon entropie système.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => Self::from_entropy(),
        }
    }
}

impl<R: Rng> DistinctSampler for RngSampler<R> {
    fn sample_distinct(&mut self, pool: &[u8], k: usize) -> Vec<u8> {
        let amount = k.min(pool.len());
        rand::seq::index::sample(&mut self.rng, pool.len(), amount)
            .into_iter()
            .map(|i| pool[i])
            .collect()
    }
}
