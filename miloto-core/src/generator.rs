use log::{debug, warn};

use crate::config::PlanConfig;
use crate::error::{MilotoError, Result};
use crate::models::{Combination, NUMBERS_PER_BET};
use crate::sampler::DistinctSampler;

/// Motif de rejet d'une grille candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Moins de 5 numéros distincts après fusion.
    Collision,
    /// Tous pairs ou tous impairs.
    EvenBalance,
    /// Tous dans la moitié basse ou tous dans la moitié haute.
    LowHighBalance,
    ConsecutiveRun,
    /// Aucun numéro au-dessus du seuil haut.
    NoTopNumber,
    SumOutOfRange,
}

/// Filtres statistiques appliqués à une grille triée.
pub fn check_filters(combo: &Combination, config: &PlanConfig) -> Option<Rejection> {
    let evens = combo.even_count();
    if evens == 0 || evens == NUMBERS_PER_BET {
        return Some(Rejection::EvenBalance);
    }

    let lows = combo.low_count(config.low_max);
    if lows == 0 || lows == NUMBERS_PER_BET {
        return Some(Rejection::LowHighBalance);
    }

    if combo.longest_run() > config.max_run {
        return Some(Rejection::ConsecutiveRun);
    }

    if combo.highest() <= config.top_threshold {
        return Some(Rejection::NoTopNumber);
    }

    let sum = combo.sum();
    if sum < config.sum_min || sum > config.sum_max {
        return Some(Rejection::SumOutOfRange);
    }

    None
}

/// Générateur de grilles par échantillonnage avec rejet.
///
/// Chaque grille contient exactement `hot_count` numéros du pool chaud ; le reste
/// est tiré hors du pool chaud (ou dans 1..=max si le complément est trop petit).
#[derive(Debug, Clone)]
pub struct ComboGenerator<'a> {
    config: &'a PlanConfig,
    hot: Vec<u8>,
    cold: Vec<u8>,
    full: Vec<u8>,
    hot_count: usize,
}

impl<'a> ComboGenerator<'a> {
    pub fn new(config: &'a PlanConfig, hot_pool: &[u8], hot_count: i64) -> Self {
        let mut hot: Vec<u8> = Vec::with_capacity(hot_pool.len());
        for &n in hot_pool {
            if n >= 1 && n <= config.max_number && !hot.contains(&n) {
                hot.push(n);
            }
        }

        let full: Vec<u8> = (1..=config.max_number).collect();
        let cold: Vec<u8> = full.iter().copied().filter(|n| !hot.contains(n)).collect();

        let max_hot = config.max_hot_count.min(NUMBERS_PER_BET) as i64;
        let hot_count = (hot_count.clamp(0, max_hot) as usize).min(hot.len());

        Self {
            config,
            hot,
            cold,
            full,
            hot_count,
        }
    }

    /// Nombre de numéros chauds réellement imposés par grille.
    pub fn hot_count(&self) -> usize {
        self.hot_count
    }

    pub fn hot_pool(&self) -> &[u8] {
        &self.hot
    }

    /// Un seul tirage candidat, filtré.
    pub fn try_once(&self, sampler: &mut impl DistinctSampler) -> std::result::Result<Combination, Rejection> {
        let mut picked = sampler.sample_distinct(&self.hot, self.hot_count);

        let needed = NUMBERS_PER_BET - picked.len();
        let pool = if self.cold.len() >= needed { &self.cold } else { &self.full };
        picked.extend(sampler.sample_distinct(pool, needed));

        let numbers: [u8; NUMBERS_PER_BET] = picked.try_into().map_err(|_| Rejection::Collision)?;
        let combo = Combination::from_numbers(numbers).ok_or(Rejection::Collision)?;

        match check_filters(&combo, self.config) {
            Some(reason) => Err(reason),
            None => Ok(combo),
        }
    }

    /// Tire jusqu'à obtenir une grille valide, dans la limite de `max_attempts`.
    pub fn generate(&self, sampler: &mut impl DistinctSampler) -> Result<Combination> {
        let mut rejected = [0usize; 6];
        for attempt in 1..=self.config.max_attempts {
            match self.try_once(sampler) {
                Ok(combo) => {
                    debug!("Combinación {} tras {} intentos (rechazos {:?})", combo, attempt, rejected);
                    return Ok(combo);
                }
                Err(reason) => rejected[reason as usize] += 1,
            }
        }
        warn!(
            "Sin combinación válida tras {} intentos (rechazos {:?})",
            self.config.max_attempts, rejected
        );
        Err(MilotoError::AttemptsExhausted(self.config.max_attempts))
    }
}
