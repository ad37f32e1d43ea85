use std::collections::HashSet;

use chrono::NaiveDate;
use log::{debug, info};

use crate::config::PlanConfig;
use crate::error::{MilotoError, Result};
use crate::generator::ComboGenerator;
use crate::models::{Calendar, Combination, DRAWS_PER_WEEK, DayPlan, DrawDate};
use crate::sampler::DistinctSampler;
use crate::schedule::{Anchor, compute_weekly_weights, draw_dates_from};

/// Entrées d'un plan quinzaine.
#[derive(Debug, Clone)]
pub struct PlanRequest<'a> {
    pub base_date: NaiveDate,
    pub anchor: Anchor,
    pub hot_pool: &'a [u8],
    pub hot_count: i64,
}

/// Calendrier de 8 tirages depuis le lundi de la semaine de `base_date`.
pub fn build_plan(
    base_date: NaiveDate,
    hot_pool: &[u8],
    hot_count: i64,
    config: &PlanConfig,
    sampler: &mut impl DistinctSampler,
) -> Result<Calendar> {
    let request = PlanRequest {
        base_date,
        anchor: Anchor::WeekMonday,
        hot_pool,
        hot_count,
    };
    build_plan_with(&request, config, sampler)
}

pub fn build_plan_with(
    request: &PlanRequest<'_>,
    config: &PlanConfig,
    sampler: &mut impl DistinctSampler,
) -> Result<Calendar> {
    let dates = draw_dates_from(request.anchor.start(request.base_date));

    let mut day_weights: Vec<(DrawDate, usize)> = Vec::with_capacity(dates.len());
    for week in dates.chunks(DRAWS_PER_WEEK) {
        let weights = compute_weekly_weights(week, config);
        day_weights.extend(week.iter().map(|d| (*d, weights.get(d.day()))));
    }

    let total_bets: usize = day_weights.iter().map(|(_, w)| w).sum();
    let generator = ComboGenerator::new(config, request.hot_pool, request.hot_count);
    info!(
        "Plan desde {}: {} apuestas, {} caliente(s) por jugada",
        dates.first().map(|d| d.to_string()).unwrap_or_default(),
        total_bets,
        generator.hot_count()
    );

    let combos = unique_combinations(&generator, total_bets, config, sampler)?;

    let mut remaining = combos.into_iter();
    let days = day_weights
        .into_iter()
        .map(|(date, weight)| DayPlan {
            date,
            weight,
            is_payroll: config.is_payroll_day(date.day_of_month()),
            combinations: remaining.by_ref().take(weight).collect(),
        })
        .collect();

    Ok(Calendar { days })
}

/// `count` grilles deux à deux distinctes, dans l'ordre de génération.
pub fn unique_combinations(
    generator: &ComboGenerator<'_>,
    count: usize,
    config: &PlanConfig,
    sampler: &mut impl DistinctSampler,
) -> Result<Vec<Combination>> {
    let mut seen: HashSet<Combination> = HashSet::with_capacity(count);
    let mut combos = Vec::with_capacity(count);
    let mut duplicates = 0usize;

    while combos.len() < count {
        let combo = generator.generate(sampler)?;
        if seen.insert(combo) {
            combos.push(combo);
        } else {
            duplicates += 1;
            // Un pool chaud minuscule peut rendre le plan impossible.
            if duplicates >= config.max_attempts {
                return Err(MilotoError::AttemptsExhausted(config.max_attempts));
            }
        }
    }

    if duplicates > 0 {
        debug!("{} combinación(es) duplicada(s) descartada(s)", duplicates);
    }
    Ok(combos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DrawDay;
    use crate::sampler::RngSampler;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_plan_from_wednesday() {
        let config = PlanConfig::default();
        let mut sampler = RngSampler::seeded(42);
        let calendar = build_plan(date(2026, 2, 18), &config.default_hot, 2, &config, &mut sampler).unwrap();

        assert_eq!(calendar.days.len(), 8);
        assert_eq!(calendar.days[0].date.date(), date(2026, 2, 16));
        assert_eq!(calendar.days[7].date.date(), date(2026, 2, 27));
        assert_eq!(calendar.total_bets(), 12);
        assert_eq!(calendar.combinations().count(), 12);

        let weights: Vec<usize> = calendar.days.iter().map(|d| d.weight).collect();
        assert_eq!(weights, vec![2, 1, 1, 2, 2, 1, 1, 2]);
    }

    #[test]
    fn test_day_plan_lengths_match_weights() {
        let config = PlanConfig::default();
        let mut sampler = RngSampler::seeded(3);
        // 2026-06-29 : lundi et mardi de paie la première semaine
        let calendar = build_plan(date(2026, 7, 1), &config.default_hot, 1, &config, &mut sampler).unwrap();
        for day in &calendar.days {
            assert_eq!(day.combinations.len(), day.weight, "{}", day.date);
        }
        assert_eq!(calendar.days[0].weight, 1);
        assert!(calendar.days[0].is_payroll);
        assert!(calendar.days[1].is_payroll);
        assert_eq!(calendar.days[2].weight, 2);
    }

    #[test]
    fn test_plan_combinations_distinct() {
        let config = PlanConfig::default();
        for seed in 0..20 {
            let mut sampler = RngSampler::seeded(seed);
            let calendar = build_plan(date(2026, 3, 4), &[3, 4], 2, &config, &mut sampler).unwrap();
            let all: Vec<&Combination> = calendar.combinations().collect();
            let unique: HashSet<&Combination> = all.iter().copied().collect();
            assert_eq!(all.len(), unique.len(), "doublon avec seed {seed}");
        }
    }

    #[test]
    fn test_next_monday_anchor() {
        let config = PlanConfig::default();
        let mut sampler = RngSampler::seeded(5);
        let request = PlanRequest {
            base_date: date(2026, 2, 18),
            anchor: Anchor::NextMonday,
            hot_pool: &config.default_hot,
            hot_count: 2,
        };
        let calendar = build_plan_with(&request, &config, &mut sampler).unwrap();
        assert_eq!(calendar.days[0].date.date(), date(2026, 2, 23));
        assert_eq!(calendar.days[0].date.day(), DrawDay::Monday);
    }

    #[test]
    fn test_plan_deterministic_with_seed() {
        let config = PlanConfig::default();
        let a = build_plan(date(2026, 2, 18), &config.default_hot, 2, &config, &mut RngSampler::seeded(11)).unwrap();
        let b = build_plan(date(2026, 2, 18), &config.default_hot, 2, &config, &mut RngSampler::seeded(11)).unwrap();
        assert_eq!(a, b);
    }

    /// Renvoie toujours la même grille.
    struct StuckSampler;

    impl DistinctSampler for StuckSampler {
        fn sample_distinct(&mut self, _pool: &[u8], k: usize) -> Vec<u8> {
            [3, 4, 19, 32, 35].into_iter().take(k).collect()
        }
    }

    #[test]
    fn test_duplicate_loop_fails_loudly() {
        let config = PlanConfig {
            max_attempts: 50,
            ..PlanConfig::default()
        };
        let generator = ComboGenerator::new(&config, &[], 0);
        let result = unique_combinations(&generator, 2, &config, &mut StuckSampler);
        assert!(matches!(result, Err(MilotoError::AttemptsExhausted(50))));
    }
}
