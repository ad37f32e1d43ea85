use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate, Weekday};

use miloto_core::config::{HistoryConfig, PlanConfig};
use miloto_core::generator::check_filters;
use miloto_core::history::score_history;
use miloto_core::models::Combination;
use miloto_core::parse::parse_hot_numbers;
use miloto_core::planner::build_plan;
use miloto_core::sampler::RngSampler;
use miloto_core::schedule::compute_draw_dates;

#[test]
fn plan_from_wednesday_end_to_end() {
    let config = PlanConfig::default();
    let hot = parse_hot_numbers("3, 4, 19; 32, 33, 35", config.max_number).unwrap();
    let wednesday = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();

    let dates = compute_draw_dates(wednesday);
    assert_eq!(dates[0].date(), NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
    let weekdays: Vec<Weekday> = dates.iter().map(|d| d.date().weekday()).collect();
    use Weekday::*;
    assert_eq!(weekdays, vec![Mon, Tue, Thu, Fri, Mon, Tue, Thu, Fri]);

    let mut sampler = RngSampler::seeded(20260304);
    let calendar = build_plan(wednesday, &hot, 2, &config, &mut sampler).unwrap();

    assert_eq!(calendar.total_bets(), 12);
    let combos: Vec<&Combination> = calendar.combinations().collect();
    assert_eq!(combos.len(), 12);
    let unique: HashSet<&Combination> = combos.iter().copied().collect();
    assert_eq!(unique.len(), 12, "combinaisons en double");

    for combo in combos {
        assert!(check_filters(combo, &config).is_none(), "{combo} ne passe pas les filtres");
        let hits = hot.iter().filter(|&&h| combo.contains(h)).count();
        assert_eq!(hits, 2, "{combo}");
    }
}

#[test]
fn history_suggestion_feeds_plan() {
    let mut draws = Vec::new();
    for numbers in [[5, 12, 21, 33, 38], [5, 14, 21, 30, 36], [5, 7, 21, 34, 39]] {
        let mut row = HashMap::new();
        for (i, n) in numbers.iter().enumerate() {
            row.insert(format!("winning_{}", i + 1), n.to_string());
        }
        draws.push(row);
    }
    let plays: Vec<HashMap<String, String>> = Vec::new();

    let history = HistoryConfig { top_n: 3, ..HistoryConfig::default() };
    let report = score_history(&draws, &plays, &history, 39);
    assert_eq!(report.suggested, vec![5, 21, 7]);

    let config = PlanConfig::default();
    let base = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
    let calendar = build_plan(base, &report.suggested, 3, &config, &mut RngSampler::seeded(1)).unwrap();
    for combo in calendar.combinations() {
        assert!(combo.contains(5) && combo.contains(21) && combo.contains(7), "{combo}");
    }
}
