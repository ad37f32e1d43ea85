use chrono::{Datelike, Days, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::PlanConfig;
use crate::models::{DRAWS_PER_WEEK, DrawDate, DrawDay, WEEKS_PER_PLAN, WeeklyWeights};

/// Point de départ du calendrier à partir de la date de base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Anchor {
    /// Lundi de la semaine de la date de base.
    #[default]
    WeekMonday,
    /// Lundi suivant (la date elle-même si c'est un lundi).
    NextMonday,
}

impl Anchor {
    pub fn start(&self, base: NaiveDate) -> NaiveDate {
        match self {
            Anchor::WeekMonday => monday_of_week(base),
            Anchor::NextMonday => next_monday(base),
        }
    }
}

pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as u64;
    date - Days::new(offset)
}

pub fn next_monday(date: NaiveDate) -> NaiveDate {
    let ahead = (7 - date.weekday().num_days_from_monday() as u64) % 7;
    date + Days::new(ahead)
}

/// Les 8 dates de tirage (lun, mar, jeu, ven × 2 semaines) depuis le lundi de `base`.
pub fn compute_draw_dates(base: NaiveDate) -> Vec<DrawDate> {
    draw_dates_from(monday_of_week(base))
}

/// Parcourt les jours à partir de `start` jusqu'à 8 dates de tirage.
pub fn draw_dates_from(start: NaiveDate) -> Vec<DrawDate> {
    let wanted = DRAWS_PER_WEEK * WEEKS_PER_PLAN;
    start
        .iter_days()
        .filter_map(DrawDate::new)
        .take(wanted)
        .collect()
}

/// Répartition des 6 paris d'une semaine, avec déplacement hors jours de paie.
///
/// `week` doit contenir exactement un lundi, un mardi, un jeudi et un vendredi.
/// Un jour manquant garde sa mise de base.
pub fn compute_weekly_weights(week: &[DrawDate], config: &PlanConfig) -> WeeklyWeights {
    let payroll = |day: DrawDay| {
        week.iter()
            .find(|d| d.day() == day)
            .is_some_and(|d| config.is_payroll_day(d.day_of_month()))
    };

    let mut weights = WeeklyWeights::base();
    let candidates = [DrawDay::Tuesday, DrawDay::Thursday];

    // Le lundi est traité avant le vendredi.
    for from in [DrawDay::Monday, DrawDay::Friday] {
        if !payroll(from) || weights.get(from) < 2 {
            continue;
        }
        if let Some(&to) = candidates.iter().find(|&&c| !payroll(c)) {
            *weights.get_mut(from) -= 1;
            *weights.get_mut(to) += 1;
            debug!("Día de nómina: 1 apuesta movida de {:?} a {:?}", from, to);
        }
    }

    if weights.total() != WeeklyWeights::WEEKLY_TOTAL {
        return WeeklyWeights::base();
    }
    weights
}
