use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

pub const NUMBERS_PER_BET: usize = 5;
pub const DRAWS_PER_WEEK: usize = 4;
pub const WEEKS_PER_PLAN: usize = 2;

/// Grille de 5 numéros distincts, triés par ordre croissant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Combination([u8; NUMBERS_PER_BET]);

impl Combination {
    /// Trie les numéros ; `None` si deux numéros sont identiques.
    pub fn from_numbers(mut numbers: [u8; NUMBERS_PER_BET]) -> Option<Self> {
        numbers.sort_unstable();
        if numbers.windows(2).any(|w| w[0] == w[1]) {
            return None;
        }
        Some(Self(numbers))
    }

    pub fn numbers(&self) -> &[u8; NUMBERS_PER_BET] {
        &self.0
    }

    pub fn sum(&self) -> u32 {
        self.0.iter().map(|&n| n as u32).sum()
    }

    pub fn highest(&self) -> u8 {
        self.0[NUMBERS_PER_BET - 1]
    }

    pub fn even_count(&self) -> usize {
        self.0.iter().filter(|&&n| n % 2 == 0).count()
    }

    pub fn low_count(&self, low_max: u8) -> usize {
        self.0.iter().filter(|&&n| n <= low_max).count()
    }

    /// Longueur de la plus longue suite de numéros consécutifs.
    pub fn longest_run(&self) -> usize {
        let mut longest = 1;
        let mut run = 1;
        for w in self.0.windows(2) {
            if w[1] == w[0] + 1 {
                run += 1;
                longest = longest.max(run);
            } else {
                run = 1;
            }
        }
        longest
    }

    pub fn contains(&self, n: u8) -> bool {
        self.0.binary_search(&n).is_ok()
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|n| format!("{:2}", n)).collect();
        write!(f, "{}", parts.join(" - "))
    }
}

/// Jours de tirage MiLoto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DrawDay {
    Monday,
    Tuesday,
    Thursday,
    Friday,
}

impl DrawDay {
    pub const ALL: [DrawDay; DRAWS_PER_WEEK] = [
        DrawDay::Monday,
        DrawDay::Tuesday,
        DrawDay::Thursday,
        DrawDay::Friday,
    ];

    pub fn from_weekday(weekday: Weekday) -> Option<Self> {
        match weekday {
            Weekday::Mon => Some(DrawDay::Monday),
            Weekday::Tue => Some(DrawDay::Tuesday),
            Weekday::Thu => Some(DrawDay::Thursday),
            Weekday::Fri => Some(DrawDay::Friday),
            _ => None,
        }
    }

    pub fn weekday(&self) -> Weekday {
        match self {
            DrawDay::Monday => Weekday::Mon,
            DrawDay::Tuesday => Weekday::Tue,
            DrawDay::Thursday => Weekday::Thu,
            DrawDay::Friday => Weekday::Fri,
        }
    }

    /// Mise de base par semaine : doubles le lundi et le vendredi.
    pub fn base_weight(&self) -> usize {
        match self {
            DrawDay::Monday | DrawDay::Friday => 2,
            DrawDay::Tuesday | DrawDay::Thursday => 1,
        }
    }

    pub fn spanish_name(&self) -> &'static str {
        match self {
            DrawDay::Monday => "Lunes",
            DrawDay::Tuesday => "Martes",
            DrawDay::Thursday => "Jueves",
            DrawDay::Friday => "Viernes",
        }
    }
}

/// Date de tirage : ne peut tomber qu'un lundi, mardi, jeudi ou vendredi.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct DrawDate {
    date: NaiveDate,
}

impl DrawDate {
    pub fn new(date: NaiveDate) -> Option<Self> {
        DrawDay::from_weekday(date.weekday()).map(|_| Self { date })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn day(&self) -> DrawDay {
        // garanti par `new`
        DrawDay::from_weekday(self.date.weekday()).unwrap_or(DrawDay::Monday)
    }

    pub fn day_of_month(&self) -> u32 {
        self.date.day()
    }

    /// « Lunes 16 de febrero de 2026 »
    pub fn spanish_label(&self) -> String {
        const MONTHS: [&str; 12] = [
            "enero", "febrero", "marzo", "abril", "mayo", "junio", "julio", "agosto",
            "septiembre", "octubre", "noviembre", "diciembre",
        ];
        format!(
            "{} {} de {} de {}",
            self.day().spanish_name(),
            self.date.day(),
            MONTHS[self.date.month0() as usize],
            self.date.year()
        )
    }
}

impl fmt::Display for DrawDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}

/// Nombre de paris par jour de tirage sur une semaine (total = 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeeklyWeights {
    pub monday: usize,
    pub tuesday: usize,
    pub thursday: usize,
    pub friday: usize,
}

impl WeeklyWeights {
    pub const WEEKLY_TOTAL: usize = 6;

    pub fn base() -> Self {
        Self {
            monday: DrawDay::Monday.base_weight(),
            tuesday: DrawDay::Tuesday.base_weight(),
            thursday: DrawDay::Thursday.base_weight(),
            friday: DrawDay::Friday.base_weight(),
        }
    }

    pub fn get(&self, day: DrawDay) -> usize {
        match day {
            DrawDay::Monday => self.monday,
            DrawDay::Tuesday => self.tuesday,
            DrawDay::Thursday => self.thursday,
            DrawDay::Friday => self.friday,
        }
    }

    pub fn get_mut(&mut self, day: DrawDay) -> &mut usize {
        match day {
            DrawDay::Monday => &mut self.monday,
            DrawDay::Tuesday => &mut self.tuesday,
            DrawDay::Thursday => &mut self.thursday,
            DrawDay::Friday => &mut self.friday,
        }
    }

    pub fn total(&self) -> usize {
        self.monday + self.tuesday + self.thursday + self.friday
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPlan {
    pub date: DrawDate,
    pub weight: usize,
    /// Jour de paie : forte affluence probable.
    pub is_payroll: bool,
    pub combinations: Vec<Combination>,
}

/// Plan de deux semaines : 8 jours de tirage dans l'ordre chronologique.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calendar {
    pub days: Vec<DayPlan>,
}

impl Calendar {
    pub fn total_bets(&self) -> usize {
        self.days.iter().map(|d| d.weight).sum()
    }

    pub fn combinations(&self) -> impl Iterator<Item = &Combination> {
        self.days.iter().flat_map(|d| d.combinations.iter())
    }
}

/// Statistiques d'un numéro sur l'historique des tirages et des jeux.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberStat {
    pub number: u8,
    pub frequency: u32,
    pub played: u32,
    pub ratio: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryReport {
    pub suggested: Vec<u8>,
    /// Une entrée par numéro, dans l'ordre 1..=max.
    pub stats: Vec<NumberStat>,
    pub table: Vec<NumberStat>,
}

/// Une ligne d'historique : nom de colonne → valeur brute.
pub trait HistoryRow {
    fn field(&self, column: &str) -> Option<&str>;
}

impl HistoryRow for HashMap<String, String> {
    fn field(&self, column: &str) -> Option<&str> {
        self.get(column).map(String::as_str)
    }
}

impl HistoryRow for BTreeMap<String, String> {
    fn field(&self, column: &str) -> Option<&str> {
        self.get(column).map(String::as_str)
    }
}
