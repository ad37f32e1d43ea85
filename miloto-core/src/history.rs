use std::cmp::Ordering;
use std::collections::HashMap;

use log::{debug, info};

use crate::config::HistoryConfig;
use crate::error::Result;
use crate::models::{HistoryReport, HistoryRow, NumberStat};

/// Fournisseur de lignes tabulaires (CSV local, feuille distante, ...).
pub trait TabularSource {
    fn name(&self) -> &str;
    fn fetch_rows(&self) -> Result<Vec<HashMap<String, String>>>;
}

/// Charge les deux sources puis calcule le classement.
///
/// Les deux sources doivent être disponibles : en cas d'échec de l'une, rien
/// n'est calculé et l'erreur est renvoyée telle quelle.
pub fn score_sources(
    draws: &dyn TabularSource,
    plays: &dyn TabularSource,
    config: &HistoryConfig,
    max_number: u8,
) -> Result<HistoryReport> {
    let draw_rows = draws.fetch_rows()?;
    let play_rows = plays.fetch_rows()?;
    info!(
        "Historial cargado: {} sorteos ({}), {} jugadas ({})",
        draw_rows.len(),
        draws.name(),
        play_rows.len(),
        plays.name()
    );
    Ok(score_history(&draw_rows, &play_rows, config, max_number))
}

/// Numéro lu dans une cellule ; vide, non numérique ou hors limites → `None`.
fn parse_cell(raw: &str, max_number: u8) -> Option<u8> {
    let value: i64 = raw.trim().parse().ok()?;
    if (1..=max_number as i64).contains(&value) {
        Some(value as u8)
    } else {
        None
    }
}

fn count_numbers<R: HistoryRow>(rows: &[R], columns: &[String], max_number: u8) -> Vec<u32> {
    let mut counts = vec![0u32; max_number as usize];
    let mut skipped = 0usize;
    for row in rows {
        for column in columns.iter().take(5) {
            match row.field(column).and_then(|raw| parse_cell(raw, max_number)) {
                Some(n) => counts[(n - 1) as usize] += 1,
                None => skipped += 1,
            }
        }
    }
    if skipped > 0 {
        debug!("{} celda(s) vacía(s) o inválida(s) ignorada(s)", skipped);
    }
    counts
}

/// Score lissé de Laplace : (fréquence + 1) / (joués + 2).
pub fn smoothed_score(frequency: u32, played: u32) -> f64 {
    (frequency as f64 + 1.0) / (played as f64 + 2.0)
}

fn by_score_desc(a: &NumberStat, b: &NumberStat) -> Ordering {
    b.score
        .partial_cmp(&a.score)
        .unwrap_or(Ordering::Equal)
        .then(b.frequency.cmp(&a.frequency))
}

/// Classement des numéros chauds à partir des tirages et des grilles jouées.
pub fn score_history<D: HistoryRow, P: HistoryRow>(
    draw_rows: &[D],
    play_rows: &[P],
    config: &HistoryConfig,
    max_number: u8,
) -> HistoryReport {
    let frequency = count_numbers(draw_rows, &config.draw_columns, max_number);
    let played = count_numbers(play_rows, &config.play_columns, max_number);

    let stats: Vec<NumberStat> = (1..=max_number)
        .map(|n| {
            let f = frequency[(n - 1) as usize];
            let p = played[(n - 1) as usize];
            NumberStat {
                number: n,
                frequency: f,
                played: p,
                ratio: if p > 0 { f as f64 / p as f64 } else { 0.0 },
                score: smoothed_score(f, p),
            }
        })
        .collect();

    let (mut eligible, mut excluded): (Vec<NumberStat>, Vec<NumberStat>) = stats
        .iter()
        .cloned()
        .partition(|s| config.min_played == 0 || s.played >= config.min_played);

    eligible.sort_by(by_score_desc);
    excluded.sort_by(|a, b| b.frequency.cmp(&a.frequency));

    if eligible.len() < config.top_n {
        debug!(
            "Solo {} número(s) con al menos {} jugada(s); se completa por frecuencia",
            eligible.len(),
            config.min_played
        );
    }

    // Les exclus complètent le classement, par fréquence brute.
    let ranked: Vec<NumberStat> = eligible.into_iter().chain(excluded).collect();

    let suggested: Vec<u8> = ranked.iter().take(config.top_n).map(|s| s.number).collect();
    let table_rows = config.top_n.max(config.table_min_rows);
    let table: Vec<NumberStat> = ranked.into_iter().take(table_rows).collect();

    HistoryReport {
        suggested,
        stats,
        table,
    }
}
