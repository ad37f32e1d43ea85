use chrono::NaiveDate;

use crate::error::{MilotoError, Result};

/// Parse « 3, 7;10 , 11 » → [3, 7, 10, 11].
///
/// Séparateurs `,` ou `;`, jetons vides ignorés, doublons supprimés en gardant
/// la première occurrence. Une chaîne vide donne une liste vide.
pub fn parse_hot_numbers(text: &str, max_number: u8) -> Result<Vec<u8>> {
    let mut numbers: Vec<u8> = Vec::new();

    for token in text.split([',', ';']).map(str::trim) {
        if token.is_empty() {
            continue;
        }
        if !token.chars().all(|c| c.is_ascii_digit()) {
            return Err(MilotoError::Validation(
                "Solo se permiten números separados por comas.".to_string(),
            ));
        }
        // Un jeton trop long pour un u32 est forcément hors limites.
        let value = token.parse::<u32>().unwrap_or(u32::MAX);
        if value < 1 || value > max_number as u32 {
            return Err(MilotoError::Validation(format!(
                "Número fuera de rango (1..{}): {}",
                max_number, token
            )));
        }
        let n = value as u8;
        if !numbers.contains(&n) {
            numbers.push(n);
        }
    }

    Ok(numbers)
}

/// Date au format AAAA-MM-JJ. Vide ou illisible → `None` (l'appelant prend la date du jour).
pub fn parse_base_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}
