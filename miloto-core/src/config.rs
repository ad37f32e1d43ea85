use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MilotoError, Result};
use crate::models::NUMBERS_PER_BET;

/// Paramètres de génération des grilles et du calendrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    pub max_number: u8,
    pub payroll_days: Vec<u32>,
    pub default_hot: Vec<u8>,
    pub default_hot_count: usize,
    pub max_hot_count: usize,
    /// Borne haute de la « moitié basse » (inclusive).
    pub low_max: u8,
    /// Le plus grand numéro d'une grille doit dépasser ce seuil.
    pub top_threshold: u8,
    pub sum_min: u32,
    pub sum_max: u32,
    /// Longueur maximale autorisée d'une suite de numéros consécutifs.
    pub max_run: usize,
    pub max_attempts: usize,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            max_number: 39,
            payroll_days: vec![14, 15, 29, 30],
            default_hot: vec![3, 4, 19, 32, 33, 35],
            default_hot_count: 2,
            max_hot_count: 3,
            low_max: 19,
            top_threshold: 31,
            sum_min: 50,
            sum_max: 150,
            max_run: 2,
            max_attempts: 100_000,
        }
    }
}

impl PlanConfig {
    pub fn is_payroll_day(&self, day_of_month: u32) -> bool {
        self.payroll_days.contains(&day_of_month)
    }

    /// Sommes extrêmes d'une grille : 1+2+3+4+5 et les 5 plus grands numéros.
    pub fn reachable_sums(&self) -> (u32, u32) {
        let k = NUMBERS_PER_BET as u32;
        let top = self.max_number as u32;
        (k * (k + 1) / 2, (top + 1 - k..=top).sum())
    }

    pub fn validate(&self) -> Result<()> {
        if (self.max_number as usize) < NUMBERS_PER_BET * 2 {
            return Err(MilotoError::Config(format!(
                "max_number ({}) demasiado pequeño para apuestas de {} números",
                self.max_number, NUMBERS_PER_BET
            )));
        }
        if self.sum_min > self.sum_max {
            return Err(MilotoError::Config(format!(
                "sum_min ({}) mayor que sum_max ({})",
                self.sum_min, self.sum_max
            )));
        }
        if self.top_threshold >= self.max_number {
            return Err(MilotoError::Config(format!(
                "top_threshold ({}) debe ser menor que max_number ({})",
                self.top_threshold, self.max_number
            )));
        }
        if self.low_max < 1 || self.low_max >= self.max_number {
            return Err(MilotoError::Config(format!(
                "low_max ({}) debe estar en 1..{}",
                self.low_max,
                self.max_number - 1
            )));
        }
        if self.max_run == 0 {
            return Err(MilotoError::Config("max_run debe ser al menos 1".into()));
        }
        if self.max_hot_count > NUMBERS_PER_BET {
            return Err(MilotoError::Config(format!(
                "max_hot_count ({}) mayor que {}",
                self.max_hot_count, NUMBERS_PER_BET
            )));
        }
        let (lowest_sum, highest_sum) = self.reachable_sums();
        if self.sum_min > highest_sum || self.sum_max < lowest_sum {
            return Err(MilotoError::Config(format!(
                "rango de suma {}..={} fuera de lo alcanzable ({}..={})",
                self.sum_min, self.sum_max, lowest_sum, highest_sum
            )));
        }
        if self.max_attempts == 0 {
            return Err(MilotoError::Config("max_attempts debe ser mayor que 0".into()));
        }
        if let Some(&n) = self
            .default_hot
            .iter()
            .find(|&&n| n < 1 || n > self.max_number)
        {
            return Err(MilotoError::Config(format!(
                "default_hot contiene {} fuera de 1..{}",
                n, self.max_number
            )));
        }
        Ok(())
    }
}

/// Paramètres du classement historique des numéros chauds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub top_n: usize,
    pub min_played: u32,
    pub table_min_rows: usize,
    pub draw_columns: Vec<String>,
    pub play_columns: Vec<String>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            top_n: 6,
            min_played: 0,
            table_min_rows: 10,
            draw_columns: (1..=5).map(|i| format!("winning_{i}")).collect(),
            play_columns: (1..=5).map(|i| format!("chosen_{i}")).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub plan: PlanConfig,
    pub history: HistoryConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| MilotoError::Config(format!("no se pudo leer {:?}: {}", path, e)))?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(json)
            .map_err(|e| MilotoError::Config(format!("JSON inválido: {e}")))?;
        config.plan.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_plan_config() {
        let config = PlanConfig::default();
        assert_eq!(config.max_number, 39);
        assert_eq!(config.default_hot, vec![3, 4, 19, 32, 33, 35]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_payroll_days() {
        let config = PlanConfig::default();
        for d in [14, 15, 29, 30] {
            assert!(config.is_payroll_day(d), "{d} debería ser día de nómina");
        }
        for d in [1, 13, 16, 28, 31] {
            assert!(!config.is_payroll_day(d), "{d} no es día de nómina");
        }
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = AppConfig::from_json(r#"{"history": {"top_n": 4}}"#).unwrap();
        assert_eq!(config.history.top_n, 4);
        assert_eq!(config.history.min_played, 0);
        assert_eq!(config.plan, PlanConfig::default());
    }

    #[test]
    fn test_invalid_plan_rejected() {
        let err = AppConfig::from_json(r#"{"plan": {"sum_min": 200, "sum_max": 100}}"#).unwrap_err();
        assert!(matches!(err, MilotoError::Config(_)));

        let err = AppConfig::from_json(r#"{"plan": {"default_hot": [0, 3]}}"#).unwrap_err();
        assert!(matches!(err, MilotoError::Config(_)));
    }

    #[test]
    fn test_unsatisfiable_filters_rejected() {
        for json in [
            r#"{"plan": {"max_run": 0, "max_attempts": 1000}}"#,
            r#"{"plan": {"low_max": 39}}"#,
            r#"{"plan": {"low_max": 0}}"#,
            r#"{"plan": {"max_hot_count": 6}}"#,
            r#"{"plan": {"sum_min": 186, "sum_max": 300}}"#,
            r#"{"plan": {"sum_min": 0, "sum_max": 14}}"#,
        ] {
            let err = AppConfig::from_json(json).unwrap_err();
            assert!(matches!(err, MilotoError::Config(_)), "{json} aurait dû être refusé");
        }
    }

    #[test]
    fn test_filter_bounds_accepted() {
        let config = AppConfig::from_json(
            r#"{"plan": {"max_run": 1, "low_max": 38, "max_hot_count": 5, "sum_min": 185, "sum_max": 185}}"#,
        )
        .unwrap();
        assert_eq!(config.plan.max_run, 1);
        assert_eq!(PlanConfig::default().reachable_sums(), (15, 185));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"plan": {{"max_attempts": 500}}, "history": {{"top_n": 8}}}}"#).unwrap();
        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.plan.max_attempts, 500);
        assert_eq!(config.plan.max_number, 39);
        assert_eq!(config.history.top_n, 8);
    }

    #[test]
    fn test_load_invalid_file() {
        let err = AppConfig::load(Path::new("/nonexistent/miloto.json")).unwrap_err();
        assert!(matches!(err, MilotoError::Config(_)));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"plan": {{"max_run": 0}}}}"#).unwrap();
        assert!(matches!(AppConfig::load(file.path()), Err(MilotoError::Config(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(AppConfig::from_json("{not json").is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let restored = AppConfig::from_json(&json).unwrap();
        assert_eq!(restored, config);
    }
}
