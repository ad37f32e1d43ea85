use thiserror::Error;

/// Erreurs du moteur de plan. `Validation` et `DataSource` sont absorbées par
/// l'appelant (liste par défaut) ; `AttemptsExhausted` signale un bug interne.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MilotoError {
    #[error("{0}")]
    Validation(String),

    #[error("Fuente de datos no disponible ({source_name}): {reason}")]
    DataSource { source_name: String, reason: String },

    #[error("No se encontró una combinación válida tras {0} intentos")]
    AttemptsExhausted(usize),

    #[error("Configuración inválida: {0}")]
    Config(String),
}

impl MilotoError {
    pub fn data_source(source_name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        MilotoError::DataSource {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    /// Vrai pour les erreurs que le shell doit absorber en retombant sur les valeurs par défaut.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MilotoError::Validation(_) | MilotoError::DataSource { .. })
    }
}

pub type Result<T> = std::result::Result<T, MilotoError>;
