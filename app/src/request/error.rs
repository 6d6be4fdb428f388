use derive_more::derive::{Display, Error};

#[derive(Debug, Display, Error)]
pub enum CalculationError {
    #[display("{_0}")]
    InvalidRequest(#[error(not(source))] String),

    #[display("Model not loaded properly.")]
    ModelUnavailable,

    #[display("Prediction error: {_0:#}")]
    Prediction(#[error(not(source))] anyhow::Error),
}

impl CalculationError {
    pub fn invalid(error: impl std::fmt::Display) -> Self {
        CalculationError::InvalidRequest(error.to_string())
    }
}

impl From<serde_json::Error> for CalculationError {
    fn from(error: serde_json::Error) -> Self {
        CalculationError::invalid(error)
    }
}
