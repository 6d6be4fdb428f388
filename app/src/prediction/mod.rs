mod codes;
mod features;
mod model;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::math::round_to;
use crate::core::unit::KiloWattHours;
use crate::port::EnergyModel;
use crate::request::CalculationError;

pub use features::FeatureVector;
use features::EnergyPredictRequest;
pub use model::TreeEnsemble;

type SharedModel = Box<dyn EnergyModel + Send + Sync>;

pub struct EnergyPredictor {
    model: Option<SharedModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResponse {
    pub prediction: KiloWattHours,
    pub unit: &'static str,
    //untouched request, for debugging on the caller side
    pub inputs: Value,
}

impl EnergyPredictor {
    pub fn new(model: impl EnergyModel + Send + Sync + 'static) -> Self {
        Self {
            model: Some(Box::new(model)),
        }
    }

    pub fn unavailable() -> Self {
        Self { model: None }
    }

    // A failed load is not fatal, every prediction request reports it instead
    pub fn from_load_result<M>(result: anyhow::Result<M>) -> Self
    where
        M: EnergyModel + Send + Sync + 'static,
    {
        match result {
            Ok(model) => {
                tracing::info!("Energy model loaded");
                Self::new(model)
            }
            Err(e) => {
                tracing::warn!("Energy model not available: {:?}", e);
                Self::unavailable()
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.model.is_some()
    }

    pub fn predict(&self, request: &Value) -> Result<PredictionResponse, CalculationError> {
        let model = self.model.as_ref().ok_or(CalculationError::ModelUnavailable)?;

        let prediction = run_prediction(&**model, request).map_err(|e| {
            tracing::warn!("Prediction failed: {:?}", e);
            CalculationError::Prediction(e)
        })?;

        Ok(PredictionResponse {
            prediction,
            unit: KiloWattHours::UNIT,
            inputs: request.clone(),
        })
    }
}

fn run_prediction(model: &(dyn EnergyModel + Send + Sync), request: &Value) -> anyhow::Result<KiloWattHours> {
    let request = EnergyPredictRequest::deserialize(request)?;
    let features = FeatureVector::encode(&request)?;
    tracing::debug!("Encoded features {:?}", features);

    let raw = model.predict(&features)?;
    Ok(KiloWattHours(round_to(raw, 2)))
}
