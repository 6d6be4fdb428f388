pub mod coerce;
mod error;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::carbon::{self, CarbonRequest};
use crate::energy::{self, EnergySimulateRequest, SuggestionsRequest};
use crate::mobility::{self, MobilityRequest};
use crate::port::Geocoder;
use crate::prediction::EnergyPredictor;

pub use error::CalculationError;

// Used when stdin is completely empty. Its type matches no calculator, so it ends up with the suggestions.
const EMPTY_INPUT_REQUEST: &str = r#"{"type": "carbon", "transport": "ev", "energy": "solar"}"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    Mobility,
    EnergySimulate,
    CarbonSimulate,
    EnergyPredict,
    Suggestions,
}

impl RequestType {
    fn of(request: &Map<String, Value>) -> Self {
        match request.get("type").and_then(Value::as_str) {
            Some("mobility") => RequestType::Mobility,
            Some("energy_simulate") => RequestType::EnergySimulate,
            Some("carbon_simulate") => RequestType::CarbonSimulate,
            Some("energy_predict") => RequestType::EnergyPredict,
            //energy_optimize, missing or anything else
            _ => RequestType::Suggestions,
        }
    }
}

pub struct Calculators<G: Geocoder> {
    geocoder: G,
    predictor: EnergyPredictor,
}

impl<G: Geocoder> Calculators<G> {
    pub fn new(geocoder: G, predictor: EnergyPredictor) -> Self {
        Self { geocoder, predictor }
    }

    /// Always produces exactly one JSON object: the calculator result or `{"error": ...}`.
    pub async fn handle(&self, input: &str) -> Value {
        match self.dispatch(input).await {
            Ok(response) => response,
            Err(e) => error_response(&e),
        }
    }

    async fn dispatch(&self, input: &str) -> Result<Value, CalculationError> {
        let request = parse_request(input)?;
        let request_type = RequestType::of(&request);
        let request = Value::Object(request);

        tracing::info!("Handling {:?} request", request_type);

        match request_type {
            RequestType::Mobility => {
                let response = mobility::calculate(&decode::<MobilityRequest>(&request)?, &self.geocoder)
                    .await
                    .map_err(|e| CalculationError::invalid(format!("{:#}", e)))?;
                encode(response)
            }
            RequestType::EnergySimulate => {
                let request = decode::<EnergySimulateRequest>(&request)?;
                encode(energy::simulate(&request, &mut rand::thread_rng()))
            }
            RequestType::CarbonSimulate => encode(carbon::calculate(&decode::<CarbonRequest>(&request)?)),
            RequestType::EnergyPredict => encode(self.predictor.predict(&request)?),
            RequestType::Suggestions => encode(energy::suggest(&decode::<SuggestionsRequest>(&request)?)),
        }
    }
}

pub fn error_response(message: &impl std::fmt::Display) -> Value {
    json!({ "error": message.to_string() })
}

fn parse_request(input: &str) -> Result<Map<String, Value>, CalculationError> {
    let raw = if input.is_empty() { EMPTY_INPUT_REQUEST } else { input };

    match serde_json::from_str::<Value>(raw)? {
        Value::Object(request) => Ok(request),
        other => Err(CalculationError::invalid(format!(
            "request must be a JSON object, got {}",
            other
        ))),
    }
}

fn decode<T: DeserializeOwned>(request: &Value) -> Result<T, CalculationError> {
    Ok(serde_json::from_value(request.clone())?)
}

fn encode(response: impl Serialize) -> Result<Value, CalculationError> {
    Ok(serde_json::to_value(response)?)
}

#[cfg(test)]
mod test {
    use assert_json_diff::{assert_json_eq, assert_json_include};

    use super::*;
    use crate::mobility::Coordinates;
    use crate::port::EnergyModel;
    use crate::prediction::FeatureVector;

    struct OfflineGeocoder;

    impl Geocoder for OfflineGeocoder {
        async fn geocode(&self, _place: &str) -> anyhow::Result<Option<Coordinates>> {
            anyhow::bail!("network unreachable")
        }
    }

    struct ConstantModel;

    impl EnergyModel for ConstantModel {
        fn predict(&self, features: &FeatureVector) -> anyhow::Result<f64> {
            Ok(100.0 + features.occupancy / 3.0)
        }
    }

    fn calculators() -> Calculators<OfflineGeocoder> {
        Calculators::new(OfflineGeocoder, EnergyPredictor::new(ConstantModel))
    }

    fn without_model() -> Calculators<OfflineGeocoder> {
        Calculators::new(OfflineGeocoder, EnergyPredictor::unavailable())
    }

    #[test]
    fn recognises_request_types() {
        let of = |value: Value| RequestType::of(value.as_object().unwrap());

        assert_eq!(of(json!({"type": "mobility"})), RequestType::Mobility);
        assert_eq!(of(json!({"type": "energy_simulate"})), RequestType::EnergySimulate);
        assert_eq!(of(json!({"type": "carbon_simulate"})), RequestType::CarbonSimulate);
        assert_eq!(of(json!({"type": "energy_predict"})), RequestType::EnergyPredict);
        assert_eq!(of(json!({"type": "energy_optimize"})), RequestType::Suggestions);
        assert_eq!(of(json!({"type": "carbon"})), RequestType::Suggestions);
        assert_eq!(of(json!({"type": 7})), RequestType::Suggestions);
        assert_eq!(of(json!({})), RequestType::Suggestions);
    }

    #[tokio::test]
    async fn carbon_scenario() {
        let response = calculators()
            .handle(r#"{"type":"carbon_simulate","transport":"ev","energy":"solar","diet":"vegan"}"#)
            .await;

        assert_json_include!(actual: response, expected: json!({"total_footprint": 4500, "score": 74}));
    }

    #[tokio::test]
    async fn null_table_keys_select_defaults() {
        let carbon = calculators()
            .handle(r#"{"type":"carbon_simulate","transport":null,"energy":"solar","diet":"vegan"}"#)
            .await;
        assert_json_include!(actual: carbon, expected: json!({"total_footprint": 6500, "score": 63}));

        let mobility = calculators().handle(r#"{"type":"mobility","mode":null,"distance":10}"#).await;
        assert_json_include!(actual: mobility, expected: json!({"co2": "1.92 kg", "saved_vs_car": "0 kg"}));

        let simulate = calculators()
            .handle(r#"{"type":"energy_simulate","building_type":null,"hours":0}"#)
            .await;
        assert_json_include!(actual: simulate, expected: json!({"total_daily_kwh": 2400}));
    }

    #[tokio::test]
    async fn mobility_scenario() {
        let response = calculators()
            .handle(r#"{"type":"mobility","start":"","end":"","mode":"ev","distance":100}"#)
            .await;

        assert_json_eq!(
            response,
            json!({
                "distance": "100.0 km",
                "co2": "5.3 kg",
                "cost": "₹910.00",
                "time": "3 hr 20 min",
                "saved_vs_car": "13.9 kg"
            })
        );
    }

    #[tokio::test]
    async fn mobility_offline_fallback_is_repeatable() {
        let input = r#"{"type":"mobility","start":"Delhi","end":"Mumbai","mode":"bus"}"#;
        let first = calculators().handle(input).await;
        let second = calculators().handle(input).await;

        assert_eq!(first, second);
        assert!(first.get("error").is_none());
        assert!(first.get("start_coords").is_none());
    }

    #[tokio::test]
    async fn mobility_bad_distance_is_reported() {
        let response = calculators().handle(r#"{"type":"mobility","distance":"far"}"#).await;

        assert_json_eq!(
            response,
            json!({"error": "invalid distance: could not convert string to float: 'far'"})
        );
    }

    #[tokio::test]
    async fn energy_simulate_idle_day() {
        let response = calculators().handle(r#"{"type":"energy_simulate","hours":0}"#).await;

        assert_json_include!(
            actual: response,
            expected: json!({"total_daily_kwh": 2400, "peak_warning": false, "solar_potential": 720})
        );
        assert_eq!(response["hourly_usage"].as_array().unwrap().len(), 24);
    }

    #[tokio::test]
    async fn energy_predict_echoes_inputs() {
        let response = calculators().handle(r#"{"type":"energy_predict","Occupancy":"4"}"#).await;

        assert_json_eq!(
            response,
            json!({
                "prediction": 101.33,
                "unit": "kWh",
                "inputs": {"type": "energy_predict", "Occupancy": "4"}
            })
        );
    }

    #[tokio::test]
    async fn energy_predict_without_model() {
        let response = without_model().handle(r#"{"type":"energy_predict"}"#).await;

        assert_json_eq!(response, json!({"error": "Model not loaded properly."}));
    }

    #[tokio::test]
    async fn energy_predict_bad_timestamp() {
        let response = calculators()
            .handle(r#"{"type":"energy_predict","timestamp":"tomorrow"}"#)
            .await;

        let message = response["error"].as_str().unwrap();
        assert!(message.starts_with("Prediction error: invalid timestamp 'tomorrow'"), "{}", message);
        assert_eq!(response.as_object().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_input_falls_through_to_suggestions() {
        let response = calculators().handle("").await;

        assert_json_eq!(
            response,
            json!({
                "suggestions": [{
                    "type": "warning",
                    "message": "High peak usage detected. Consider reducing HVAC load."
                }]
            })
        );
    }

    #[tokio::test]
    async fn explicit_suggestions_request() {
        let response = calculators()
            .handle(r#"{"type":"energy_optimize","consumption":450,"hour":21}"#)
            .await;

        assert_json_eq!(
            response,
            json!({
                "suggestions": [{
                    "type": "success",
                    "message": "Good time to run high-energy appliances (off-peak)."
                }]
            })
        );
    }

    #[tokio::test]
    async fn malformed_json_is_a_single_error() {
        let response = calculators().handle("not json").await;

        let object = response.as_object().unwrap();
        assert_eq!(object.len(), 1);
        let expected = serde_json::from_str::<Value>("not json").unwrap_err().to_string();
        assert_eq!(object["error"], json!(expected));
    }

    #[tokio::test]
    async fn whitespace_only_input_is_malformed() {
        let response = calculators().handle("  \n").await;

        assert!(response["error"].as_str().unwrap().contains("EOF"));
    }

    #[tokio::test]
    async fn non_object_request_is_rejected() {
        let response = calculators().handle("[1, 2]").await;

        assert_json_eq!(response, json!({"error": "request must be a JSON object, got [1,2]"}));
    }

    #[tokio::test]
    async fn coercion_failure_outside_prediction_is_plain_error() {
        let response = calculators().handle(r#"{"type":"energy_simulate","hours":"many"}"#).await;

        assert_json_eq!(response, json!({"error": "invalid literal for integer: 'many'"}));
    }
}
