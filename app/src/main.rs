use anyhow::Context;
use config::ConfigError;
use serde_json::Value;
use settings::Settings;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::adapter::nominatim::NominatimGeocoder;
use crate::prediction::{EnergyPredictor, TreeEnsemble};
use crate::request::Calculators;

mod adapter;
mod carbon;
mod core;
mod energy;
mod mobility;
pub mod port;
mod prediction;
mod request;
mod settings;

#[tokio::main(flavor = "current_thread")]
pub async fn main() {
    let response = respond(Settings::new(), tokio::io::stdin()).await;

    //exactly one line on stdout, exit code stays 0
    println!("{}", response);
}

async fn respond(settings: Result<Settings, ConfigError>, input: impl AsyncRead + Unpin) -> Value {
    match settings {
        Ok(settings) => run(&settings, input).await,
        Err(e) => request::error_response(&format!("Configuration error: {}", e)),
    }
}

async fn run(settings: &Settings, mut input: impl AsyncRead + Unpin) -> Value {
    //logging is a diagnostic aid only, a broken filter must not cost the response
    if let Err(e) = settings.monitoring.init() {
        eprintln!("Error initializing logging: {}", e);
    }

    let model_path = settings.model.resolved_path();
    tracing::debug!("Loading energy model from {}", model_path.display());
    let predictor = EnergyPredictor::from_load_result(TreeEnsemble::load(&model_path));
    tracing::debug!("Energy model available: {}", predictor.is_available());

    let geocoder = match NominatimGeocoder::new(&settings.geocoding).context("Error creating geocoding client") {
        Ok(geocoder) => geocoder,
        Err(e) => return request::error_response(&format!("{:#}", e)),
    };
    let calculators = Calculators::new(geocoder, predictor);

    let mut raw = String::new();
    if let Err(e) = input.read_to_string(&mut raw).await {
        tracing::warn!("Error reading request from stdin: {:?}", e);
        return request::error_response(&e);
    }

    calculators.handle(&raw).await
}
