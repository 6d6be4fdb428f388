#![allow(async_fn_in_trait)]

use anyhow::Result;

use crate::mobility::Coordinates;
use crate::prediction::FeatureVector;

pub trait Geocoder {
    //Ok(None) when the place is unknown
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>>;
}

pub trait EnergyModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64>;
}
