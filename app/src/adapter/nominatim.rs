use anyhow::Context;
use infrastructure::HttpClientConfig;
use reqwest_middleware::ClientWithMiddleware;
use serde::Deserialize;

use crate::mobility::Coordinates;
use crate::port::Geocoder;
use crate::settings::GeocodingSettings;

#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: ClientWithMiddleware,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PlaceDTO {
    lat: String,
    lon: String,
}

impl NominatimGeocoder {
    pub fn new(settings: &GeocodingSettings) -> anyhow::Result<Self> {
        let client =
            HttpClientConfig::new(Some(settings.user_agent.clone()), Some(settings.timeout_secs)).new_tracing_client()?;

        Ok(Self {
            client,
            base_url: settings.url.trim_end_matches('/').to_owned(),
        })
    }
}

impl Geocoder for NominatimGeocoder {
    #[tracing::instrument(skip(self))]
    async fn geocode(&self, place: &str) -> anyhow::Result<Option<Coordinates>> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?;

        let places = response
            .json::<Vec<PlaceDTO>>()
            .await
            .context("Error decoding geocoding response")?;

        match places.first() {
            Some(dto) => Ok(Some(dto.try_into()?)),
            None => Ok(None),
        }
    }
}

impl TryFrom<&PlaceDTO> for Coordinates {
    type Error = anyhow::Error;

    fn try_from(dto: &PlaceDTO) -> Result<Self, Self::Error> {
        let latitude = dto
            .lat
            .parse::<f64>()
            .with_context(|| format!("Invalid latitude {}", dto.lat))?;
        let longitude = dto
            .lon
            .parse::<f64>()
            .with_context(|| format!("Invalid longitude {}", dto.lon))?;

        Ok(Coordinates::new(latitude, longitude))
    }
}
