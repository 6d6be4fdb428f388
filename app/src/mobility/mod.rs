mod distance;
mod factors;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::math::{round_to, round_to_int};
use crate::core::unit::{KilogramsCo2, Kilometers};
use crate::port::Geocoder;
use crate::request::coerce;

pub use distance::Coordinates;
use factors::TravelMode;
use factors::LOCAL_CURRENCY_RATE;

const DEFAULT_MANUAL_DISTANCE_KM: f64 = 10.0;

#[derive(Debug, Clone, Deserialize)]
pub struct MobilityRequest {
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    end: Option<String>,
    #[serde(default, deserialize_with = "coerce::choice")]
    mode: Option<String>,
    //only read when no route is given
    #[serde(default)]
    distance: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MobilityResponse {
    pub distance: String,
    pub co2: String,
    pub cost: String,
    pub time: String,
    pub saved_vs_car: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_coords: Option<Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_coords: Option<Coordinates>,
}

#[derive(Debug, Clone, PartialEq)]
struct Route {
    distance: Kilometers,
    endpoints: Option<(Coordinates, Coordinates)>,
}

#[tracing::instrument(skip(geocoder))]
pub async fn calculate<G: Geocoder>(request: &MobilityRequest, geocoder: &G) -> anyhow::Result<MobilityResponse> {
    let start = request.start.as_deref().unwrap_or_default().trim();
    let end = request.end.as_deref().unwrap_or_default().trim();

    let route = if start.is_empty() || end.is_empty() {
        Route {
            distance: manual_distance(request.distance.as_ref())?,
            endpoints: None,
        }
    } else {
        resolve_route(start, end, geocoder).await
    };

    let mode = TravelMode::from_name(request.mode.as_deref().unwrap_or_default());
    tracing::debug!("Pricing {} by {}", route.distance, mode);
    Ok(trip_summary(&route, mode))
}

fn manual_distance(distance: Option<&Value>) -> anyhow::Result<Kilometers> {
    match distance {
        Some(value) => coerce::to_float(value)
            .map(Kilometers)
            .map_err(|e| anyhow::anyhow!("invalid distance: {}", e)),
        None => Ok(Kilometers(DEFAULT_MANUAL_DISTANCE_KM)),
    }
}

async fn resolve_route<G: Geocoder>(start: &str, end: &str, geocoder: &G) -> Route {
    match geocode_both(start, end, geocoder).await {
        Ok(Some((from, to))) => Route {
            distance: distance::road_distance(&from, &to),
            endpoints: Some((from, to)),
        },
        Ok(None) => {
            tracing::info!("No geocoding match for {} or {}, using fallback distance", start, end);
            fallback_route(start, end)
        }
        Err(e) => {
            tracing::warn!("Geocoding {} -> {} failed, using fallback distance: {:?}", start, end, e);
            fallback_route(start, end)
        }
    }
}

async fn geocode_both<G: Geocoder>(
    start: &str,
    end: &str,
    geocoder: &G,
) -> anyhow::Result<Option<(Coordinates, Coordinates)>> {
    let from = geocoder.geocode(start).await?;
    let to = geocoder.geocode(end).await?;

    Ok(from.zip(to))
}

fn fallback_route(start: &str, end: &str) -> Route {
    Route {
        distance: distance::fallback_distance(start, end),
        endpoints: None,
    }
}

fn trip_summary(route: &Route, mode: TravelMode) -> MobilityResponse {
    let distance = route.distance;
    let factors = mode.factors();

    let co2 = KilogramsCo2(round_to(distance.0 * factors.co2_kg_per_km, 2));
    let cost = round_to(distance.0 * factors.cost_usd_per_km * LOCAL_CURRENCY_RATE, 2);
    let minutes = round_to_int(distance / factors.speed_kmh * 60.0);

    let car_co2 = KilogramsCo2(distance.0 * TravelMode::Car.factors().co2_kg_per_km);
    let saved = KilogramsCo2(round_to((car_co2 - co2).0, 2));

    MobilityResponse {
        distance: distance.to_string(),
        co2: co2.to_string(),
        cost: format!("₹{:.2}", cost),
        time: format_travel_time(minutes),
        saved_vs_car: if saved.0 > 0.0 {
            saved.to_string()
        } else {
            "0 kg".to_owned()
        },
        start_coords: route.endpoints.map(|(from, _)| from),
        end_coords: route.endpoints.map(|(_, to)| to),
    }
}

fn format_travel_time(minutes: i64) -> String {
    if minutes < 60 {
        format!("{} min", minutes)
    } else {
        format!("{} hr {} min", minutes / 60, minutes % 60)
    }
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    use super::*;

    #[derive(Default)]
    struct StubGeocoder {
        places: HashMap<&'static str, Coordinates>,
        fail: bool,
        lookups: RefCell<Vec<String>>,
    }

    impl StubGeocoder {
        fn with(places: &[(&'static str, Coordinates)]) -> Self {
            Self {
                places: places.iter().cloned().collect(),
                ..Default::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }
    }

    impl Geocoder for StubGeocoder {
        async fn geocode(&self, place: &str) -> anyhow::Result<Option<Coordinates>> {
            self.lookups.borrow_mut().push(place.to_owned());

            if self.fail {
                anyhow::bail!("operation timed out");
            }

            Ok(self.places.get(place).copied())
        }
    }

    fn request(value: Value) -> MobilityRequest {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn manual_distance_when_route_is_empty() {
        let geocoder = StubGeocoder::default();
        let response = calculate(
            &request(json!({"start": "", "end": "", "mode": "ev", "distance": 100})),
            &geocoder,
        )
        .await
        .unwrap();

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
        assert!(geocoder.lookups.borrow().is_empty());
    }

    #[tokio::test]
    async fn defaults_to_ten_km_by_car() {
        let response = calculate(&request(json!({})), &StubGeocoder::default()).await.unwrap();

        assert_eq!(response.distance, "10.0 km");
        assert_eq!(response.co2, "1.92 kg");
        assert_eq!(response.cost, "₹455.00");
        assert_eq!(response.time, "20 min");
        assert_eq!(response.saved_vs_car, "0 kg");
    }

    #[tokio::test]
    async fn null_or_numeric_mode_is_priced_like_a_car() {
        let by_car = calculate(&request(json!({"mode": "car", "distance": 10})), &StubGeocoder::default())
            .await
            .unwrap();

        for mode in [json!(null), json!(3), json!(true)] {
            let response = calculate(&request(json!({"mode": mode, "distance": 10})), &StubGeocoder::default())
                .await
                .unwrap();
            assert_eq!(response, by_car);
        }
    }

    #[tokio::test]
    async fn manual_distance_accepts_numeric_string() {
        let response = calculate(&request(json!({"distance": "42.5"})), &StubGeocoder::default())
            .await
            .unwrap();

        assert_eq!(response.distance, "42.5 km");
    }

    #[tokio::test]
    async fn manual_distance_rejects_garbage() {
        let result = calculate(&request(json!({"distance": "far"})), &StubGeocoder::default()).await;

        assert!(result.unwrap_err().to_string().contains("invalid distance"));
    }

    #[tokio::test]
    async fn manual_distance_is_ignored_when_route_is_given() {
        let geocoder = StubGeocoder::failing();
        let response = calculate(
            &request(json!({"start": "Delhi", "end": "Mumbai", "distance": "far"})),
            &geocoder,
        )
        .await
        .unwrap();

        assert_eq!(response.distance, distance::fallback_distance("Delhi", "Mumbai").to_string());
    }

    #[tokio::test]
    async fn geocoded_route_reports_coordinates() {
        let delhi = Coordinates::new(28.6139, 77.2090);
        let agra = Coordinates::new(27.1767, 78.0081);
        let geocoder = StubGeocoder::with(&[("Delhi", delhi), ("Agra", agra)]);

        let response = calculate(&request(json!({"start": " Delhi ", "end": "Agra", "mode": "metro"})), &geocoder)
            .await
            .unwrap();

        let expected = distance::road_distance(&delhi, &agra);
        assert_eq!(response.distance, expected.to_string());
        assert_eq!(response.start_coords, Some(delhi));
        assert_eq!(response.end_coords, Some(agra));
        assert_eq!(*geocoder.lookups.borrow(), vec!["Delhi".to_owned(), "Agra".to_owned()]);
    }

    #[tokio::test]
    async fn unknown_place_uses_seeded_fallback() {
        let geocoder = StubGeocoder::with(&[("Delhi", Coordinates::new(28.6139, 77.2090))]);

        let first = calculate(&request(json!({"start": "Delhi", "end": "Nowhere"})), &geocoder)
            .await
            .unwrap();
        let second = calculate(&request(json!({"start": "Delhi", "end": "Nowhere"})), &geocoder)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(first.distance, distance::fallback_distance("Delhi", "Nowhere").to_string());
        assert_eq!(first.start_coords, None);
    }

    #[tokio::test]
    async fn geocoding_failure_uses_seeded_fallback() {
        let response = calculate(
            &request(json!({"start": "Delhi", "end": "Mumbai"})),
            &StubGeocoder::failing(),
        )
        .await
        .unwrap();

        let km = distance::fallback_distance("Delhi", "Mumbai");
        assert_eq!(response.distance, km.to_string());
        assert!((5.0..=50.0).contains(&km.0));
    }

    #[test]
    fn saved_co2_is_floored_at_zero() {
        let route = Route {
            distance: Kilometers(20.0),
            endpoints: None,
        };

        assert_eq!(trip_summary(&route, TravelMode::Car).saved_vs_car, "0 kg");
        assert_eq!(trip_summary(&route, TravelMode::Metro).saved_vs_car, "3.24 kg");
    }

    #[test]
    fn travel_time_switches_to_hours() {
        assert_eq!(format_travel_time(0), "0 min");
        assert_eq!(format_travel_time(59), "59 min");
        assert_eq!(format_travel_time(60), "1 hr 0 min");
        assert_eq!(format_travel_time(200), "3 hr 20 min");
    }
}
