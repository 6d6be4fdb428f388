use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::math::round_to_int;
use crate::request::coerce;

const HOURS_PER_DAY: i64 = 24;
const MIDDAY: i64 = 12;
const IDLE_LOAD_FACTOR: f64 = 0.2;
const JITTER_FACTOR: f64 = 0.05;
const SOLAR_SHARE_OF_LOAD: f64 = 0.4;
const SOLAR_FIRST_HOUR: i64 = 7;
const SOLAR_LAST_HOUR: i64 = 17;
const PEAK_FACTOR: f64 = 0.9;
const SOLAR_POTENTIAL_SHARE: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildingType {
    Office,
    Campus,
    Home,
}

impl BuildingType {
    //unknown types are treated as office
    pub fn from_name(name: &str) -> Self {
        match name {
            "campus" => BuildingType::Campus,
            "home" => BuildingType::Home,
            _ => BuildingType::Office,
        }
    }

    //kWh per hour
    pub fn base_load(&self) -> f64 {
        match self {
            BuildingType::Office => 500.0,
            BuildingType::Campus => 1200.0,
            BuildingType::Home => 150.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnergySimulateRequest {
    #[serde(default, deserialize_with = "coerce::choice")]
    building_type: Option<String>,
    #[serde(default = "default_hours", deserialize_with = "coerce::int")]
    hours: i64,
    //percent
    #[serde(default = "default_lighting", deserialize_with = "coerce::int")]
    lighting: i64,
}

fn default_hours() -> i64 {
    10
}

fn default_lighting() -> i64 {
    80
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyUsage {
    pub time: String,
    pub usage: i64,
    pub solar: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnergySimulateResponse {
    pub hourly_usage: Vec<HourlyUsage>,
    pub total_daily_kwh: i64,
    pub peak_warning: bool,
    pub solar_potential: i64,
}

pub fn simulate(request: &EnergySimulateRequest, rng: &mut impl Rng) -> EnergySimulateResponse {
    let base = BuildingType::from_name(request.building_type.as_deref().unwrap_or_default()).base_load();
    let lighting = request.lighting as f64 / 100.0;

    //operating window centered around noon
    let half = request.hours.div_euclid(2);
    let start_hour = MIDDAY.saturating_sub(half);
    let end_hour = MIDDAY.saturating_add(half);

    let mut hourly_usage = Vec::with_capacity(HOURS_PER_DAY as usize);
    let mut total = 0.0;

    for hour in 0..HOURS_PER_DAY {
        let is_active = start_hour <= hour && hour < end_hour;

        let load = if is_active {
            base * lighting + rng.gen_range(-JITTER_FACTOR..=JITTER_FACTOR) * base
        } else {
            base * IDLE_LOAD_FACTOR
        };

        let solar = if (SOLAR_FIRST_HOUR..=SOLAR_LAST_HOUR).contains(&hour) {
            round_to_int(load * SOLAR_SHARE_OF_LOAD)
        } else {
            0
        };

        hourly_usage.push(HourlyUsage {
            time: format!("{:02}:00", hour),
            usage: round_to_int(load),
            solar,
        });
        total += load;
    }

    let peak_warning = hourly_usage.iter().any(|h| h.usage as f64 > base * PEAK_FACTOR);

    EnergySimulateResponse {
        hourly_usage,
        total_daily_kwh: round_to_int(total),
        peak_warning,
        solar_potential: round_to_int(total * SOLAR_POTENTIAL_SHARE),
    }
}
