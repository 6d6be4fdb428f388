use anyhow::Context;
use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::codes;
use crate::request::coerce;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const ISO_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Deserialize)]
pub struct EnergyPredictRequest {
    #[serde(default = "default_timestamp")]
    timestamp: String,
    #[serde(rename = "Temperature", default = "default_temperature", deserialize_with = "coerce::float")]
    temperature: f64,
    #[serde(rename = "Humidity", default = "default_humidity", deserialize_with = "coerce::float")]
    humidity: f64,
    #[serde(rename = "SquareFootage", default = "default_square_footage", deserialize_with = "coerce::float")]
    square_footage: f64,
    #[serde(rename = "Occupancy", default = "default_occupancy", deserialize_with = "coerce::int")]
    occupancy: i64,
    #[serde(rename = "HVACUsage", default)]
    hvac_usage: Option<Value>,
    #[serde(rename = "LightingUsage", default)]
    lighting_usage: Option<Value>,
    #[serde(rename = "RenewableEnergy", default, deserialize_with = "coerce::float")]
    renewable_energy: f64,
    #[serde(rename = "Holiday", default)]
    holiday: Option<Value>,
}

fn default_timestamp() -> String {
    "2022-01-01 12:00:00".to_owned()
}

fn default_temperature() -> f64 {
    25.0
}

fn default_humidity() -> f64 {
    50.0
}

fn default_square_footage() -> f64 {
    1500.0
}

fn default_occupancy() -> i64 {
    5
}

/// One model input row. Field order is the column order the regressor was trained on;
/// a reordering does not fail, it silently produces wrong predictions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    #[serde(rename = "Temperature")]
    pub temperature: f64,
    #[serde(rename = "Humidity")]
    pub humidity: f64,
    #[serde(rename = "SquareFootage")]
    pub square_footage: f64,
    #[serde(rename = "Occupancy")]
    pub occupancy: f64,
    #[serde(rename = "HVACUsage")]
    pub hvac_usage: f64,
    #[serde(rename = "LightingUsage")]
    pub lighting_usage: f64,
    #[serde(rename = "RenewableEnergy")]
    pub renewable_energy: f64,
    /// categorical, alphabetical day-name code
    #[serde(rename = "DayOfWeek")]
    pub day_of_week: f64,
    #[serde(rename = "Holiday")]
    pub holiday: f64,
    pub hour: f64,
    pub day: f64,
    pub month: f64,
    /// numeric, Monday = 0
    pub dayofweek: f64,
}

impl FeatureVector {
    pub const LEN: usize = 13;

    pub const COLUMNS: [&'static str; Self::LEN] = [
        "Temperature",
        "Humidity",
        "SquareFootage",
        "Occupancy",
        "HVACUsage",
        "LightingUsage",
        "RenewableEnergy",
        "DayOfWeek",
        "Holiday",
        "hour",
        "day",
        "month",
        "dayofweek",
    ];

    pub fn encode(request: &EnergyPredictRequest) -> anyhow::Result<Self> {
        let timestamp = parse_timestamp(&request.timestamp)?;

        Ok(Self {
            temperature: request.temperature,
            humidity: request.humidity,
            square_footage: request.square_footage,
            occupancy: request.occupancy as f64,
            hvac_usage: codes::on_off_code(request.hvac_usage.as_ref()) as f64,
            lighting_usage: codes::on_off_code(request.lighting_usage.as_ref()) as f64,
            renewable_energy: request.renewable_energy,
            day_of_week: codes::day_of_week_code(timestamp.weekday()) as f64,
            holiday: codes::yes_no_code(request.holiday.as_ref()) as f64,
            hour: timestamp.hour() as f64,
            day: timestamp.day() as f64,
            month: timestamp.month() as f64,
            dayofweek: timestamp.weekday().num_days_from_monday() as f64,
        })
    }

    //same order as COLUMNS
    pub fn to_row(&self) -> [f64; Self::LEN] {
        [
            self.temperature,
            self.humidity,
            self.square_footage,
            self.occupancy,
            self.hvac_usage,
            self.lighting_usage,
            self.renewable_energy,
            self.day_of_week,
            self.holiday,
            self.hour,
            self.day,
            self.month,
            self.dayofweek,
        ]
    }

    pub fn column_index(name: &str) -> Option<usize> {
        Self::COLUMNS.iter().position(|c| *c == name)
    }
}

fn parse_timestamp(raw: &str) -> anyhow::Result<NaiveDateTime> {
    let trimmed = raw.trim();

    if let Ok(ts) = NaiveDateTime::parse_from_str(trimmed, ISO_TIMESTAMP_FORMAT) {
        return Ok(ts);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(date.and_time(NaiveTime::default()));
    }

    NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT)
        .with_context(|| format!("invalid timestamp '{}', expected YYYY-MM-DD HH:MM:SS", raw))
}
