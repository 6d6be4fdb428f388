use serde::{Deserialize, Serialize};

use crate::core::math::round_to_int;
use crate::request::coerce;

//kg CO2 per year, first entry is the fallback for unknown keys
const TRANSPORT_BASES: [(&str, i64); 3] = [("car", 3500), ("ev", 1500), ("metro", 800)];
const ENERGY_BASES: [(&str, i64); 3] = [("grid", 3000), ("hybrid", 1800), ("solar", 500)];
const DIET_BASES: [(&str, i64); 3] = [("average", 2500), ("vegetarian", 1500), ("vegan", 1000)];
const OTHER_BASE: i64 = 1500;

//roughly the worst realistic footprint
const MAX_FOOTPRINT: f64 = 10500.0;
const SCORE_WEIGHT: f64 = 60.0;

//absent, null or unknown choices all fall back to the first table entry
#[derive(Debug, Clone, Deserialize)]
pub struct CarbonRequest {
    #[serde(default, deserialize_with = "coerce::choice")]
    transport: Option<String>,
    #[serde(default, deserialize_with = "coerce::choice")]
    energy: Option<String>,
    #[serde(default, deserialize_with = "coerce::choice")]
    diet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryFootprint {
    pub name: &'static str,
    pub value: i64,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarbonResponse {
    pub total_footprint: i64,
    pub score: i64,
    pub breakdown: Vec<CategoryFootprint>,
}

pub fn calculate(request: &CarbonRequest) -> CarbonResponse {
    let transport = lookup(&TRANSPORT_BASES, request.transport.as_deref());
    let energy = lookup(&ENERGY_BASES, request.energy.as_deref());
    let diet = lookup(&DIET_BASES, request.diet.as_deref());
    let other = OTHER_BASE;

    let total = transport + energy + diet + other;

    CarbonResponse {
        total_footprint: total,
        score: score(total),
        breakdown: vec![
            CategoryFootprint {
                name: "Transport",
                value: transport,
                color: "#3b82f6",
            },
            CategoryFootprint {
                name: "Energy",
                value: energy,
                color: "#f59e0b",
            },
            CategoryFootprint {
                name: "Diet",
                value: diet,
                color: "#10b981",
            },
            CategoryFootprint {
                name: "Other",
                value: other,
                color: "#64748b",
            },
        ],
    }
}

//0..=100, higher is better
fn score(total: i64) -> i64 {
    round_to_int(100.0 - total as f64 / MAX_FOOTPRINT * SCORE_WEIGHT).clamp(0, 100)
}

fn lookup(table: &[(&str, i64)], key: Option<&str>) -> i64 {
    table
        .iter()
        .find(|(name, _)| Some(*name) == key)
        .or(table.first())
        .map(|(_, value)| *value)
        .unwrap_or_default()
}
