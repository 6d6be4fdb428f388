use std::fmt::Display;

use derive_more::derive::AsRef;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsRef, Serialize)]
#[serde(transparent)]
pub struct KiloWattHours(pub f64);

impl KiloWattHours {
    pub const UNIT: &'static str = "kWh";
}

impl Display for KiloWattHours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, Self::UNIT)
    }
}
