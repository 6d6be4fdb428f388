use derive_more::derive::Display;

//USD to INR
pub const LOCAL_CURRENCY_RATE: f64 = 91.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TravelMode {
    #[display("car")]
    Car,
    #[display("ev")]
    Ev,
    #[display("bus")]
    Bus,
    #[display("metro")]
    Metro,
    #[display("shared")]
    Shared,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeFactors {
    pub co2_kg_per_km: f64,
    pub cost_usd_per_km: f64,
    pub speed_kmh: f64,
}

impl TravelMode {
    //unknown modes are priced like a car
    pub fn from_name(name: &str) -> Self {
        match name {
            "ev" => TravelMode::Ev,
            "bus" => TravelMode::Bus,
            "metro" => TravelMode::Metro,
            "shared" => TravelMode::Shared,
            _ => TravelMode::Car,
        }
    }

    pub fn factors(&self) -> ModeFactors {
        let (co2_kg_per_km, cost_usd_per_km, speed_kmh) = match self {
            //city traffic
            TravelMode::Car => (0.192, 0.50, 30.0),
            TravelMode::Ev => (0.053, 0.10, 30.0),
            TravelMode::Bus => (0.105, 0.15, 25.0),
            TravelMode::Metro => (0.030, 0.08, 45.0),
            TravelMode::Shared => (0.090, 0.25, 30.0),
        };

        ModeFactors {
            co2_kg_per_km,
            cost_usd_per_km,
            speed_kmh,
        }
    }
}
