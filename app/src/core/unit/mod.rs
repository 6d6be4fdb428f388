mod co2;
mod distance;
mod kwh;

pub use co2::KilogramsCo2;
pub use distance::Kilometers;
pub use kwh::KiloWattHours;
