pub mod math;
pub mod unit;
