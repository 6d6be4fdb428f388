use std::{
    fmt::Display,
    ops::{Div, Mul},
};

use derive_more::derive::AsRef;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsRef)]
pub struct Kilometers(pub f64);

impl Display for Kilometers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1} km", self.0)
    }
}

impl Mul<f64> for Kilometers {
    type Output = Kilometers;

    fn mul(self, rhs: f64) -> Self::Output {
        Kilometers(self.0 * rhs)
    }
}

impl Div<f64> for Kilometers {
    type Output = f64;

    fn div(self, rhs: f64) -> Self::Output {
        self.0 / rhs
    }
}
