use std::{fmt::Display, ops::Sub};

use derive_more::derive::AsRef;

use crate::core::math::format_float;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, AsRef)]
pub struct KilogramsCo2(pub f64);

impl Display for KilogramsCo2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} kg", format_float(self.0))
    }
}

impl Sub for KilogramsCo2 {
    type Output = KilogramsCo2;

    fn sub(self, rhs: Self) -> Self::Output {
        KilogramsCo2(self.0 - rhs.0)
    }
}
