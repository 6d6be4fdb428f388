//Ties go to the even neighbour, so 0.5 -> 0 and 2.5 -> 2
pub fn round(value: f64) -> f64 {
    value.round_ties_even()
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    round(value * factor) / factor
}

pub fn round_to_int(value: f64) -> i64 {
    round(value) as i64
}

// Shortest representation that parses back to the same value, with at least one fractional digit
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
