use chrono::Weekday;
use serde_json::Value;

// Codes assigned by the label encoder at training time, which sorted the day names alphabetically.
// Must stay byte-for-byte identical to the trained model, never reorder chronologically.
const DAY_NAME_CODES: [(&str, u8); 7] = [
    ("Friday", 0),
    ("Monday", 1),
    ("Saturday", 2),
    ("Sunday", 3),
    ("Thursday", 4),
    ("Tuesday", 5),
    ("Wednesday", 6),
];

pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn day_of_week_code(day: Weekday) -> u8 {
    let name = day_name(day);

    DAY_NAME_CODES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
        .unwrap_or_default()
}

//exact, case-sensitive match. Anything else (including non-strings) is 0
pub fn on_off_code(value: Option<&Value>) -> u8 {
    flag_code(value, "On")
}

pub fn yes_no_code(value: Option<&Value>) -> u8 {
    flag_code(value, "Yes")
}

fn flag_code(value: Option<&Value>, positive: &str) -> u8 {
    match value {
        Some(Value::String(s)) if s == positive => 1,
        _ => 0,
    }
}
