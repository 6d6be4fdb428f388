use serde::{Deserialize, Serialize};

const PEAK_START_HOUR: f64 = 9.0;
const PEAK_END_HOUR: f64 = 18.0;
const PEAK_CONSUMPTION_LIMIT: f64 = 500.0;
const OFF_PEAK_CONSUMPTION_LIMIT: f64 = 300.0;

//compared as sent, no string coercion
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestionsRequest {
    #[serde(default = "default_consumption")]
    consumption: f64,
    #[serde(default = "default_hour")]
    hour: f64,
}

fn default_consumption() -> f64 {
    600.0
}

fn default_hour() -> f64 {
    14.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    Warning,
    Success,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub message: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<Suggestion>,
}

pub fn suggest(request: &SuggestionsRequest) -> SuggestionsResponse {
    let mut suggestions = vec![];

    if (PEAK_START_HOUR..=PEAK_END_HOUR).contains(&request.hour) && request.consumption > PEAK_CONSUMPTION_LIMIT {
        suggestions.push(Suggestion {
            kind: SuggestionKind::Warning,
            message: "High peak usage detected. Consider reducing HVAC load.",
        });
    }

    if request.hour > PEAK_END_HOUR && request.consumption > OFF_PEAK_CONSUMPTION_LIMIT {
        suggestions.push(Suggestion {
            kind: SuggestionKind::Success,
            message: "Good time to run high-energy appliances (off-peak).",
        });
    }

    SuggestionsResponse { suggestions }
}
