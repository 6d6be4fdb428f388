mod simulate;
mod suggestions;

pub use simulate::{EnergySimulateRequest, simulate};
pub use suggestions::{SuggestionsRequest, suggest};
