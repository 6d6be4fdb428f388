use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File, Map};
use infrastructure::MonitoringConfig;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[allow(unused)]
pub struct Settings {
    pub monitoring: MonitoringConfig,
    pub model: ModelSettings,
    pub geocoding: GeocodingSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    //`env` replaces the process environment when given
    pub fn load(env: Option<Map<String, String>>) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .set_default("monitoring.logs.default_level", "off")?
            .set_default("monitoring.logs.filters", Vec::<String>::new())?
            .set_default("model.path", "model/energy_model.json")?
            .set_default("geocoding.url", "https://nominatim.openstreetmap.org")?
            .set_default("geocoding.user_agent", "ai_sus_hac_predictor")?
            .set_default("geocoding.timeout_secs", 10i64)?
            .add_source(File::with_name("config.toml").required(false))
            .add_source(
                Environment::with_prefix("ECOCALC")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("monitoring.logs.filters")
                    .try_parsing(true)
                    .source(env),
            );

        let s = builder.build()?;
        s.try_deserialize()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelSettings {
    pub path: PathBuf,
}

impl ModelSettings {
    //relative paths live next to the executable
    pub fn resolved_path(&self) -> PathBuf {
        if self.path.is_absolute() {
            return self.path.clone();
        }

        match std::env::current_exe() {
            Ok(exe) => match exe.parent() {
                Some(dir) => dir.join(&self.path),
                None => self.path.clone(),
            },
            Err(_) => self.path.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeocodingSettings {
    pub url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
}
