use std::{env, fs};
use log::{warn, LevelFilter};
use serde::Deserialize;
use thiserror::Error;

pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";
pub const BUCKET_NAME_VAR: &str = "AWS_BUCKET_NAME";

#[derive(Deserialize)]
#[serde(default)]
pub struct General {
    pub log_path: Option<String>,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
}

impl Default for General {
    fn default() -> Self {
        Self {
            log_path: None,
            log_level: LevelFilter::Info,
            log_to_stdout: true,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct WeatherParameters {
    pub endpoint: String,
    pub timeout_secs: u64,
    pub cities: Vec<String>,
}

impl Default for WeatherParameters {
    fn default() -> Self {
        let cities = ["Accra", "Yaounde", "Douala", "Kumasi", "Philadelphia", "Seattle", "New York"];

        Self {
            endpoint: "http://api.openweathermap.org/data/2.5/weather".to_string(),
            timeout_secs: 30,
            cities: cities.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
pub struct StorageParameters {
    pub region: String,
    pub endpoint: Option<String>,
    pub key_prefix: String,
}

impl Default for StorageParameters {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint: None,
            key_prefix: "weather-data".to_string(),
        }
    }
}

/// Values that are only ever taken from the environment
#[derive(Default)]
pub struct Secrets {
    pub api_key: String,
    pub bucket_name: String,
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: General,
    pub weather: WeatherParameters,
    pub storage: StorageParameters,
    #[serde(skip)]
    pub secrets: Secrets,
}

/// Loads the configuration file (if any) and returns a struct with all configuration items.
/// Secrets are always read from the environment, after a `.env` file has been loaded.
///
/// # Arguments
///
/// * 'config_path' - optional path to the configuration file
pub fn load_config(config_path: Option<&str>) -> Result<Config, LoadConfigurationError> {
    let mut config: Config = match config_path {
        Some(path) => {
            let toml = fs::read_to_string(path)
                .map_err(|e| LoadConfigurationError::FileError(format!("{}: {}", path, e)))?;
            toml::from_str(&toml)?
        }
        None => Config::default(),
    };

    let _ = dotenv::dotenv();
    config.secrets = load_secrets(|name| env::var(name).ok());

    Ok(config)
}

/// Reads the API key and bucket name through the given lookup.
/// Absent values become empty strings, the external services will reject them later on.
///
/// # Arguments
///
/// * 'lookup' - function returning the value of a named environment variable
pub fn load_secrets<F>(lookup: F) -> Secrets
where
    F: Fn(&str) -> Option<String>,
{
    let read = |name: &str| match lookup(name) {
        Some(value) => value,
        None => {
            warn!("environment variable {} is not set", name);
            String::new()
        }
    };

    Secrets {
        api_key: read(API_KEY_VAR),
        bucket_name: read(BUCKET_NAME_VAR),
    }
}

/// Error depicting errors that occur while loading configuration
///
#[derive(Debug, Error)]
pub enum LoadConfigurationError {
    #[error("FileError: {0}")]
    FileError(String),
    #[error("ParseError: {0}")]
    ParseError(#[from] toml::de::Error),
}
