use std::env;
use log::info;
use thiserror::Error;
use crate::clock::SystemClock;
use crate::config::{load_config, Config, LoadConfigurationError};
use crate::logging::{setup_logger, LoggerError};
use crate::manager_storage::{S3Store, StorageError};
use crate::manager_weather::{Weather, WeatherError};

pub struct Mgr {
    pub weather: Weather,
    pub storage: S3Store,
    pub clock: SystemClock,
}

/// Initializes and returns configuration and a Mgr struct holding the initialized clients
///
pub fn init() -> Result<(Config, Mgr), InitializationError> {
    let args: Vec<String> = env::args().collect();
    let config_path = config_path_arg(&args);

    // Load configuration
    let config = load_config(config_path)?;

    // Setup logging
    let _ = setup_logger(config.general.log_path.as_deref(), config.general.log_level, config.general.log_to_stdout)?;

    // Print version
    info!("starting weather snapshot version: {}", env!("CARGO_PKG_VERSION"));

    // Instantiate structs
    let weather = Weather::new(&config.weather, &config.secrets.api_key)?;
    let storage = S3Store::new(&config.storage, &config.secrets.bucket_name)?;

    let mgr = Mgr {
        weather,
        storage,
        clock: SystemClock,
    };

    Ok((config, mgr))
}

/// Returns the value of a `--config=<path>` argument, if given
///
/// # Arguments
///
/// * 'args' - command line arguments
fn config_path_arg(args: &[String]) -> Option<&str> {
    args.iter()
        .find(|p| p.starts_with("--config="))
        .and_then(|p| p.split_once('='))
        .map(|(_, path)| path)
}

/// Error depicting errors that occur while initializing
///
#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("ConfigurationError: {0}")]
    ConfigurationError(#[from] LoadConfigurationError),
    #[error("SetupLoggerError: {0}")]
    SetupLoggerError(#[from] LoggerError),
    #[error("WeatherSetupError: {0}")]
    WeatherSetupError(#[from] WeatherError),
    #[error("StorageSetupError: {0}")]
    StorageSetupError(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_config_argument() {
        let args = vec!["weather_snapshot".to_string(), "--config=/etc/weather.toml".to_string()];
        assert_eq!(config_path_arg(&args), Some("/etc/weather.toml"));
    }

    #[test]
    fn config_argument_is_optional() {
        let args = vec!["weather_snapshot".to_string()];
        assert_eq!(config_path_arg(&args), None);
    }
}
