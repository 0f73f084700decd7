mod models;

use std::time::Duration;
use log::{debug, error};
use reqwest::blocking::Client;
use thiserror::Error;
use crate::clock::Clock;
use crate::config::WeatherParameters;
use crate::manager_weather::models::CurrentWeather;
use crate::models::WeatherRecord;

/// Unit system requested from the weather API, temperatures come back in °F
const UNITS: &str = "imperial";

/// Anything that can produce a weather record for a city
pub trait WeatherSource {
    fn fetch_weather(&self, city: &str, clock: &dyn Clock) -> Result<WeatherRecord, WeatherError>;
}

/// Struct for fetching current weather from OpenWeatherMap
pub struct Weather {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl Weather {
    /// Returns a weather struct ready for fetching current weather
    ///
    /// # Arguments
    ///
    /// * 'config' - weather configuration parameters
    /// * 'api_key' - OpenWeatherMap API key
    pub fn new(config: &WeatherParameters, api_key: &str) -> Result<Weather, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        Ok(Weather {
            client,
            endpoint: config.endpoint.clone(),
            api_key: api_key.to_string(),
        })
    }

    /// Sends the request and returns the response body
    ///
    /// # Arguments
    ///
    /// * 'city' - name of the city to query
    fn request(&self, city: &str) -> Result<String, WeatherError> {
        let response = self.client
            .get(&self.endpoint)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", UNITS)])
            .send()
            .map_err(|e| WeatherError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WeatherError::Status(status.as_u16(), city.to_string()));
        }

        response.text().map_err(|e| WeatherError::Network(e.to_string()))
    }
}

impl WeatherSource for Weather {
    /// Retrieves current weather for the given city.
    /// Failures are logged here, the caller only has to decide whether to skip the city.
    ///
    /// # Arguments
    ///
    /// * 'city' - name of the city to fetch weather for
    /// * 'clock' - clock used for the capture timestamp
    fn fetch_weather(&self, city: &str, clock: &dyn Clock) -> Result<WeatherRecord, WeatherError> {
        let result = self.request(city)
            .and_then(|json| parse_current_weather(city, &json, clock));

        match &result {
            Ok(record) => debug!("fetched weather for {}: {:?}", city, record),
            Err(e) => error!("error fetching weather data for {}: {}", city, e),
        }

        result
    }
}

/// Extracts a weather record from a current weather document.
/// The timestamp is taken after the document has been parsed.
///
/// # Arguments
///
/// * 'city' - the city the document belongs to
/// * 'json' - response body
/// * 'clock' - clock used for the capture timestamp
pub fn parse_current_weather(city: &str, json: &str, clock: &dyn Clock) -> Result<WeatherRecord, WeatherError> {
    let current: CurrentWeather = serde_json::from_str(json)
        .map_err(|e| WeatherError::Malformed(e.to_string()))?;

    let description = current.weather
        .into_iter()
        .next()
        .ok_or(WeatherError::Malformed("empty weather condition list".to_string()))?
        .description;

    Ok(WeatherRecord {
        city: city.to_string(),
        temperature: current.main.temp,
        feels_like: current.main.feels_like,
        humidity: current.main.humidity,
        description,
        timestamp: clock.timestamp(),
    })
}

/// Error depicting errors that occur while fetching weather for a city
///
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("NetworkError: {0}")]
    Network(String),
    #[error("StatusError: http status {0} for {1}")]
    Status(u16, String),
    #[error("MalformedResponseError: {0}")]
    Malformed(String),
}
