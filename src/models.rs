use std::fmt;
use serde::Serialize;

/// Format used for capture timestamps and snapshot object keys
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// One city's weather observation at fetch time
///
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    pub city: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub description: String,
    pub timestamp: String,
}

impl fmt::Display for WeatherRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Temperature: {:?}°F", self.temperature)?;
        writeln!(f, "Feels like: {:?}°F", self.feels_like)?;
        writeln!(f, "Humidity: {}%", self.humidity)?;
        write!(f, "Conditions: {}", self.description)
    }
}
