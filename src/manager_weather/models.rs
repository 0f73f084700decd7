use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u8,
}

#[derive(Deserialize, Debug)]
pub struct Condition {
    pub description: String,
}

/// The parts of an OpenWeatherMap current weather document that we use
#[derive(Deserialize, Debug)]
pub struct CurrentWeather {
    pub main: MainReadings,
    pub weather: Vec<Condition>,
}
