use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
pub struct OpenMeteoCurrentWeather {
    pub temperature: f64,
    pub windspeed: f64,
    pub weathercode: u16,
    /// Local time at the location, `YYYY-MM-DDTHH:MM`.
    pub time: String,
}

#[derive(Deserialize, Serialize)]
pub struct OpenMeteoForecastResponse {
    pub current_weather: OpenMeteoCurrentWeather,
}
