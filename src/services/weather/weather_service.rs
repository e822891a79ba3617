use std::time::Duration;

use chrono::NaiveDateTime;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::types::{
    open_meteo_response::OpenMeteoForecastResponse, weather_service_error::WeatherServiceError,
};
use crate::types::coordinate::Coordinate;

const WEATHER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    pub lat: f64,
    pub lon: f64,
    pub temperature_c: f64,
    pub wind_speed_kmh: f64,
    pub weather_code: u16,
    pub summary: String,
    pub observed_at: NaiveDateTime,
}

#[derive(Clone)]
pub struct WeatherService {
    host: String,
    client: reqwest::Client,
}

/// WMO weather interpretation codes, grouped.
pub fn describe_weather_code(code: u16) -> &'static str {
    match code {
        0 => "Clear sky",
        1..=3 => "Partly cloudy",
        45 | 48 => "Fog",
        51..=57 => "Drizzle",
        61..=67 | 80..=82 => "Rain",
        71..=77 | 85 | 86 => "Snow",
        95..=99 => "Thunderstorm",
        _ => "Unknown",
    }
}

impl WeatherService {
    pub fn new(host: String, client: reqwest::Client) -> Self {
        Self { host, client }
    }

    pub async fn current(&self, at: Coordinate) -> Result<CurrentWeather, WeatherServiceError> {
        let url = format!(
            "{}/v1/forecast?latitude={}&longitude={}&current_weather=true",
            self.host, at.lat, at.lon
        );

        let resp = self
            .client
            .get(&url)
            .timeout(WEATHER_TIMEOUT)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(WeatherServiceError::Status(resp.status()));
        }

        let current = resp.json::<OpenMeteoForecastResponse>().await?.current_weather;
        let observed_at = NaiveDateTime::parse_from_str(&current.time, "%Y-%m-%dT%H:%M")
            .map_err(|_| WeatherServiceError::Time(current.time.clone()))?;

        Ok(CurrentWeather {
            lat: at.lat,
            lon: at.lon,
            temperature_c: current.temperature,
            wind_speed_kmh: current.windspeed,
            weather_code: current.weathercode,
            summary: describe_weather_code(current.weathercode).to_string(),
            observed_at,
        })
    }

    /// Fetches every point concurrently; a failed point yields `None`.
    pub async fn current_many(&self, points: &[Coordinate]) -> Vec<Option<CurrentWeather>> {
        join_all(points.iter().map(|&p| async move {
            self.current(p)
                .await
                .map_err(|e| warn!("Weather lookup failed for {}: {}", p, e))
                .ok()
        }))
        .await
    }
}
