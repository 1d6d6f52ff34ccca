use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::{
    codes,
    error::WeatherError,
    geocode::Geocoder,
    model::{Coordinates, GeocodeLocation, WeatherQuery, WeatherReport, round_temperature},
    provider::{ProviderId, endpoint, get_json},
};

use super::WeatherProvider;

const SERVICE: &str = "Open-Meteo forecast";

/// Keyless fallback provider: geocode the city, then fetch current conditions
/// for the coordinates.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    geocoder: Geocoder,
    forecast_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new(geocoding_url: String, forecast_url: String, language: String, http: Client) -> Self {
        Self {
            geocoder: Geocoder::new(geocoding_url, language, http.clone()),
            forecast_url,
            http,
        }
    }

    async fn fetch_current(&self, latitude: f64, longitude: f64) -> Result<OmCurrent, WeatherError> {
        let url = endpoint(&self.forecast_url, "forecast");
        let latitude = latitude.to_string();
        let longitude = longitude.to_string();

        let parsed: OmForecastResponse = get_json(
            &self.http,
            &url,
            &[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("current", "temperature_2m,relative_humidity_2m,weather_code"),
                ("timezone", "auto"),
                ("forecast_days", "1"),
            ],
            SERVICE,
        )
        .await?;

        Ok(parsed.current)
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    temperature_2m: f64,
    relative_humidity_2m: u8,
    weather_code: i64,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current: OmCurrent,
}

fn to_report(current: OmCurrent, location: GeocodeLocation, query: &WeatherQuery) -> WeatherReport {
    let country = location
        .country_code
        .map(|cc| cc.to_uppercase())
        .or_else(|| query.country_code.clone())
        .unwrap_or_default();

    WeatherReport {
        temperature: round_temperature(current.temperature_2m),
        description: codes::describe(current.weather_code).to_string(),
        city: location.name,
        country,
        humidity: current.relative_humidity_2m,
        icon: codes::icon_for(current.weather_code).to_string(),
        timestamp: Utc::now(),
        sky: codes::sky_for(current.weather_code),
    }
}

// No geocoder round trip, so there is no place name to report.
fn to_coords_report(current: OmCurrent, coords: Coordinates) -> WeatherReport {
    let location = GeocodeLocation {
        latitude: coords.latitude,
        longitude: coords.longitude,
        name: coords.label(),
        country_code: None,
    };
    to_report(current, location, &WeatherQuery::new(coords.label(), None))
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenMeteo
    }

    #[instrument(skip(self), fields(provider = SERVICE))]
    async fn attempt(&self, query: &WeatherQuery) -> Result<WeatherReport, WeatherError> {
        let location = self
            .geocoder
            .locate(&query.city)
            .await?
            .ok_or_else(|| WeatherError::CityNotFound { city: query.city.clone() })?;

        let current = self.fetch_current(location.latitude, location.longitude).await?;

        Ok(to_report(current, location, query))
    }

    #[instrument(skip(self), fields(provider = SERVICE))]
    async fn attempt_at(&self, coords: Coordinates) -> Result<WeatherReport, WeatherError> {
        let current = self.fetch_current(coords.latitude, coords.longitude).await?;
        Ok(to_coords_report(current, coords))
    }
}
