use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::instrument;

use crate::{
    error::WeatherError,
    forecast::{
        CityCoordinates, Forecast, ForecastCity, ForecastEntry, ForecastProvider, daily_summaries,
    },
    model::{Coordinates, Sky, WeatherQuery, WeatherReport, round_temperature},
    provider::{ProviderId, endpoint, get_json},
};

use super::WeatherProvider;

const SERVICE: &str = "OpenWeather";

/// Primary provider. Needs an API key; takes a `city[,CC]` location string
/// or coordinates. Also serves the 5-day forecast.
#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    language: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: String, language: String, http: Client) -> Self {
        Self { api_key, base_url, language, http }
    }

    async fn fetch_current(&self, location: &[(&str, &str)]) -> Result<WeatherReport, WeatherError> {
        let url = endpoint(&self.base_url, "weather");

        let mut query = location.to_vec();
        query.extend([
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
            ("lang", self.language.as_str()),
        ]);

        let parsed: OwCurrentResponse = get_json(&self.http, &url, &query, SERVICE).await?;
        Ok(parsed.into())
    }

    async fn fetch_forecast(&self, query: &WeatherQuery) -> Result<Forecast, WeatherError> {
        let url = endpoint(&self.base_url, "forecast");
        let location = query.location_query();

        let parsed: OwForecastResponse = get_json(
            &self.http,
            &url,
            &[
                ("q", location.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", self.language.as_str()),
            ],
            SERVICE,
        )
        .await
        .map_err(|err| match err {
            WeatherError::Status { status: StatusCode::NOT_FOUND, .. } => {
                WeatherError::CityNotFound { city: query.city.clone() }
            }
            WeatherError::Status { status: StatusCode::UNAUTHORIZED, .. } => {
                WeatherError::InvalidApiKey { service: SERVICE }
            }
            other => other,
        })?;

        Ok(parsed.into())
    }
}

impl std::fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

// Every field defaults: a 2xx answer is accepted as-is, however incomplete.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwSys {
    country: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    sys: OwSys,
}

impl From<OwCurrentResponse> for WeatherReport {
    fn from(parsed: OwCurrentResponse) -> Self {
        let weather = parsed.weather.into_iter().next().unwrap_or_default();

        WeatherReport {
            temperature: round_temperature(parsed.main.temp),
            description: weather.description,
            city: parsed.name,
            country: parsed.sys.country,
            humidity: parsed.main.humidity,
            icon: weather.icon,
            timestamp: Utc::now(),
            sky: Sky::from_condition_group(&weather.main),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
    coord: OwCoord,
    /// Seconds east of UTC.
    #[serde(default)]
    timezone: i64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastEntry>,
}

impl From<OwForecastResponse> for Forecast {
    fn from(parsed: OwForecastResponse) -> Self {
        let offset = parsed.city.timezone;

        let entries: Vec<ForecastEntry> = parsed
            .list
            .into_iter()
            .filter_map(|e| {
                let local_time = local_time(e.dt, offset)?;
                let weather = e.weather.into_iter().next().unwrap_or_default();
                Some(ForecastEntry {
                    local_time,
                    temperature: e.main.temp,
                    humidity: e.main.humidity,
                    wind_speed: e.wind.speed,
                    main: weather.main,
                    description: weather.description,
                    icon: weather.icon,
                })
            })
            .collect();

        Forecast {
            city: ForecastCity {
                name: parsed.city.name,
                country: parsed.city.country,
                coordinates: CityCoordinates {
                    latitude: parsed.city.coord.lat,
                    longitude: parsed.city.coord.lon,
                },
            },
            forecast: daily_summaries(&entries),
            timestamp: Utc::now(),
        }
    }
}

fn local_time(ts: i64, offset_secs: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(ts.checked_add(offset_secs)?, 0).map(|dt| dt.naive_utc())
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    fn id(&self) -> ProviderId {
        ProviderId::OpenWeather
    }

    #[instrument(skip(self), fields(provider = SERVICE))]
    async fn attempt(&self, query: &WeatherQuery) -> Result<WeatherReport, WeatherError> {
        let location = query.location_query();
        self.fetch_current(&[("q", location.as_str())]).await
    }

    #[instrument(skip(self), fields(provider = SERVICE))]
    async fn attempt_at(&self, coords: Coordinates) -> Result<WeatherReport, WeatherError> {
        let lat = coords.latitude.to_string();
        let lon = coords.longitude.to_string();
        self.fetch_current(&[("lat", lat.as_str()), ("lon", lon.as_str())]).await
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherProvider {
    #[instrument(skip(self), fields(provider = SERVICE))]
    async fn forecast(&self, query: &WeatherQuery) -> Result<Forecast, WeatherError> {
        self.fetch_forecast(query).await
    }
}
