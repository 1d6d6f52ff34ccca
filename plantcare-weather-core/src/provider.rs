use crate::{
    Config, WeatherQuery, WeatherReport,
    error::WeatherError,
    forecast::ForecastProvider,
    model::Coordinates,
    provider::{openmeteo::OpenMeteoProvider, openweather::OpenWeatherProvider},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::{convert::TryFrom, fmt::Debug};
use tracing::debug;

pub mod openmeteo;
pub mod openweather;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    OpenMeteo,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::OpenMeteo => "openmeteo",
        }
    }

    /// All providers, in fallback order.
    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::OpenMeteo]
    }

    pub fn requires_api_key(&self) -> bool {
        matches!(self, ProviderId::OpenWeather)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "openmeteo" => Ok(ProviderId::OpenMeteo),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, openmeteo."
            )),
        }
    }
}

/// One strategy in the fallback chain.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    fn id(&self) -> ProviderId;

    async fn attempt(&self, query: &WeatherQuery) -> Result<WeatherReport, WeatherError>;

    /// Current conditions at already-validated coordinates.
    async fn attempt_at(&self, coords: Coordinates) -> Result<WeatherReport, WeatherError>;
}

/// Build the fallback chain from config, skipping providers that lack credentials.
pub fn providers_from_config(config: &Config, http: &Client) -> Vec<Box<dyn WeatherProvider>> {
    let mut chain: Vec<Box<dyn WeatherProvider>> = Vec::new();

    for id in ProviderId::all() {
        match id {
            ProviderId::OpenWeather => {
                if let Some(api_key) = config.provider_api_key(*id) {
                    chain.push(Box::new(OpenWeatherProvider::new(
                        api_key.to_owned(),
                        config.endpoints.openweather.clone(),
                        config.language.clone(),
                        http.clone(),
                    )));
                } else {
                    debug!(provider = %id, "no API key configured, skipping");
                }
            }
            ProviderId::OpenMeteo => chain.push(Box::new(OpenMeteoProvider::new(
                config.endpoints.geocoding.clone(),
                config.endpoints.forecast.clone(),
                config.language.clone(),
                http.clone(),
            ))),
        }
    }

    chain
}

/// Multi-day forecasts come from OpenWeather only, so they need its API key.
pub fn forecaster_from_config(config: &Config, http: &Client) -> Option<Box<dyn ForecastProvider>> {
    let api_key = config.provider_api_key(ProviderId::OpenWeather)?;

    Some(Box::new(OpenWeatherProvider::new(
        api_key.to_owned(),
        config.endpoints.openweather.clone(),
        config.language.clone(),
        http.clone(),
    )))
}

/// GET `url` with `query`, require a 2xx status and decode the JSON body.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &Client,
    url: &str,
    query: &[(&str, &str)],
    service: &'static str,
) -> Result<T, WeatherError> {
    debug!(service, url, "sending request");

    let res = http
        .get(url)
        .query(query)
        .send()
        .await
        .map_err(|source| WeatherError::Transport { service, source })?;

    let status = res.status();
    let body = res.text().await.map_err(|source| WeatherError::Transport { service, source })?;

    if !status.is_success() {
        return Err(WeatherError::Status { service, status, body: truncate_body(&body) });
    }

    serde_json::from_str(&body).map_err(|source| WeatherError::Payload { service, source })
}

pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path)
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
