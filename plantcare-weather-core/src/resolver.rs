use reqwest::Client;
use tracing::{info, instrument, warn};

use crate::{
    Config,
    error::WeatherError,
    forecast::{ForecastProvider, ForecastResult},
    model::{Coordinates, WeatherFailure, WeatherQuery, WeatherReport, WeatherResult},
    provider::{ProviderId, WeatherProvider, forecaster_from_config, providers_from_config},
};

/// What a single chain walk is looking up.
#[derive(Debug, Clone, Copy)]
enum Lookup<'a> {
    City(&'a WeatherQuery),
    At(Coordinates),
}

/// Walks an ordered provider chain until one answers.
///
/// Stateless between calls; safe to share across tasks.
#[derive(Debug)]
pub struct WeatherResolver {
    providers: Vec<Box<dyn WeatherProvider>>,
    forecaster: Option<Box<dyn ForecastProvider>>,
}

impl WeatherResolver {
    pub fn new(providers: Vec<Box<dyn WeatherProvider>>) -> Self {
        Self { providers, forecaster: None }
    }

    pub fn with_forecaster(mut self, forecaster: Box<dyn ForecastProvider>) -> Self {
        self.forecaster = Some(forecaster);
        self
    }

    pub fn from_config(config: &Config) -> Self {
        let http = Client::new();
        Self {
            providers: providers_from_config(config, &http),
            forecaster: forecaster_from_config(config, &http),
        }
    }

    pub fn providers(&self) -> &[Box<dyn WeatherProvider>] {
        &self.providers
    }

    /// Current weather for `query`. Never fails: errors come back as
    /// [`WeatherResult::Failure`].
    #[instrument(skip(self))]
    pub async fn resolve(&self, query: &WeatherQuery) -> WeatherResult {
        self.walk(Lookup::City(query)).await
    }

    pub async fn resolve_city(&self, city: &str, country_code: Option<&str>) -> WeatherResult {
        self.resolve(&WeatherQuery::new(city, country_code.map(str::to_string))).await
    }

    /// Current weather at a point. Out-of-range coordinates fail before any
    /// provider is called.
    #[instrument(skip(self))]
    pub async fn resolve_coords(&self, latitude: f64, longitude: f64) -> WeatherResult {
        match Coordinates::new(latitude, longitude) {
            Ok(coords) => self.walk(Lookup::At(coords)).await,
            Err(err) => WeatherResult::Failure(err.into()),
        }
    }

    /// Per-day forecast for `query`. Needs the OpenWeather key; there is no
    /// fallback.
    #[instrument(skip(self))]
    pub async fn forecast(&self, query: &WeatherQuery) -> ForecastResult {
        let Some(forecaster) = &self.forecaster else {
            let err = WeatherError::MissingApiKey { provider: ProviderId::OpenWeather };
            return ForecastResult::Failure(WeatherFailure::forecast(err));
        };

        match forecaster.forecast(query).await {
            Ok(forecast) => {
                info!(city = %forecast.city.name, days = forecast.forecast.len(), "forecast resolved");
                ForecastResult::Success(forecast)
            }
            Err(err) => {
                warn!(error = %err, "forecast failed");
                ForecastResult::Failure(WeatherFailure::forecast(err))
            }
        }
    }

    async fn walk(&self, lookup: Lookup<'_>) -> WeatherResult {
        let mut last_error = WeatherError::NoProviders;

        for provider in &self.providers {
            match attempt(provider.as_ref(), lookup).await {
                Ok(report) => {
                    info!(provider = %provider.id(), city = %report.city, "weather resolved");
                    return WeatherResult::Success(report);
                }
                Err(err) if err.is_recoverable() => {
                    warn!(provider = %provider.id(), error = %err, "provider failed, trying next");
                    last_error = err;
                }
                Err(err) => {
                    warn!(provider = %provider.id(), error = %err, "provider failed");
                    return WeatherResult::Failure(err.into());
                }
            }
        }

        WeatherResult::Failure(last_error.into())
    }
}

async fn attempt(
    provider: &dyn WeatherProvider,
    lookup: Lookup<'_>,
) -> Result<WeatherReport, WeatherError> {
    match lookup {
        Lookup::City(query) => provider.attempt(query).await,
        Lookup::At(coords) => provider.attempt_at(coords).await,
    }
}
