use reqwest::StatusCode;
use thiserror::Error;

use crate::provider::ProviderId;

/// Failure message shown to users for anything other than an unknown city.
pub const UNAVAILABLE_MESSAGE: &str = "No se pudo obtener el clima en este momento.";

/// Failure message shown to users when a multi-day forecast is unavailable.
pub const FORECAST_UNAVAILABLE_MESSAGE: &str =
    "No se pudo obtener el pronóstico del clima en este momento.";

/// Short error label used when the geocoder has no match for a city.
pub const CITY_NOT_FOUND: &str = "Ciudad no encontrada";

/// Everything that can go wrong while asking a provider for the weather.
///
/// None of these escape [`crate::WeatherResolver::resolve`]; they are folded
/// into a [`crate::WeatherFailure`] there.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Ciudad no encontrada: {city}")]
    CityNotFound { city: String },

    #[error("Failed to send request to {service}: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{service} request failed with status {status}: {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to parse {service} JSON: {source}")]
    Payload {
        service: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{service} rejected the API key")]
    InvalidApiKey { service: &'static str },

    #[error("No API key configured for provider '{provider}'")]
    MissingApiKey { provider: ProviderId },

    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    #[error("No weather providers are configured")]
    NoProviders,
}

impl WeatherError {
    /// Whether the next provider in the chain may still be tried.
    ///
    /// Only transport failures and non-2xx answers qualify. Once a provider
    /// has answered with an HTTP success its result is final.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Status { .. })
    }
}
