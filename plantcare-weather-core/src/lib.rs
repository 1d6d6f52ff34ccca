//! Core library for the plant-care weather lookup.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - A fallback chain over weather providers (OpenWeather, then Open-Meteo)
//! - Shared domain models (queries, normalized results)
//! - Multi-day forecasts summarized per local day (OpenWeather only)
//! - Small helpers built on top: greetings and plant-care advice
//!
//! It is used by `plantcare-weather-cli`, but can also be reused by other binaries or services.

pub mod care;
pub mod codes;
pub mod config;
pub mod error;
pub mod forecast;
pub mod geocode;
pub mod greeting;
pub mod model;
pub mod provider;
pub mod resolver;

pub use care::CareAdvice;
pub use config::{Config, Endpoints, ProviderConfig, QueryDefaults};
pub use error::WeatherError;
pub use forecast::{DailyForecast, Forecast, ForecastProvider, ForecastResult};
pub use greeting::{Greeting, greeting_for_hour, greeting_now};
pub use model::{
    Coordinates, GeocodeLocation, Sky, WeatherFailure, WeatherQuery, WeatherReport, WeatherResult,
};
pub use provider::{ProviderId, WeatherProvider};
pub use resolver::WeatherResolver;
