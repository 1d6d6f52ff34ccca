//! Place-name → coordinates lookup via the Open-Meteo geocoding API.

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::{
    error::WeatherError,
    model::GeocodeLocation,
    provider::{endpoint, get_json},
};

const SERVICE: &str = "Open-Meteo geocoding";

#[derive(Debug, Deserialize)]
struct GeoResult {
    latitude: f64,
    longitude: f64,
    name: String,
    country_code: Option<String>,
}

// `results` is omitted entirely when nothing matches.
#[derive(Debug, Deserialize)]
struct GeoResponse {
    #[serde(default)]
    results: Vec<GeoResult>,
}

#[derive(Debug, Clone)]
pub struct Geocoder {
    base_url: String,
    language: String,
    http: Client,
}

impl Geocoder {
    pub fn new(base_url: String, language: String, http: Client) -> Self {
        Self { base_url, language, http }
    }

    /// Best match for `city`, or `None` when the geocoder knows no such place.
    pub async fn locate(&self, city: &str) -> Result<Option<GeocodeLocation>, WeatherError> {
        let url = endpoint(&self.base_url, "search");

        let parsed: GeoResponse = get_json(
            &self.http,
            &url,
            &[
                ("name", city),
                ("count", "1"),
                ("language", self.language.as_str()),
                ("format", "json"),
            ],
            SERVICE,
        )
        .await?;

        let location = parsed.results.into_iter().next().map(|r| GeocodeLocation {
            latitude: r.latitude,
            longitude: r.longitude,
            name: r.name,
            country_code: r.country_code.filter(|cc| !cc.is_empty()),
        });

        debug!(city, found = location.is_some(), "geocoded");
        Ok(location)
    }
}
