use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::error::{
    CITY_NOT_FOUND, FORECAST_UNAVAILABLE_MESSAGE, UNAVAILABLE_MESSAGE, WeatherError,
};

pub const DEFAULT_CITY: &str = "Cali";
pub const DEFAULT_COUNTRY_CODE: &str = "CO";

/// Input to a weather lookup. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherQuery {
    pub city: String,
    pub country_code: Option<String>,
}

impl WeatherQuery {
    pub fn new(city: impl Into<String>, country_code: Option<String>) -> Self {
        Self {
            city: city.into(),
            country_code: country_code.filter(|cc| !cc.trim().is_empty()),
        }
    }

    /// `city` or `city,CC`, as understood by location-string based providers.
    pub fn location_query(&self) -> String {
        match &self.country_code {
            Some(cc) => format!("{},{}", self.city, cc),
            None => self.city.clone(),
        }
    }
}

impl Default for WeatherQuery {
    fn default() -> Self {
        Self::new(DEFAULT_CITY, Some(DEFAULT_COUNTRY_CODE.to_string()))
    }
}

/// A point on the globe, validated to lie within latitude ±90 and longitude ±180.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, WeatherError> {
        if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
            Ok(Self { latitude, longitude })
        } else {
            Err(WeatherError::InvalidCoordinates)
        }
    }

    /// `lat, lon` at four decimals; stands in for a place name.
    pub fn label(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// Broad sky condition, kept beside a report for plant-care advice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sky {
    Clear,
    Clouds,
    Rain,
    #[default]
    Other,
}

impl Sky {
    /// From an OpenWeather `weather[].main` group ("Rain", "Clear", "Clouds", ...).
    /// Drizzle, snow and thunderstorms are not rain here.
    pub fn from_condition_group(main: &str) -> Self {
        match main {
            "Clear" => Sky::Clear,
            "Clouds" => Sky::Clouds,
            "Rain" => Sky::Rain,
            _ => Sky::Other,
        }
    }
}

/// Normalized current conditions, identical whichever provider answered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    /// Degrees Celsius.
    pub temperature: i64,
    pub description: String,
    pub city: String,
    pub country: String,
    /// Relative humidity, percent.
    pub humidity: u8,
    pub icon: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(skip)]
    pub sky: Sky,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherFailure {
    pub error: String,
    /// User-facing, localized.
    pub message: String,
}

impl WeatherFailure {
    fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self { error: error.into(), message: message.into() }
    }

    fn city_not_found(city: &str) -> Self {
        Self::new(
            CITY_NOT_FOUND,
            format!("No se encontró la ciudad \"{city}\". Verifica el nombre e intenta de nuevo."),
        )
    }

    /// Failure of a multi-day forecast lookup; credential problems get their own wording.
    pub fn forecast(err: WeatherError) -> Self {
        match err {
            WeatherError::CityNotFound { city } => Self::city_not_found(&city),
            WeatherError::InvalidApiKey { .. } => {
                Self::new("API Key inválida", "La API key de OpenWeatherMap no es válida.")
            }
            missing @ WeatherError::MissingApiKey { .. } => Self::new(
                missing.to_string(),
                "Configura la API key de OpenWeatherMap para consultar el pronóstico.",
            ),
            other => Self::new(other.to_string(), FORECAST_UNAVAILABLE_MESSAGE),
        }
    }
}

impl From<WeatherError> for WeatherFailure {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::CityNotFound { city } => Self::city_not_found(&city),
            WeatherError::InvalidCoordinates => Self::new(
                "Coordenadas inválidas",
                "Se requieren coordenadas válidas (latitud y longitud).",
            ),
            other => Self::new(other.to_string(), UNAVAILABLE_MESSAGE),
        }
    }
}

/// Outcome of [`crate::WeatherResolver::resolve`]: always one complete shape.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherResult {
    Success(WeatherReport),
    Failure(WeatherFailure),
}

impl WeatherResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        match self {
            Self::Success(report) => Some(report),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&WeatherFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

#[derive(Serialize)]
struct Tagged<'a, T> {
    success: bool,
    #[serde(flatten)]
    body: &'a T,
}

/// Writes `{ "success": .., ...body }` with the body's fields inlined.
pub(crate) fn serialize_tagged<S, T>(
    success: bool,
    body: &T,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Serialize,
{
    Tagged { success, body }.serialize(serializer)
}

impl Serialize for WeatherResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(report) => serialize_tagged(true, report, serializer),
            Self::Failure(failure) => serialize_tagged(false, failure, serializer),
        }
    }
}

/// Coordinates resolved from a place name. Only the geocoding step uses it.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub country_code: Option<String>,
}

/// Rounds half-way values toward positive infinity (2.5 → 3, -2.5 → -2).
pub fn round_temperature(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

pub(crate) fn serialize_timestamp<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_report() -> WeatherReport {
        WeatherReport {
            temperature: 24,
            description: "nubes dispersas".into(),
            city: "Cali".into(),
            country: "CO".into(),
            humidity: 78,
            icon: "03d".into(),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 15, 4, 5).unwrap(),
            sky: Sky::Clouds,
        }
    }

    #[test]
    fn default_query_is_cali_colombia() {
        let q = WeatherQuery::default();
        assert_eq!(q.city, "Cali");
        assert_eq!(q.country_code.as_deref(), Some("CO"));
        assert_eq!(q.location_query(), "Cali,CO");
    }

    #[test]
    fn blank_country_code_is_dropped() {
        let q = WeatherQuery::new("Bogotá", Some("  ".into()));
        assert_eq!(q.country_code, None);
        assert_eq!(q.location_query(), "Bogotá");
    }

    #[test]
    fn success_serializes_flat_with_tag() {
        let value = serde_json::to_value(WeatherResult::Success(sample_report())).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "temperature": 24,
                "description": "nubes dispersas",
                "city": "Cali",
                "country": "CO",
                "humidity": 78,
                "icon": "03d",
                "timestamp": "2025-03-01T15:04:05.000Z",
            })
        );
    }

    #[test]
    fn failure_serializes_without_report_fields() {
        let failure = WeatherFailure::from(WeatherError::NoProviders);
        let value = serde_json::to_value(WeatherResult::Failure(failure)).unwrap();
        assert_eq!(
            value,
            json!({
                "success": false,
                "error": "No weather providers are configured",
                "message": "No se pudo obtener el clima en este momento.",
            })
        );
    }

    #[test]
    fn city_not_found_failure_names_the_city() {
        let failure = WeatherFailure::from(WeatherError::CityNotFound { city: "Macondo".into() });
        assert_eq!(failure.error, "Ciudad no encontrada");
        assert!(failure.message.contains("\"Macondo\""));
    }

    #[test]
    fn temperature_rounds_half_up() {
        assert_eq!(round_temperature(24.4), 24);
        assert_eq!(round_temperature(24.5), 25);
        assert_eq!(round_temperature(-2.5), -2);
        assert_eq!(round_temperature(-2.6), -3);
    }

    #[test]
    fn coordinates_are_range_checked() {
        assert!(Coordinates::new(3.43722, -76.5225).is_ok());
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(90.5, 0.0).is_err());
        assert!(Coordinates::new(0.0, -180.1).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
        assert_eq!(Coordinates::new(3.43722, -76.5225).unwrap().label(), "3.4372, -76.5225");
    }

    #[test]
    fn invalid_coordinates_failure_is_localized() {
        let failure = WeatherFailure::from(WeatherError::InvalidCoordinates);
        assert_eq!(failure.error, "Coordenadas inválidas");
    }

    #[test]
    fn forecast_failures_have_their_own_wording() {
        let failure = WeatherFailure::forecast(WeatherError::InvalidApiKey { service: "OpenWeather" });
        assert_eq!(failure.error, "API Key inválida");

        let failure = WeatherFailure::forecast(WeatherError::NoProviders);
        assert_eq!(failure.message, "No se pudo obtener el pronóstico del clima en este momento.");

        let failure = WeatherFailure::forecast(WeatherError::CityNotFound { city: "Macondo".into() });
        assert_eq!(failure.error, "Ciudad no encontrada");
    }

    #[test]
    fn sky_from_condition_group() {
        assert_eq!(Sky::from_condition_group("Rain"), Sky::Rain);
        assert_eq!(Sky::from_condition_group("Drizzle"), Sky::Other);
        assert_eq!(Sky::from_condition_group("Clouds"), Sky::Clouds);
        assert_eq!(Sky::from_condition_group("Clear"), Sky::Clear);
        assert_eq!(Sky::from_condition_group(""), Sky::Other);
    }

    #[test]
    fn sky_is_not_serialized() {
        let value = serde_json::to_value(sample_report()).unwrap();
        assert!(value.get("sky").is_none());
    }
}
