//! Multi-day forecasts: 3-hourly entries folded into one summary per local day.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt::Debug;

use crate::{
    error::WeatherError,
    model::{WeatherFailure, WeatherQuery, round_temperature, serialize_tagged, serialize_timestamp},
};

pub const CELSIUS: &str = "°C";

/// One forecast step as reported upstream, in the city's local time.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastEntry {
    pub local_time: NaiveDateTime,
    pub temperature: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CityCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastCity {
    pub name: String,
    pub country: String,
    pub coordinates: CityCoordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureSummary {
    pub min: i64,
    pub max: i64,
    pub average: i64,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HumiditySummary {
    pub average: u8,
    pub min: u8,
    pub max: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindSummary {
    /// Rounded mean, m/s.
    pub average: i64,
    pub max: f64,
}

/// Condition of the entry in the middle of the day's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MiddayCondition {
    pub main: String,
    pub description: String,
    pub icon: String,
    /// Local `HH:MM:SS`.
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temperature: TemperatureSummary,
    pub humidity: HumiditySummary,
    pub wind: WindSummary,
    pub weather: MiddayCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecast {
    pub city: ForecastCity,
    pub forecast: Vec<DailyForecast>,
    #[serde(serialize_with = "serialize_timestamp")]
    pub timestamp: DateTime<Utc>,
}

/// Outcome of [`crate::WeatherResolver::forecast`].
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastResult {
    Success(Forecast),
    Failure(WeatherFailure),
}

impl ForecastResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl Serialize for ForecastResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Success(forecast) => serialize_tagged(true, forecast, serializer),
            Self::Failure(failure) => serialize_tagged(false, failure, serializer),
        }
    }
}

#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn forecast(&self, query: &WeatherQuery) -> Result<Forecast, WeatherError>;
}

/// Group entries by local date, keeping first-seen day order.
pub fn daily_summaries(entries: &[ForecastEntry]) -> Vec<DailyForecast> {
    let mut days: Vec<(NaiveDate, Vec<&ForecastEntry>)> = Vec::new();

    for entry in entries {
        let date = entry.local_time.date();
        match days.iter_mut().find(|(d, _)| *d == date) {
            Some((_, group)) => group.push(entry),
            None => days.push((date, vec![entry])),
        }
    }

    days.into_iter().filter_map(|(date, group)| summarize(date, &group)).collect()
}

fn summarize(date: NaiveDate, group: &[&ForecastEntry]) -> Option<DailyForecast> {
    let midday = group.get(group.len() / 2)?;
    let count = group.len() as f64;

    let temps: Vec<i64> = group.iter().map(|e| round_temperature(e.temperature)).collect();
    let humidities: Vec<u8> = group.iter().map(|e| e.humidity).collect();

    let mean_temp = temps.iter().sum::<i64>() as f64 / count;
    let mean_humidity = humidities.iter().map(|h| f64::from(*h)).sum::<f64>() / count;
    let mean_wind = group.iter().map(|e| e.wind_speed).sum::<f64>() / count;

    Some(DailyForecast {
        date,
        temperature: TemperatureSummary {
            min: *temps.iter().min()?,
            max: *temps.iter().max()?,
            average: round_temperature(mean_temp),
            unit: CELSIUS,
        },
        humidity: HumiditySummary {
            average: round_temperature(mean_humidity).clamp(0, 100) as u8,
            min: *humidities.iter().min()?,
            max: *humidities.iter().max()?,
        },
        wind: WindSummary {
            average: round_temperature(mean_wind),
            max: group.iter().map(|e| e.wind_speed).fold(f64::MIN, f64::max),
        },
        weather: MiddayCondition {
            main: midday.main.clone(),
            description: midday.description.clone(),
            icon: midday.icon.clone(),
            time: midday.local_time.format("%H:%M:%S").to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: u32, hour: u32, temperature: f64, humidity: u8, wind: f64, main: &str) -> ForecastEntry {
        ForecastEntry {
            local_time: NaiveDate::from_ymd_opt(2025, 3, day)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            temperature,
            humidity,
            wind_speed: wind,
            main: main.into(),
            description: main.to_lowercase(),
            icon: format!("{hour:02}d"),
        }
    }

    #[test]
    fn groups_by_day_in_order() {
        let entries = [
            entry(1, 18, 25.0, 70, 2.0, "Clouds"),
            entry(1, 21, 22.0, 80, 1.0, "Rain"),
            entry(2, 0, 20.0, 90, 1.5, "Rain"),
        ];
        let days = daily_summaries(&entries);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    }

    #[test]
    fn aggregates_one_day() {
        let entries = [
            entry(1, 6, 18.4, 90, 1.0, "Clouds"),
            entry(1, 12, 26.6, 60, 3.5, "Clear"),
            entry(1, 18, 23.0, 75, 2.0, "Rain"),
        ];
        let day = &daily_summaries(&entries)[0];

        assert_eq!(day.temperature, TemperatureSummary { min: 18, max: 27, average: 23, unit: "°C" });
        assert_eq!(day.humidity, HumiditySummary { average: 75, min: 60, max: 90 });
        assert_eq!(day.wind.average, 2);
        assert!((day.wind.max - 3.5).abs() < f64::EPSILON);
        assert_eq!(day.weather.main, "Clear");
        assert_eq!(day.weather.time, "12:00:00");
    }

    #[test]
    fn midday_pick_uses_upper_middle_for_even_counts() {
        let entries = [
            entry(1, 0, 20.0, 50, 1.0, "Clear"),
            entry(1, 3, 20.0, 50, 1.0, "Clouds"),
            entry(1, 6, 20.0, 50, 1.0, "Rain"),
            entry(1, 9, 20.0, 50, 1.0, "Snow"),
        ];
        assert_eq!(daily_summaries(&entries)[0].weather.main, "Rain");
    }

    #[test]
    fn no_entries_no_days() {
        assert!(daily_summaries(&[]).is_empty());
    }

    #[test]
    fn failure_serializes_with_tag() {
        let failure = WeatherFailure::forecast(WeatherError::NoProviders);
        let value = serde_json::to_value(ForecastResult::Failure(failure)).unwrap();
        assert_eq!(value["success"], serde_json::json!(false));
        assert!(value.get("forecast").is_none());
    }
}
