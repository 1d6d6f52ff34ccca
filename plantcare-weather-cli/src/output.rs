use chrono::Local;
use plantcare_weather_core::{CareAdvice, Forecast, Greeting, WeatherFailure, WeatherReport};

pub fn render_report(report: &WeatherReport, greeting: Greeting) -> String {
    let place = if report.country.is_empty() {
        report.city.clone()
    } else {
        format!("{}, {}", report.city, report.country)
    };
    let at = report.timestamp.with_timezone(&Local).format("%H:%M");

    format!(
        "{greeting}!\n\
         {place}: {}°C, {}\n\
         Humedad: {}%  (icono {}, {at})",
        report.temperature, report.description, report.humidity, report.icon,
    )
}

pub fn render_advice(advice: &CareAdvice) -> String {
    let mut out = format!(
        "{}: {}°C, humedad {}%, {}",
        advice.city, advice.temperature, advice.humidity, advice.condition
    );

    if advice.recommendations.is_empty() {
        out.push_str("\nSin recomendaciones especiales para hoy.");
    }
    for tip in &advice.recommendations {
        out.push_str("\n- ");
        out.push_str(tip);
    }
    out
}

pub fn render_forecast(forecast: &Forecast) -> String {
    let mut out = if forecast.city.country.is_empty() {
        forecast.city.name.clone()
    } else {
        format!("{}, {}", forecast.city.name, forecast.city.country)
    };

    for day in &forecast.forecast {
        out.push_str(&format!(
            "\n{}  {}..{}{} (media {})  humedad {}%  viento {} m/s  {}",
            day.date.format("%d/%m"),
            day.temperature.min,
            day.temperature.max,
            day.temperature.unit,
            day.temperature.average,
            day.humidity.average,
            day.wind.average,
            day.weather.description,
        ));
    }
    out
}

pub fn failure_error(failure: &WeatherFailure) -> anyhow::Error {
    anyhow::anyhow!("{} ({})", failure.message, failure.error)
}
