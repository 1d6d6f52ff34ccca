use anyhow::{Context, anyhow};
use clap::{Args, Parser, Subcommand};
use inquire::Password;
use plantcare_weather_core::{
    CareAdvice, Config, ForecastResult, ProviderId, WeatherResolver, WeatherResult,
    greeting_for_hour, greeting_now,
};
use tracing::debug;

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "plantcare-weather", version, about = "Weather and plant-care CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Where to look up the weather. Missing values come from the config defaults.
#[derive(Debug, Args)]
pub struct LocationArgs {
    /// City name, e.g. "Cali".
    pub city: Option<String>,

    /// Country code, e.g. "CO". Pass an empty string to send the city alone.
    #[arg(long)]
    pub country: Option<String>,

    /// Print the raw JSON result instead of a summary.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name: "openweather" or "openmeteo".
        provider: String,

        /// Remove the stored key instead of setting one.
        #[arg(long)]
        remove: bool,
    },

    /// Show current weather for a city or a coordinate pair.
    Show {
        #[command(flatten)]
        location: LocationArgs,

        /// Latitude in degrees; use together with --lon instead of a city.
        #[arg(
            long,
            requires = "lon",
            conflicts_with_all = ["city", "country"],
            allow_negative_numbers = true
        )]
        lat: Option<f64>,

        /// Longitude in degrees.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,
    },

    /// Five-day forecast, one summary per day. Needs the OpenWeather key.
    Forecast {
        #[command(flatten)]
        location: LocationArgs,
    },

    /// Plant-care recommendations for today's weather.
    Care {
        #[command(flatten)]
        location: LocationArgs,

        /// Plant type, e.g. "orquídea" or "cactus".
        #[arg(long)]
        plant_type: Option<String>,
    },

    /// Print a greeting for the current (or given) hour.
    Greet {
        /// Hour of the day, 0-23.
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
        hour: Option<u32>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider, remove } => configure(&provider, remove),
            Command::Show { location, lat, lon } => show(location, lat.zip(lon)).await,
            Command::Forecast { location } => forecast(location).await,
            Command::Care { location, plant_type } => care(location, plant_type).await,
            Command::Greet { hour } => {
                let greeting = hour.map(greeting_for_hour).unwrap_or_else(greeting_now);
                println!("{greeting}");
                Ok(())
            }
        }
    }
}

fn load_config() -> anyhow::Result<Config> {
    let config = Config::load()?.with_env_overrides(|name| std::env::var(name).ok());
    debug!(
        openweather = config.is_provider_configured(ProviderId::OpenWeather),
        "configuration loaded"
    );
    Ok(config)
}

fn configure(provider: &str, remove: bool) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;

    if !id.requires_api_key() {
        println!("Provider '{id}' does not need an API key; nothing to configure.");
        return Ok(());
    }

    let mut config = Config::load()?;

    if remove {
        if config.remove_provider(id) {
            config.save()?;
            println!("Removed API key for '{id}'.");
        } else {
            println!("No API key stored for '{id}'.");
        }
        return Ok(());
    }

    let api_key = Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        return Err(anyhow!("API key must not be empty"));
    }

    config.upsert_provider_api_key(id, api_key.to_string());
    config.save()?;

    println!("Saved API key for '{id}' to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(location: LocationArgs, coords: Option<(f64, f64)>) -> anyhow::Result<()> {
    let config = load_config()?;
    let resolver = WeatherResolver::from_config(&config);
    let result = match coords {
        Some((lat, lon)) => resolver.resolve_coords(lat, lon).await,
        None => resolver.resolve(&config.query(location.city, location.country)).await,
    };

    if location.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match result {
        WeatherResult::Success(report) => {
            println!("{}", output::render_report(&report, greeting_now()));
            Ok(())
        }
        WeatherResult::Failure(failure) => Err(output::failure_error(&failure)),
    }
}

async fn forecast(location: LocationArgs) -> anyhow::Result<()> {
    let config = load_config()?;
    let query = config.query(location.city, location.country);
    let result = WeatherResolver::from_config(&config).forecast(&query).await;

    if location.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match result {
        ForecastResult::Success(forecast) => {
            println!("{}", output::render_forecast(&forecast));
            Ok(())
        }
        ForecastResult::Failure(failure) => Err(output::failure_error(&failure)),
    }
}

async fn care(location: LocationArgs, plant_type: Option<String>) -> anyhow::Result<()> {
    let config = load_config()?;
    let query = config.query(location.city, location.country);
    let result = WeatherResolver::from_config(&config).resolve(&query).await;

    let report = match result {
        WeatherResult::Success(report) => report,
        WeatherResult::Failure(failure) if location.json => {
            println!("{}", serde_json::to_string_pretty(&WeatherResult::Failure(failure))?);
            return Ok(());
        }
        WeatherResult::Failure(failure) => return Err(output::failure_error(&failure)),
    };

    let advice = CareAdvice::for_report(&report, plant_type.as_deref());

    if location.json {
        println!("{}", serde_json::to_string_pretty(&advice)?);
    } else {
        println!("{}", output::render_advice(&advice));
    }

    Ok(())
}
