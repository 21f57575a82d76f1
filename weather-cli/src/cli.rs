use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::net::TcpListener;
use weather_core::{
    Config, OpenWeatherProvider, Units, WeatherProvider, WeatherSnapshot, compare,
    compare::format_duration, fetch_pair, provider::require_city,
};

use crate::{render::TIME_FORMAT, web};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather lookups and city comparisons")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, e.g. "San Francisco".
        city: String,

        /// "imperial", "metric"; anything else means Kelvin.
        #[arg(long, default_value = "imperial")]
        units: String,
    },

    /// Compare the current weather of two cities.
    Compare {
        city1: String,
        city2: String,

        #[arg(long, default_value = "imperial")]
        units: String,
    },

    /// Run the web front end.
    Serve {
        /// Address to listen on; overrides the configured one.
        #[arg(long)]
        bind: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, units } => {
                let provider = provider_from_config()?;
                let city = require_city(Some(city.as_str()), "city")?;
                let snapshot = provider
                    .current_weather(city, Units::from_token(Some(units.as_str())))
                    .await?;
                print_snapshot(&snapshot);
                Ok(())
            }
            Command::Compare { city1, city2, units } => {
                let provider = provider_from_config()?;
                let city1 = require_city(Some(city1.as_str()), "city1")?;
                let city2 = require_city(Some(city2.as_str()), "city2")?;
                let units = Units::from_token(Some(units.as_str()));

                let (first, second) = fetch_pair(&provider, city1, city2, units).await?;
                let cmp = compare(&first, &second)?;
                let (a, b, letter) = (&first.city, &second.city, first.units_letter());

                println!("{a} vs. {b}");
                println!("  {a} is {}°{letter} {} than {b}.", cmp.temp_difference, cmp.temp_direction);
                println!(
                    "  {a} has {}% {} humidity than {b}.",
                    cmp.humidity_difference, cmp.humidity_direction
                );
                println!(
                    "  {a} has {} {} wind speed than {b}.",
                    cmp.wind_difference, cmp.wind_direction
                );
                println!(
                    "  The sun sets {} {} in {a} than in {b}.",
                    format_duration(cmp.sunset_difference),
                    cmp.sunset_direction
                );
                Ok(())
            }
            Command::Serve { bind } => {
                let config = Config::load()?;
                let provider: Arc<dyn WeatherProvider> =
                    Arc::new(OpenWeatherProvider::from_config(&config)?);
                let addr = bind.unwrap_or_else(|| config.bind().to_string());

                let listener = TcpListener::bind(&addr)
                    .await
                    .with_context(|| format!("Failed to bind {addr}"))?;
                tracing::info!(%addr, "HTTP server listening");

                axum::serve(listener, web::build_app(provider))
                    .await
                    .context("HTTP server error")?;
                Ok(())
            }
        }
    }
}

fn provider_from_config() -> anyhow::Result<OpenWeatherProvider> {
    let config = Config::load()?;
    OpenWeatherProvider::from_config(&config)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.set_api_key(api_key.trim().to_string());
    config.require_api_key()?;

    config.save()?;
    println!("Saved to {}", Config::config_file_path()?.display());
    Ok(())
}

fn print_snapshot(s: &WeatherSnapshot) {
    let letter = s.units_letter();
    println!("{}: {}", s.city, s.description);
    println!("  Temperature: {}°{letter}", s.temperature);
    println!("  Humidity:    {}%", s.humidity);
    println!("  Wind speed:  {}", s.wind_speed);
    println!("  Sunrise:     {}", s.sunrise.format(TIME_FORMAT));
    println!("  Sunset:      {}", s.sunset.format(TIME_FORMAT));
}
