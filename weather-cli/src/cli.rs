use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tokio::runtime::Handle;
use weather_core::{Config, SearchMessage, SearchService, WeatherPipeline};

use crate::render::WidgetState;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for any city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the weather API key and the geocoding user agent.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City or place name.
        city: String,

        /// Print the snapshot as JSON instead of the widget.
        #[arg(long)]
        json: bool,
    },

    /// Prompt for cities repeatedly, redrawing the widget after each search.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, json } => {
                let pipeline = build_pipeline()?;
                show(&pipeline, &city, json).await
            }
            Command::Interactive => {
                let pipeline = Arc::new(build_pipeline()?);
                let runtime = Handle::current();
                tokio::task::spawn_blocking(move || interactive(pipeline, runtime))
                    .await
                    .context("Interactive session crashed")?
            }
        }
    }
}

fn build_pipeline() -> anyhow::Result<WeatherPipeline> {
    let config = Config::resolve()?;
    Ok(WeatherPipeline::from_config(&config)?)
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    let current_agent = config.user_agent.clone().unwrap_or_default();
    let user_agent = Text::new("Geocoding user agent:")
        .with_default(&current_agent)
        .with_help_message("Identifies this client to OpenStreetMap Nominatim")
        .prompt()?;

    config.api_key = Some(api_key.trim().to_string());
    config.user_agent = Some(user_agent.trim().to_string());

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    if !config.is_complete() {
        println!("Warning: both values are required before searching.");
    }
    Ok(())
}

async fn show(pipeline: &WeatherPipeline, city: &str, json: bool) -> anyhow::Result<()> {
    let result = pipeline
        .search(city)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let mut state = WidgetState::default();
    state.apply(city, Ok(result));
    print!("{}", state.render());
    Ok(())
}

/// Runs on a blocking thread; searches run on the async runtime and report back here.
fn interactive(pipeline: Arc<WeatherPipeline>, runtime: Handle) -> anyhow::Result<()> {
    let (service, results) = SearchService::new(pipeline, runtime);
    let mut state = WidgetState::default();
    print!("{}", state.render());

    loop {
        let city = match Text::new("City:").prompt() {
            Ok(city) if city.trim().is_empty() => break,
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        service.request_search(city.trim());
        println!("Searching...");

        let SearchMessage::Done { query, result } = results
            .recv()
            .context("Search service stopped unexpectedly")?;
        state.apply(&query, result);
        println!();
        print!("{}", state.render());
    }

    Ok(())
}
