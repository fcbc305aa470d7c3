use anyhow::Context;
use chrono::{Local, Timelike};
use clap::{Parser, Subcommand};
use std::{path::PathBuf, process::ExitCode};
use tracing::debug;

use weather_bot_core::{
    Config, ForecastSource, Formatter, FormattedMessage, MessageVariant, NwsForecastSource,
    TriggerEvent, forecast::parse_periods, http::shared_client,
};

use crate::configure;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-bot", version, about = "Scheduled weather forecast notifier")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, format and deliver one forecast message, then print the result envelope.
    Run {
        /// Message variant: morning, noon or evening. Defaults to morning.
        #[arg(long, conflicts_with_all = ["auto", "event"])]
        variant: Option<String>,

        /// Pick the variant from the local time of day.
        #[arg(long, conflicts_with = "event")]
        auto: bool,

        /// Raw trigger event, e.g. '{"message_type":"noon"}'.
        #[arg(long)]
        event: Option<String>,
    },

    /// Print the formatted message without delivering it.
    Preview {
        /// Message variant: morning, noon or evening. Defaults to morning.
        #[arg(long, conflicts_with = "auto")]
        variant: Option<String>,

        /// Pick the variant from the local time of day.
        #[arg(long)]
        auto: bool,

        /// Read a saved forecast document instead of calling the forecast API.
        #[arg(long)]
        fixture: Option<PathBuf>,
    },

    /// Interactively set location, user agent and destination.
    Configure,

    /// Print where the config file lives.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Run {
                variant,
                auto,
                event,
            } => {
                let config = Config::load()?;
                let event = trigger_event(variant, auto, event)?;
                debug!(?event, "trigger event");

                let result = weather_bot_core::handle(&config, &event).await;
                println!("{}", serde_json::to_string(&result)?);

                if !result.is_success() {
                    return Ok(ExitCode::FAILURE);
                }
            }
            Command::Preview {
                variant,
                auto,
                fixture,
            } => {
                let config = Config::load()?;
                let event = trigger_event(variant, auto, None)?;
                let variant = config.delivery.variant_for(event.variant()?);

                let periods = match fixture {
                    Some(path) => {
                        let body = std::fs::read_to_string(&path).with_context(|| {
                            format!("Failed to read forecast fixture: {}", path.display())
                        })?;
                        parse_periods(&body)?
                    }
                    None => {
                        let http =
                            shared_client(config.http_timeout(), &config.forecast.user_agent)?;
                        NwsForecastSource::new(http.clone(), config.forecast.base_url.clone())
                            .fetch_forecast(config.location.latitude, config.location.longitude)
                            .await?
                    }
                };

                match Formatter::new(config.location.name.clone()).format(&periods, variant)? {
                    FormattedMessage::Text(text) => println!("{text}"),
                    FormattedMessage::Period(payload) => {
                        println!("{}", serde_json::to_string_pretty(&payload)?)
                    }
                }
            }
            Command::Configure => configure::run()?,
            Command::ConfigPath => println!("{}", Config::config_file_path()?.display()),
        }

        Ok(ExitCode::SUCCESS)
    }
}

/// Build the trigger event from flags. An explicit event wins, then `--auto`, then `--variant`.
fn trigger_event(
    variant: Option<String>,
    auto: bool,
    event: Option<String>,
) -> anyhow::Result<TriggerEvent> {
    if let Some(raw) = event {
        return serde_json::from_str(&raw).context("Failed to parse trigger event JSON");
    }

    if auto {
        let hour = Local::now().hour();
        return Ok(TriggerEvent::with_variant(MessageVariant::for_hour(hour)));
    }

    Ok(TriggerEvent {
        message_type: variant,
    })
}
