use anyhow::Context;
use inquire::{Confirm, CustomType, Password, Select, Text};

use weather_bot_core::{Config, DestinationKind};

/// Prompt for settings and save them to the config file.
pub fn run() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    config.location.name = Text::new("Location name:")
        .with_default(&config.location.name)
        .prompt()
        .context("Location prompt aborted")?;

    config.location.latitude = CustomType::<f64>::new("Latitude:")
        .with_default(config.location.latitude)
        .with_error_message("Please enter a decimal number")
        .prompt()
        .context("Latitude prompt aborted")?;

    config.location.longitude = CustomType::<f64>::new("Longitude:")
        .with_default(config.location.longitude)
        .with_error_message("Please enter a decimal number")
        .prompt()
        .context("Longitude prompt aborted")?;

    config.forecast.user_agent = Text::new("User-Agent for the forecast API (include a contact):")
        .with_default(&config.forecast.user_agent)
        .prompt()
        .context("User-Agent prompt aborted")?;

    let kinds = vec![DestinationKind::Telegram, DestinationKind::Webhook];
    let start = kinds
        .iter()
        .position(|k| *k == config.delivery.kind)
        .unwrap_or(0);
    config.delivery.kind = Select::new("Destination:", kinds)
        .with_starting_cursor(start)
        .prompt()
        .context("Destination prompt aborted")?;

    match config.delivery.kind {
        DestinationKind::Telegram => {
            config.delivery.single_period =
                Confirm::new("Send only the nearest forecast period?")
                    .with_default(config.delivery.single_period)
                    .prompt()
                    .context("Single-period prompt aborted")?;

            let chat_id = Text::new("Telegram chat id (empty to read from environment):")
                .prompt()
                .context("Chat id prompt aborted")?;
            if !chat_id.trim().is_empty() {
                let name = config.delivery.chat_id_parameter.clone();
                config.upsert_parameter(&name, chat_id.trim().to_string());
            }

            let token = Password::new("Telegram bot token (empty to read from environment):")
                .without_confirmation()
                .prompt()
                .context("Token prompt aborted")?;
            if !token.trim().is_empty() {
                let name = config.delivery.token_parameter.clone();
                config.upsert_parameter(&name, token.trim().to_string());
            }
        }
        DestinationKind::Webhook => {
            config.delivery.webhook_url_env =
                Text::new("Environment variable holding the webhook URL:")
                    .with_default(&config.delivery.webhook_url_env)
                    .prompt()
                    .context("Webhook variable prompt aborted")?;
        }
    }

    config.save()?;
    println!(
        "Configuration saved to {}",
        Config::config_file_path()?.display()
    );

    Ok(())
}
