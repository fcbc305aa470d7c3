//! Core library for the scheduled weather bot.
//!
//! This crate defines:
//! - Configuration & credential lookup
//! - The forecast fetcher and the message formatter
//! - Delivery to a chat or a home-automation webhook
//! - The single entry point that ties them together
//!
//! It is used by `weather-bot-cli`, but any scheduler able to call [`handle`] can drive it.

pub mod config;
pub mod delivery;
pub mod error;
pub mod forecast;
pub mod format;
pub mod handler;
pub mod http;
pub mod model;
pub mod params;

#[cfg(test)]
mod test_server;

pub use config::{Config, DeliveryConfig, DestinationKind, Location};
pub use delivery::{MessageSender, TelegramSender, WebhookSender};
pub use error::NotifierError;
pub use forecast::{ForecastSource, NwsForecastSource};
pub use format::Formatter;
pub use handler::{Notifier, handle};
pub use model::{
    ForecastPeriod, FormattedMessage, InvocationResult, MessageVariant, PeriodPayload,
    TriggerEvent,
};
