use std::sync::Arc;
use tracing::{error, info};

use crate::{
    config::{Config, DeliveryConfig, DestinationKind, Location},
    delivery::{MessageSender, TelegramSender, WebhookSender},
    error::NotifierError,
    forecast::{ForecastSource, NwsForecastSource},
    format::Formatter,
    http::shared_client,
    model::{InvocationResult, TriggerEvent},
    params::{EnvParameterStore, LayeredParameterStore, MapParameterStore, ParameterStore},
};

pub const SUCCESS_DETAIL: &str = "Weather updated successfully";

/// One fetch → format → send pipeline.
#[derive(Debug)]
pub struct Notifier {
    source: Box<dyn ForecastSource>,
    sender: Box<dyn MessageSender>,
    formatter: Formatter,
    location: Location,
    delivery: DeliveryConfig,
}

impl Notifier {
    pub fn new(
        source: Box<dyn ForecastSource>,
        sender: Box<dyn MessageSender>,
        location: Location,
        delivery: DeliveryConfig,
    ) -> Self {
        Self {
            source,
            sender,
            formatter: Formatter::new(location.name.clone()),
            location,
            delivery,
        }
    }

    /// Build the production pipeline from config.
    ///
    /// The sender is built first so a missing destination fails before any network call.
    pub fn from_config(config: &Config) -> Result<Self, NotifierError> {
        let http = shared_client(config.http_timeout(), &config.forecast.user_agent)?.clone();

        let sender: Box<dyn MessageSender> = match config.delivery.kind {
            DestinationKind::Telegram => Box::new(TelegramSender::new(
                http.clone(),
                config.delivery.telegram_api.clone(),
                parameter_store(config),
                config.delivery.token_parameter.clone(),
                config.delivery.chat_id_parameter.clone(),
            )),
            DestinationKind::Webhook => Box::new(WebhookSender::from_env(
                http.clone(),
                &config.delivery.webhook_url_env,
            )?),
        };

        let source = Box::new(NwsForecastSource::new(http, config.forecast.base_url.clone()));

        Ok(Self::new(
            source,
            sender,
            config.location.clone(),
            config.delivery.clone(),
        ))
    }

    /// Run the pipeline, propagating the first failure.
    pub async fn run(&self, event: &TriggerEvent) -> Result<String, NotifierError> {
        let variant = self.delivery.variant_for(event.variant()?);

        let periods = self
            .source
            .fetch_forecast(self.location.latitude, self.location.longitude)
            .await?;

        let message = self.formatter.format(&periods, variant)?;
        self.sender.send(&message).await?;

        info!(
            %variant,
            destination = %self.delivery.kind,
            periods = periods.len(),
            conditions = periods.first().map(|p| p.short_forecast.as_str()).unwrap_or(""),
            "forecast delivered"
        );
        Ok(SUCCESS_DETAIL.to_string())
    }

    /// Run the pipeline and fold any failure into the result envelope.
    pub async fn handle(&self, event: &TriggerEvent) -> InvocationResult {
        match self.run(event).await {
            Ok(detail) => InvocationResult::success(&detail),
            Err(err) => failed(err),
        }
    }
}

/// Single invocation from config: build, run, and always return an envelope.
pub async fn handle(config: &Config, event: &TriggerEvent) -> InvocationResult {
    match Notifier::from_config(config) {
        Ok(notifier) => notifier.handle(event).await,
        Err(err) => failed(err),
    }
}

fn failed(err: NotifierError) -> InvocationResult {
    error!(error = %err, "weather update failed");
    InvocationResult::failure(&err)
}

/// Environment first, then the config file's `[parameters]` table.
fn parameter_store(config: &Config) -> Arc<dyn ParameterStore> {
    Arc::new(
        LayeredParameterStore::new()
            .with(EnvParameterStore)
            .with(MapParameterStore::new(config.parameters.clone())),
    )
}
