use serde::{Deserialize, Serialize};

use crate::error::NotifierError;

/// One named segment of a multi-day forecast, as returned by the forecast source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPeriod {
    pub name: String,
    pub temperature: i64,
    pub temperature_unit: String,
    pub short_forecast: String,
    pub detailed_forecast: String,
}

/// Which subset of periods ends up in the outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageVariant {
    /// Brief lines for the next 14 periods.
    Morning,
    /// Full detail for the next 2 periods.
    Noon,
    /// Full detail for the next 3 periods.
    Evening,
    /// Single structured record for the nearest period (webhook destination).
    Current,
    /// Chat text for the nearest period only.
    Nearest,
}

impl MessageVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageVariant::Morning => "morning",
            MessageVariant::Noon => "noon",
            MessageVariant::Evening => "evening",
            MessageVariant::Current => "current",
            MessageVariant::Nearest => "nearest",
        }
    }

    /// Variants a trigger is allowed to ask for.
    pub const fn selectable() -> &'static [MessageVariant] {
        &[
            MessageVariant::Morning,
            MessageVariant::Noon,
            MessageVariant::Evening,
        ]
    }

    /// Pick a variant from a local hour of day (0-23).
    pub fn for_hour(hour: u32) -> Self {
        match hour {
            0..=10 => MessageVariant::Morning,
            11..=16 => MessageVariant::Noon,
            _ => MessageVariant::Evening,
        }
    }
}

impl std::fmt::Display for MessageVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for MessageVariant {
    type Error = NotifierError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "morning" => Ok(MessageVariant::Morning),
            "noon" => Ok(MessageVariant::Noon),
            "evening" => Ok(MessageVariant::Evening),
            _ => Err(NotifierError::InvalidVariant(value.to_string())),
        }
    }
}

/// Structured body posted to the home-automation webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodPayload {
    pub temperature: i64,
    pub conditions: String,
    pub detailed: String,
    pub period: String,
}

impl From<&ForecastPeriod> for PeriodPayload {
    fn from(p: &ForecastPeriod) -> Self {
        Self {
            temperature: p.temperature,
            conditions: p.short_forecast.clone(),
            detailed: p.detailed_forecast.clone(),
            period: p.name.clone(),
        }
    }
}

/// Output of the formatter; consumed once by a sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattedMessage {
    /// Chat text with lightweight Markdown.
    Text(String),
    /// Single-period record.
    Period(PeriodPayload),
}

/// Input supplied by the scheduling trigger.
///
/// Example JSON: `{"message_type": "noon"}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerEvent {
    #[serde(default)]
    pub message_type: Option<String>,
}

impl TriggerEvent {
    pub fn with_variant(variant: MessageVariant) -> Self {
        Self {
            message_type: Some(variant.as_str().to_string()),
        }
    }

    /// Requested variant; `morning` when the trigger carries none.
    pub fn variant(&self) -> Result<MessageVariant, NotifierError> {
        match self.message_type.as_deref() {
            None => Ok(MessageVariant::Morning),
            Some(s) => MessageVariant::try_from(s),
        }
    }
}

/// Uniform result envelope returned to the trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationResult {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// JSON-encoded human-readable string.
    pub body: String,
}

impl InvocationResult {
    pub fn success(detail: &str) -> Self {
        Self {
            status_code: 200,
            body: encode_body(detail),
        }
    }

    pub fn failure(err: &NotifierError) -> Self {
        Self {
            status_code: 500,
            body: encode_body(&format!("Error: {err}")),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

fn encode_body(detail: &str) -> String {
    // Serializing a &str cannot fail.
    serde_json::to_string(detail).unwrap_or_else(|_| format!("\"{detail}\""))
}
