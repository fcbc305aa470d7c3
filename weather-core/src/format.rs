//! Turns forecast periods into the outgoing message.
//!
//! Pure: no I/O, same output for the same input.
//!
//! | variant   | periods | detail                        |
//! |-----------|---------|-------------------------------|
//! | `morning` | 14      | name, temperature, short text |
//! | `noon`    | 2       | full, incl. detailed forecast |
//! | `evening` | 3       | full, incl. detailed forecast |
//! | `current` | 1       | structured record, no header  |
//! | `nearest` | 1       | full, own header              |
//!
//! Short input is never an error for the chat variants; they render whatever is available.

use crate::{
    error::NotifierError,
    model::{ForecastPeriod, FormattedMessage, MessageVariant, PeriodPayload},
};

pub const MORNING_PERIODS: usize = 14;
pub const NOON_PERIODS: usize = 2;
pub const EVENING_PERIODS: usize = 3;

#[derive(Debug, Clone)]
pub struct Formatter {
    location: String,
}

impl Formatter {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
        }
    }

    pub fn format(
        &self,
        periods: &[ForecastPeriod],
        variant: MessageVariant,
    ) -> Result<FormattedMessage, NotifierError> {
        let text = match variant {
            MessageVariant::Morning => self.brief(variant, take(periods, MORNING_PERIODS)),
            MessageVariant::Noon => self.detailed(variant, take(periods, NOON_PERIODS)),
            MessageVariant::Evening => self.detailed(variant, take(periods, EVENING_PERIODS)),
            MessageVariant::Current => {
                return Ok(FormattedMessage::Period(PeriodPayload::from(nearest(periods)?)));
            }
            MessageVariant::Nearest => self.single(nearest(periods)?),
        };

        Ok(FormattedMessage::Text(text))
    }

    pub fn header(&self, variant: MessageVariant) -> String {
        match variant {
            MessageVariant::Morning => {
                format!("☀️ *Good morning! 7-day forecast for {}*", self.location)
            }
            MessageVariant::Noon => format!("🌤 *Afternoon update for {}*", self.location),
            MessageVariant::Evening => {
                format!("🌙 *Good evening! Tonight and tomorrow in {}*", self.location)
            }
            MessageVariant::Current | MessageVariant::Nearest => String::new(),
        }
    }

    fn brief(&self, variant: MessageVariant, periods: &[ForecastPeriod]) -> String {
        let mut out = self.header(variant);
        if !periods.is_empty() {
            out.push('\n');
        }
        for p in periods {
            out.push_str(&format!(
                "\n*{}*: {}°{}, {}",
                p.name, p.temperature, p.temperature_unit, p.short_forecast
            ));
        }
        out
    }

    fn detailed(&self, variant: MessageVariant, periods: &[ForecastPeriod]) -> String {
        let mut out = self.header(variant);
        for p in periods {
            out.push_str(&format!(
                "\n\n*{}*\nTemperature: {}°{}\nConditions: {}\n{}",
                p.name, p.temperature, p.temperature_unit, p.short_forecast, p.detailed_forecast
            ));
        }
        out
    }

    fn single(&self, p: &ForecastPeriod) -> String {
        format!(
            "🌤 *{} Weather for {}*\n\nTemperature: {}°{}\nConditions: {}\n\n{}",
            p.name,
            self.location,
            p.temperature,
            p.temperature_unit,
            p.short_forecast,
            p.detailed_forecast
        )
    }
}

fn nearest(periods: &[ForecastPeriod]) -> Result<&ForecastPeriod, NotifierError> {
    periods
        .first()
        .ok_or_else(|| NotifierError::Upstream("forecast contained no periods".to_string()))
}

fn take(periods: &[ForecastPeriod], n: usize) -> &[ForecastPeriod] {
    &periods[..periods.len().min(n)]
}
