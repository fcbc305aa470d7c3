//! Credential lookup by logical parameter name.
//!
//! Values are resolved on each call and never cached.

use std::collections::HashMap;

use crate::error::NotifierError;

pub trait ParameterStore: Send + Sync {
    /// Returns the value, or `None` if this store doesn't know the name.
    fn lookup(&self, name: &str) -> Option<String>;

    /// Like [`lookup`](Self::lookup), but a missing value is a configuration error.
    fn get(&self, name: &str) -> Result<String, NotifierError> {
        self.lookup(name)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| NotifierError::Config(format!("parameter '{name}' is not set")))
    }
}

/// Reads parameters from the process environment.
///
/// `/weather-bot/telegram-token` is looked up as `WEATHER_BOT_TELEGRAM_TOKEN`.
#[derive(Debug, Clone, Default)]
pub struct EnvParameterStore;

impl EnvParameterStore {
    pub fn env_name(name: &str) -> String {
        name.trim_start_matches('/')
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect()
    }
}

impl ParameterStore for EnvParameterStore {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(Self::env_name(name)).ok()
    }
}

/// Fixed set of values, e.g. the `[parameters]` table of the config file.
#[derive(Debug, Clone, Default)]
pub struct MapParameterStore {
    values: HashMap<String, String>,
}

impl MapParameterStore {
    pub fn new(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl ParameterStore for MapParameterStore {
    fn lookup(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// Asks each store in order; first hit wins.
#[derive(Default)]
pub struct LayeredParameterStore {
    layers: Vec<Box<dyn ParameterStore>>,
}

impl LayeredParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, store: impl ParameterStore + 'static) -> Self {
        self.layers.push(Box::new(store));
        self
    }
}

impl ParameterStore for LayeredParameterStore {
    fn lookup(&self, name: &str) -> Option<String> {
        self.layers.iter().find_map(|s| s.lookup(name))
    }
}
