use reqwest::Client;
use std::{sync::OnceLock, time::Duration};

use crate::error::NotifierError;

static HTTP_CLIENT: OnceLock<Client> = OnceLock::new();

/// Process-wide HTTP client, built on first use and reused by later invocations.
///
/// Only the first caller's settings take effect. The client holds no per-invocation state.
pub fn shared_client(timeout: Duration, user_agent: &str) -> Result<&'static Client, NotifierError> {
    if let Some(client) = HTTP_CLIENT.get() {
        return Ok(client);
    }

    let client = build_client(timeout, user_agent)?;
    Ok(HTTP_CLIENT.get_or_init(|| client))
}

pub fn build_client(timeout: Duration, user_agent: &str) -> Result<Client, NotifierError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(user_agent)
        .build()
        .map_err(|e| NotifierError::Config(format!("failed to build HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_client_is_initialized_once() {
        let a = shared_client(Duration::from_secs(5), "weather-bot-test").unwrap();
        let b = shared_client(Duration::from_secs(30), "other").unwrap();
        assert!(std::ptr::eq(a, b));
    }
}
