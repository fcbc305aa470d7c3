use thiserror::Error;

/// Every way a single notifier invocation can fail.
///
/// Components below the entry point only signal these; nothing recovers from them
/// except [`crate::handler::Notifier::handle`].
#[derive(Debug, Error)]
pub enum NotifierError {
    /// Forecast source unreachable, returned a non-success status, or sent a malformed document.
    #[error("Upstream forecast error: {0}")]
    Upstream(String),

    /// A required credential, URL or setting is missing or unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unrecognized message-type selector.
    #[error("Invalid message variant '{0}'. Supported variants: morning, noon, evening.")]
    InvalidVariant(String),

    /// The destination rejected the message or could not be reached.
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Shorten an HTTP body before embedding it in an error message.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
