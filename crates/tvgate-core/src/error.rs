//! Typed error definitions for the webhook → order pipeline.
//!
//! Every failure a webhook delivery can hit is one [`GatewayError`] variant.
//! Each variant knows the HTTP status the caller sees, so the HTTP layer never
//! has to guess. "Ignored" and "skipped" deliveries are not errors and never
//! appear here.

use thiserror::Error;

/// Pipeline errors, one per failure kind a caller can observe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// Body is not JSON, even after unwrapping one layer of string quoting.
    #[error("invalid JSON body")]
    InvalidBody,

    /// Webhook token does not match the configured secret.
    #[error("invalid token")]
    Unauthorized,

    /// Missing required fields or an unusable field value.
    #[error("{0}")]
    BadRequest(String),

    /// Exchange credentials are not configured on this server.
    #[error("server misconfigured: {0}")]
    ServerMisconfigured(String),

    /// Transport-level failure talking to the exchange (connect, timeout, read).
    #[error("exchange unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl GatewayError {
    /// Build a [`BadRequest`](Self::BadRequest) naming the missing keys.
    pub fn missing_fields(fields: &[&str]) -> Self {
        Self::BadRequest(format!("missing fields: {}", fields.join(", ")))
    }

    /// HTTP status code surfaced to the webhook caller.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidBody | Self::BadRequest(_) => 400,
            Self::Unauthorized => 401,
            Self::ServerMisconfigured(_) | Self::UpstreamUnavailable(_) => 500,
        }
    }
}

/// Convenience alias used across the pipeline crates.
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(GatewayError::InvalidBody.status_code(), 400);
        assert_eq!(GatewayError::Unauthorized.status_code(), 401);
        assert_eq!(GatewayError::BadRequest("x".into()).status_code(), 400);
        assert_eq!(GatewayError::ServerMisconfigured("x".into()).status_code(), 500);
        assert_eq!(GatewayError::UpstreamUnavailable("x".into()).status_code(), 500);
    }

    #[test]
    fn missing_fields_names_every_key() {
        let err = GatewayError::missing_fields(&["symbol", "qty"]);
        assert_eq!(err.to_string(), "missing fields: symbol, qty");
    }
}
