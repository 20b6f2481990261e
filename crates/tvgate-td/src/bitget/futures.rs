//! Bitget USDT-M futures REST client.
//!
//! # REST endpoints
//!
//! | Operation   | Method | Path                              |
//! |-------------|--------|-----------------------------------|
//! | Place order | POST   | `/api/v2/mix/order/place-order`   |

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use tvgate_core::config::BitgetConfig;
use tvgate_core::error::{GatewayError, GatewayResult};
use tvgate_core::time_util;

use super::auth::SignedHeaders;
use super::order::{PLACE_ORDER_PATH, PlaceOrderRequest};
use crate::ExchangeReply;

/// Bitget futures account client.
pub struct FuturesClient {
    /// Shared HTTP client (carries the request timeout).
    http: reqwest::Client,
    api_key: String,
    /// Secret key for HMAC-SHA256 signing.
    secret_key: String,
    passphrase: String,
    /// REST base URL (e.g. `https://api.bitget.com`).
    base_url: String,
}

impl FuturesClient {
    /// Create a new futures client (no connections opened yet).
    pub fn new(config: &BitgetConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("failed to build Bitget HTTP client")?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            secret_key: config.api_secret.clone(),
            passphrase: config.passphrase.clone(),
            base_url: config.rest_url.trim_end_matches('/').to_string(),
        })
    }

    /// Place a new order via the REST API.
    ///
    /// Signs with a fresh timestamp on every call. Returns the exchange's
    /// status and raw body for any HTTP response.
    pub async fn place_order(&self, order: &PlaceOrderRequest) -> GatewayResult<ExchangeReply> {
        let body = order.canonical_json();
        let headers = SignedHeaders::build(
            &self.api_key,
            &self.secret_key,
            &self.passphrase,
            time_util::timestamp_ms_string(),
            "POST",
            PLACE_ORDER_PATH,
            &body,
        );

        let url = format!("{}{PLACE_ORDER_PATH}", self.base_url);
        debug!(%url, timestamp = %headers.access_timestamp, "sending signed order");

        let mut request = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header("locale", "en-US");
        for (name, value) in headers.pairs() {
            request = request.header(name, value);
        }

        let resp = request.body(body).send().await.map_err(|e| {
            warn!(symbol = %order.symbol, "place order transport error: {e}");
            GatewayError::UpstreamUnavailable(e.to_string())
        })?;

        let status = resp.status().as_u16();
        let text = resp.text().await.map_err(|e| {
            warn!(symbol = %order.symbol, status, "failed to read place order response: {e}");
            GatewayError::UpstreamUnavailable(e.to_string())
        })?;

        info!(symbol = %order.symbol, status, "place order answered");
        Ok(ExchangeReply::new(status, text))
    }
}
