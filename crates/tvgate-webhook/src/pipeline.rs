//! End-to-end handling of one webhook delivery: normalize → route → dispatch.
//!
//! The pipeline holds only read-only configuration and a shared
//! [`OrderGateway`], so concurrent deliveries never contend on anything.
//! Dispatch is decided by [`Mode`]:
//!
//! - **Safe** — the built body is returned, the gateway is never called
//! - **Live** — exactly one gateway call; its status and raw body are relayed

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{info, warn};
use tvgate_core::Mode;
use tvgate_core::config::AppConfig;
use tvgate_core::error::GatewayResult;
use tvgate_td::bitget::order::PlaceOrderRequest;
use tvgate_td::{ExchangeReply, OrderGateway};

use crate::normalizer::{Normalized, normalize};
use crate::router::{Route, route};

/// What happened to a delivery that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Not an order message.
    Ignored,
    /// Order id on the skip list.
    Skipped,
    /// Order built but not sent.
    Safe { order: PlaceOrderRequest, tv_order_id: String, tv_comment: String },
    /// Order sent; exchange answer relayed as-is.
    Live { reply: ExchangeReply, tv_order_id: String, tv_comment: String },
}

impl Outcome {
    /// Response body returned to the webhook caller (always with HTTP 200).
    pub fn to_json(&self) -> Value {
        match self {
            Self::Ignored => json!({"ok": true, "mode": "ignored"}),
            Self::Skipped => json!({"ok": true, "mode": "skipped"}),
            Self::Safe { order, tv_order_id, tv_comment } => json!({
                "ok": true,
                "mode": "safe",
                "body": order.to_json_value(),
                "tv_order_id": tv_order_id,
                "tv_comment": tv_comment,
            }),
            Self::Live { reply, tv_order_id, tv_comment } => json!({
                "ok": reply.ok,
                "mode": "live",
                "status": reply.status,
                "response": reply.body,
                "tv_order_id": tv_order_id,
                "tv_comment": tv_comment,
            }),
        }
    }
}

/// The signal-to-order pipeline.
#[derive(Clone)]
pub struct Pipeline {
    config: Arc<AppConfig>,
    gateway: Arc<dyn OrderGateway>,
}

impl Pipeline {
    pub fn new(config: Arc<AppConfig>, gateway: Arc<dyn OrderGateway>) -> Self {
        Self { config, gateway }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn mode(&self) -> Mode {
        self.config.mode()
    }

    /// Process one raw webhook body.
    pub async fn handle(&self, raw: &[u8]) -> GatewayResult<Outcome> {
        let signal = match normalize(raw, &self.config)? {
            Normalized::Ignored => return Ok(Outcome::Ignored),
            Normalized::Signal(signal) => signal,
        };

        let order = match route(&signal, &self.config)? {
            Route::Skipped => return Ok(Outcome::Skipped),
            Route::Order(order) => order,
        };

        info!(body = %order.canonical_json(), "bitget order body");

        let tv_order_id = signal.tv_order_id;
        let tv_comment = signal.tv_comment;

        match self.mode() {
            Mode::Safe => {
                warn!(symbol = %order.symbol, "safe mode: order not sent");
                Ok(Outcome::Safe { order, tv_order_id, tv_comment })
            }
            Mode::Live => {
                let reply = self.gateway.place_order(&order).await?;
                if reply.ok {
                    info!(symbol = %order.symbol, status = reply.status, "order accepted by exchange");
                } else {
                    warn!(symbol = %order.symbol, status = reply.status, response = %reply.body, "order rejected by exchange");
                }
                Ok(Outcome::Live { reply, tv_order_id, tv_comment })
            }
        }
    }
}
