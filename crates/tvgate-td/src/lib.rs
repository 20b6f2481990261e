//! # tvgate-td
//!
//! Trading (order execution) side of the gateway.
//!
//! An exchange connector implements [`OrderGateway`]: it takes a fully routed
//! [`PlaceOrderRequest`](bitget::order::PlaceOrderRequest), signs it, sends it
//! once, and hands back whatever the exchange answered.
//!
//! ## Supported exchanges
//!
//! | Exchange | Module   | Market           | Order channel |
//! |----------|----------|------------------|---------------|
//! | Bitget   | `bitget` | USDT-M futures   | REST v2       |

pub mod bitget;

use async_trait::async_trait;
use tvgate_core::error::GatewayResult;

use crate::bitget::order::PlaceOrderRequest;

/// Raw exchange answer to an order placement.
///
/// Status and body are relayed to the webhook caller verbatim; exchange error
/// codes are never interpreted here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeReply {
    /// HTTP status code returned by the exchange.
    pub status: u16,
    /// `true` for a 2xx status.
    pub ok: bool,
    /// Raw response body text.
    pub body: String,
}

impl ExchangeReply {
    pub fn new(status: u16, body: String) -> Self {
        Self { status, ok: (200..300).contains(&status), body }
    }
}

/// Trait implemented by exchange connectors.
///
/// Exactly one HTTP call per invocation: no retry, no queuing. Transport
/// failures surface as
/// [`GatewayError::UpstreamUnavailable`](tvgate_core::error::GatewayError::UpstreamUnavailable);
/// any HTTP response, 2xx or not, is an `Ok(ExchangeReply)`.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Sign and submit one order.
    async fn place_order(&self, order: &PlaceOrderRequest) -> GatewayResult<ExchangeReply>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_ok_tracks_2xx() {
        assert!(ExchangeReply::new(200, String::new()).ok);
        assert!(ExchangeReply::new(204, String::new()).ok);
        assert!(!ExchangeReply::new(400, String::new()).ok);
        assert!(!ExchangeReply::new(500, String::new()).ok);
    }
}
