//! Bitget trading module.
//!
//! Implements the [`OrderGateway`](crate::OrderGateway) trait for Bitget
//! USDT-M futures through the v2 REST API.
//!
//! # Architecture
//!
//! ```text
//! BitgetTd
//! └── FuturesClient   (signed REST, one POST per order)
//!       ├── order     (typed body + canonical JSON)
//!       └── auth      (HMAC-SHA256 / Base64 signature headers)
//! ```
//!
//! `place_order` takes `&self` and holds no mutable state, so concurrent
//! webhook deliveries share one instance freely.

pub mod auth;
pub mod futures;
pub mod order;
pub mod symbol;

use anyhow::Result;
use async_trait::async_trait;
use tvgate_core::config::BitgetConfig;
use tvgate_core::error::GatewayResult;

use self::futures::FuturesClient;
use self::order::PlaceOrderRequest;
use crate::{ExchangeReply, OrderGateway};

/// Bitget trading module.
pub struct BitgetTd {
    futures: FuturesClient,
}

impl BitgetTd {
    pub fn new(config: &BitgetConfig) -> Result<Self> {
        Ok(Self { futures: FuturesClient::new(config)? })
    }
}

#[async_trait]
impl OrderGateway for BitgetTd {
    async fn place_order(&self, order: &PlaceOrderRequest) -> GatewayResult<ExchangeReply> {
        self.futures.place_order(order).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::Router;
    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use tvgate_core::Side;
    use tvgate_core::error::GatewayError;

    use super::auth::sign_request;
    use super::order::PLACE_ORDER_PATH;
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct Captured {
        headers: Vec<(String, String)>,
        body: String,
    }

    type Capture = Arc<Mutex<Option<Captured>>>;

    async fn fake_place_order(State(capture): State<Capture>, headers: HeaderMap, body: String) -> (StatusCode, String) {
        let headers = headers
            .iter()
            .map(|(k, v)| (k.as_str().to_string(), v.to_str().unwrap_or_default().to_string()))
            .collect();
        *capture.lock().unwrap() = Some(Captured { headers, body });
        (StatusCode::BAD_REQUEST, r#"{"code":"40762","msg":"The order amount exceeds the balance"}"#.to_string())
    }

    async fn slow_place_order() -> &'static str {
        tokio::time::sleep(Duration::from_secs(5)).await;
        "{}"
    }

    async fn spawn_exchange(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn config(rest_url: String) -> BitgetConfig {
        BitgetConfig {
            api_key: "key".into(),
            api_secret: "secret".into(),
            passphrase: "pass".into(),
            rest_url,
            ..BitgetConfig::default()
        }
    }

    fn order() -> PlaceOrderRequest {
        PlaceOrderRequest::new(&BitgetConfig::default(), "BTCUSDT".into(), "0.01".into(), Side::Buy, false)
    }

    fn header<'a>(captured: &'a Captured, name: &str) -> &'a str {
        captured.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str()).unwrap_or("")
    }

    #[tokio::test]
    async fn signed_request_verifies_and_reply_is_relayed() {
        let capture: Capture = Arc::default();
        let router = Router::new().route(PLACE_ORDER_PATH, post(fake_place_order)).with_state(capture.clone());
        let base = spawn_exchange(router).await;

        let td = BitgetTd::new(&config(base)).unwrap();
        let reply = td.place_order(&order()).await.unwrap();

        assert_eq!(reply.status, 400);
        assert!(!reply.ok);
        assert_eq!(reply.body, r#"{"code":"40762","msg":"The order amount exceeds the balance"}"#);

        let captured = capture.lock().unwrap().clone().unwrap();
        assert_eq!(captured.body, order().canonical_json());
        assert_eq!(header(&captured, "ACCESS-KEY"), "key");
        assert_eq!(header(&captured, "ACCESS-PASSPHRASE"), "pass");
        assert_eq!(header(&captured, "content-type"), "application/json");
        assert_eq!(header(&captured, "locale"), "en-US");

        let ts = header(&captured, "ACCESS-TIMESTAMP");
        assert_eq!(ts.len(), 13);
        let expected = sign_request("secret", ts, "POST", PLACE_ORDER_PATH, &captured.body);
        assert_eq!(header(&captured, "ACCESS-SIGN"), expected);
    }

    #[tokio::test]
    async fn connection_refused_is_upstream_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let td = BitgetTd::new(&config(format!("http://{addr}"))).unwrap();
        let err = td.place_order(&order()).await.unwrap_err();
        assert!(matches!(err, GatewayError::UpstreamUnavailable(_)));
    }

    #[tokio::test]
    async fn timeout_is_upstream_unavailable() {
        let router = Router::new().route(PLACE_ORDER_PATH, post(slow_place_order));
        let base = spawn_exchange(router).await;

        let td = BitgetTd::new(&BitgetConfig { request_timeout_secs: 1, ..config(base) }).unwrap();
        let err = td.place_order(&order()).await.unwrap_err();
        assert!(matches!(err, GatewayError::UpstreamUnavailable(_)));
    }
}
