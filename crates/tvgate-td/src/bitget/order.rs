//! Bitget v2 `place-order` request body.
//!
//! [`PlaceOrderRequest`] is the typed form; [`PlaceOrderRequest::canonical_json`]
//! is the one and only byte representation that is both signed and sent.
//!
//! # Canonical form
//!
//! Keys sorted lexicographically, compact separators, every value a JSON
//! string. Sorting goes through a [`BTreeMap`], so the output does not depend
//! on field declaration order or on how `serde_json` orders its own maps.

use std::collections::BTreeMap;

use tvgate_core::config::BitgetConfig;
use tvgate_core::{OrderKind, Side, TradeSide};

/// Path of the place-order endpoint (also part of the signature prehash).
pub const PLACE_ORDER_PATH: &str = "/api/v2/mix/order/place-order";

/// Time-in-force used when a limit signal does not name one.
pub const DEFAULT_FORCE: &str = "gtc";

/// Price terms of an order.
///
/// Price and time-in-force exist only on limit orders, so they only exist on
/// the `Limit` variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pricing {
    Market,
    Limit { price: String, force: String },
}

impl Pricing {
    pub fn kind(&self) -> OrderKind {
        match self {
            Self::Market => OrderKind::Market,
            Self::Limit { .. } => OrderKind::Limit,
        }
    }
}

/// Preset take-profit / stop-loss prices attached to the order.
///
/// Each field is independent and is emitted only when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Brackets {
    /// `presetStopSurplusPrice`: take-profit trigger.
    pub take_profit: Option<String>,
    /// `presetStopSurplusExecutePrice`: take-profit execution price.
    pub take_profit_exec: Option<String>,
    /// `presetStopLossPrice`: stop-loss trigger.
    pub stop_loss: Option<String>,
}

/// Fully routed order, ready to be serialized and signed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrderRequest {
    pub symbol: String,
    pub product_type: String,
    pub margin_mode: String,
    pub margin_coin: String,
    /// Quantity, passed through as an opaque string.
    pub size: String,
    pub side: Side,
    pub trade_side: TradeSide,
    pub pricing: Pricing,
    pub reduce_only: bool,
    pub brackets: Brackets,
}

impl PlaceOrderRequest {
    /// Start an order using the deployment constants from `config`.
    pub fn new(config: &BitgetConfig, symbol: String, size: String, side: Side, reduce_only: bool) -> Self {
        Self {
            symbol,
            product_type: config.product_type.clone(),
            margin_mode: config.margin_mode.clone(),
            margin_coin: config.margin_coin.clone(),
            size,
            side,
            trade_side: TradeSide::from_reduce_only(reduce_only),
            pricing: Pricing::Market,
            reduce_only,
            brackets: Brackets::default(),
        }
    }

    pub fn with_pricing(mut self, pricing: Pricing) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_brackets(mut self, brackets: Brackets) -> Self {
        self.brackets = brackets;
        self
    }

    pub fn order_kind(&self) -> OrderKind {
        self.pricing.kind()
    }

    /// Body as a sorted key → value map, using Bitget's field names.
    pub fn to_fields(&self) -> BTreeMap<&'static str, String> {
        let mut fields = BTreeMap::new();
        fields.insert("symbol", self.symbol.clone());
        fields.insert("productType", self.product_type.clone());
        fields.insert("marginMode", self.margin_mode.clone());
        fields.insert("marginCoin", self.margin_coin.clone());
        fields.insert("size", self.size.clone());
        fields.insert("side", self.side.as_str().to_string());
        fields.insert("tradeSide", self.trade_side.as_str().to_string());
        fields.insert("orderType", self.order_kind().as_str().to_string());
        fields.insert("reduceOnly", if self.reduce_only { "YES" } else { "NO" }.to_string());

        if let Pricing::Limit { price, force } = &self.pricing {
            fields.insert("price", price.clone());
            fields.insert("force", force.clone());
        }

        if let Some(tp) = &self.brackets.take_profit {
            fields.insert("presetStopSurplusPrice", tp.clone());
        }
        if let Some(tp_exec) = &self.brackets.take_profit_exec {
            fields.insert("presetStopSurplusExecutePrice", tp_exec.clone());
        }
        if let Some(sl) = &self.brackets.stop_loss {
            fields.insert("presetStopLossPrice", sl.clone());
        }
        fields
    }

    /// Canonical body string: sorted keys, no whitespace.
    pub fn canonical_json(&self) -> String {
        // A map of string → string cannot fail to serialize.
        serde_json::to_string(&self.to_fields()).unwrap_or_default()
    }

    /// Body as a JSON value, for echoing back in safe mode.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::Value::Object(self.to_fields().into_iter().map(|(k, v)| (k.to_string(), v.into())).collect())
    }
}
