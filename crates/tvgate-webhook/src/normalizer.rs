//! Inbound payload decoding and field normalization.
//!
//! TradingView (and the relays people put in front of it) deliver the alert
//! body as `application/json` or `text/plain`, sometimes with the whole JSON
//! object wrapped in one more layer of string quoting. The content type is
//! therefore ignored and the body is decoded tolerantly:
//!
//! 1. strict JSON parse; a JSON string result is parsed once more
//! 2. otherwise, if the text is `"..."`, strip the quotes, unescape `\"`, retry
//!
//! After decoding: token check, `type` filter, then field extraction into an
//! [`InboundSignal`]. Extraction never fails; presence and value checks belong
//! to the router, which runs them after the skip rule.

use serde_json::{Map, Value};
use tracing::debug;
use tvgate_core::Side;
use tvgate_core::config::AppConfig;
use tvgate_core::error::{GatewayError, GatewayResult};
use tvgate_td::bitget::symbol::normalize_symbol;

/// Strings (lowercased) that coerce to `true`.
const TRUTHY: [&str; 5] = ["1", "true", "yes", "y", "on"];

/// Result of normalizing one delivery.
#[derive(Debug, Clone)]
pub enum Normalized {
    /// `type` was not `"order"`; acknowledged and dropped.
    Ignored,
    Signal(InboundSignal),
}

/// Take-profit / stop-loss keys of one side, as read from the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideFields {
    pub take_profit: Option<String>,
    pub take_profit_exec: Option<String>,
    pub stop_loss: Option<String>,
}

/// A decoded, authenticated order signal with normalized fields.
///
/// Every field is as-received after trimming and case folding; `None` means
/// absent or blank.
#[derive(Debug, Clone)]
pub struct InboundSignal {
    /// Symbol with any contract-type suffix removed. A symbol that is nothing
    /// but a suffix is absent.
    pub symbol: Option<String>,
    /// Lowercased.
    pub action: Option<String>,
    /// Quantity, opaque.
    pub qty: Option<String>,
    /// Lowercased.
    pub order_type: Option<String>,
    pub reduce_only: bool,
    pub price: Option<String>,
    /// Time-in-force, lowercased.
    pub force: Option<String>,
    /// Empty when absent.
    pub tv_order_id: String,
    /// Empty when absent.
    pub tv_comment: String,
    payload: Payload,
}

impl InboundSignal {
    /// Read the take-profit / stop-loss group for `side`.
    ///
    /// Only the three keys of that side are looked up; the other group is
    /// never touched.
    pub fn side_fields(&self, side: Side) -> SideFields {
        let (tp, tp_exec, sl) = match side {
            Side::Buy => ("tp_long", "tp_exec_long", "sl_long"),
            Side::Sell => ("tp_short", "tp_exec_short", "sl_short"),
        };
        SideFields {
            take_profit: self.payload.opt_string(tp),
            take_profit_exec: self.payload.opt_string(tp_exec),
            stop_loss: self.payload.opt_string(sl),
        }
    }
}

/// Decoded payload: the top-level object plus the optional `extra` object.
///
/// Optional order fields may live in either place; a usable value under
/// `extra` wins.
#[derive(Debug, Clone)]
struct Payload {
    root: Map<String, Value>,
    extra: Option<Map<String, Value>>,
}

impl Payload {
    fn new(mut root: Map<String, Value>) -> Self {
        let extra = match root.remove("extra") {
            Some(Value::Object(extra)) => Some(extra),
            _ => None,
        };
        Self { root, extra }
    }

    /// Top-level value, treating `null` as absent.
    fn top(&self, key: &str) -> Option<&Value> {
        self.root.get(key).filter(|v| !v.is_null())
    }

    /// Value from `extra` if usable, else from the top level.
    fn field(&self, key: &str) -> Option<&Value> {
        self.extra
            .as_ref()
            .and_then(|extra| extra.get(key))
            .filter(|v| !is_blank(v))
            .or_else(|| self.top(key))
    }

    /// Cleaned string form of [`field`](Self::field).
    fn opt_string(&self, key: &str) -> Option<String> {
        clean(self.field(key))
    }

    /// Cleaned string form of a top-level value.
    fn top_string(&self, key: &str) -> Option<String> {
        clean(self.top(key))
    }
}

/// Decode the raw body into a JSON object.
pub fn decode_body(raw: &[u8]) -> GatewayResult<Map<String, Value>> {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim();

    let value = match serde_json::from_str::<Value>(text) {
        Ok(Value::String(inner)) => serde_json::from_str(inner.trim()).map_err(|_| GatewayError::InvalidBody)?,
        Ok(value) => value,
        Err(_) => {
            let unquoted = text
                .strip_prefix('"')
                .and_then(|t| t.strip_suffix('"'))
                .ok_or(GatewayError::InvalidBody)?
                .replace("\\\"", "\"");
            serde_json::from_str(&unquoted).map_err(|_| GatewayError::InvalidBody)?
        }
    };

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(GatewayError::InvalidBody),
    }
}

/// Decode, authenticate, filter and extract one delivery.
pub fn normalize(raw: &[u8], config: &AppConfig) -> GatewayResult<Normalized> {
    let root = decode_body(raw)?;

    if root.get("token").and_then(Value::as_str) != Some(config.webhook_token.as_str()) {
        return Err(GatewayError::Unauthorized);
    }

    if root.get("type").and_then(Value::as_str) != Some("order") {
        debug!(message_type = ?root.get("type"), "non-order message ignored");
        return Ok(Normalized::Ignored);
    }

    let payload = Payload::new(root);

    let symbol = payload
        .top_string("symbol")
        .map(|raw| normalize_symbol(&raw).to_string())
        .filter(|symbol| !symbol.is_empty());
    let signal = InboundSignal {
        symbol,
        action: payload.top_string("action").map(|a| a.to_ascii_lowercase()),
        qty: payload.top_string("qty"),
        order_type: payload.opt_string("order_type").map(|t| t.to_ascii_lowercase()),
        reduce_only: parse_bool(payload.field("reduce_only")),
        price: payload.opt_string("price"),
        force: payload.opt_string("force").map(|f| f.to_ascii_lowercase()),
        tv_order_id: payload.top_string("tv_order_id").unwrap_or_default(),
        tv_comment: payload.top_string("tv_comment").unwrap_or_default(),
        payload,
    };
    Ok(Normalized::Signal(signal))
}

/// Boolean-ish coercion.
///
/// `true`, and the strings / numbers `1`, `true`, `yes`, `y`, `on` (any case)
/// are true. Everything else, including absence, is false.
pub fn parse_bool(v: Option<&Value>) -> bool {
    match v {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => TRUTHY.contains(&s.trim().to_ascii_lowercase().as_str()),
        Some(Value::Number(n)) => TRUTHY.contains(&n.to_string().as_str()),
        _ => false,
    }
}

/// Trim a scalar into a string; empty becomes absent.
pub fn clean(v: Option<&Value>) -> Option<String> {
    let s = match v? {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    (!s.is_empty()).then_some(s)
}

fn is_blank(v: &Value) -> bool {
    match v {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tvgate_core::config::BitgetConfig;

    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            webhook_token: "tok".into(),
            bitget: BitgetConfig {
                api_key: "k".into(),
                api_secret: "s".into(),
                passphrase: "p".into(),
                ..BitgetConfig::default()
            },
            ..AppConfig::default()
        }
    }

    fn order(extra: Value) -> Value {
        let mut base = json!({
            "token": "tok",
            "type": "order",
            "symbol": "BTCUSDT_UMCBL",
            "action": "BUY",
            "qty": "0.01",
        });
        if let (Value::Object(base), Value::Object(extra)) = (&mut base, extra) {
            base.extend(extra);
        }
        base
    }

    fn signal(payload: Value) -> InboundSignal {
        match normalize(payload.to_string().as_bytes(), &config()).unwrap() {
            Normalized::Signal(s) => s,
            Normalized::Ignored => panic!("expected a signal"),
        }
    }

    // -- decoding --

    #[test]
    fn decodes_plain_json() {
        let map = decode_body(br#"{"a":1}"#).unwrap();
        assert_eq!(map["a"], 1);
    }

    #[test]
    fn decodes_json_string_wrapping_json() {
        let wrapped = serde_json::to_string(&json!({"a": "x"}).to_string()).unwrap();
        let map = decode_body(wrapped.as_bytes()).unwrap();
        assert_eq!(map["a"], "x");
    }

    #[test]
    fn decodes_loosely_quoted_json() {
        // The raw tab makes the outer string invalid JSON, so only the
        // strip-and-unescape fallback can read it.
        let map = decode_body(b"  \"{\\\"a\\\":\t3}\"  ").unwrap();
        assert_eq!(map["a"], 3);
    }

    #[test]
    fn rejects_garbage_and_non_objects() {
        assert_eq!(decode_body(b"not json").unwrap_err(), GatewayError::InvalidBody);
        assert_eq!(decode_body(b"[1,2]").unwrap_err(), GatewayError::InvalidBody);
        assert_eq!(decode_body(b"\"just text\"").unwrap_err(), GatewayError::InvalidBody);
        assert_eq!(decode_body(b"").unwrap_err(), GatewayError::InvalidBody);
    }

    // -- gatekeeping --

    #[test]
    fn wrong_or_missing_token_is_unauthorized() {
        let cfg = config();
        let bad = json!({"token": "nope", "type": "order"}).to_string();
        assert_eq!(normalize(bad.as_bytes(), &cfg).unwrap_err(), GatewayError::Unauthorized);
        let missing = json!({"type": "order"}).to_string();
        assert_eq!(normalize(missing.as_bytes(), &cfg).unwrap_err(), GatewayError::Unauthorized);
    }

    #[test]
    fn non_order_types_are_ignored() {
        let cfg = config();
        for body in [json!({"token": "tok", "type": "alert"}), json!({"token": "tok"})] {
            assert!(matches!(normalize(body.to_string().as_bytes(), &cfg).unwrap(), Normalized::Ignored));
        }
    }

    // -- extraction --

    #[test]
    fn extracts_and_normalizes_fields() {
        let s = signal(order(json!({
            "order_type": "LIMIT",
            "price": " 65000 ",
            "force": "IOC",
            "tv_order_id": " Long Entry ",
            "tv_comment": "Long",
        })));
        assert_eq!(s.symbol.as_deref(), Some("BTCUSDT"));
        assert_eq!(s.action.as_deref(), Some("buy"));
        assert_eq!(s.qty.as_deref(), Some("0.01"));
        assert_eq!(s.order_type.as_deref(), Some("limit"));
        assert!(!s.reduce_only);
        assert_eq!(s.price.as_deref(), Some("65000"));
        assert_eq!(s.force.as_deref(), Some("ioc"));
        assert_eq!(s.tv_order_id, "Long Entry");
        assert_eq!(s.tv_comment, "Long");
    }

    #[test]
    fn numeric_qty_keeps_its_json_text() {
        let s = signal(order(json!({"qty": 0.5})));
        assert_eq!(s.qty.as_deref(), Some("0.5"));
    }

    #[test]
    fn extraction_does_not_judge_values() {
        let s = signal(json!({"token": "tok", "type": "order", "action": " Hold ", "order_type": "STOP"}));
        assert_eq!(s.symbol, None);
        assert_eq!(s.qty, None);
        assert_eq!(s.action.as_deref(), Some("hold"));
        assert_eq!(s.order_type.as_deref(), Some("stop"));
    }

    #[test]
    fn suffix_only_symbol_is_absent() {
        let s = signal(order(json!({"symbol": " _UMCBL "})));
        assert_eq!(s.symbol, None);
    }

    #[test]
    fn blank_optionals_become_absent() {
        let s = signal(order(json!({"price": "   ", "tp_long": "", "sl_long": null})));
        assert_eq!(s.price, None);
        assert_eq!(s.side_fields(Side::Buy), SideFields::default());
    }

    #[test]
    fn extra_object_wins_when_usable() {
        let s = signal(order(json!({
            "order_type": "market",
            "price": "1",
            "extra": {"order_type": "limit", "price": "", "reduce_only": "yes", "tp_long": "70000"},
        })));
        assert_eq!(s.order_type.as_deref(), Some("limit"));
        assert_eq!(s.price.as_deref(), Some("1"));
        assert!(s.reduce_only);
        assert_eq!(s.side_fields(Side::Buy).take_profit.as_deref(), Some("70000"));
    }

    #[test]
    fn side_fields_select_one_group() {
        let s = signal(order(json!({
            "tp_long": "50000", "tp_exec_long": "49900", "sl_long": "45000",
            "tp_short": "40000", "tp_exec_short": "40100", "sl_short": "42000",
        })));
        let long = s.side_fields(Side::Buy);
        assert_eq!(long.take_profit.as_deref(), Some("50000"));
        assert_eq!(long.take_profit_exec.as_deref(), Some("49900"));
        assert_eq!(long.stop_loss.as_deref(), Some("45000"));
        let short = s.side_fields(Side::Sell);
        assert_eq!(short.take_profit.as_deref(), Some("40000"));
        assert_eq!(short.stop_loss.as_deref(), Some("42000"));
    }

    // -- coercion --

    #[test]
    fn truthy_values() {
        for v in [json!(true), json!("true"), json!("TRUE"), json!("yes"), json!("Y"), json!("on"), json!(1), json!("1")]
        {
            assert!(parse_bool(Some(&v)), "{v} should be true");
        }
    }

    #[test]
    fn falsy_values() {
        for v in [json!(false), json!("false"), json!("no"), json!(0), json!("0"), json!(""), json!(null), json!(2)] {
            assert!(!parse_bool(Some(&v)), "{v} should be false");
        }
        assert!(!parse_bool(None));
    }

    #[test]
    fn clean_trims_and_drops_empty() {
        assert_eq!(clean(Some(&json!("  a "))), Some("a".into()));
        assert_eq!(clean(Some(&json!(""))), None);
        assert_eq!(clean(Some(&json!(null))), None);
        assert_eq!(clean(Some(&json!(42))), Some("42".into()));
        assert_eq!(clean(None), None);
    }
}
