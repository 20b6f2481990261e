//! Configuration for the gateway.
//!
//! Settings come from an optional JSON file and are then overlaid with the
//! process environment. Resolution happens once at startup; the resulting
//! [`AppConfig`] is shared read-only with every request.
//!
//! # Example config
//!
//! ```json
//! {
//!   "webhook_token": "s3cret",
//!   "live_trading": false,
//!   "listen_addr": "0.0.0.0:8000",
//!   "skip_order_ids": ["Exit Long", "Exit Short"],
//!   "bitget": { "api_key": "...", "api_secret": "...", "passphrase": "..." }
//! }
//! ```
//!
//! # Environment overrides
//!
//! | Variable                | Field                 |
//! |-------------------------|-----------------------|
//! | `TV_WEBHOOK_TOKEN`      | `webhook_token`       |
//! | `BITGET_LIVE_TRADING`   | `live_trading`        |
//! | `TVGATE_LISTEN_ADDR`    | `listen_addr`         |
//! | `BITGET_API_KEY`        | `bitget.api_key`      |
//! | `BITGET_API_SECRET`     | `bitget.api_secret`   |
//! | `BITGET_API_PASSPHRASE` | `bitget.passphrase`   |
//! | `BITGET_BASE_URL`       | `bitget.rest_url`     |

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::types::Mode;

/// Placeholder token shipped as the default; a deployment still using it is
/// effectively unauthenticated.
pub const DEFAULT_WEBHOOK_TOKEN: &str = "CHANGE_ME";

/// Top-level application config.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Shared secret every webhook payload must carry in its `token` field.
    #[serde(default = "default_webhook_token")]
    pub webhook_token: String,

    /// Send orders to the exchange (`true`) or only return the would-be body.
    #[serde(default)]
    pub live_trading: bool,

    /// Address the HTTP listener binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// `tv_order_id` values that are acknowledged without placing an order.
    #[serde(default = "default_skip_order_ids")]
    pub skip_order_ids: HashSet<String>,

    /// `tv_comment` values that get an extra diagnostic log line.
    #[serde(default = "default_execute_comments")]
    pub execute_comments: HashSet<String>,

    /// Exchange settings.
    #[serde(default)]
    pub bitget: BitgetConfig,
}

impl AppConfig {
    /// Dispatch mode derived from the live switch.
    pub fn mode(&self) -> Mode {
        Mode::from_live_flag(self.live_trading)
    }

    /// Overlay process environment variables onto this config.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Overlay values produced by `lookup` (keyed by env var name).
    ///
    /// Split out from [`apply_env`](Self::apply_env) so tests can feed a fixed map.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("TV_WEBHOOK_TOKEN") {
            self.webhook_token = v;
        }
        if let Some(v) = lookup("BITGET_LIVE_TRADING") {
            self.live_trading = v.trim().eq_ignore_ascii_case("true");
        }
        if let Some(v) = lookup("TVGATE_LISTEN_ADDR") {
            self.listen_addr = v;
        }
        if let Some(v) = lookup("BITGET_API_KEY") {
            self.bitget.api_key = v;
        }
        if let Some(v) = lookup("BITGET_API_SECRET") {
            self.bitget.api_secret = v;
        }
        if let Some(v) = lookup("BITGET_API_PASSPHRASE") {
            self.bitget.passphrase = v;
        }
        if let Some(v) = lookup("BITGET_BASE_URL") {
            self.bitget.rest_url = v;
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            webhook_token: default_webhook_token(),
            live_trading: false,
            listen_addr: default_listen_addr(),
            skip_order_ids: default_skip_order_ids(),
            execute_comments: default_execute_comments(),
            bitget: BitgetConfig::default(),
        }
    }
}

/// Bitget USDT-M futures settings.
///
/// Product type, margin mode and margin coin are deployment constants and go
/// into every order body unchanged.
#[derive(Clone, Deserialize)]
pub struct BitgetConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default)]
    pub api_secret: String,

    #[serde(default)]
    pub passphrase: String,

    /// REST base URL.
    #[serde(default = "default_rest_url")]
    pub rest_url: String,

    #[serde(default = "default_product_type")]
    pub product_type: String,

    #[serde(default = "default_margin_mode")]
    pub margin_mode: String,

    #[serde(default = "default_margin_coin")]
    pub margin_coin: String,

    /// Upper bound on the single order placement call.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl BitgetConfig {
    /// `true` when key, secret and passphrase are all non-empty.
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty() && !self.passphrase.is_empty()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for BitgetConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_secret: String::new(),
            passphrase: String::new(),
            rest_url: default_rest_url(),
            product_type: default_product_type(),
            margin_mode: default_margin_mode(),
            margin_coin: default_margin_coin(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

// Credentials are redacted so the config can be logged.
impl std::fmt::Debug for BitgetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BitgetConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &redact(&self.api_secret))
            .field("passphrase", &redact(&self.passphrase))
            .field("rest_url", &self.rest_url)
            .field("product_type", &self.product_type)
            .field("margin_mode", &self.margin_mode)
            .field("margin_coin", &self.margin_coin)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

fn redact(s: &str) -> &'static str {
    if s.is_empty() { "<unset>" } else { "<redacted>" }
}

// ---------------------------------------------------------------------------
// Defaults (used by serde)
// ---------------------------------------------------------------------------

fn default_webhook_token() -> String {
    DEFAULT_WEBHOOK_TOKEN.into()
}

fn default_listen_addr() -> String {
    "0.0.0.0:8000".into()
}

fn default_skip_order_ids() -> HashSet<String> {
    ["Exit Long", "Exit Short"].into_iter().map(String::from).collect()
}

fn default_execute_comments() -> HashSet<String> {
    ["Long", "Short"].into_iter().map(String::from).collect()
}

fn default_rest_url() -> String {
    "https://api.bitget.com".into()
}

fn default_product_type() -> String {
    "USDT-FUTURES".into()
}

fn default_margin_mode() -> String {
    "crossed".into()
}

fn default_margin_coin() -> String {
    "USDT".into()
}

fn default_request_timeout_secs() -> u64 {
    15
}

/// Load config from an optional JSON file, then overlay the environment.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let mut config = match path {
        Some(path) => {
            let content =
                std::fs::read_to_string(path).with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&content).with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => AppConfig::default(),
    };
    config.apply_env();
    Ok(config)
}
