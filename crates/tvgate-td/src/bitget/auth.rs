//! Bitget authentication and request signing.
//!
//! Bitget signs REST requests with **HMAC-SHA256** over the prehash string
//!
//! ```text
//! timestamp + METHOD + requestPath + body
//! ```
//!
//! keyed by the API secret, Base64-encoded. The result goes into the
//! `ACCESS-SIGN` header alongside `ACCESS-KEY`, `ACCESS-TIMESTAMP` and
//! `ACCESS-PASSPHRASE`. The body in the prehash must be byte-identical to the
//! body that is sent.

use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute an HMAC-SHA256 digest and return it Base64-encoded.
pub fn hmac_sha256_base64(secret: &str, message: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(message.as_bytes());
    base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

/// Sign a Bitget REST request.
///
/// # Arguments
///
/// * `secret` — the API secret.
/// * `timestamp` — milliseconds since epoch as a decimal string.
/// * `method` — upper-case HTTP method (`"POST"`).
/// * `path` — request path including any query string.
/// * `body` — the exact body bytes that will be sent (empty for GET).
///
/// # Example
///
/// ```ignore
/// let sig = sign_request("secret", "1700000000000", "POST", "/api/v2/mix/order/place-order", "{}");
/// assert_eq!(sig.len(), 44); // 32 bytes → 44 base64 chars
/// ```
pub fn sign_request(secret: &str, timestamp: &str, method: &str, path: &str, body: &str) -> String {
    let prehash = format!("{timestamp}{method}{path}{body}");
    hmac_sha256_base64(secret, &prehash)
}

/// The four authentication headers of one signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub access_key: String,
    pub access_sign: String,
    pub access_timestamp: String,
    pub access_passphrase: String,
}

impl SignedHeaders {
    /// Sign `method path body` at `timestamp` and bundle the auth headers.
    pub fn build(
        api_key: &str,
        secret: &str,
        passphrase: &str,
        timestamp: String,
        method: &str,
        path: &str,
        body: &str,
    ) -> Self {
        let access_sign = sign_request(secret, &timestamp, method, path, body);
        Self {
            access_key: api_key.to_string(),
            access_sign,
            access_timestamp: timestamp,
            access_passphrase: passphrase.to_string(),
        }
    }

    /// Header name/value pairs in the order they are attached to the request.
    pub fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("ACCESS-KEY", self.access_key.as_str()),
            ("ACCESS-SIGN", self.access_sign.as_str()),
            ("ACCESS-TIMESTAMP", self.access_timestamp.as_str()),
            ("ACCESS-PASSPHRASE", self.access_passphrase.as_str()),
        ]
    }
}
