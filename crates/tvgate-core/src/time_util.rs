//! Wall-clock helpers for request signing.
//!
//! Bitget rejects requests whose `ACCESS-TIMESTAMP` drifts too far from server
//! time, so every signed request must take a fresh reading here.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current time as **milliseconds** since Unix epoch.
#[inline]
pub fn now_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as u64
}

/// Current time in milliseconds, rendered as the decimal string used in
/// signature prehashes and the `ACCESS-TIMESTAMP` header.
pub fn timestamp_ms_string() -> String {
    now_ms().to_string()
}
