//! # tvgate-core
//!
//! Core crate for the TradingView → Bitget order gateway, providing:
//!
//! - **Types** (`types`) — side, order kind, trade side and dispatch mode enums
//! - **Configuration** (`config`) — JSON config deserialization + env overlay
//! - **Error types** (`error`) — pipeline-level `GatewayError` via thiserror
//! - **Time utilities** (`time_util`) — millisecond timestamps for request signing
//! - **Logging** (`logging`) — tracing-based structured logging

pub mod config;
pub mod error;
pub mod logging;
pub mod time_util;
pub mod types;

// Re-export types at crate root for convenience.
pub use types::*;
