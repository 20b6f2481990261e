//! # tvgate-webhook
//!
//! Inbound side of the gateway: turns TradingView alert webhooks into routed
//! Bitget orders.
//!
//! ```text
//! POST /tv ─► normalizer ─► router ─► pipeline (safe | live) ─► OrderGateway
//! ```
//!
//! - [`normalizer`] — tolerant body decoding, token check, field normalization
//! - [`router`] — skip list, long/short selection, trade side, limit checks
//! - [`pipeline`] — end-to-end handling and dispatch
//! - [`server`] — axum router and error → status mapping

pub mod normalizer;
pub mod pipeline;
pub mod router;
pub mod server;

pub use pipeline::{Outcome, Pipeline};
pub use server::create_router;
