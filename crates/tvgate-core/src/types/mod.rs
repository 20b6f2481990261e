//! Core enums shared by the inbound (webhook) and outbound (exchange) sides.

pub mod enums;

pub use enums::*;
