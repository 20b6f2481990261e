//! Symbol normalization from TradingView tickers to Bitget v2 symbols.
//!
//! TradingView alerts for Bitget futures carry the legacy v1 contract-type
//! marker (`BTCUSDT_UMCBL`, `ETHUSD_DMCBL`, demo `SBTCSUSDT_SUMCBL`, ...). The
//! v2 API wants the bare symbol, so the marker is removed once from the end.

/// Legacy contract-type suffixes, longest first so a longer marker is never
/// shadowed by a shorter one it happens to end with.
pub const CONTRACT_SUFFIXES: &[&str] = &["_SUMCBL", "_SDMCBL", "_SCMCBL", "_UMCBL", "_DMCBL", "_CMCBL"];

/// Strip one trailing contract-type suffix, if any.
///
/// Symbols without a known suffix pass through unchanged (apart from
/// surrounding whitespace).
pub fn normalize_symbol(symbol: &str) -> &str {
    let symbol = symbol.trim();
    CONTRACT_SUFFIXES.iter().find_map(|suffix| symbol.strip_suffix(suffix)).unwrap_or(symbol)
}
