//! Order routing: business rules between a normalized signal and the
//! exchange body.
//!
//! Rules, in order:
//!
//! 1. `tv_order_id` in the skip set → [`Route::Skipped`], nothing else is looked at
//! 2. `symbol`, `action`, `qty` must be present
//! 3. exchange credentials must be configured
//! 4. `action` is `buy` or `sell`, `order_type` is `market` (default) or `limit`
//! 5. `tv_comment` in the execute-comment set → diagnostic log only
//! 6. `buy` is long, `sell` is short; the take-profit / stop-loss group of that
//!    side is the only one read
//! 7. reduce-only closes, everything else opens
//! 8. limit orders need a price; market orders never carry one

use tracing::info;
use tvgate_core::config::AppConfig;
use tvgate_core::error::{GatewayError, GatewayResult};
use tvgate_core::{OrderKind, Side};
use tvgate_td::bitget::order::{Brackets, DEFAULT_FORCE, PlaceOrderRequest, Pricing};

use crate::normalizer::InboundSignal;

/// Keys that must be present for an order signal.
pub const REQUIRED_FIELDS: [&str; 3] = ["symbol", "action", "qty"];

/// Routing decision for one signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Order id is on the skip list; acknowledge without an order.
    Skipped,
    Order(PlaceOrderRequest),
}

/// Apply the routing rules to `signal`.
pub fn route(signal: &InboundSignal, config: &AppConfig) -> GatewayResult<Route> {
    if config.skip_order_ids.contains(&signal.tv_order_id) {
        info!(tv_order_id = %signal.tv_order_id, "signal skipped");
        return Ok(Route::Skipped);
    }

    let (Some(symbol), Some(action), Some(qty)) = (&signal.symbol, &signal.action, &signal.qty) else {
        let present = [signal.symbol.is_some(), signal.action.is_some(), signal.qty.is_some()];
        let missing: Vec<&str> =
            REQUIRED_FIELDS.into_iter().zip(present).filter(|(_, present)| !present).map(|(key, _)| key).collect();
        return Err(GatewayError::missing_fields(&missing));
    };

    if !config.bitget.has_credentials() {
        return Err(GatewayError::ServerMisconfigured("exchange API credentials are not configured".into()));
    }

    let side = Side::parse(action).ok_or_else(|| GatewayError::BadRequest(format!("invalid action: {action}")))?;
    let order_kind = match &signal.order_type {
        Some(raw) => {
            OrderKind::parse(raw).ok_or_else(|| GatewayError::BadRequest(format!("invalid order_type: {raw}")))?
        }
        None => OrderKind::Market,
    };

    if config.execute_comments.contains(&signal.tv_comment) {
        info!(tv_comment = %signal.tv_comment, tv_order_id = %signal.tv_order_id, "execute comment matched");
    }

    let pricing = match order_kind {
        OrderKind::Limit => {
            let price =
                signal.price.clone().ok_or_else(|| GatewayError::BadRequest("missing price for limit order".into()))?;
            let force = signal.force.clone().unwrap_or_else(|| DEFAULT_FORCE.to_string());
            Pricing::Limit { price, force }
        }
        OrderKind::Market => Pricing::Market,
    };

    let fields = signal.side_fields(side);
    let brackets = Brackets {
        take_profit: fields.take_profit,
        take_profit_exec: fields.take_profit_exec,
        stop_loss: fields.stop_loss,
    };

    let order = PlaceOrderRequest::new(
        &config.bitget,
        symbol.clone(),
        qty.clone(),
        side,
        signal.reduce_only,
    )
    .with_pricing(pricing)
    .with_brackets(brackets);

    info!(
        symbol = %order.symbol,
        side = %order.side,
        trade_side = %order.trade_side,
        order_type = %order.order_kind(),
        "signal routed"
    );
    Ok(Route::Order(order))
}
