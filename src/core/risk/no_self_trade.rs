//! Rejects orders that would cross our own resting orders.
use log::*;

use crate::core::common::{Direction, OrderReq, OrderType, ERR_SELF_TRADE, NO_ERROR};
use crate::core::risk::RiskRule;

/// Price tolerance when comparing an incoming order against a resting one.
const PRICE_EPSILON: f64 = 1e-5;

/// Keeps a snapshot of every outbound order that is still live and vetoes any
/// incoming request that could execute against one of them: a resting market
/// order blocks every opposite-side request, a resting limit blocks requests
/// priced through it.
pub struct NoSelfTradeRule {
    orders: Vec<OrderReq>,
}

impl NoSelfTradeRule {
    pub fn new() -> Self {
        NoSelfTradeRule { orders: Vec::new() }
    }

    pub fn pending_count(&self) -> usize {
        self.orders.len()
    }
}

impl Default for NoSelfTradeRule {
    fn default() -> Self {
        NoSelfTradeRule::new()
    }
}

impl RiskRule for NoSelfTradeRule {
    fn check_order_req(&mut self, req: &OrderReq) -> i32 {
        let opp_direction = req.direction.opposite();
        for pending in &self.orders {
            if pending.direction != opp_direction {
                continue;
            }

            let crossed = if pending.order_type == OrderType::Market {
                // A resting market order could execute at any price.
                true
            } else {
                match req.direction {
                    Direction::Buy => req.price > pending.price - PRICE_EPSILON,
                    Direction::Sell => req.price < pending.price + PRICE_EPSILON,
                }
            };

            if crossed {
                error!(
                    "self trade: ticker index {}. this order: [{} {} @{:.2}]. \
                     pending order: [{} {} @{:.2}]",
                    req.ticker_index,
                    req.direction,
                    req.order_type,
                    req.price,
                    pending.direction,
                    pending.order_type,
                    pending.price
                );
                return ERR_SELF_TRADE;
            }
        }

        self.orders.push(req.clone());
        NO_ERROR
    }

    fn on_order_completed(&mut self, engine_order_id: u64, _error_code: i32) {
        if let Some(pos) = self
            .orders
            .iter()
            .position(|o| o.engine_order_id == engine_order_id)
        {
            self.orders.remove(pos);
        }
    }
}
