//! The pre-trade risk kernel: an ordered chain of rules evaluated
//! synchronously on the strategy thread before an order reaches the gateway.
pub mod no_self_trade;

use crate::core::common::{OrderReq, NO_ERROR};

/// One risk rule. Hooks default to no-ops so a rule only implements the
/// stages it cares about.
pub trait RiskRule: Send + Sync {
    /// Veto gate. The first rule returning a non-`NO_ERROR` code aborts the
    /// order with that code.
    fn check_order_req(&mut self, _req: &OrderReq) -> i32 {
        NO_ERROR
    }

    /// The order passed every rule and was handed to the gateway.
    fn on_order_sent(&mut self, _engine_order_id: u64) {}

    /// A fill for a tracked order.
    fn on_order_traded(&mut self, _engine_order_id: u64, _this_traded: i32, _traded_price: f64) {}

    /// Terminal: the rule must release any per-order state it holds.
    fn on_order_completed(&mut self, _engine_order_id: u64, _error_code: i32) {}
}

//==================================================================================================
/// The ordered rule chain.
pub struct RiskManager {
    rules: Vec<Box<dyn RiskRule>>,
}

impl RiskManager {
    pub fn new() -> Self {
        RiskManager { rules: Vec::new() }
    }

    pub fn add_rule(&mut self, rule: Box<dyn RiskRule>) {
        self.rules.push(rule);
    }

    //----------------------------------------------------------------------------------------------
    pub fn check_order_req(&mut self, req: &OrderReq) -> i32 {
        for rule in self.rules.iter_mut() {
            let code = rule.check_order_req(req);
            if code != NO_ERROR {
                return code;
            }
        }
        NO_ERROR
    }

    //----------------------------------------------------------------------------------------------
    pub fn on_order_sent(&mut self, engine_order_id: u64) {
        for rule in self.rules.iter_mut() {
            rule.on_order_sent(engine_order_id);
        }
    }

    //----------------------------------------------------------------------------------------------
    pub fn on_order_traded(&mut self, engine_order_id: u64, this_traded: i32, traded_price: f64) {
        for rule in self.rules.iter_mut() {
            rule.on_order_traded(engine_order_id, this_traded, traded_price);
        }
    }

    //----------------------------------------------------------------------------------------------
    pub fn on_order_completed(&mut self, engine_order_id: u64, error_code: i32) {
        for rule in self.rules.iter_mut() {
            rule.on_order_completed(engine_order_id, error_code);
        }
    }
}

impl Default for RiskManager {
    fn default() -> Self {
        RiskManager::new()
    }
}
