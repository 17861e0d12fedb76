//! The abstract contract every broker adapter implements
use std::sync::{Arc, Mutex};

use crate::core::common::OrderReq;
use crate::core::config::Config;
use crate::core::contract::ContractTable;
use crate::core::virtual_gateway::VirtualGateway;
use crate::core::wrapper::Wrapper;

/// A broker gateway adapter.
///
/// `send_order` and `cancel_order` are non-blocking: they return as soon as
/// the request is handed to the vendor front. `login`, `logout` and the
/// `query_*` operations block until the correlated response arrives (or a
/// timeout fires) and report success as a bool. Results of queries are
/// streamed through the adapter's `Wrapper` before the query returns.
pub trait Gateway: Send + Sync {
    /// Runs the full session handshake. Any failed step aborts and leaves no
    /// partial session state.
    fn login(&self, config: &Config) -> bool;

    fn logout(&self);

    /// Dispatches an order, returning the adapter-local `OrderRef` (non-zero,
    /// strictly increasing) or 0 on failure. No broker request is made on
    /// failure.
    fn send_order(&self, order: &OrderReq) -> u64;

    /// Requests cancellation by `OrderRef`. Fails if the order is unknown or
    /// not yet accepted by the exchange.
    fn cancel_order(&self, order_ref: u64) -> bool;

    /// Hands the adapter the sealed instrument registry. Must be called once,
    /// after contracts are registered and before trading.
    fn set_contract_table(&self, table: Arc<ContractTable>);

    fn query_contract(&self, ticker: &str, exchange: &str) -> bool;

    fn query_contracts(&self) -> bool;

    fn query_position(&self, ticker: &str) -> bool;

    fn query_positions(&self) -> bool;

    fn query_account(&self) -> bool;

    fn query_trades(&self) -> bool;

    fn query_margin_rate(&self, ticker: &str) -> bool;
}

//==================================================================================================
/// Builds a gateway by its config selector. The CTP adapter is constructed
/// directly (it needs the vendor endpoints injected); "virtual" is the
/// loop-back adapter.
pub fn create_gateway<W: Wrapper>(api: &str, wrapper: Arc<Mutex<W>>) -> Option<Box<dyn Gateway>> {
    match api {
        "virtual" => Some(Box::new(VirtualGateway::new(wrapper))),
        _ => None,
    }
}
