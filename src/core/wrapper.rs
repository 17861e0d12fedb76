//! Sinks implement the Wrapper trait in this module to receive data and notifications from a gateway adapter
use std::marker::{Send, Sync};

use crate::core::common::{Account, Position, TickData, Trade};
use crate::core::contract::Contract;

/// A trait the engine (or any other sink) implements to receive the stream of
/// callbacks a gateway adapter produces from its broker session.
///
/// All methods are invoked from the adapter's callback threads. Adapters
/// release every internal lock before calling in, so implementations may take
/// their own locks freely; they must never call back into the gateway from
/// inside a callback.
///
/// Order callbacks are keyed by the adapter-local `OrderRef` widened to
/// `u64`. Per order the sequence is `on_order_accepted` once, then zero or
/// more `on_order_traded`, then at most one terminal; across different orders
/// no ordering is promised.
pub trait Wrapper: Send + Sync + 'static {
    //----------------------------------------------------------------------------------------------
    /// Streams one contract per instrument matched by a contract query.
    fn on_query_contract(&mut self, contract: &Contract);

    //----------------------------------------------------------------------------------------------
    /// Reports the trading account once per account query.
    fn on_query_account(&mut self, account: &Account);

    //----------------------------------------------------------------------------------------------
    /// Streams aggregated positions, one per instrument, at the end of a
    /// position query. Both legs of the pair are fully populated.
    fn on_query_position(&mut self, position: &Position);

    //----------------------------------------------------------------------------------------------
    /// Streams historical fills matched by a trade query.
    fn on_query_trade(&mut self, trade: &Trade);

    //----------------------------------------------------------------------------------------------
    /// The exchange accepted the order. Emitted exactly once per order that
    /// reaches the exchange, even when the first evidence of acceptance is a
    /// trade report.
    fn on_order_accepted(&mut self, order_ref: u64);

    //----------------------------------------------------------------------------------------------
    /// A fill of `traded` lots at `price`.
    fn on_order_traded(&mut self, order_ref: u64, traded: i32, price: f64);

    //----------------------------------------------------------------------------------------------
    /// The unfilled remainder (`canceled` lots) was canceled. Emitted at most
    /// once per order, duplicate broker notices are swallowed.
    fn on_order_canceled(&mut self, order_ref: u64, canceled: i32);

    //----------------------------------------------------------------------------------------------
    /// The order was rejected by the broker or the exchange. Terminal.
    fn on_order_rejected(&mut self, order_ref: u64);

    //----------------------------------------------------------------------------------------------
    /// A cancel request was rejected; the order is still live if it was open.
    fn on_order_cancel_rejected(&mut self, order_ref: u64);

    //----------------------------------------------------------------------------------------------
    /// A level-1 market-data snapshot.
    fn on_tick(&mut self, tick: &TickData);
}
