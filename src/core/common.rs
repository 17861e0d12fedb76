//! Common types shared by the engine, the risk layer and the gateway adapters
use std::fmt::{self, Formatter};

use num_derive::FromPrimitive;
use serde::{Deserialize, Serialize};

pub(crate) static POISONED_MUTEX: &str = "mutex was poisoned";

/// Error codes crossing the risk/engine boundary. These stay plain integers
/// because they travel through `on_order_completed(id, error_code)` the same
/// way a broker error code would.
pub const NO_ERROR: i32 = 0;
pub const ERR_SEND_FAILED: i32 = 1;
pub const ERR_REJECTED: i32 = 2;
pub const ERR_SELF_TRADE: i32 = 101;

//==================================================================================================
pub fn error_code_str(code: i32) -> &'static str {
    match code {
        NO_ERROR => "no error",
        ERR_SEND_FAILED => "failed to dispatch to gateway",
        ERR_REJECTED => "order rejected",
        ERR_SELF_TRADE => "self trade",
        _ => "unknown error",
    }
}

//==================================================================================================
/// Order side.
#[repr(i32)]
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
pub enum Direction {
    Buy = 0,
    Sell = 1,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Buy => Direction::Sell,
            Direction::Sell => Direction::Buy,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Direction::Buy => write!(f, "Buy"),
            Direction::Sell => write!(f, "Sell"),
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Buy
    }
}

//==================================================================================================
/// Position effect of an order.
#[repr(i32)]
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
pub enum Offset {
    Open = 0,
    Close = 1,
    CloseToday = 2,
    CloseYesterday = 3,
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            Offset::Open => write!(f, "Open"),
            Offset::Close => write!(f, "Close"),
            Offset::CloseToday => write!(f, "CloseToday"),
            Offset::CloseYesterday => write!(f, "CloseYesterday"),
        }
    }
}

impl Default for Offset {
    fn default() -> Self {
        Offset::Open
    }
}

//==================================================================================================
/// Price/time-in-force type of an order. FAK and FOK ride on a limit price
/// with an immediate time condition on the wire.
#[repr(i32)]
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
pub enum OrderType {
    Limit = 0,
    Market = 1,
    Fak = 2,
    Fok = 3,
    Best = 4,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            OrderType::Limit => write!(f, "Limit"),
            OrderType::Market => write!(f, "Market"),
            OrderType::Fak => write!(f, "FAK"),
            OrderType::Fok => write!(f, "FOK"),
            OrderType::Best => write!(f, "Best"),
        }
    }
}

impl Default for OrderType {
    fn default() -> Self {
        OrderType::Limit
    }
}

//==================================================================================================
/// Engine-side view of an order's lifecycle.
#[repr(i32)]
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
pub enum OrderStatus {
    Submitted = 0,
    AcceptedByBroker = 1,
    AcceptedByExchange = 2,
    PartiallyTraded = 3,
    FullyTraded = 4,
    Canceled = 5,
    PartiallyTradedThenCanceled = 6,
    Rejected = 7,
    CancelRejectedWhileOpen = 8,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            OrderStatus::Submitted => write!(f, "Submitted"),
            OrderStatus::AcceptedByBroker => write!(f, "AcceptedByBroker"),
            OrderStatus::AcceptedByExchange => write!(f, "AcceptedByExchange"),
            OrderStatus::PartiallyTraded => write!(f, "PartiallyTraded"),
            OrderStatus::FullyTraded => write!(f, "FullyTraded"),
            OrderStatus::Canceled => write!(f, "Canceled"),
            OrderStatus::PartiallyTradedThenCanceled => write!(f, "PartiallyTradedThenCanceled"),
            OrderStatus::Rejected => write!(f, "Rejected"),
            OrderStatus::CancelRejectedWhileOpen => write!(f, "CancelRejectedWhileOpen"),
        }
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Submitted
    }
}

//==================================================================================================
#[repr(i32)]
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
pub enum ProductType {
    Future = 0,
    Option = 1,
    Stock = 2,
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match *self {
            ProductType::Future => write!(f, "Future"),
            ProductType::Option => write!(f, "Option"),
            ProductType::Stock => write!(f, "Stock"),
        }
    }
}

impl Default for ProductType {
    fn default() -> Self {
        ProductType::Future
    }
}

//==================================================================================================
/// A strategy-originated order request. Consumed by
/// `TradingEngine::send_order`; `engine_order_id` is assigned by the engine
/// before the request reaches the risk chain, strategies leave it at 0.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct OrderReq {
    pub engine_order_id: u64,
    pub ticker_index: u32,
    pub direction: Direction,
    pub offset: Offset,
    pub order_type: OrderType,
    pub volume: i32,
    /// Ignored for market orders.
    pub price: f64,
}

//==================================================================================================
/// Engine-side order record, visible to strategies through
/// `TradingEngine::live_orders`.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Order {
    pub engine_order_id: u64,
    pub ticker_index: u32,
    pub direction: Direction,
    pub offset: Offset,
    pub order_type: OrderType,
    pub volume: i32,
    pub traded: i32,
    pub canceled: i32,
    pub price: f64,
    pub status: OrderStatus,
}

//==================================================================================================
/// A fill record.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Trade {
    pub ticker_index: u32,
    pub direction: Direction,
    pub offset: Offset,
    pub volume: i32,
    pub price: f64,
}

//==================================================================================================
/// One side of a position.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct PositionDetail {
    pub holdings: i32,
    /// Yesterday's settled portion of `holdings`.
    pub yd_holdings: i32,
    /// Reserved against pending close orders.
    pub frozen: i32,
    pub float_pnl: f64,
    pub cost_price: f64,
}

/// Aggregated holdings for one instrument, long and short legs kept apart.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Position {
    pub ticker_index: u32,
    pub long_pos: PositionDetail,
    pub short_pos: PositionDetail,
}

//==================================================================================================
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Account {
    pub account_id: u64,
    pub balance: f64,
    /// frozen_cash + frozen_margin + frozen_commission.
    pub frozen: f64,
}

//==================================================================================================
/// Level-1 market snapshot delivered through `Wrapper::on_tick`.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct TickData {
    pub ticker_index: u32,
    /// Exchange timestamp, "HH:MM:SS" as sent by the front.
    pub update_time: String,
    pub last_price: f64,
    pub volume: i64,
    pub open_interest: f64,
    pub bid_price: f64,
    pub bid_volume: i32,
    pub ask_price: f64,
    pub ask_volume: i32,
}
