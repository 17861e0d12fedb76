//! Wire-level field structs and codes of the CTP trader/md front.
//!
//! Only the fields the core consumes are modeled. Human-readable fields
//! (`error_msg`, `instrument_name`, `status_msg`) arrive GB2312-encoded and
//! are kept as raw bytes until `gb2312_to_utf8` decodes them at the adapter
//! boundary. `order_ref` is the decimal-ASCII rendering of the adapter's
//! integer handle and must round-trip exactly.
use encoding::all::GBK;
use encoding::{DecoderTrap, Encoding};
use num_derive::FromPrimitive;

use crate::core::common::{Direction, Offset, OrderType, ProductType};
use crate::core::errors::CtpCoreError;

//==================================================================================================
// Single-byte codes used by the front. Values are the authentic wire bytes.

#[repr(u8)]
#[derive(FromPrimitive, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CtpOrderStatus {
    AllTraded = b'0',
    PartTradedQueueing = b'1',
    PartTradedNotQueueing = b'2',
    NoTradeQueueing = b'3',
    NoTradeNotQueueing = b'4',
    Canceled = b'5',
    Unknown = b'a',
    NotTouched = b'b',
    Touched = b'c',
}

#[repr(u8)]
#[derive(FromPrimitive, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CtpSubmitStatus {
    InsertSubmitted = b'0',
    CancelSubmitted = b'1',
    ModifySubmitted = b'2',
    Accepted = b'3',
    InsertRejected = b'4',
    CancelRejected = b'5',
    ModifyRejected = b'6',
}

pub const CTP_DIRECTION_BUY: u8 = b'0';
pub const CTP_DIRECTION_SELL: u8 = b'1';

pub const CTP_OFFSET_OPEN: u8 = b'0';
pub const CTP_OFFSET_CLOSE: u8 = b'1';
pub const CTP_OFFSET_CLOSE_TODAY: u8 = b'3';
pub const CTP_OFFSET_CLOSE_YESTERDAY: u8 = b'4';

pub const CTP_PRICE_ANY: u8 = b'1';
pub const CTP_PRICE_LIMIT: u8 = b'2';
pub const CTP_PRICE_BEST: u8 = b'3';

pub const CTP_TC_IOC: u8 = b'1';
pub const CTP_TC_GFD: u8 = b'3';

pub const CTP_VC_ANY: u8 = b'1';
pub const CTP_VC_COMPLETE: u8 = b'3';

pub const CTP_CC_IMMEDIATELY: u8 = b'1';
pub const CTP_FCC_NOT_FORCE_CLOSE: u8 = b'0';
pub const CTP_HF_SPECULATION: u8 = b'1';
pub const CTP_AF_DELETE: u8 = b'0';

pub const CTP_POSI_DIRECTION_LONG: u8 = b'2';
pub const CTP_POSI_DIRECTION_SHORT: u8 = b'3';

pub const CTP_PRODUCT_FUTURES: u8 = b'1';
pub const CTP_PRODUCT_OPTIONS: u8 = b'2';

//==================================================================================================
// Conversions between crate enums and wire bytes.

pub fn to_ctp_direction(direction: Direction) -> u8 {
    match direction {
        Direction::Buy => CTP_DIRECTION_BUY,
        Direction::Sell => CTP_DIRECTION_SELL,
    }
}

pub fn from_ctp_direction(code: u8) -> Option<Direction> {
    match code {
        CTP_DIRECTION_BUY => Some(Direction::Buy),
        CTP_DIRECTION_SELL => Some(Direction::Sell),
        _ => None,
    }
}

pub fn to_ctp_offset(offset: Offset) -> u8 {
    match offset {
        Offset::Open => CTP_OFFSET_OPEN,
        Offset::Close => CTP_OFFSET_CLOSE,
        Offset::CloseToday => CTP_OFFSET_CLOSE_TODAY,
        Offset::CloseYesterday => CTP_OFFSET_CLOSE_YESTERDAY,
    }
}

pub fn from_ctp_offset(code: u8) -> Option<Offset> {
    match code {
        CTP_OFFSET_OPEN => Some(Offset::Open),
        CTP_OFFSET_CLOSE => Some(Offset::Close),
        CTP_OFFSET_CLOSE_TODAY => Some(Offset::CloseToday),
        CTP_OFFSET_CLOSE_YESTERDAY => Some(Offset::CloseYesterday),
        _ => None,
    }
}

pub fn to_ctp_price_type(order_type: OrderType) -> u8 {
    match order_type {
        OrderType::Market => CTP_PRICE_ANY,
        OrderType::Limit | OrderType::Fak | OrderType::Fok => CTP_PRICE_LIMIT,
        OrderType::Best => CTP_PRICE_BEST,
    }
}

pub fn from_ctp_product_class(code: u8) -> ProductType {
    match code {
        CTP_PRODUCT_OPTIONS => ProductType::Option,
        _ => ProductType::Future,
    }
}

//==================================================================================================
/// Decodes a GB2312/GBK byte field into UTF-8, replacing anything malformed.
pub fn gb2312_to_utf8(bytes: &[u8]) -> String {
    GBK.decode(bytes, DecoderTrap::Replace)
        .unwrap_or_else(|_| String::new())
}

/// Parses the decimal-ASCII `order_ref` wire field back into the adapter's
/// integer handle.
pub fn parse_order_ref(order_ref: &str) -> Result<i32, CtpCoreError> {
    Ok(order_ref.parse::<i32>()?)
}

//==================================================================================================
#[derive(Clone, Debug, Default)]
pub struct RspInfoField {
    pub error_id: i32,
    /// GB2312 bytes.
    pub error_msg: Vec<u8>,
}

/// A response is an error when it carries a non-zero error id.
pub fn is_error_rsp(rsp_info: Option<&RspInfoField>) -> bool {
    rsp_info.map_or(false, |rsp| rsp.error_id != 0)
}

/// Decoded error message of a response, empty when there is none.
pub fn rsp_error_msg(rsp_info: Option<&RspInfoField>) -> String {
    rsp_info.map_or_else(String::new, |rsp| gb2312_to_utf8(&rsp.error_msg))
}

//==================================================================================================
// Request fields.

#[derive(Clone, Debug, Default)]
pub struct ReqAuthenticateField {
    pub broker_id: String,
    pub user_id: String,
    pub auth_code: String,
    pub app_id: String,
}

#[derive(Clone, Debug, Default)]
pub struct ReqUserLoginField {
    pub broker_id: String,
    pub user_id: String,
    pub password: String,
}

#[derive(Clone, Debug, Default)]
pub struct UserLogoutField {
    pub broker_id: String,
    pub user_id: String,
}

#[derive(Clone, Debug, Default)]
pub struct QrySettlementInfoField {
    pub broker_id: String,
    pub investor_id: String,
}

#[derive(Clone, Debug, Default)]
pub struct SettlementInfoConfirmField {
    pub broker_id: String,
    pub investor_id: String,
}

#[derive(Clone, Debug, Default)]
pub struct InputOrderField {
    pub broker_id: String,
    pub investor_id: String,
    pub instrument_id: String,
    pub exchange_id: String,
    pub order_ref: String,
    pub order_price_type: u8,
    pub direction: u8,
    pub comb_offset_flag: u8,
    pub comb_hedge_flag: u8,
    pub limit_price: f64,
    pub volume_total_original: i32,
    pub time_condition: u8,
    pub volume_condition: u8,
    pub min_volume: i32,
    pub contingent_condition: u8,
    pub force_close_reason: u8,
    pub is_auto_suspend: i32,
    pub user_force_close: i32,
}

#[derive(Clone, Debug, Default)]
pub struct InputOrderActionField {
    pub broker_id: String,
    pub investor_id: String,
    pub instrument_id: String,
    pub exchange_id: String,
    pub order_ref: String,
    /// Exchange order id; used instead of `order_ref` for the startup sweep.
    pub order_sys_id: String,
    pub action_flag: u8,
    pub front_id: i32,
    pub session_id: i32,
}

#[derive(Clone, Debug, Default)]
pub struct QryInstrumentField {
    pub instrument_id: String,
    pub exchange_id: String,
}

#[derive(Clone, Debug, Default)]
pub struct QryInvestorPositionField {
    pub broker_id: String,
    pub investor_id: String,
    pub instrument_id: String,
    pub exchange_id: String,
}

#[derive(Clone, Debug, Default)]
pub struct QryTradingAccountField {
    pub broker_id: String,
    pub investor_id: String,
}

#[derive(Clone, Debug, Default)]
pub struct QryOrderField {
    pub broker_id: String,
    pub investor_id: String,
}

#[derive(Clone, Debug, Default)]
pub struct QryTradeField {
    pub broker_id: String,
    pub investor_id: String,
}

#[derive(Clone, Debug, Default)]
pub struct QryInstrumentMarginRateField {
    pub broker_id: String,
    pub investor_id: String,
    pub instrument_id: String,
    pub exchange_id: String,
    pub hedge_flag: u8,
}

//==================================================================================================
// Response / report fields.

#[derive(Clone, Debug, Default)]
pub struct RspAuthenticateField {
    pub broker_id: String,
    pub user_id: String,
    pub app_id: String,
}

#[derive(Clone, Debug, Default)]
pub struct RspUserLoginField {
    pub trading_day: String,
    pub front_id: i32,
    pub session_id: i32,
    /// Highest order ref used in this session so far, decimal ASCII.
    pub max_order_ref: String,
}

#[derive(Clone, Debug, Default)]
pub struct SettlementInfoField {
    pub trading_day: String,
    /// GB2312 bytes; may arrive chunked over several responses.
    pub content: Vec<u8>,
}

#[derive(Clone, Debug, Default)]
pub struct OrderField {
    pub broker_id: String,
    pub investor_id: String,
    pub instrument_id: String,
    pub exchange_id: String,
    pub order_ref: String,
    pub order_sys_id: String,
    pub order_submit_status: u8,
    pub order_status: u8,
    pub volume_total_original: i32,
    pub volume_traded: i32,
    pub insert_time: String,
    /// GB2312 bytes.
    pub status_msg: Vec<u8>,
}

#[derive(Clone, Debug, Default)]
pub struct TradeField {
    pub broker_id: String,
    pub investor_id: String,
    pub instrument_id: String,
    pub exchange_id: String,
    pub order_ref: String,
    pub trade_id: String,
    pub direction: u8,
    pub offset_flag: u8,
    pub price: f64,
    pub volume: i32,
    pub trade_time: String,
}

#[derive(Clone, Debug, Default)]
pub struct InstrumentField {
    pub instrument_id: String,
    pub exchange_id: String,
    /// GB2312 bytes.
    pub instrument_name: Vec<u8>,
    pub product_class: u8,
    pub volume_multiple: i32,
    pub price_tick: f64,
    pub max_market_order_volume: i32,
    pub min_market_order_volume: i32,
    pub max_limit_order_volume: i32,
    pub min_limit_order_volume: i32,
    pub delivery_year: i32,
    pub delivery_month: i32,
}

#[derive(Clone, Debug, Default)]
pub struct InvestorPositionField {
    pub instrument_id: String,
    pub posi_direction: u8,
    pub position: i32,
    pub yd_position: i32,
    pub today_position: i32,
    pub long_frozen: i32,
    pub short_frozen: i32,
    pub position_cost: f64,
    pub position_profit: f64,
}

#[derive(Clone, Debug, Default)]
pub struct TradingAccountField {
    pub account_id: String,
    pub balance: f64,
    pub frozen_cash: f64,
    pub frozen_margin: f64,
    pub frozen_commission: f64,
}

#[derive(Clone, Debug, Default)]
pub struct InstrumentMarginRateField {
    pub instrument_id: String,
    pub long_margin_ratio_by_money: f64,
    pub short_margin_ratio_by_money: f64,
}

#[derive(Clone, Debug, Default)]
pub struct SpecificInstrumentField {
    pub instrument_id: String,
}

#[derive(Clone, Debug, Default)]
pub struct DepthMarketDataField {
    pub instrument_id: String,
    pub update_time: String,
    pub last_price: f64,
    pub volume: i64,
    pub turnover: f64,
    pub open_interest: f64,
    pub bid_price1: f64,
    pub bid_volume1: i32,
    pub ask_price1: f64,
    pub ask_volume1: i32,
}
