//! Shared fixtures: a recording wrapper, a sealed two-instrument table and a
//! logged-in trade adapter riding on the scriptable test front.
use std::sync::{Arc, Mutex};

use crate::core::common::{
    Account, Direction, Offset, OrderReq, OrderType, Position, TickData, Trade,
};
use crate::core::config::Config;
use crate::core::contract::{Contract, ContractTable};
use crate::core::ctp::api::{TestTraderApi, TraderApi};
use crate::core::ctp::common::{
    CtpOrderStatus, CtpSubmitStatus, InstrumentField, OrderField, TradeField, CTP_DIRECTION_BUY,
    CTP_OFFSET_OPEN, CTP_PRODUCT_FUTURES,
};
use crate::core::ctp::trade_api::CtpTradeApi;
use crate::core::wrapper::Wrapper;

pub const TEST_INVESTOR: &str = "123456";

/// Everything a wrapper callback can report, flattened for order-sensitive
/// assertions.
#[derive(Clone, Debug, PartialEq)]
pub enum Emission {
    Accepted(u64),
    Traded(u64, i32, f64),
    Canceled(u64, i32),
    Rejected(u64),
    CancelRejected(u64),
    QueryContract(String),
    QueryAccount(u64),
    QueryPosition(u32),
    QueryTrade(u32),
    Tick(u32),
}

#[derive(Default)]
pub struct RecordingWrapper {
    pub emissions: Vec<Emission>,
    pub contracts: Vec<Contract>,
    pub accounts: Vec<Account>,
    pub positions: Vec<Position>,
    pub trades: Vec<Trade>,
    pub ticks: Vec<TickData>,
}

impl RecordingWrapper {
    pub fn new() -> Self {
        RecordingWrapper::default()
    }
}

impl Wrapper for RecordingWrapper {
    fn on_query_contract(&mut self, contract: &Contract) {
        self.emissions
            .push(Emission::QueryContract(contract.ticker.clone()));
        self.contracts.push(contract.clone());
    }

    fn on_query_account(&mut self, account: &Account) {
        self.emissions.push(Emission::QueryAccount(account.account_id));
        self.accounts.push(account.clone());
    }

    fn on_query_position(&mut self, position: &Position) {
        self.emissions
            .push(Emission::QueryPosition(position.ticker_index));
        self.positions.push(position.clone());
    }

    fn on_query_trade(&mut self, trade: &Trade) {
        self.emissions.push(Emission::QueryTrade(trade.ticker_index));
        self.trades.push(trade.clone());
    }

    fn on_order_accepted(&mut self, order_ref: u64) {
        self.emissions.push(Emission::Accepted(order_ref));
    }

    fn on_order_traded(&mut self, order_ref: u64, traded: i32, price: f64) {
        self.emissions.push(Emission::Traded(order_ref, traded, price));
    }

    fn on_order_canceled(&mut self, order_ref: u64, canceled: i32) {
        self.emissions.push(Emission::Canceled(order_ref, canceled));
    }

    fn on_order_rejected(&mut self, order_ref: u64) {
        self.emissions.push(Emission::Rejected(order_ref));
    }

    fn on_order_cancel_rejected(&mut self, order_ref: u64) {
        self.emissions.push(Emission::CancelRejected(order_ref));
    }

    fn on_tick(&mut self, tick: &TickData) {
        self.emissions.push(Emission::Tick(tick.ticker_index));
        self.ticks.push(tick.clone());
    }
}

//==================================================================================================
pub fn sample_contract(ticker: &str, exchange: &str) -> Contract {
    Contract {
        ticker: ticker.to_string(),
        exchange: exchange.to_string(),
        name: ticker.to_string(),
        size: 10,
        price_tick: 1.0,
        max_market_order_volume: 30,
        min_market_order_volume: 1,
        max_limit_order_volume: 500,
        min_limit_order_volume: 1,
        ..Default::default()
    }
}

pub fn sample_table() -> Arc<ContractTable> {
    let mut table = ContractTable::new();
    table.insert(sample_contract("rb2009", "SHFE")).unwrap();
    table.insert(sample_contract("cu2007", "SHFE")).unwrap();
    Arc::new(table)
}

pub fn test_config() -> Config {
    Config {
        api: "ctp".to_string(),
        trade_server_address: "tcp://127.0.0.1:10201".to_string(),
        broker_id: "9999".to_string(),
        investor_id: TEST_INVESTOR.to_string(),
        password: "secret".to_string(),
        cancel_outstanding_orders_on_startup: false,
        ..Default::default()
    }
}

//==================================================================================================
pub type TradeApiFixture = (
    Arc<CtpTradeApi<RecordingWrapper>>,
    Arc<TestTraderApi>,
    Arc<Mutex<RecordingWrapper>>,
    Arc<ContractTable>,
);

pub fn trade_api_fixture() -> TradeApiFixture {
    let wrapper = Arc::new(Mutex::new(RecordingWrapper::new()));
    let api = Arc::new(TestTraderApi::new());
    let dyn_api: Arc<dyn TraderApi> = api.clone();
    let trade_api = CtpTradeApi::new(wrapper.clone(), dyn_api);
    let table = sample_table();
    trade_api.set_contract_table(table.clone());
    (trade_api, api, wrapper, table)
}

pub fn logged_in_fixture() -> TradeApiFixture {
    let fixture = trade_api_fixture();
    assert!(fixture.0.login(&test_config()));
    fixture
}

pub fn emissions(wrapper: &Arc<Mutex<RecordingWrapper>>) -> Vec<Emission> {
    wrapper.lock().unwrap().emissions.clone()
}

//==================================================================================================
pub fn order_req(volume: i32, price: f64) -> OrderReq {
    OrderReq {
        ticker_index: 0,
        direction: Direction::Buy,
        offset: Offset::Open,
        order_type: OrderType::Limit,
        volume,
        price,
        ..Default::default()
    }
}

pub fn instrument_field(ticker: &str, exchange: &str) -> InstrumentField {
    InstrumentField {
        instrument_id: ticker.to_string(),
        exchange_id: exchange.to_string(),
        instrument_name: ticker.as_bytes().to_vec(),
        product_class: CTP_PRODUCT_FUTURES,
        volume_multiple: 10,
        price_tick: 1.0,
        max_market_order_volume: 30,
        min_market_order_volume: 1,
        max_limit_order_volume: 500,
        min_limit_order_volume: 1,
        delivery_year: 2020,
        delivery_month: 9,
    }
}

/// Status report for a live order, in our own session.
pub fn order_status_field(
    order_ref: i32,
    submit_status: CtpSubmitStatus,
    order_status: CtpOrderStatus,
    original: i32,
    traded: i32,
) -> OrderField {
    OrderField {
        broker_id: "9999".to_string(),
        investor_id: TEST_INVESTOR.to_string(),
        instrument_id: "rb2009".to_string(),
        exchange_id: "SHFE".to_string(),
        order_ref: order_ref.to_string(),
        order_submit_status: submit_status as u8,
        order_status: order_status as u8,
        volume_total_original: original,
        volume_traded: traded,
        ..Default::default()
    }
}

/// An exchange-accepted, still-queueing status report.
pub fn accepted_status_field(order_ref: i32, original: i32) -> OrderField {
    order_status_field(
        order_ref,
        CtpSubmitStatus::Accepted,
        CtpOrderStatus::NoTradeQueueing,
        original,
        0,
    )
}

pub fn trade_field(order_ref: i32, volume: i32, price: f64) -> TradeField {
    TradeField {
        broker_id: "9999".to_string(),
        investor_id: TEST_INVESTOR.to_string(),
        instrument_id: "rb2009".to_string(),
        exchange_id: "SHFE".to_string(),
        order_ref: order_ref.to_string(),
        trade_id: "900001".to_string(),
        direction: CTP_DIRECTION_BUY,
        offset_flag: CTP_OFFSET_OPEN,
        price,
        volume,
        trade_time: "09:30:00".to_string(),
    }
}
