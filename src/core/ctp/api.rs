//! The seam to the vendor SDK.
//!
//! `TraderApi`/`MdApi` are the request surfaces the adapters drive and
//! `TraderSpi`/`MdSpi` the callback surfaces the adapters implement; a real
//! deployment binds them to the vendor library, tests and the demo bind them
//! to the scriptable fakes below. Request methods return 0 when the front
//! accepted the request, mirroring the vendor convention.
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::core::common::POISONED_MUTEX;
use crate::core::ctp::common::{
    DepthMarketDataField, InputOrderActionField, InputOrderField, InstrumentField,
    InstrumentMarginRateField, InvestorPositionField, OrderField, QryInstrumentField,
    QryInstrumentMarginRateField, QryInvestorPositionField, QryOrderField, QryTradeField,
    QryTradingAccountField, QrySettlementInfoField, ReqAuthenticateField, ReqUserLoginField,
    RspAuthenticateField, RspInfoField, RspUserLoginField, SettlementInfoConfirmField,
    SettlementInfoField, SpecificInstrumentField, TradeField, TradingAccountField,
    UserLogoutField,
};

//==================================================================================================
/// Trader-front request surface.
pub trait TraderApi: Send + Sync {
    fn register_spi(&self, spi: Arc<dyn TraderSpi>);

    /// Registers the front address and starts the vendor session machinery;
    /// completion is reported through `TraderSpi::on_front_connected`.
    fn connect(&self, front_addr: &str);

    fn req_authenticate(&self, req: &ReqAuthenticateField, req_id: i32) -> i32;

    fn req_user_login(&self, req: &ReqUserLoginField, req_id: i32) -> i32;

    fn req_user_logout(&self, req: &UserLogoutField, req_id: i32) -> i32;

    fn req_qry_settlement_info(&self, req: &QrySettlementInfoField, req_id: i32) -> i32;

    fn req_settlement_info_confirm(&self, req: &SettlementInfoConfirmField, req_id: i32) -> i32;

    fn req_order_insert(&self, req: &InputOrderField, req_id: i32) -> i32;

    fn req_order_action(&self, req: &InputOrderActionField, req_id: i32) -> i32;

    fn req_qry_instrument(&self, req: &QryInstrumentField, req_id: i32) -> i32;

    fn req_qry_investor_position(&self, req: &QryInvestorPositionField, req_id: i32) -> i32;

    fn req_qry_trading_account(&self, req: &QryTradingAccountField, req_id: i32) -> i32;

    fn req_qry_order(&self, req: &QryOrderField, req_id: i32) -> i32;

    fn req_qry_trade(&self, req: &QryTradeField, req_id: i32) -> i32;

    fn req_qry_instrument_margin_rate(&self, req: &QryInstrumentMarginRateField, req_id: i32)
        -> i32;
}

//==================================================================================================
/// Trader-front callback surface. Invoked from the vendor's threads; one
/// order's callbacks arrive serially, different orders may interleave.
pub trait TraderSpi: Send + Sync {
    fn on_front_connected(&self);

    fn on_front_disconnected(&self, reason: i32);

    fn on_heart_beat_warning(&self, time_lapse: i32);

    fn on_rsp_authenticate(
        &self,
        field: Option<&RspAuthenticateField>,
        rsp_info: Option<&RspInfoField>,
        req_id: i32,
        is_last: bool,
    );

    fn on_rsp_user_login(
        &self,
        field: Option<&RspUserLoginField>,
        rsp_info: Option<&RspInfoField>,
        req_id: i32,
        is_last: bool,
    );

    fn on_rsp_user_logout(
        &self,
        field: Option<&UserLogoutField>,
        rsp_info: Option<&RspInfoField>,
        req_id: i32,
        is_last: bool,
    );

    fn on_rsp_qry_settlement_info(
        &self,
        field: Option<&SettlementInfoField>,
        rsp_info: Option<&RspInfoField>,
        req_id: i32,
        is_last: bool,
    );

    fn on_rsp_settlement_info_confirm(
        &self,
        field: Option<&SettlementInfoConfirmField>,
        rsp_info: Option<&RspInfoField>,
        req_id: i32,
        is_last: bool,
    );

    /// Pre-broker validation failure of an order insert.
    fn on_rsp_order_insert(
        &self,
        field: Option<&InputOrderField>,
        rsp_info: Option<&RspInfoField>,
        req_id: i32,
        is_last: bool,
    );

    /// Cancel request rejected by the front.
    fn on_rsp_order_action(
        &self,
        field: Option<&InputOrderActionField>,
        rsp_info: Option<&RspInfoField>,
        req_id: i32,
        is_last: bool,
    );

    /// Order status report.
    fn on_rtn_order(&self, field: &OrderField);

    /// Trade (fill) report.
    fn on_rtn_trade(&self, field: &TradeField);

    fn on_rsp_qry_instrument(
        &self,
        field: Option<&InstrumentField>,
        rsp_info: Option<&RspInfoField>,
        req_id: i32,
        is_last: bool,
    );

    fn on_rsp_qry_investor_position(
        &self,
        field: Option<&InvestorPositionField>,
        rsp_info: Option<&RspInfoField>,
        req_id: i32,
        is_last: bool,
    );

    fn on_rsp_qry_trading_account(
        &self,
        field: Option<&TradingAccountField>,
        rsp_info: Option<&RspInfoField>,
        req_id: i32,
        is_last: bool,
    );

    fn on_rsp_qry_order(
        &self,
        field: Option<&OrderField>,
        rsp_info: Option<&RspInfoField>,
        req_id: i32,
        is_last: bool,
    );

    fn on_rsp_qry_trade(
        &self,
        field: Option<&TradeField>,
        rsp_info: Option<&RspInfoField>,
        req_id: i32,
        is_last: bool,
    );

    fn on_rsp_qry_instrument_margin_rate(
        &self,
        field: Option<&InstrumentMarginRateField>,
        rsp_info: Option<&RspInfoField>,
        req_id: i32,
        is_last: bool,
    );
}

//==================================================================================================
/// Market-data front request surface.
pub trait MdApi: Send + Sync {
    fn register_spi(&self, spi: Arc<dyn MdSpi>);

    fn connect(&self, front_addr: &str);

    fn req_user_login(&self, req: &ReqUserLoginField, req_id: i32) -> i32;

    fn req_user_logout(&self, req: &UserLogoutField, req_id: i32) -> i32;

    fn subscribe_market_data(&self, tickers: &[String]) -> i32;
}

/// Market-data callback surface.
pub trait MdSpi: Send + Sync {
    fn on_front_connected(&self);

    fn on_front_disconnected(&self, reason: i32);

    fn on_rsp_user_login(
        &self,
        field: Option<&RspUserLoginField>,
        rsp_info: Option<&RspInfoField>,
        req_id: i32,
        is_last: bool,
    );

    fn on_rsp_user_logout(
        &self,
        field: Option<&UserLogoutField>,
        rsp_info: Option<&RspInfoField>,
        req_id: i32,
        is_last: bool,
    );

    fn on_rsp_sub_market_data(
        &self,
        field: Option<&SpecificInstrumentField>,
        rsp_info: Option<&RspInfoField>,
        req_id: i32,
        is_last: bool,
    );

    fn on_rtn_depth_market_data(&self, field: &DepthMarketDataField);
}

//==================================================================================================
/// A login step the test front can be told to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoginStep {
    Connect,
    Authenticate,
    Login,
    SettlementQuery,
    SettlementConfirm,
    OrderQuery,
}

/// Requests recorded by `TestTraderApi`, in call order.
#[derive(Clone, Debug)]
pub enum TestRequest {
    Connect(String),
    Authenticate(ReqAuthenticateField),
    Login(ReqUserLoginField),
    Logout(UserLogoutField),
    QrySettlementInfo(QrySettlementInfoField),
    SettlementConfirm(SettlementInfoConfirmField),
    OrderInsert(InputOrderField),
    OrderAction(InputOrderActionField),
    QryInstrument(QryInstrumentField),
    QryPosition(QryInvestorPositionField),
    QryAccount(QryTradingAccountField),
    QryOrder(QryOrderField),
    QryTrade(QryTradeField),
    QryMarginRate(QryInstrumentMarginRateField),
}

//==================================================================================================
/// A scriptable in-process trader front.
///
/// Session and query requests are answered synchronously from canned data, so
/// a login handshake runs to completion on the calling thread. Order inserts
/// and cancels are only recorded; tests drive `on_rtn_order`/`on_rtn_trade`
/// themselves to exercise the state machine under chosen interleavings.
pub struct TestTraderApi {
    spi: Mutex<Option<Weak<dyn TraderSpi>>>,
    requests: Mutex<Vec<TestRequest>>,
    ret_code: AtomicI32,
    fail_step: Mutex<Option<LoginStep>>,
    login_rsp: Mutex<RspUserLoginField>,
    instruments: Mutex<Vec<InstrumentField>>,
    positions: Mutex<Vec<InvestorPositionField>>,
    account: Mutex<TradingAccountField>,
    trades: Mutex<Vec<TradeField>>,
    margin_rates: Mutex<Vec<InstrumentMarginRateField>>,
    outstanding_orders: Mutex<Vec<OrderField>>,
}

impl TestTraderApi {
    pub fn new() -> Self {
        TestTraderApi {
            spi: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
            ret_code: AtomicI32::new(0),
            fail_step: Mutex::new(None),
            login_rsp: Mutex::new(RspUserLoginField {
                trading_day: "20200901".to_string(),
                front_id: 1,
                session_id: 1,
                max_order_ref: "0".to_string(),
            }),
            instruments: Mutex::new(Vec::new()),
            positions: Mutex::new(Vec::new()),
            account: Mutex::new(TradingAccountField::default()),
            trades: Mutex::new(Vec::new()),
            margin_rates: Mutex::new(Vec::new()),
            outstanding_orders: Mutex::new(Vec::new()),
        }
    }

    //----------------------------------------------------------------------------------------------
    fn spi(&self) -> Option<Arc<dyn TraderSpi>> {
        self.spi
            .lock()
            .expect(POISONED_MUTEX)
            .as_ref()
            .and_then(|weak| weak.upgrade())
    }

    fn record(&self, request: TestRequest) {
        self.requests.lock().expect(POISONED_MUTEX).push(request);
    }

    fn fails_at(&self, step: LoginStep) -> bool {
        *self.fail_step.lock().expect(POISONED_MUTEX) == Some(step)
    }

    fn error_rsp() -> RspInfoField {
        RspInfoField {
            error_id: 3,
            error_msg: b"rejected by test front".to_vec(),
        }
    }

    //----------------------------------------------------------------------------------------------
    // Scripting knobs.

    /// Makes every subsequent request return this code (-1 simulates a front
    /// that refuses the request outright).
    pub fn set_ret_code(&self, code: i32) {
        self.ret_code.store(code, Ordering::Release);
    }

    pub fn set_fail_step(&self, step: Option<LoginStep>) {
        *self.fail_step.lock().expect(POISONED_MUTEX) = step;
    }

    pub fn set_max_order_ref(&self, max_order_ref: &str) {
        self.login_rsp.lock().expect(POISONED_MUTEX).max_order_ref = max_order_ref.to_string();
    }

    pub fn set_instruments(&self, instruments: Vec<InstrumentField>) {
        *self.instruments.lock().expect(POISONED_MUTEX) = instruments;
    }

    pub fn set_positions(&self, positions: Vec<InvestorPositionField>) {
        *self.positions.lock().expect(POISONED_MUTEX) = positions;
    }

    pub fn set_account(&self, account: TradingAccountField) {
        *self.account.lock().expect(POISONED_MUTEX) = account;
    }

    pub fn set_trades(&self, trades: Vec<TradeField>) {
        *self.trades.lock().expect(POISONED_MUTEX) = trades;
    }

    pub fn set_margin_rates(&self, rates: Vec<InstrumentMarginRateField>) {
        *self.margin_rates.lock().expect(POISONED_MUTEX) = rates;
    }

    pub fn set_outstanding_orders(&self, orders: Vec<OrderField>) {
        *self.outstanding_orders.lock().expect(POISONED_MUTEX) = orders;
    }

    //----------------------------------------------------------------------------------------------
    // Inspection.

    pub fn requests(&self) -> Vec<TestRequest> {
        self.requests.lock().expect(POISONED_MUTEX).clone()
    }

    pub fn order_inserts(&self) -> Vec<InputOrderField> {
        self.requests
            .lock()
            .expect(POISONED_MUTEX)
            .iter()
            .filter_map(|r| match r {
                TestRequest::OrderInsert(field) => Some(field.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn order_actions(&self) -> Vec<InputOrderActionField> {
        self.requests
            .lock()
            .expect(POISONED_MUTEX)
            .iter()
            .filter_map(|r| match r {
                TestRequest::OrderAction(field) => Some(field.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Default for TestTraderApi {
    fn default() -> Self {
        TestTraderApi::new()
    }
}

impl TraderApi for TestTraderApi {
    fn register_spi(&self, spi: Arc<dyn TraderSpi>) {
        *self.spi.lock().expect(POISONED_MUTEX) = Some(Arc::downgrade(&spi));
    }

    fn connect(&self, front_addr: &str) {
        self.record(TestRequest::Connect(front_addr.to_string()));
        if let Some(spi) = self.spi() {
            if self.fails_at(LoginStep::Connect) {
                spi.on_front_disconnected(0x1001);
            } else {
                spi.on_front_connected();
            }
        }
    }

    fn req_authenticate(&self, req: &ReqAuthenticateField, req_id: i32) -> i32 {
        self.record(TestRequest::Authenticate(req.clone()));
        let ret = self.ret_code.load(Ordering::Acquire);
        if ret != 0 {
            return ret;
        }
        if let Some(spi) = self.spi() {
            if self.fails_at(LoginStep::Authenticate) {
                spi.on_rsp_authenticate(None, Some(&Self::error_rsp()), req_id, true);
            } else {
                let rsp = RspAuthenticateField {
                    broker_id: req.broker_id.clone(),
                    user_id: req.user_id.clone(),
                    app_id: req.app_id.clone(),
                };
                spi.on_rsp_authenticate(Some(&rsp), None, req_id, true);
            }
        }
        0
    }

    fn req_user_login(&self, req: &ReqUserLoginField, req_id: i32) -> i32 {
        self.record(TestRequest::Login(req.clone()));
        let ret = self.ret_code.load(Ordering::Acquire);
        if ret != 0 {
            return ret;
        }
        if let Some(spi) = self.spi() {
            if self.fails_at(LoginStep::Login) {
                spi.on_rsp_user_login(None, Some(&Self::error_rsp()), req_id, true);
            } else {
                let rsp = self.login_rsp.lock().expect(POISONED_MUTEX).clone();
                spi.on_rsp_user_login(Some(&rsp), None, req_id, true);
            }
        }
        0
    }

    fn req_user_logout(&self, req: &UserLogoutField, req_id: i32) -> i32 {
        self.record(TestRequest::Logout(req.clone()));
        let ret = self.ret_code.load(Ordering::Acquire);
        if ret != 0 {
            return ret;
        }
        if let Some(spi) = self.spi() {
            spi.on_rsp_user_logout(Some(req), None, req_id, true);
        }
        0
    }

    fn req_qry_settlement_info(&self, req: &QrySettlementInfoField, req_id: i32) -> i32 {
        self.record(TestRequest::QrySettlementInfo(req.clone()));
        let ret = self.ret_code.load(Ordering::Acquire);
        if ret != 0 {
            return ret;
        }
        if let Some(spi) = self.spi() {
            if self.fails_at(LoginStep::SettlementQuery) {
                spi.on_rsp_qry_settlement_info(None, Some(&Self::error_rsp()), req_id, true);
            } else {
                // Settlement content is paged by real fronts; replay that.
                let first = SettlementInfoField {
                    trading_day: "20200901".to_string(),
                    content: b"settlement ".to_vec(),
                };
                let last = SettlementInfoField {
                    trading_day: "20200901".to_string(),
                    content: b"statement".to_vec(),
                };
                spi.on_rsp_qry_settlement_info(Some(&first), None, req_id, false);
                spi.on_rsp_qry_settlement_info(Some(&last), None, req_id, true);
            }
        }
        0
    }

    fn req_settlement_info_confirm(&self, req: &SettlementInfoConfirmField, req_id: i32) -> i32 {
        self.record(TestRequest::SettlementConfirm(req.clone()));
        let ret = self.ret_code.load(Ordering::Acquire);
        if ret != 0 {
            return ret;
        }
        if let Some(spi) = self.spi() {
            if self.fails_at(LoginStep::SettlementConfirm) {
                spi.on_rsp_settlement_info_confirm(None, Some(&Self::error_rsp()), req_id, true);
            } else {
                spi.on_rsp_settlement_info_confirm(Some(req), None, req_id, true);
            }
        }
        0
    }

    fn req_order_insert(&self, req: &InputOrderField, _req_id: i32) -> i32 {
        self.record(TestRequest::OrderInsert(req.clone()));
        self.ret_code.load(Ordering::Acquire)
    }

    fn req_order_action(&self, req: &InputOrderActionField, _req_id: i32) -> i32 {
        self.record(TestRequest::OrderAction(req.clone()));
        self.ret_code.load(Ordering::Acquire)
    }

    fn req_qry_instrument(&self, req: &QryInstrumentField, req_id: i32) -> i32 {
        self.record(TestRequest::QryInstrument(req.clone()));
        let ret = self.ret_code.load(Ordering::Acquire);
        if ret != 0 {
            return ret;
        }
        if let Some(spi) = self.spi() {
            let instruments: Vec<InstrumentField> = self
                .instruments
                .lock()
                .expect(POISONED_MUTEX)
                .iter()
                .filter(|i| req.instrument_id.is_empty() || i.instrument_id == req.instrument_id)
                .cloned()
                .collect();
            if instruments.is_empty() {
                spi.on_rsp_qry_instrument(None, None, req_id, true);
            } else {
                let last = instruments.len() - 1;
                for (i, instrument) in instruments.iter().enumerate() {
                    spi.on_rsp_qry_instrument(Some(instrument), None, req_id, i == last);
                }
            }
        }
        0
    }

    fn req_qry_investor_position(&self, req: &QryInvestorPositionField, req_id: i32) -> i32 {
        self.record(TestRequest::QryPosition(req.clone()));
        let ret = self.ret_code.load(Ordering::Acquire);
        if ret != 0 {
            return ret;
        }
        if let Some(spi) = self.spi() {
            let positions = self.positions.lock().expect(POISONED_MUTEX).clone();
            if positions.is_empty() {
                spi.on_rsp_qry_investor_position(None, None, req_id, true);
            } else {
                let last = positions.len() - 1;
                for (i, position) in positions.iter().enumerate() {
                    spi.on_rsp_qry_investor_position(Some(position), None, req_id, i == last);
                }
            }
        }
        0
    }

    fn req_qry_trading_account(&self, req: &QryTradingAccountField, req_id: i32) -> i32 {
        self.record(TestRequest::QryAccount(req.clone()));
        let ret = self.ret_code.load(Ordering::Acquire);
        if ret != 0 {
            return ret;
        }
        if let Some(spi) = self.spi() {
            let account = self.account.lock().expect(POISONED_MUTEX).clone();
            spi.on_rsp_qry_trading_account(Some(&account), None, req_id, true);
        }
        0
    }

    fn req_qry_order(&self, req: &QryOrderField, req_id: i32) -> i32 {
        self.record(TestRequest::QryOrder(req.clone()));
        let ret = self.ret_code.load(Ordering::Acquire);
        if ret != 0 {
            return ret;
        }
        if let Some(spi) = self.spi() {
            if self.fails_at(LoginStep::OrderQuery) {
                spi.on_rsp_qry_order(None, Some(&Self::error_rsp()), req_id, true);
                return 0;
            }
            let orders = self.outstanding_orders.lock().expect(POISONED_MUTEX).clone();
            if orders.is_empty() {
                spi.on_rsp_qry_order(None, None, req_id, true);
            } else {
                let last = orders.len() - 1;
                for (i, order) in orders.iter().enumerate() {
                    spi.on_rsp_qry_order(Some(order), None, req_id, i == last);
                }
            }
        }
        0
    }

    fn req_qry_trade(&self, req: &QryTradeField, req_id: i32) -> i32 {
        self.record(TestRequest::QryTrade(req.clone()));
        let ret = self.ret_code.load(Ordering::Acquire);
        if ret != 0 {
            return ret;
        }
        if let Some(spi) = self.spi() {
            let trades = self.trades.lock().expect(POISONED_MUTEX).clone();
            if trades.is_empty() {
                spi.on_rsp_qry_trade(None, None, req_id, true);
            } else {
                let last = trades.len() - 1;
                for (i, trade) in trades.iter().enumerate() {
                    spi.on_rsp_qry_trade(Some(trade), None, req_id, i == last);
                }
            }
        }
        0
    }

    fn req_qry_instrument_margin_rate(
        &self,
        req: &QryInstrumentMarginRateField,
        req_id: i32,
    ) -> i32 {
        self.record(TestRequest::QryMarginRate(req.clone()));
        let ret = self.ret_code.load(Ordering::Acquire);
        if ret != 0 {
            return ret;
        }
        if let Some(spi) = self.spi() {
            let rates: Vec<InstrumentMarginRateField> = self
                .margin_rates
                .lock()
                .expect(POISONED_MUTEX)
                .iter()
                .filter(|r| req.instrument_id.is_empty() || r.instrument_id == req.instrument_id)
                .cloned()
                .collect();
            if rates.is_empty() {
                spi.on_rsp_qry_instrument_margin_rate(None, None, req_id, true);
            } else {
                let last = rates.len() - 1;
                for (i, rate) in rates.iter().enumerate() {
                    spi.on_rsp_qry_instrument_margin_rate(Some(rate), None, req_id, i == last);
                }
            }
        }
        0
    }
}

//==================================================================================================
/// A scriptable in-process market-data front.
pub struct TestMdApi {
    spi: Mutex<Option<Weak<dyn MdSpi>>>,
    subscriptions: Mutex<Vec<String>>,
    fail_login: AtomicI32,
}

impl TestMdApi {
    pub fn new() -> Self {
        TestMdApi {
            spi: Mutex::new(None),
            subscriptions: Mutex::new(Vec::new()),
            fail_login: AtomicI32::new(0),
        }
    }

    fn spi(&self) -> Option<Arc<dyn MdSpi>> {
        self.spi
            .lock()
            .expect(POISONED_MUTEX)
            .as_ref()
            .and_then(|weak| weak.upgrade())
    }

    pub fn set_fail_login(&self, fail: bool) {
        self.fail_login.store(fail as i32, Ordering::Release);
    }

    pub fn subscriptions(&self) -> Vec<String> {
        self.subscriptions.lock().expect(POISONED_MUTEX).clone()
    }

    /// Drives a tick through the registered SPI.
    pub fn push_tick(&self, md: &DepthMarketDataField) {
        if let Some(spi) = self.spi() {
            spi.on_rtn_depth_market_data(md);
        }
    }
}

impl Default for TestMdApi {
    fn default() -> Self {
        TestMdApi::new()
    }
}

impl MdApi for TestMdApi {
    fn register_spi(&self, spi: Arc<dyn MdSpi>) {
        *self.spi.lock().expect(POISONED_MUTEX) = Some(Arc::downgrade(&spi));
    }

    fn connect(&self, _front_addr: &str) {
        if let Some(spi) = self.spi() {
            spi.on_front_connected();
        }
    }

    fn req_user_login(&self, _req: &ReqUserLoginField, req_id: i32) -> i32 {
        if let Some(spi) = self.spi() {
            if self.fail_login.load(Ordering::Acquire) != 0 {
                let rsp = RspInfoField {
                    error_id: 3,
                    error_msg: b"md login rejected".to_vec(),
                };
                spi.on_rsp_user_login(None, Some(&rsp), req_id, true);
            } else {
                spi.on_rsp_user_login(Some(&RspUserLoginField::default()), None, req_id, true);
            }
        }
        0
    }

    fn req_user_logout(&self, req: &UserLogoutField, req_id: i32) -> i32 {
        if let Some(spi) = self.spi() {
            spi.on_rsp_user_logout(Some(req), None, req_id, true);
        }
        0
    }

    fn subscribe_market_data(&self, tickers: &[String]) -> i32 {
        self.subscriptions
            .lock()
            .expect(POISONED_MUTEX)
            .extend_from_slice(tickers);
        if let Some(spi) = self.spi() {
            let last = tickers.len().saturating_sub(1);
            for (i, ticker) in tickers.iter().enumerate() {
                let field = SpecificInstrumentField {
                    instrument_id: ticker.clone(),
                };
                spi.on_rsp_sub_market_data(Some(&field), None, 0, i == last);
            }
        }
        0
    }
}
