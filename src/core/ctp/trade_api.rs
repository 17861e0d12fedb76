//! The trader-front adapter: session bootstrap, the per-order state machine
//! and the synchronous queries.
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;
use std::time::Duration;

use log::*;
use num_traits::FromPrimitive;

use crate::core::common::{Account, OrderReq, OrderType, Position, Trade, POISONED_MUTEX};
use crate::core::config::Config;
use crate::core::contract::{Contract, ContractTable};
use crate::core::ctp::api::{TraderApi, TraderSpi};
use crate::core::ctp::common::{
    from_ctp_direction, from_ctp_offset, from_ctp_product_class, gb2312_to_utf8, is_error_rsp,
    parse_order_ref, rsp_error_msg, to_ctp_direction, to_ctp_offset, to_ctp_price_type,
    CtpOrderStatus, CtpSubmitStatus, InputOrderActionField, InputOrderField, InstrumentField,
    InstrumentMarginRateField, InvestorPositionField, OrderField, QryInstrumentField,
    QryInstrumentMarginRateField, QryInvestorPositionField, QryOrderField, QryTradeField,
    QryTradingAccountField, QrySettlementInfoField, ReqAuthenticateField, ReqUserLoginField,
    RspAuthenticateField, RspInfoField, RspUserLoginField, SettlementInfoConfirmField,
    SettlementInfoField, TradeField, TradingAccountField, UserLogoutField, CTP_AF_DELETE,
    CTP_CC_IMMEDIATELY, CTP_FCC_NOT_FORCE_CLOSE, CTP_HF_SPECULATION, CTP_POSI_DIRECTION_LONG,
    CTP_TC_GFD, CTP_TC_IOC, CTP_VC_ANY, CTP_VC_COMPLETE,
};
use crate::core::ctp::sync::SyncSignal;
use crate::core::wrapper::Wrapper;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const QUERY_TIMEOUT: Duration = Duration::from_secs(5);
/// Grace period after the startup sweep, letting cancel terminals drain
/// before the session is declared live.
const SWEEP_DRAIN: Duration = Duration::from_secs(1);

//==================================================================================================
/// Book-keeping for one live order, keyed by its `order_ref`. Created inside
/// `send_order` under the order-table lock, mutated only under that lock,
/// erased once `traded_vol + canceled_vol` covers `original_vol`.
struct OrderDetail {
    ticker_index: u32,
    original_vol: i32,
    traded_vol: i32,
    canceled_vol: i32,
    accepted_ack: bool,
}

//==================================================================================================
/// Client-side driver of a CTP-style trader front.
///
/// Converts the front's independent streams of insert rejects, status
/// reports, trade reports and cancel acks into the `Wrapper` stream, where a
/// live order gets one `on_order_accepted`, any number of `on_order_traded`
/// and at most one terminal. All SPI methods run on the vendor's callback
/// threads; the order table lock is always released before a wrapper call.
pub struct CtpTradeApi<W: Wrapper> {
    wrapper: Arc<Mutex<W>>,
    api: Arc<dyn TraderApi>,
    table: OnceLock<Arc<ContractTable>>,

    front_addr: Mutex<String>,
    broker_id: Mutex<String>,
    investor_id: Mutex<String>,

    front_id: AtomicI32,
    session_id: AtomicI32,
    next_req_id: AtomicI32,
    next_order_ref: AtomicI32,

    is_error: AtomicBool,
    is_connected: AtomicBool,
    is_logon: AtomicBool,

    conn_signal: SyncSignal,
    query_signal: SyncSignal,
    /// At most one outstanding query (or the login handshake) at a time.
    query_mutex: Mutex<()>,
    order_details: Mutex<HashMap<i32, OrderDetail>>,
    pos_cache: Mutex<HashMap<u32, Position>>,
}

impl<W: Wrapper> CtpTradeApi<W> {
    pub fn new(wrapper: Arc<Mutex<W>>, api: Arc<dyn TraderApi>) -> Arc<Self> {
        let me = Arc::new(CtpTradeApi {
            wrapper,
            api: api.clone(),
            table: OnceLock::new(),
            front_addr: Mutex::new(String::new()),
            broker_id: Mutex::new(String::new()),
            investor_id: Mutex::new(String::new()),
            front_id: AtomicI32::new(0),
            session_id: AtomicI32::new(0),
            next_req_id: AtomicI32::new(0),
            next_order_ref: AtomicI32::new(1),
            is_error: AtomicBool::new(false),
            is_connected: AtomicBool::new(false),
            is_logon: AtomicBool::new(false),
            conn_signal: SyncSignal::new(),
            query_signal: SyncSignal::new(),
            query_mutex: Mutex::new(()),
            order_details: Mutex::new(HashMap::new()),
            pos_cache: Mutex::new(HashMap::new()),
        });
        let spi: Arc<dyn TraderSpi> = me.clone();
        api.register_spi(spi);
        me
    }

    //----------------------------------------------------------------------------------------------
    pub fn set_contract_table(&self, table: Arc<ContractTable>) {
        if self.table.set(table).is_err() {
            warn!("contract table already set, ignoring");
        }
    }

    pub fn is_logon(&self) -> bool {
        self.is_logon.load(Ordering::Acquire)
    }

    /// Number of orders currently tracked by the state machine.
    pub fn live_order_count(&self) -> usize {
        self.order_details.lock().expect(POISONED_MUTEX).len()
    }

    //----------------------------------------------------------------------------------------------
    fn next_req_id(&self) -> i32 {
        self.next_req_id.fetch_add(1, Ordering::AcqRel)
    }

    fn next_order_ref(&self) -> i32 {
        self.next_order_ref.fetch_add(1, Ordering::AcqRel)
    }

    fn broker_id(&self) -> String {
        self.broker_id.lock().expect(POISONED_MUTEX).clone()
    }

    fn investor_id(&self) -> String {
        self.investor_id.lock().expect(POISONED_MUTEX).clone()
    }

    fn done(&self) {
        self.query_signal.done();
    }

    fn error(&self) {
        self.is_error.store(true, Ordering::Release);
        self.query_signal.error();
    }

    fn wait_sync(&self) -> bool {
        self.query_signal.wait(QUERY_TIMEOUT)
    }

    fn reset(&self) {
        self.is_error.store(false, Ordering::Release);
        self.is_connected.store(false, Ordering::Release);
        self.is_logon.store(false, Ordering::Release);
        self.front_id.store(0, Ordering::Release);
        self.session_id.store(0, Ordering::Release);
        self.next_req_id.store(0, Ordering::Release);
        self.next_order_ref.store(1, Ordering::Release);
        self.order_details.lock().expect(POISONED_MUTEX).clear();
        self.pos_cache.lock().expect(POISONED_MUTEX).clear();
        self.conn_signal.reset();
        self.query_signal.reset();
    }

    //----------------------------------------------------------------------------------------------
    /// Runs the session handshake: connect, authenticate (when an auth code
    /// is configured), login, settlement query + confirm, then the optional
    /// sweep of outstanding orders. Any failed step aborts with `false` and
    /// no session state.
    pub fn login(&self, config: &Config) -> bool {
        let _query_lock = self.query_mutex.lock().expect(POISONED_MUTEX);
        if self.is_logon.load(Ordering::Acquire) {
            error!("login failed: do not login twice");
            return false;
        }

        self.reset();
        *self.front_addr.lock().expect(POISONED_MUTEX) = config.trade_server_address.clone();
        *self.broker_id.lock().expect(POISONED_MUTEX) = config.broker_id.clone();
        *self.investor_id.lock().expect(POISONED_MUTEX) = config.investor_id.clone();

        self.conn_signal.reset();
        self.api.connect(&config.trade_server_address);
        if !self.conn_signal.wait(CONNECT_TIMEOUT) {
            error!(
                "login failed: cannot connect to trader front {}",
                config.trade_server_address
            );
            return false;
        }

        if !config.auth_code.is_empty() {
            let auth_req = ReqAuthenticateField {
                broker_id: config.broker_id.clone(),
                user_id: config.investor_id.clone(),
                auth_code: config.auth_code.clone(),
                app_id: config.app_id.clone(),
            };
            self.query_signal.reset();
            if self.api.req_authenticate(&auth_req, self.next_req_id()) != 0 {
                error!("login failed: authenticate request refused");
                return false;
            }
            if !self.wait_sync() {
                error!("login failed: authentication rejected");
                return false;
            }
        }

        let login_req = ReqUserLoginField {
            broker_id: config.broker_id.clone(),
            user_id: config.investor_id.clone(),
            password: config.password.clone(),
        };
        self.query_signal.reset();
        if self.api.req_user_login(&login_req, self.next_req_id()) != 0 {
            error!("login failed: login request refused");
            return false;
        }
        if !self.wait_sync() {
            error!("login failed: user login rejected");
            return false;
        }

        let settlement_req = QrySettlementInfoField {
            broker_id: config.broker_id.clone(),
            investor_id: config.investor_id.clone(),
        };
        self.query_signal.reset();
        if self.api.req_qry_settlement_info(&settlement_req, self.next_req_id()) != 0 {
            error!("login failed: settlement query request refused");
            return false;
        }
        if !self.wait_sync() {
            error!("login failed: settlement query rejected");
            return false;
        }

        let confirm_req = SettlementInfoConfirmField {
            broker_id: config.broker_id.clone(),
            investor_id: config.investor_id.clone(),
        };
        self.query_signal.reset();
        if self.api.req_settlement_info_confirm(&confirm_req, self.next_req_id()) != 0 {
            error!("login failed: settlement confirm request refused");
            return false;
        }
        if !self.wait_sync() {
            error!("login failed: settlement confirm rejected");
            return false;
        }

        if config.cancel_outstanding_orders_on_startup {
            debug!("sweeping outstanding orders on startup");
            let qry_req = QryOrderField {
                broker_id: config.broker_id.clone(),
                investor_id: config.investor_id.clone(),
            };
            self.query_signal.reset();
            if self.api.req_qry_order(&qry_req, self.next_req_id()) != 0 {
                error!("login failed: order query request refused");
                return false;
            }
            if !self.wait_sync() {
                error!("login failed: order query rejected");
                return false;
            }

            thread::sleep(SWEEP_DRAIN);
        }

        self.is_logon.store(true, Ordering::Release);
        true
    }

    //----------------------------------------------------------------------------------------------
    /// Sends the logout request and waits for the ack, which clears the
    /// session state.
    pub fn logout(&self) {
        if !self.is_logon.load(Ordering::Acquire) {
            return;
        }
        let req = UserLogoutField {
            broker_id: self.broker_id(),
            user_id: self.investor_id(),
        };
        self.query_signal.reset();
        if self.api.req_user_logout(&req, self.next_req_id()) != 0 {
            error!("logout request refused");
            return;
        }
        if !self.wait_sync() {
            warn!("logout: no ack from the front");
        }
    }

    //----------------------------------------------------------------------------------------------
    /// Dispatches an order and returns its `order_ref`, or 0 when nothing was
    /// sent. Non-blocking: the order's fate arrives through the wrapper.
    pub fn send_order(&self, order: &OrderReq) -> u64 {
        if !self.is_logon.load(Ordering::Acquire) {
            error!("send_order failed: not logged in");
            return 0;
        }
        let table = match self.table.get() {
            Some(table) => table,
            None => {
                error!("send_order failed: contract table not set");
                return 0;
            }
        };
        let contract = match table.get_by_index(order.ticker_index) {
            Some(contract) => contract,
            None => {
                error!(
                    "send_order failed: contract not found, index {}",
                    order.ticker_index
                );
                return 0;
            }
        };

        let order_ref = self.next_order_ref();
        let mut req = InputOrderField {
            broker_id: self.broker_id(),
            investor_id: self.investor_id(),
            instrument_id: contract.ticker.clone(),
            exchange_id: contract.exchange.clone(),
            order_ref: order_ref.to_string(),
            order_price_type: to_ctp_price_type(order.order_type),
            direction: to_ctp_direction(order.direction),
            comb_offset_flag: to_ctp_offset(order.offset),
            comb_hedge_flag: CTP_HF_SPECULATION,
            limit_price: order.price,
            volume_total_original: order.volume,
            min_volume: 1,
            contingent_condition: CTP_CC_IMMEDIATELY,
            force_close_reason: CTP_FCC_NOT_FORCE_CLOSE,
            is_auto_suspend: 0,
            user_force_close: 0,
            ..Default::default()
        };
        match order.order_type {
            OrderType::Fak => {
                req.time_condition = CTP_TC_IOC;
                req.volume_condition = CTP_VC_ANY;
            }
            OrderType::Fok => {
                req.time_condition = CTP_TC_IOC;
                req.volume_condition = CTP_VC_COMPLETE;
            }
            _ => {
                req.time_condition = CTP_TC_GFD;
                req.volume_condition = CTP_VC_ANY;
            }
        }

        // The lock spans the vendor call and the insert so no callback for
        // this ref can run before its detail exists.
        let mut details = self.order_details.lock().expect(POISONED_MUTEX);
        if self.api.req_order_insert(&req, self.next_req_id()) != 0 {
            error!("send_order failed: order insert request refused");
            return 0;
        }
        details.insert(
            order_ref,
            OrderDetail {
                ticker_index: order.ticker_index,
                original_vol: order.volume,
                traded_vol: 0,
                canceled_vol: 0,
                accepted_ack: false,
            },
        );
        drop(details);

        debug!(
            "order sent: ref {}, {} {} {} {}@{:.3}",
            order_ref, contract.ticker, order.direction, order.offset, order.volume, order.price
        );
        order_ref as u64
    }

    //----------------------------------------------------------------------------------------------
    /// Requests cancellation. Only orders already accepted by the exchange
    /// can be canceled.
    pub fn cancel_order(&self, order_id: u64) -> bool {
        if !self.is_logon.load(Ordering::Acquire) {
            return false;
        }
        let order_ref = order_id as i32;

        let ticker_index = {
            let details = self.order_details.lock().expect(POISONED_MUTEX);
            match details.get(&order_ref) {
                None => {
                    error!("cancel_order failed: unknown order ref {}", order_ref);
                    return false;
                }
                Some(detail) => {
                    if !detail.accepted_ack {
                        error!(
                            "cancel_order failed: order {} not yet accepted by the exchange",
                            order_ref
                        );
                        return false;
                    }
                    detail.ticker_index
                }
            }
        };

        let (ticker, exchange) = match self
            .table
            .get()
            .and_then(|table| table.get_by_index(ticker_index))
        {
            Some(contract) => (contract.ticker.clone(), contract.exchange.clone()),
            None => {
                error!(
                    "cancel_order failed: contract not found, index {}",
                    ticker_index
                );
                return false;
            }
        };

        let req = InputOrderActionField {
            broker_id: self.broker_id(),
            investor_id: self.investor_id(),
            instrument_id: ticker,
            exchange_id: exchange,
            order_ref: order_ref.to_string(),
            action_flag: CTP_AF_DELETE,
            front_id: self.front_id.load(Ordering::Acquire),
            session_id: self.session_id.load(Ordering::Acquire),
            ..Default::default()
        };
        if self.api.req_order_action(&req, self.next_req_id()) != 0 {
            error!("cancel_order failed: order action request refused");
            return false;
        }
        true
    }

    //----------------------------------------------------------------------------------------------
    /// Streams every matching instrument through `on_query_contract`.
    pub fn query_contract(&self, ticker: &str, exchange: &str) -> bool {
        if !self.is_logon.load(Ordering::Acquire) {
            return false;
        }
        let req = QryInstrumentField {
            instrument_id: ticker.to_string(),
            exchange_id: exchange.to_string(),
        };
        let _query_lock = self.query_mutex.lock().expect(POISONED_MUTEX);
        self.query_signal.reset();
        if self.api.req_qry_instrument(&req, self.next_req_id()) != 0 {
            error!("query_contract failed: request refused");
            return false;
        }
        self.wait_sync()
    }

    pub fn query_contracts(&self) -> bool {
        self.query_contract("", "")
    }

    //----------------------------------------------------------------------------------------------
    pub fn query_position(&self, ticker: &str) -> bool {
        if !self.is_logon.load(Ordering::Acquire) {
            return false;
        }
        let mut req = QryInvestorPositionField {
            broker_id: self.broker_id(),
            investor_id: self.investor_id(),
            ..Default::default()
        };
        if !ticker.is_empty() {
            match self
                .table
                .get()
                .and_then(|table| table.get_by_ticker(ticker))
            {
                Some(contract) => {
                    req.instrument_id = contract.ticker.clone();
                    req.exchange_id = contract.exchange.clone();
                }
                None => {
                    error!("query_position failed: contract not found: {}", ticker);
                    return false;
                }
            }
        }
        let _query_lock = self.query_mutex.lock().expect(POISONED_MUTEX);
        self.query_signal.reset();
        if self.api.req_qry_investor_position(&req, self.next_req_id()) != 0 {
            error!("query_position failed: request refused");
            return false;
        }
        self.wait_sync()
    }

    pub fn query_positions(&self) -> bool {
        self.query_position("")
    }

    //----------------------------------------------------------------------------------------------
    pub fn query_account(&self) -> bool {
        if !self.is_logon.load(Ordering::Acquire) {
            return false;
        }
        let req = QryTradingAccountField {
            broker_id: self.broker_id(),
            investor_id: self.investor_id(),
        };
        let _query_lock = self.query_mutex.lock().expect(POISONED_MUTEX);
        self.query_signal.reset();
        if self.api.req_qry_trading_account(&req, self.next_req_id()) != 0 {
            error!("query_account failed: request refused");
            return false;
        }
        self.wait_sync()
    }

    //----------------------------------------------------------------------------------------------
    pub fn query_trades(&self) -> bool {
        if !self.is_logon.load(Ordering::Acquire) {
            return false;
        }
        let req = QryTradeField {
            broker_id: self.broker_id(),
            investor_id: self.investor_id(),
        };
        let _query_lock = self.query_mutex.lock().expect(POISONED_MUTEX);
        self.query_signal.reset();
        if self.api.req_qry_trade(&req, self.next_req_id()) != 0 {
            error!("query_trades failed: request refused");
            return false;
        }
        self.wait_sync()
    }

    //----------------------------------------------------------------------------------------------
    /// Refreshes the margin rates stored beside the contract table.
    pub fn query_margin_rate(&self, ticker: &str) -> bool {
        if !self.is_logon.load(Ordering::Acquire) {
            return false;
        }
        let mut req = QryInstrumentMarginRateField {
            broker_id: self.broker_id(),
            investor_id: self.investor_id(),
            hedge_flag: CTP_HF_SPECULATION,
            ..Default::default()
        };
        if !ticker.is_empty() {
            match self
                .table
                .get()
                .and_then(|table| table.get_by_ticker(ticker))
            {
                Some(contract) => {
                    req.instrument_id = contract.ticker.clone();
                    req.exchange_id = contract.exchange.clone();
                }
                None => {
                    error!("query_margin_rate failed: contract not found: {}", ticker);
                    return false;
                }
            }
        }
        let _query_lock = self.query_mutex.lock().expect(POISONED_MUTEX);
        self.query_signal.reset();
        if self.api.req_qry_instrument_margin_rate(&req, self.next_req_id()) != 0 {
            error!("query_margin_rate failed: request refused");
            return false;
        }
        self.wait_sync()
    }

    //----------------------------------------------------------------------------------------------
    /// Folds one position record into the per-ticker cache. Records for the
    /// long and short leg of the same instrument arrive separately; each pass
    /// replaces the leg it describes.
    fn cache_position_record(&self, position: &InvestorPositionField) {
        let contract = match self
            .table
            .get()
            .and_then(|table| table.get_by_ticker(&position.instrument_id))
        {
            Some(contract) => contract,
            None => {
                error!(
                    "position record for unknown contract {}",
                    position.instrument_id
                );
                return;
            }
        };

        let mut cache = self.pos_cache.lock().expect(POISONED_MUTEX);
        let pos = cache.entry(contract.index).or_insert_with(|| Position {
            ticker_index: contract.index,
            ..Default::default()
        });

        let is_long = position.posi_direction == CTP_POSI_DIRECTION_LONG;
        let detail = if is_long {
            &mut pos.long_pos
        } else {
            &mut pos.short_pos
        };
        detail.holdings = position.position;
        detail.yd_holdings = position.position - position.today_position;
        detail.float_pnl = position.position_profit;
        detail.frozen = if is_long {
            position.long_frozen
        } else {
            position.short_frozen
        };
        if detail.holdings > 0 && contract.size > 0 {
            detail.cost_price =
                position.position_cost / (detail.holdings as f64 * contract.size as f64);
        }
    }

    //----------------------------------------------------------------------------------------------
    fn emit_trade_record(&self, trade: &TradeField) {
        let ticker_index = match self
            .table
            .get()
            .and_then(|table| table.get_by_ticker(&trade.instrument_id))
        {
            Some(contract) => contract.index,
            None => {
                warn!("trade record for unknown contract {}", trade.instrument_id);
                return;
            }
        };
        let direction = match from_ctp_direction(trade.direction) {
            Some(direction) => direction,
            None => {
                warn!("trade record with bad direction code {:#x}", trade.direction);
                return;
            }
        };
        let offset = match from_ctp_offset(trade.offset_flag) {
            Some(offset) => offset,
            None => {
                warn!("trade record with bad offset code {:#x}", trade.offset_flag);
                return;
            }
        };

        let td = Trade {
            ticker_index,
            direction,
            offset,
            volume: trade.volume,
            price: trade.price,
        };
        self.wrapper
            .lock()
            .expect(POISONED_MUTEX)
            .on_query_trade(&td);
    }
}

//==================================================================================================
impl<W: Wrapper> TraderSpi for CtpTradeApi<W> {
    fn on_front_connected(&self) {
        debug!(
            "connected to the trader front {}",
            self.front_addr.lock().expect(POISONED_MUTEX)
        );
        self.is_error.store(false, Ordering::Release);
        self.is_connected.store(true, Ordering::Release);
        self.conn_signal.done();
    }

    //----------------------------------------------------------------------------------------------
    fn on_front_disconnected(&self, reason: i32) {
        error!(
            "disconnected from the trader front {}, reason {:#x}",
            self.front_addr.lock().expect(POISONED_MUTEX),
            reason
        );
        self.is_error.store(true, Ordering::Release);
        self.is_connected.store(false, Ordering::Release);
        // Release anyone blocked on the handshake or a query; no reconnect is
        // attempted, the surrounding process restarts instead.
        self.conn_signal.error();
        self.query_signal.error();
    }

    //----------------------------------------------------------------------------------------------
    fn on_heart_beat_warning(&self, time_lapse: i32) {
        warn!(
            "no packet received from the trader front for {} seconds",
            time_lapse
        );
    }

    //----------------------------------------------------------------------------------------------
    fn on_rsp_authenticate(
        &self,
        _field: Option<&RspAuthenticateField>,
        rsp_info: Option<&RspInfoField>,
        _req_id: i32,
        is_last: bool,
    ) {
        if !is_last {
            return;
        }
        if is_error_rsp(rsp_info) {
            error!("authentication failed: {}", rsp_error_msg(rsp_info));
            self.error();
            return;
        }
        debug!("authenticated as {}", self.investor_id());
        self.done();
    }

    //----------------------------------------------------------------------------------------------
    fn on_rsp_user_login(
        &self,
        field: Option<&RspUserLoginField>,
        rsp_info: Option<&RspInfoField>,
        _req_id: i32,
        is_last: bool,
    ) {
        if !is_last {
            return;
        }
        if is_error_rsp(rsp_info) {
            error!("user login failed: {}", rsp_error_msg(rsp_info));
            self.error();
            return;
        }
        let field = match field {
            Some(field) => field,
            None => {
                error!("user login response without body");
                self.error();
                return;
            }
        };

        self.front_id.store(field.front_id, Ordering::Release);
        self.session_id.store(field.session_id, Ordering::Release);
        let max_order_ref = match parse_order_ref(&field.max_order_ref) {
            Ok(value) => value,
            Err(err) => {
                error!(
                    "user login failed: bad max order ref {:?}: {}",
                    field.max_order_ref, err
                );
                self.error();
                return;
            }
        };
        self.next_order_ref.store(max_order_ref + 1, Ordering::Release);

        debug!(
            "logged in as {}: front id {}, session id {}, max order ref {}",
            self.investor_id(),
            field.front_id,
            field.session_id,
            max_order_ref
        );
        self.done();
    }

    //----------------------------------------------------------------------------------------------
    fn on_rsp_user_logout(
        &self,
        field: Option<&UserLogoutField>,
        _rsp_info: Option<&RspInfoField>,
        _req_id: i32,
        _is_last: bool,
    ) {
        if let Some(field) = field {
            debug!(
                "logged out: broker {}, investor {}",
                field.broker_id, field.user_id
            );
        }
        self.reset();
        self.query_signal.done();
    }

    //----------------------------------------------------------------------------------------------
    fn on_rsp_qry_settlement_info(
        &self,
        _field: Option<&SettlementInfoField>,
        rsp_info: Option<&RspInfoField>,
        _req_id: i32,
        is_last: bool,
    ) {
        // Content may arrive in several chunks; only the final one completes
        // the login step.
        if !is_last {
            return;
        }
        if is_error_rsp(rsp_info) {
            error!("settlement query failed: {}", rsp_error_msg(rsp_info));
            self.error();
            return;
        }
        debug!("settlement info received");
        self.done();
    }

    //----------------------------------------------------------------------------------------------
    fn on_rsp_settlement_info_confirm(
        &self,
        _field: Option<&SettlementInfoConfirmField>,
        rsp_info: Option<&RspInfoField>,
        _req_id: i32,
        is_last: bool,
    ) {
        if !is_last {
            return;
        }
        if is_error_rsp(rsp_info) {
            error!("settlement confirm failed: {}", rsp_error_msg(rsp_info));
            self.error();
            return;
        }
        debug!("settlement confirmed");
        self.done();
    }

    //----------------------------------------------------------------------------------------------
    fn on_rsp_order_insert(
        &self,
        field: Option<&InputOrderField>,
        rsp_info: Option<&RspInfoField>,
        _req_id: i32,
        _is_last: bool,
    ) {
        let field = match field {
            Some(field) => field,
            None => {
                warn!("order insert reject without body");
                return;
            }
        };
        if field.investor_id != self.investor_id() {
            warn!("dropping order insert reject of another investor");
            return;
        }
        let order_ref = match parse_order_ref(&field.order_ref) {
            Ok(value) => value,
            Err(err) => {
                error!(
                    "order insert reject with bad order ref {:?}: {}",
                    field.order_ref, err
                );
                return;
            }
        };

        error!(
            "order {} rejected by the front: {}",
            order_ref,
            rsp_error_msg(rsp_info)
        );

        let mut details = self.order_details.lock().expect(POISONED_MUTEX);
        if details.remove(&order_ref).is_none() {
            error!("order insert reject for unknown ref {}", order_ref);
            return;
        }
        drop(details);

        self.wrapper
            .lock()
            .expect(POISONED_MUTEX)
            .on_order_rejected(order_ref as u64);
    }

    //----------------------------------------------------------------------------------------------
    fn on_rsp_order_action(
        &self,
        field: Option<&InputOrderActionField>,
        rsp_info: Option<&RspInfoField>,
        _req_id: i32,
        _is_last: bool,
    ) {
        let field = match field {
            Some(field) => field,
            None => {
                warn!("order action reject without body");
                return;
            }
        };
        if field.investor_id != self.investor_id() {
            warn!("dropping order action reject of another investor");
            return;
        }
        let order_ref = match parse_order_ref(&field.order_ref) {
            Ok(value) => value,
            Err(err) => {
                error!(
                    "order action reject with bad order ref {:?}: {}",
                    field.order_ref, err
                );
                return;
            }
        };

        error!(
            "cancel of order {} rejected by the front: {}",
            order_ref,
            rsp_error_msg(rsp_info)
        );

        let details = self.order_details.lock().expect(POISONED_MUTEX);
        if !details.contains_key(&order_ref) {
            error!("order action reject for unknown ref {}", order_ref);
            return;
        }
        drop(details);

        self.wrapper
            .lock()
            .expect(POISONED_MUTEX)
            .on_order_cancel_rejected(order_ref as u64);
    }

    //----------------------------------------------------------------------------------------------
    fn on_rtn_order(&self, field: &OrderField) {
        // The front multiplexes sessions; reports of other investors leak
        // through and are dropped.
        if field.investor_id != self.investor_id() {
            warn!("dropping order report of another investor");
            return;
        }
        let order_ref = match parse_order_ref(&field.order_ref) {
            Ok(value) => value,
            Err(err) => {
                error!(
                    "order report with bad order ref {:?}: {}",
                    field.order_ref, err
                );
                return;
            }
        };

        let order_status = CtpOrderStatus::from_u8(field.order_status);
        let is_cancel_terminal = matches!(
            order_status,
            Some(CtpOrderStatus::PartTradedNotQueueing) | Some(CtpOrderStatus::Canceled)
        );

        let mut emit_accepted = false;
        let mut emit_rejected = false;
        let mut emit_cancel_rejected = false;
        let mut emit_canceled = None;

        {
            let mut details = self.order_details.lock().expect(POISONED_MUTEX);
            let detail = match details.get_mut(&order_ref) {
                Some(detail) => detail,
                None => {
                    if is_cancel_terminal {
                        // Pre-session order canceled by the startup sweep.
                        warn!(
                            "outstanding order canceled: {}, ref {}, traded/total {}/{}",
                            field.instrument_id,
                            field.order_ref,
                            field.volume_traded,
                            field.volume_total_original
                        );
                    } else {
                        warn!("order report for unknown ref {}", field.order_ref);
                    }
                    return;
                }
            };

            match CtpSubmitStatus::from_u8(field.order_submit_status) {
                Some(CtpSubmitStatus::InsertRejected) => {
                    details.remove(&order_ref);
                    emit_rejected = true;
                }
                Some(CtpSubmitStatus::CancelRejected) => {
                    emit_cancel_rejected = true;
                }
                _ => {
                    // Accepted by the broker but not yet at the exchange:
                    // nothing to report and nothing cancelable yet.
                    if matches!(
                        order_status,
                        Some(CtpOrderStatus::Unknown) | Some(CtpOrderStatus::NoTradeNotQueueing)
                    ) {
                        return;
                    }

                    // At the exchange. A trade report may have beaten this
                    // status update, in which case the ack is already set.
                    if !detail.accepted_ack {
                        detail.accepted_ack = true;
                        emit_accepted = true;
                    }

                    if is_cancel_terminal {
                        // A cancel kills the whole open remainder at once; the
                        // guard swallows duplicate notices.
                        if detail.canceled_vol == 0 {
                            detail.canceled_vol =
                                field.volume_total_original - field.volume_traded;
                            emit_canceled = Some(detail.canceled_vol);
                        }
                        // A fill report may still be in flight; the detail
                        // stays until traded + canceled covers the original.
                        if detail.canceled_vol + detail.traded_vol >= detail.original_vol {
                            details.remove(&order_ref);
                        }
                    }
                }
            }
        }

        if emit_rejected {
            error!(
                "order {} rejected by the exchange: {}",
                order_ref,
                gb2312_to_utf8(&field.status_msg)
            );
            self.wrapper
                .lock()
                .expect(POISONED_MUTEX)
                .on_order_rejected(order_ref as u64);
            return;
        }
        if emit_cancel_rejected {
            warn!(
                "cancel of order {} rejected: {}",
                order_ref,
                gb2312_to_utf8(&field.status_msg)
            );
            self.wrapper
                .lock()
                .expect(POISONED_MUTEX)
                .on_order_cancel_rejected(order_ref as u64);
            return;
        }
        if emit_accepted {
            self.wrapper
                .lock()
                .expect(POISONED_MUTEX)
                .on_order_accepted(order_ref as u64);
        }
        if let Some(canceled) = emit_canceled {
            self.wrapper
                .lock()
                .expect(POISONED_MUTEX)
                .on_order_canceled(order_ref as u64, canceled);
        }
    }

    //----------------------------------------------------------------------------------------------
    fn on_rtn_trade(&self, field: &TradeField) {
        if field.investor_id != self.investor_id() {
            warn!("dropping trade report of another investor");
            return;
        }
        let order_ref = match parse_order_ref(&field.order_ref) {
            Ok(value) => value,
            Err(err) => {
                error!(
                    "trade report with bad order ref {:?}: {}",
                    field.order_ref, err
                );
                return;
            }
        };

        let mut emit_accepted = false;
        {
            let mut details = self.order_details.lock().expect(POISONED_MUTEX);
            let detail = match details.get_mut(&order_ref) {
                Some(detail) => detail,
                None => {
                    error!("trade report for unknown ref {}", field.order_ref);
                    return;
                }
            };

            // A fill implies the exchange accepted the order.
            if !detail.accepted_ack {
                detail.accepted_ack = true;
                emit_accepted = true;
            }

            if detail.traded_vol + field.volume > detail.original_vol {
                error!(
                    "trade report overflows order {}: traded {} + {} > original {}",
                    order_ref, detail.traded_vol, field.volume, detail.original_vol
                );
            }
            detail.traded_vol += field.volume;

            if detail.traded_vol + detail.canceled_vol >= detail.original_vol {
                details.remove(&order_ref);
            }
        }

        if emit_accepted {
            self.wrapper
                .lock()
                .expect(POISONED_MUTEX)
                .on_order_accepted(order_ref as u64);
        }
        self.wrapper
            .lock()
            .expect(POISONED_MUTEX)
            .on_order_traded(order_ref as u64, field.volume, field.price);
    }

    //----------------------------------------------------------------------------------------------
    fn on_rsp_qry_instrument(
        &self,
        field: Option<&InstrumentField>,
        rsp_info: Option<&RspInfoField>,
        _req_id: i32,
        is_last: bool,
    ) {
        if is_error_rsp(rsp_info) {
            error!("instrument query failed: {}", rsp_error_msg(rsp_info));
            self.error();
            return;
        }
        let instrument = match field {
            Some(instrument) => instrument,
            None => {
                error!("instrument query returned no body");
                self.error();
                return;
            }
        };

        debug!(
            "instrument: {}, exchange: {}",
            instrument.instrument_id, instrument.exchange_id
        );

        let contract = Contract {
            index: 0,
            ticker: instrument.instrument_id.clone(),
            exchange: instrument.exchange_id.clone(),
            name: gb2312_to_utf8(&instrument.instrument_name),
            product_type: from_ctp_product_class(instrument.product_class),
            size: instrument.volume_multiple,
            price_tick: instrument.price_tick,
            max_market_order_volume: instrument.max_market_order_volume,
            min_market_order_volume: instrument.min_market_order_volume,
            max_limit_order_volume: instrument.max_limit_order_volume,
            min_limit_order_volume: instrument.min_limit_order_volume,
            delivery_year: instrument.delivery_year,
            delivery_month: instrument.delivery_month,
            long_margin_rate: 0.0,
            short_margin_rate: 0.0,
        };
        self.wrapper
            .lock()
            .expect(POISONED_MUTEX)
            .on_query_contract(&contract);

        if is_last {
            self.done();
        }
    }

    //----------------------------------------------------------------------------------------------
    fn on_rsp_qry_investor_position(
        &self,
        field: Option<&InvestorPositionField>,
        rsp_info: Option<&RspInfoField>,
        _req_id: i32,
        is_last: bool,
    ) {
        if is_error_rsp(rsp_info) {
            error!("position query failed: {}", rsp_error_msg(rsp_info));
            self.pos_cache.lock().expect(POISONED_MUTEX).clear();
            self.error();
            return;
        }

        if let Some(position) = field {
            self.cache_position_record(position);
        }

        // The final batch always flushes the cache, even when this record was
        // skipped or the query matched nothing.
        if is_last {
            let positions: Vec<Position> = {
                let mut cache = self.pos_cache.lock().expect(POISONED_MUTEX);
                let positions = cache.values().cloned().collect();
                cache.clear();
                positions
            };
            {
                let mut wrapper = self.wrapper.lock().expect(POISONED_MUTEX);
                for position in &positions {
                    wrapper.on_query_position(position);
                }
            }
            self.done();
        }
    }

    //----------------------------------------------------------------------------------------------
    fn on_rsp_qry_trading_account(
        &self,
        field: Option<&TradingAccountField>,
        rsp_info: Option<&RspInfoField>,
        _req_id: i32,
        is_last: bool,
    ) {
        if !is_last {
            return;
        }
        if is_error_rsp(rsp_info) {
            error!("account query failed: {}", rsp_error_msg(rsp_info));
            self.error();
            return;
        }
        let field = match field {
            Some(field) => field,
            None => {
                error!("account query returned no body");
                self.error();
                return;
            }
        };

        let account_id = field.account_id.parse::<u64>().unwrap_or_else(|_| {
            warn!("non-numeric account id {:?}", field.account_id);
            0
        });
        let account = Account {
            account_id,
            balance: field.balance,
            frozen: field.frozen_cash + field.frozen_margin + field.frozen_commission,
        };

        debug!(
            "account {}: balance {:.2}, frozen {:.2}",
            account.account_id, account.balance, account.frozen
        );
        self.wrapper
            .lock()
            .expect(POISONED_MUTEX)
            .on_query_account(&account);
        self.done();
    }

    //----------------------------------------------------------------------------------------------
    fn on_rsp_qry_order(
        &self,
        field: Option<&OrderField>,
        rsp_info: Option<&RspInfoField>,
        _req_id: i32,
        is_last: bool,
    ) {
        if is_error_rsp(rsp_info) {
            error!("order query failed: {}", rsp_error_msg(rsp_info));
            self.error();
            return;
        }

        // Startup sweep: anything still queueing from an earlier session is
        // canceled by its exchange order id, so the session starts with an
        // empty book.
        if let Some(order) = field {
            if matches!(
                CtpOrderStatus::from_u8(order.order_status),
                Some(CtpOrderStatus::NoTradeQueueing) | Some(CtpOrderStatus::PartTradedQueueing)
            ) {
                info!(
                    "canceling outstanding order: {}.{}, sys id {:?}, traded/total {}/{}, status: {}",
                    order.instrument_id,
                    order.exchange_id,
                    order.order_sys_id,
                    order.volume_traded,
                    order.volume_total_original,
                    gb2312_to_utf8(&order.status_msg)
                );

                let req = InputOrderActionField {
                    broker_id: self.broker_id(),
                    investor_id: self.investor_id(),
                    instrument_id: order.instrument_id.clone(),
                    exchange_id: order.exchange_id.clone(),
                    order_sys_id: order.order_sys_id.clone(),
                    action_flag: CTP_AF_DELETE,
                    ..Default::default()
                };
                if self.api.req_order_action(&req, self.next_req_id()) != 0 {
                    error!(
                        "failed to cancel outstanding order, sys id {:?}",
                        order.order_sys_id
                    );
                }
            }
        }

        if is_last {
            self.done();
        }
    }

    //----------------------------------------------------------------------------------------------
    fn on_rsp_qry_trade(
        &self,
        field: Option<&TradeField>,
        rsp_info: Option<&RspInfoField>,
        _req_id: i32,
        is_last: bool,
    ) {
        if is_error_rsp(rsp_info) {
            error!("trade query failed: {}", rsp_error_msg(rsp_info));
            self.error();
            return;
        }

        if let Some(trade) = field {
            self.emit_trade_record(trade);
        }

        if is_last {
            self.done();
        }
    }

    //----------------------------------------------------------------------------------------------
    fn on_rsp_qry_instrument_margin_rate(
        &self,
        field: Option<&InstrumentMarginRateField>,
        rsp_info: Option<&RspInfoField>,
        _req_id: i32,
        is_last: bool,
    ) {
        if is_error_rsp(rsp_info) {
            error!("margin rate query failed: {}", rsp_error_msg(rsp_info));
            self.error();
            return;
        }

        if let Some(rate) = field {
            match self.table.get() {
                Some(table) => match table.get_by_ticker(&rate.instrument_id) {
                    Some(contract) => {
                        table.update_margin_rate(
                            contract.index,
                            rate.long_margin_ratio_by_money,
                            rate.short_margin_ratio_by_money,
                        );
                        info!(
                            "margin rate for {}: long {}, short {}",
                            rate.instrument_id,
                            rate.long_margin_ratio_by_money,
                            rate.short_margin_ratio_by_money
                        );
                    }
                    None => {
                        error!("margin rate for unknown contract {}", rate.instrument_id);
                    }
                },
                None => {
                    error!("margin rate received before the contract table was set");
                }
            }
        }

        if is_last {
            self.done();
        }
    }
}
