//! The market-data-front adapter: md session bootstrap, subscriptions and
//! tick delivery.
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use log::*;

use crate::core::common::{TickData, POISONED_MUTEX};
use crate::core::config::Config;
use crate::core::contract::ContractTable;
use crate::core::ctp::api::{MdApi, MdSpi};
use crate::core::ctp::common::{
    is_error_rsp, rsp_error_msg, DepthMarketDataField, ReqUserLoginField, RspInfoField,
    RspUserLoginField, SpecificInstrumentField, UserLogoutField,
};
use crate::core::ctp::sync::SyncSignal;
use crate::core::wrapper::Wrapper;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

//==================================================================================================
/// Client-side driver of a CTP-style market-data front. Ticks for unknown
/// tickers are dropped with a warning; everything else becomes a `TickData`
/// handed to `Wrapper::on_tick` on the vendor's callback thread.
pub struct CtpMdApi<W: Wrapper> {
    wrapper: Arc<Mutex<W>>,
    api: Arc<dyn MdApi>,
    table: OnceLock<Arc<ContractTable>>,

    front_addr: Mutex<String>,

    next_req_id: AtomicI32,
    is_error: AtomicBool,
    is_connected: AtomicBool,
    is_logon: AtomicBool,

    conn_signal: SyncSignal,
    query_signal: SyncSignal,
}

impl<W: Wrapper> CtpMdApi<W> {
    pub fn new(wrapper: Arc<Mutex<W>>, api: Arc<dyn MdApi>) -> Arc<Self> {
        let me = Arc::new(CtpMdApi {
            wrapper,
            api: api.clone(),
            table: OnceLock::new(),
            front_addr: Mutex::new(String::new()),
            next_req_id: AtomicI32::new(0),
            is_error: AtomicBool::new(false),
            is_connected: AtomicBool::new(false),
            is_logon: AtomicBool::new(false),
            conn_signal: SyncSignal::new(),
            query_signal: SyncSignal::new(),
        });
        let spi: Arc<dyn MdSpi> = me.clone();
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

    fn next_req_id(&self) -> i32 {
        self.next_req_id.fetch_add(1, Ordering::AcqRel)
    }

    //----------------------------------------------------------------------------------------------
    /// Connects to the md front, logs in and subscribes the configured
    /// tickers.
    pub fn login(&self, config: &Config) -> bool {
        if self.is_logon.load(Ordering::Acquire) {
            error!("md login failed: do not login twice");
            return false;
        }

        *self.front_addr.lock().expect(POISONED_MUTEX) = config.quote_server_address.clone();

        self.conn_signal.reset();
        self.api.connect(&config.quote_server_address);
        if !self.conn_signal.wait(CONNECT_TIMEOUT) {
            error!(
                "md login failed: cannot connect to md front {}",
                config.quote_server_address
            );
            return false;
        }

        let login_req = ReqUserLoginField {
            broker_id: config.broker_id.clone(),
            user_id: config.investor_id.clone(),
            password: config.password.clone(),
        };
        self.query_signal.reset();
        if self.api.req_user_login(&login_req, self.next_req_id()) != 0 {
            error!("md login failed: login request refused");
            return false;
        }
        if !self.query_signal.wait(QUERY_TIMEOUT) {
            error!("md login failed: user login rejected");
            return false;
        }

        if !config.subscription_list.is_empty()
            && self.api.subscribe_market_data(&config.subscription_list) != 0
        {
            error!("md login failed: subscription request refused");
            return false;
        }

        self.is_logon.store(true, Ordering::Release);
        true
    }

    //----------------------------------------------------------------------------------------------
    pub fn logout(&self) {
        if !self.is_logon.load(Ordering::Acquire) {
            return;
        }
        let req = UserLogoutField::default();
        if self.api.req_user_logout(&req, self.next_req_id()) != 0 {
            error!("md logout request refused");
            return;
        }
        self.is_logon.store(false, Ordering::Release);
    }
}

//==================================================================================================
impl<W: Wrapper> MdSpi for CtpMdApi<W> {
    fn on_front_connected(&self) {
        debug!(
            "connected to the md front {}",
            self.front_addr.lock().expect(POISONED_MUTEX)
        );
        self.is_error.store(false, Ordering::Release);
        self.is_connected.store(true, Ordering::Release);
        self.conn_signal.done();
    }

    //----------------------------------------------------------------------------------------------
    fn on_front_disconnected(&self, reason: i32) {
        error!(
            "disconnected from the md front {}, reason {:#x}",
            self.front_addr.lock().expect(POISONED_MUTEX),
            reason
        );
        self.is_error.store(true, Ordering::Release);
        self.is_connected.store(false, Ordering::Release);
        self.conn_signal.error();
        self.query_signal.error();
    }

    //----------------------------------------------------------------------------------------------
    fn on_rsp_user_login(
        &self,
        _field: Option<&RspUserLoginField>,
        rsp_info: Option<&RspInfoField>,
        _req_id: i32,
        is_last: bool,
    ) {
        if !is_last {
            return;
        }
        if is_error_rsp(rsp_info) {
            error!("md user login failed: {}", rsp_error_msg(rsp_info));
            self.is_error.store(true, Ordering::Release);
            self.query_signal.error();
            return;
        }
        debug!("md session established");
        self.query_signal.done();
    }

    //----------------------------------------------------------------------------------------------
    fn on_rsp_user_logout(
        &self,
        _field: Option<&UserLogoutField>,
        _rsp_info: Option<&RspInfoField>,
        _req_id: i32,
        _is_last: bool,
    ) {
        debug!("md session closed");
        self.is_logon.store(false, Ordering::Release);
    }

    //----------------------------------------------------------------------------------------------
    fn on_rsp_sub_market_data(
        &self,
        field: Option<&SpecificInstrumentField>,
        rsp_info: Option<&RspInfoField>,
        _req_id: i32,
        _is_last: bool,
    ) {
        if is_error_rsp(rsp_info) {
            error!("subscription rejected: {}", rsp_error_msg(rsp_info));
            return;
        }
        if let Some(field) = field {
            debug!("subscribed to {}", field.instrument_id);
        }
    }

    //----------------------------------------------------------------------------------------------
    fn on_rtn_depth_market_data(&self, field: &DepthMarketDataField) {
        let ticker_index = match self
            .table
            .get()
            .and_then(|table| table.get_by_ticker(&field.instrument_id))
        {
            Some(contract) => contract.index,
            None => {
                warn!("tick for unknown contract {}", field.instrument_id);
                return;
            }
        };

        let tick = TickData {
            ticker_index,
            update_time: field.update_time.clone(),
            last_price: field.last_price,
            volume: field.volume,
            open_interest: field.open_interest,
            bid_price: field.bid_price1,
            bid_volume: field.bid_volume1,
            ask_price: field.ask_price1,
            ask_volume: field.ask_volume1,
        };
        self.wrapper.lock().expect(POISONED_MUTEX).on_tick(&tick);
    }
}
