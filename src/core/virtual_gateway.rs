//! A loop-back gateway used by the demo binary and the engine tests.
//!
//! Orders are accepted immediately and filled or canceled on demand through
//! the `fill`/`fill_all` handles. Emissions run on a dedicated event-pump
//! thread so the wrapper is always called from outside the caller's stack,
//! like a real vendor SDK would.
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use log::*;

use crate::core::common::{Account, OrderReq, TickData, POISONED_MUTEX};
use crate::core::config::Config;
use crate::core::contract::{Contract, ContractTable};
use crate::core::gateway::Gateway;
use crate::core::wrapper::Wrapper;

const VIRTUAL_GATEWAY_VERSION: &str = "0.1.0";

enum VirtualEvent {
    Accepted(u64),
    Traded(u64, i32, f64),
    Canceled(u64, i32),
    Tick(TickData),
}

struct VirtualOrder {
    left: i32,
}

//==================================================================================================
pub struct VirtualGateway<W: Wrapper> {
    wrapper: Arc<Mutex<W>>,
    contracts: Mutex<Vec<Contract>>,
    events: Mutex<Sender<VirtualEvent>>,
    orders: Mutex<HashMap<u64, VirtualOrder>>,
    next_order_ref: AtomicU64,
    is_logon: AtomicBool,
}

impl<W: Wrapper> VirtualGateway<W> {
    pub fn new(wrapper: Arc<Mutex<W>>) -> Self {
        let (tx, rx) = channel::<VirtualEvent>();

        let pump_wrapper = wrapper.clone();
        thread::spawn(move || {
            while let Ok(event) = rx.recv() {
                let mut wrapper = pump_wrapper.lock().expect(POISONED_MUTEX);
                match event {
                    VirtualEvent::Accepted(order_ref) => wrapper.on_order_accepted(order_ref),
                    VirtualEvent::Traded(order_ref, traded, price) => {
                        wrapper.on_order_traded(order_ref, traded, price)
                    }
                    VirtualEvent::Canceled(order_ref, canceled) => {
                        wrapper.on_order_canceled(order_ref, canceled)
                    }
                    VirtualEvent::Tick(tick) => wrapper.on_tick(&tick),
                }
            }
            debug!("virtual gateway event pump stopped");
        });

        VirtualGateway {
            wrapper,
            contracts: Mutex::new(Vec::new()),
            events: Mutex::new(tx),
            orders: Mutex::new(HashMap::new()),
            next_order_ref: AtomicU64::new(1),
            is_logon: AtomicBool::new(false),
        }
    }

    fn send_event(&self, event: VirtualEvent) {
        if self
            .events
            .lock()
            .expect(POISONED_MUTEX)
            .send(event)
            .is_err()
        {
            error!("virtual gateway event pump is gone");
        }
    }

    //----------------------------------------------------------------------------------------------
    /// Registers an instrument streamed by `query_contracts`.
    pub fn add_contract(&self, contract: Contract) {
        self.contracts.lock().expect(POISONED_MUTEX).push(contract);
    }

    /// Fills up to `volume` lots of an open order.
    pub fn fill(&self, order_ref: u64, volume: i32, price: f64) -> bool {
        let mut orders = self.orders.lock().expect(POISONED_MUTEX);
        let order = match orders.get_mut(&order_ref) {
            Some(order) => order,
            None => return false,
        };
        let traded = volume.min(order.left);
        order.left -= traded;
        if order.left == 0 {
            orders.remove(&order_ref);
        }
        drop(orders);

        self.send_event(VirtualEvent::Traded(order_ref, traded, price));
        true
    }

    /// Fully fills every open order at `price`.
    pub fn fill_all(&self, price: f64) {
        let drained: Vec<(u64, i32)> = {
            let mut orders = self.orders.lock().expect(POISONED_MUTEX);
            orders.drain().map(|(r, o)| (r, o.left)).collect()
        };
        for (order_ref, left) in drained {
            self.send_event(VirtualEvent::Traded(order_ref, left, price));
        }
    }

    /// Publishes a market snapshot through the event pump.
    pub fn push_tick(&self, tick: TickData) {
        self.send_event(VirtualEvent::Tick(tick));
    }

    pub fn open_order_count(&self) -> usize {
        self.orders.lock().expect(POISONED_MUTEX).len()
    }
}

//==================================================================================================
impl<W: Wrapper> Gateway for VirtualGateway<W> {
    fn login(&self, _config: &Config) -> bool {
        info!("virtual gateway v{}", VIRTUAL_GATEWAY_VERSION);
        self.is_logon.store(true, Ordering::Release);
        true
    }

    fn logout(&self) {
        self.is_logon.store(false, Ordering::Release);
    }

    fn send_order(&self, order: &OrderReq) -> u64 {
        if !self.is_logon.load(Ordering::Acquire) {
            error!("send_order failed: not logged in");
            return 0;
        }
        let order_ref = self.next_order_ref.fetch_add(1, Ordering::AcqRel);
        self.orders
            .lock()
            .expect(POISONED_MUTEX)
            .insert(order_ref, VirtualOrder { left: order.volume });

        self.send_event(VirtualEvent::Accepted(order_ref));
        order_ref
    }

    fn cancel_order(&self, order_ref: u64) -> bool {
        let canceled = match self
            .orders
            .lock()
            .expect(POISONED_MUTEX)
            .remove(&order_ref)
        {
            Some(order) => order.left,
            None => {
                error!("cancel_order failed: unknown order ref {}", order_ref);
                return false;
            }
        };
        self.send_event(VirtualEvent::Canceled(order_ref, canceled));
        true
    }

    fn set_contract_table(&self, _table: Arc<ContractTable>) {}

    fn query_contract(&self, _ticker: &str, _exchange: &str) -> bool {
        true
    }

    fn query_contracts(&self) -> bool {
        let contracts = self.contracts.lock().expect(POISONED_MUTEX).clone();
        let mut wrapper = self.wrapper.lock().expect(POISONED_MUTEX);
        for contract in &contracts {
            wrapper.on_query_contract(contract);
        }
        true
    }

    fn query_position(&self, _ticker: &str) -> bool {
        true
    }

    fn query_positions(&self) -> bool {
        true
    }

    fn query_account(&self) -> bool {
        let account = Account {
            account_id: 1234,
            balance: 100_000_000.0,
            frozen: 0.0,
        };
        self.wrapper
            .lock()
            .expect(POISONED_MUTEX)
            .on_query_account(&account);
        true
    }

    fn query_trades(&self) -> bool {
        true
    }

    fn query_margin_rate(&self, _ticker: &str) -> bool {
        true
    }
}

//==================================================================================================
// Shared-handle form, letting a caller keep the fill/tick handles after the
// gateway itself moves into the engine.
impl<W: Wrapper> Gateway for Arc<VirtualGateway<W>> {
    fn login(&self, config: &Config) -> bool {
        (**self).login(config)
    }

    fn logout(&self) {
        (**self).logout()
    }

    fn send_order(&self, order: &OrderReq) -> u64 {
        (**self).send_order(order)
    }

    fn cancel_order(&self, order_ref: u64) -> bool {
        (**self).cancel_order(order_ref)
    }

    fn set_contract_table(&self, table: Arc<ContractTable>) {
        (**self).set_contract_table(table)
    }

    fn query_contract(&self, ticker: &str, exchange: &str) -> bool {
        (**self).query_contract(ticker, exchange)
    }

    fn query_contracts(&self) -> bool {
        (**self).query_contracts()
    }

    fn query_position(&self, ticker: &str) -> bool {
        (**self).query_position(ticker)
    }

    fn query_positions(&self) -> bool {
        (**self).query_positions()
    }

    fn query_account(&self) -> bool {
        (**self).query_account()
    }

    fn query_trades(&self) -> bool {
        (**self).query_trades()
    }

    fn query_margin_rate(&self, ticker: &str) -> bool {
        (**self).query_margin_rate(ticker)
    }
}
