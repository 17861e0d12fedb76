//! The trading engine: owns the gateway and the risk chain, assigns engine
//! order ids, and routes adapter callbacks to subscribers.
use std::collections::HashMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

use log::*;

use crate::core::common::{
    error_code_str, Account, Order, OrderReq, OrderStatus, Position, TickData, Trade,
    ERR_REJECTED, ERR_SEND_FAILED, NO_ERROR, POISONED_MUTEX,
};
use crate::core::config::Config;
use crate::core::contract::{Contract, ContractTable};
use crate::core::gateway::Gateway;
use crate::core::risk::{RiskManager, RiskRule};
use crate::core::wrapper::Wrapper;

//==================================================================================================
/// Typed engine output, one stream per subscriber. Order events carry the
/// engine order id, never the gateway-local ref.
#[derive(Clone, Debug)]
pub enum EngineEvent {
    OrderAccepted {
        engine_order_id: u64,
    },
    OrderTraded {
        engine_order_id: u64,
        traded: i32,
        price: f64,
    },
    OrderCanceled {
        engine_order_id: u64,
        canceled: i32,
    },
    OrderRejected {
        engine_order_id: u64,
    },
    OrderCancelRejected {
        engine_order_id: u64,
    },
    Tick(TickData),
}

//==================================================================================================
/// The engine's mutable state behind one lock: the risk chain, the order-id
/// maps, query caches and the subscriber list. Implements `Wrapper`, so the
/// gateway's callback threads drive it directly.
pub struct EngineCtx {
    risk: RiskManager,
    table: Option<Arc<ContractTable>>,
    contract_buf: Vec<Contract>,
    next_engine_order_id: u64,
    orders: HashMap<u64, Order>,
    ref_to_id: HashMap<u64, u64>,
    id_to_ref: HashMap<u64, u64>,
    positions: HashMap<u32, Position>,
    account: Account,
    trades: Vec<Trade>,
    subscribers: Vec<Sender<EngineEvent>>,
}

impl EngineCtx {
    fn new() -> Self {
        EngineCtx {
            risk: RiskManager::new(),
            table: None,
            contract_buf: Vec::new(),
            next_engine_order_id: 1,
            orders: HashMap::new(),
            ref_to_id: HashMap::new(),
            id_to_ref: HashMap::new(),
            positions: HashMap::new(),
            account: Account::default(),
            trades: Vec::new(),
            subscribers: Vec::new(),
        }
    }

    //----------------------------------------------------------------------------------------------
    fn publish(&mut self, event: EngineEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    //----------------------------------------------------------------------------------------------
    fn lookup(&self, order_ref: u64, what: &str) -> Option<u64> {
        match self.ref_to_id.get(&order_ref) {
            Some(&id) => Some(id),
            None => {
                // Most commonly a startup-sweep leftover the adapter already
                // warned about.
                warn!("{} for unmapped order ref {}", what, order_ref);
                None
            }
        }
    }

    //----------------------------------------------------------------------------------------------
    /// Terminal bookkeeping: tells the risk chain, then forgets the order.
    fn complete(&mut self, engine_order_id: u64, error_code: i32) {
        self.risk.on_order_completed(engine_order_id, error_code);
        self.orders.remove(&engine_order_id);
        if let Some(order_ref) = self.id_to_ref.remove(&engine_order_id) {
            self.ref_to_id.remove(&order_ref);
        }
    }
}

impl Wrapper for EngineCtx {
    fn on_query_contract(&mut self, contract: &Contract) {
        self.contract_buf.push(contract.clone());
    }

    fn on_query_account(&mut self, account: &Account) {
        self.account = account.clone();
    }

    fn on_query_position(&mut self, position: &Position) {
        self.positions.insert(position.ticker_index, position.clone());
    }

    fn on_query_trade(&mut self, trade: &Trade) {
        self.trades.push(trade.clone());
    }

    //----------------------------------------------------------------------------------------------
    fn on_order_accepted(&mut self, order_ref: u64) {
        let id = match self.lookup(order_ref, "acceptance") {
            Some(id) => id,
            None => return,
        };
        if let Some(order) = self.orders.get_mut(&id) {
            order.status = OrderStatus::AcceptedByExchange;
        }
        self.publish(EngineEvent::OrderAccepted {
            engine_order_id: id,
        });
    }

    //----------------------------------------------------------------------------------------------
    fn on_order_traded(&mut self, order_ref: u64, traded: i32, price: f64) {
        let id = match self.lookup(order_ref, "trade") {
            Some(id) => id,
            None => return,
        };

        let mut terminal = false;
        if let Some(order) = self.orders.get_mut(&id) {
            order.traded += traded;
            terminal = order.traded + order.canceled >= order.volume;
            order.status = if order.traded >= order.volume {
                OrderStatus::FullyTraded
            } else if terminal {
                OrderStatus::PartiallyTradedThenCanceled
            } else {
                OrderStatus::PartiallyTraded
            };
        }

        self.risk.on_order_traded(id, traded, price);
        self.publish(EngineEvent::OrderTraded {
            engine_order_id: id,
            traded,
            price,
        });
        if terminal {
            self.complete(id, NO_ERROR);
        }
    }

    //----------------------------------------------------------------------------------------------
    fn on_order_canceled(&mut self, order_ref: u64, canceled: i32) {
        let id = match self.lookup(order_ref, "cancel") {
            Some(id) => id,
            None => return,
        };

        let mut terminal = false;
        if let Some(order) = self.orders.get_mut(&id) {
            order.canceled = canceled;
            order.status = if order.traded > 0 {
                OrderStatus::PartiallyTradedThenCanceled
            } else {
                OrderStatus::Canceled
            };
            // A fill report may still be in flight for the traded remainder.
            terminal = order.traded + order.canceled >= order.volume;
        }

        self.publish(EngineEvent::OrderCanceled {
            engine_order_id: id,
            canceled,
        });
        if terminal {
            self.complete(id, NO_ERROR);
        }
    }

    //----------------------------------------------------------------------------------------------
    fn on_order_rejected(&mut self, order_ref: u64) {
        let id = match self.lookup(order_ref, "reject") {
            Some(id) => id,
            None => return,
        };
        if let Some(order) = self.orders.get_mut(&id) {
            order.status = OrderStatus::Rejected;
        }
        self.publish(EngineEvent::OrderRejected {
            engine_order_id: id,
        });
        self.complete(id, ERR_REJECTED);
    }

    //----------------------------------------------------------------------------------------------
    fn on_order_cancel_rejected(&mut self, order_ref: u64) {
        let id = match self.lookup(order_ref, "cancel reject") {
            Some(id) => id,
            None => return,
        };
        // The order stays live; only the cancel attempt failed.
        if let Some(order) = self.orders.get_mut(&id) {
            order.status = OrderStatus::CancelRejectedWhileOpen;
        }
        self.publish(EngineEvent::OrderCancelRejected {
            engine_order_id: id,
        });
    }

    //----------------------------------------------------------------------------------------------
    fn on_tick(&mut self, tick: &TickData) {
        self.publish(EngineEvent::Tick(tick.clone()));
    }
}

//==================================================================================================
/// The orchestrator. Strategies call it from their own threads; the gateway
/// calls back into its context from the vendor threads.
pub struct TradingEngine {
    ctx: Arc<Mutex<EngineCtx>>,
    gateway: Box<dyn Gateway>,
}

impl TradingEngine {
    /// Builds the engine around a gateway. The factory receives the engine
    /// context so the gateway can deliver callbacks into it:
    ///
    /// ```text
    /// let engine = TradingEngine::new(|ctx| Box::new(VirtualGateway::new(ctx)));
    /// ```
    pub fn new<F>(make_gateway: F) -> Self
    where
        F: FnOnce(Arc<Mutex<EngineCtx>>) -> Box<dyn Gateway>,
    {
        let ctx = Arc::new(Mutex::new(EngineCtx::new()));
        let gateway = make_gateway(ctx.clone());
        TradingEngine { ctx, gateway }
    }

    //----------------------------------------------------------------------------------------------
    pub fn add_risk_rule(&self, rule: Box<dyn RiskRule>) {
        self.ctx
            .lock()
            .expect(POISONED_MUTEX)
            .risk
            .add_rule(rule);
    }

    //----------------------------------------------------------------------------------------------
    /// Registers a new event subscriber.
    pub fn subscribe(&self) -> Receiver<EngineEvent> {
        let (tx, rx) = channel();
        self.ctx
            .lock()
            .expect(POISONED_MUTEX)
            .subscribers
            .push(tx);
        rx
    }

    //----------------------------------------------------------------------------------------------
    /// Logs the gateway in, loads and seals the contract table, then seeds
    /// the account and position caches.
    pub fn login(&self, config: &Config) -> bool {
        if !self.gateway.login(config) {
            return false;
        }
        if !self.gateway.query_contracts() {
            error!("login failed: cannot query contracts");
            return false;
        }

        let table = {
            let mut ctx = self.ctx.lock().expect(POISONED_MUTEX);
            let mut table = ContractTable::new();
            for contract in ctx.contract_buf.drain(..) {
                if let Err(err) = table.insert(contract) {
                    warn!("skipping contract: {}", err);
                }
            }
            let table = Arc::new(table);
            ctx.table = Some(table.clone());
            table
        };
        info!("contract table sealed with {} instruments", table.len());
        self.gateway.set_contract_table(table);

        self.gateway.query_account();
        self.gateway.query_positions();
        true
    }

    //----------------------------------------------------------------------------------------------
    pub fn logout(&self) {
        self.gateway.logout();
    }

    //----------------------------------------------------------------------------------------------
    /// Risk-checks and dispatches an order, returning its engine order id or
    /// 0 when vetoed or refused.
    ///
    /// The context lock is held across the dispatch, so the ref↔id maps are
    /// recorded before any callback for the new order can be processed.
    pub fn send_order(&self, req: &OrderReq) -> u64 {
        let mut ctx = self.ctx.lock().expect(POISONED_MUTEX);

        let id = ctx.next_engine_order_id;
        ctx.next_engine_order_id += 1;
        let mut req = req.clone();
        req.engine_order_id = id;

        let code = ctx.risk.check_order_req(&req);
        if code != NO_ERROR {
            error!("send_order vetoed: {}", error_code_str(code));
            return 0;
        }

        let order_ref = self.gateway.send_order(&req);
        if order_ref == 0 {
            ctx.risk.on_order_completed(id, ERR_SEND_FAILED);
            return 0;
        }

        ctx.ref_to_id.insert(order_ref, id);
        ctx.id_to_ref.insert(id, order_ref);
        ctx.orders.insert(
            id,
            Order {
                engine_order_id: id,
                ticker_index: req.ticker_index,
                direction: req.direction,
                offset: req.offset,
                order_type: req.order_type,
                volume: req.volume,
                traded: 0,
                canceled: 0,
                price: req.price,
                status: OrderStatus::Submitted,
            },
        );
        ctx.risk.on_order_sent(id);
        id
    }

    //----------------------------------------------------------------------------------------------
    pub fn cancel_order(&self, engine_order_id: u64) -> bool {
        let order_ref = {
            let ctx = self.ctx.lock().expect(POISONED_MUTEX);
            match ctx.id_to_ref.get(&engine_order_id) {
                Some(&order_ref) => order_ref,
                None => {
                    error!("cancel_order failed: unknown engine order id {}", engine_order_id);
                    return false;
                }
            }
        };
        self.gateway.cancel_order(order_ref)
    }

    //----------------------------------------------------------------------------------------------
    pub fn query_account(&self) -> bool {
        self.gateway.query_account()
    }

    pub fn query_positions(&self) -> bool {
        self.gateway.query_positions()
    }

    pub fn query_position(&self, ticker: &str) -> bool {
        self.gateway.query_position(ticker)
    }

    pub fn query_trades(&self) -> bool {
        self.gateway.query_trades()
    }

    pub fn query_margin_rate(&self, ticker: &str) -> bool {
        self.gateway.query_margin_rate(ticker)
    }

    //----------------------------------------------------------------------------------------------
    // Cached state, refreshed by the queries above.

    pub fn account(&self) -> Account {
        self.ctx.lock().expect(POISONED_MUTEX).account.clone()
    }

    pub fn positions(&self) -> Vec<Position> {
        self.ctx
            .lock()
            .expect(POISONED_MUTEX)
            .positions
            .values()
            .cloned()
            .collect()
    }

    pub fn trades(&self) -> Vec<Trade> {
        self.ctx.lock().expect(POISONED_MUTEX).trades.clone()
    }

    pub fn live_orders(&self) -> Vec<Order> {
        self.ctx
            .lock()
            .expect(POISONED_MUTEX)
            .orders
            .values()
            .cloned()
            .collect()
    }

    pub fn contract_table(&self) -> Option<Arc<ContractTable>> {
        self.ctx.lock().expect(POISONED_MUTEX).table.clone()
    }

    /// Gateway-local ref of a live order, None once the order is terminal.
    pub fn order_ref(&self, engine_order_id: u64) -> Option<u64> {
        self.ctx
            .lock()
            .expect(POISONED_MUTEX)
            .id_to_ref
            .get(&engine_order_id)
            .copied()
    }
}
