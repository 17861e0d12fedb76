//! The CTP gateway: one trader-front adapter plus one md-front adapter behind
//! the `Gateway` contract.
use std::sync::{Arc, Mutex};

use log::*;

use crate::core::common::OrderReq;
use crate::core::config::Config;
use crate::core::contract::ContractTable;
use crate::core::ctp::api::{MdApi, TraderApi};
use crate::core::ctp::md_api::CtpMdApi;
use crate::core::ctp::trade_api::CtpTradeApi;
use crate::core::gateway::Gateway;
use crate::core::wrapper::Wrapper;

/// Combines the trade and market-data sides of a CTP session. The vendor
/// endpoints are injected, so the same gateway runs against the real SDK
/// binding or the in-process test fronts.
pub struct CtpGateway<W: Wrapper> {
    trade_api: Arc<CtpTradeApi<W>>,
    md_api: Arc<CtpMdApi<W>>,
}

impl<W: Wrapper> CtpGateway<W> {
    pub fn new(
        wrapper: Arc<Mutex<W>>,
        trader_api: Arc<dyn TraderApi>,
        md_api: Arc<dyn MdApi>,
    ) -> Self {
        CtpGateway {
            trade_api: CtpTradeApi::new(wrapper.clone(), trader_api),
            md_api: CtpMdApi::new(wrapper, md_api),
        }
    }

    pub fn trade_api(&self) -> &Arc<CtpTradeApi<W>> {
        &self.trade_api
    }
}

impl<W: Wrapper> Gateway for CtpGateway<W> {
    fn login(&self, config: &Config) -> bool {
        if !self.trade_api.login(config) {
            return false;
        }
        // The md session is optional; a trade-only deployment leaves the
        // quote address empty.
        if !config.quote_server_address.is_empty() && !self.md_api.login(config) {
            error!("md login failed, closing the trade session");
            self.trade_api.logout();
            return false;
        }
        true
    }

    fn logout(&self) {
        self.md_api.logout();
        self.trade_api.logout();
    }

    fn send_order(&self, order: &OrderReq) -> u64 {
        self.trade_api.send_order(order)
    }

    fn cancel_order(&self, order_ref: u64) -> bool {
        self.trade_api.cancel_order(order_ref)
    }

    fn set_contract_table(&self, table: Arc<ContractTable>) {
        self.trade_api.set_contract_table(table.clone());
        self.md_api.set_contract_table(table);
    }

    fn query_contract(&self, ticker: &str, exchange: &str) -> bool {
        self.trade_api.query_contract(ticker, exchange)
    }

    fn query_contracts(&self) -> bool {
        self.trade_api.query_contracts()
    }

    fn query_position(&self, ticker: &str) -> bool {
        self.trade_api.query_position(ticker)
    }

    fn query_positions(&self) -> bool {
        self.trade_api.query_positions()
    }

    fn query_account(&self) -> bool {
        self.trade_api.query_account()
    }

    fn query_trades(&self) -> bool {
        self.trade_api.query_trades()
    }

    fn query_margin_rate(&self, ticker: &str) -> bool {
        self.trade_api.query_margin_rate(ticker)
    }
}
