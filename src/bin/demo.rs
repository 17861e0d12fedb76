//! Binary for manually exercising the engine against the virtual gateway.
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;

use log::*;

use ctpcore::core::common::{Direction, Offset, OrderReq, OrderType, TickData};
use ctpcore::core::config::Config;
use ctpcore::core::contract::Contract;
use ctpcore::core::engine::TradingEngine;
use ctpcore::core::errors::CtpCoreError;
use ctpcore::core::risk::no_self_trade::NoSelfTradeRule;
use ctpcore::core::virtual_gateway::VirtualGateway;

/// Spins up an engine on the loop-back gateway, trades one instrument and
/// prints every engine event: accept, a partial fill, the closing fill, a
/// vetoed self-trade and one tick.
//==================================================================================================
pub fn main() -> Result<(), CtpCoreError> {
    log4rs::init_file("log_config.yml", Default::default()).unwrap();

    let config = Config {
        api: "virtual".to_string(),
        cancel_outstanding_orders_on_startup: false,
        ..Default::default()
    };

    let mut handle = None;
    let engine = TradingEngine::new(|ctx| {
        let gateway = Arc::new(VirtualGateway::new(ctx));
        gateway.add_contract(Contract {
            ticker: "rb2009".to_string(),
            exchange: "SHFE".to_string(),
            name: "rb2009".to_string(),
            size: 10,
            price_tick: 1.0,
            max_market_order_volume: 30,
            min_market_order_volume: 1,
            max_limit_order_volume: 500,
            min_limit_order_volume: 1,
            ..Default::default()
        });
        handle = Some(gateway.clone());
        Box::new(gateway)
    });
    let gateway = handle.expect("gateway factory did not run");

    engine.add_risk_rule(Box::new(NoSelfTradeRule::new()));
    let events = engine.subscribe();

    info!("logging in...");
    if !engine.login(&config) {
        error!("login failed");
        return Ok(());
    }

    let table = engine.contract_table().expect("contract table not sealed");
    let rb = table
        .get_by_ticker("rb2009")
        .expect("rb2009 not registered")
        .index;

    let buy = OrderReq {
        ticker_index: rb,
        direction: Direction::Buy,
        offset: Offset::Open,
        order_type: OrderType::Limit,
        volume: 10,
        price: 3500.0,
        ..Default::default()
    };
    let id = engine.send_order(&buy);
    info!("buy order sent, engine order id {}", id);

    let crossing_sell = OrderReq {
        ticker_index: rb,
        direction: Direction::Sell,
        offset: Offset::CloseToday,
        order_type: OrderType::Limit,
        volume: 10,
        price: 3499.0,
        ..Default::default()
    };
    if engine.send_order(&crossing_sell) == 0 {
        info!("crossing sell vetoed before reaching the gateway");
    }

    let order_ref = engine.order_ref(id).expect("order not live");
    gateway.fill(order_ref, 4, 3500.0);
    gateway.fill_all(3500.0);

    gateway.push_tick(TickData {
        ticker_index: rb,
        update_time: chrono::Utc::now().format("%H:%M:%S").to_string(),
        last_price: 3500.0,
        volume: 14,
        open_interest: 120.0,
        bid_price: 3499.0,
        bid_volume: 7,
        ask_price: 3501.0,
        ask_volume: 5,
    });

    loop {
        match events.recv_timeout(Duration::from_millis(500)) {
            Ok(event) => info!("engine event: {:?}", event),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    info!("account: {:?}", engine.account());
    engine.logout();
    Ok(())
}
