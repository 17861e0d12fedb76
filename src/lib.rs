/*! Trading-engine core for CTP-style futures brokers.

For usage of this library, please see the example implementation in src/bin/demo.rs

The main pieces clients will use are **TradingEngine**, a struct that owns a
gateway adapter and a chain of pre-trade risk rules, applies risk to every
outbound order and routes order/trade/tick callbacks to subscribers, and
**Wrapper**, the trait a callback sink implements to receive data and
notifications from a gateway adapter's callback threads.

# Example

```text
// EngineCtx implements the Wrapper trait and is driven by the gateway's
// callback threads
let engine = TradingEngine::new(|ctx| Box::new(VirtualGateway::new(ctx)));
engine.add_risk_rule(Box::new(NoSelfTradeRule::new()));

let events = engine.subscribe();

if !engine.login(&config) {
    error!("login failed");
    return Ok(());
}

let id = engine.send_order(&req);
// `events` now delivers OrderAccepted / OrderTraded / ... for id
```
*/
pub mod core;

#[cfg(test)]
mod tests;
