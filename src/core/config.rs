//! Session parameters consumed by `Gateway::login`. The YAML/CLI loader that
//! fills this struct lives outside this crate; serde derives keep the field
//! names the loader's keys.
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Config {
    /// Adapter selector: "ctp", "xtp", "virtual", ...
    pub api: String,
    pub trade_server_address: String,
    pub quote_server_address: String,
    pub broker_id: String,
    pub investor_id: String,
    pub password: String,
    /// Empty means the front does not require authentication.
    pub auth_code: String,
    pub app_id: String,
    /// Tickers subscribed for market data at login.
    pub subscription_list: Vec<String>,
    pub cancel_outstanding_orders_on_startup: bool,
    /// Opaque adapter-specific arguments.
    pub arg0: String,
    pub arg1: String,
    pub arg2: String,
    pub arg3: String,
    pub arg4: String,
    pub arg5: String,
    pub arg6: String,
    pub arg7: String,
    pub arg8: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api: "".to_string(),
            trade_server_address: "".to_string(),
            quote_server_address: "".to_string(),
            broker_id: "".to_string(),
            investor_id: "".to_string(),
            password: "".to_string(),
            auth_code: "".to_string(),
            app_id: "".to_string(),
            subscription_list: Vec::new(),
            cancel_outstanding_orders_on_startup: true,
            arg0: "".to_string(),
            arg1: "".to_string(),
            arg2: "".to_string(),
            arg3: "".to_string(),
            arg4: "".to_string(),
            arg5: "".to_string(),
            arg6: "".to_string(),
            arg7: "".to_string(),
            arg8: "".to_string(),
        }
    }
}
