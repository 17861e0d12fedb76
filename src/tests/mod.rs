pub mod helpers;

mod test_ctp_common;
mod test_trade_api;
