//! Tradable instruments and the sealed instrument registry
use std::collections::HashMap;
use std::fmt::{self, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::core::common::ProductType;
use crate::core::errors::CtpCoreError;

//==================================================================================================
/// A tradable instrument. Immutable once registered; the current margin rates
/// live in side cells of the table (see `ContractTable::update_margin_rate`)
/// because the broker reports them after registration.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Contract {
    /// Dense table index, the hot-path key. Assigned by `ContractTable::insert`.
    pub index: u32,
    pub ticker: String,
    pub exchange: String,
    pub name: String,
    pub product_type: ProductType,
    /// Contract multiplier.
    pub size: i32,
    pub price_tick: f64,
    pub max_market_order_volume: i32,
    pub min_market_order_volume: i32,
    pub max_limit_order_volume: i32,
    pub min_limit_order_volume: i32,
    pub delivery_year: i32,
    pub delivery_month: i32,
    pub long_margin_rate: f64,
    pub short_margin_rate: f64,
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} (index {}, {}, size {}, tick {})",
            self.ticker, self.exchange, self.index, self.product_type, self.size, self.price_tick
        )
    }
}

//==================================================================================================
struct MarginCell {
    long_bits: AtomicU64,
    short_bits: AtomicU64,
}

impl MarginCell {
    fn new(long: f64, short: f64) -> Self {
        MarginCell {
            long_bits: AtomicU64::new(long.to_bits()),
            short_bits: AtomicU64::new(short.to_bits()),
        }
    }
}

//==================================================================================================
/// Write-once-at-startup, read-many instrument registry.
///
/// The table is built with `insert` while exclusively owned, then sealed by
/// moving it into an `Arc`; shared ownership makes further inserts impossible
/// and every lookup lock-free. Margin rates are the one field the broker
/// updates after sealing, so they sit in atomic cells beside the contracts.
#[derive(Default)]
pub struct ContractTable {
    contracts: Vec<Contract>,
    by_ticker: HashMap<String, u32>,
    margin: Vec<MarginCell>,
}

impl ContractTable {
    pub fn new() -> Self {
        ContractTable::default()
    }

    //----------------------------------------------------------------------------------------------
    /// Registers a contract and assigns its dense index. Fails on a duplicate
    /// (ticker, exchange) pair or a non-positive multiplier.
    pub fn insert(&mut self, mut contract: Contract) -> Result<u32, CtpCoreError> {
        if contract.size <= 0 {
            return Err(CtpCoreError::Table(format!(
                "invalid multiplier {} for {}",
                contract.size, contract.ticker
            )));
        }
        if self
            .contracts
            .iter()
            .any(|c| c.ticker == contract.ticker && c.exchange == contract.exchange)
        {
            return Err(CtpCoreError::Table(format!(
                "duplicate contract {}.{}",
                contract.ticker, contract.exchange
            )));
        }

        let index = self.contracts.len() as u32;
        contract.index = index;
        // The same ticker may list on more than one exchange; the first
        // registration keeps the ticker-only lookup slot.
        self.by_ticker.entry(contract.ticker.clone()).or_insert(index);
        self.margin
            .push(MarginCell::new(contract.long_margin_rate, contract.short_margin_rate));
        self.contracts.push(contract);
        Ok(index)
    }

    //----------------------------------------------------------------------------------------------
    pub fn get_by_index(&self, index: u32) -> Option<&Contract> {
        self.contracts.get(index as usize)
    }

    //----------------------------------------------------------------------------------------------
    /// Ticker-only lookup. When the same ticker lists on several exchanges,
    /// this resolves to the first-registered contract.
    pub fn get_by_ticker(&self, ticker: &str) -> Option<&Contract> {
        self.by_ticker
            .get(ticker)
            .and_then(|&i| self.contracts.get(i as usize))
    }

    //----------------------------------------------------------------------------------------------
    /// Current (long, short) margin rates for a contract.
    pub fn margin_rate(&self, index: u32) -> Option<(f64, f64)> {
        self.margin.get(index as usize).map(|cell| {
            (
                f64::from_bits(cell.long_bits.load(Ordering::Acquire)),
                f64::from_bits(cell.short_bits.load(Ordering::Acquire)),
            )
        })
    }

    //----------------------------------------------------------------------------------------------
    /// Stores margin rates reported by the broker. Works through `&self` so a
    /// sealed (shared) table stays updatable for this one field.
    pub fn update_margin_rate(&self, index: u32, long: f64, short: f64) -> bool {
        match self.margin.get(index as usize) {
            Some(cell) => {
                cell.long_bits.store(long.to_bits(), Ordering::Release);
                cell.short_bits.store(short.to_bits(), Ordering::Release);
                true
            }
            None => false,
        }
    }

    //----------------------------------------------------------------------------------------------
    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}
