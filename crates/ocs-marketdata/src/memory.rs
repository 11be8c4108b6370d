use async_trait::async_trait;
use chrono::NaiveDate;
use ocs_fixedpoint::Points;
use ocs_schemas::Candle;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::provider::{FetchCandlesRequest, MarketDataAdapter, MarketDataError};

/// Deterministic in-memory `MarketDataAdapter` for tests: candles and
/// closes are seeded up front and served back verbatim, no network.
#[derive(Default)]
pub struct InMemoryMarketDataAdapter {
    candles: Mutex<HashMap<(String, NaiveDate), Vec<Candle>>>,
    closes: Mutex<HashMap<(String, NaiveDate), Points>>,
}

impl InMemoryMarketDataAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_candles(&self, symbol: &str, trade_date: NaiveDate, bars: Vec<Candle>) {
        self.candles
            .lock()
            .expect("candles mutex poisoned")
            .insert((symbol.to_string(), trade_date), bars);
    }

    pub fn seed_close(&self, symbol: &str, trade_date: NaiveDate, close: Points) {
        self.closes
            .lock()
            .expect("closes mutex poisoned")
            .insert((symbol.to_string(), trade_date), close);
    }
}

#[async_trait]
impl MarketDataAdapter for InMemoryMarketDataAdapter {
    async fn get_30min_candles(
        &self,
        req: FetchCandlesRequest,
    ) -> Result<Vec<Candle>, MarketDataError> {
        Ok(self
            .candles
            .lock()
            .expect("candles mutex poisoned")
            .get(&(req.symbol, req.trade_date))
            .cloned()
            .unwrap_or_default())
    }

    async fn get_index_close(
        &self,
        symbol: &str,
        trade_date: NaiveDate,
    ) -> Result<Option<Points>, MarketDataError> {
        Ok(self
            .closes
            .lock()
            .expect("closes mutex poisoned")
            .get(&(symbol.to_string(), trade_date))
            .copied())
    }
}
