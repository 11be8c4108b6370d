use async_trait::async_trait;
use chrono::NaiveDate;
use ocs_broker::format_option_symbol;
use ocs_fixedpoint::Points;
use ocs_schemas::{QuoteSnapshot, Setup, SpreadStrikes};
use serde::Deserialize;

use crate::{OptionQuoteSource, QuoteSourceError};

/// Reqwest-backed `OptionQuoteSource` against a generic options-quote vendor.
///
/// One day's spread has a fixed expiration and option root; rather than
/// thread those through every call, they're fixed at construction and the
/// per-call `SpreadStrikes` supplies only what changes between strikes.
pub struct HttpOptionQuoteSource {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    option_root: String,
    option_root_width: usize,
    expiration: NaiveDate,
}

impl HttpOptionQuoteSource {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        option_root: impl Into<String>,
        option_root_width: usize,
        expiration: NaiveDate,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
            option_root: option_root.into(),
            option_root_width,
            expiration,
        }
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<QuoteSnapshot, QuoteSourceError> {
        let url = format!("{}/quotes", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[("symbol", symbol), ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| QuoteSourceError::Transport(e.to_string()))?;

        let parsed: VendorQuoteResponse = resp
            .json()
            .await
            .map_err(|e| QuoteSourceError::Decode(e.to_string()))?;

        Ok(QuoteSnapshot {
            bid: Points::from_f64(parsed.bid_price),
            ask: Points::from_f64(parsed.ask_price),
        })
    }
}

#[derive(Debug, Deserialize)]
struct VendorQuoteResponse {
    #[serde(rename = "bidPrice")]
    bid_price: f64,
    #[serde(rename = "askPrice")]
    ask_price: f64,
}

#[async_trait]
impl OptionQuoteSource for HttpOptionQuoteSource {
    async fn get_paired_quote(
        &self,
        strikes: SpreadStrikes,
    ) -> Result<(QuoteSnapshot, QuoteSnapshot), QuoteSourceError> {
        let is_call = matches!(strikes.setup, Setup::Call);
        let short_symbol = format_option_symbol(
            &self.option_root,
            self.option_root_width,
            self.expiration,
            is_call,
            strikes.short_strike,
        );
        let long_symbol = format_option_symbol(
            &self.option_root,
            self.option_root_width,
            self.expiration,
            is_call,
            strikes.long_strike,
        );

        let short = self.fetch_quote(&short_symbol).await?;
        let long = self.fetch_quote(&long_symbol).await?;
        Ok((short, long))
    }
}
