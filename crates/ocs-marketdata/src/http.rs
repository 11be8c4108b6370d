use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use ocs_fixedpoint::Points;
use ocs_schemas::Candle;
use serde::Deserialize;

use crate::provider::{FetchCandlesRequest, MarketDataAdapter, MarketDataError};

/// Reqwest-backed `MarketDataAdapter` against a generic index-quote vendor.
///
/// The wire shape here (time-series array of `{datetime, open, high, low,
/// close}` strings) is the common denominator across most retail market-data
/// vendors; `base_url` and `api_key` are injected so this adapter is not
/// tied to any one provider's domain.
pub struct HttpMarketDataAdapter {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpMarketDataAdapter {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn parse_bar_start(raw: &str) -> Result<DateTime<Utc>, MarketDataError> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
            }
        }
        Err(MarketDataError::Decode(format!(
            "unrecognized bar datetime: {raw}"
        )))
    }
}

#[derive(Debug, Deserialize)]
struct VendorBarValue {
    datetime: String,
    open: String,
    high: String,
    low: String,
    close: String,
}

#[derive(Debug, Deserialize)]
struct VendorTimeSeriesResponse {
    #[serde(default)]
    values: Vec<VendorBarValue>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[async_trait]
impl MarketDataAdapter for HttpMarketDataAdapter {
    async fn get_30min_candles(
        &self,
        req: FetchCandlesRequest,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let url = format!("{}/time_series", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("symbol", req.symbol.as_str()),
                ("interval", "30min"),
                ("date", req.trade_date.format("%Y-%m-%d").to_string().as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| MarketDataError::Transport(e.to_string()))?;

        let parsed: VendorTimeSeriesResponse = resp
            .json()
            .await
            .map_err(|e| MarketDataError::Decode(e.to_string()))?;

        if parsed.status.as_deref() == Some("error") {
            return Err(MarketDataError::Api(
                parsed.message.unwrap_or_else(|| "unknown vendor error".to_string()),
            ));
        }

        let mut bars = Vec::with_capacity(parsed.values.len());
        for v in parsed.values {
            bars.push(Candle {
                bar_start: Self::parse_bar_start(&v.datetime)?,
                open: Points::from_f64(v.open.parse().map_err(|_| {
                    MarketDataError::Decode(format!("bad open value: {}", v.open))
                })?),
                high: Points::from_f64(v.high.parse().map_err(|_| {
                    MarketDataError::Decode(format!("bad high value: {}", v.high))
                })?),
                low: Points::from_f64(v.low.parse().map_err(|_| {
                    MarketDataError::Decode(format!("bad low value: {}", v.low))
                })?),
                close: Points::from_f64(v.close.parse().map_err(|_| {
                    MarketDataError::Decode(format!("bad close value: {}", v.close))
                })?),
            });
        }
        bars.sort_by_key(|b| b.bar_start);
        Ok(bars)
    }

    async fn get_index_close(
        &self,
        symbol: &str,
        trade_date: NaiveDate,
    ) -> Result<Option<Points>, MarketDataError> {
        let bars = self
            .get_30min_candles(FetchCandlesRequest {
                symbol: symbol.to_string(),
                trade_date,
            })
            .await?;
        Ok(bars.last().map(|b| b.close))
    }
}
