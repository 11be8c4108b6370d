//! Config (A1): environment-driven configuration, loaded once at process
//! start and never re-read during a trading day.
//!
//! Load, validate, and report as one pass over env vars — no multi-file
//! config layering, since this system is one process with one set of env
//! vars, read once.

use ocs_fixedpoint::Points;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required key (no default) was absent.
    Missing(String),
    /// A key was present but failed to parse into its expected type.
    Invalid { key: String, value: String, reason: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing required config key: {key}"),
            ConfigError::Invalid { key, value, reason } => {
                write!(f, "invalid config value for {key}={value:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Brokerage and market-data vendor connection details. Opaque to the
/// core's decision logic — these exist only so the adapters (out of
/// scope here) have something to construct from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub base_url: String,
    pub api_key_or_token: String,
}

/// Top-level configuration loaded once at process start.
#[derive(Debug, Clone, PartialEq)]
pub struct OcsConfig {
    pub dry_run: bool,
    pub enable_live_trading: bool,
    pub daily_risk_pct: f64,
    pub min_contracts: i64,
    pub max_contracts: i64,
    pub report_recipient: String,

    pub broker: ConnectionConfig,
    pub broker_account_id: String,
    pub market_data: ConnectionConfig,

    pub underlying_symbol: String,
    pub option_root: String,
    pub option_root_width: usize,
}

const MIN_NET_CREDIT_HUNDREDTHS: i64 = 460;
const SLIPPAGE_BUFFER_HUNDREDTHS: i64 = 10;
const SPREAD_WIDTH_HUNDREDTHS: i64 = 1000;

impl OcsConfig {
    /// `MIN_NET_CREDIT` — a fixed trading-rule constant, not environment-configurable.
    pub fn min_net_credit() -> Points {
        Points::new(MIN_NET_CREDIT_HUNDREDTHS)
    }

    /// `SLIPPAGE_BUFFER` — fixed trading-rule constant.
    pub fn slippage_buffer() -> Points {
        Points::new(SLIPPAGE_BUFFER_HUNDREDTHS)
    }

    /// `SPREAD_WIDTH` — fixed trading-rule constant.
    pub fn spread_width() -> Points {
        Points::new(SPREAD_WIDTH_HUNDREDTHS)
    }

    /// `POLL_INTERVAL` — fixed trading-rule constant.
    pub fn poll_interval() -> std::time::Duration {
        std::time::Duration::from_secs(10)
    }

    /// Load from the real process environment. Reads an optional
    /// `.env.local` first (dev-time convenience, silently absent in
    /// production).
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::from_filename(".env.local");
        Self::load(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key/value source. Exposed so tests can
    /// construct a config without mutating real process environment state.
    pub fn load(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let dry_run = parse_bool_or(&get, "DRY_RUN", true)?;
        let enable_live_trading = parse_bool_or(&get, "ENABLE_LIVE_TRADING", false)?;
        let daily_risk_pct = parse_f64_or(&get, "DAILY_RISK_PCT", 0.03)?;
        let min_contracts = parse_i64_or(&get, "MIN_CONTRACTS", 1)?;
        let max_contracts = parse_i64_or(&get, "MAX_CONTRACTS", 50)?;

        if min_contracts < 1 {
            return Err(ConfigError::Invalid {
                key: "MIN_CONTRACTS".to_string(),
                value: min_contracts.to_string(),
                reason: "must be >= 1".to_string(),
            });
        }
        if max_contracts < min_contracts {
            return Err(ConfigError::Invalid {
                key: "MAX_CONTRACTS".to_string(),
                value: max_contracts.to_string(),
                reason: format!("must be >= MIN_CONTRACTS ({min_contracts})"),
            });
        }

        Ok(OcsConfig {
            dry_run,
            enable_live_trading,
            daily_risk_pct,
            min_contracts,
            max_contracts,
            report_recipient: required(&get, "REPORT_RECIPIENT")?,
            broker: ConnectionConfig {
                base_url: required(&get, "BROKER_BASE_URL")?,
                api_key_or_token: required(&get, "BROKER_BEARER_TOKEN")?,
            },
            broker_account_id: required(&get, "BROKER_ACCOUNT_ID")?,
            market_data: ConnectionConfig {
                base_url: required(&get, "MARKET_DATA_BASE_URL")?,
                api_key_or_token: required(&get, "MARKET_DATA_API_KEY")?,
            },
            underlying_symbol: get("UNDERLYING_SYMBOL").unwrap_or_else(|| "SPX".to_string()),
            option_root: get("OPTION_ROOT").unwrap_or_else(|| "SPXW".to_string()),
            option_root_width: parse_usize_or(&get, "OPTION_ROOT_WIDTH", 6)?,
        })
    }

    /// A `Debug`-safe rendering with secrets redacted, for startup logging.
    pub fn redacted_summary(&self) -> String {
        format!(
            "dry_run={} enable_live_trading={} daily_risk_pct={} min_contracts={} max_contracts={} \
             broker_base_url={} broker_account_id={} market_data_base_url={} underlying={} option_root={}",
            self.dry_run,
            self.enable_live_trading,
            self.daily_risk_pct,
            self.min_contracts,
            self.max_contracts,
            self.broker.base_url,
            self.broker_account_id,
            self.market_data.base_url,
            self.underlying_symbol,
            self.option_root,
        )
    }
}

fn required(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    get(key).ok_or_else(|| ConfigError::Missing(key.to_string()))
}

fn parse_bool_or(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: bool,
) -> Result<bool, ConfigError> {
    match get(key) {
        None => Ok(default),
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid {
                key: key.to_string(),
                value: raw,
                reason: "expected a boolean (true/false/1/0/yes/no/on/off)".to_string(),
            }),
        },
    }
}

fn parse_f64_or(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: f64,
) -> Result<f64, ConfigError> {
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.parse::<f64>().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value: raw,
            reason: "expected a decimal number".to_string(),
        }),
    }
}

fn parse_i64_or(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: i64,
) -> Result<i64, ConfigError> {
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.parse::<i64>().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value: raw,
            reason: "expected an integer".to_string(),
        }),
    }
}

fn parse_usize_or(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: usize,
) -> Result<usize, ConfigError> {
    match get(key) {
        None => Ok(default),
        Some(raw) => raw.parse::<usize>().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value: raw,
            reason: "expected a non-negative integer".to_string(),
        }),
    }
}

/// Test/CLI convenience: build a lookup closure from a plain map.
pub fn map_source(map: HashMap<&str, &str>) -> impl Fn(&str) -> Option<String> {
    move |key| map.get(key).map(|v| v.to_string())
}
