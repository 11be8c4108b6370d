mod http;
mod memory;
mod provider;

pub use http::HttpMarketDataAdapter;
pub use memory::InMemoryMarketDataAdapter;
pub use provider::{FetchCandlesRequest, MarketDataAdapter, MarketDataError};
