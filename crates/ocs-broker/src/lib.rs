mod http;
mod paper;
mod symbol;
mod types;

pub use http::HttpBrokerAdapter;
pub use paper::PaperBrokerAdapter;
pub use symbol::format_option_symbol;
pub use types::{
    BrokerAdapter, BrokerError, BrokerOrderStatus, CreditSpreadOrder, OrderLookup, SubmitResult,
};
