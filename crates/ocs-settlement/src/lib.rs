mod engine;

pub use engine::{settle, SettlementResult};
