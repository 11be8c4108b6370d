use async_trait::async_trait;
use ocs_fixedpoint::Points;
use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::types::{
    BrokerAdapter, BrokerError, BrokerOrderStatus, CreditSpreadOrder, OrderLookup, SubmitResult,
};

/// Deterministic in-memory broker: submissions are keyed by
/// `client_order_id` so a retried submit with the same id returns the same
/// response without double-booking a position, mirroring a real broker's
/// idempotency-key contract.
pub struct PaperBrokerAdapter {
    equity: Points,
    orders: Mutex<BTreeMap<String, OrderLookup>>,
}

impl PaperBrokerAdapter {
    pub fn new(equity: Points) -> Self {
        Self {
            equity,
            orders: Mutex::new(BTreeMap::new()),
        }
    }

    fn broker_order_id(client_order_id: &str) -> String {
        format!("paper:{client_order_id}")
    }
}

#[async_trait]
impl BrokerAdapter for PaperBrokerAdapter {
    async fn get_account_equity(&self) -> Result<Points, BrokerError> {
        Ok(self.equity)
    }

    async fn submit_credit_spread(
        &self,
        order: &CreditSpreadOrder,
    ) -> Result<SubmitResult, BrokerError> {
        let mut orders = self.orders.lock().expect("paper broker mutex poisoned");
        if let Some(existing) = orders.get(&order.client_order_id) {
            return Ok(SubmitResult::Confirmed {
                broker_order_id: existing.broker_order_id.clone(),
                status: existing.status,
            });
        }
        let broker_order_id = Self::broker_order_id(&order.client_order_id);
        orders.insert(
            order.client_order_id.clone(),
            OrderLookup {
                broker_order_id: broker_order_id.clone(),
                status: BrokerOrderStatus::Filled,
            },
        );
        Ok(SubmitResult::Confirmed {
            broker_order_id,
            status: BrokerOrderStatus::Filled,
        })
    }

    async fn get_today_orders(&self) -> Result<Vec<OrderLookup>, BrokerError> {
        Ok(self
            .orders
            .lock()
            .expect("paper broker mutex poisoned")
            .values()
            .cloned()
            .collect())
    }
}
