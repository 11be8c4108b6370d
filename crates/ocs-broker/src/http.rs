use async_trait::async_trait;
use ocs_fixedpoint::Points;
use regex::Regex;
use serde::Deserialize;

use crate::symbol::format_option_symbol;
use crate::types::{
    BrokerAdapter, BrokerError, BrokerOrderStatus, CreditSpreadOrder, OrderLookup, SubmitResult,
};

/// Reqwest-backed `BrokerAdapter`.
///
/// Grounded on the Schwab-style submission contract: a successful order
/// POST can return 201/204 with an empty body and the order id only in the
/// `Location` response header (`.../orders/{id}`). This adapter recovers
/// that id when present; if neither the body nor the header yields one, it
/// reports `SubmitResult::Unconfirmed` and leaves resolution to a follow-up
/// `get_today_orders` lookup (matched by `client_order_id` at the gate).
pub struct HttpBrokerAdapter {
    client: reqwest::Client,
    base_url: String,
    bearer_token: String,
    account_id: String,
    option_root: String,
    option_root_width: usize,
}

impl HttpBrokerAdapter {
    pub fn new(
        base_url: impl Into<String>,
        bearer_token: impl Into<String>,
        account_id: impl Into<String>,
        option_root: impl Into<String>,
        option_root_width: usize,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            bearer_token: bearer_token.into(),
            account_id: account_id.into(),
            option_root: option_root.into(),
            option_root_width,
        }
    }

    fn order_id_from_location(location: &str) -> Option<String> {
        let re = Regex::new(r"/orders/(\d+)").expect("static regex is valid");
        re.captures(location)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    #[serde(rename = "currentBalances")]
    current_balances: CurrentBalances,
}

#[derive(Debug, Deserialize)]
struct CurrentBalances {
    #[serde(rename = "liquidationValue")]
    liquidation_value: f64,
}

#[derive(Debug, Deserialize)]
struct OrderStatusResponse {
    #[serde(rename = "orderId")]
    order_id: serde_json::Value,
    status: String,
}

fn parse_status(raw: &str) -> BrokerOrderStatus {
    match raw {
        "WORKING" | "PENDING_ACTIVATION" | "ACCEPTED" | "QUEUED" => BrokerOrderStatus::Working,
        "FILLED" => BrokerOrderStatus::Filled,
        "REJECTED" => BrokerOrderStatus::Rejected,
        "CANCELED" | "CANCELLED" => BrokerOrderStatus::Cancelled,
        _ => BrokerOrderStatus::Unknown,
    }
}

#[async_trait]
impl BrokerAdapter for HttpBrokerAdapter {
    async fn get_account_equity(&self) -> Result<Points, BrokerError> {
        let url = format!("{}/accounts/{}", self.base_url, self.account_id);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;
        let parsed: AccountResponse = resp
            .json()
            .await
            .map_err(|e| BrokerError::Decode(e.to_string()))?;
        Ok(Points::from_f64(parsed.current_balances.liquidation_value))
    }

    async fn submit_credit_spread(
        &self,
        order: &CreditSpreadOrder,
    ) -> Result<SubmitResult, BrokerError> {
        let short_symbol = format_option_symbol(
            &self.option_root,
            self.option_root_width,
            order.expiration,
            matches!(order.setup, ocs_schemas::Setup::Call),
            order.short_strike,
        );
        let long_symbol = format_option_symbol(
            &self.option_root,
            self.option_root_width,
            order.expiration,
            matches!(order.setup, ocs_schemas::Setup::Call),
            order.long_strike,
        );

        let body = serde_json::json!({
            "clientOrderId": order.client_order_id,
            "orderType": "NET_CREDIT",
            "session": "NORMAL",
            "duration": "DAY",
            "price": order.limit_net_credit.to_f64(),
            "orderLegCollection": [
                { "instruction": "SELL_TO_OPEN", "quantity": order.quantity, "symbol": short_symbol },
                { "instruction": "BUY_TO_OPEN", "quantity": order.quantity, "symbol": long_symbol },
            ],
        });

        let url = format!("{}/accounts/{}/orders", self.base_url, self.account_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.bearer_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;

        let location = resp
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let raw_body = resp
            .text()
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;

        if !raw_body.trim().is_empty() {
            if let Ok(parsed) = serde_json::from_str::<OrderStatusResponse>(&raw_body) {
                let id = match parsed.order_id {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                return Ok(SubmitResult::Confirmed {
                    broker_order_id: id,
                    status: parse_status(&parsed.status),
                });
            }
        }

        if let Some(location) = location {
            if let Some(id) = Self::order_id_from_location(&location) {
                return Ok(SubmitResult::LocationOnly { broker_order_id: id });
            }
        }

        Ok(SubmitResult::Unconfirmed)
    }

    async fn get_today_orders(&self) -> Result<Vec<OrderLookup>, BrokerError> {
        let url = format!("{}/accounts/{}/orders", self.base_url, self.account_id);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .map_err(|e| BrokerError::Transport(e.to_string()))?;
        let parsed: Vec<OrderStatusResponse> = resp
            .json()
            .await
            .map_err(|e| BrokerError::Decode(e.to_string()))?;
        Ok(parsed
            .into_iter()
            .map(|o| OrderLookup {
                broker_order_id: match o.order_id {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                },
                status: parse_status(&o.status),
            })
            .collect())
    }
}
