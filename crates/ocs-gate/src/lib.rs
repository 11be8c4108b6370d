//! Order Gate & Submitter (C11): the single choke-point through which the
//! day's one order can reach the broker.
//!
//! A safety predicate is evaluated once, in one place, and every submission
//! path runs through it — there is no second code path that reaches
//! [`BrokerAdapter::submit_credit_spread`] directly. The predicate is
//! exactly two flags: `dry_run` and `enable_live_trading`.

use ocs_broker::{BrokerAdapter, BrokerError, CreditSpreadOrder, OrderLookup, SubmitResult};
use ocs_schemas::SubmissionOutcome;
use tokio::sync::Mutex;

/// The synthetic order id used for dry-run submissions. Fixed, not
/// derived from the order — every dry run reports the same id, which is
/// the point: a caller diffing two dry-run records for the same inputs
/// should see identical output.
pub const DRY_RUN_ORDER_ID: &str = "DRY_RUN_MOCK_ORDER_ID";
pub const DRY_RUN_STATUS: &str = "DRY_RUN";

/// `dry_run` defaults true, `enable_live_trading` defaults false — the gate
/// fails closed: submission requires both flags to be explicitly flipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetyConfig {
    pub dry_run: bool,
    pub enable_live_trading: bool,
}

impl SafetyConfig {
    /// The single predicate that governs whether a real order reaches the
    /// broker. `dry_run ∨ ¬enable_live_trading ⇒ synthetic` — this is the
    /// only place that check is made.
    pub fn live_submission_allowed(&self) -> bool {
        !self.dry_run && self.enable_live_trading
    }
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self { dry_run: true, enable_live_trading: false }
    }
}

fn status_label(status: ocs_broker::BrokerOrderStatus) -> String {
    use ocs_broker::BrokerOrderStatus::*;
    match status {
        Working => "WORKING",
        Filled => "FILLED",
        Rejected => "REJECTED",
        Cancelled => "CANCELLED",
        Unknown => "UNKNOWN",
    }
    .to_string()
}

/// The order gate. Owns the broker adapter and serialises submissions
/// through an internal lock: two submissions racing the broker must not
/// happen, so the gate enforces one-at-a-time access itself.
pub struct OrderGateway<B: BrokerAdapter> {
    broker: B,
    submit_lock: Mutex<()>,
}

impl<B: BrokerAdapter> OrderGateway<B> {
    pub fn new(broker: B) -> Self {
        Self { broker, submit_lock: Mutex::new(()) }
    }

    pub fn broker(&self) -> &B {
        &self.broker
    }

    /// Submit (or synthesize, in dry-run/safety-gated mode) one credit
    /// spread order. No retries: the broker is authoritative, and a retry
    /// here would risk a duplicate live order.
    pub async fn submit(
        &self,
        order: &CreditSpreadOrder,
        safety: &SafetyConfig,
    ) -> Result<SubmissionOutcome, BrokerError> {
        let _guard = self.submit_lock.lock().await;

        if !safety.live_submission_allowed() {
            tracing::info!(
                dry_run = safety.dry_run,
                enable_live_trading = safety.enable_live_trading,
                "order gate: safety flags hold, submitting synthetic dry-run order"
            );
            return Ok(SubmissionOutcome::DryRun {
                synthetic_order_id: DRY_RUN_ORDER_ID.to_string(),
            });
        }

        match self.broker.submit_credit_spread(order).await? {
            SubmitResult::Confirmed { broker_order_id, status } => {
                Ok(SubmissionOutcome::Confirmed {
                    broker_order_id,
                    status: status_label(status),
                })
            }
            SubmitResult::LocationOnly { broker_order_id } => {
                Ok(self.resolve_via_lookup(broker_order_id).await)
            }
            SubmitResult::Unconfirmed => {
                tracing::warn!(
                    client_order_id = %order.client_order_id,
                    "order gate: submission ambiguous, no body and no Location header"
                );
                Ok(SubmissionOutcome::AcceptedUnconfirmed)
            }
        }
    }

    /// A `Location`-header id was recovered but the submit response carried
    /// no status; look it up in today's orders. If the follow-up lookup
    /// itself fails or doesn't find the id, the id from the header still
    /// stands — it is not discarded, only its status is left unconfirmed.
    async fn resolve_via_lookup(&self, broker_order_id: String) -> SubmissionOutcome {
        match self.broker.get_today_orders().await {
            Ok(orders) => {
                match orders.into_iter().find(|o: &OrderLookup| o.broker_order_id == broker_order_id) {
                    Some(found) => SubmissionOutcome::Confirmed {
                        broker_order_id: found.broker_order_id,
                        status: status_label(found.status),
                    },
                    None => SubmissionOutcome::AcceptedViaLocation { broker_order_id },
                }
            }
            Err(err) => {
                tracing::warn!(%err, "order gate: follow-up order lookup failed, id from Location stands unconfirmed");
                SubmissionOutcome::AcceptedViaLocation { broker_order_id }
            }
        }
    }
}

/// Deterministic `client_order_id` for one day's single order: same trade
/// date, setup and strikes always derive the same id, so a re-submission
/// (e.g. after a crash-restart on the same day) is recognised as the same
/// order by an idempotency-key-aware broker rather than double-booking.
pub fn derive_client_order_id(
    trade_date: chrono::NaiveDate,
    setup: ocs_schemas::Setup,
    short_strike: ocs_fixedpoint::Points,
    long_strike: ocs_fixedpoint::Points,
) -> String {
    format!("ocs-{trade_date}-{setup}-{short_strike}-{long_strike}")
}
