//! Clock & Scheduler.
//!
//! The orchestrator never calls `Utc::now()` or `tokio::time::sleep`
//! directly; every suspension point goes through a `Clock` so a test can
//! supply a deterministic fake and drive an entire trading day without
//! wall-clock delay.

use async_trait::async_trait;
use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Exchange time zone all trading-hour constants are expressed in.
pub const EXCHANGE_TZ: Tz = chrono_tz::America::New_York;

#[async_trait]
pub trait Clock: Send + Sync {
    /// Current instant, in UTC.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Suspend until the given exchange-local time-of-day occurs today.
    /// If that time has already passed today, returns immediately.
    async fn wait_until(&self, target: NaiveTime);
}

/// Real clock: `Utc::now()` + `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn wait_until(&self, target: NaiveTime) {
        let now = EXCHANGE_TZ.from_utc_datetime(&Utc::now().naive_utc());
        let target_today = now.date_naive().and_time(target);
        let target_local = match EXCHANGE_TZ.from_local_datetime(&target_today).single() {
            Some(dt) => dt,
            None => return,
        };
        if target_local <= now {
            return;
        }
        let delta = (target_local - now)
            .to_std()
            .unwrap_or(std::time::Duration::from_secs(0));
        tokio::time::sleep(delta).await;
    }
}

/// Deterministic fake clock for tests: holds a mutable "current instant"
/// that `wait_until` advances logically without actually sleeping.
pub mod fake {
    use super::*;
    use std::sync::Mutex;

    pub struct FakeClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl FakeClock {
        pub fn new(start: DateTime<Utc>) -> Self {
            Self { now: Mutex::new(start) }
        }

        pub fn set(&self, to: DateTime<Utc>) {
            *self.now.lock().expect("fake clock mutex poisoned") = to;
        }
    }

    #[async_trait]
    impl Clock for FakeClock {
        fn now_utc(&self) -> DateTime<Utc> {
            *self.now.lock().expect("fake clock mutex poisoned")
        }

        async fn wait_until(&self, target: NaiveTime) {
            let mut guard = self.now.lock().expect("fake clock mutex poisoned");
            let local = EXCHANGE_TZ.from_utc_datetime(&guard.naive_utc());
            let target_today = local.date_naive().and_time(target);
            if let Some(target_local) = EXCHANGE_TZ.from_local_datetime(&target_today).single() {
                if target_local > local {
                    *guard = target_local.with_timezone(&Utc);
                }
            }
        }
    }
}
