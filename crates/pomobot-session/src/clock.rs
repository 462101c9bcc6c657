//! Wall-clock minute ticker.
//!
//! Delivers one callback per minute boundary for as long as the
//! subscription lives. Each delivery runs in its own task so a slow
//! handler never delays the schedule; the engine's recomputation is
//! idempotent, so overlapping deliveries are harmless.

use std::future::Future;
use std::time::Duration;

use chrono::{Timelike, Utc};
use tokio::task::JoinHandle;

/// Ticker configuration. `minutely` is the production shape; tests
/// inject a short period.
#[derive(Debug, Clone)]
pub struct SessionClock {
    period: Duration,
    align_to_minute: bool,
}

impl SessionClock {
    /// One tick per wall-clock minute, first tick on the next boundary.
    pub fn minutely() -> Self {
        Self {
            period: Duration::from_secs(60),
            align_to_minute: true,
        }
    }

    /// Unaligned ticker with an arbitrary period.
    pub fn with_period(period: Duration) -> Self {
        Self {
            period,
            align_to_minute: false,
        }
    }

    /// Start delivering ticks to `on_tick` until the subscription is
    /// cancelled or dropped.
    pub fn subscribe<F, Fut>(&self, on_tick: F) -> TickSubscription
    where
        F: Fn(chrono::DateTime<Utc>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let period = self.period;
        let align = self.align_to_minute;

        let handle = tokio::spawn(async move {
            if align {
                tokio::time::sleep(until_next_minute()).await;
            }
            let mut interval = tokio::time::interval(period);
            // The first interval tick completes immediately.
            interval.tick().await;
            loop {
                // Deliveries are spawned so ticks stay on schedule even
                // while a previous handler is still awaiting cue
                // playback.
                tokio::spawn(on_tick(Utc::now()));
                interval.tick().await;
            }
        });

        TickSubscription { handle }
    }
}

/// Time remaining until the next minute boundary.
fn until_next_minute() -> Duration {
    let now = Utc::now();
    let into_minute = u64::from(now.second()) * 1_000 + u64::from(now.timestamp_subsec_millis());
    Duration::from_millis(60_000u64.saturating_sub(into_minute).max(1))
}

/// Handle to an active tick subscription. Cancelling (or dropping)
/// guarantees no further ticks are delivered.
#[derive(Debug)]
pub struct TickSubscription {
    handle: JoinHandle<()>,
}

impl TickSubscription {
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for TickSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn short_period_clock_ticks_repeatedly() {
        let count = Arc::new(AtomicU32::new(0));
        let clock = SessionClock::with_period(Duration::from_millis(10));
        let counter = Arc::clone(&count);
        let sub = clock.subscribe(move |_now| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        sub.cancel();
        assert!(count.load(Ordering::SeqCst) >= 3);
    }

    #[tokio::test]
    async fn cancel_stops_delivery() {
        let count = Arc::new(AtomicU32::new(0));
        let clock = SessionClock::with_period(Duration::from_millis(10));
        let counter = Arc::clone(&count);
        let sub = clock.subscribe(move |_now| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        sub.cancel();
        let after_cancel = count.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_cancel);
    }

    #[tokio::test]
    async fn drop_cancels_subscription() {
        let count = Arc::new(AtomicU32::new(0));
        let clock = SessionClock::with_period(Duration::from_millis(10));
        let counter = Arc::clone(&count);
        {
            let _sub = clock.subscribe(move |_now| {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            });
            tokio::time::sleep(Duration::from_millis(40)).await;
        }
        let after_drop = count.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(count.load(Ordering::SeqCst), after_drop);
    }

    #[test]
    fn until_next_minute_is_bounded() {
        let wait = until_next_minute();
        assert!(wait <= Duration::from_secs(60));
        assert!(wait >= Duration::from_millis(1));
    }
}
