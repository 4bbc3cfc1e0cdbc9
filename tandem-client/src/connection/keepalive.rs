use std::time::Duration;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::warn;

/// Shortest period the keepalive will run at.
pub(crate) const MIN_KEEPALIVE_PERIOD: Duration = Duration::from_millis(100);

/// Fixed-period timer for the `ping` keepalive. The first tick lands one
/// full period after creation.
pub(crate) struct Keepalive {
    interval: Interval,
}

impl Keepalive {
    pub(crate) fn new(period: Duration) -> Self {
        let period = if period < MIN_KEEPALIVE_PERIOD {
            warn!(
                "Keepalive period {:?} too short, using {:?}",
                period, MIN_KEEPALIVE_PERIOD
            );
            MIN_KEEPALIVE_PERIOD
        } else {
            period
        };

        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }

    pub(crate) async fn tick(&mut self) {
        self.interval.tick().await;
    }
}
