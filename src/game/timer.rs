//! Owned tick schedule for the simulation.
//!
//! The timer holds at most one live interval. Starting it while it is live
//! replaces the old interval, which is dropped in the same call, so there is
//! never a second outstanding schedule. The tokio interval itself is built
//! lazily on the first poll, which lets the state machine start and cancel
//! the timer outside of a runtime (unit tests, headless drivers).

use std::future;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

#[derive(Debug, Default)]
pub struct TickTimer {
    period: Option<Duration>,
    interval: Option<Interval>,
    schedules: u64,
}

impl TickTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule ticks every `period`, cancelling any live schedule first.
    /// The first tick fires one full period after the first poll.
    pub fn start(&mut self, period: Duration) {
        self.cancel();
        self.period = Some(period);
        self.schedules += 1;
    }

    /// Clear the live schedule. Returns whether one was live.
    pub fn cancel(&mut self) -> bool {
        self.interval = None;
        self.period.take().is_some()
    }

    pub fn is_live(&self) -> bool {
        self.period.is_some()
    }

    pub fn period(&self) -> Option<Duration> {
        self.period
    }

    /// Number of schedules created so far, live or not
    pub fn schedules(&self) -> u64 {
        self.schedules
    }

    /// Wait for the next tick. Never resolves while the timer is cancelled,
    /// so it can sit in a `select!` branch unconditionally.
    pub async fn tick(&mut self) {
        let Some(period) = self.period else {
            return future::pending().await;
        };

        let interval = self.interval.get_or_insert_with(|| {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        interval.tick().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_and_cancel() {
        let mut timer = TickTimer::new();
        assert!(!timer.is_live());

        timer.start(Duration::from_millis(120));
        assert!(timer.is_live());
        assert_eq!(timer.period(), Some(Duration::from_millis(120)));

        assert!(timer.cancel());
        assert!(!timer.is_live());
        assert!(!timer.cancel());
    }

    #[test]
    fn test_restart_replaces_schedule() {
        let mut timer = TickTimer::new();
        timer.start(Duration::from_millis(120));
        timer.start(Duration::from_millis(115));

        assert!(timer.is_live());
        assert_eq!(timer.period(), Some(Duration::from_millis(115)));
        assert_eq!(timer.schedules(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_after_one_period() {
        let mut timer = TickTimer::new();
        timer.start(Duration::from_millis(100));

        let begin = Instant::now();
        timer.tick().await;
        assert_eq!(begin.elapsed(), Duration::from_millis(100));

        timer.tick().await;
        assert_eq!(begin.elapsed(), Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_timer_never_ticks() {
        let mut timer = TickTimer::new();
        timer.start(Duration::from_millis(50));
        timer.cancel();

        let fired = tokio::time::timeout(Duration::from_secs(5), timer.tick()).await;
        assert!(fired.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_uses_new_period() {
        let mut timer = TickTimer::new();
        timer.start(Duration::from_millis(100));
        timer.tick().await;

        timer.start(Duration::from_millis(40));
        let begin = Instant::now();
        timer.tick().await;
        assert_eq!(begin.elapsed(), Duration::from_millis(40));
    }
}
