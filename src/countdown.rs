use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};

pub const SECONDS_IN_MINUTE: i64 = 60;
pub const SECONDS_IN_HOUR: i64 = 60 * 60;
pub const SECONDS_IN_DAY: i64 = 24 * 60 * 60;

/// Whole-unit decomposition of a positive time difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    /// The target lies at or before `now`.
    Over,
    Remaining(Breakdown),
}

/// Decompose the difference between a target and the current time, both in
/// Unix milliseconds, into days/hours/minutes/seconds of time remaining.
pub fn countdown(target_ms: i64, now_ms: i64) -> CountdownState {
    if target_ms - now_ms <= 0 {
        return CountdownState::Over;
    }

    let mut diff = (target_ms - now_ms) / 1000;

    let days = diff / SECONDS_IN_DAY;
    diff -= days * SECONDS_IN_DAY;

    let hours = diff / SECONDS_IN_HOUR;
    diff -= hours * SECONDS_IN_HOUR;

    let minutes = diff / SECONDS_IN_MINUTE;
    diff -= minutes * SECONDS_IN_MINUTE;

    CountdownState::Remaining(Breakdown {
        days,
        hours,
        minutes,
        seconds: diff,
    })
}

/// Periodically resampled countdown toward a fixed target. The sampling
/// task is aborted when the timer is dropped, so a countdown never outlives
/// the view that owns it.
pub struct CountdownTimer {
    rx: watch::Receiver<CountdownState>,
    handle: JoinHandle<()>,
}

impl CountdownTimer {
    /// Once-per-second sampling, matching the display refresh rate.
    pub fn start(target_ms: i64) -> Self {
        Self::with_period(target_ms, Duration::from_secs(1))
    }

    pub fn with_period(target_ms: i64, period: Duration) -> Self {
        let initial = countdown(target_ms, Utc::now().timestamp_millis());
        let (tx, rx) = watch::channel(initial);

        let handle = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of `interval` fires immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let state = countdown(target_ms, Utc::now().timestamp_millis());
                if tx.send(state).is_err() {
                    break;
                }
                if state == CountdownState::Over {
                    break;
                }
            }
        });

        Self { rx, handle }
    }

    /// Latest sampled state.
    pub fn state(&self) -> CountdownState {
        *self.rx.borrow()
    }

    /// A receiver that observes every subsequent sample.
    pub fn subscribe(&self) -> watch::Receiver<CountdownState> {
        self.rx.clone()
    }
}

impl Drop for CountdownTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown(target_ms: i64, now_ms: i64) -> Breakdown {
        match countdown(target_ms, now_ms) {
            CountdownState::Remaining(b) => b,
            CountdownState::Over => panic!("expected a remaining breakdown"),
        }
    }

    #[test]
    fn decomposes_one_of_each_unit() {
        let now = 1_700_000_000_000;
        let b = breakdown(now + 90_061_000, now);
        assert_eq!(
            b,
            Breakdown {
                days: 1,
                hours: 1,
                minutes: 1,
                seconds: 1
            }
        );
    }

    #[test]
    fn past_or_present_target_is_over() {
        let now = 1_700_000_000_000;
        assert_eq!(countdown(now, now), CountdownState::Over);
        assert_eq!(countdown(now - 1, now), CountdownState::Over);
        assert_eq!(countdown(now - 86_400_000, now), CountdownState::Over);
    }

    #[test]
    fn sub_second_remainder_rounds_down() {
        let now = 1_700_000_000_000;
        let b = breakdown(now + 999, now);
        assert_eq!(
            b,
            Breakdown {
                days: 0,
                hours: 0,
                minutes: 0,
                seconds: 0
            }
        );
    }

    #[test]
    fn decomposition_identity_holds() {
        let now = 1_700_000_000_000;
        for offset_ms in [1_000, 59_999, 60_000, 3_599_000, 86_400_000, 123_456_789, 9_876_543_210]
        {
            let b = breakdown(now + offset_ms, now);
            assert_eq!(
                b.days * SECONDS_IN_DAY
                    + b.hours * SECONDS_IN_HOUR
                    + b.minutes * SECONDS_IN_MINUTE
                    + b.seconds,
                offset_ms / 1000,
                "offset {offset_ms}ms"
            );
            assert!(b.hours < 24 && b.minutes < 60 && b.seconds < 60);
        }
    }

    #[tokio::test]
    async fn timer_publishes_samples() {
        let target = Utc::now().timestamp_millis() + 10_000;
        let timer = CountdownTimer::with_period(target, Duration::from_millis(5));
        let mut rx = timer.subscribe();
        rx.changed().await.unwrap();
        assert!(matches!(*rx.borrow(), CountdownState::Remaining(_)));
    }

    #[tokio::test]
    async fn timer_reaches_terminal_state() {
        let target = Utc::now().timestamp_millis() - 1_000;
        let timer = CountdownTimer::with_period(target, Duration::from_millis(5));
        assert_eq!(timer.state(), CountdownState::Over);
    }
}
