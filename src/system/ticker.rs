use std::thread;
use std::time::{Duration, Instant};

use tracing::warn;

/// Fixed-rate scheduler for the sampling loop.
///
/// `wait` is called at the top of every tick. It sleeps for whatever is left
/// of the period since the previous tick started; when the previous tick's
/// work already used up the whole period it logs a warning and returns at
/// once. Ticks are delayed, never skipped or coalesced.
#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    last_tick: Option<Instant>,
    degraded_ticks: u64,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            last_tick: None,
            degraded_ticks: 0,
        }
    }

    /// Number of ticks that started late because the previous one overran.
    pub fn degraded_ticks(&self) -> u64 {
        self.degraded_ticks
    }

    /// Block until the next tick is due, then mark it as started.
    pub fn wait(&mut self) {
        if let Some(last) = self.last_tick {
            let elapsed = last.elapsed();
            match sleep_budget(self.period, elapsed) {
                Some(remaining) => thread::sleep(remaining),
                None => {
                    self.degraded_ticks += 1;
                    warn!(
                        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                        period_ms = self.period.as_secs_f64() * 1000.0,
                        "degraded timing: tick overran the refresh interval, rate cannot keep up"
                    );
                }
            }
        }
        self.last_tick = Some(Instant::now());
    }
}

/// Time left to sleep in the current period, or `None` if `elapsed` already
/// exceeds it.
pub fn sleep_budget(period: Duration, elapsed: Duration) -> Option<Duration> {
    period.checked_sub(elapsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Log sink for asserting on emitted events.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("lock")).into_owned()
        }
    }

    fn with_captured_logs<F: FnOnce()>(f: F) -> String {
        let logs = Captured::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        logs.text()
    }

    #[test]
    fn budget_is_remaining_time() {
        let budget = sleep_budget(Duration::from_millis(250), Duration::from_millis(100));
        assert_eq!(budget, Some(Duration::from_millis(150)));
    }

    #[test]
    fn budget_is_zero_when_exactly_on_time() {
        let budget = sleep_budget(Duration::from_millis(250), Duration::from_millis(250));
        assert_eq!(budget, Some(Duration::ZERO));
    }

    #[test]
    fn budget_is_none_when_overrun() {
        assert_eq!(
            sleep_budget(Duration::from_millis(250), Duration::from_millis(251)),
            None
        );
    }

    #[test]
    fn first_tick_does_not_sleep() {
        let mut ticker = Ticker::new(Duration::from_secs(5));
        let start = Instant::now();
        ticker.wait();
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(ticker.degraded_ticks(), 0);
    }

    #[test]
    fn second_tick_waits_out_the_period() {
        let period = Duration::from_millis(40);
        let mut ticker = Ticker::new(period);
        ticker.wait();
        let start = Instant::now();
        ticker.wait();
        assert!(start.elapsed() >= Duration::from_millis(30));
        assert_eq!(ticker.degraded_ticks(), 0);
    }

    #[test]
    fn overrun_is_counted_and_does_not_sleep() {
        let period = Duration::from_millis(10);
        let mut ticker = Ticker::new(period);
        ticker.wait();
        thread::sleep(Duration::from_millis(30));
        let start = Instant::now();
        ticker.wait();
        assert!(start.elapsed() < period);
        assert_eq!(ticker.degraded_ticks(), 1);
    }

    #[test]
    fn overrun_logs_a_degraded_timing_warning() {
        let logs = with_captured_logs(|| {
            let mut ticker = Ticker::new(Duration::from_millis(10));
            ticker.wait();
            thread::sleep(Duration::from_millis(30));
            ticker.wait();
        });
        let warnings: Vec<&str> = logs.lines().filter(|l| l.contains("WARN")).collect();
        assert_eq!(warnings.len(), 1, "{logs}");
        assert!(warnings[0].contains("degraded timing"));
        assert!(warnings[0].contains("period_ms=10"));
    }

    #[test]
    fn on_time_ticks_log_nothing() {
        let logs = with_captured_logs(|| {
            let mut ticker = Ticker::new(Duration::from_millis(20));
            ticker.wait();
            ticker.wait();
        });
        assert!(!logs.contains("WARN"), "{logs}");
    }
}
