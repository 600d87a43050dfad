use std::time::{Duration, Instant};

/// Fixed-period tick schedule for the real-time countdown.
///
/// Deadlines advance by whole periods from the start instant, so time spent
/// handling input between ticks never pushes the schedule back.
#[derive(Debug, Clone, Copy)]
pub struct TickPacer {
    next: Instant,
    period: Duration,
}

impl TickPacer {
    pub fn new(start: Instant, period: Duration) -> Self {
        Self {
            next: start + period,
            period,
        }
    }

    /// How long to wait at `now` before the next tick is due.
    pub fn wait(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Ticks due at `now`. The schedule moves past each one counted.
    pub fn due(&mut self, now: Instant) -> u32 {
        let mut count = 0;
        while now >= self.next {
            count += 1;
            self.next += self.period;
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn nothing_is_due_before_the_first_period() {
        let start = Instant::now();
        let mut pacer = TickPacer::new(start, SECOND);
        assert_eq!(pacer.due(start + Duration::from_millis(999)), 0);
        assert_eq!(
            pacer.wait(start + Duration::from_millis(400)),
            Duration::from_millis(600)
        );
    }

    #[test]
    fn steady_input_does_not_delay_ticks() {
        let start = Instant::now();
        let mut pacer = TickPacer::new(start, SECOND);
        let mut ticks = 0;
        // a line handled every 0.9 s for 9 s
        for step in 1..=10 {
            let now = start + Duration::from_millis(900 * step);
            ticks += pacer.due(now);
        }
        assert_eq!(ticks, 9);
        assert_eq!(
            pacer.wait(start + Duration::from_millis(9000)),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn late_wakeup_catches_up() {
        let start = Instant::now();
        let mut pacer = TickPacer::new(start, SECOND);
        assert_eq!(pacer.due(start + Duration::from_millis(3500)), 3);
        assert_eq!(
            pacer.wait(start + Duration::from_millis(3500)),
            Duration::from_millis(500)
        );
    }
}
