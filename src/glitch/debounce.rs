use std::time::{Duration, Instant};

/// Trailing-edge debounce: a value is released once no newer value has been
/// scheduled for the whole quiet period.
#[derive(Debug)]
pub struct Debounce<T> {
    quiet: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> Debounce<T> {
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, pending: None }
    }

    /// Replace any pending value and restart the quiet period.
    pub fn schedule(&mut self, now: Instant, value: T) {
        self.pending = Some((now + self.quiet, value));
    }

    /// Drop the pending value without firing it.
    pub fn cancel(&mut self) -> Option<T> {
        self.pending.take().map(|(_, value)| value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Release the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if now >= *deadline => self.cancel(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_after_quiet_period() {
        let t0 = Instant::now();
        let mut debounce = Debounce::new(Duration::from_millis(100));
        debounce.schedule(t0, 1);

        assert_eq!(debounce.poll(t0 + Duration::from_millis(99)), None);
        assert_eq!(debounce.poll(t0 + Duration::from_millis(100)), Some(1));
        assert!(!debounce.is_pending());
        assert_eq!(debounce.poll(t0 + Duration::from_millis(500)), None);
    }

    #[test]
    fn test_reschedule_restarts_window() {
        let t0 = Instant::now();
        let mut debounce = Debounce::new(Duration::from_millis(100));
        debounce.schedule(t0, "first");
        debounce.schedule(t0 + Duration::from_millis(60), "second");

        assert_eq!(debounce.poll(t0 + Duration::from_millis(120)), None);
        assert_eq!(debounce.poll(t0 + Duration::from_millis(160)), Some("second"));
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut debounce = Debounce::new(Duration::from_millis(100));
        debounce.schedule(t0, 5);
        assert_eq!(debounce.cancel(), Some(5));
        assert_eq!(debounce.poll(t0 + Duration::from_secs(1)), None);
    }
}
