use std::time::Duration;

/// Loading screen shown for a fixed delay before the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplashGate {
    started: Duration,
    delay: Duration,
}

impl SplashGate {
    pub const TITLE: &'static str = "Loading Portfolio";
    pub const SUBTITLE: &'static str = "Initializing ICT technology expertise...";

    pub fn new(started: Duration, delay: Duration) -> Self {
        Self { started, delay }
    }

    pub fn is_done(&self, now: Duration) -> bool {
        now.saturating_sub(self.started) >= self.delay
    }

    /// Time left before the page shows, zero once done.
    pub fn remaining(&self, now: Duration) -> Duration {
        self.delay.saturating_sub(now.saturating_sub(self.started))
    }
}
