use jiff::{SignedDuration, Timestamp};

pub trait Clock: Send + Sync {
    /// Returns the current time of the clock
    fn now(&self) -> Timestamp;
    /// Block the calling thread for the given duration.
    ///
    /// Non-positive durations return immediately.
    fn sleep(&self, duration: SignedDuration);
}

/// Wall clock of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    fn sleep(&self, duration: SignedDuration) {
        if duration.is_positive() {
            std::thread::sleep(duration.unsigned_abs());
        }
    }
}
