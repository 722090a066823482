use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Duration, Utc};

/// Single time source for every expiry decision the engine makes.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to. Second resolution, matching the
/// resolution of the time claims.
#[derive(Debug)]
pub struct ManualClock {
    epoch_seconds: AtomicI64,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            epoch_seconds: AtomicI64::new(start.timestamp()),
        }
    }

    pub fn at_epoch_seconds(seconds: i64) -> Self {
        Self {
            epoch_seconds: AtomicI64::new(seconds),
        }
    }

    pub fn set(&self, to: DateTime<Utc>) {
        self.epoch_seconds.store(to.timestamp(), Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.epoch_seconds
            .fetch_add(by.num_seconds(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        let secs = self.epoch_seconds.load(Ordering::SeqCst);
        DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
