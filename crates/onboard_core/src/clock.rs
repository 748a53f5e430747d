//! Time source for ids and timestamps.

use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};

/// Supplies the current instant to services.
pub trait Clock {
    fn now(&self) -> OffsetDateTime;

    /// Epoch milliseconds; used for project and task ids.
    fn now_ms(&self) -> i64 {
        (self.now().unix_timestamp_nanos() / 1_000_000) as i64
    }

    fn today(&self) -> Date {
        self.now().date()
    }

    fn now_rfc3339(&self) -> String {
        self.now()
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.now().unix_timestamp().to_string())
    }
}

/// Wall clock in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl FixedClock {
    /// Clock frozen at `epoch_ms` milliseconds after the Unix epoch.
    pub fn at_epoch_ms(epoch_ms: i64) -> Self {
        let nanos = i128::from(epoch_ms) * 1_000_000;
        Self(OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> OffsetDateTime {
        (**self).now()
    }
}
