use time::{Date, OffsetDateTime};

/// Source of the current date
pub trait Clock {
    fn today(&self) -> Date;
}

/// A fixed date acts as a clock that never advances
impl Clock for Date {
    fn today(&self) -> Date {
        *self
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> Date {
        (**self).today()
    }
}

/// Clock reading the system's local date
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> Date {
        match OffsetDateTime::now_local() {
            Ok(now) => now.date(),
            Err(e) => {
                log::warn!("Failed to determine local date, using UTC: {e}");
                OffsetDateTime::now_utc().date()
            }
        }
    }
}
