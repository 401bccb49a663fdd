use std::iter::successors;
use time::{Date, Duration, Weekday};

/// Month arithmetic on [`Date`]s.
///
/// Months are identified by their first day, so every method that returns a
/// month returns its start date.
pub trait DateExt: Sized {
    /// Returns the first day of the month containing `self`
    fn start_of_month(self) -> Self;

    /// Returns the last day of the month containing `self`
    fn end_of_month(self) -> Self;

    /// Returns the start of the following month, or `None` at the end of time
    fn next_month(self) -> Option<Self>;

    /// Returns the start of the preceding month, or `None` at the beginning of
    /// time
    fn previous_month(self) -> Option<Self>;

    /// Returns the start of the month `n` months after (or, for negative `n`,
    /// before) the month containing `self`.  Stops at the first or last
    /// representable month.
    fn add_months(self, n: i32) -> Self;

    fn is_last_day_of_month(self) -> bool;
}

impl DateExt for Date {
    fn start_of_month(self) -> Date {
        // Day 1 of every month is representable, including that of
        // `Date::MIN`, so this cannot saturate early.
        self.saturating_sub(Duration::days(i64::from(self.day()) - 1))
    }

    fn end_of_month(self) -> Date {
        match self.next_month().and_then(Date::previous_day) {
            Some(d) => d,
            // The last month of time
            None => Date::MAX,
        }
    }

    fn next_month(self) -> Option<Date> {
        // Every month has at most 31 days, so 31 days after the first of a
        // month always lands in the following month.
        self.start_of_month()
            .checked_add(Duration::days(31))
            .map(DateExt::start_of_month)
    }

    fn previous_month(self) -> Option<Date> {
        self.start_of_month()
            .previous_day()
            .map(DateExt::start_of_month)
    }

    fn add_months(self, n: i32) -> Date {
        let start = self.start_of_month();
        let step: fn(&Date) -> Option<Date> = if n < 0 {
            |&d| d.previous_month()
        } else {
            |&d| d.next_month()
        };
        successors(Some(start), step)
            .take(usize::try_from(n.unsigned_abs()).unwrap_or(usize::MAX).saturating_add(1))
            .last()
            .unwrap_or(start)
    }

    fn is_last_day_of_month(self) -> bool {
        match self.next_day() {
            Some(tomorrow) => self.month() != tomorrow.month(),
            None => true,
        }
    }
}

pub trait WeekdayExt {
    /// Zero-based column of this weekday in a week that starts on `first`
    fn column(self, first: Weekday) -> u16;
}

impl WeekdayExt for Weekday {
    fn column(self, first: Weekday) -> u16 {
        let wd = u16::from(self.number_days_from_sunday());
        let first = u16::from(first.number_days_from_sunday());
        (wd + 7 - first) % 7
    }
}

/// Iterate over the seven weekdays of a week starting on `first`
pub(crate) fn weekdays_from(first: Weekday) -> impl Iterator<Item = Weekday> {
    successors(Some(first), |&wd| Some(wd.next())).take(7)
}

pub(crate) fn iter_days_after(date: Date) -> impl Iterator<Item = Date> {
    successors(Some(date), |&d| d.next_day()).skip(1)
}
