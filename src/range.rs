use std::fmt;
use time::Date;

/// A range of dates selected by the user.
///
/// A range is built up one date at a time: the first date picked becomes the
/// lower bound, and the next date at or after it completes the range.  Until
/// then the range has no upper bound.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct DateRange {
    lower: Date,
    upper: Option<Date>,
}

impl DateRange {
    /// Start a new range at `date`
    pub fn new(date: Date) -> DateRange {
        DateRange {
            lower: date,
            upper: None,
        }
    }

    /// Create a completed range spanning `a` and `b` in either order
    pub fn between(a: Date, b: Date) -> DateRange {
        DateRange {
            lower: a.min(b),
            upper: Some(a.max(b)),
        }
    }

    pub fn lower(&self) -> Date {
        self.lower
    }

    pub fn upper(&self) -> Option<Date> {
        self.upper
    }

    pub fn is_complete(&self) -> bool {
        self.upper.is_some()
    }

    /// Feed a newly picked date into the range.
    ///
    /// A completed range, or a date before the current lower bound, restarts
    /// the range at `date`; otherwise `date` becomes the upper bound.
    pub fn add(&mut self, date: Date) {
        if self.upper.is_some() || date < self.lower {
            *self = DateRange::new(date);
        } else {
            self.upper = Some(date);
        }
    }

    /// Like [`DateRange::add()`], but by value
    #[must_use]
    pub fn with(mut self, date: Date) -> DateRange {
        self.add(date);
        self
    }

    /// Returns true if `date` lies within the range, inclusive.  A range
    /// without an upper bound contains only its lower bound.
    pub fn contains(&self, date: Date) -> bool {
        match self.upper {
            Some(upper) => self.lower <= date && date <= upper,
            None => date == self.lower,
        }
    }

    /// Returns true if `date` is one of the range's bounds
    pub fn is_endpoint(&self, date: Date) -> bool {
        date == self.lower || self.upper == Some(date)
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upper {
            Some(upper) => write!(f, "{} – {}", self.lower, upper),
            None => write!(f, "{} – …", self.lower),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_build_range() {
        let mut range = DateRange::new(date!(2024 - 03 - 10));
        assert!(!range.is_complete());
        assert!(range.contains(date!(2024 - 03 - 10)));
        assert!(!range.contains(date!(2024 - 03 - 11)));
        range.add(date!(2024 - 03 - 15));
        assert!(range.is_complete());
        assert_eq!(range.lower(), date!(2024 - 03 - 10));
        assert_eq!(range.upper(), Some(date!(2024 - 03 - 15)));
        assert!(range.contains(date!(2024 - 03 - 12)));
        assert!(range.contains(date!(2024 - 03 - 15)));
        assert!(!range.contains(date!(2024 - 03 - 16)));
        assert!(!range.contains(date!(2024 - 03 - 09)));
    }

    #[test]
    fn test_add_before_lower_restarts() {
        let range = DateRange::new(date!(2024 - 03 - 10)).with(date!(2024 - 03 - 01));
        assert_eq!(range, DateRange::new(date!(2024 - 03 - 01)));
    }

    #[test]
    fn test_add_to_complete_restarts() {
        let range = DateRange::between(date!(2024 - 03 - 10), date!(2024 - 03 - 12))
            .with(date!(2024 - 05 - 01));
        assert_eq!(range, DateRange::new(date!(2024 - 05 - 01)));
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::new(date!(2024 - 03 - 10)).with(date!(2024 - 03 - 10));
        assert!(range.is_complete());
        assert!(range.is_endpoint(date!(2024 - 03 - 10)));
        assert!(!range.contains(date!(2024 - 03 - 11)));
    }

    #[test]
    fn test_between_orders_bounds() {
        let range = DateRange::between(date!(2024 - 07 - 04), date!(2024 - 06 - 30));
        assert_eq!(range.lower(), date!(2024 - 06 - 30));
        assert_eq!(range.upper(), Some(date!(2024 - 07 - 04)));
        assert!(range.is_endpoint(date!(2024 - 07 - 04)));
        assert!(!range.is_endpoint(date!(2024 - 07 - 01)));
    }

    #[test]
    fn test_display() {
        let range = DateRange::new(date!(2024 - 03 - 10));
        assert_eq!(range.to_string(), "2024-03-10 – …");
        let range = range.with(date!(2024 - 03 - 15));
        assert_eq!(range.to_string(), "2024-03-10 – 2024-03-15");
    }
}
