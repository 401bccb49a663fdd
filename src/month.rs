use crate::config::{CalendarConfig, DEFAULT_MONTHS_AROUND_TODAY};
use crate::date::{DateExt, WeekdayExt, iter_days_after};
use std::iter::successors;
use time::{Date, Weekday};

const DAYS_IN_WEEK: usize = 7;

/// One row of a month grid.  Cells for days outside the month are `None`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
// Invariant: At least one element of the array is Some
pub struct Week([Option<Date>; DAYS_IN_WEEK]);

impl Week {
    fn new(date: Date, first: Weekday) -> Self {
        let mut this = Week([None; DAYS_IN_WEEK]);
        this.set(date, first);
        this
    }

    fn set(&mut self, date: Date, first: Weekday) {
        let i = usize::from(date.weekday().column(first));
        assert!(i < DAYS_IN_WEEK, "weekday column should be less than 7");
        self.0[i] = Some(date);
    }

    /// Returns the date in the given zero-based column
    pub fn get(&self, column: usize) -> Option<Date> {
        self.0.get(column).copied().flatten()
    }

    /// Iterate over the dates in the week together with their columns
    pub fn enumerate(&self) -> impl Iterator<Item = (u16, Date)> + '_ {
        (0u16..)
            .zip(self.0.iter())
            .filter_map(|(col, &d)| d.map(|d| (col, d)))
    }
}

/// The precomputed data needed to draw one month: its identifying first day
/// and its weeks
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct MonthLayout {
    month: Date,
    weeks: Vec<Week>,
}

impl MonthLayout {
    /// Lay out the month containing `date` in weeks starting on `first`
    pub fn new(date: Date, first: Weekday) -> MonthLayout {
        let month = date.start_of_month();
        let mut weeks = Vec::with_capacity(6);
        let mut week = Week::new(month, first);
        for d in iter_days_after(month).take_while(|d| d.month() == month.month()) {
            if d.weekday().column(first) == 0 {
                weeks.push(week);
                week = Week::new(d, first);
            } else {
                week.set(d, first);
            }
        }
        weeks.push(week);
        MonthLayout { month, weeks }
    }

    /// The first day of the month, used as the month's identifier
    pub fn month(&self) -> Date {
        self.month
    }

    pub fn weeks(&self) -> &[Week] {
        &self.weeks
    }

    pub fn first_day(&self) -> Date {
        self.month
    }

    pub fn last_day(&self) -> Date {
        self.month.end_of_month()
    }

    pub fn contains(&self, date: Date) -> bool {
        date.start_of_month() == self.month
    }

    /// Number of lines the month takes up when drawn with the given
    /// configuration, not counting the spacing after it
    pub fn height(&self, config: &CalendarConfig) -> u16 {
        let weeks = u16::try_from(self.weeks.len()).unwrap_or(u16::MAX);
        1u16.saturating_add(config.get_month_label_days_spacing())
            .saturating_add(weeks)
    }
}

/// Lay out every month of the calendar described by `config`, in
/// chronological order.
///
/// Months not pinned by the configuration are placed relative to `today`.
pub fn generate_months(today: Date, config: &CalendarConfig) -> Vec<MonthLayout> {
    let mut start = config
        .get_start_month()
        .unwrap_or_else(|| today.add_months(-DEFAULT_MONTHS_AROUND_TODAY))
        .start_of_month();
    let mut end = config
        .get_end_month()
        .unwrap_or_else(|| today.add_months(DEFAULT_MONTHS_AROUND_TODAY))
        .start_of_month();
    if end < start {
        log::warn!("Calendar end month {end} is before start month {start}; swapping");
        std::mem::swap(&mut start, &mut end);
    }
    let first = config.get_first_weekday();
    let months = successors(Some(start), |&m| m.next_month())
        .take_while(|&m| m <= end)
        .map(|m| MonthLayout::new(m, first))
        .collect::<Vec<_>>();
    log::debug!(
        "Generated {} months from {start} through {end}",
        months.len()
    );
    months
}
