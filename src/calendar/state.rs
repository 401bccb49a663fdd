use super::list::ListState;
use super::month_view::{self, DayMarks};
use crate::binding::{Binding, Subscription};
use crate::clock::Clock;
use crate::config::CalendarConfig;
use crate::date::DateExt;
use crate::month::{MonthLayout, generate_months};
use crate::range::DateRange;
use crate::selection::{Selection, SelectionChange, SelectionState};
use ratatui::layout::Position;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use thiserror::Error;
use time::{Date, Duration};

/// The month the month list is aligned to.  It starts out as the current
/// month and then follows the month of the selected date.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ScrollAnchor {
    #[default]
    Unset,
    Month(Date),
}

/// Ways to move the day cursor
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CursorMove {
    PrevDay,
    NextDay,
    PrevWeek,
    NextWeek,
}

impl CursorMove {
    fn offset(self) -> Duration {
        match self {
            CursorMove::PrevDay => Duration::days(-1),
            CursorMove::NextDay => Duration::days(1),
            CursorMove::PrevWeek => Duration::weeks(-1),
            CursorMove::NextWeek => Duration::weeks(1),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum NavigationError {
    #[error("already at the first month of the calendar")]
    AtStart,
    #[error("already at the last month of the calendar")]
    AtEnd,
    #[error("{0} is not within the calendar's months")]
    NotInCalendar(Date),
}

/// Everything a [`CalendarView`](super::CalendarView) needs between frames:
/// the selection, the configuration, the months, and the scroll position.
///
/// Changes to the selection, whether made through this type or directly on
/// the selection's bindings, take effect on the next render.
#[derive(Debug)]
pub struct CalendarState {
    selection: SelectionState,
    pub(super) config: CalendarConfig,
    pub(super) months: Rc<[MonthLayout]>,
    today: Date,
    anchor: ScrollAnchor,
    pub(super) list: ListState,
    cursor: Date,
    mounted: bool,
    inbox: Rc<RefCell<VecDeque<SelectionChange>>>,
    _subscription: Subscription,
}

impl CalendarState {
    /// Create the state for a calendar showing `selection`.
    ///
    /// `configure` is applied to the default configuration.  The months are
    /// laid out once, relative to the clock's current date.
    pub fn new<C, F>(selection: SelectionState, clock: &C, configure: F) -> CalendarState
    where
        C: Clock + ?Sized,
        F: FnOnce(CalendarConfig) -> CalendarConfig,
    {
        let today = clock.today();
        let config = configure(CalendarConfig::default());
        let months = Rc::<[MonthLayout]>::from(generate_months(today, &config));
        let inbox = Rc::new(RefCell::new(VecDeque::new()));
        let subscription = {
            let inbox = Rc::clone(&inbox);
            selection.subscribe(Rc::new(move |change: SelectionChange| {
                inbox.borrow_mut().push_back(change);
            }))
        };
        let initial = selection.current_date().unwrap_or(today);
        let mut state = CalendarState {
            selection,
            config,
            months,
            today,
            anchor: ScrollAnchor::Unset,
            list: ListState::default(),
            cursor: initial,
            mounted: false,
            inbox,
            _subscription: subscription,
        };
        state.cursor = state.clamp(initial);
        state.anchor = ScrollAnchor::Month(today.start_of_month());
        log::debug!("Calendar anchored to {}", today.start_of_month());
        state
    }

    /// Create the state for a calendar whose selected date & range are kept
    /// in the given bindings
    pub fn with_bindings<C, F>(
        date: Binding<Date>,
        range: Binding<Option<DateRange>>,
        clock: &C,
        configure: F,
    ) -> CalendarState
    where
        C: Clock + ?Sized,
        F: FnOnce(CalendarConfig) -> CalendarConfig,
    {
        CalendarState::new(SelectionState::external(date, range), clock, configure)
    }

    /// Create the state for a calendar that owns its selection, seeded from
    /// (and writing back to) the given bindings, if any
    pub fn with_optional_bindings<C, F>(
        date: Option<Binding<Option<Date>>>,
        range: Option<Binding<Option<DateRange>>>,
        clock: &C,
        configure: F,
    ) -> CalendarState
    where
        C: Clock + ?Sized,
        F: FnOnce(CalendarConfig) -> CalendarConfig,
    {
        CalendarState::new(SelectionState::owned(date, range), clock, configure)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn config(&self) -> &CalendarConfig {
        &self.config
    }

    /// The months of the calendar, in chronological order
    pub fn months(&self) -> &[MonthLayout] {
        &self.months
    }

    pub fn today(&self) -> Date {
        self.today
    }

    pub fn anchor(&self) -> ScrollAnchor {
        self.anchor
    }

    pub fn list(&self) -> &ListState {
        &self.list
    }

    /// The month currently at the top of the month list
    pub fn top_month(&self) -> Option<Date> {
        self.months.get(self.list.top()).map(MonthLayout::month)
    }

    pub fn cursor(&self) -> Date {
        self.cursor
    }

    pub fn is_animating(&self) -> bool {
        self.list.is_animating()
    }

    /// Advance any animated scroll by one frame.  Returns whether the
    /// animation is still running.
    pub fn tick(&mut self) -> bool {
        self.list.tick()
    }

    pub fn scroll_forwards(&mut self, months: usize) -> Result<(), NavigationError> {
        let last = self.months.len().saturating_sub(1);
        let current = self.list.destination();
        if current >= last {
            return Err(NavigationError::AtEnd);
        }
        self.list.scroll_to(current.saturating_add(months).min(last), false);
        Ok(())
    }

    pub fn scroll_backwards(&mut self, months: usize) -> Result<(), NavigationError> {
        let current = self.list.destination();
        if current == 0 {
            return Err(NavigationError::AtStart);
        }
        self.list.scroll_to(current.saturating_sub(months), false);
        Ok(())
    }

    /// Scroll forwards by the number of months fully or partially visible in
    /// the last frame
    pub fn page_forwards(&mut self) -> Result<(), NavigationError> {
        self.scroll_forwards(self.page_size())
    }

    pub fn page_backwards(&mut self) -> Result<(), NavigationError> {
        self.scroll_backwards(self.page_size())
    }

    fn page_size(&self) -> usize {
        self.list.visible().len().saturating_sub(1).max(1)
    }

    /// Move the cursor to today and scroll to the current month
    pub fn jump_to_today(&mut self) -> Result<(), NavigationError> {
        let index = self
            .index_of(self.today)
            .ok_or(NavigationError::NotInCalendar(self.today))?;
        self.cursor = self.today;
        self.list.scroll_to(index, true);
        Ok(())
    }

    pub fn move_cursor(&mut self, mv: CursorMove) -> Result<(), NavigationError> {
        let (first, last) = self.bounds();
        let offset = mv.offset();
        let Some(date) = self.cursor.checked_add(offset) else {
            return Err(if offset.is_negative() {
                NavigationError::AtStart
            } else {
                NavigationError::AtEnd
            });
        };
        if date < first {
            return Err(NavigationError::AtStart);
        } else if date > last {
            return Err(NavigationError::AtEnd);
        }
        self.cursor = date;
        self.reveal(date);
        Ok(())
    }

    /// Select `date` as though the user had picked it in the month grid
    pub fn select(&mut self, date: Date) -> Result<(), NavigationError> {
        if self.index_of(date).is_none() {
            return Err(NavigationError::NotInCalendar(date));
        }
        self.cursor = date;
        month_view::select(&self.selection, self.config.get_selection_mode(), date);
        Ok(())
    }

    pub fn select_cursor(&mut self) -> Result<(), NavigationError> {
        self.select(self.cursor)
    }

    /// Select the date drawn at the given screen position in the last frame,
    /// returning it
    pub fn select_at(&mut self, pos: Position) -> Option<Date> {
        let date = self.list.date_at(pos)?;
        self.select(date).ok()?;
        Some(date)
    }

    pub fn clear_selection(&mut self) {
        self.selection.set_date(None);
        self.selection.set_range(None);
    }

    /// Returns the date drawn at the given screen position in the last frame
    pub fn date_at(&self, pos: Position) -> Option<Date> {
        self.list.date_at(pos)
    }

    /// Apply the selection changes made since the last frame
    pub(super) fn process_changes(&mut self) {
        let changes = std::mem::take(&mut *self.inbox.borrow_mut());
        for change in changes {
            match change {
                SelectionChange::Date(Some(date)) => self.follow(date),
                SelectionChange::Date(None) | SelectionChange::Range(_) => (),
            }
        }
    }

    /// Re-anchor the list on the month of a newly selected date
    fn follow(&mut self, date: Date) {
        let month = date.start_of_month();
        if self.anchor == ScrollAnchor::Month(month) {
            return;
        }
        log::debug!("Selected date moved to {date}; anchoring to {month}");
        self.anchor = ScrollAnchor::Month(month);
        if !self.mounted {
            // The mount scroll will pick up the new anchor.
            return;
        }
        match self.index_of(month) {
            Some(i) => self.list.scroll_to(i, true),
            None => log::warn!("Selected month {month} is not in the calendar; not scrolling"),
        }
    }

    /// Scroll to the anchor the first time the calendar is laid out
    pub(super) fn mount(&mut self) {
        if std::mem::replace(&mut self.mounted, true) {
            return;
        }
        let ScrollAnchor::Month(month) = self.anchor else {
            return;
        };
        match self.index_of(month) {
            Some(i) => {
                log::debug!("Calendar mounted; scrolling to {month}");
                self.list.scroll_to(i, false);
            }
            None => log::warn!("Initial month {month} is not in the calendar; not scrolling"),
        }
    }

    pub(super) fn day_marks(&self) -> DayMarks {
        DayMarks {
            today: self.today,
            selected: self.selection.current_date(),
            range: self.selection.current_range(),
            cursor: Some(self.cursor),
        }
    }

    /// Scroll so that `date` will be drawn, if it wasn't in the last frame
    fn reveal(&mut self, date: Date) {
        if !self.mounted || self.list.is_drawn(date) {
            return;
        }
        if let Some(i) = self.index_of(date) {
            self.list.scroll_to(i, false);
        }
    }

    fn index_of(&self, date: Date) -> Option<usize> {
        self.months
            .binary_search_by_key(&date.start_of_month(), MonthLayout::month)
            .ok()
    }

    fn bounds(&self) -> (Date, Date) {
        match (self.months.first(), self.months.last()) {
            (Some(first), Some(last)) => (first.first_day(), last.last_day()),
            _ => (self.today, self.today),
        }
    }

    fn clamp(&self, date: Date) -> Date {
        let (first, last) = self.bounds();
        date.clamp(first, last)
    }
}
