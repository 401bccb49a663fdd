//! A scrollable, month-by-month calendar widget for [`ratatui`] with single
//! date & date range selection.
//!
//! The calendar is drawn by [`CalendarView`], a stateful widget whose state,
//! [`CalendarState`], holds the selection, the configuration, and the scroll
//! position.  The selection can either live in [`Binding`]s shared with the
//! rest of the application or be owned by the calendar itself.
//!
//! ```no_run
//! use mcalendar::{Binding, CalendarState, CalendarView, SystemClock};
//! use time::macros::date;
//!
//! let date = Binding::new(date!(2024 - 03 - 15));
//! let range = Binding::new(None);
//! let mut state = CalendarState::with_bindings(date, range, &SystemClock, |config| {
//!     config.header_spacing(0)
//! });
//! # let mut terminal = ratatui::init();
//! terminal.draw(|frame| frame.render_stateful_widget(CalendarView, frame.area(), &mut state))?;
//! # ratatui::restore();
//! # Ok::<(), std::io::Error>(())
//! ```
mod binding;
mod calendar;
mod clock;
mod config;
mod date;
mod month;
mod range;
mod selection;
pub mod theme;
#[cfg(test)]
mod testutil;
pub use crate::binding::{Binding, Subscription};
pub use crate::calendar::{
    CalendarState, CalendarView, CursorMove, DateStyler, GRID_WIDTH, ListState, NavigationError,
    ScrollAnchor,
};
pub use crate::clock::{Clock, SystemClock};
pub use crate::config::{CalendarConfig, DEFAULT_MONTHS_AROUND_TODAY, SelectionMode};
pub use crate::date::{DateExt, WeekdayExt};
pub use crate::month::{MonthLayout, Week, generate_months};
pub use crate::range::DateRange;
pub use crate::selection::{
    ExternalSelection, OwnedSelection, Selection, SelectionChange, SelectionState,
};
