mod list;
mod month_view;
mod state;
mod widget;
pub use self::list::ListState;
pub use self::state::{CalendarState, CursorMove, NavigationError, ScrollAnchor};
pub use self::widget::CalendarView;
use ratatui::style::Style;
use time::Date;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 5;

/// Number of columns taken up by a single day, e.g., `" 15 "` or `"[15]"`
const CELL_WIDTH: u16 = 4;

/// Width of the weekday header & month grids
pub const GRID_WIDTH: u16 = DAY_WIDTH * 6 + CELL_WIDTH;

/// Supplies the base style for each day drawn in a calendar.
///
/// Selection and cursor highlighting are applied on top of this style.
pub trait DateStyler {
    fn date_style(&self, date: Date) -> Style;
}

/// Leaves every date unstyled
impl DateStyler for () {
    fn date_style(&self, _date: Date) -> Style {
        Style::new()
    }
}

impl<F: Fn(Date) -> Style> DateStyler for F {
    fn date_style(&self, date: Date) -> Style {
        self(date)
    }
}
