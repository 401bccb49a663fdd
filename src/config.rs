use crate::calendar::DateStyler;
use crate::theme::{MONTH_LABEL_STYLE, WEEKDAY_STYLE};
use ratatui::{
    style::Style,
    text::{Line, Span},
    widgets::Padding,
};
use std::fmt;
use std::rc::Rc;
use time::{Date, Weekday};

/// How many months before and after the current month are shown when no
/// explicit start or end month is configured
pub const DEFAULT_MONTHS_AROUND_TODAY: i32 = 120;

/// Whether picking a day selects a single date or extends a date range
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SelectionMode {
    #[default]
    Single,
    Range,
}

/// Look & behavior of a calendar.
///
/// Build one by chaining setters onto `CalendarConfig::default()`:
///
/// ```
/// use mcalendar::{CalendarConfig, SelectionMode};
/// use time::Weekday;
///
/// let config = CalendarConfig::default()
///     .first_weekday(Weekday::Monday)
///     .selection_mode(SelectionMode::Range)
///     .months_spacing(2);
/// assert_eq!(config.get_months_spacing(), 2);
/// ```
#[derive(Clone)]
pub struct CalendarConfig {
    weekday_label: Rc<dyn Fn(Weekday) -> Span<'static>>,
    month_label: Rc<dyn Fn(Date) -> Line<'static>>,
    on_month_change: Rc<dyn Fn(Date)>,
    date_styler: Rc<dyn DateStyler>,
    header_spacing: u16,
    months_spacing: u16,
    month_label_days_spacing: u16,
    months_padding: Padding,
    months_background: Style,
    first_weekday: Weekday,
    start_month: Option<Date>,
    end_month: Option<Date>,
    selection_mode: SelectionMode,
}

impl CalendarConfig {
    /// Set the function that renders each weekday's column heading
    pub fn weekday_label<F>(mut self, func: F) -> Self
    where
        F: Fn(Weekday) -> Span<'static> + 'static,
    {
        self.weekday_label = Rc::new(func);
        self
    }

    /// Set the function that renders the label above each month, given the
    /// first day of the month
    pub fn month_label<F>(mut self, func: F) -> Self
    where
        F: Fn(Date) -> Line<'static> + 'static,
    {
        self.month_label = Rc::new(func);
        self
    }

    /// Set the function called with the first day of a month whenever that
    /// month's label scrolls into view
    pub fn on_month_change<F>(mut self, func: F) -> Self
    where
        F: Fn(Date) + 'static,
    {
        self.on_month_change = Rc::new(func);
        self
    }

    pub fn date_styler<S: DateStyler + 'static>(mut self, styler: S) -> Self {
        self.date_styler = Rc::new(styler);
        self
    }

    /// Lines between the weekday header and the month list
    pub fn header_spacing(mut self, lines: u16) -> Self {
        self.header_spacing = lines;
        self
    }

    /// Blank lines between consecutive months
    pub fn months_spacing(mut self, lines: u16) -> Self {
        self.months_spacing = lines;
        self
    }

    /// Blank lines between a month's label and its days
    pub fn month_label_days_spacing(mut self, lines: u16) -> Self {
        self.month_label_days_spacing = lines;
        self
    }

    /// Padding inside the month list.  Only the top and bottom are used.
    pub fn months_padding(mut self, padding: Padding) -> Self {
        self.months_padding = padding;
        self
    }

    pub fn months_background(mut self, style: Style) -> Self {
        self.months_background = style;
        self
    }

    pub fn first_weekday(mut self, wd: Weekday) -> Self {
        self.first_weekday = wd;
        self
    }

    /// First month in the calendar; any day within the month may be given
    pub fn start_month(mut self, date: Date) -> Self {
        self.start_month = Some(date);
        self
    }

    /// Last month in the calendar; any day within the month may be given
    pub fn end_month(mut self, date: Date) -> Self {
        self.end_month = Some(date);
        self
    }

    pub fn selection_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    pub fn get_header_spacing(&self) -> u16 {
        self.header_spacing
    }

    pub fn get_months_spacing(&self) -> u16 {
        self.months_spacing
    }

    pub fn get_month_label_days_spacing(&self) -> u16 {
        self.month_label_days_spacing
    }

    pub fn get_months_padding(&self) -> Padding {
        self.months_padding
    }

    pub fn get_months_background(&self) -> Style {
        self.months_background
    }

    pub fn get_first_weekday(&self) -> Weekday {
        self.first_weekday
    }

    pub fn get_start_month(&self) -> Option<Date> {
        self.start_month
    }

    pub fn get_end_month(&self) -> Option<Date> {
        self.end_month
    }

    pub fn get_selection_mode(&self) -> SelectionMode {
        self.selection_mode
    }

    pub(crate) fn render_weekday(&self, wd: Weekday) -> Span<'static> {
        (self.weekday_label)(wd)
    }

    pub(crate) fn render_month_label(&self, month: Date) -> Line<'static> {
        (self.month_label)(month)
    }

    pub(crate) fn date_style(&self, date: Date) -> Style {
        self.date_styler.date_style(date)
    }

    pub(crate) fn month_changed(&self, month: Date) {
        (self.on_month_change)(month);
    }
}

impl Default for CalendarConfig {
    fn default() -> CalendarConfig {
        CalendarConfig {
            weekday_label: Rc::new(default_weekday_label),
            month_label: Rc::new(default_month_label),
            on_month_change: Rc::new(|_| ()),
            date_styler: Rc::new(()),
            header_spacing: 1,
            months_spacing: 1,
            month_label_days_spacing: 0,
            months_padding: Padding::ZERO,
            months_background: Style::new(),
            first_weekday: Weekday::Sunday,
            start_month: None,
            end_month: None,
            selection_mode: SelectionMode::Single,
        }
    }
}

impl fmt::Debug for CalendarConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarConfig")
            .field("header_spacing", &self.header_spacing)
            .field("months_spacing", &self.months_spacing)
            .field("month_label_days_spacing", &self.month_label_days_spacing)
            .field("months_padding", &self.months_padding)
            .field("months_background", &self.months_background)
            .field("first_weekday", &self.first_weekday)
            .field("start_month", &self.start_month)
            .field("end_month", &self.end_month)
            .field("selection_mode", &self.selection_mode)
            .finish_non_exhaustive()
    }
}

fn default_weekday_label(wd: Weekday) -> Span<'static> {
    let name = match wd {
        Weekday::Sunday => "Su",
        Weekday::Monday => "Mo",
        Weekday::Tuesday => "Tu",
        Weekday::Wednesday => "We",
        Weekday::Thursday => "Th",
        Weekday::Friday => "Fr",
        Weekday::Saturday => "Sa",
    };
    Span::styled(name, WEEKDAY_STYLE)
}

fn default_month_label(month: Date) -> Line<'static> {
    Line::styled(format!("{} {}", month.month(), month.year()), MONTH_LABEL_STYLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use time::macros::date;

    #[test]
    fn test_defaults() {
        let config = CalendarConfig::default();
        assert_eq!(config.get_header_spacing(), 1);
        assert_eq!(config.get_months_spacing(), 1);
        assert_eq!(config.get_month_label_days_spacing(), 0);
        assert_eq!(config.get_months_padding(), Padding::ZERO);
        assert_eq!(config.get_first_weekday(), Weekday::Sunday);
        assert_eq!(config.get_selection_mode(), SelectionMode::Single);
        assert_eq!(config.get_start_month(), None);
        assert_eq!(config.get_end_month(), None);
        assert_eq!(config.date_style(date!(2024 - 03 - 15)), Style::new());
    }

    #[test]
    fn test_default_labels() {
        let config = CalendarConfig::default();
        assert_eq!(
            config.render_weekday(Weekday::Thursday),
            Span::styled("Th", WEEKDAY_STYLE)
        );
        assert_eq!(
            config.render_month_label(date!(2024 - 09 - 01)),
            Line::styled("September 2024", MONTH_LABEL_STYLE)
        );
    }

    #[test]
    fn test_month_change_callback() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let config = {
            let seen = Rc::clone(&seen);
            CalendarConfig::default().on_month_change(move |d| seen.borrow_mut().push(d))
        };
        config.month_changed(date!(2024 - 03 - 01));
        config.clone().month_changed(date!(2024 - 04 - 01));
        assert_eq!(*seen.borrow(), [date!(2024 - 03 - 01), date!(2024 - 04 - 01)]);
    }
}
