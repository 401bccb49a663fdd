use super::widget::BufferCanvas;
use super::{CELL_WIDTH, DAY_WIDTH};
use crate::config::{CalendarConfig, SelectionMode};
use crate::month::MonthLayout;
use crate::range::DateRange;
use crate::selection::{Selection, SelectionState};
use crate::theme::{CURSOR_STYLE, IN_RANGE_STYLE, SELECTED_STYLE};
use ratatui::{buffer::Buffer, layout::Rect, style::Style, text::Span, widgets::StatefulWidget};
use time::Date;

/// Per-frame facts about which days need highlighting
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct DayMarks {
    pub(super) today: Date,
    pub(super) selected: Option<Date>,
    pub(super) range: Option<DateRange>,
    pub(super) cursor: Option<Date>,
}

impl DayMarks {
    fn show(&self, date: Date, base: Style) -> Span<'static> {
        let s = if date == self.today {
            format!("[{:2}]", date.day())
        } else {
            format!(" {:2} ", date.day())
        };
        let mut style = base;
        if let Some(range) = self.range {
            if range.is_endpoint(date) {
                style = style.patch(SELECTED_STYLE);
            } else if range.contains(date) {
                style = style.patch(IN_RANGE_STYLE);
            }
        }
        if self.selected == Some(date) {
            style = style.patch(SELECTED_STYLE);
        }
        if self.cursor == Some(date) {
            style = style.patch(CURSOR_STYLE);
        }
        Span::styled(s, style)
    }
}

/// The day grid of a single month.  Each week is drawn on its own line;
/// weeks that don't fit in the area are skipped.
#[derive(Clone, Copy, Debug)]
pub(super) struct MonthView<'a> {
    layout: &'a MonthLayout,
    config: &'a CalendarConfig,
    marks: DayMarks,
}

impl<'a> MonthView<'a> {
    pub(super) fn new(
        layout: &'a MonthLayout,
        config: &'a CalendarConfig,
        marks: DayMarks,
    ) -> Self {
        MonthView {
            layout,
            config,
            marks,
        }
    }
}

impl StatefulWidget for MonthView<'_> {
    /// Screen regions of the days drawn, for hit-testing
    type State = Vec<(Rect, Date)>;

    fn render(self, area: Rect, buf: &mut Buffer, hits: &mut Self::State) {
        let mut canvas = BufferCanvas::new(area, buf);
        for (y, week) in std::iter::zip(0u16.., self.layout.weeks()) {
            for (col, date) in week.enumerate() {
                let span = self.marks.show(date, self.config.date_style(date));
                if let Some(cell) = canvas.print_span(y, col * DAY_WIDTH, &span, CELL_WIDTH) {
                    hits.push((cell, date));
                }
            }
        }
    }
}

/// Apply the user picking `date` to the selection
pub(super) fn select(selection: &SelectionState, mode: SelectionMode, date: Date) {
    selection.set_date(Some(date));
    if mode == SelectionMode::Range {
        let range = match selection.current_range() {
            Some(r) => r.with(date),
            None => DateRange::new(date),
        };
        selection.set_range(Some(range));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Binding;
    use crate::testutil::lines;
    use ratatui::style::Modifier;
    use time::macros::date;
    use time::Weekday;

    fn marks() -> DayMarks {
        DayMarks {
            today: date!(2024 - 03 - 05),
            selected: None,
            range: None,
            cursor: None,
        }
    }

    #[test]
    fn test_render_grid() {
        let layout = MonthLayout::new(date!(2024 - 03 - 01), Weekday::Sunday);
        let config = CalendarConfig::default();
        let area = Rect::new(0, 0, 34, 6);
        let mut buf = Buffer::empty(area);
        let mut hits = Vec::new();
        MonthView::new(&layout, &config, marks()).render(area, &mut buf, &mut hits);
        assert_eq!(
            lines(&buf),
            [
                "                           1    2",
                "  3    4  [ 5]   6    7    8    9",
                " 10   11   12   13   14   15   16",
                " 17   18   19   20   21   22   23",
                " 24   25   26   27   28   29   30",
                " 31",
            ]
        );
        assert_eq!(hits.len(), 31);
        assert_eq!(hits[0], (Rect::new(25, 0, 4, 1), date!(2024 - 03 - 01)));
        assert_eq!(hits[30], (Rect::new(0, 5, 4, 1), date!(2024 - 03 - 31)));
    }

    #[test]
    fn test_clipped_rows_are_skipped() {
        let layout = MonthLayout::new(date!(2024 - 03 - 01), Weekday::Sunday);
        let config = CalendarConfig::default();
        let area = Rect::new(0, 0, 34, 2);
        let mut buf = Buffer::empty(Rect::new(0, 0, 34, 4));
        let mut hits = Vec::new();
        MonthView::new(&layout, &config, marks()).render(area, &mut buf, &mut hits);
        assert_eq!(hits.len(), 9);
        assert_eq!(hits.last().map(|&(_, d)| d), Some(date!(2024 - 03 - 09)));
        assert_eq!(lines(&buf)[2], "");
    }

    #[test]
    fn test_highlights() {
        let layout = MonthLayout::new(date!(2024 - 03 - 01), Weekday::Sunday);
        let config = CalendarConfig::default();
        let area = Rect::new(0, 0, 34, 6);
        let mut buf = Buffer::empty(area);
        let marks = DayMarks {
            range: Some(DateRange::between(date!(2024 - 03 - 10), date!(2024 - 03 - 12))),
            selected: Some(date!(2024 - 03 - 12)),
            cursor: Some(date!(2024 - 03 - 20)),
            ..marks()
        };
        MonthView::new(&layout, &config, marks).render(area, &mut buf, &mut Vec::new());
        // 10th: range start
        assert!(buf[(1, 2)].modifier.contains(Modifier::REVERSED));
        // 11th: inside range
        assert!(!buf[(6, 2)].modifier.contains(Modifier::REVERSED));
        assert_eq!(buf[(6, 2)].fg, IN_RANGE_STYLE.fg.unwrap_or_default());
        // 12th: range end & selected
        assert!(buf[(11, 2)].modifier.contains(Modifier::REVERSED));
        // 13th: outside range
        assert!(!buf[(16, 2)].modifier.contains(Modifier::REVERSED));
        // 20th: cursor
        assert!(buf[(15, 3)].modifier.contains(Modifier::UNDERLINED));
        assert!(!buf[(20, 3)].modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn test_date_styler_is_base_style() {
        let layout = MonthLayout::new(date!(2024 - 03 - 01), Weekday::Sunday);
        let config = CalendarConfig::default().date_styler(|d: Date| {
            if d.weekday() == Weekday::Sunday {
                Style::new().add_modifier(Modifier::ITALIC)
            } else {
                Style::new()
            }
        });
        let area = Rect::new(0, 0, 34, 6);
        let mut buf = Buffer::empty(area);
        let marks = DayMarks {
            selected: Some(date!(2024 - 03 - 03)),
            ..marks()
        };
        MonthView::new(&layout, &config, marks).render(area, &mut buf, &mut Vec::new());
        let sunday = &buf[(1, 1)];
        assert!(sunday.modifier.contains(Modifier::ITALIC));
        assert!(sunday.modifier.contains(Modifier::REVERSED));
        assert!(!buf[(6, 1)].modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn test_select_single() {
        let sel = SelectionState::owned(None, None);
        select(&sel, SelectionMode::Single, date!(2024 - 03 - 05));
        assert_eq!(sel.current_date(), Some(date!(2024 - 03 - 05)));
        assert_eq!(sel.current_range(), None);
    }

    #[test]
    fn test_select_range() {
        let range = Binding::new(None);
        let sel = SelectionState::external(Binding::new(date!(2024 - 03 - 01)), range.clone());
        select(&sel, SelectionMode::Range, date!(2024 - 03 - 05));
        assert_eq!(range.get(), Some(DateRange::new(date!(2024 - 03 - 05))));
        select(&sel, SelectionMode::Range, date!(2024 - 03 - 09));
        assert_eq!(
            range.get(),
            Some(DateRange::between(date!(2024 - 03 - 05), date!(2024 - 03 - 09)))
        );
        assert_eq!(sel.current_date(), Some(date!(2024 - 03 - 09)));
        select(&sel, SelectionMode::Range, date!(2024 - 03 - 20));
        assert_eq!(range.get(), Some(DateRange::new(date!(2024 - 03 - 20))));
    }
}
