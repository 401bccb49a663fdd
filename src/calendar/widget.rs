use super::list::MonthList;
use super::state::CalendarState;
use super::{CELL_WIDTH, DAY_WIDTH, GRID_WIDTH};
use crate::config::CalendarConfig;
use crate::date::weekdays_from;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::StatefulWidget,
};

/// The calendar widget: a weekday header above a scrollable list of months.
///
/// All state lives in [`CalendarState`]; render it with
/// `frame.render_stateful_widget(CalendarView, area, &mut state)`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CalendarView;

impl StatefulWidget for CalendarView {
    type State = CalendarState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let area = area.intersection(buf.area);
        state.process_changes();
        let area = center_horizontally(area, GRID_WIDTH);
        let [header_area, _, list_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(state.config.get_header_spacing()),
            Constraint::Fill(1),
        ])
        .areas(area);
        state.mount();
        draw_header(header_area, buf, &state.config);
        let marks = state.day_marks();
        MonthList::new(&state.months, &state.config, marks).render(
            list_area,
            buf,
            &mut state.list,
        );
    }
}

fn center_horizontally(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

fn draw_header(area: Rect, buf: &mut Buffer, config: &CalendarConfig) {
    let mut canvas = BufferCanvas::new(area, buf);
    for (col, wd) in std::iter::zip(0u16.., weekdays_from(config.get_first_weekday())) {
        let span = config.render_weekday(wd);
        let width = u16::try_from(span.width())
            .unwrap_or(u16::MAX)
            .min(CELL_WIDTH);
        let x = col * DAY_WIDTH + (CELL_WIDTH - width) / 2;
        canvas.print_span(0, x, &span, width);
    }
}

/// Drawing on a buffer using coordinates relative to an area, with anything
/// falling outside the area discarded
#[derive(Debug, Eq, PartialEq)]
pub(super) struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    pub(super) fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        let area = area.intersection(buf.area);
        Self { area, buf }
    }

    pub(super) fn fill(&mut self, style: Style) {
        self.buf.set_style(self.area, style);
    }

    /// Draw `span` truncated to `max_width` columns, returning the region
    /// drawn to, if any
    pub(super) fn print_span(
        &mut self,
        y: u16,
        x: u16,
        span: &Span<'_>,
        max_width: u16,
    ) -> Option<Rect> {
        let cell = self.clip(y, x, max_width)?;
        self.buf.set_span(cell.x, cell.y, span, cell.width);
        Some(cell)
    }

    pub(super) fn print_line(&mut self, y: u16, x: u16, line: &Line<'_>) -> Option<Rect> {
        let cell = self.clip(y, x, u16::MAX)?;
        self.buf.set_line(cell.x, cell.y, line, cell.width);
        Some(cell)
    }

    fn clip(&self, y: u16, x: u16, max_width: u16) -> Option<Rect> {
        (y < self.area.height && x < self.area.width).then(|| Rect {
            x: x + self.area.x,
            y: y + self.area.y,
            width: (self.area.width - x).min(max_width),
            height: 1,
        })
    }
}
