use super::month_view::{DayMarks, MonthView};
use super::widget::BufferCanvas;
use crate::config::CalendarConfig;
use crate::month::MonthLayout;
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    widgets::StatefulWidget,
};
use std::ops::Range;
use time::Date;

/// Scroll position & per-frame bookkeeping of the month list.
///
/// The scroll position is always the index of the month drawn at the top of
/// the list, so the list only ever comes to rest on month boundaries.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ListState {
    top: usize,
    target: Option<usize>,
    /// Indices of the months drawn in the last frame
    visible: Range<usize>,
    /// Months whose labels were drawn in the last frame, in order
    visible_labels: Vec<Date>,
    /// Screen regions of the days drawn in the last frame
    hits: Vec<(Rect, Date)>,
}

impl ListState {
    /// Index of the month at the top of the list
    pub fn top(&self) -> usize {
        self.top
    }

    /// Index of the month an animated scroll is headed for
    pub fn target(&self) -> Option<usize> {
        self.target
    }

    pub fn is_animating(&self) -> bool {
        self.target.is_some()
    }

    /// Where the list will come to rest once any animation finishes
    pub fn destination(&self) -> usize {
        self.target.unwrap_or(self.top)
    }

    pub fn visible(&self) -> Range<usize> {
        self.visible.clone()
    }

    pub fn visible_labels(&self) -> &[Date] {
        &self.visible_labels
    }

    /// Returns the date drawn at the given screen position in the last frame
    pub fn date_at(&self, pos: Position) -> Option<Date> {
        self.hits
            .iter()
            .find_map(|&(rect, date)| rect.contains(pos).then_some(date))
    }

    /// Returns true if `date` was drawn in the last frame
    pub fn is_drawn(&self, date: Date) -> bool {
        self.hits.iter().any(|&(_, d)| d == date)
    }

    /// Put the month at `index` at the top of the list.  An animated scroll
    /// gets there over several calls to [`ListState::tick()`].
    pub(crate) fn scroll_to(&mut self, index: usize, animated: bool) {
        if animated && index != self.top {
            self.target = Some(index);
        } else {
            self.top = index;
            self.target = None;
        }
    }

    /// Advance an animated scroll by one frame, moving a quarter of the
    /// remaining distance (at least one month).  Returns whether the
    /// animation is still running afterwards.
    pub fn tick(&mut self) -> bool {
        let Some(target) = self.target else {
            return false;
        };
        let step = self.top.abs_diff(target).div_ceil(4);
        if self.top < target {
            self.top += step;
        } else {
            self.top -= step;
        }
        if self.top == target {
            self.target = None;
        }
        self.target.is_some()
    }
}

/// The scrolling list of month blocks, each a label followed by the month's
/// day grid.
///
/// Only the months from the top of the list down to the bottom of the area
/// are drawn.
#[derive(Clone, Copy, Debug)]
pub(super) struct MonthList<'a> {
    months: &'a [MonthLayout],
    config: &'a CalendarConfig,
    marks: DayMarks,
}

impl<'a> MonthList<'a> {
    pub(super) fn new(
        months: &'a [MonthLayout],
        config: &'a CalendarConfig,
        marks: DayMarks,
    ) -> Self {
        MonthList {
            months,
            config,
            marks,
        }
    }
}

impl StatefulWidget for MonthList<'_> {
    type State = ListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let padding = self.config.get_months_padding();
        BufferCanvas::new(area, buf).fill(self.config.get_months_background());
        let top_pad = padding.top.min(area.height);
        let inner = Rect {
            y: area.y + top_pad,
            height: (area.height - top_pad).saturating_sub(padding.bottom),
            ..area
        };
        state.top = state.top.min(self.months.len().saturating_sub(1));
        state.hits.clear();
        let mut labels = Vec::new();
        let mut end = state.top;
        let mut y = 0u16;
        for (i, layout) in self.months.iter().enumerate().skip(state.top) {
            if y >= inner.height {
                break;
            }
            end = i + 1;
            let label = self.config.render_month_label(layout.month());
            if BufferCanvas::new(inner, buf).print_line(y, 0, &label).is_some() {
                labels.push(layout.month());
            }
            let grid_y = y
                .saturating_add(1)
                .saturating_add(self.config.get_month_label_days_spacing());
            if grid_y < inner.height {
                let grid = Rect {
                    y: inner.y + grid_y,
                    height: inner.height - grid_y,
                    ..inner
                };
                MonthView::new(layout, self.config, self.marks).render(grid, buf, &mut state.hits);
            }
            y = y
                .saturating_add(layout.height(self.config))
                .saturating_add(self.config.get_months_spacing());
        }
        state.visible = state.top..end;
        for &month in &labels {
            if !state.visible_labels.contains(&month) {
                log::trace!("Label for {month} scrolled into view");
                self.config.month_changed(month);
            }
        }
        state.visible_labels = labels;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::month::generate_months;
    use std::cell::RefCell;
    use std::rc::Rc;
    use time::macros::date;

    fn marks() -> DayMarks {
        DayMarks {
            today: date!(2024 - 03 - 15),
            selected: None,
            range: None,
            cursor: None,
        }
    }

    #[test]
    fn test_tick_eases_toward_target() {
        let mut state = ListState::default();
        state.scroll_to(9, true);
        assert_eq!(state.top(), 0);
        assert!(state.is_animating());
        assert_eq!(state.destination(), 9);
        let mut tops = Vec::new();
        while state.tick() {
            tops.push(state.top());
        }
        tops.push(state.top());
        assert_eq!(tops, [3, 5, 6, 7, 8, 9]);
        assert!(!state.tick());
    }

    #[test]
    fn test_tick_backwards() {
        let mut state = ListState::default();
        state.scroll_to(5, false);
        state.scroll_to(2, true);
        assert!(state.tick());
        assert_eq!(state.top(), 4);
        assert!(state.tick());
        assert!(!state.tick());
        assert_eq!(state.top(), 2);
    }

    #[test]
    fn test_unanimated_scroll_cancels_animation() {
        let mut state = ListState::default();
        state.scroll_to(9, true);
        state.scroll_to(4, false);
        assert!(!state.is_animating());
        assert_eq!(state.top(), 4);
    }

    #[test]
    fn test_animated_scroll_to_current_top_is_immediate() {
        let mut state = ListState::default();
        state.scroll_to(0, true);
        assert!(!state.is_animating());
    }

    #[test]
    fn test_only_visible_months_are_drawn() {
        let config = CalendarConfig::default()
            .start_month(date!(2024 - 01 - 01))
            .end_month(date!(2024 - 12 - 01));
        let months = generate_months(date!(2024 - 03 - 15), &config);
        let area = Rect::new(0, 0, 34, 9);
        let mut buf = Buffer::empty(area);
        let mut state = ListState::default();
        state.scroll_to(2, false);
        MonthList::new(&months, &config, marks()).render(area, &mut buf, &mut state);
        assert_eq!(state.visible(), 2..4);
        assert_eq!(
            state.visible_labels(),
            [date!(2024 - 03 - 01), date!(2024 - 04 - 01)]
        );
        assert!(state.is_drawn(date!(2024 - 03 - 31)));
        assert!(!state.is_drawn(date!(2024 - 04 - 01)));
        assert_eq!(state.date_at(Position::new(26, 2)), Some(date!(2024 - 03 - 08)));
        assert_eq!(state.date_at(Position::new(29, 2)), None);
        assert_eq!(state.date_at(Position::new(0, 0)), None);
    }

    #[test]
    fn test_top_is_clamped() {
        let config = CalendarConfig::default()
            .start_month(date!(2024 - 01 - 01))
            .end_month(date!(2024 - 03 - 01));
        let months = generate_months(date!(2024 - 03 - 15), &config);
        let area = Rect::new(0, 0, 34, 10);
        let mut buf = Buffer::empty(area);
        let mut state = ListState::default();
        state.scroll_to(10, false);
        MonthList::new(&months, &config, marks()).render(area, &mut buf, &mut state);
        assert_eq!(state.top(), 2);
        assert_eq!(state.visible(), 2..3);
    }

    #[test]
    fn test_zero_width_draws_no_labels() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let config = {
            let seen = Rc::clone(&seen);
            CalendarConfig::default()
                .start_month(date!(2024 - 01 - 01))
                .end_month(date!(2024 - 12 - 01))
                .on_month_change(move |m| seen.borrow_mut().push(m))
        };
        let months = generate_months(date!(2024 - 03 - 15), &config);
        let area = Rect::new(0, 0, 0, 12);
        let mut buf = Buffer::empty(area);
        let mut state = ListState::default();
        state.scroll_to(2, false);
        MonthList::new(&months, &config, marks()).render(area, &mut buf, &mut state);
        assert!(state.visible_labels().is_empty());
        assert!(seen.borrow().is_empty());
        assert!(!state.is_drawn(date!(2024 - 03 - 15)));
    }
}
