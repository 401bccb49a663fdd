use crate::help::Help;
use crate::jumpto::{JumpTo, JumpToInput, JumpToOutput, JumpToState};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind, poll, read,
};
use mcalendar::{CalendarState, CalendarView, CursorMove, Selection, theme::BASE_STYLE};
use ratatui::{
    Terminal,
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Position, Rect},
    text::Line,
    widgets::{StatefulWidget, Widget},
};
use std::cell::Cell;
use std::io::{self, Write};
use std::rc::Rc;
use std::time::Duration;
use time::Date;

/// How long to wait for input between frames of an animated scroll
const FRAME_INTERVAL: Duration = Duration::from_millis(30);

#[derive(Debug)]
pub(crate) struct App {
    calendar: CalendarState,
    last_month: Rc<Cell<Option<Date>>>,
    state: AppState,
}

impl App {
    /// `last_month` is expected to be updated by the calendar's month-change
    /// callback
    pub(crate) fn new(calendar: CalendarState, last_month: Rc<Cell<Option<Date>>>) -> App {
        App {
            calendar,
            last_month,
            state: AppState::Calendar,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        io::Error: From<B::Error>,
    {
        while !self.quitting() {
            self.draw(terminal)?;
            if !self.calendar.is_animating() || poll(FRAME_INTERVAL)? {
                self.handle_input()?;
            } else {
                self.calendar.tick();
            }
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        io::Error: From<B::Error>,
    {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        if !self.handle_event(read()?) {
            self.beep()?;
        }
        Ok(())
    }

    // Returns `false` if the user did something invalid
    fn handle_event(&mut self, event: Event) -> bool {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Event::Mouse(mouse) = event {
            return self.handle_mouse(mouse);
        }
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = event.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
                true
            } else {
                normal_modifiers.contains(modifiers) && self.handle_key(code)
            }
        } else {
            // Redraw on resize, and we might as well redraw on other stuff
            // too
            true
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> bool {
        if self.state != AppState::Calendar {
            return true;
        }
        let pos = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // Clicks outside of any day are ignored
                self.calendar.select_at(pos);
                true
            }
            MouseEventKind::ScrollDown => self.calendar.scroll_forwards(1).is_ok(),
            MouseEventKind::ScrollUp => self.calendar.scroll_backwards(1).is_ok(),
            _ => true,
        }
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.move_cursor(CursorMove::PrevDay),
                KeyCode::Char('l') | KeyCode::Right => self.move_cursor(CursorMove::NextDay),
                KeyCode::Char('k') | KeyCode::Up => self.move_cursor(CursorMove::PrevWeek),
                KeyCode::Char('j') | KeyCode::Down => self.move_cursor(CursorMove::NextWeek),
                KeyCode::Enter | KeyCode::Char(' ') => self.calendar.select_cursor().is_ok(),
                KeyCode::Char('J') => self.calendar.scroll_forwards(1).is_ok(),
                KeyCode::Char('K') => self.calendar.scroll_backwards(1).is_ok(),
                KeyCode::Char('z') | KeyCode::PageDown => self.calendar.page_forwards().is_ok(),
                KeyCode::Char('w') | KeyCode::PageUp => self.calendar.page_backwards().is_ok(),
                KeyCode::Char('0') | KeyCode::Home => self.calendar.jump_to_today().is_ok(),
                KeyCode::Char('c') => {
                    self.calendar.clear_selection();
                    true
                }
                KeyCode::Char('g') => {
                    self.state = AppState::Jumping(JumpToState::new());
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Calendar;
                true
            }
            AppState::Jumping(state) => {
                if matches!(key, KeyCode::Char('q' | 'g') | KeyCode::Esc) {
                    self.state = AppState::Calendar;
                    true
                } else {
                    let output = match key {
                        KeyCode::Char('-') => state.handle_input(JumpToInput::Negative),
                        KeyCode::Char('+') => state.handle_input(JumpToInput::Positive),
                        KeyCode::Char(c) => match c.to_digit(10).map(u8::try_from) {
                            Some(Ok(d)) => state.handle_input(JumpToInput::Digit(d)),
                            _ => JumpToOutput::Invalid,
                        },
                        KeyCode::Backspace | KeyCode::Delete => {
                            state.handle_input(JumpToInput::Backspace)
                        }
                        KeyCode::Enter => state.handle_input(JumpToInput::Enter),
                        _ => JumpToOutput::Invalid,
                    };
                    match output {
                        JumpToOutput::Ok => true,
                        JumpToOutput::Invalid => false,
                        JumpToOutput::Jump(date) => {
                            self.state = AppState::Calendar;
                            self.jump_to(date)
                        }
                    }
                }
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn move_cursor(&mut self, mv: CursorMove) -> bool {
        self.calendar.move_cursor(mv).is_ok()
    }

    fn jump_to(&mut self, date: Date) -> bool {
        match self.calendar.select(date) {
            Ok(()) => {
                log::debug!("Selected {date} from the jump-to dialog");
                true
            }
            Err(e) => {
                log::debug!("Could not jump to {date}: {e}");
                false
            }
        }
    }

    fn status_line(&self) -> Line<'static> {
        let selection = self.calendar.selection();
        let mut parts = vec![match selection.current_date() {
            Some(d) => format!(" Selected: {d}"),
            None => String::from(" Selected: none"),
        }];
        if let Some(range) = selection.current_range() {
            parts.push(format!("Range: {range}"));
        }
        if let Some(month) = self.last_month.get() {
            parts.push(format!("Shown: {} {}", month.month(), month.year()));
        }
        Line::styled(parts.join("  "), BASE_STYLE)
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [cal_area, status_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        CalendarView.render(cal_area, buf, &mut self.calendar);
        self.status_line().render(status_area, buf);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        } else if let AppState::Jumping(ref mut state) = self.state {
            JumpTo.render(area, buf, state);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Jumping(JumpToState),
    Quitting,
}
