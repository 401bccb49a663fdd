use ratatui::style::{Color, Modifier, Style};

pub const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub const WEEKDAY_STYLE: Style = Style::new().add_modifier(Modifier::BOLD);

pub const MONTH_LABEL_STYLE: Style = Style::new().add_modifier(Modifier::BOLD);

/// Patched onto the selected date and the endpoints of the selected range
pub const SELECTED_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Patched onto the dates strictly inside the selected range
pub const IN_RANGE_STYLE: Style = Style::new().fg(Color::LightCyan);

pub const CURSOR_STYLE: Style = Style::new().add_modifier(Modifier::UNDERLINED);
