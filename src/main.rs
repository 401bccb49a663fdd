mod app;
mod help;
mod jumpto;
use crate::app::App;
use anyhow::Context;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use lexopt::{Arg, Parser, ValueExt};
use mcalendar::{Binding, CalendarState, Clock, SelectionMode, SystemClock};
use ratatui::DefaultTerminal;
use std::cell::Cell;
use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use time::{Date, Weekday, format_description::FormatItem, macros::format_description};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Options),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Options {
    date: Option<Date>,
    range: bool,
    monday: bool,
    from: Option<Date>,
    to: Option<Date>,
    log_file: Option<PathBuf>,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = Options::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('r') | Arg::Long("range") => opts.range = true,
                Arg::Short('m') | Arg::Long("monday") => opts.monday = true,
                Arg::Long("from") => opts.from = Some(parse_date(parser.value()?.string()?)?),
                Arg::Long("to") => opts.to = Some(parse_date(parser.value()?.string()?)?),
                Arg::Long("log-file") => opts.log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Value(value) if opts.date.is_none() => {
                    opts.date = Some(parse_date(value.string()?)?);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => {
                if let Some(path) = opts.log_file.as_ref() {
                    init_logging(path)?;
                }
                let last_month = Rc::new(Cell::new(None));
                let state = {
                    let last_month = Rc::clone(&last_month);
                    opts.calendar(&SystemClock, move |month| last_month.set(Some(month)))
                };
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    App::new(state, last_month)
                        .run(&mut terminal)
                        .context("error running calendar")?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: mcalendar [OPTIONS] [YYYY-MM-DD]");
                println!();
                println!("Scrollable month-by-month terminal calendar");
                println!();
                println!("Options:");
                println!("  -r, --range             Select date ranges instead of single dates");
                println!("  -m, --monday            Start weeks on Monday");
                println!("      --from YYYY-MM-DD   First month shown");
                println!("      --to YYYY-MM-DD     Last month shown");
                println!("      --log-file PATH     Write log messages to PATH");
                println!("  -h, --help              Display this help message and exit");
                println!("  -V, --version           Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

impl Options {
    /// Create the state of the calendar these options describe, calling
    /// `on_month_change` whenever a month label scrolls into view
    fn calendar<C, F>(&self, clock: &C, on_month_change: F) -> CalendarState
    where
        C: Clock + ?Sized,
        F: Fn(Date) + 'static,
    {
        let date = self.date.map(|d| Binding::new(Some(d)));
        let mode = if self.range {
            SelectionMode::Range
        } else {
            SelectionMode::Single
        };
        let first = if self.monday {
            Weekday::Monday
        } else {
            Weekday::Sunday
        };
        CalendarState::with_optional_bindings(date, None, clock, |mut config| {
            config = config
                .selection_mode(mode)
                .first_weekday(first)
                .on_month_change(on_month_change);
            if let Some(from) = self.from {
                config = config.start_month(from);
            }
            if let Some(to) = self.to {
                config = config.end_month(to);
            }
            config
        })
    }
}

fn parse_date(value: String) -> Result<Date, lexopt::Error> {
    match Date::parse(&value, &YMD_FMT) {
        Ok(d) => Ok(d),
        Err(e) => Err(lexopt::Error::ParsingFailed {
            value,
            error: Box::new(e),
        }),
    }
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    log::info!("{} {} starting", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    Ok(())
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = execute!(stdout(), EnableMouseCapture)
        .context("failed to enable mouse capture")
        .and_then(|()| func(terminal));
    if let Err(e) = execute!(stdout(), DisableMouseCapture) {
        log::warn!("Failed to disable mouse capture: {e}");
    }
    ratatui::restore();
    r
}
