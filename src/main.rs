mod app;
mod calendar;
mod help;
mod jumpto;
mod theme;
use crate::app::App;
use crate::calendar::{Day, RangeWindow, ViewMode};
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use time::{format_description::FormatItem, macros::format_description, Date};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        start: Option<Day>,
        week: bool,
        events: Vec<Day>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut start = None;
        let mut week = false;
        let mut events = Vec::new();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('w') | Arg::Long("week") => week = true,
                Arg::Short('e') | Arg::Long("event") => {
                    events.push(parse_day(parser.value()?.string()?)?);
                }
                Arg::Value(value) if start.is_none() => {
                    start = Some(parse_day(value.string()?)?);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run {
            start,
            week,
            events,
        })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run {
                start,
                week,
                events,
            } => {
                let today = Day::today();
                let start = start.unwrap_or(today);
                let mode = if week { ViewMode::Week } else { ViewMode::Month };
                with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    let mut window = RangeWindow::new(mode);
                    window
                        .set_reference_day(start)
                        .context("failed to show the starting day")?;
                    window.select(start);
                    App::new(window, today, events).run(&mut terminal)?;
                    Ok(())
                })
            }
            Command::Help => {
                println!("Usage: wmcal [-w] [-e DAY ...] [DAY]");
                println!();
                println!("Scrollable terminal calendar with month & week views and event markers");
                println!();
                println!("A DAY is either YYYY-MM-DD or @MS, a Unix timestamp in milliseconds.");
                println!("The calendar starts out on DAY, or on today when none is given.");
                println!();
                println!("Options:");
                println!("  -e, --event DAY   Mark DAY in the calendar; may be given multiple times");
                println!("  -w, --week        Start in week view instead of month view");
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}

fn parse_day(value: String) -> Result<Day, lexopt::Error> {
    match parse_day_str(&value) {
        Ok(day) => Ok(day),
        Err(error) => Err(lexopt::Error::ParsingFailed { value, error }),
    }
}

fn parse_day_str(s: &str) -> Result<Day, Box<dyn std::error::Error + Send + Sync + 'static>> {
    if let Some(ms) = s.strip_prefix('@') {
        Ok(Day::from_unix_ms(ms.parse()?)?)
    } else {
        Ok(Day::from_date(Date::parse(s, &YMD_FMT)?))
    }
}
