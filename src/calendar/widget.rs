use super::{Day, EventDays, RangeWindow, ViewMode};
use crate::theme::{ADJACENT_STYLE, EVENT_STYLE, SELECTED_STYLE};
use ratatui::{prelude::*, widgets::*};
use time::Month;

static HEADER: &str = " Su     Mo     Tu     We     Th     Fr     Sa ";

/// Width of the calendar in columns
const MAIN_WIDTH: u16 = 46;

/// Number of lines taken up by the title, the weekday header, and its rule
const HEADER_LINES: u16 = 3;

/// Number of lines taken up by each week of the calendar
const WEEK_LINES: u16 = 2;

/// Number of columns per day of week
const DAY_WIDTH: u16 = 7;

/// Columns between the left edge of a day's cell and the event bullet drawn
/// underneath it, lining the bullet up with the day number
const MARKER_OFFSET: u16 = 2;

const ACS_HLINE: char = '─';
const ACS_BULLET: char = '•';

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Calendar<'a> {
    today: Day,
    events: &'a EventDays,
}

impl<'a> Calendar<'a> {
    pub(crate) fn new(today: Day, events: &'a EventDays) -> Calendar<'a> {
        Calendar { today, events }
    }

    fn show_day(&self, day: Day, style: Style) -> Span<'static> {
        let s = if day == self.today {
            format!("[{:2}]", day.day_of_month())
        } else {
            format!(" {:2} ", day.day_of_month())
        };
        Span::styled(s, style)
    }
}

impl StatefulWidget for Calendar<'_> {
    type State = RangeWindow;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let Some(range) = state.range() else {
            return;
        };
        let left = area.width.saturating_sub(MAIN_WIDTH) / 2;
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(left),
                Constraint::Length(MAIN_WIDTH.min(area.width)),
                Constraint::Min(0),
            ])
            .split(area);
        let month = Month::try_from(range.month)
            .expect("a range's month should be a valid month number");
        let mut canvas = BufferCanvas::new(chunks[1], buf);
        canvas.draw_title(month, range.year);
        canvas.draw_header();
        for (i, day) in std::iter::zip(0u16.., range.days()) {
            let week_no = i / 7;
            let wd = u16::from(day.weekday_index());
            let in_month = day.year() == range.year && day.month() == range.month;
            let style = if state.selected() == Some(day) {
                SELECTED_STYLE
            } else if state.mode() == ViewMode::Month && !in_month {
                ADJACENT_STYLE
            } else {
                Style::new()
            };
            canvas.draw_day(week_no, wd, self.show_day(day, style));
            if state.is_event_day(day, self.events) {
                canvas.draw_marker(week_no, wd);
            }
        }
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn draw_title(&mut self, month: Month, year: i32) {
        let title = format!("{month} {year}");
        let width = u16::try_from(title.len()).unwrap_or(u16::MAX);
        self.mvprint(
            0,
            MAIN_WIDTH.saturating_sub(width) / 2,
            title,
            Some(Style::new().bold()),
        );
    }

    fn draw_header(&mut self) {
        self.mvprint(1, 0, HEADER, Some(Style::new().bold()));
        self.hline(2, 0, ACS_HLINE, MAIN_WIDTH);
    }

    fn draw_day(&mut self, week_no: u16, wd: u16, s: Span<'_>) {
        self.mvprint(
            week_no * WEEK_LINES + HEADER_LINES,
            DAY_WIDTH * wd,
            s.content,
            Some(s.style),
        );
    }

    fn draw_marker(&mut self, week_no: u16, wd: u16) {
        self.mvprint(
            week_no * WEEK_LINES + HEADER_LINES + 1,
            DAY_WIDTH * wd + MARKER_OFFSET,
            String::from(ACS_BULLET),
            Some(EVENT_STYLE),
        );
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Option<Style>) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // calendar's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), None);
    }
}
