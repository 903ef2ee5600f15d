use crate::calendar::Day;
use crate::theme::{
    jumpto::{READY_ENTER_STYLE, UNFILLED_CELL_STYLE},
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, StatefulWidget, Widget},
};
use time::{Date, Month};

const OUTER_WIDTH: u16 = 16;
const OUTER_HEIGHT: u16 = 8;

/// Number of digits in a full YYYYMMDD entry
const DIGIT_QTY: usize = 8;

const PLACEHOLDERS: [&str; DIGIT_QTY] = ["Y", "Y", "Y", "Y", "M", "M", "D", "D"];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct JumpTo;

impl StatefulWidget for JumpTo {
    type State = JumpToState;

    /*
     * ................
     * .┌─ Jump To… ─┐.
     * .│            │.
     * .│ YYYY-MM-DD │.
     * .│            │.
     * .│  [ENTER]   │.
     * .└────────────┘.
     * ................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(" Jump To… ")
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(1, 1));
        state.to_text().render(text_area, buf);
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct JumpToState {
    digits: [u8; DIGIT_QTY],
    filled: usize,
}

impl JumpToState {
    pub(crate) fn new() -> JumpToState {
        JumpToState::default()
    }

    fn to_text(self) -> Text<'static> {
        Text::from_iter([
            Line::styled("", BASE_STYLE),
            self.to_line(),
            Line::styled("", BASE_STYLE),
            // Style a span and convert it to a line rather than creating a
            // styled line directly so that only the "[ENTER]" text and not any
            // of its centering padding will be underlined:
            Line::from(Span::styled(
                "[ENTER]",
                if self.filled == DIGIT_QTY {
                    READY_ENTER_STYLE
                } else {
                    BASE_STYLE
                },
            )),
        ])
        .centered()
    }

    fn to_line(self) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, &d) in self.digits.iter().enumerate() {
            if i == 4 || i == 6 {
                spans.push(Span::styled("-", BASE_STYLE));
            }
            spans.push(if i < self.filled {
                Span::styled(format!("{d}"), BASE_STYLE)
            } else {
                Span::styled(PLACEHOLDERS[i], UNFILLED_CELL_STYLE)
            });
        }
        Line::from_iter(spans)
    }

    pub(crate) fn handle_input(&mut self, input: JumpToInput) -> JumpToOutput {
        match input {
            JumpToInput::Digit(d) if self.filled < DIGIT_QTY => {
                self.digits[self.filled] = d;
                self.filled += 1;
                JumpToOutput::Ok
            }
            JumpToInput::Backspace if self.filled > 0 => {
                self.filled -= 1;
                self.digits[self.filled] = 0;
                JumpToOutput::Ok
            }
            JumpToInput::Enter if self.filled == DIGIT_QTY => self.to_day(),
            _ => JumpToOutput::Invalid,
        }
    }

    fn to_day(self) -> JumpToOutput {
        let year = self.digits[..4]
            .iter()
            .fold(0i32, |acc, &d| acc * 10 + i32::from(d));
        let month = self.digits[4..6].iter().fold(0u8, |acc, &d| acc * 10 + d);
        let day = self.digits[6..].iter().fold(0u8, |acc, &d| acc * 10 + d);
        let Ok(month) = Month::try_from(month) else {
            return JumpToOutput::Invalid;
        };
        match Date::from_calendar_date(year, month, day) {
            Ok(date) => JumpToOutput::Jump(Day::from_date(date)),
            Err(_) => JumpToOutput::Invalid,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum JumpToInput {
    Digit(u8),
    Backspace,
    Enter,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum JumpToOutput {
    Ok,
    Invalid,
    Jump(Day),
}
