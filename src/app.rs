use crate::calendar::{Calendar, Day, EventDays, RangeWindow, ViewMode};
use crate::help::Help;
use crate::jumpto::{JumpTo, JumpToInput, JumpToOutput, JumpToState};
use crate::theme::BASE_STYLE;
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::Rect,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};

#[derive(Debug)]
pub(crate) struct App {
    window: RangeWindow,
    today: Day,
    events: Vec<Day>,
    state: AppState,
}

impl App {
    pub(crate) fn new(window: RangeWindow, today: Day, events: Vec<Day>) -> App {
        App {
            window,
            today,
            events,
            state: AppState::Calendar,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('h') | KeyCode::Left => self.move_selection(-1),
                KeyCode::Char('l') | KeyCode::Right => self.move_selection(1),
                KeyCode::Char('k') | KeyCode::Up => self.move_selection(-7),
                KeyCode::Char('j') | KeyCode::Down => self.move_selection(7),
                KeyCode::Char('n') | KeyCode::PageDown => self.range_forwards(),
                KeyCode::Char('p') | KeyCode::PageUp => self.range_backwards(),
                KeyCode::Char('m') => self.set_mode(ViewMode::Month),
                KeyCode::Char('w') => self.set_mode(ViewMode::Week),
                KeyCode::Char('0') | KeyCode::Home => self.jump_to(self.today),
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
                        KeyCode::Char('0') => state.handle_input(JumpToInput::Digit(0)),
                        KeyCode::Char('1') => state.handle_input(JumpToInput::Digit(1)),
                        KeyCode::Char('2') => state.handle_input(JumpToInput::Digit(2)),
                        KeyCode::Char('3') => state.handle_input(JumpToInput::Digit(3)),
                        KeyCode::Char('4') => state.handle_input(JumpToInput::Digit(4)),
                        KeyCode::Char('5') => state.handle_input(JumpToInput::Digit(5)),
                        KeyCode::Char('6') => state.handle_input(JumpToInput::Digit(6)),
                        KeyCode::Char('7') => state.handle_input(JumpToInput::Digit(7)),
                        KeyCode::Char('8') => state.handle_input(JumpToInput::Digit(8)),
                        KeyCode::Char('9') => state.handle_input(JumpToInput::Digit(9)),
                        KeyCode::Backspace | KeyCode::Delete => {
                            state.handle_input(JumpToInput::Backspace)
                        }
                        KeyCode::Enter => state.handle_input(JumpToInput::Enter),
                        _ => JumpToOutput::Invalid,
                    };
                    match output {
                        JumpToOutput::Ok => true,
                        JumpToOutput::Invalid => false,
                        JumpToOutput::Jump(day) => {
                            self.state = AppState::Calendar;
                            self.jump_to(day)
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

    // Moves the selection by the given number of days, re-windowing around
    // the target day when it falls outside the displayed range.  Nothing
    // happens if the step fails, not even the selection.
    fn move_selection(&mut self, days: i64) -> bool {
        let Some(range) = self.window.range() else {
            return false;
        };
        let current = self.window.selected().unwrap_or(range.reference);
        let Some(target) = current.checked_add_days(days) else {
            return false;
        };
        if !range.contains(target) && self.window.set_reference_day(target).is_err() {
            return false;
        }
        self.window.select(target);
        true
    }

    fn range_forwards(&mut self) -> bool {
        self.window.one_step_forwards().is_ok()
    }

    fn range_backwards(&mut self) -> bool {
        self.window.one_step_backwards().is_ok()
    }

    fn set_mode(&mut self, mode: ViewMode) -> bool {
        self.window.set_mode(mode).is_ok()
    }

    fn jump_to(&mut self, day: Day) -> bool {
        if self.window.set_reference_day(day).is_err() {
            return false;
        }
        self.window.select(day);
        true
    }

    // The event keys that apply to the currently headlined month
    fn current_events(&self) -> EventDays {
        let Some(range) = self.window.range() else {
            return EventDays::new();
        };
        self.events
            .iter()
            .filter(|d| d.year() == range.year && d.month() == range.month)
            .copied()
            .map(Day::day_of_month)
            .collect()
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let events = self.current_events();
        Calendar::new(self.today, &events).render(area, buf, &mut self.window);
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
