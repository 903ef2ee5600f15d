use super::day::{Day, DAY_MS};
use super::events::EventDays;
use super::RangeObserver;
use std::fmt;
use std::iter::successors;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum ViewMode {
    Week,
    #[default]
    Month,
}

/// An inclusive run of days plus the year & month in its headline.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct DateRange {
    pub(crate) reference: Day,
    pub(crate) start: Day,
    pub(crate) end: Day,
    pub(crate) year: i32,
    pub(crate) month: u8,
}

impl DateRange {
    // Pads the month out to whole Sunday-to-Saturday weeks: back to the
    // Sunday on or before the 1st, forward to the Saturday on or after the
    // last day.  A month already ending on Saturday gets no trailing days.
    fn month_of(day: Day) -> Result<DateRange, RangeError> {
        let reference = day.first_of_month();
        let month_end = day.last_of_month();
        let start = reference
            .checked_add_days(-i64::from(reference.weekday_index()))
            .ok_or(RangeError::InvalidDay)?;
        let end = month_end
            .checked_add_days(6 - i64::from(month_end.weekday_index()))
            .ok_or(RangeError::InvalidDay)?;
        Ok(DateRange {
            reference,
            start,
            end,
            year: reference.year(),
            month: reference.month(),
        })
    }

    // The Sunday-to-Saturday week containing the given day.  The headline
    // comes from the week's start, not the day itself.
    fn week_of(day: Day) -> Result<DateRange, RangeError> {
        let start = day
            .checked_add_days(-i64::from(day.weekday_index()))
            .ok_or(RangeError::InvalidDay)?;
        let end = start.checked_add_days(6).ok_or(RangeError::InvalidDay)?;
        Ok(DateRange {
            reference: day,
            start,
            end,
            year: start.year(),
            month: start.month(),
        })
    }

    pub(crate) fn contains(&self, day: Day) -> bool {
        self.start <= day && day <= self.end
    }

    pub(crate) fn days(&self) -> impl Iterator<Item = Day> {
        let end = self.end;
        successors(Some(self.start), |&d| d.next_day()).take_while(move |&d| d <= end)
    }

    // Both endpoints are midnights at a fixed offset, so the distance is an
    // exact number of days.
    pub(crate) fn day_count(&self) -> i64 {
        (self.end.unix_ms() - self.start.unix_ms()) / DAY_MS + 1
    }
}

/// The calendar engine: a view mode, the displayed range (once one has been
/// shown), the current selection, and the observers to notify.
pub(crate) struct RangeWindow {
    mode: ViewMode,
    range: Option<DateRange>,
    selected: Option<Day>,
    observers: Vec<Box<dyn RangeObserver>>,
}

impl RangeWindow {
    pub(crate) fn new(mode: ViewMode) -> RangeWindow {
        RangeWindow {
            mode,
            range: None,
            selected: None,
            observers: Vec::new(),
        }
    }

    pub(crate) fn mode(&self) -> ViewMode {
        self.mode
    }

    pub(crate) fn range(&self) -> Option<DateRange> {
        self.range
    }

    pub(crate) fn selected(&self) -> Option<Day> {
        self.selected
    }

    pub(crate) fn subscribe(&mut self, observer: Box<dyn RangeObserver>) {
        self.observers.push(observer);
    }

    /// Computes & stores the window around the given day under the current
    /// mode.  On error the window is left untouched.
    pub(crate) fn set_reference_day(&mut self, day: Day) -> Result<DateRange, RangeError> {
        let range = self.window_for(day)?;
        self.replace_range(range);
        Ok(range)
    }

    /// Switches the view mode, re-windowing around the old range's start.
    /// Setting the current mode again is a no-op; before any range has been
    /// shown, only the mode is stored.
    pub(crate) fn set_mode(&mut self, mode: ViewMode) -> Result<Option<DateRange>, RangeError> {
        if mode == self.mode {
            return Ok(self.range);
        }
        let Some(current) = self.range else {
            self.mode = mode;
            return Ok(None);
        };
        // Month windows always start on a Sunday, so the week re-window
        // begins exactly at the old start.
        let range = match mode {
            ViewMode::Week => DateRange::week_of(current.start)?,
            ViewMode::Month => DateRange::month_of(current.start)?,
        };
        self.mode = mode;
        self.replace_range(range);
        Ok(Some(range))
    }

    pub(crate) fn one_step_forwards(&mut self) -> Result<DateRange, RangeError> {
        let current = self.range.ok_or(RangeError::NotInitialized)?;
        let day = match self.mode {
            ViewMode::Week => current.start.checked_add_days(7),
            ViewMode::Month => current.reference.first_of_next_month(),
        }
        .ok_or(RangeError::InvalidDay)?;
        let range = self.window_for(day)?;
        self.replace_range(range);
        Ok(range)
    }

    pub(crate) fn one_step_backwards(&mut self) -> Result<DateRange, RangeError> {
        let current = self.range.ok_or(RangeError::NotInitialized)?;
        let day = match self.mode {
            ViewMode::Week => current.start.checked_add_days(-7),
            ViewMode::Month => current.reference.first_of_previous_month(),
        }
        .ok_or(RangeError::InvalidDay)?;
        let range = self.window_for(day)?;
        self.replace_range(range);
        Ok(range)
    }

    /// Records the selection and returns it.  Selection is unconditional:
    /// it works before any range has been shown and for days outside the
    /// displayed range.
    pub(crate) fn select(&mut self, day: Day) -> Day {
        self.selected = Some(day);
        for observer in &mut self.observers {
            observer.day_selected(day);
        }
        day
    }

    /// Whether the given day should carry an event marker: only in Month
    /// mode, and only for days of the headline month itself.
    pub(crate) fn is_event_day(&self, day: Day, events: &EventDays) -> bool {
        if self.mode != ViewMode::Month {
            return false;
        }
        let Some(range) = self.range else {
            return false;
        };
        day.year() == range.year
            && day.month() == range.month
            && events.contains(day.day_of_month())
    }

    fn window_for(&self, day: Day) -> Result<DateRange, RangeError> {
        match self.mode {
            ViewMode::Week => DateRange::week_of(day),
            ViewMode::Month => DateRange::month_of(day),
        }
    }

    // Observers hear about the new range after it is stored, and only when
    // it actually differs from the previous one.
    fn replace_range(&mut self, range: DateRange) {
        if self.range == Some(range) {
            return;
        }
        self.range = Some(range);
        for observer in &mut self.observers {
            observer.range_changed(&range);
        }
    }
}

impl fmt::Debug for RangeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeWindow")
            .field("mode", &self.mode)
            .field("range", &self.range)
            .field("selected", &self.selected)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum RangeError {
    #[error("day outside the representable calendar")]
    InvalidDay,
    #[error("no date range has been shown yet")]
    NotInitialized,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use time::macros::date;
    use time::Date;

    fn d(date: Date) -> Day {
        Day::from_date(date)
    }

    #[test]
    fn test_month_window_february() {
        let mut window = RangeWindow::new(ViewMode::Month);
        let range = window.set_reference_day(d(date!(2024 - 02 - 01))).unwrap();
        assert_eq!(range.reference, d(date!(2024 - 02 - 01)));
        assert_eq!(range.start, d(date!(2024 - 01 - 28)));
        assert_eq!(range.end, d(date!(2024 - 03 - 02)));
        assert_eq!(range.year, 2024);
        assert_eq!(range.month, 2);
        assert_eq!(window.range(), Some(range));
    }

    #[test]
    fn test_month_window_same_for_any_day_of_the_month() {
        let mut window = RangeWindow::new(ViewMode::Month);
        let range = window.set_reference_day(d(date!(2024 - 02 - 14))).unwrap();
        assert_eq!(range.reference, d(date!(2024 - 02 - 01)));
        assert_eq!(range.start, d(date!(2024 - 01 - 28)));
        assert_eq!(range.end, d(date!(2024 - 03 - 02)));
    }

    #[test]
    fn test_month_window_ending_on_saturday() {
        // 2024-11-30 is a Saturday, so there is no trailing fill
        let mut window = RangeWindow::new(ViewMode::Month);
        let range = window.set_reference_day(d(date!(2024 - 11 - 05))).unwrap();
        assert_eq!(range.start, d(date!(2024 - 10 - 27)));
        assert_eq!(range.end, d(date!(2024 - 11 - 30)));
    }

    #[test]
    fn test_month_window_starting_on_sunday() {
        // September 2024 begins on a Sunday, so there is no leading fill
        let mut window = RangeWindow::new(ViewMode::Month);
        let range = window.set_reference_day(d(date!(2024 - 09 - 10))).unwrap();
        assert_eq!(range.start, d(date!(2024 - 09 - 01)));
        assert_eq!(range.end, d(date!(2024 - 10 - 05)));
    }

    #[test]
    fn test_month_window_is_whole_weeks_around_the_month() {
        let mut window = RangeWindow::new(ViewMode::Month);
        for month in 1..=12u8 {
            let date = Date::from_calendar_date(2024, time::Month::try_from(month).unwrap(), 15)
                .unwrap();
            let range = window.set_reference_day(d(date)).unwrap();
            assert_eq!(range.day_count() % 7, 0, "month {month}");
            assert_eq!(range.start.weekday_index(), 0, "month {month}");
            assert_eq!(range.end.weekday_index(), 6, "month {month}");
            assert!(range.contains(d(date)), "month {month}");
            assert!(range.start <= range.reference, "month {month}");
            assert!(range.end >= d(date).last_of_month(), "month {month}");
        }
    }

    #[test]
    fn test_week_window_from_sunday() {
        let mut window = RangeWindow::new(ViewMode::Week);
        let range = window.set_reference_day(d(date!(2024 - 06 - 02))).unwrap();
        assert_eq!(range.reference, d(date!(2024 - 06 - 02)));
        assert_eq!(range.start, d(date!(2024 - 06 - 02)));
        assert_eq!(range.end, d(date!(2024 - 06 - 08)));
        assert_eq!(range.year, 2024);
        assert_eq!(range.month, 6);
        assert_eq!(range.day_count(), 7);
    }

    #[test]
    fn test_week_window_from_mid_week() {
        let mut window = RangeWindow::new(ViewMode::Week);
        let range = window.set_reference_day(d(date!(2024 - 06 - 05))).unwrap();
        assert_eq!(range.reference, d(date!(2024 - 06 - 05)));
        assert_eq!(range.start, d(date!(2024 - 06 - 02)));
        assert_eq!(range.end, d(date!(2024 - 06 - 08)));
    }

    #[test]
    fn test_week_window_straddling_months() {
        // The week of 2024-02-01 starts back in January, and January is the
        // headline
        let mut window = RangeWindow::new(ViewMode::Week);
        let range = window.set_reference_day(d(date!(2024 - 02 - 01))).unwrap();
        assert_eq!(range.start, d(date!(2024 - 01 - 28)));
        assert_eq!(range.end, d(date!(2024 - 02 - 03)));
        assert_eq!(range.year, 2024);
        assert_eq!(range.month, 1);
    }

    #[test]
    fn test_one_step_forwards_in_month_mode() {
        let mut window = RangeWindow::new(ViewMode::Month);
        window.set_reference_day(d(date!(2024 - 02 - 14))).unwrap();
        let range = window.one_step_forwards().unwrap();
        assert_eq!(range.reference, d(date!(2024 - 03 - 01)));
        assert_eq!(range.year, 2024);
        assert_eq!(range.month, 3);
        assert_eq!(range.start, d(date!(2024 - 02 - 25)));
        assert_eq!(range.end, d(date!(2024 - 04 - 06)));
    }

    #[test]
    fn test_step_round_trip_in_month_mode() {
        let mut window = RangeWindow::new(ViewMode::Month);
        let first = window.set_reference_day(d(date!(2024 - 02 - 14))).unwrap();
        window.one_step_forwards().unwrap();
        let back = window.one_step_backwards().unwrap();
        assert_eq!(back, first);
    }

    #[test]
    fn test_step_round_trip_in_week_mode() {
        let mut window = RangeWindow::new(ViewMode::Week);
        let first = window.set_reference_day(d(date!(2024 - 06 - 05))).unwrap();
        let next = window.one_step_forwards().unwrap();
        assert_eq!(next.start, d(date!(2024 - 06 - 09)));
        assert_eq!(next.end, d(date!(2024 - 06 - 15)));
        let back = window.one_step_backwards().unwrap();
        assert_eq!(back.start, first.start);
        assert_eq!(back.end, first.end);
    }

    #[test]
    fn test_step_across_a_year_boundary() {
        let mut window = RangeWindow::new(ViewMode::Month);
        window.set_reference_day(d(date!(2024 - 12 - 15))).unwrap();
        let range = window.one_step_forwards().unwrap();
        assert_eq!(range.reference, d(date!(2025 - 01 - 01)));
        assert_eq!(range.year, 2025);
        assert_eq!(range.month, 1);
        let back = window.one_step_backwards().unwrap();
        assert_eq!((back.year, back.month), (2024, 12));
    }

    #[test]
    fn test_stepping_before_initialization() {
        let mut window = RangeWindow::new(ViewMode::Month);
        assert_eq!(window.one_step_forwards(), Err(RangeError::NotInitialized));
        assert_eq!(window.one_step_backwards(), Err(RangeError::NotInitialized));
        assert_eq!(window.range(), None);
    }

    #[test]
    fn test_select_before_initialization() {
        let mut window = RangeWindow::new(ViewMode::Month);
        let day = d(date!(2024 - 02 - 14));
        assert_eq!(window.select(day), day);
        assert_eq!(window.selected(), Some(day));
        assert_eq!(window.range(), None);
        // The window is still usable afterwards
        let range = window.set_reference_day(day).unwrap();
        assert_eq!(range.month, 2);
        assert_eq!(window.selected(), Some(day));
    }

    #[test]
    fn test_select_outside_the_range() {
        let mut window = RangeWindow::new(ViewMode::Month);
        window.set_reference_day(d(date!(2024 - 02 - 14))).unwrap();
        let outside = d(date!(2024 - 07 - 04));
        assert_eq!(window.select(outside), outside);
        assert_eq!(window.selected(), Some(outside));
        // Selecting never moves the window
        assert_eq!(window.range().map(|r| r.month), Some(2));
    }

    #[test]
    fn test_switch_to_week_mode() {
        let mut window = RangeWindow::new(ViewMode::Month);
        window.set_reference_day(d(date!(2024 - 02 - 14))).unwrap();
        let range = window.set_mode(ViewMode::Week).unwrap().unwrap();
        assert_eq!(window.mode(), ViewMode::Week);
        assert_eq!(range.start, d(date!(2024 - 01 - 28)));
        assert_eq!(range.end, d(date!(2024 - 02 - 03)));
    }

    #[test]
    fn test_switch_to_month_mode() {
        let mut window = RangeWindow::new(ViewMode::Week);
        window.set_reference_day(d(date!(2024 - 06 - 05))).unwrap();
        let range = window.set_mode(ViewMode::Month).unwrap().unwrap();
        assert_eq!(window.mode(), ViewMode::Month);
        // Anchored on the month containing the old range's start
        assert_eq!(range.reference, d(date!(2024 - 06 - 01)));
        assert_eq!(range.year, 2024);
        assert_eq!(range.month, 6);
    }

    #[test]
    fn test_set_mode_to_the_current_mode_is_a_no_op() {
        let mut window = RangeWindow::new(ViewMode::Month);
        let range = window.set_reference_day(d(date!(2024 - 02 - 14))).unwrap();
        assert_eq!(window.set_mode(ViewMode::Month), Ok(Some(range)));
        assert_eq!(window.range(), Some(range));
    }

    #[test]
    fn test_set_mode_before_initialization() {
        let mut window = RangeWindow::new(ViewMode::Month);
        assert_eq!(window.set_mode(ViewMode::Week), Ok(None));
        assert_eq!(window.mode(), ViewMode::Week);
        assert_eq!(window.range(), None);
        let range = window.set_reference_day(d(date!(2024 - 06 - 05))).unwrap();
        assert_eq!(range.start, d(date!(2024 - 06 - 02)));
    }

    #[test]
    fn test_event_days_in_month_mode() {
        let mut window = RangeWindow::new(ViewMode::Month);
        window.set_reference_day(d(date!(2024 - 02 - 14))).unwrap();
        let events = EventDays::from_iter([3, 14, 28]);
        assert!(window.is_event_day(d(date!(2024 - 02 - 03)), &events));
        assert!(window.is_event_day(d(date!(2024 - 02 - 14)), &events));
        assert!(!window.is_event_day(d(date!(2024 - 02 - 15)), &events));
        // Days of adjacent months never get markers, even inside the
        // displayed range and with a matching day-of-month key
        assert!(!window.is_event_day(d(date!(2024 - 01 - 28)), &events));
        assert!(!window.is_event_day(d(date!(2024 - 03 - 01)), &events));
        // Same month of a different year
        assert!(!window.is_event_day(d(date!(2025 - 02 - 14)), &events));
    }

    #[test]
    fn test_event_days_in_week_mode() {
        let mut window = RangeWindow::new(ViewMode::Week);
        window.set_reference_day(d(date!(2024 - 02 - 14))).unwrap();
        let events = EventDays::from_iter([14]);
        assert!(!window.is_event_day(d(date!(2024 - 02 - 14)), &events));
    }

    #[test]
    fn test_event_days_before_initialization() {
        let window = RangeWindow::new(ViewMode::Month);
        let events = EventDays::from_iter([14]);
        assert!(!window.is_event_day(d(date!(2024 - 02 - 14)), &events));
    }

    #[test]
    fn test_days_enumeration() {
        let mut window = RangeWindow::new(ViewMode::Month);
        let range = window.set_reference_day(d(date!(2024 - 02 - 01))).unwrap();
        let days = range.days().collect::<Vec<_>>();
        assert_eq!(days.len(), 35);
        assert_eq!(days.first(), Some(&d(date!(2024 - 01 - 28))));
        assert_eq!(days.last(), Some(&d(date!(2024 - 03 - 02))));
        assert_eq!(i64::try_from(days.len()).unwrap(), range.day_count());
    }

    #[test]
    fn test_window_past_the_end_of_the_calendar() {
        // 9999-12-31 is a Friday, so the trailing fill would leave the
        // calendar
        let mut window = RangeWindow::new(ViewMode::Month);
        assert_eq!(
            window.set_reference_day(d(date!(9999 - 12 - 15))),
            Err(RangeError::InvalidDay)
        );
        assert_eq!(window.range(), None);
    }

    #[derive(Clone, Default)]
    struct Recorder {
        ranges: Rc<RefCell<Vec<DateRange>>>,
        selections: Rc<RefCell<Vec<Day>>>,
    }

    impl RangeObserver for Recorder {
        fn range_changed(&mut self, range: &DateRange) {
            self.ranges.borrow_mut().push(*range);
        }

        fn day_selected(&mut self, day: Day) {
            self.selections.borrow_mut().push(day);
        }
    }

    #[test]
    fn test_observer_notifications() {
        let mut window = RangeWindow::new(ViewMode::Month);
        let recorder = Recorder::default();
        window.subscribe(Box::new(recorder.clone()));
        let first = window.set_reference_day(d(date!(2024 - 02 - 14))).unwrap();
        let second = window.one_step_forwards().unwrap();
        let day = d(date!(2024 - 03 - 05));
        window.select(day);
        assert_eq!(*recorder.ranges.borrow(), vec![first, second]);
        assert_eq!(*recorder.selections.borrow(), vec![day]);
    }

    #[test]
    fn test_observer_quiet_when_the_range_is_unchanged() {
        let mut window = RangeWindow::new(ViewMode::Month);
        let recorder = Recorder::default();
        window.subscribe(Box::new(recorder.clone()));
        window.set_reference_day(d(date!(2024 - 02 - 14))).unwrap();
        // A different reference day in the same month computes the same
        // window
        window.set_reference_day(d(date!(2024 - 02 - 20))).unwrap();
        assert_eq!(recorder.ranges.borrow().len(), 1);
    }
}
