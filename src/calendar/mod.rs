mod day;
mod engine;
mod events;
mod widget;
pub(crate) use self::day::Day;
pub(crate) use self::engine::{DateRange, RangeWindow, ViewMode};
pub(crate) use self::events::EventDays;
pub(crate) use self::widget::Calendar;

/// Callback interface for hearing about window changes as they happen.
pub(crate) trait RangeObserver {
    /// Called after the displayed range changes to something new
    fn range_changed(&mut self, range: &DateRange);

    /// Called on every selection
    fn day_selected(&mut self, day: Day);
}
