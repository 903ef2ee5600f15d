use thiserror::Error;
use time::{macros::offset, Date, Duration, Month, OffsetDateTime, UtcOffset};

/// Exactly one day in milliseconds.  The reference offset has no DST, so
/// every day is this long.
pub(crate) const DAY_MS: i64 = 86_400_000;

/// All calendar math happens on civil dates in this fixed offset (UTC+09:00),
/// no matter where the process runs.
pub(crate) const REFERENCE_OFFSET: UtcOffset = offset!(+9);

/// A calendar day in the reference offset.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub(crate) struct Day(Date);

impl Day {
    pub(crate) fn from_date(date: Date) -> Day {
        Day(date)
    }

    /// The current day in the reference offset.
    pub(crate) fn today() -> Day {
        Day(OffsetDateTime::now_utc().to_offset(REFERENCE_OFFSET).date())
    }

    /// Floors an instant (Unix milliseconds) to the day containing it in the
    /// reference offset.
    pub(crate) fn from_unix_ms(ms: i64) -> Result<Day, InvalidDayError> {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(ms) * 1_000_000)
            .ok()
            .and_then(|odt| odt.checked_to_offset(REFERENCE_OFFSET))
            .map(|odt| Day(odt.date()))
            .ok_or(InvalidDayError { ms })
    }

    /// Midnight of this day in the reference offset, as Unix milliseconds.
    pub(crate) fn unix_ms(self) -> i64 {
        self.0
            .midnight()
            .assume_offset(REFERENCE_OFFSET)
            .unix_timestamp()
            * 1_000
    }

    pub(crate) fn year(self) -> i32 {
        self.0.year()
    }

    pub(crate) fn month(self) -> u8 {
        self.0.month().into()
    }

    pub(crate) fn day_of_month(self) -> u8 {
        self.0.day()
    }

    // 0 = Sunday .. 6 = Saturday
    pub(crate) fn weekday_index(self) -> u8 {
        self.0.weekday().number_days_from_sunday()
    }

    pub(crate) fn next_day(self) -> Option<Day> {
        self.0.next_day().map(Day)
    }

    pub(crate) fn checked_add_days(self, days: i64) -> Option<Day> {
        self.0.checked_add(Duration::days(days)).map(Day)
    }

    pub(crate) fn first_of_month(self) -> Day {
        let date = self
            .0
            .replace_day(1)
            .expect("day 1 should be valid in every month");
        Day(date)
    }

    pub(crate) fn last_of_month(self) -> Day {
        let date = self
            .0
            .replace_day(self.0.month().length(self.0.year()))
            .expect("a month's length should be a valid day of that month");
        Day(date)
    }

    pub(crate) fn first_of_next_month(self) -> Option<Day> {
        let month = self.0.month();
        let year = if month == Month::December {
            self.0.year().checked_add(1)?
        } else {
            self.0.year()
        };
        Date::from_calendar_date(year, month.next(), 1).ok().map(Day)
    }

    pub(crate) fn first_of_previous_month(self) -> Option<Day> {
        let month = self.0.month();
        let year = if month == Month::January {
            self.0.year().checked_sub(1)?
        } else {
            self.0.year()
        };
        Date::from_calendar_date(year, month.previous(), 1)
            .ok()
            .map(Day)
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("timestamp {ms} ms does not fall on a representable day")]
pub(crate) struct InvalidDayError {
    pub(crate) ms: i64,
}
