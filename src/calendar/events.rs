/// The days of the month (1-31) that carry an event marker.
///
/// The app rebuilds this per draw from its full event dates, filtered to the
/// headline year & month, so a key only ever means "this day of the
/// displayed month".
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct EventDays([bool; 31]);

impl EventDays {
    pub(crate) fn new() -> EventDays {
        EventDays::default()
    }

    // Out-of-range keys are ignored
    pub(crate) fn insert(&mut self, day_of_month: u8) {
        if let Some(cell) = day_of_month
            .checked_sub(1)
            .and_then(|i| self.0.get_mut(usize::from(i)))
        {
            *cell = true;
        }
    }

    pub(crate) fn contains(&self, day_of_month: u8) -> bool {
        day_of_month
            .checked_sub(1)
            .is_some_and(|i| self.0.get(usize::from(i)) == Some(&true))
    }
}

impl FromIterator<u8> for EventDays {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> EventDays {
        let mut days = EventDays::new();
        for d in iter {
            days.insert(d);
        }
        days
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_contains() {
        let mut days = EventDays::new();
        assert!(!days.contains(14));
        days.insert(14);
        days.insert(1);
        days.insert(31);
        assert!(days.contains(14));
        assert!(days.contains(1));
        assert!(days.contains(31));
        assert!(!days.contains(2));
    }

    #[test]
    fn test_out_of_range_keys_are_ignored() {
        let mut days = EventDays::new();
        days.insert(0);
        days.insert(32);
        days.insert(u8::MAX);
        assert_eq!(days, EventDays::new());
        assert!(!days.contains(0));
        assert!(!days.contains(32));
    }

    #[test]
    fn test_from_iterator_dedupes() {
        let days = EventDays::from_iter([3, 14, 3, 29]);
        assert!(days.contains(3));
        assert!(days.contains(14));
        assert!(days.contains(29));
        assert!(!days.contains(4));
    }
}
