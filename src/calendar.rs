//! Working-day calendar abstraction (§4.9, §9 "the working-day calendar is
//! treated as injected"). The source jurisdiction's own calendar (192
//! working days/year) isn't guessable from the spec, so only the
//! jurisdiction-independent weekend rule ships as a default; anything more
//! specific is the caller's to inject.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};

/// A predicate over calendar dates: is `date` a day the simulation should
/// advance on?
pub trait WorkingDayCalendar: Send + Sync {
    fn is_working_day(&self, date: NaiveDate) -> bool;
}

/// Saturdays and Sundays are non-working; every other day is. Grounded in
/// the host project's `domain::docket::CalendarService::find_next_available_slot`,
/// which skips `Weekday::Sat`/`Weekday::Sun` the same way.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl WorkingDayCalendar for WeekendCalendar {
    fn is_working_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

/// Weekends plus an explicit, caller-supplied set of holiday dates.
#[derive(Debug, Clone, Default)]
pub struct FixedHolidayCalendar {
    holidays: HashSet<NaiveDate>,
}

impl FixedHolidayCalendar {
    pub fn new(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        FixedHolidayCalendar {
            holidays: holidays.into_iter().collect(),
        }
    }
}

impl WorkingDayCalendar for FixedHolidayCalendar {
    fn is_working_day(&self, date: NaiveDate) -> bool {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        !self.holidays.contains(&date)
    }
}
