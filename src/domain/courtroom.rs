//! Courtrooms and their daily capacity.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::case::CaseId;

/// Opaque courtroom identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CourtroomId(pub String);

impl std::fmt::Display for CourtroomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CourtroomId {
    fn from(s: &str) -> Self {
        CourtroomId(s.to_string())
    }
}

/// A courtroom with a nominal daily capacity and optional per-date
/// overrides (§4.5 override kind `capacity`, §4.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Courtroom {
    pub id: CourtroomId,
    pub nominal_capacity: u32,
    #[serde(default)]
    capacity_overrides: HashMap<NaiveDate, u32>,
    /// Cases scheduled today, in assignment order. Reset at the start of
    /// every day by [`crate::domain::courtroom::Courtroom::reset_for_day`].
    #[serde(skip)]
    scheduled_today: Vec<CaseId>,
}

impl Courtroom {
    pub fn new(id: CourtroomId, nominal_capacity: u32) -> Self {
        Courtroom {
            id,
            nominal_capacity,
            capacity_overrides: HashMap::new(),
            scheduled_today: Vec::new(),
        }
    }

    /// Effective capacity for `date`: the override if one was staged for
    /// that date, else the nominal capacity.
    pub fn effective_capacity(&self, date: NaiveDate) -> u32 {
        *self.capacity_overrides.get(&date).unwrap_or(&self.nominal_capacity)
    }

    pub fn set_capacity_override(&mut self, date: NaiveDate, capacity: u32) {
        self.capacity_overrides.insert(date, capacity);
    }

    pub fn reset_for_day(&mut self) {
        self.scheduled_today.clear();
    }

    pub fn scheduled_count(&self) -> u32 {
        self.scheduled_today.len() as u32
    }

    pub fn has_room(&self, date: NaiveDate) -> bool {
        self.scheduled_count() < self.effective_capacity(date)
    }

    pub fn assign(&mut self, case_id: CaseId) {
        self.scheduled_today.push(case_id);
    }

    pub fn scheduled_today(&self) -> &[CaseId] {
        &self.scheduled_today
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn nominal_capacity_used_without_override() {
        let room = Courtroom::new(CourtroomId::from("RM-1"), 10);
        assert_eq!(room.effective_capacity(date(2024, 1, 1)), 10);
    }

    #[test]
    fn capacity_override_applies_only_on_its_date() {
        let mut room = Courtroom::new(CourtroomId::from("RM-1"), 10);
        room.set_capacity_override(date(2024, 1, 2), 0);
        assert_eq!(room.effective_capacity(date(2024, 1, 1)), 10);
        assert_eq!(room.effective_capacity(date(2024, 1, 2)), 0);
    }

    #[test]
    fn reset_clears_daily_assignments() {
        let mut room = Courtroom::new(CourtroomId::from("RM-1"), 1);
        room.assign(CaseId::from("C1"));
        assert!(!room.has_room(date(2024, 1, 1)));
        room.reset_for_day();
        assert!(room.has_room(date(2024, 1, 1)));
    }
}
