//! Least-loaded-first courtroom allocator (§4.6), grounded in the host
//! project's `CalendarService::find_next_available_slot` conflict-avoidance
//! idiom, generalized from "first free slot" to "least loaded room".

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::courtroom::{Courtroom, CourtroomId};
use crate::ports::courtroom_allocator::{AllocationOutcome, CourtroomAllocator};

/// Assigns each candidate, in order, to the courtroom with the fewest
/// cases scheduled so far today, breaking ties by courtroom id (the order
/// of `courtroom_order`, which callers must pass sorted by id).
#[derive(Debug, Default)]
pub struct LeastLoadedAllocator;

impl LeastLoadedAllocator {
    pub fn new() -> Self {
        LeastLoadedAllocator
    }
}

impl CourtroomAllocator for LeastLoadedAllocator {
    fn allocate(
        &self,
        ordered_candidates: Vec<crate::domain::case::Case>,
        courtrooms: &mut HashMap<CourtroomId, Courtroom>,
        courtroom_order: &[CourtroomId],
        today: NaiveDate,
    ) -> AllocationOutcome {
        let mut by_courtroom: HashMap<CourtroomId, Vec<crate::domain::case::Case>> = HashMap::new();
        let mut capacity_limited = Vec::new();

        for case in ordered_candidates {
            let mut selected: Option<CourtroomId> = None;
            let mut best_count = u32::MAX;
            for room_id in courtroom_order {
                let room = match courtrooms.get(room_id) {
                    Some(r) => r,
                    None => continue,
                };
                if room.has_room(today) {
                    let count = room.scheduled_count();
                    if count < best_count {
                        best_count = count;
                        selected = Some(room_id.clone());
                    }
                }
            }

            match selected {
                Some(room_id) => {
                    if let Some(room) = courtrooms.get_mut(&room_id) {
                        room.assign(case.id.clone());
                    }
                    by_courtroom.entry(room_id).or_default().push(case);
                }
                None => capacity_limited.push(case),
            }
        }

        AllocationOutcome {
            by_courtroom,
            capacity_limited,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::case::{Case, CaseId, CaseType, Stage};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn room(id: &str, capacity: u32) -> Courtroom {
        Courtroom::new(CourtroomId::from(id), capacity)
    }

    fn case(id: &str) -> Case {
        Case::new(CaseId::from(id), CaseType::Contract, date(2024, 1, 1), Stage::Admission)
    }

    #[test]
    fn balances_evenly_across_rooms() {
        let mut courtrooms = HashMap::new();
        courtrooms.insert(CourtroomId::from("RM-1"), room("RM-1", 100));
        courtrooms.insert(CourtroomId::from("RM-2"), room("RM-2", 100));
        let order = vec![CourtroomId::from("RM-1"), CourtroomId::from("RM-2")];

        let candidates: Vec<Case> = (0..4).map(|i| case(&format!("C{i}"))).collect();
        let allocator = LeastLoadedAllocator::new();
        let outcome = allocator.allocate(candidates, &mut courtrooms, &order, date(2024, 6, 1));

        assert_eq!(outcome.by_courtroom.get(&CourtroomId::from("RM-1")).unwrap().len(), 2);
        assert_eq!(outcome.by_courtroom.get(&CourtroomId::from("RM-2")).unwrap().len(), 2);
        assert!(outcome.capacity_limited.is_empty());
    }

    #[test]
    fn records_capacity_limited_when_full() {
        let mut courtrooms = HashMap::new();
        courtrooms.insert(CourtroomId::from("RM-1"), room("RM-1", 1));
        let order = vec![CourtroomId::from("RM-1")];

        let candidates = vec![case("A"), case("B")];
        let allocator = LeastLoadedAllocator::new();
        let outcome = allocator.allocate(candidates, &mut courtrooms, &order, date(2024, 6, 1));

        assert_eq!(outcome.by_courtroom.get(&CourtroomId::from("RM-1")).unwrap().len(), 1);
        assert_eq!(outcome.capacity_limited.len(), 1);
    }

    #[test]
    fn ties_broken_by_courtroom_order() {
        let mut courtrooms = HashMap::new();
        courtrooms.insert(CourtroomId::from("RM-1"), room("RM-1", 5));
        courtrooms.insert(CourtroomId::from("RM-2"), room("RM-2", 5));
        let order = vec![CourtroomId::from("RM-1"), CourtroomId::from("RM-2")];

        let allocator = LeastLoadedAllocator::new();
        let outcome = allocator.allocate(vec![case("A")], &mut courtrooms, &order, date(2024, 6, 1));
        assert!(outcome.by_courtroom.contains_key(&CourtroomId::from("RM-1")));
    }
}
