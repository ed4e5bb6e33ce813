//! Age-first priority policy (§4.4): order by age descending, ties broken
//! by filed date.

use chrono::NaiveDate;

use crate::domain::case::Case;
use crate::ports::priority_policy::{PolicyContext, PriorityPolicy};

#[derive(Debug, Default)]
pub struct AgePolicy;

impl PriorityPolicy for AgePolicy {
    fn name(&self) -> &'static str {
        "age"
    }

    fn prioritize(&self, candidates: &mut Vec<Case>, today: NaiveDate, _context: &PolicyContext) {
        candidates.sort_by(|a, b| {
            b.age_days(today)
                .cmp(&a.age_days(today))
                .then_with(|| a.filed_date.cmp(&b.filed_date))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::case::{CaseId, CaseType, Stage};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn case(id: &str, filed: NaiveDate) -> Case {
        Case::new(CaseId::from(id), CaseType::Contract, filed, Stage::Admission)
    }

    #[test]
    fn orders_oldest_first() {
        let mut cases = vec![
            case("young", date(2024, 5, 1)),
            case("old", date(2023, 1, 1)),
        ];
        let policy = AgePolicy;
        let context = PolicyContext {
            total_capacity: 1,
            min_gap_days: 0,
            preferred_case_type: None,
        };
        policy.prioritize(&mut cases, date(2024, 6, 1), &context);
        assert_eq!(cases[0].id, CaseId::from("old"));
    }
}
