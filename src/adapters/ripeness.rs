//! Default ripeness classifier (§4.3): a first-match-wins decision tree
//! over purpose keywords, stage, and hearing history.

use chrono::NaiveDate;

use crate::domain::case::{Case, RipenessState, RipenessVerdict};
use crate::ports::ripeness_classifier::{RipenessClassifier, RipenessThresholds};

const SUMMONS_KEYWORDS: &[&str] = &["summons", "notice"];
const DEPENDENT_KEYWORDS: &[&str] = &["stay", "pending"];
const DOCUMENT_KEYWORDS: &[&str] = &["document", "record"];

/// Lower-cases and splits on non-alphanumeric boundaries, once per lookup
/// (§9 "Hidden coupling via `last_hearing_purpose`": treat free text as a
/// one-shot tokenization rather than re-scanning per keyword set).
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_lowercase())
        .collect()
}

fn any_keyword_present(tokens: &[String], keywords: &[&str]) -> bool {
    tokens.iter().any(|t| keywords.contains(&t.as_str()))
}

/// The default, configurable ripeness classifier (§4.3).
#[derive(Debug, Clone)]
pub struct DefaultRipenessClassifier {
    thresholds: RipenessThresholds,
}

impl DefaultRipenessClassifier {
    pub fn new(thresholds: RipenessThresholds) -> Self {
        DefaultRipenessClassifier { thresholds }
    }
}

impl Default for DefaultRipenessClassifier {
    fn default() -> Self {
        DefaultRipenessClassifier::new(RipenessThresholds::default())
    }
}

impl RipenessClassifier for DefaultRipenessClassifier {
    fn classify(&self, case: &Case, today: NaiveDate) -> RipenessState {
        let verdict_reason = if let Some(purpose) = &case.last_hearing_purpose {
            let tokens = tokenize(purpose);
            if any_keyword_present(&tokens, SUMMONS_KEYWORDS) {
                Some((RipenessVerdict::UnripeSummons, "last hearing purpose indicates pending service/notice".to_string()))
            } else if any_keyword_present(&tokens, DEPENDENT_KEYWORDS) {
                Some((RipenessVerdict::UnripeDependent, "last hearing purpose indicates a stay or dependent proceeding".to_string()))
            } else if any_keyword_present(&tokens, DOCUMENT_KEYWORDS) {
                Some((RipenessVerdict::UnripeDocument, "last hearing purpose indicates outstanding documentation".to_string()))
            } else {
                None
            }
        } else {
            None
        };

        let (verdict, reason) = verdict_reason.unwrap_or_else(|| {
            if case.current_stage.is_initial_admission()
                && case.hearing_count < self.thresholds.min_service_hearings
            {
                (
                    RipenessVerdict::UnripeSummons,
                    format!(
                        "at admission stage with only {} hearing(s), below minimum {}",
                        case.hearing_count, self.thresholds.min_service_hearings
                    ),
                )
            } else if case.hearing_count > self.thresholds.stuck_hearing_count
                && case
                    .mean_hearing_gap_days()
                    .map(|g| g > self.thresholds.stuck_avg_gap_days)
                    .unwrap_or(false)
            {
                (
                    RipenessVerdict::UnripeParty,
                    format!(
                        "{} hearings with average gap above {} days, flagged as stuck",
                        case.hearing_count, self.thresholds.stuck_avg_gap_days
                    ),
                )
            } else if case.current_stage.is_advanced() {
                (RipenessVerdict::Ripe, "case is in an advanced stage".to_string())
            } else if self.thresholds.strict_mode {
                (RipenessVerdict::Unknown, "no rule matched and strict mode is enabled".to_string())
            } else {
                (RipenessVerdict::Ripe, "no rule matched, defaulting to ripe".to_string())
            }
        });

        RipenessState {
            verdict,
            reason,
            last_evaluated: today,
        }
    }

    fn ripening_eta(&self, case: &Case, today: NaiveDate) -> Option<i64> {
        let verdict = self.classify(case, today).verdict;
        match verdict {
            RipenessVerdict::Ripe => Some(0),
            RipenessVerdict::UnripeSummons => {
                let remaining = self
                    .thresholds
                    .min_service_hearings
                    .saturating_sub(case.hearing_count);
                Some(remaining as i64 * 30)
            }
            _ => None,
        }
    }

    fn set_thresholds(&mut self, thresholds: RipenessThresholds) {
        self.thresholds = thresholds;
    }

    fn thresholds(&self) -> RipenessThresholds {
        self.thresholds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::case::{CaseId, CaseType, HearingOutcome, HearingRecord, Stage};
    use crate::domain::courtroom::CourtroomId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn case(stage: Stage) -> Case {
        Case::new(CaseId::from("C1"), CaseType::Contract, date(2024, 1, 1), stage)
    }

    #[test]
    fn advanced_stage_is_ripe() {
        let classifier = DefaultRipenessClassifier::default();
        let c = case(Stage::Arguments);
        let state = classifier.classify(&c, date(2024, 6, 1));
        assert_eq!(state.verdict, RipenessVerdict::Ripe);
    }

    #[test]
    fn summons_keyword_in_purpose_overrides_everything() {
        let classifier = DefaultRipenessClassifier::default();
        let mut c = case(Stage::Arguments);
        c.last_hearing_purpose = Some("Summons service pending".to_string());
        let state = classifier.classify(&c, date(2024, 6, 1));
        assert_eq!(state.verdict, RipenessVerdict::UnripeSummons);
    }

    #[test]
    fn non_strict_default_is_ripe() {
        let classifier = DefaultRipenessClassifier::default();
        let c = case(Stage::Notice);
        let state = classifier.classify(&c, date(2024, 6, 1));
        assert_eq!(state.verdict, RipenessVerdict::Ripe);
    }

    #[test]
    fn strict_mode_default_is_unknown() {
        let mut thresholds = RipenessThresholds::default();
        thresholds.strict_mode = true;
        let classifier = DefaultRipenessClassifier::new(thresholds);
        let c = case(Stage::Notice);
        let state = classifier.classify(&c, date(2024, 6, 1));
        assert_eq!(state.verdict, RipenessVerdict::Unknown);
    }

    #[test]
    fn stuck_case_flagged_unripe_party() {
        let classifier = DefaultRipenessClassifier::default();
        let mut c = case(Stage::Notice);
        let mut d = date(2024, 1, 1);
        for _ in 0..8 {
            d = d + chrono::Duration::days(120);
            c.record_hearing(HearingRecord {
                date: d,
                outcome: HearingOutcome::Heard,
                stage_before: Stage::Notice,
                stage_after: Stage::Notice,
                courtroom_id: CourtroomId::from("RM-1"),
            });
        }
        let state = classifier.classify(&c, d);
        assert_eq!(state.verdict, RipenessVerdict::UnripeParty);
    }
}
