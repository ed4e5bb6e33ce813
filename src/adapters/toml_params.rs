//! Loads [`ParameterTables`] from a TOML document (§4.1.1).
//!
//! Modeled on the host project's `rule_loader`/`toml_config_loader`
//! adapters: an intermediate `#[derive(Deserialize)]` shape is parsed with
//! `toml::from_str`, validated, then folded into the runtime representation.
//! This is one adapter among possible others — callers may equally
//! construct [`ParameterTables`] programmatically.

use serde::Deserialize;

use crate::domain::case::{CaseType, Stage};
use crate::domain::params::{ParameterTables, StageDistribution, TypeStats};
use crate::error::RunError;

#[derive(Debug, Deserialize)]
struct TomlParameterDoc {
    #[serde(default)]
    transition: Vec<TomlTransition>,
    #[serde(default)]
    duration: Vec<TomlDuration>,
    #[serde(default)]
    adjournment: Vec<TomlAdjournment>,
    #[serde(default)]
    type_stats: Vec<TomlTypeStats>,
    #[serde(default)]
    capacity: Vec<TomlCapacity>,
}

#[derive(Debug, Deserialize)]
struct TomlTransition {
    stage: Stage,
    case_type: CaseType,
    weights: Vec<(Stage, f64)>,
}

#[derive(Debug, Deserialize)]
struct TomlDuration {
    stage: Stage,
    case_type: CaseType,
    median: f64,
    p90: f64,
}

#[derive(Debug, Deserialize)]
struct TomlAdjournment {
    stage: Stage,
    case_type: CaseType,
    probability: f64,
}

#[derive(Debug, Deserialize)]
struct TomlTypeStats {
    case_type: CaseType,
    median_hearings_to_disposal: f64,
    median_inter_hearing_gap_days: f64,
}

#[derive(Debug, Deserialize)]
struct TomlCapacity {
    courtroom_id: String,
    nominal: u32,
    p90: u32,
}

/// Parses a TOML document into a validated [`ParameterTables`].
pub fn load_parameter_tables(toml_source: &str) -> Result<ParameterTables, RunError> {
    let doc: TomlParameterDoc = toml::from_str(toml_source)?;
    let mut tables = ParameterTables::new();

    for t in doc.transition {
        // A transition table whose weights don't sum to 1.0 within tolerance
        // is the probability-sum invariant (§4.11, §7), not a configuration
        // shape error — it's caught here because this is where the
        // distribution gets its one validation pass, not because it's the
        // same kind of failure as an unknown policy name.
        let distribution = StageDistribution::new(t.weights).map_err(|e| {
            RunError::InvariantViolation(format!("transition table for {:?}/{}: {e}", t.stage, t.case_type))
        })?;
        tables.insert_transition(t.stage, t.case_type, distribution);
    }

    for d in doc.duration {
        tables.insert_duration(d.stage, d.case_type, d.median, d.p90);
    }

    for a in doc.adjournment {
        if !(0.0..=1.0).contains(&a.probability) {
            return Err(RunError::Configuration(format!(
                "adjournment probability for {:?}/{} out of range: {}",
                a.stage, a.case_type, a.probability
            )));
        }
        tables.insert_adjournment(a.stage, a.case_type, a.probability);
    }

    for s in doc.type_stats {
        tables.insert_type_stats(
            s.case_type,
            TypeStats {
                median_hearings_to_disposal: s.median_hearings_to_disposal,
                median_inter_hearing_gap_days: s.median_inter_hearing_gap_days,
            },
        );
    }

    for c in doc.capacity {
        tables.insert_capacity(&c.courtroom_id, c.nominal, c.p90);
    }

    Ok(tables)
}
