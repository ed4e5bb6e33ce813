//! Layered simulation configuration (§3.1, §6), modeled on the host
//! project's `TomlConfigLoader`: a base document plus an optional named
//! overlay, merged field-by-field, with a plain programmatic constructor for
//! callers that already hold their config in memory — the common case,
//! since config loading itself is out of the core's scope (§1).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::case::CaseType;
use crate::domain::params::DurationPercentile;
use crate::error::RunError;

/// Case inflow settings: whether new cases are sampled into the population
/// as the run progresses, and at what rate (§4.9 "case inflow").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InflowConfig {
    pub enabled: bool,
    pub mean_cases_per_day: f64,
    pub case_type_weights: Vec<(CaseType, f64)>,
}

impl Default for InflowConfig {
    fn default() -> Self {
        InflowConfig {
            enabled: false,
            mean_cases_per_day: 0.0,
            case_type_weights: Vec::new(),
        }
    }
}

/// A single courtroom's id and nominal daily capacity, as configuration
/// input (§6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourtroomConfig {
    pub id: String,
    pub nominal_capacity: u32,
}

/// Top-level simulation configuration (§3.1, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub start_date: NaiveDate,
    pub horizon_days: u32,
    pub seed: u64,
    pub courtrooms: Vec<CourtroomConfig>,
    pub policy_name: String,
    #[serde(default)]
    pub min_gap_days: u32,
    #[serde(default = "default_ripeness_eval_period")]
    pub ripeness_eval_period_days: u32,
    #[serde(default)]
    pub strict_ripeness: bool,
    #[serde(default)]
    pub inflow: InflowConfig,
    #[serde(default = "default_duration_percentile")]
    pub duration_percentile: DurationPercentileConfig,
}

/// `DurationPercentile` doesn't implement (De)serialize itself since it's a
/// plain domain enum used at runtime; this wrapper is the TOML-facing copy,
/// converted via `From`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationPercentileConfig {
    Median,
    P90,
}

impl From<DurationPercentileConfig> for DurationPercentile {
    fn from(value: DurationPercentileConfig) -> Self {
        match value {
            DurationPercentileConfig::Median => DurationPercentile::Median,
            DurationPercentileConfig::P90 => DurationPercentile::P90,
        }
    }
}

fn default_ripeness_eval_period() -> u32 {
    7
}

fn default_duration_percentile() -> DurationPercentileConfig {
    DurationPercentileConfig::Median
}

impl SimulationConfig {
    /// Validates the configuration (§7 "Configuration" error kind): empty
    /// courtroom set, unknown policy name, etc.
    pub fn validate(&self) -> Result<(), RunError> {
        if self.courtrooms.is_empty() {
            return Err(RunError::Configuration("courtroom set must not be empty".to_string()));
        }
        if self.horizon_days == 0 {
            return Err(RunError::Configuration("horizon_days must be positive".to_string()));
        }
        const KNOWN_POLICIES: &[&str] = &["fifo", "age", "composite", "external"];
        if !KNOWN_POLICIES.contains(&self.policy_name.as_str()) {
            return Err(RunError::Configuration(format!(
                "unknown policy name: {} (expected one of {:?})",
                self.policy_name, KNOWN_POLICIES
            )));
        }
        for room in &self.courtrooms {
            if room.nominal_capacity == 0 {
                return Err(RunError::Configuration(format!(
                    "courtroom {} has zero nominal capacity",
                    room.id
                )));
            }
        }
        Ok(())
    }

    /// Parses a base TOML document, optionally merging a named overlay
    /// document on top of it field-by-field (host project's district/
    /// court-type layering pattern, generalized to this crate's config
    /// shape).
    pub fn load(base_toml: &str, overlay_toml: Option<&str>) -> Result<Self, RunError> {
        let mut config: SimulationConfig = toml::from_str(base_toml)?;
        if let Some(overlay_source) = overlay_toml {
            let overlay: SimulationConfigOverlay = toml::from_str(overlay_source)?;
            overlay.apply_to(&mut config);
        }
        config.validate()?;
        Ok(config)
    }
}

/// A partial configuration document: every field optional, applied on top
/// of a base [`SimulationConfig`] when present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimulationConfigOverlay {
    pub seed: Option<u64>,
    pub policy_name: Option<String>,
    pub min_gap_days: Option<u32>,
    pub ripeness_eval_period_days: Option<u32>,
    pub strict_ripeness: Option<bool>,
    pub inflow: Option<InflowConfig>,
}

impl SimulationConfigOverlay {
    fn apply_to(self, config: &mut SimulationConfig) {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(policy_name) = self.policy_name {
            config.policy_name = policy_name;
        }
        if let Some(min_gap_days) = self.min_gap_days {
            config.min_gap_days = min_gap_days;
        }
        if let Some(period) = self.ripeness_eval_period_days {
            config.ripeness_eval_period_days = period;
        }
        if let Some(strict) = self.strict_ripeness {
            config.strict_ripeness = strict;
        }
        if let Some(inflow) = self.inflow {
            config.inflow = inflow;
        }
    }
}
