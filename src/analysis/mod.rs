//! Request-level analysis around the shared fuzzy profiles
//!
//! Every scenario follows the same pipeline:
//!
//! 1. pull the required numeric fields out of the JSON payload
//! 2. reject values outside the variable's universe
//! 3. fetch the shared profile (a failed build surfaces here)
//! 4. nudge boundary-exact values inward ([`avoid_fuzzy_edge`])
//! 5. run the engine, then band and describe the crisp output
//!
//! The engine itself never nudges; step 4 belongs to the caller.

pub mod air_quality;
pub mod comfort;
pub mod light;
pub mod plant_care;
pub mod plant_policy;

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::EngineConfig;
use crate::domains::{get_profile, Domain};
use crate::error::{ErrorCode, FuzzyError, FuzzyResult};
use crate::fuzzy_error;

pub use plant_policy::{Adjustments, PlantPolicy, PlantType};

// ============================================================================
// Edge nudging
// ============================================================================

/// Move a value sitting on (or past) a universe bound inward by `delta`
pub fn avoid_fuzzy_edge(value: f64, min: f64, max: f64, delta: f64) -> f64 {
    if value <= min {
        min + delta
    } else if value >= max {
        max - delta
    } else {
        value
    }
}

/// Whether and how far boundary inputs are nudged before inference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePolicy {
    pub enabled: bool,
    pub delta: f64,
}

impl EdgePolicy {
    pub const DEFAULT_DELTA: f64 = 0.01;

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            delta: 0.0,
        }
    }

    pub fn apply(&self, value: f64, range: (f64, f64)) -> f64 {
        if self.enabled {
            avoid_fuzzy_edge(value, range.0, range.1, self.delta)
        } else {
            value
        }
    }
}

impl Default for EdgePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            delta: Self::DEFAULT_DELTA,
        }
    }
}

impl From<&EngineConfig> for EdgePolicy {
    fn from(config: &EngineConfig) -> Self {
        Self {
            enabled: config.nudge_edges,
            delta: config.edge_delta,
        }
    }
}

// ============================================================================
// Banding and formatting
// ============================================================================

/// Three-way split of a 0..100 score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Low,
    Mid,
    High,
}

impl Band {
    pub fn from_score(score: f64) -> Self {
        if score < 30.0 {
            Band::Low
        } else if score < 70.0 {
            Band::Mid
        } else {
            Band::High
        }
    }
}

/// Category label and canned message for one band
#[derive(Debug, Clone, Copy)]
pub struct BandText {
    pub category: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct BandTable {
    pub low: BandText,
    pub mid: BandText,
    pub high: BandText,
}

impl BandTable {
    pub fn lookup(&self, band: Band) -> &BandText {
        match band {
            Band::Low => &self.low,
            Band::Mid => &self.mid,
            Band::High => &self.high,
        }
    }
}

/// Label a value against two ascending cut points
pub fn classify(value: f64, cuts: (f64, f64), labels: [&'static str; 3]) -> &'static str {
    if value < cuts.0 {
        labels[0]
    } else if value < cuts.1 {
        labels[1]
    } else {
        labels[2]
    }
}

/// Round to two decimals.
///
/// Ties go to even on the scaled value `value * 100`. That matches a
/// correctly rounded decimal `round(x, 2)` for exact binary halves such as
/// `0.125`, but the scaling step itself can round, so a value a hair off a
/// decimal half may land on the other side.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Nearest integer, ties to even
pub fn round_whole(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Render a score the way the result strings always have: `90.0`, `87.25`
pub fn format_score(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// A crisp input as it was fed to the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub value: f64,
    pub interpretation: &'static str,
}

// ============================================================================
// Payload extraction
// ============================================================================

/// The JSON object of a scenario request
#[derive(Debug, Clone, Copy)]
pub struct Payload<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> Payload<'a> {
    /// Anything other than a non-empty object counts as "no data"
    pub fn new(value: &'a Value) -> FuzzyResult<Self> {
        match value {
            Value::Object(fields) if !fields.is_empty() => Ok(Self { fields }),
            _ => Err(FuzzyError::no_data()),
        }
    }

    fn present(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    /// Fail with `message` unless every field is present and non-null
    pub fn require(&self, fields: &[&str], message: &str) -> FuzzyResult<()> {
        let missing: Vec<&str> = fields
            .iter()
            .copied()
            .filter(|f| self.present(f).is_none())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(FuzzyError::missing_required(message).with_context("missing", missing.join(", ")))
        }
    }

    /// A required numeric field
    pub fn number(&self, field: &str) -> FuzzyResult<f64> {
        self.present(field)
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite())
            .ok_or_else(|| FuzzyError::invalid_value(field))
    }

    /// An optional string field
    pub fn text(&self, field: &str) -> Option<&'a str> {
        self.present(field).and_then(Value::as_str)
    }
}

/// Reject a value outside the closed `range`
pub fn check_range(field: &str, value: f64, range: (f64, f64), message: &str) -> FuzzyResult<f64> {
    if range.0 <= value && value <= range.1 {
        Ok(value)
    } else {
        Err(FuzzyError::out_of_range(message)
            .with_context("field", field)
            .with_context("value", value.to_string()))
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Validate, nudge and evaluate a payload for `domain`, returning its report
pub fn analyse(domain: Domain, payload: &Value, edges: &EdgePolicy) -> FuzzyResult<Value> {
    let payload = Payload::new(payload)?;
    let report = match domain {
        Domain::Comfort => serde_json::to_value(comfort::analyse(&payload, edges)?),
        Domain::AirQuality => serde_json::to_value(air_quality::analyse(&payload, edges)?),
        Domain::LightComfort => serde_json::to_value(light::analyse(&payload, edges)?),
        Domain::PlantCare => serde_json::to_value(plant_care::analyse(&payload, edges)?),
    };
    report.map_err(|e| fuzzy_error!(ErrorCode::InternalError, "Failed to serialise {} report: {}", domain, e))
}

/// The engine inputs a payload produces, after validation and nudging
pub fn engine_inputs(domain: Domain, payload: &Value, edges: &EdgePolicy) -> FuzzyResult<HashMap<String, f64>> {
    let payload = Payload::new(payload)?;
    let inputs = match domain {
        Domain::Comfort => comfort::ComfortInput::from_payload(&payload)?.nudged(edges).engine_inputs(),
        Domain::AirQuality => air_quality::AirQualityInput::from_payload(&payload)?.nudged(edges).engine_inputs(),
        Domain::LightComfort => light::LightInput::from_payload(&payload)?.nudged(edges).engine_inputs(),
        Domain::PlantCare => plant_care::PlantCareInput::from_payload(&payload)?.nudged(edges).engine_inputs(),
    };
    Ok(inputs)
}

/// Per-term rule activations for a payload
pub fn explain(
    domain: Domain,
    payload: &Value,
    edges: &EdgePolicy,
) -> FuzzyResult<IndexMap<String, IndexMap<String, f64>>> {
    let inputs = engine_inputs(domain, payload, edges)?;
    let profile = get_profile(domain)?;
    Ok(profile.activations(&inputs)?)
}
