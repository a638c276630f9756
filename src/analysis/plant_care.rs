//! Plant-care report: three engine outputs, rounded, then adjusted per plant type

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::plant_policy::{Adjustments, PlantType};
use super::{check_range, classify, round_whole, EdgePolicy, Payload};
use crate::domains::plant_care::{
    LIGHT_ADJUSTMENT, LIGHT_LEVEL, LIGHT_LEVEL_RANGE, SOIL_MOISTURE, SOIL_MOISTURE_RANGE, TEMPERATURE,
    TEMPERATURE_RANGE, TEMP_ADJUSTMENT, WATERING_FREQUENCY,
};
use crate::domains::{get_profile, Domain};
use crate::engine::InferenceSession;
use crate::error::{FuzzyError, FuzzyResult};

pub const PLANT_TYPE: &str = "plant_type";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlantCareInput {
    pub soil_moisture: f64,
    pub light_level: f64,
    pub temperature: f64,
    pub plant_type: PlantType,
}

impl PlantCareInput {
    pub fn from_payload(payload: &Payload<'_>) -> FuzzyResult<Self> {
        payload.require(
            &[SOIL_MOISTURE, LIGHT_LEVEL, TEMPERATURE],
            "Soil moisture, light level, and temperature values are required",
        )?;
        let soil_moisture = payload.number(SOIL_MOISTURE)?;
        let light_level = payload.number(LIGHT_LEVEL)?;
        let temperature = payload.number(TEMPERATURE)?;
        let plant_type = payload.text(PLANT_TYPE).map(PlantType::parse).unwrap_or_default();

        Ok(Self {
            soil_moisture: check_range(
                SOIL_MOISTURE,
                soil_moisture,
                SOIL_MOISTURE_RANGE,
                "Soil moisture must be between 0 and 100%",
            )?,
            light_level: check_range(
                LIGHT_LEVEL,
                light_level,
                LIGHT_LEVEL_RANGE,
                "Light level must be between 0 and 100%",
            )?,
            temperature: check_range(
                TEMPERATURE,
                temperature,
                TEMPERATURE_RANGE,
                "Temperature must be between 0 and 40°C",
            )?,
            plant_type,
        })
    }

    pub fn nudged(&self, edges: &EdgePolicy) -> Self {
        Self {
            soil_moisture: edges.apply(self.soil_moisture, SOIL_MOISTURE_RANGE),
            light_level: edges.apply(self.light_level, LIGHT_LEVEL_RANGE),
            temperature: edges.apply(self.temperature, TEMPERATURE_RANGE),
            plant_type: self.plant_type,
        }
    }

    pub fn engine_inputs(&self) -> HashMap<String, f64> {
        HashMap::from([
            (SOIL_MOISTURE.to_string(), self.soil_moisture),
            (LIGHT_LEVEL.to_string(), self.light_level),
            (TEMPERATURE.to_string(), self.temperature),
        ])
    }
}

// ============================================================================
// Report
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Recommendations {
    pub watering: String,
    pub light: &'static str,
    pub temperature: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Condition {
    pub value: f64,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentConditions {
    pub soil_moisture: Condition,
    pub light_level: Condition,
    pub temperature: Condition,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct NumericalOutputs {
    pub watering_frequency_days: i64,
    pub light_adjustment: i64,
    pub temperature_adjustment: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlantCareReport {
    pub recommendations: Recommendations,
    pub current_conditions: CurrentConditions,
    pub numerical_outputs: NumericalOutputs,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plant_specific_advice: Option<&'static str>,
    pub result: String,
}

fn watering_text(days: i64) -> String {
    if days <= 2 {
        "Water your plant daily or every other day. The soil is quite dry.".to_string()
    } else if days <= 5 {
        format!("Water your plant every {} days. Monitor soil moisture regularly.", days)
    } else {
        format!("Water your plant every {} days. Be careful not to overwater.", days)
    }
}

fn light_text(score: i64) -> &'static str {
    if score >= 70 {
        "Increase light exposure significantly. Move to a sunnier location."
    } else if score > 55 {
        "Slightly increase light exposure. Consider moving closer to a window."
    } else if score < 30 {
        "Decrease light exposure significantly. Move to a shadier location or add a curtain."
    } else {
        "Maintain current light conditions."
    }
}

fn temperature_text(score: i64) -> &'static str {
    if score >= 70 {
        "Increase temperature significantly. Consider moving to a warmer spot or using heating."
    } else if score > 55 {
        "Slightly increase temperature. Move away from cold drafts."
    } else if score < 30 {
        "Decrease temperature significantly. Move to a cooler location."
    } else {
        "Maintain current temperature."
    }
}

/// One-line summary; the trailing space is part of the wire format
fn summary(adjusted: &Adjustments) -> String {
    format!("Plant Care Recommendations: Water every {} days. ", adjusted.watering)
}

pub fn analyse(payload: &Payload<'_>, edges: &EdgePolicy) -> FuzzyResult<PlantCareReport> {
    let raw = PlantCareInput::from_payload(payload)?;
    let profile = get_profile(Domain::PlantCare)?;
    let input = raw.nudged(edges);

    let mut session = InferenceSession::new(profile);
    session.set_input(SOIL_MOISTURE, input.soil_moisture)?;
    session.set_input(LIGHT_LEVEL, input.light_level)?;
    session.set_input(TEMPERATURE, input.temperature)?;
    session.compute().map_err(|e| {
        FuzzyError::from(e)
            .with_context("soil_moisture", input.soil_moisture.to_string())
            .with_context("light_level", input.light_level.to_string())
            .with_context("temperature", input.temperature.to_string())
            .with_context("plant_type", input.plant_type.as_str())
    })?;

    let output = |name: &str| {
        session
            .output(name)
            .ok_or_else(|| FuzzyError::internal(format!("Plant care output '{}' missing after computation", name)))
    };
    let rounded = Adjustments {
        watering: round_whole(output(WATERING_FREQUENCY)?),
        light: round_whole(output(LIGHT_ADJUSTMENT)?),
        temperature: round_whole(output(TEMP_ADJUSTMENT)?),
    };

    let policy = input.plant_type.policy();
    let adjusted = policy.apply(rounded, input.light_level, input.temperature);
    debug!(
        plant_type = %input.plant_type,
        raw = ?rounded,
        adjusted = ?adjusted,
        "plant care computed"
    );

    Ok(PlantCareReport {
        recommendations: Recommendations {
            watering: watering_text(adjusted.watering),
            light: light_text(adjusted.light),
            temperature: temperature_text(adjusted.temperature),
        },
        current_conditions: CurrentConditions {
            soil_moisture: Condition {
                value: input.soil_moisture,
                status: classify(input.soil_moisture, (30.0, 70.0), ["Dry", "Moist", "Wet"]),
            },
            light_level: Condition {
                value: input.light_level,
                status: classify(input.light_level, (30.0, 70.0), ["Low", "Medium", "High"]),
            },
            temperature: Condition {
                value: input.temperature,
                status: classify(input.temperature, (15.0, 28.0), ["Cold", "Moderate", "Hot"]),
            },
        },
        numerical_outputs: NumericalOutputs {
            watering_frequency_days: adjusted.watering,
            light_adjustment: adjusted.light,
            temperature_adjustment: adjusted.temperature,
        },
        plant_specific_advice: policy.advice,
        result: summary(&adjusted),
    })
}
