//! Light comfort report

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::{check_range, classify, format_score, round2, Band, BandTable, BandText, EdgePolicy, Payload, Reading};
use crate::domains::light::{COLOUR_TEMP, COLOUR_TEMP_RANGE, INTENSITY, INTENSITY_RANGE, LIGHT_COMFORT};
use crate::domains::{get_profile, Domain};
use crate::engine::InferenceSession;
use crate::error::{FuzzyError, FuzzyResult};

pub const BANDS: BandTable = BandTable {
    low: BandText {
        category: "Uncomfortable",
        message: "The lighting conditions are uncomfortable. Consider adjusting intensity or colour temperature.",
    },
    mid: BandText {
        category: "Acceptable",
        message: "The lighting conditions are acceptable, but could be improved for optimal comfort.",
    },
    high: BandText {
        category: "Comfortable",
        message: "The lighting conditions are comfortable. Enjoy the pleasant lighting!",
    },
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightInput {
    pub intensity: f64,
    pub colour_temp: f64,
}

impl LightInput {
    pub fn from_payload(payload: &Payload<'_>) -> FuzzyResult<Self> {
        payload.require(
            &[INTENSITY, COLOUR_TEMP],
            "Light intensity and colour temperature values are required",
        )?;
        let intensity = payload.number(INTENSITY)?;
        let colour_temp = payload.number(COLOUR_TEMP)?;

        Ok(Self {
            intensity: check_range(
                INTENSITY,
                intensity,
                INTENSITY_RANGE,
                "Light intensity must be between 0 and 1000 lux",
            )?,
            colour_temp: check_range(
                COLOUR_TEMP,
                colour_temp,
                COLOUR_TEMP_RANGE,
                "Colour temperature must be between 2000 and 6500 Kelvin",
            )?,
        })
    }

    pub fn nudged(&self, edges: &EdgePolicy) -> Self {
        Self {
            intensity: edges.apply(self.intensity, INTENSITY_RANGE),
            colour_temp: edges.apply(self.colour_temp, COLOUR_TEMP_RANGE),
        }
    }

    pub fn engine_inputs(&self) -> HashMap<String, f64> {
        HashMap::from([
            (INTENSITY.to_string(), self.intensity),
            (COLOUR_TEMP.to_string(), self.colour_temp),
        ])
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LightAnalysis {
    pub intensity: Reading,
    pub colour_temp: Reading,
}

#[derive(Debug, Clone, Serialize)]
pub struct LightReport {
    pub light_comfort_level: f64,
    pub light_comfort_category: &'static str,
    pub message: &'static str,
    pub analysis: LightAnalysis,
    pub result: String,
}

pub fn analyse(payload: &Payload<'_>, edges: &EdgePolicy) -> FuzzyResult<LightReport> {
    let raw = LightInput::from_payload(payload)?;
    let profile = get_profile(Domain::LightComfort)?;
    let input = raw.nudged(edges);

    let mut session = InferenceSession::new(profile);
    session.set_input(INTENSITY, input.intensity)?;
    session.set_input(COLOUR_TEMP, input.colour_temp)?;
    session.compute().map_err(|e| {
        FuzzyError::from(e)
            .with_context("intensity", input.intensity.to_string())
            .with_context("colour_temp", input.colour_temp.to_string())
    })?;
    let level = session
        .output(LIGHT_COMFORT)
        .ok_or_else(|| FuzzyError::internal("Light comfort output missing after computation"))?;
    debug!(intensity = input.intensity, colour_temp = input.colour_temp, level, "light comfort computed");

    let text = BANDS.lookup(Band::from_score(level));
    let rounded = round2(level);

    Ok(LightReport {
        light_comfort_level: rounded,
        light_comfort_category: text.category,
        message: text.message,
        analysis: LightAnalysis {
            intensity: Reading {
                value: input.intensity,
                interpretation: classify(input.intensity, (300.0, 800.0), ["dim", "moderate", "bright"]),
            },
            colour_temp: Reading {
                value: input.colour_temp,
                interpretation: classify(input.colour_temp, (3500.0, 5000.0), ["warm", "neutral", "cool"]),
            },
        },
        result: format!(
            "Light Comfort Level: {}/100 ({}). {}",
            format_score(rounded),
            text.category,
            text.message
        ),
    })
}
