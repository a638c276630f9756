//! Comfort report

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::{check_range, classify, format_score, round2, Band, BandTable, BandText, EdgePolicy, Payload, Reading};
use crate::domains::comfort::{COMFORT, HUMIDITY, HUMIDITY_RANGE, TEMPERATURE, TEMPERATURE_RANGE};
use crate::domains::{get_profile, Domain};
use crate::engine::InferenceSession;
use crate::error::{FuzzyError, FuzzyResult};

pub const BANDS: BandTable = BandTable {
    low: BandText {
        category: "Uncomfortable",
        message: "The current conditions are uncomfortable. You might want to adjust the temperature or humidity.",
    },
    mid: BandText {
        category: "Acceptable",
        message: "The current conditions are acceptable, but not optimal.",
    },
    high: BandText {
        category: "Comfortable",
        message: "The current conditions are comfortable. Enjoy!",
    },
};

pub const EXTREME_WARNING: &str =
    "Extreme temperature or humidity detected. Comfort reading may not reflect safety conditions.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComfortInput {
    pub temperature: f64,
    pub humidity: f64,
}

impl ComfortInput {
    pub fn from_payload(payload: &Payload<'_>) -> FuzzyResult<Self> {
        payload.require(&[TEMPERATURE, HUMIDITY], "Temperature and humidity values are required")?;
        let temperature = payload.number(TEMPERATURE)?;
        let humidity = payload.number(HUMIDITY)?;

        Ok(Self {
            temperature: check_range(
                TEMPERATURE,
                temperature,
                TEMPERATURE_RANGE,
                "Temperature must be between 0 and 50°C",
            )?,
            humidity: check_range(HUMIDITY, humidity, HUMIDITY_RANGE, "Humidity must be between 0 and 100%")?,
        })
    }

    pub fn nudged(&self, edges: &EdgePolicy) -> Self {
        Self {
            temperature: edges.apply(self.temperature, TEMPERATURE_RANGE),
            humidity: edges.apply(self.humidity, HUMIDITY_RANGE),
        }
    }

    pub fn engine_inputs(&self) -> HashMap<String, f64> {
        HashMap::from([
            (TEMPERATURE.to_string(), self.temperature),
            (HUMIDITY.to_string(), self.humidity),
        ])
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComfortAnalysis {
    pub temperature: Reading,
    pub humidity: Reading,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComfortReport {
    pub comfort_level: f64,
    pub comfort_category: &'static str,
    pub message: &'static str,
    pub analysis: ComfortAnalysis,
    pub warning: Option<&'static str>,
    pub result: String,
}

pub fn analyse(payload: &Payload<'_>, edges: &EdgePolicy) -> FuzzyResult<ComfortReport> {
    let raw = ComfortInput::from_payload(payload)?;
    let profile = get_profile(Domain::Comfort)?;
    let input = raw.nudged(edges);

    let mut session = InferenceSession::new(profile);
    session.set_input(TEMPERATURE, input.temperature)?;
    session.set_input(HUMIDITY, input.humidity)?;
    session.compute().map_err(|e| {
        FuzzyError::from(e)
            .with_context("temperature", input.temperature.to_string())
            .with_context("humidity", input.humidity.to_string())
    })?;
    let level = session
        .output(COMFORT)
        .ok_or_else(|| FuzzyError::internal("Comfort output missing after computation"))?;
    debug!(temperature = input.temperature, humidity = input.humidity, level, "comfort computed");

    let text = BANDS.lookup(Band::from_score(level));
    let warning = (input.temperature > 45.0 || input.humidity < 10.0).then_some(EXTREME_WARNING);
    let rounded = round2(level);

    Ok(ComfortReport {
        comfort_level: rounded,
        comfort_category: text.category,
        message: text.message,
        analysis: ComfortAnalysis {
            temperature: Reading {
                value: input.temperature,
                interpretation: classify(input.temperature, (15.0, 30.0), ["cold", "moderate", "hot"]),
            },
            humidity: Reading {
                value: input.humidity,
                interpretation: classify(input.humidity, (30.0, 70.0), ["dry", "normal", "humid"]),
            },
        },
        warning,
        result: format!(
            "Comfort Level: {}/100 ({}). {}",
            format_score(rounded),
            text.category,
            text.message
        ),
    })
}
