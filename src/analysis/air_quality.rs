//! Air quality report

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use super::{check_range, classify, format_score, round2, Band, BandTable, BandText, EdgePolicy, Payload, Reading};
use crate::domains::air_quality::{AIR_QUALITY, CO2, CO2_RANGE, PM25, PM25_RANGE};
use crate::domains::{get_profile, Domain};
use crate::engine::InferenceSession;
use crate::error::{FuzzyError, FuzzyResult};

pub const BANDS: BandTable = BandTable {
    low: BandText {
        category: "Unhealthy",
        message: "The air quality is poor. Consider ventilation or air purification.",
    },
    mid: BandText {
        category: "Moderate",
        message: "The air quality is acceptable, but could be improved.",
    },
    high: BandText {
        category: "Healthy",
        message: "The air quality is good. Enjoy the clean air!",
    },
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AirQualityInput {
    pub co2: f64,
    pub pm25: f64,
}

impl AirQualityInput {
    pub fn from_payload(payload: &Payload<'_>) -> FuzzyResult<Self> {
        payload.require(&[CO2, PM25], "CO2 and PM2.5 values are required")?;
        let co2 = payload.number(CO2)?;
        let pm25 = payload.number(PM25)?;

        Ok(Self {
            co2: check_range(CO2, co2, CO2_RANGE, "CO2 must be between 300 and 2000 ppm")?,
            pm25: check_range(PM25, pm25, PM25_RANGE, "PM2.5 must be between 0 and 100 μg/m³")?,
        })
    }

    pub fn nudged(&self, edges: &EdgePolicy) -> Self {
        Self {
            co2: edges.apply(self.co2, CO2_RANGE),
            pm25: edges.apply(self.pm25, PM25_RANGE),
        }
    }

    pub fn engine_inputs(&self) -> HashMap<String, f64> {
        HashMap::from([(CO2.to_string(), self.co2), (PM25.to_string(), self.pm25)])
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AirQualityAnalysis {
    pub co2: Reading,
    pub pm25: Reading,
}

#[derive(Debug, Clone, Serialize)]
pub struct AirQualityReport {
    pub air_quality_level: f64,
    pub air_quality_category: &'static str,
    pub message: &'static str,
    pub analysis: AirQualityAnalysis,
    pub result: String,
}

pub fn analyse(payload: &Payload<'_>, edges: &EdgePolicy) -> FuzzyResult<AirQualityReport> {
    let raw = AirQualityInput::from_payload(payload)?;
    let profile = get_profile(Domain::AirQuality)?;
    let input = raw.nudged(edges);

    let mut session = InferenceSession::new(profile);
    session.set_input(CO2, input.co2)?;
    session.set_input(PM25, input.pm25)?;
    session.compute().map_err(|e| {
        FuzzyError::from(e)
            .with_context("co2", input.co2.to_string())
            .with_context("pm25", input.pm25.to_string())
    })?;
    let level = session
        .output(AIR_QUALITY)
        .ok_or_else(|| FuzzyError::internal("Air quality output missing after computation"))?;
    debug!(co2 = input.co2, pm25 = input.pm25, level, "air quality computed");

    let text = BANDS.lookup(Band::from_score(level));
    let rounded = round2(level);

    Ok(AirQualityReport {
        air_quality_level: rounded,
        air_quality_category: text.category,
        message: text.message,
        analysis: AirQualityAnalysis {
            co2: Reading {
                value: input.co2,
                interpretation: classify(input.co2, (800.0, 1400.0), ["good", "moderate", "poor"]),
            },
            pm25: Reading {
                value: input.pm25,
                interpretation: classify(input.pm25, (25.0, 55.0), ["low", "medium", "high"]),
            },
        },
        result: format!(
            "Air Quality Level: {}/100 ({}). {}",
            format_score(rounded),
            text.category,
            text.message
        ),
    })
}
