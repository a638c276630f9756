//! Indoor air quality from CO2 concentration and fine particulates

use crate::engine::{is, trimf, DefinitionError, DomainProfile, LinguisticVariable, Rule, Universe};

pub const CO2: &str = "co2";
pub const PM25: &str = "pm25";
pub const AIR_QUALITY: &str = "air_quality";

/// ppm
pub const CO2_RANGE: (f64, f64) = (300.0, 2000.0);
/// μg/m³
pub const PM25_RANGE: (f64, f64) = (0.0, 100.0);
pub const AIR_QUALITY_RANGE: (f64, f64) = (0.0, 100.0);

pub fn build() -> Result<DomainProfile, DefinitionError> {
    let co2 = LinguisticVariable::new(CO2, Universe::new(CO2_RANGE.0, CO2_RANGE.1)?)
        .with_term("good", trimf(300.0, 300.0, 800.0)?)
        .with_term("moderate", trimf(600.0, 1000.0, 1400.0)?)
        .with_term("poor", trimf(1200.0, 2000.0, 2000.0)?);

    let pm25 = LinguisticVariable::new(PM25, Universe::new(PM25_RANGE.0, PM25_RANGE.1)?)
        .with_term("low", trimf(0.0, 0.0, 25.0)?)
        .with_term("medium", trimf(15.0, 35.0, 55.0)?)
        .with_term("high", trimf(45.0, 100.0, 100.0)?);

    let quality = LinguisticVariable::new(AIR_QUALITY, Universe::new(AIR_QUALITY_RANGE.0, AIR_QUALITY_RANGE.1)?)
        .with_term("unhealthy", trimf(0.0, 0.0, 40.0)?)
        .with_term("moderate", trimf(20.0, 50.0, 80.0)?)
        .with_term("healthy", trimf(60.0, 100.0, 100.0)?);

    let table = [
        ("good", "low", "healthy"),
        ("good", "medium", "moderate"),
        ("good", "high", "unhealthy"),
        ("moderate", "low", "moderate"),
        ("moderate", "medium", "moderate"),
        ("moderate", "high", "unhealthy"),
        ("poor", "low", "moderate"),
        ("poor", "medium", "unhealthy"),
        ("poor", "high", "unhealthy"),
    ];
    let rules = table.iter().map(|(c, p, q)| {
        Rule::when(is(CO2, *c).and(is(PM25, *p)))
            .then(AIR_QUALITY, *q)
            .with_label(format!("co2-{}-pm25-{}", c, p))
    });

    DomainProfile::builder("air-quality")
        .input(co2)
        .input(pm25)
        .output(quality)
        .rules(rules)
        .build()
}
