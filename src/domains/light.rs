//! Light comfort from illuminance and colour temperature

use crate::engine::{is, trimf, DefinitionError, DomainProfile, LinguisticVariable, Rule, Universe};

pub const INTENSITY: &str = "intensity";
pub const COLOUR_TEMP: &str = "colour_temp";
pub const LIGHT_COMFORT: &str = "light_comfort";

/// lux
pub const INTENSITY_RANGE: (f64, f64) = (0.0, 1000.0);
/// Kelvin
pub const COLOUR_TEMP_RANGE: (f64, f64) = (2000.0, 6500.0);
pub const LIGHT_COMFORT_RANGE: (f64, f64) = (0.0, 100.0);

pub fn build() -> Result<DomainProfile, DefinitionError> {
    let intensity = LinguisticVariable::new(INTENSITY, Universe::new(INTENSITY_RANGE.0, INTENSITY_RANGE.1)?)
        .with_term("dim", trimf(0.0, 0.0, 300.0)?)
        .with_term("moderate", trimf(200.0, 500.0, 800.0)?)
        .with_term("bright", trimf(700.0, 1000.0, 1000.0)?);

    let colour_temp = LinguisticVariable::new(COLOUR_TEMP, Universe::new(COLOUR_TEMP_RANGE.0, COLOUR_TEMP_RANGE.1)?)
        .with_term("warm", trimf(2000.0, 2000.0, 3500.0)?)
        .with_term("neutral", trimf(3000.0, 4000.0, 5000.0)?)
        .with_term("cool", trimf(4500.0, 6500.0, 6500.0)?);

    let comfort = LinguisticVariable::new(LIGHT_COMFORT, Universe::new(LIGHT_COMFORT_RANGE.0, LIGHT_COMFORT_RANGE.1)?)
        .with_term("uncomfortable", trimf(0.0, 0.0, 40.0)?)
        .with_term("acceptable", trimf(20.0, 50.0, 80.0)?)
        .with_term("comfortable", trimf(60.0, 100.0, 100.0)?);

    let table = [
        ("dim", "warm", "acceptable"),
        ("dim", "neutral", "acceptable"),
        ("dim", "cool", "uncomfortable"),
        ("moderate", "warm", "comfortable"),
        ("moderate", "neutral", "comfortable"),
        ("moderate", "cool", "acceptable"),
        ("bright", "warm", "acceptable"),
        ("bright", "neutral", "acceptable"),
        ("bright", "cool", "uncomfortable"),
    ];
    let rules = table.iter().map(|(i, k, c)| {
        Rule::when(is(INTENSITY, *i).and(is(COLOUR_TEMP, *k)))
            .then(LIGHT_COMFORT, *c)
            .with_label(format!("{}-{}", i, k))
    });

    DomainProfile::builder("light-comfort")
        .input(intensity)
        .input(colour_temp)
        .output(comfort)
        .rules(rules)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn comfort_at(intensity: f64, colour_temp: f64) -> f64 {
        let profile = build().unwrap();
        let inputs = HashMap::from([
            (INTENSITY.to_string(), intensity),
            (COLOUR_TEMP.to_string(), colour_temp),
        ]);
        profile.evaluate(&inputs).unwrap()[LIGHT_COMFORT]
    }

    #[test]
    fn test_moderate_neutral_is_comfortable() {
        let score = comfort_at(500.0, 4000.0);
        assert!((score - 87.0).abs() < 1e-6, "score {}", score);
    }

    #[test]
    fn test_dim_cool_is_uncomfortable() {
        let score = comfort_at(0.01, 6499.99);
        assert!(score < 30.0, "score {}", score);
    }

    #[test]
    fn test_bright_warm_is_acceptable() {
        let score = comfort_at(999.99, 2000.01);
        assert!((30.0..70.0).contains(&score), "score {}", score);
    }
}
