//! Room comfort from temperature and relative humidity

use crate::engine::{is, trimf, DefinitionError, DomainProfile, LinguisticVariable, Rule, Universe};

pub const TEMPERATURE: &str = "temperature";
pub const HUMIDITY: &str = "humidity";
pub const COMFORT: &str = "comfort";

/// Degrees Celsius
pub const TEMPERATURE_RANGE: (f64, f64) = (0.0, 50.0);
/// Percent relative humidity
pub const HUMIDITY_RANGE: (f64, f64) = (0.0, 100.0);
pub const COMFORT_RANGE: (f64, f64) = (0.0, 100.0);

pub fn build() -> Result<DomainProfile, DefinitionError> {
    let temperature = LinguisticVariable::new(TEMPERATURE, Universe::new(TEMPERATURE_RANGE.0, TEMPERATURE_RANGE.1)?)
        .with_term("cold", trimf(0.0, 0.0, 15.0)?)
        .with_term("moderate", trimf(15.0, 23.0, 30.0)?)
        .with_term("hot", trimf(28.0, 50.0, 50.0)?);

    let humidity = LinguisticVariable::new(HUMIDITY, Universe::new(HUMIDITY_RANGE.0, HUMIDITY_RANGE.1)?)
        .with_term("dry", trimf(0.0, 0.0, 30.0)?)
        .with_term("normal", trimf(30.0, 50.0, 70.0)?)
        .with_term("humid", trimf(65.0, 100.0, 100.0)?);

    let comfort = LinguisticVariable::new(COMFORT, Universe::new(COMFORT_RANGE.0, COMFORT_RANGE.1)?)
        .with_term("uncomfortable", trimf(0.0, 0.0, 30.0)?)
        .with_term("acceptable", trimf(25.0, 50.0, 75.0)?)
        .with_term("comfortable", trimf(70.0, 100.0, 100.0)?);

    let table = [
        ("cold", "humid", "uncomfortable"),
        ("cold", "normal", "acceptable"),
        ("cold", "dry", "uncomfortable"),
        ("moderate", "dry", "acceptable"),
        ("moderate", "normal", "comfortable"),
        ("moderate", "humid", "acceptable"),
        ("hot", "dry", "uncomfortable"),
        ("hot", "normal", "uncomfortable"),
        ("hot", "humid", "uncomfortable"),
    ];
    let rules = table.iter().map(|(t, h, c)| {
        Rule::when(is(TEMPERATURE, *t).and(is(HUMIDITY, *h)))
            .then(COMFORT, *c)
            .with_label(format!("{}-{}", t, h))
    });

    DomainProfile::builder("comfort")
        .input(temperature)
        .input(humidity)
        .output(comfort)
        .rules(rules)
        .build()
}
