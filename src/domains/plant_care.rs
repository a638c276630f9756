//! Houseplant care from soil moisture, light level and air temperature.
//!
//! Three outputs: watering interval in days, and light/temperature adjustment
//! scores where 0 means "decrease significantly" and 100 "increase
//! significantly".

use crate::engine::{is, trimf, DefinitionError, DomainProfile, LinguisticVariable, Rule, Universe};

pub const SOIL_MOISTURE: &str = "soil_moisture";
pub const LIGHT_LEVEL: &str = "light_level";
pub const TEMPERATURE: &str = "temperature";

pub const WATERING_FREQUENCY: &str = "watering_frequency";
pub const LIGHT_ADJUSTMENT: &str = "light_adjustment";
pub const TEMP_ADJUSTMENT: &str = "temp_adjustment";

/// Percent
pub const SOIL_MOISTURE_RANGE: (f64, f64) = (0.0, 100.0);
/// Percent of full sun
pub const LIGHT_LEVEL_RANGE: (f64, f64) = (0.0, 100.0);
/// Degrees Celsius
pub const TEMPERATURE_RANGE: (f64, f64) = (0.0, 40.0);
/// Days between waterings
pub const WATERING_RANGE: (f64, f64) = (0.0, 10.0);
pub const ADJUSTMENT_RANGE: (f64, f64) = (0.0, 100.0);

fn adjustment(name: &str) -> Result<LinguisticVariable, DefinitionError> {
    Ok(
        LinguisticVariable::new(name, Universe::new(ADJUSTMENT_RANGE.0, ADJUSTMENT_RANGE.1)?)
            .with_term("decrease", trimf(0.0, 0.0, 30.0)?)
            .with_term("maintain", trimf(25.0, 50.0, 75.0)?)
            .with_term("increase", trimf(70.0, 100.0, 100.0)?),
    )
}

pub fn build() -> Result<DomainProfile, DefinitionError> {
    let soil = LinguisticVariable::new(SOIL_MOISTURE, Universe::new(SOIL_MOISTURE_RANGE.0, SOIL_MOISTURE_RANGE.1)?)
        .with_term("dry", trimf(0.0, 0.0, 40.0)?)
        .with_term("moist", trimf(0.0, 50.0, 100.0)?)
        .with_term("wet", trimf(60.0, 100.0, 100.0)?);

    let light = LinguisticVariable::new(LIGHT_LEVEL, Universe::new(LIGHT_LEVEL_RANGE.0, LIGHT_LEVEL_RANGE.1)?)
        .with_term("dark", trimf(0.0, 0.0, 30.0)?)
        .with_term("medium", trimf(0.0, 50.0, 100.0)?)
        .with_term("bright", trimf(70.0, 100.0, 100.0)?);

    let temperature = LinguisticVariable::new(TEMPERATURE, Universe::new(TEMPERATURE_RANGE.0, TEMPERATURE_RANGE.1)?)
        .with_term("cold", trimf(0.0, 0.0, 15.0)?)
        .with_term("moderate", trimf(0.0, 20.0, 40.0)?)
        .with_term("hot", trimf(25.0, 40.0, 40.0)?);

    let watering = LinguisticVariable::new(WATERING_FREQUENCY, Universe::new(WATERING_RANGE.0, WATERING_RANGE.1)?)
        .with_term("frequent", trimf(0.0, 0.0, 4.0)?)
        .with_term("moderate", trimf(2.0, 5.0, 8.0)?)
        .with_term("infrequent", trimf(6.0, 10.0, 10.0)?);

    let harsh = || is(LIGHT_LEVEL, "bright").or(is(TEMPERATURE, "hot"));
    let mild = || is(LIGHT_LEVEL, "medium").and(is(TEMPERATURE, "moderate"));
    let gloomy = || is(LIGHT_LEVEL, "dark").and(is(TEMPERATURE, "cold"));

    let rules = vec![
        // watering
        Rule::when(is(SOIL_MOISTURE, "dry").and(harsh()))
            .then(WATERING_FREQUENCY, "frequent")
            .with_label("dry-harsh"),
        Rule::when(is(SOIL_MOISTURE, "dry").and(mild()))
            .then(WATERING_FREQUENCY, "frequent")
            .with_label("dry-mild"),
        Rule::when(is(SOIL_MOISTURE, "dry").and(gloomy()))
            .then(WATERING_FREQUENCY, "moderate")
            .with_label("dry-gloomy"),
        Rule::when(is(SOIL_MOISTURE, "moist").and(harsh()))
            .then(WATERING_FREQUENCY, "moderate")
            .with_label("moist-harsh"),
        Rule::when(is(SOIL_MOISTURE, "moist").and(mild()))
            .then(WATERING_FREQUENCY, "moderate")
            .with_label("moist-mild"),
        Rule::when(is(SOIL_MOISTURE, "moist").and(gloomy()))
            .then(WATERING_FREQUENCY, "infrequent")
            .with_label("moist-gloomy"),
        Rule::when(is(SOIL_MOISTURE, "wet"))
            .then(WATERING_FREQUENCY, "infrequent")
            .with_label("wet"),
        // light
        Rule::when(is(LIGHT_LEVEL, "dark")).then(LIGHT_ADJUSTMENT, "increase").with_label("dark"),
        Rule::when(is(LIGHT_LEVEL, "medium")).then(LIGHT_ADJUSTMENT, "maintain").with_label("medium-light"),
        Rule::when(is(LIGHT_LEVEL, "bright")).then(LIGHT_ADJUSTMENT, "decrease").with_label("bright"),
        // temperature
        Rule::when(is(TEMPERATURE, "cold")).then(TEMP_ADJUSTMENT, "increase").with_label("cold"),
        Rule::when(is(TEMPERATURE, "moderate")).then(TEMP_ADJUSTMENT, "maintain").with_label("moderate-temp"),
        Rule::when(is(TEMPERATURE, "hot")).then(TEMP_ADJUSTMENT, "decrease").with_label("hot"),
    ];

    DomainProfile::builder("plant-care")
        .input(soil)
        .input(light)
        .input(temperature)
        .output(watering)
        .output(adjustment(LIGHT_ADJUSTMENT)?)
        .output(adjustment(TEMP_ADJUSTMENT)?)
        .rules(rules)
        .build()
}
