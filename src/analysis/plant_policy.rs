//! Plant-type overrides applied after plant-care inference
//!
//! Each plant type maps to a fixed [`PlantPolicy`] record. The policy works on
//! the rounded engine outputs and compares its triggers against the (nudged)
//! sensor readings.

use std::fmt;

use serde::Serialize;

/// Closed set of plant types; anything unrecognised is `General`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantType {
    Succulent,
    Cactus,
    Fern,
    Orchid,
    #[default]
    General,
}

impl PlantType {
    /// Case-insensitive, whitespace-trimmed; unknown names fall back to `General`
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "succulent" => PlantType::Succulent,
            "cactus" => PlantType::Cactus,
            "fern" => PlantType::Fern,
            "orchid" => PlantType::Orchid,
            _ => PlantType::General,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlantType::Succulent => "succulent",
            PlantType::Cactus => "cactus",
            PlantType::Fern => "fern",
            PlantType::Orchid => "orchid",
            PlantType::General => "general",
        }
    }

    pub fn policy(&self) -> &'static PlantPolicy {
        match self {
            PlantType::Succulent => &SUCCULENT,
            PlantType::Cactus => &CACTUS,
            PlantType::Fern => &FERN,
            PlantType::Orchid => &ORCHID,
            PlantType::General => &GENERAL,
        }
    }
}

impl fmt::Display for PlantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Policy records
// ============================================================================

/// Sensor condition that arms an override
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Trigger {
    Always,
    Below(f64),
    Above(f64),
}

impl Trigger {
    fn holds(&self, reading: f64) -> bool {
        match *self {
            Trigger::Always => true,
            Trigger::Below(limit) => reading < limit,
            Trigger::Above(limit) => reading > limit,
        }
    }
}

/// Bound applied to an output score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clamp {
    /// `max(value, n)`
    AtLeast(i64),
    /// `min(value, n)`
    AtMost(i64),
}

impl Clamp {
    fn apply(&self, value: i64) -> i64 {
        match *self {
            Clamp::AtLeast(n) => value.max(n),
            Clamp::AtMost(n) => value.min(n),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Override {
    pub when: Trigger,
    pub clamp: Clamp,
}

/// `clamp(watering + offset)`, floor before ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WateringAdjust {
    pub offset: i64,
    pub floor: Option<i64>,
    pub ceiling: Option<i64>,
}

impl WateringAdjust {
    fn apply(&self, days: i64) -> i64 {
        let mut days = days + self.offset;
        if let Some(floor) = self.floor {
            days = days.max(floor);
        }
        if let Some(ceiling) = self.ceiling {
            days = days.min(ceiling);
        }
        days
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlantPolicy {
    pub watering: WateringAdjust,
    /// Applied in order, keyed on the light-level reading
    pub light: &'static [Override],
    /// Applied in order, keyed on the temperature reading
    pub temperature: &'static [Override],
    pub advice: Option<&'static str>,
}

/// Rounded plant-care outputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Adjustments {
    pub watering: i64,
    pub light: i64,
    pub temperature: i64,
}

impl PlantPolicy {
    pub fn apply(&self, raw: Adjustments, light_level: f64, temperature: f64) -> Adjustments {
        let overrides = |value: i64, rules: &[Override], reading: f64| {
            rules
                .iter()
                .filter(|o| o.when.holds(reading))
                .fold(value, |v, o| o.clamp.apply(v))
        };

        Adjustments {
            watering: self.watering.apply(raw.watering),
            light: overrides(raw.light, self.light, light_level),
            temperature: overrides(raw.temperature, self.temperature, temperature),
        }
    }
}

const UNCHANGED: WateringAdjust = WateringAdjust {
    offset: 0,
    floor: None,
    ceiling: None,
};

/// Shared by succulents and cacti
const ARID_WATERING: WateringAdjust = WateringAdjust {
    offset: 2,
    floor: None,
    ceiling: Some(10),
};
const ARID_LIGHT: &[Override] = &[Override {
    when: Trigger::Below(60.0),
    clamp: Clamp::AtLeast(70),
}];
const ARID_TEMPERATURE: &[Override] = &[
    Override {
        when: Trigger::Below(15.0),
        clamp: Clamp::AtLeast(70),
    },
    Override {
        when: Trigger::Always,
        clamp: Clamp::AtMost(60),
    },
];

static SUCCULENT: PlantPolicy = PlantPolicy {
    watering: ARID_WATERING,
    light: ARID_LIGHT,
    temperature: ARID_TEMPERATURE,
    advice: Some("Succulents prefer drier conditions and less frequent watering than most houseplants."),
};

static CACTUS: PlantPolicy = PlantPolicy {
    watering: ARID_WATERING,
    light: ARID_LIGHT,
    temperature: ARID_TEMPERATURE,
    advice: Some("Cacti prefer dry, warm conditions and need infrequent watering."),
};

static FERN: PlantPolicy = PlantPolicy {
    watering: WateringAdjust {
        offset: -2,
        floor: Some(1),
        ceiling: None,
    },
    light: &[Override {
        when: Trigger::Above(70.0),
        clamp: Clamp::AtMost(30),
    }],
    temperature: &[Override {
        when: Trigger::Below(18.0),
        clamp: Clamp::AtLeast(60),
    }],
    advice: Some("Ferns generally prefer higher humidity and regular watering. Consider misting regularly."),
};

static ORCHID: PlantPolicy = PlantPolicy {
    watering: WateringAdjust {
        offset: 0,
        floor: Some(5),
        ceiling: None,
    },
    light: &[Override {
        when: Trigger::Below(40.0),
        clamp: Clamp::AtLeast(70),
    }],
    temperature: &[Override {
        when: Trigger::Below(20.0),
        clamp: Clamp::AtLeast(60),
    }],
    advice: Some("Orchids require bright, indirect light and should be watered thoroughly but infrequently."),
};

static GENERAL: PlantPolicy = PlantPolicy {
    watering: UNCHANGED,
    light: &[],
    temperature: &[],
    advice: None,
};

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: Adjustments = Adjustments {
        watering: 3,
        light: 50,
        temperature: 50,
    };

    #[test]
    fn test_parse_plant_type() {
        assert_eq!(PlantType::parse("Cactus"), PlantType::Cactus);
        assert_eq!(PlantType::parse("  FERN "), PlantType::Fern);
        assert_eq!(PlantType::parse("bonsai"), PlantType::General);
        assert_eq!(PlantType::parse(""), PlantType::General);
    }

    #[test]
    fn test_general_is_identity() {
        let out = PlantType::General.policy().apply(RAW, 5.0, 5.0);
        assert_eq!(out, RAW);
        assert!(PlantType::General.policy().advice.is_none());
    }

    #[test]
    fn test_cactus_waters_less_often() {
        let policy = PlantType::Cactus.policy();
        assert_eq!(policy.apply(RAW, 50.0, 20.0).watering, 5);
        let long = Adjustments { watering: 9, ..RAW };
        assert_eq!(policy.apply(long, 50.0, 20.0).watering, 10);
    }

    #[test]
    fn test_arid_temperature_is_capped() {
        let policy = PlantType::Succulent.policy();
        // Cold trigger raises to 70, then the unconditional cap brings it to 60
        assert_eq!(policy.apply(RAW, 80.0, 10.0).temperature, 60);
        let hot = Adjustments { temperature: 90, ..RAW };
        assert_eq!(policy.apply(hot, 80.0, 25.0).temperature, 60);
        assert_eq!(policy.apply(RAW, 80.0, 25.0).temperature, 50);
    }

    #[test]
    fn test_arid_light_floor() {
        let policy = PlantType::Succulent.policy();
        assert_eq!(policy.apply(RAW, 59.9, 25.0).light, 70);
        assert_eq!(policy.apply(RAW, 60.0, 25.0).light, 50);
    }

    #[test]
    fn test_fern_policy() {
        let policy = PlantType::Fern.policy();
        let out = policy.apply(Adjustments { watering: 2, light: 45, temperature: 40 }, 75.0, 16.0);
        assert_eq!(out.watering, 1);
        assert_eq!(out.light, 30);
        assert_eq!(out.temperature, 60);
    }

    #[test]
    fn test_orchid_policy() {
        let policy = PlantType::Orchid.policy();
        let out = policy.apply(RAW, 35.0, 19.0);
        assert_eq!(out.watering, 5);
        assert_eq!(out.light, 70);
        assert_eq!(out.temperature, 60);

        let out = policy.apply(Adjustments { watering: 8, ..RAW }, 45.0, 22.0);
        assert_eq!(out, Adjustments { watering: 8, ..RAW });
    }
}
