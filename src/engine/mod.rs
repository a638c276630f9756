//! Mamdani Fuzzy Inference Engine
//!
//! The engine shared by every scenario profile:
//! - Triangular membership functions over sampled universes
//! - Linguistic variables with ordered, overlapping terms
//! - Rules with AND (`min`) / OR (`max`) antecedent trees
//! - Max-accumulation of rule strengths per output term
//! - Min-correlation composition and centroid defuzzification
//!
//! Profiles are immutable once built and can be evaluated from any number of
//! threads at once; each [`InferenceSession`] carries its own inputs/outputs.
//!
//! # Example
//!
//! ```rust
//! use fuzzylab::engine::{is, trimf, DomainProfile, InferenceSession, LinguisticVariable, Rule, Universe};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let profile = DomainProfile::builder("tip")
//!     .input(
//!         LinguisticVariable::new("service", Universe::new(0.0, 10.0)?)
//!             .with_term("poor", trimf(0.0, 0.0, 5.0)?)
//!             .with_term("good", trimf(5.0, 10.0, 10.0)?),
//!     )
//!     .output(
//!         LinguisticVariable::new("tip", Universe::new(0.0, 25.0)?)
//!             .with_term("low", trimf(0.0, 0.0, 13.0)?)
//!             .with_term("high", trimf(13.0, 25.0, 25.0)?),
//!     )
//!     .rule(Rule::when(is("service", "poor")).then("tip", "low"))
//!     .rule(Rule::when(is("service", "good")).then("tip", "high"))
//!     .build()?;
//!
//! let mut session = InferenceSession::new(&profile);
//! session.set_input("service", 9.0)?;
//! session.compute()?;
//! assert!(session.output("tip").unwrap() > 13.0);
//! # Ok(())
//! # }
//! ```

pub mod membership;
pub mod variable;
pub mod rule;
pub mod profile;
pub mod session;

pub use membership::{trimf, MembershipFunction, Universe};
pub use variable::LinguisticVariable;
pub use rule::{is, Antecedent, Consequent, Rule};
pub use profile::{DomainProfile, ProfileBuilder, ProfileSummary, VariableRole, VariableSummary};
pub use session::InferenceSession;

/// Malformed profile definitions, detected while the profile is built
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DefinitionError {
    #[error("Invalid universe [{min}, {max}] with step {step}")]
    InvalidUniverse { min: f64, max: f64, step: f64 },

    #[error("Invalid triangular membership ({a}, {b}, {c}): expected a <= b <= c and a < c")]
    InvalidMembership { a: f64, b: f64, c: f64 },

    #[error("Variable '{0}' is defined more than once")]
    DuplicateVariable(String),

    #[error("Variable '{0}' has no terms")]
    EmptyVariable(String),

    #[error("Rule {rule} references undefined {role} variable '{variable}'")]
    UndefinedVariable {
        rule: usize,
        role: VariableRole,
        variable: String,
    },

    #[error("Rule {rule} references undefined term '{term}' of variable '{variable}'")]
    UndefinedTerm {
        rule: usize,
        variable: String,
        term: String,
    },

    #[error("Rule {0} has no consequent")]
    NoConsequent(usize),

    #[error("Profile '{0}' has no rules")]
    NoRules(String),
}

/// Failures while evaluating a built profile
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComputeError {
    #[error("No input value provided for '{0}'")]
    MissingInput(String),

    #[error("Unknown variable '{0}'")]
    UnknownVariable(String),

    #[error("Unknown term '{term}' for variable '{variable}'")]
    UnknownTerm { variable: String, term: String },

    #[error("Input '{variable}' is not a finite number: {value}")]
    NonFiniteInput { variable: String, value: f64 },

    /// The aggregated output set is zero everywhere, so the centroid is undefined
    #[error("Output '{0}' cannot be defuzzified: no rule fired with non-zero strength")]
    DegenerateOutput(String),
}
