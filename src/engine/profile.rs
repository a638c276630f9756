//! Domain profiles: a validated, immutable set of variables and rules
//!
//! Evaluation is a pure function of the profile and the crisp inputs:
//!
//! 1. every rule's antecedent tree gives a fire strength
//! 2. per output term, activation = max over the rules concluding that term
//! 3. on the output grid, `mu(x) = max_t min(term_t(x), activation_t)`
//! 4. centroid `sum(x * mu(x)) / sum(mu(x))`

use std::collections::HashMap;
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use super::rule::Rule;
use super::variable::LinguisticVariable;
use super::{ComputeError, DefinitionError};

/// Whether a variable feeds rule conditions or receives rule conclusions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableRole {
    Input,
    Output,
}

impl fmt::Display for VariableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            VariableRole::Input => "input",
            VariableRole::Output => "output",
        })
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Collects variables and rules, then validates them into a [`DomainProfile`]
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    name: String,
    inputs: Vec<LinguisticVariable>,
    outputs: Vec<LinguisticVariable>,
    rules: Vec<Rule>,
}

impl ProfileBuilder {
    pub fn input(mut self, var: LinguisticVariable) -> Self {
        self.inputs.push(var);
        self
    }

    pub fn output(mut self, var: LinguisticVariable) -> Self {
        self.outputs.push(var);
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Validate every reference and freeze the profile
    pub fn build(self) -> Result<DomainProfile, DefinitionError> {
        let mut inputs = IndexMap::new();
        let mut outputs = IndexMap::new();

        for var in self.inputs {
            if var.term_count() == 0 {
                return Err(DefinitionError::EmptyVariable(var.name().to_string()));
            }
            if inputs.contains_key(var.name()) {
                return Err(DefinitionError::DuplicateVariable(var.name().to_string()));
            }
            inputs.insert(var.name().to_string(), var);
        }
        for var in self.outputs {
            if var.term_count() == 0 {
                return Err(DefinitionError::EmptyVariable(var.name().to_string()));
            }
            if inputs.contains_key(var.name()) || outputs.contains_key(var.name()) {
                return Err(DefinitionError::DuplicateVariable(var.name().to_string()));
            }
            outputs.insert(var.name().to_string(), var);
        }

        if self.rules.is_empty() {
            return Err(DefinitionError::NoRules(self.name));
        }

        // Rules are numbered from 1 in error messages
        for (idx, rule) in self.rules.iter().enumerate() {
            let number = idx + 1;
            for (variable, term) in rule.antecedent.leaves() {
                check_reference(&inputs, VariableRole::Input, number, variable, term)?;
            }
            if rule.consequents.is_empty() {
                return Err(DefinitionError::NoConsequent(number));
            }
            for consequent in &rule.consequents {
                check_reference(
                    &outputs,
                    VariableRole::Output,
                    number,
                    &consequent.variable,
                    &consequent.term,
                )?;
            }
        }

        Ok(DomainProfile {
            name: self.name,
            inputs,
            outputs,
            rules: self.rules,
        })
    }
}

fn check_reference(
    vars: &IndexMap<String, LinguisticVariable>,
    role: VariableRole,
    rule: usize,
    variable: &str,
    term: &str,
) -> Result<(), DefinitionError> {
    let var = vars.get(variable).ok_or_else(|| DefinitionError::UndefinedVariable {
        rule,
        role,
        variable: variable.to_string(),
    })?;
    if !var.has_term(term) {
        return Err(DefinitionError::UndefinedTerm {
            rule,
            variable: variable.to_string(),
            term: term.to_string(),
        });
    }
    Ok(())
}

// ============================================================================
// Profile
// ============================================================================

/// A validated fuzzy system for one domain
#[derive(Debug, Clone)]
pub struct DomainProfile {
    name: String,
    inputs: IndexMap<String, LinguisticVariable>,
    outputs: IndexMap<String, LinguisticVariable>,
    rules: Vec<Rule>,
}

impl DomainProfile {
    pub fn builder(name: impl Into<String>) -> ProfileBuilder {
        ProfileBuilder {
            name: name.into(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            rules: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn inputs(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.inputs.values()
    }

    pub fn outputs(&self) -> impl Iterator<Item = &LinguisticVariable> {
        self.outputs.values()
    }

    pub fn input(&self, name: &str) -> Option<&LinguisticVariable> {
        self.inputs.get(name)
    }

    pub fn output(&self, name: &str) -> Option<&LinguisticVariable> {
        self.outputs.get(name)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    fn input_lookup(&self) -> HashMap<&str, &LinguisticVariable> {
        self.inputs.iter().map(|(name, var)| (name.as_str(), var)).collect()
    }

    /// Fire strength of every rule, in rule order
    pub fn fire_strengths(&self, inputs: &HashMap<String, f64>) -> Result<Vec<f64>, ComputeError> {
        for (name, value) in inputs {
            if !value.is_finite() {
                return Err(ComputeError::NonFiniteInput {
                    variable: name.clone(),
                    value: *value,
                });
            }
        }

        let lookup = self.input_lookup();
        self.rules
            .iter()
            .map(|rule| rule.fire_strength(&lookup, inputs))
            .collect()
    }

    /// Per output variable, the max-accumulated activation of each term.
    ///
    /// Terms no rule concludes are reported with activation 0.
    pub fn activations(
        &self,
        inputs: &HashMap<String, f64>,
    ) -> Result<IndexMap<String, IndexMap<String, f64>>, ComputeError> {
        let strengths = self.fire_strengths(inputs)?;

        let mut activations: IndexMap<String, IndexMap<String, f64>> = self
            .outputs
            .iter()
            .map(|(name, var)| {
                let terms = var.terms().map(|(term, _)| (term.to_string(), 0.0)).collect();
                (name.clone(), terms)
            })
            .collect();

        for (rule, strength) in self.rules.iter().zip(strengths) {
            for consequent in &rule.consequents {
                let slot = activations
                    .get_mut(&consequent.variable)
                    .and_then(|terms| terms.get_mut(&consequent.term))
                    .ok_or_else(|| ComputeError::UnknownTerm {
                        variable: consequent.variable.clone(),
                        term: consequent.term.clone(),
                    })?;
                *slot = slot.max(strength);
            }
        }

        Ok(activations)
    }

    /// Crisp value of every output variable
    pub fn evaluate(&self, inputs: &HashMap<String, f64>) -> Result<IndexMap<String, f64>, ComputeError> {
        let activations = self.activations(inputs)?;

        let mut results = IndexMap::with_capacity(self.outputs.len());
        for (name, var) in &self.outputs {
            let activation = &activations[name];
            let crisp = centroid(var, activation)
                .ok_or_else(|| ComputeError::DegenerateOutput(name.clone()))?;
            results.insert(name.clone(), crisp);
        }
        Ok(results)
    }
}

// ============================================================================
// Description
// ============================================================================

/// A serialisable outline of a profile, for listings and diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub name: String,
    pub inputs: Vec<VariableSummary>,
    pub outputs: Vec<VariableSummary>,
    pub rule_count: usize,
    pub rules: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VariableSummary {
    pub name: String,
    pub role: VariableRole,
    pub min: f64,
    pub max: f64,
    /// Term name and its `(a, b, c)` points, in definition order
    pub terms: IndexMap<String, [f64; 3]>,
}

impl VariableSummary {
    fn new(var: &LinguisticVariable, role: VariableRole) -> Self {
        Self {
            name: var.name().to_string(),
            role,
            min: var.universe().min(),
            max: var.universe().max(),
            terms: var
                .terms()
                .map(|(term, mf)| {
                    let (a, b, c) = mf.points();
                    (term.to_string(), [a, b, c])
                })
                .collect(),
        }
    }
}

impl DomainProfile {
    pub fn describe(&self) -> ProfileSummary {
        ProfileSummary {
            name: self.name.clone(),
            inputs: self
                .inputs
                .values()
                .map(|v| VariableSummary::new(v, VariableRole::Input))
                .collect(),
            outputs: self
                .outputs
                .values()
                .map(|v| VariableSummary::new(v, VariableRole::Output))
                .collect(),
            rule_count: self.rules.len(),
            rules: self.rules.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Centroid of the clipped-and-merged output set, `None` when it is empty
fn centroid(var: &LinguisticVariable, activation: &IndexMap<String, f64>) -> Option<f64> {
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for x in var.universe().points() {
        let mu = var
            .terms()
            .map(|(term, mf)| {
                let level = activation.get(term).copied().unwrap_or(0.0);
                mf.degree(x).min(level)
            })
            .fold(0.0_f64, f64::max);
        numerator += x * mu;
        denominator += mu;
    }

    if denominator > 0.0 {
        Some(numerator / denominator)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::membership::{trimf, Universe};
    use crate::engine::rule::is;

    fn level(name: &str) -> LinguisticVariable {
        LinguisticVariable::new(name, Universe::new(0.0, 10.0).unwrap())
            .with_term("low", trimf(0.0, 0.0, 5.0).unwrap())
            .with_term("high", trimf(5.0, 10.0, 10.0).unwrap())
    }

    fn simple_profile() -> DomainProfile {
        DomainProfile::builder("simple")
            .input(level("x"))
            .output(level("y"))
            .rule(Rule::when(is("x", "low")).then("y", "low"))
            .rule(Rule::when(is("x", "high")).then("y", "high"))
            .build()
            .unwrap()
    }

    fn inputs(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_undefined_term_rejected() {
        let err = DomainProfile::builder("broken")
            .input(level("x"))
            .output(level("y"))
            .rule(Rule::when(is("x", "medium")).then("y", "low"))
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            DefinitionError::UndefinedTerm {
                rule: 1,
                variable: "x".to_string(),
                term: "medium".to_string()
            }
        );
    }

    #[test]
    fn test_undefined_consequent_rejected() {
        let err = DomainProfile::builder("broken")
            .input(level("x"))
            .output(level("y"))
            .rule(Rule::when(is("x", "low")).then("y", "low"))
            .rule(Rule::when(is("x", "high")).then("z", "high"))
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            DefinitionError::UndefinedVariable { rule: 2, role: VariableRole::Output, .. }
        ));
    }

    #[test]
    fn test_output_used_as_condition_rejected() {
        let err = DomainProfile::builder("broken")
            .input(level("x"))
            .output(level("y"))
            .rule(Rule::when(is("y", "low")).then("y", "high"))
            .build()
            .unwrap_err();

        assert!(matches!(
            err,
            DefinitionError::UndefinedVariable { role: VariableRole::Input, .. }
        ));
    }

    #[test]
    fn test_duplicate_and_empty_definitions() {
        let dup = DomainProfile::builder("dup")
            .input(level("x"))
            .output(level("x"))
            .rule(Rule::when(is("x", "low")).then("x", "low"))
            .build();
        assert_eq!(dup.unwrap_err(), DefinitionError::DuplicateVariable("x".to_string()));

        let empty = DomainProfile::builder("empty")
            .input(LinguisticVariable::new("x", Universe::new(0.0, 1.0).unwrap()))
            .build();
        assert_eq!(empty.unwrap_err(), DefinitionError::EmptyVariable("x".to_string()));

        let no_rules = DomainProfile::builder("quiet").input(level("x")).output(level("y")).build();
        assert_eq!(no_rules.unwrap_err(), DefinitionError::NoRules("quiet".to_string()));

        let no_consequent = DomainProfile::builder("dangling")
            .input(level("x"))
            .output(level("y"))
            .rule(Rule::when(is("x", "low")))
            .build();
        assert_eq!(no_consequent.unwrap_err(), DefinitionError::NoConsequent(1));
    }

    #[test]
    fn test_max_accumulation() {
        let profile = DomainProfile::builder("acc")
            .input(level("a"))
            .input(level("b"))
            .output(level("y"))
            .rule(Rule::when(is("a", "high")).then("y", "high"))
            .rule(Rule::when(is("b", "high")).then("y", "high"))
            .rule(Rule::when(is("a", "low").and(is("b", "low"))).then("y", "low"))
            .build()
            .unwrap();

        // high(7) = 0.4, high(9) = 0.8 -> max, not sum
        let acts = profile.activations(&inputs(&[("a", 7.0), ("b", 9.0)])).unwrap();
        assert!((acts["y"]["high"] - 0.8).abs() < 1e-12);
        assert_eq!(acts["y"]["low"], 0.0);
    }

    #[test]
    fn test_single_rule_centroid() {
        let profile = simple_profile();
        let out = profile.evaluate(&inputs(&[("x", 10.0)])).unwrap();

        // Only "high" (5, 10, 10) fires at full strength: centroid of the
        // sampled ramp 6..=10 weighted by (x - 5) / 5
        let expected: f64 = {
            let num: f64 = (5..=10).map(|x| x as f64 * (x as f64 - 5.0) / 5.0).sum();
            let den: f64 = (5..=10).map(|x| (x as f64 - 5.0) / 5.0).sum();
            num / den
        };
        assert!((out["y"] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_output() {
        let profile = simple_profile();
        // x = 5 sits where both terms are exactly zero
        let err = profile.evaluate(&inputs(&[("x", 5.0)])).unwrap_err();
        assert_eq!(err, ComputeError::DegenerateOutput("y".to_string()));
    }

    #[test]
    fn test_missing_and_non_finite_inputs() {
        let profile = simple_profile();
        assert_eq!(
            profile.evaluate(&inputs(&[])).unwrap_err(),
            ComputeError::MissingInput("x".to_string())
        );
        assert!(matches!(
            profile.evaluate(&inputs(&[("x", f64::NAN)])),
            Err(ComputeError::NonFiniteInput { .. })
        ));
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let profile = simple_profile();
        let ins = inputs(&[("x", 3.3)]);
        let first = profile.evaluate(&ins).unwrap();
        let second = profile.evaluate(&ins).unwrap();
        assert_eq!(first["y"].to_bits(), second["y"].to_bits());
    }

    #[test]
    fn test_describe() {
        let summary = simple_profile().describe();
        assert_eq!(summary.name, "simple");
        assert_eq!(summary.rule_count, 2);
        assert_eq!(summary.inputs[0].terms["high"], [5.0, 10.0, 10.0]);
        assert_eq!(summary.outputs[0].role, VariableRole::Output);
        assert_eq!(summary.rules[0], "IF x is low THEN y is low");
    }

    #[test]
    fn test_profile_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DomainProfile>();
    }
}
