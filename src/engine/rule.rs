//! Fuzzy rules: antecedent expression trees and their consequents
//!
//! Antecedents are a small tagged tree evaluated with Zadeh operators:
//! AND is `min`, OR is `max`. Rules are immutable once their profile is built.

use std::collections::HashMap;
use std::fmt;

use super::variable::LinguisticVariable;
use super::ComputeError;

// ============================================================================
// Antecedent
// ============================================================================

/// Condition side of a rule
#[derive(Debug, Clone, PartialEq)]
pub enum Antecedent {
    /// `variable is term`
    Leaf { variable: String, term: String },
    /// Minimum of the children
    And(Vec<Antecedent>),
    /// Maximum of the children
    Or(Vec<Antecedent>),
}

/// `variable is term`
pub fn is(variable: impl Into<String>, term: impl Into<String>) -> Antecedent {
    Antecedent::Leaf {
        variable: variable.into(),
        term: term.into(),
    }
}

impl Antecedent {
    /// Conjunction, flattening nested ANDs
    pub fn and(self, other: Antecedent) -> Antecedent {
        match (self, other) {
            (Antecedent::And(mut left), Antecedent::And(right)) => {
                left.extend(right);
                Antecedent::And(left)
            }
            (Antecedent::And(mut left), right) => {
                left.push(right);
                Antecedent::And(left)
            }
            (left, right) => Antecedent::And(vec![left, right]),
        }
    }

    /// Disjunction, flattening nested ORs
    pub fn or(self, other: Antecedent) -> Antecedent {
        match (self, other) {
            (Antecedent::Or(mut left), Antecedent::Or(right)) => {
                left.extend(right);
                Antecedent::Or(left)
            }
            (Antecedent::Or(mut left), right) => {
                left.push(right);
                Antecedent::Or(left)
            }
            (left, right) => Antecedent::Or(vec![left, right]),
        }
    }

    /// Degree to which the condition holds for the given crisp inputs
    pub fn evaluate(
        &self,
        variables: &HashMap<&str, &LinguisticVariable>,
        inputs: &HashMap<String, f64>,
    ) -> Result<f64, ComputeError> {
        match self {
            Antecedent::Leaf { variable, term } => {
                let var = variables
                    .get(variable.as_str())
                    .ok_or_else(|| ComputeError::UnknownVariable(variable.clone()))?;
                let mf = var.term(term).ok_or_else(|| ComputeError::UnknownTerm {
                    variable: variable.clone(),
                    term: term.clone(),
                })?;
                let value = inputs
                    .get(variable)
                    .ok_or_else(|| ComputeError::MissingInput(variable.clone()))?;
                Ok(mf.degree(*value))
            }
            Antecedent::And(children) => {
                let mut strength = 1.0_f64;
                for child in children {
                    strength = strength.min(child.evaluate(variables, inputs)?);
                }
                Ok(strength)
            }
            Antecedent::Or(children) => {
                let mut strength = 0.0_f64;
                for child in children {
                    strength = strength.max(child.evaluate(variables, inputs)?);
                }
                Ok(strength)
            }
        }
    }

    /// Every `(variable, term)` leaf in the tree, left to right
    pub fn leaves(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<(&'a str, &'a str)>) {
        match self {
            Antecedent::Leaf { variable, term } => out.push((variable.as_str(), term.as_str())),
            Antecedent::And(children) | Antecedent::Or(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, children: &[Antecedent], op: &str) -> fmt::Result {
    write!(f, "(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", op)?;
        }
        write!(f, "{}", child)?;
    }
    write!(f, ")")
}

impl fmt::Display for Antecedent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Antecedent::Leaf { variable, term } => write!(f, "{} is {}", variable, term),
            Antecedent::And(children) => write_joined(f, children, "AND"),
            Antecedent::Or(children) => write_joined(f, children, "OR"),
        }
    }
}

// ============================================================================
// Rule
// ============================================================================

/// A consequent target: `variable is term`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Consequent {
    pub variable: String,
    pub term: String,
}

/// IF antecedent THEN consequent(s)
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Rule name/label
    pub label: Option<String>,
    pub antecedent: Antecedent,
    pub consequents: Vec<Consequent>,
}

impl Rule {
    pub fn when(antecedent: Antecedent) -> Self {
        Self {
            label: None,
            antecedent,
            consequents: Vec::new(),
        }
    }

    /// Add a consequent target
    pub fn then(mut self, variable: impl Into<String>, term: impl Into<String>) -> Self {
        self.consequents.push(Consequent {
            variable: variable.into(),
            term: term.into(),
        });
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Fire strength of the rule for the given inputs
    pub fn fire_strength(
        &self,
        variables: &HashMap<&str, &LinguisticVariable>,
        inputs: &HashMap<String, f64>,
    ) -> Result<f64, ComputeError> {
        self.antecedent.evaluate(variables, inputs)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.label {
            write!(f, "[{}] ", label)?;
        }
        write!(f, "IF {} THEN ", self.antecedent)?;
        for (i, c) in self.consequents.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} is {}", c.variable, c.term)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::membership::{trimf, Universe};

    fn variables() -> Vec<LinguisticVariable> {
        vec![
            LinguisticVariable::new("x", Universe::new(0.0, 10.0).unwrap())
                .with_term("low", trimf(0.0, 0.0, 10.0).unwrap()),
            LinguisticVariable::new("y", Universe::new(0.0, 10.0).unwrap())
                .with_term("high", trimf(0.0, 10.0, 10.0).unwrap()),
        ]
    }

    fn lookup(vars: &[LinguisticVariable]) -> HashMap<&str, &LinguisticVariable> {
        vars.iter().map(|v| (v.name(), v)).collect()
    }

    fn inputs(x: f64, y: f64) -> HashMap<String, f64> {
        HashMap::from([("x".to_string(), x), ("y".to_string(), y)])
    }

    #[test]
    fn test_and_is_min_or_is_max() {
        let vars = variables();
        let map = lookup(&vars);
        let ins = inputs(3.0, 6.0);

        // p = low(3) = 0.7, q = high(6) = 0.6
        let p = is("x", "low").evaluate(&map, &ins).unwrap();
        let q = is("y", "high").evaluate(&map, &ins).unwrap();
        assert!((p - 0.7).abs() < 1e-12);
        assert!((q - 0.6).abs() < 1e-12);

        let and = is("x", "low").and(is("y", "high")).evaluate(&map, &ins).unwrap();
        let or = is("x", "low").or(is("y", "high")).evaluate(&map, &ins).unwrap();
        assert_eq!(and, p.min(q));
        assert_eq!(or, p.max(q));
    }

    #[test]
    fn test_nested_expression() {
        let vars = variables();
        let map = lookup(&vars);
        let ins = inputs(2.0, 1.0);

        // low(2) = 0.8 AND (high(1) = 0.1 OR low(2) = 0.8) = 0.8
        let expr = is("x", "low").and(is("y", "high").or(is("x", "low")));
        assert!((expr.evaluate(&map, &ins).unwrap() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_and_flattens() {
        let expr = is("a", "1").and(is("b", "2")).and(is("c", "3"));
        match &expr {
            Antecedent::And(children) => assert_eq!(children.len(), 3),
            other => panic!("expected AND, got {:?}", other),
        }
        assert_eq!(expr.leaves(), vec![("a", "1"), ("b", "2"), ("c", "3")]);
    }

    #[test]
    fn test_missing_input() {
        let vars = variables();
        let map = lookup(&vars);
        let ins = HashMap::from([("x".to_string(), 1.0)]);

        let err = is("y", "high").evaluate(&map, &ins).unwrap_err();
        assert_eq!(err, ComputeError::MissingInput("y".to_string()));
    }

    #[test]
    fn test_rule_display() {
        let rule = Rule::when(is("x", "low").and(is("y", "high").or(is("x", "low"))))
            .then("z", "big")
            .with_label("r1");
        assert_eq!(
            rule.to_string(),
            "[r1] IF (x is low AND (y is high OR x is low)) THEN z is big"
        );
    }
}
