//! Linguistic variables

use indexmap::IndexMap;

use super::membership::{MembershipFunction, Universe};

/// A named scalar dimension with labelled membership functions.
///
/// Terms keep their insertion order so that every pass over them (fuzzification,
/// aggregation, listings) is deterministic.
#[derive(Debug, Clone)]
pub struct LinguisticVariable {
    name: String,
    universe: Universe,
    terms: IndexMap<String, MembershipFunction>,
}

impl LinguisticVariable {
    pub fn new(name: impl Into<String>, universe: Universe) -> Self {
        Self {
            name: name.into(),
            universe,
            terms: IndexMap::new(),
        }
    }

    /// Add a term, replacing any previous definition with the same label
    pub fn with_term(mut self, term: impl Into<String>, membership: MembershipFunction) -> Self {
        self.terms.insert(term.into(), membership);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn universe(&self) -> &Universe {
        &self.universe
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &MembershipFunction)> {
        self.terms.iter().map(|(name, mf)| (name.as_str(), mf))
    }

    pub fn term(&self, name: &str) -> Option<&MembershipFunction> {
        self.terms.get(name)
    }

    pub fn has_term(&self, name: &str) -> bool {
        self.terms.contains_key(name)
    }

    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Membership of a crisp value in every term
    pub fn fuzzify(&self, value: f64) -> IndexMap<String, f64> {
        self.terms
            .iter()
            .map(|(name, mf)| (name.clone(), mf.degree(value)))
            .collect()
    }

    /// The term with the highest membership; the first term wins ties
    pub fn dominant_term(&self, value: f64) -> Option<(&str, f64)> {
        self.terms
            .iter()
            .map(|(name, mf)| (name.as_str(), mf.degree(value)))
            .fold(None, |best, (name, degree)| match best {
                Some((_, d)) if d >= degree => best,
                _ => Some((name, degree)),
            })
    }
}
