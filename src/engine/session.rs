//! Per-request evaluation state over a shared profile

use std::collections::HashMap;

use indexmap::IndexMap;

use super::profile::DomainProfile;
use super::ComputeError;

/// Inputs and outputs of one evaluation.
///
/// The profile is borrowed immutably, so any number of sessions may run
/// against the same profile concurrently.
#[derive(Debug, Clone)]
pub struct InferenceSession<'p> {
    profile: &'p DomainProfile,
    inputs: HashMap<String, f64>,
    outputs: IndexMap<String, f64>,
}

impl<'p> InferenceSession<'p> {
    pub fn new(profile: &'p DomainProfile) -> Self {
        Self {
            profile,
            inputs: HashMap::new(),
            outputs: IndexMap::new(),
        }
    }

    pub fn profile(&self) -> &'p DomainProfile {
        self.profile
    }

    /// Set a crisp input; the variable must be one of the profile's inputs
    pub fn set_input(&mut self, name: &str, value: f64) -> Result<&mut Self, ComputeError> {
        if self.profile.input(name).is_none() {
            return Err(ComputeError::UnknownVariable(name.to_string()));
        }
        self.inputs.insert(name.to_string(), value);
        Ok(self)
    }

    pub fn input(&self, name: &str) -> Option<f64> {
        self.inputs.get(name).copied()
    }

    /// Evaluate the profile; previous outputs are discarded even on failure
    pub fn compute(&mut self) -> Result<&IndexMap<String, f64>, ComputeError> {
        self.outputs.clear();
        self.outputs = self.profile.evaluate(&self.inputs)?;
        Ok(&self.outputs)
    }

    pub fn output(&self, name: &str) -> Option<f64> {
        self.outputs.get(name).copied()
    }

    pub fn outputs(&self) -> &IndexMap<String, f64> {
        &self.outputs
    }
}
