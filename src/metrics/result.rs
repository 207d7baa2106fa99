use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of one metric on one reference/candidate pair.
///
/// Metrics fill in name, value and unit. The reference and candidate names
/// stay empty until the analyzer stamps them.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricResult {
    name: String,
    value: f64,
    unit: String,
    reference_name: String,
    candidate_name: String,
}

impl MetricResult {
    pub fn new(name: impl Into<String>, value: f64, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value,
            unit: unit.into(),
            reference_name: String::new(),
            candidate_name: String::new(),
        }
    }

    pub(crate) fn with_provenance(
        mut self,
        reference: impl Into<String>,
        candidate: impl Into<String>,
    ) -> Self {
        self.reference_name = reference.into();
        self.candidate_name = candidate.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn reference_name(&self) -> &str {
        &self.reference_name
    }

    pub fn candidate_name(&self) -> &str {
        &self.candidate_name
    }

    pub fn has_provenance(&self) -> bool {
        !self.reference_name.is_empty() || !self.candidate_name.is_empty()
    }

    pub fn to_record(&self) -> ResultRecord {
        ResultRecord {
            name: self.name.clone(),
            value: self.value,
            unit: self.unit.clone(),
            reference: self.reference_name.clone(),
            image: self.candidate_name.clone(),
        }
    }
}

impl fmt::Display for MetricResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.3} {} (ref: {}, comp: {})",
            self.name, self.value, self.unit, self.reference_name, self.candidate_name
        )
    }
}

/// Flat, serialisable form of a [`MetricResult`] for reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub name: String,
    pub value: f64,
    pub unit: String,
    pub reference: String,
    pub image: String,
}
