//! Metric abstraction and the concrete comparison metrics.
//!
//! Every metric declares the named inputs it needs and computes a single
//! [`MetricResult`] from them. The conventional inputs are [`Y_TRUE`] (the
//! reference) and [`Y_PRED`] (the candidate), both images of identical shape.

pub mod harmonics_radius;
pub mod psnr;
pub mod result;
pub mod squared_error;
pub mod ssim;
pub mod structural_similarity;

use crate::error::{HarmonicsError, Result};
use crate::image::Image;
use std::collections::BTreeMap;
use std::fmt;

pub use harmonics_radius::{
    FailurePolicy, HarmonicsRadius, HarmonicsRadiusConfig, InitialSize, RadiusReport, RadiusSearch,
};
pub use psnr::PeakSignalToNoiseRatio;
pub use result::{MetricResult, ResultRecord};
pub use squared_error::MeanSquaredError;
pub use structural_similarity::StructuralSimilarity;

pub const Y_TRUE: &str = "y_true";
pub const Y_PRED: &str = "y_pred";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Image,
    Number,
}

impl InputKind {
    fn describe(self) -> &'static str {
        match self {
            InputKind::Image => "an image",
            InputKind::Number => "a number",
        }
    }
}

/// One named input a metric requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSpec {
    pub name: &'static str,
    pub kind: InputKind,
}

/// The reference/candidate pair shared by all built-in metrics.
pub const IMAGE_PAIR: &[InputSpec] = &[
    InputSpec {
        name: Y_TRUE,
        kind: InputKind::Image,
    },
    InputSpec {
        name: Y_PRED,
        kind: InputKind::Image,
    },
];

#[derive(Debug, Clone, Copy)]
pub enum MetricInput<'a> {
    Image(&'a Image),
    Number(f64),
}

impl MetricInput<'_> {
    pub fn kind(&self) -> InputKind {
        match self {
            MetricInput::Image(_) => InputKind::Image,
            MetricInput::Number(_) => InputKind::Number,
        }
    }
}

/// Named inputs handed to [`Metric::calculate`].
#[derive(Debug, Clone, Default)]
pub struct MetricInputs<'a> {
    values: BTreeMap<String, MetricInput<'a>>,
}

impl<'a> MetricInputs<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// `y_true` and `y_pred` set to the given images.
    pub fn image_pair(y_true: &'a Image, y_pred: &'a Image) -> Self {
        Self::new()
            .with(Y_TRUE, MetricInput::Image(y_true))
            .with(Y_PRED, MetricInput::Image(y_pred))
    }

    pub fn with(mut self, name: impl Into<String>, value: MetricInput<'a>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: MetricInput<'a>) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&MetricInput<'a>> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Check presence and kind of every input `metric` declares.
    pub fn validate(&self, metric: &dyn Metric) -> Result<()> {
        for spec in metric.required_inputs() {
            let value = self.get(spec.name).ok_or_else(|| HarmonicsError::MissingInput {
                metric: metric.name(),
                input: spec.name.to_string(),
            })?;
            if value.kind() != spec.kind {
                return Err(HarmonicsError::TypeMismatch {
                    metric: metric.name(),
                    input: spec.name.to_string(),
                    expected: spec.kind.describe(),
                    actual: value.kind().describe(),
                });
            }
        }
        Ok(())
    }

    fn image(&self, metric: &dyn Metric, name: &str) -> Result<&'a Image> {
        match self.get(name) {
            Some(MetricInput::Image(image)) => Ok(*image),
            Some(other) => Err(HarmonicsError::TypeMismatch {
                metric: metric.name(),
                input: name.to_string(),
                expected: InputKind::Image.describe(),
                actual: other.kind().describe(),
            }),
            None => Err(HarmonicsError::MissingInput {
                metric: metric.name(),
                input: name.to_string(),
            }),
        }
    }
}

/// A comparison between named inputs producing one [`MetricResult`].
pub trait Metric: fmt::Debug + Send + Sync {
    /// Result name, also used in error messages.
    fn name(&self) -> String;

    fn required_inputs(&self) -> &[InputSpec];

    /// Validate `inputs` and compute the metric. The returned result carries
    /// no provenance.
    fn calculate(&self, inputs: &MetricInputs<'_>) -> Result<MetricResult>;

    /// Shorthand for [`Metric::calculate`] on a reference/candidate pair.
    fn compare(&self, y_true: &Image, y_pred: &Image) -> Result<MetricResult> {
        self.calculate(&MetricInputs::image_pair(y_true, y_pred))
    }
}

/// Validate `inputs` against `metric` and return `(y_true, y_pred)` once
/// both are present images of the same shape.
pub fn image_pair<'a>(
    metric: &dyn Metric,
    inputs: &MetricInputs<'a>,
) -> Result<(&'a Image, &'a Image)> {
    inputs.validate(metric)?;
    let y_true = inputs.image(metric, Y_TRUE)?;
    let y_pred = inputs.image(metric, Y_PRED)?;
    if y_true.shape() != y_pred.shape() {
        return Err(HarmonicsError::ShapeMismatch {
            expected: y_true.shape(),
            actual: y_pred.shape(),
        });
    }
    Ok((y_true, y_pred))
}
