//! Harmonics radius: how far out from DC a candidate's spectrum stays
//! structurally indistinguishable from the reference's.
//!
//! Both images are transformed into centred log-magnitude spectra. A square
//! window fixed on the spectrum centre starts at the configured initial size
//! and shrinks by `step` until the SSIM between the two windows exceeds the
//! success threshold. Half the side of that window is the radius.
//!
//! The SSIM data range is the global `max - min` of the whole reference
//! spectrum, taken once before the search; window statistics never rescale it.

use super::ssim::structural_similarity;
use super::{image_pair, InputSpec, Metric, MetricInputs, MetricResult, IMAGE_PAIR};
use crate::error::{HarmonicsError, Result};
use crate::image::Spectrum;
use log::debug;
use serde::{Deserialize, Serialize};

/// Side of the first window tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialSize {
    /// The spectrum's shorter side.
    #[default]
    ShorterSide,
    /// Half the number of rows, never more than the shorter side.
    HalfFirstDimension,
}

impl InitialSize {
    pub fn grid_size(self, spectrum: &Spectrum) -> usize {
        let shorter = spectrum.height().min(spectrum.width());
        match self {
            InitialSize::ShorterSide => shorter,
            InitialSize::HalfFirstDimension => (spectrum.height() / 2).min(shorter),
        }
    }
}

/// How the radius is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiusReport {
    /// Found radius as a percentage of the initial radius.
    #[default]
    Percentage,
    /// Found radius in spectrum pixels.
    Pixels,
}

impl RadiusReport {
    pub fn unit(self) -> &'static str {
        match self {
            RadiusReport::Percentage => "%",
            RadiusReport::Pixels => "px",
        }
    }
}

/// Radius reported when no window passes the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// No agreement even at the smallest scale.
    #[default]
    Zero,
    /// Assume the worst case at full resolution.
    MaxRadius,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonicsRadiusConfig {
    /// A window passes when its SSIM is strictly greater than this.
    pub success_threshold: f64,
    /// The search fails once the window side drops below this.
    pub min_grid_size: usize,
    /// Shrink per iteration; even so the window stays centred.
    pub step: usize,
    pub initial_size: InitialSize,
    pub report: RadiusReport,
    pub on_failure: FailurePolicy,
}

impl Default for HarmonicsRadiusConfig {
    fn default() -> Self {
        Self {
            success_threshold: 0.95,
            min_grid_size: 7,
            step: 2,
            initial_size: InitialSize::default(),
            report: RadiusReport::default(),
            on_failure: FailurePolicy::default(),
        }
    }
}

impl HarmonicsRadiusConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.success_threshold.is_finite() || self.success_threshold >= 1.0 {
            return Err(HarmonicsError::InvalidConfig(format!(
                "success_threshold must be a finite number below 1, got {}",
                self.success_threshold
            )));
        }
        if self.min_grid_size < 4 {
            return Err(HarmonicsError::InvalidConfig(format!(
                "min_grid_size must be at least 4, got {}",
                self.min_grid_size
            )));
        }
        if self.step == 0 || self.step % 2 != 0 {
            return Err(HarmonicsError::InvalidConfig(format!(
                "step must be a positive even number, got {}",
                self.step
            )));
        }
        Ok(())
    }
}

/// Raw outcome of one radius search.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusSearch {
    /// Radius of the first window tried.
    pub initial_radius: usize,
    /// Radius of the passing window, `None` if the search failed.
    pub radius: Option<usize>,
    /// Grid size that produced the passing window.
    pub grid_size: Option<usize>,
    /// SSIM of the last window evaluated.
    pub score: Option<f64>,
    pub iterations: usize,
}

impl RadiusSearch {
    pub fn succeeded(&self) -> bool {
        self.radius.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct HarmonicsRadius {
    config: HarmonicsRadiusConfig,
}

impl HarmonicsRadius {
    pub fn new(config: HarmonicsRadiusConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_threshold(success_threshold: f64) -> Result<Self> {
        Self::new(HarmonicsRadiusConfig {
            success_threshold,
            ..Default::default()
        })
    }

    pub fn config(&self) -> &HarmonicsRadiusConfig {
        &self.config
    }

    /// Run the shrinking-window search on two spectra of the same extent.
    ///
    /// The first window is always evaluated, even when it is already below
    /// the floor. A window whose radius would be zero ends the search.
    pub fn search(&self, reference: &Spectrum, candidate: &Spectrum) -> Result<RadiusSearch> {
        if reference.shape() != candidate.shape() {
            return Err(HarmonicsError::ShapeMismatch {
                expected: reference.shape(),
                actual: candidate.shape(),
            });
        }

        let data_range = reference.range();
        let initial = self.config.initial_size.grid_size(reference);
        let mut outcome = RadiusSearch {
            initial_radius: initial / 2,
            radius: None,
            grid_size: None,
            score: None,
            iterations: 0,
        };

        let mut grid = initial;
        loop {
            let half = grid / 2;
            let windows = (half > 0)
                .then(|| reference.centered_window(half).zip(candidate.centered_window(half)))
                .flatten();
            let Some((x, y)) = windows else {
                break;
            };

            let side = 2 * half;
            let score = structural_similarity(&x, &y, side, side, data_range);
            outcome.iterations += 1;
            outcome.score = Some(score);
            debug!("grid {grid}: ssim {score:.5}");

            if score > self.config.success_threshold {
                outcome.radius = Some(half);
                outcome.grid_size = Some(grid);
                break;
            }

            match grid.checked_sub(self.config.step) {
                Some(next) if next >= self.config.min_grid_size => grid = next,
                _ => break,
            }
        }

        debug!(
            "Radius search finished after {} iterations: {:?} of {}",
            outcome.iterations, outcome.radius, outcome.initial_radius
        );
        Ok(outcome)
    }

    /// Apply the failure policy and reporting convention to a search outcome.
    pub fn report(&self, search: &RadiusSearch) -> f64 {
        let radius = match (search.radius, self.config.on_failure) {
            (Some(radius), _) => radius,
            (None, FailurePolicy::Zero) => 0,
            (None, FailurePolicy::MaxRadius) => search.initial_radius,
        };
        match self.config.report {
            RadiusReport::Pixels => radius as f64,
            RadiusReport::Percentage if search.initial_radius == 0 => 0.0,
            RadiusReport::Percentage => radius as f64 / search.initial_radius as f64 * 100.0,
        }
    }
}

impl Metric for HarmonicsRadius {
    fn name(&self) -> String {
        format!(
            "harmonics_radius_{}",
            (self.config.success_threshold * 100.0).round() as i64
        )
    }

    fn required_inputs(&self) -> &[InputSpec] {
        IMAGE_PAIR
    }

    fn calculate(&self, inputs: &MetricInputs<'_>) -> Result<MetricResult> {
        let (y_true, y_pred) = image_pair(self, inputs)?;
        let reference = y_true.spectrum()?;
        let candidate = y_pred.spectrum()?;
        let search = self.search(&reference, &candidate)?;
        Ok(MetricResult::new(
            self.name(),
            self.report(&search),
            self.config.report.unit(),
        ))
    }
}
