//! Harmonics Radius
//!
//! Measures how well an upscaled or super-resolved image preserves the
//! high-frequency content of a reference, next to the usual pixel-domain
//! fidelity metrics.
//!
//! ## Spectral fidelity
//!
//! Each image is reduced to one luma channel and turned into a centred
//! `ln(1 + |F|)` magnitude spectrum ([`crate::image::fft::transform`]). Low
//! frequencies sit in the middle of that array and high frequencies towards
//! its edges. [`HarmonicsRadius`] shrinks a square window fixed on the centre
//! until the two spectra inside it are structurally similar, and reports half
//! of that window's side, either in pixels or as a percentage of the largest
//! window. Larger radii mean more faithfully reconstructed high frequencies.
//!
//! ## Pipeline
//!
//! 1. **Images** ([`Image`]): named, immutable buffers decoded from disk,
//!    built from raw samples, or derived from another image through a
//!    [`Preprocess`] step applied once at construction.
//! 2. **Metrics** ([`Metric`]): [`MeanSquaredError`], [`PeakSignalToNoiseRatio`],
//!    [`StructuralSimilarity`] and [`HarmonicsRadius`], all taking a
//!    `y_true`/`y_pred` pair of equal shape.
//! 3. **Analyzer** ([`Analyzer`]): one reference, ordered candidates and
//!    ordered metrics; `compute` returns results metric-major with the
//!    reference and candidate names attached.
//!
//! ```no_run
//! use harmonics_radius::{
//!     Analyzer, HarmonicsRadius, Image, MeanSquaredError, Preprocess, ResampleFilter,
//! };
//!
//! # fn main() -> harmonics_radius::Result<()> {
//! let reference = Image::open("butterfly.png", "hr")?;
//! let low = Image::derive(&reference, "lr", Preprocess::Downsample { factor: 2 })?;
//! let bicubic = Image::derive(
//!     &low,
//!     "bicubic",
//!     Preprocess::Upscale { factor: 2, filter: ResampleFilter::Bicubic },
//! )?;
//!
//! let mut analyzer = Analyzer::new();
//! analyzer.add_reference(reference)?;
//! analyzer.add_candidate(bicubic);
//! analyzer.add_metric(MeanSquaredError).add_metric(HarmonicsRadius::default());
//! for result in analyzer.compute()? {
//!     println!("{result}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod error;
pub mod image;
pub mod metrics;

pub use crate::analyzer::{Analyzer, AnalyzerSettings};
pub use crate::error::{HarmonicsError, Result};
pub use crate::image::{
    sr_companion_path, DecodeMode, Image, ImageData, ImageSource, Preprocess, ResampleFilter,
    Shape, Spectrum, TestPattern,
};
pub use crate::metrics::{
    FailurePolicy, HarmonicsRadius, HarmonicsRadiusConfig, InitialSize, MeanSquaredError, Metric,
    MetricInput, MetricInputs, MetricResult, PeakSignalToNoiseRatio, RadiusReport, RadiusSearch,
    ResultRecord, StructuralSimilarity,
};
