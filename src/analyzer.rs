use crate::error::{HarmonicsError, Result};
use crate::image::Image;
use crate::metrics::{Metric, MetricResult};
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    /// Label used in log output.
    pub name: String,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            name: "SRAnalyzerDefault".to_string(),
        }
    }
}

/// Single-use comparison session: one reference, many candidates, many
/// metrics.
///
/// [`Analyzer::compute`] evaluates every metric against every candidate,
/// metric-major and candidate-minor, and may succeed only once. The
/// registered images and metrics stay inspectable afterwards.
#[derive(Debug, Default)]
pub struct Analyzer {
    settings: AnalyzerSettings,
    reference: Option<Image>,
    candidates: Vec<Image>,
    metrics: Vec<Box<dyn Metric>>,
    done: bool,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: AnalyzerSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn add_metric<M: Metric + 'static>(&mut self, metric: M) -> &mut Self {
        self.add_boxed_metric(Box::new(metric))
    }

    pub fn add_boxed_metric(&mut self, metric: Box<dyn Metric>) -> &mut Self {
        debug!("[{}] metric {} registered", self.settings.name, metric.name());
        self.metrics.push(metric);
        self
    }

    /// Set the reference. A session holds exactly one; a second call fails
    /// with [`HarmonicsError::ReferenceAlreadySet`].
    pub fn add_reference(&mut self, image: Image) -> Result<&mut Self> {
        if let Some(current) = &self.reference {
            return Err(HarmonicsError::ReferenceAlreadySet(current.name().to_string()));
        }
        debug!("[{}] reference {} registered", self.settings.name, image.name());
        self.reference = Some(image);
        Ok(self)
    }

    pub fn add_candidate(&mut self, image: Image) -> &mut Self {
        debug!("[{}] candidate {} registered", self.settings.name, image.name());
        self.candidates.push(image);
        self
    }

    /// Evaluate every metric on every `(reference, candidate)` pair.
    ///
    /// The first failing pair aborts the call and no partial results are
    /// returned. The session is only marked done on success.
    pub fn compute(&mut self) -> Result<Vec<MetricResult>> {
        if self.done {
            return Err(HarmonicsError::AlreadyComputed);
        }
        let reference = self.reference.as_ref().ok_or(HarmonicsError::MissingReference)?;
        if self.candidates.is_empty() {
            return Err(HarmonicsError::NoCandidates);
        }
        if self.metrics.is_empty() {
            return Err(HarmonicsError::NoMetrics);
        }

        info!(
            "[{}] computing {} metrics for {} candidates against {}",
            self.settings.name,
            self.metrics.len(),
            self.candidates.len(),
            reference.name()
        );

        let mut results = Vec::with_capacity(self.metrics.len() * self.candidates.len());
        for metric in &self.metrics {
            for candidate in &self.candidates {
                let result = metric
                    .compare(reference, candidate)?
                    .with_provenance(reference.name(), candidate.name());
                debug!("[{}] {}", self.settings.name, result);
                results.push(result);
            }
        }

        self.done = true;
        info!("[{}] produced {} results", self.settings.name, results.len());
        Ok(results)
    }

    pub fn settings(&self) -> &AnalyzerSettings {
        &self.settings
    }

    pub fn reference(&self) -> Option<&Image> {
        self.reference.as_ref()
    }

    pub fn candidates(&self) -> &[Image] {
        &self.candidates
    }

    pub fn metrics(&self) -> &[Box<dyn Metric>] {
        &self.metrics
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ImageData, Preprocess, TestPattern};
    use crate::metrics::{HarmonicsRadius, MeanSquaredError};

    fn image(name: &str) -> Image {
        Image::from_data(
            ImageData::create_test_pattern(16, 1, TestPattern::Rings),
            name,
            None,
        )
        .unwrap()
    }

    fn ready() -> Analyzer {
        let mut analyzer = Analyzer::new();
        analyzer.add_reference(image("ref")).unwrap();
        analyzer.add_candidate(image("a"));
        analyzer.add_metric(MeanSquaredError);
        analyzer
    }

    #[test]
    fn test_default_name() {
        assert_eq!(Analyzer::new().settings().name, "SRAnalyzerDefault");
    }

    #[test]
    fn test_preconditions_in_order() {
        let mut analyzer = Analyzer::new();
        assert!(matches!(analyzer.compute(), Err(HarmonicsError::MissingReference)));

        analyzer.add_reference(image("ref")).unwrap();
        assert!(matches!(analyzer.compute(), Err(HarmonicsError::NoCandidates)));

        analyzer.add_candidate(image("a"));
        assert!(matches!(analyzer.compute(), Err(HarmonicsError::NoMetrics)));

        analyzer.add_metric(MeanSquaredError);
        assert_eq!(analyzer.compute().unwrap().len(), 1);
    }

    #[test]
    fn test_second_reference_rejected() {
        let mut analyzer = ready();
        let err = analyzer.add_reference(image("other")).unwrap_err();
        assert!(matches!(err, HarmonicsError::ReferenceAlreadySet(name) if name == "ref"));
        assert_eq!(analyzer.reference().map(Image::name), Some("ref"));
    }

    #[test]
    fn test_debug_lists_settings_and_metrics() {
        let analyzer = ready();
        let rendered = format!("{analyzer:?}");
        assert!(rendered.contains("SRAnalyzerDefault"), "{rendered}");
        assert!(rendered.contains("MeanSquaredError"), "{rendered}");
    }

    #[test]
    fn test_compute_runs_once() {
        let mut analyzer = ready();
        let first = analyzer.compute().unwrap();
        assert!(analyzer.is_done());
        assert!(matches!(analyzer.compute(), Err(HarmonicsError::AlreadyComputed)));
        assert_eq!(first[0].value(), 0.0);
        assert_eq!(analyzer.candidates().len(), 1);
        assert_eq!(analyzer.metrics().len(), 1);
    }

    #[test]
    fn test_results_are_metric_major_with_provenance() {
        let mut analyzer = Analyzer::new();
        analyzer.add_reference(image("R")).unwrap();
        analyzer
            .add_candidate(image("A"))
            .add_candidate(image("B"))
            .add_metric(MeanSquaredError)
            .add_metric(HarmonicsRadius::default());

        let order: Vec<(String, String, String)> = analyzer
            .compute()
            .unwrap()
            .iter()
            .map(|r| {
                (
                    r.name().to_string(),
                    r.reference_name().to_string(),
                    r.candidate_name().to_string(),
                )
            })
            .collect();
        let expected = [
            ("mse", "R", "A"),
            ("mse", "R", "B"),
            ("harmonics_radius_95", "R", "A"),
            ("harmonics_radius_95", "R", "B"),
        ]
        .map(|(m, r, c)| (m.to_string(), r.to_string(), c.to_string()));
        assert_eq!(order, expected);
    }

    #[test]
    fn test_shape_mismatch_aborts_without_marking_done() {
        let mut analyzer = ready();
        let small =
            Image::derive(&image("small"), "small", Preprocess::Downsample { factor: 2 }).unwrap();
        analyzer.add_candidate(small);

        assert!(matches!(analyzer.compute(), Err(HarmonicsError::ShapeMismatch { .. })));
        assert!(!analyzer.is_done());
    }
}
