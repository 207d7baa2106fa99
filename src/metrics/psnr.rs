use super::squared_error::mean_squared_error;
use super::{image_pair, InputSpec, Metric, MetricInputs, MetricResult, IMAGE_PAIR};
use crate::error::Result;

/// `10 * log10(range^2 / mse)` where `range` is the reference's
/// `max - min`. Identical inputs give `+inf` dB.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeakSignalToNoiseRatio;

impl Metric for PeakSignalToNoiseRatio {
    fn name(&self) -> String {
        "psnr".to_string()
    }

    fn required_inputs(&self) -> &[InputSpec] {
        IMAGE_PAIR
    }

    fn calculate(&self, inputs: &MetricInputs<'_>) -> Result<MetricResult> {
        let (y_true, y_pred) = image_pair(self, inputs)?;
        let mse = mean_squared_error(y_true.data(), y_pred.data());
        let (lo, hi) = y_true.data().min_max();
        let value = psnr(mse, (hi - lo) as f64);
        Ok(MetricResult::new(self.name(), value, "dB"))
    }
}

pub fn psnr(mse: f64, data_range: f64) -> f64 {
    if mse == 0.0 {
        return f64::INFINITY;
    }
    10.0 * (data_range * data_range / mse).log10()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{Image, ImageData, TestPattern};

    #[test]
    fn test_identical_images_are_infinite() {
        let data = ImageData::create_test_pattern(16, 3, TestPattern::Rings);
        let image = Image::from_data(data, "rings", None).unwrap();
        let result = PeakSignalToNoiseRatio.compare(&image, &image).unwrap();
        assert!(result.value().is_infinite() && result.value() > 0.0);
        assert_eq!(result.unit(), "dB");
    }

    #[test]
    fn test_formula() {
        assert!((psnr(1.0, 255.0) - 48.130803608679).abs() < 1e-9);
        assert!((psnr(100.0, 100.0) - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_uses_reference_range() {
        let reference = ImageData::new(vec![0.0, 100.0, 0.0, 100.0], 2, 2, 1).unwrap();
        let candidate = ImageData::new(vec![10.0, 90.0, 10.0, 90.0], 2, 2, 1).unwrap();
        let a = Image::from_data(reference, "ref", None).unwrap();
        let b = Image::from_data(candidate, "cand", None).unwrap();
        let result = PeakSignalToNoiseRatio.compare(&a, &b).unwrap();
        // range 100, mse 100
        assert!((result.value() - 20.0).abs() < 1e-9);
    }
}
