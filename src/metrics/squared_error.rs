use super::{image_pair, InputSpec, Metric, MetricInputs, MetricResult, IMAGE_PAIR};
use crate::error::Result;
use crate::image::ImageData;

/// Mean of per-sample squared differences over every channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSquaredError;

impl Metric for MeanSquaredError {
    fn name(&self) -> String {
        "mse".to_string()
    }

    fn required_inputs(&self) -> &[InputSpec] {
        IMAGE_PAIR
    }

    fn calculate(&self, inputs: &MetricInputs<'_>) -> Result<MetricResult> {
        let (y_true, y_pred) = image_pair(self, inputs)?;
        let value = mean_squared_error(y_true.data(), y_pred.data());
        Ok(MetricResult::new(self.name(), value, "px²"))
    }
}

/// Callers guarantee equal shapes.
pub fn mean_squared_error(a: &ImageData, b: &ImageData) -> f64 {
    if a.data.is_empty() {
        return 0.0;
    }
    let sum: f64 = a
        .data
        .iter()
        .zip(&b.data)
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum();
    sum / a.data.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{Image, TestPattern};

    #[test]
    fn test_uniform_self_comparison_is_zero() {
        let data = ImageData::create_test_pattern(64, 3, TestPattern::Uniform(128.0));
        let image = Image::from_data(data, "gray", None).unwrap();
        let result = MeanSquaredError.compare(&image, &image).unwrap();
        assert_eq!(result.value(), 0.0);
        assert_eq!(result.unit(), "px²");
        assert_eq!(result.name(), "mse");
    }

    #[test]
    fn test_known_difference() {
        let a = ImageData::new(vec![0.0, 10.0, 20.0, 30.0], 2, 2, 1).unwrap();
        let b = ImageData::new(vec![1.0, 12.0, 17.0, 30.0], 2, 2, 1).unwrap();
        // (1 + 4 + 9 + 0) / 4
        assert!((mean_squared_error(&a, &b) - 3.5).abs() < 1e-12);
        assert_eq!(mean_squared_error(&a, &b), mean_squared_error(&b, &a));
    }
}
