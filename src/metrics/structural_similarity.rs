use super::ssim::structural_similarity;
use super::{image_pair, InputSpec, Metric, MetricInputs, MetricResult, IMAGE_PAIR};
use crate::error::Result;
use crate::image::loader::MAX_SAMPLE;
use crate::image::ImageData;

/// Pixel-domain SSIM, computed per channel on the 8-bit sample scale and
/// averaged across channels.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralSimilarity;

impl Metric for StructuralSimilarity {
    fn name(&self) -> String {
        "ssim".to_string()
    }

    fn required_inputs(&self) -> &[InputSpec] {
        IMAGE_PAIR
    }

    fn calculate(&self, inputs: &MetricInputs<'_>) -> Result<MetricResult> {
        let (y_true, y_pred) = image_pair(self, inputs)?;
        let value = mean_channel_ssim(y_true.data(), y_pred.data());
        Ok(MetricResult::new(self.name(), value, ""))
    }
}

fn mean_channel_ssim(a: &ImageData, b: &ImageData) -> f64 {
    let (width, height) = (a.width as usize, a.height as usize);
    let total: f64 = (0..a.channels)
        .map(|c| {
            let x: Vec<f64> = a.channel(c).into_iter().map(f64::from).collect();
            let y: Vec<f64> = b.channel(c).into_iter().map(f64::from).collect();
            structural_similarity(&x, &y, width, height, MAX_SAMPLE as f64)
        })
        .sum();
    total / a.channels as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{Image, Preprocess, TestPattern};

    #[test]
    fn test_self_similarity_is_one() {
        let data = ImageData::create_test_pattern(32, 3, TestPattern::Checkerboard { cell: 4 });
        let image = Image::from_data(data, "board", None).unwrap();
        let result = StructuralSimilarity.compare(&image, &image).unwrap();
        assert_eq!(result.value(), 1.0);
        assert_eq!(result.unit(), "");
    }

    #[test]
    fn test_blur_reduces_similarity() {
        let data = ImageData::create_test_pattern(32, 1, TestPattern::Checkerboard { cell: 2 });
        let sharp = Image::from_data(data, "sharp", None).unwrap();
        let blur = Preprocess::GaussianBlur { sigma: 2.0 };
        let blurred = Image::derive(&sharp, "blurred", blur).unwrap();
        let score = StructuralSimilarity.compare(&sharp, &blurred).unwrap().value();
        assert!(score < 0.9, "score {score}");
        assert!((-1.0..=1.0).contains(&score));
    }
}
