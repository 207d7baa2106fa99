//! Named preprocessing steps applied once when an [`Image`](super::Image) is built.

use crate::error::{HarmonicsError, Result};
use crate::image::loader::{ImageData, MAX_SAMPLE};
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Luma};
use log::debug;
use serde::{Deserialize, Serialize};

/// Resampling kernel used by [`Preprocess::ResizeTo`] and [`Preprocess::Upscale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResampleFilter {
    Nearest,
    Linear,
    Bicubic,
    Lanczos,
}

impl ResampleFilter {
    fn filter_type(self) -> FilterType {
        match self {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Linear => FilterType::Triangle,
            ResampleFilter::Bicubic => FilterType::CatmullRom,
            ResampleFilter::Lanczos => FilterType::Lanczos3,
        }
    }
}

/// A transformation producing a new logical buffer from a source buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Preprocess {
    /// Resample to an exact size.
    ResizeTo {
        width: u32,
        height: u32,
        filter: ResampleFilter,
    },
    /// Multiply both dimensions by `factor`.
    Upscale { factor: u32, filter: ResampleFilter },
    /// Divide both dimensions by `factor`, averaging each block.
    Downsample { factor: u32 },
    /// Reverse the channel order (RGB <-> BGR).
    ChannelSwap,
    /// Keep the `width x height` region whose top-left corner is `(x, y)`.
    Crop {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// Low-pass the buffer with a separable Gaussian.
    GaussianBlur { sigma: f32 },
    /// Apply each step in order.
    Chain { steps: Vec<Preprocess> },
}

impl Preprocess {
    pub fn apply(&self, source: &ImageData) -> Result<ImageData> {
        let output = match self {
            Preprocess::ResizeTo {
                width,
                height,
                filter,
            } => resize(source, *width, *height, *filter)?,
            Preprocess::Upscale { factor, filter } => {
                if *factor == 0 {
                    return Err(HarmonicsError::InvalidPreprocess(
                        "upscale factor must be positive".to_string(),
                    ));
                }
                let scaled = source
                    .width
                    .checked_mul(*factor)
                    .zip(source.height.checked_mul(*factor));
                let Some((width, height)) = scaled else {
                    return Err(HarmonicsError::InvalidPreprocess(format!(
                        "upscaling {}x{} by {factor} overflows",
                        source.width, source.height
                    )));
                };
                resize(source, width, height, *filter)?
            }
            Preprocess::Downsample { factor } => source.compress(*factor)?,
            Preprocess::ChannelSwap => {
                let channels = source.channels as usize;
                let data = source
                    .data
                    .chunks_exact(channels)
                    .flat_map(|px| px.iter().rev().copied())
                    .collect();
                ImageData::new(data, source.width, source.height, source.channels)?
            }
            Preprocess::Crop {
                x,
                y,
                width,
                height,
            } => crop(source, *x, *y, *width, *height)?,
            Preprocess::GaussianBlur { sigma } => {
                if !sigma.is_finite() || *sigma < 0.0 {
                    return Err(HarmonicsError::InvalidPreprocess(format!(
                        "blur sigma must be a non-negative number, got {sigma}"
                    )));
                }
                source.gaussian_blur(*sigma)
            }
            Preprocess::Chain { steps } => {
                let mut current = source.clone();
                for step in steps {
                    current = step.apply(&current)?;
                }
                current
            }
        };

        debug!("{:?}: {} -> {}", self, source.shape(), output.shape());
        Ok(output)
    }
}

fn resize(
    source: &ImageData,
    width: u32,
    height: u32,
    filter: ResampleFilter,
) -> Result<ImageData> {
    if width == 0 || height == 0 {
        return Err(HarmonicsError::InvalidPreprocess(format!(
            "cannot resize to {width}x{height}"
        )));
    }

    // Float subpixels are clamped to [0, 1] by the resampler.
    let planes = (0..source.channels)
        .map(|c| -> Result<Vec<f32>> {
            let plane: Vec<f32> = source.channel(c).iter().map(|v| v / MAX_SAMPLE).collect();
            let buffer: ImageBuffer<Luma<f32>, Vec<f32>> =
                ImageBuffer::from_raw(source.width, source.height, plane).ok_or_else(|| {
                    HarmonicsError::InvalidPreprocess("channel plane size mismatch".to_string())
                })?;
            let resized = imageops::resize(&buffer, width, height, filter.filter_type());
            Ok(resized.into_raw().into_iter().map(|v| v * MAX_SAMPLE).collect())
        })
        .collect::<Result<Vec<_>>>()?;

    ImageData::from_planes(&planes, width, height)
}

fn crop(source: &ImageData, x: u32, y: u32, width: u32, height: u32) -> Result<ImageData> {
    if width == 0
        || height == 0
        || x.saturating_add(width) > source.width
        || y.saturating_add(height) > source.height
    {
        return Err(HarmonicsError::InvalidPreprocess(format!(
            "crop {width}x{height} at ({x}, {y}) exceeds {}x{}",
            source.width, source.height
        )));
    }

    let channels = source.channels as usize;
    let row_len = width as usize * channels;
    let mut data = Vec::with_capacity(row_len * height as usize);
    for row in y..y + height {
        let start = (row as usize * source.width as usize + x as usize) * channels;
        data.extend_from_slice(&source.data[start..start + row_len]);
    }

    ImageData::new(data, width, height, source.channels)
}
