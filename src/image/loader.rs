use crate::error::{HarmonicsError, Result};
use image::{DynamicImage, GrayImage, ImageBuffer, RgbImage, RgbaImage};
use log::debug;
use std::fmt;
use std::path::Path;

/// ITU-R BT.601 luma weights applied as `R, G, B`.
///
/// Every spectral and single-channel comparison goes through this one
/// reduction so both operands of a metric are reduced identically.
pub const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Largest sample value of the 8-bit scale buffers are stored on.
pub const MAX_SAMPLE: f32 = 255.0;

/// Dimensions of a pixel buffer as `height x width x channels`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub height: usize,
    pub width: usize,
    pub channels: usize,
}

impl Shape {
    pub fn new(height: usize, width: usize, channels: usize) -> Self {
        Self {
            height,
            width,
            channels,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.height, self.width, self.channels)
    }
}

/// How a file is decoded into an [`ImageData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Three channels in RGB order; alpha is dropped and gray files are expanded.
    #[default]
    Color,
    /// One channel reduced with [`LUMA_WEIGHTS`].
    Grayscale,
}

/// Synthetic patterns for tests and benchmarks.
#[derive(Debug, Clone, Copy)]
pub enum TestPattern {
    /// Every sample set to the given value.
    Uniform(f32),
    /// Alternating black and white squares of `cell` pixels.
    Checkerboard { cell: u32 },
    /// Concentric rings whose spacing shrinks outwards, so energy spreads
    /// across low and high frequencies.
    Rings,
}

/// Row-major, channel-last sample buffer on the 0-255 scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub data: Vec<f32>,
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

impl ImageData {
    /// Wrap raw samples, checking that the length matches the dimensions.
    pub fn new(data: Vec<f32>, width: u32, height: u32, channels: u32) -> Result<Self> {
        let expected = width as usize * height as usize * channels as usize;
        if expected == 0 {
            return Err(HarmonicsError::EmptyImage);
        }
        if data.len() != expected {
            return Err(HarmonicsError::InvalidPreprocess(format!(
                "buffer holds {} samples but {}x{}x{} needs {}",
                data.len(),
                height,
                width,
                channels,
                expected
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Load an image from file.
    pub fn from_file<P: AsRef<Path>>(path: P, mode: DecodeMode) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| HarmonicsError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let data = Self::from_dynamic_image(img, mode)?;
        debug!(
            "Decoded {} as {} ({:?})",
            path.display(),
            data.shape(),
            mode
        );
        Ok(data)
    }

    /// Convert a decoded `DynamicImage` into samples on the 0-255 scale.
    pub fn from_dynamic_image(img: DynamicImage, mode: DecodeMode) -> Result<Self> {
        let (width, height) = (img.width(), img.height());

        match (mode, img) {
            (DecodeMode::Grayscale, DynamicImage::ImageLuma8(img)) => {
                let data = img.pixels().map(|pixel| pixel[0] as f32).collect();
                Self::new(data, width, height, 1)
            }
            (DecodeMode::Grayscale, img) => {
                let data = img
                    .to_rgb8()
                    .pixels()
                    .map(|pixel| luma(pixel[0] as f32, pixel[1] as f32, pixel[2] as f32))
                    .collect();
                Self::new(data, width, height, 1)
            }
            (DecodeMode::Color, img) => {
                let data = img
                    .to_rgb8()
                    .pixels()
                    .flat_map(|pixel| pixel.0.map(|v| v as f32))
                    .collect();
                Self::new(data, width, height, 3)
            }
        }
    }

    /// Create a synthetic square image (useful for tests and benchmarking)
    pub fn create_test_pattern(size: u32, channels: u32, pattern: TestPattern) -> Self {
        let mut data = vec![0.0; (size * size * channels) as usize];
        let centre = size as f32 / 2.0;

        for y in 0..size {
            for x in 0..size {
                let value = match pattern {
                    TestPattern::Uniform(value) => value,
                    TestPattern::Checkerboard { cell } => {
                        let cell = cell.max(1);
                        if ((x / cell) + (y / cell)) % 2 == 0 {
                            MAX_SAMPLE
                        } else {
                            0.0
                        }
                    }
                    TestPattern::Rings => {
                        let dx = x as f32 - centre;
                        let dy = y as f32 - centre;
                        let r2 = (dx * dx + dy * dy) / size as f32;
                        127.5 * (1.0 + (r2 * std::f32::consts::PI).cos())
                    }
                };
                let base = ((y * size + x) * channels) as usize;
                data[base..base + channels as usize].fill(value);
            }
        }

        Self {
            data,
            width: size,
            height: size,
            channels,
        }
    }

    pub fn shape(&self) -> Shape {
        Shape::new(
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }

    /// Sample at column `x`, row `y`, channel `c`.
    pub fn sample(&self, x: u32, y: u32, c: u32) -> f32 {
        self.data[((y * self.width + x) * self.channels + c) as usize]
    }

    /// Copy one channel out as a contiguous plane.
    pub fn channel(&self, c: u32) -> Vec<f32> {
        self.data
            .iter()
            .skip(c as usize)
            .step_by(self.channels as usize)
            .copied()
            .collect()
    }

    /// Interleave equally sized planes back into a channel-last buffer.
    pub fn from_planes(planes: &[Vec<f32>], width: u32, height: u32) -> Result<Self> {
        let channels = planes.len();
        let mut data = vec![0.0; width as usize * height as usize * channels];
        for (c, plane) in planes.iter().enumerate() {
            for (i, &value) in plane.iter().enumerate() {
                data[i * channels + c] = value;
            }
        }
        Self::new(data, width, height, channels as u32)
    }

    /// Single intensity channel via [`LUMA_WEIGHTS`].
    ///
    /// One-channel buffers are returned unchanged; two-channel (gray + alpha)
    /// buffers keep the gray channel; alpha is ignored for four channels.
    pub fn to_luma(&self) -> ImageData {
        let data = match self.channels {
            1 => return self.clone(),
            2 => self.channel(0),
            _ => self
                .data
                .chunks_exact(self.channels as usize)
                .map(|px| luma(px[0], px[1], px[2]))
                .collect(),
        };

        ImageData {
            data,
            width: self.width,
            height: self.height,
            channels: 1,
        }
    }

    /// Smallest and largest sample.
    pub fn min_max(&self) -> (f32, f32) {
        self.data
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Separable Gaussian blur applied to every channel independently
    ///
    /// The kernel never spans more than twice the longer side; wider taps
    /// would only resample clamped edge pixels.
    pub fn gaussian_blur(&self, sigma: f32) -> ImageData {
        if sigma <= 0.0 {
            return self.clone();
        }

        let widest = 2 * self.width.max(self.height) as usize + 1;
        let kernel_size = (((sigma * 6.0) as usize).max(3) | 1).min(widest); // Ensure odd
        let kernel = Self::generate_gaussian_kernel(kernel_size, sigma);
        let weight_sum: f32 = kernel.iter().sum();
        let half = kernel_size as i32 / 2;
        let (width, height, channels) =
            (self.width as i32, self.height as i32, self.channels as usize);
        let index = |x: i32, y: i32| (y * width + x) as usize * channels;

        // Horizontal pass
        let mut horizontal = vec![0.0; self.data.len()];
        (0..height).flat_map(|y| (0..width).map(move |x| (y, x)))
            .for_each(|(y, x)| {
                for c in 0..channels {
                    let mut sum = 0.0;
                    for (i, &weight) in kernel.iter().enumerate() {
                        let sample_x = (x + i as i32 - half).clamp(0, width - 1);
                        sum += self.data[index(sample_x, y) + c] * weight;
                    }
                    horizontal[index(x, y) + c] = sum / weight_sum;
                }
            });

        // Vertical pass
        let mut data = vec![0.0; self.data.len()];
        (0..height).flat_map(|y| (0..width).map(move |x| (y, x)))
            .for_each(|(y, x)| {
                for c in 0..channels {
                    let mut sum = 0.0;
                    for (i, &weight) in kernel.iter().enumerate() {
                        let sample_y = (y + i as i32 - half).clamp(0, height - 1);
                        sum += horizontal[index(x, sample_y) + c] * weight;
                    }
                    data[index(x, y) + c] = sum / weight_sum;
                }
            });

        ImageData {
            data,
            width: self.width,
            height: self.height,
            channels: self.channels,
        }
    }

    fn generate_gaussian_kernel(size: usize, sigma: f32) -> Vec<f32> {
        let mut kernel = vec![0.0; size];
        let centre = size / 2;
        let variance = sigma * sigma;

        for (i, value) in kernel.iter_mut().enumerate().take(size) {
            let x = i as i32 - centre as i32;
            *value = (-(x * x) as f32 / (2.0 * variance)).exp();
        }

        kernel
    }

    /// Shrinks the image by an integer factor, averaging pixels in blocks
    pub fn compress(&self, factor: u32) -> Result<ImageData> {
        if factor == 0 {
            return Err(HarmonicsError::InvalidPreprocess(
                "downsample factor must be positive".to_string(),
            ));
        }
        if factor == 1 {
            return Ok(self.clone());
        }

        let new_width = self.width / factor;
        let new_height = self.height / factor;
        let channels = self.channels;
        let mut compressed_data = vec![0.0f32; (new_width * new_height * channels) as usize];

        for ny in 0..new_height {
            for nx in 0..new_width {
                for c in 0..channels {
                    let mut sum = 0.0f32;
                    for fy in 0..factor {
                        for fx in 0..factor {
                            sum += self.sample(nx * factor + fx, ny * factor + fy, c);
                        }
                    }
                    let new_idx = ((ny * new_width + nx) * channels + c) as usize;
                    compressed_data[new_idx] = sum / (factor * factor) as f32;
                }
            }
        }

        ImageData::new(compressed_data, new_width, new_height, channels)
    }

    /// Quantise back to 8 bits.
    pub fn to_dynamic_image(&self) -> Result<DynamicImage> {
        let bytes: Vec<u8> = self
            .data
            .iter()
            .map(|&v| v.round().clamp(0.0, MAX_SAMPLE) as u8)
            .collect();
        let (w, h) = (self.width, self.height);
        let unsupported = || {
            HarmonicsError::InvalidPreprocess(format!(
                "cannot encode a buffer with {} channels",
                self.channels
            ))
        };

        let img = match self.channels {
            1 => DynamicImage::ImageLuma8(
                GrayImage::from_raw(w, h, bytes).ok_or_else(unsupported)?,
            ),
            2 => DynamicImage::ImageLumaA8(
                ImageBuffer::from_raw(w, h, bytes).ok_or_else(unsupported)?,
            ),
            3 => DynamicImage::ImageRgb8(RgbImage::from_raw(w, h, bytes).ok_or_else(unsupported)?),
            4 => DynamicImage::ImageRgba8(
                RgbaImage::from_raw(w, h, bytes).ok_or_else(unsupported)?,
            ),
            _ => return Err(unsupported()),
        };
        Ok(img)
    }

    /// Encode to file; the format follows the path's extension.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.to_dynamic_image()?
            .save(path)
            .map_err(|source| HarmonicsError::Encode {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("Saved {} to {}", self.shape(), path.display());
        Ok(())
    }
}

fn luma(r: f32, g: f32, b: f32) -> f32 {
    LUMA_WEIGHTS[0] * r + LUMA_WEIGHTS[1] * g + LUMA_WEIGHTS[2] * b
}
