//! Frequency transform: pixel buffer to centred, log-scaled magnitude spectrum.
//!
//! The transform runs at the buffer's native size (no padding to a "fast"
//! length), so spectrum coordinates map one-to-one onto pixel coordinates and
//! the zero-frequency coefficient lands at `(rows / 2, cols / 2)`.

use crate::error::{HarmonicsError, Result};
use crate::image::loader::{ImageData, Shape};
use image::GrayImage;
use log::debug;
use rustfft::{num_complex::Complex, FftPlanner};
use std::path::Path;

/// Centred `ln(1 + |F|)` magnitude spectrum of a single-channel reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    data: Vec<f64>,
    width: usize,
    height: usize,
}

impl Spectrum {
    /// Wrap precomputed magnitudes laid out row-major.
    pub fn from_raw(data: Vec<f64>, width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(HarmonicsError::EmptyImage);
        }
        if data.len() != width * height {
            return Err(HarmonicsError::ShapeMismatch {
                expected: Shape::new(height, width, 1),
                actual: Shape::new(data.len() / width.max(1), width, 1),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn shape(&self) -> Shape {
        Shape::new(self.height, self.width, 1)
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.width + col]
    }

    /// Position of the zero-frequency coefficient as `(row, col)`.
    pub fn center(&self) -> (usize, usize) {
        (self.height / 2, self.width / 2)
    }

    pub fn min_max(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// `max - min` over the whole spectrum.
    pub fn range(&self) -> f64 {
        let (lo, hi) = self.min_max();
        hi - lo
    }

    /// Square window of side `2 * half` around [`Spectrum::center`], row-major.
    ///
    /// Rows and columns span `center - half .. center + half`. Returns `None`
    /// when that span leaves the array.
    pub fn centered_window(&self, half: usize) -> Option<Vec<f64>> {
        let (row, col) = self.center();
        if half > row || half > col || row + half > self.height || col + half > self.width {
            return None;
        }

        let side = 2 * half;
        let mut window = Vec::with_capacity(side * side);
        for r in row - half..row + half {
            let start = r * self.width + col - half;
            window.extend_from_slice(&self.data[start..start + side]);
        }
        Some(window)
    }

    /// Copy of the `height x width` block whose top-left corner is
    /// `(row, col)`, for searching a sub-band of the spectrum.
    pub fn region(&self, row: usize, col: usize, height: usize, width: usize) -> Result<Spectrum> {
        let fits = row
            .checked_add(height)
            .zip(col.checked_add(width))
            .is_some_and(|(bottom, right)| bottom <= self.height && right <= self.width);
        if height == 0 || width == 0 || !fits {
            return Err(HarmonicsError::RegionOutOfBounds {
                row,
                col,
                height,
                width,
                extent: self.shape(),
            });
        }

        let mut data = Vec::with_capacity(height * width);
        for r in row..row + height {
            let start = r * self.width + col;
            data.extend_from_slice(&self.data[start..start + width]);
        }
        Spectrum::from_raw(data, width, height)
    }

    /// Min-max normalised 8-bit rendering for inspection.
    pub fn to_luma_image(&self) -> GrayImage {
        let (lo, hi) = self.min_max();
        let scale = if hi > lo { 255.0 / (hi - lo) } else { 0.0 };
        let bytes = self
            .data
            .iter()
            .map(|&v| ((v - lo) * scale).round().clamp(0.0, 255.0) as u8)
            .collect();
        // Dimensions and length are tied together by construction.
        GrayImage::from_raw(self.width as u32, self.height as u32, bytes)
            .unwrap_or_else(|| GrayImage::new(self.width as u32, self.height as u32))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.to_luma_image()
            .save(path)
            .map_err(|source| HarmonicsError::Encode {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// Spectrum of any buffer: luma reduction, 2D DFT magnitude, `ln(1 + m)`,
/// then quadrant swap so DC sits at the centre.
pub fn transform(image: &ImageData) -> Result<Spectrum> {
    let gray = image.to_luma();
    let (width, height) = (gray.width as usize, gray.height as usize);
    let samples: Vec<f64> = gray.data.iter().map(|&v| v as f64).collect();

    let frequencies = fft_2d_real(&samples, width, height)?;
    let magnitudes: Vec<f64> = frequencies.iter().map(|c| c.norm().ln_1p()).collect();
    let data = fft_shift(&magnitudes, width, height);

    debug!("Computed {}x{} spectrum", height, width);
    Spectrum::from_raw(data, width, height)
}

/// Compute 2D FFT of real data
pub fn fft_2d_real(data: &[f64], width: usize, height: usize) -> Result<Vec<Complex<f64>>> {
    if width == 0 || height == 0 {
        return Err(HarmonicsError::EmptyImage);
    }
    if data.len() != width * height {
        return Err(HarmonicsError::ShapeMismatch {
            expected: Shape::new(height, width, 1),
            actual: Shape::new(data.len() / width, width, 1),
        });
    }

    let mut planner = FftPlanner::new();

    // Convert real data to complex
    let mut complex_data: Vec<Complex<f64>> = data.iter().map(|&x| Complex::new(x, 0.0)).collect();

    // Apply FFT in horizontal direction
    let fft_width = planner.plan_fft_forward(width);
    complex_data
        .chunks_exact_mut(width)
        .for_each(|row| fft_width.process(row));

    // Transpose for vertical processing
    let mut transposed = vec![Complex::new(0.0, 0.0); width * height];
    (0..height).flat_map(|y| (0..width).map(move |x| (y, x)))
        .for_each(|(y, x)| {
            transposed[x * height + y] = complex_data[y * width + x];
        });

    // Apply FFT in vertical direction
    let fft_height = planner.plan_fft_forward(height);
    transposed
        .chunks_exact_mut(height)
        .for_each(|col| fft_height.process(col));

    // Transpose back
    let mut result = vec![Complex::new(0.0, 0.0); width * height];
    (0..height).flat_map(|y| (0..width).map(move |x| (y, x)))
        .for_each(|(y, x)| {
            result[y * width + x] = transposed[x * height + y];
        });

    Ok(result)
}

/// Move index 0 to `n / 2` along both axes (odd sizes included).
pub fn fft_shift<T: Copy>(data: &[T], width: usize, height: usize) -> Vec<T> {
    let (shift_x, shift_y) = (width / 2, height / 2);
    let mut shifted = data.to_vec();
    for y in 0..height {
        let dst_y = (y + shift_y) % height;
        for x in 0..width {
            let dst_x = (x + shift_x) % width;
            shifted[dst_y * width + dst_x] = data[y * width + x];
        }
    }
    shifted
}
