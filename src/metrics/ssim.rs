//! Windowed structural similarity over a single plane.
//!
//! Local statistics come from a uniform `window x window` filter with sample
//! covariance, and the score is the mean over every window position that
//! lies fully inside the plane.

/// Side of the uniform filter when the plane is large enough.
pub const DEFAULT_WINDOW: usize = 7;
pub const K1: f64 = 0.01;
pub const K2: f64 = 0.03;

/// Largest odd window not exceeding [`DEFAULT_WINDOW`] or the plane's shorter side.
pub fn window_size(width: usize, height: usize) -> usize {
    let side = DEFAULT_WINDOW.min(width).min(height);
    if side % 2 == 0 {
        side.saturating_sub(1)
    } else {
        side
    }
}

/// Mean SSIM between two row-major planes of identical size.
///
/// `data_range` sets the stabilising constants `C1 = (K1 * L)^2` and
/// `C2 = (K2 * L)^2`. Positions where both numerator and denominator vanish
/// (flat, zero-range input) count as identical.
pub fn structural_similarity(
    x: &[f64],
    y: &[f64],
    width: usize,
    height: usize,
    data_range: f64,
) -> f64 {
    debug_assert_eq!(x.len(), width * height);
    debug_assert_eq!(y.len(), width * height);

    let win = window_size(width, height);
    if win == 0 {
        return if x == y { 1.0 } else { 0.0 };
    }

    let np = (win * win) as f64;
    let cov_norm = if np > 1.0 { np / (np - 1.0) } else { 1.0 };
    let c1 = (K1 * data_range).powi(2);
    let c2 = (K2 * data_range).powi(2);

    let sum_x = SummedArea::new(width, height, |i| x[i]);
    let sum_y = SummedArea::new(width, height, |i| y[i]);
    let sum_xx = SummedArea::new(width, height, |i| x[i] * x[i]);
    let sum_yy = SummedArea::new(width, height, |i| y[i] * y[i]);
    let sum_xy = SummedArea::new(width, height, |i| x[i] * y[i]);

    let mut total = 0.0;
    let mut count = 0usize;
    for row in 0..=height - win {
        for col in 0..=width - win {
            let ux = sum_x.window(row, col, win) / np;
            let uy = sum_y.window(row, col, win) / np;
            let uxx = sum_xx.window(row, col, win) / np;
            let uyy = sum_yy.window(row, col, win) / np;
            let uxy = sum_xy.window(row, col, win) / np;

            let vx = cov_norm * (uxx - ux * ux);
            let vy = cov_norm * (uyy - uy * uy);
            let vxy = cov_norm * (uxy - ux * uy);

            let numerator = (2.0 * ux * uy + c1) * (2.0 * vxy + c2);
            let denominator = (ux * ux + uy * uy + c1) * (vx + vy + c2);
            total += if denominator == 0.0 {
                if numerator == 0.0 {
                    1.0
                } else {
                    0.0
                }
            } else {
                numerator / denominator
            };
            count += 1;
        }
    }

    total / count as f64
}

/// Inclusive prefix sums with a zero border row and column.
struct SummedArea {
    table: Vec<f64>,
    stride: usize,
}

impl SummedArea {
    fn new(width: usize, height: usize, value: impl Fn(usize) -> f64) -> Self {
        let stride = width + 1;
        let mut table = vec![0.0; stride * (height + 1)];
        for row in 0..height {
            let mut row_sum = 0.0;
            for col in 0..width {
                row_sum += value(row * width + col);
                table[(row + 1) * stride + col + 1] = table[row * stride + col + 1] + row_sum;
            }
        }
        Self { table, stride }
    }

    fn window(&self, row: usize, col: usize, size: usize) -> f64 {
        let (r0, c0, r1, c1) = (row, col, row + size, col + size);
        self.table[r1 * self.stride + c1] - self.table[r0 * self.stride + c1]
            - self.table[r1 * self.stride + c0]
            + self.table[r0 * self.stride + c0]
    }
}
