//! Pixel-domain metrics against their imageproc counterparts

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use harmonics_radius::{
    Image, ImageData, MeanSquaredError, Metric, PeakSignalToNoiseRatio, Preprocess,
    StructuralSimilarity, TestPattern,
};
use imageproc::stats::{peak_signal_to_noise_ratio, root_mean_squared_error};

fn benchmark_pixel_metrics(c: &mut Criterion) {
    let mut group = c.benchmark_group("pixel_metrics");
    group.sample_size(10);

    let reference = Image::from_data(
        ImageData::create_test_pattern(256, 3, TestPattern::Checkerboard { cell: 5 }),
        "reference",
        None,
    )
    .expect("reference image");
    let blurred = Image::derive(&reference, "blurred", Preprocess::GaussianBlur { sigma: 1.5 })
        .expect("blurred image");

    let reference_rgb = reference
        .data()
        .to_dynamic_image()
        .expect("8-bit reference")
        .to_rgb8();
    let blurred_rgb = blurred
        .data()
        .to_dynamic_image()
        .expect("8-bit candidate")
        .to_rgb8();

    group.bench_function("mse", |b| {
        b.iter(|| MeanSquaredError.compare(black_box(&reference), black_box(&blurred)))
    });
    group.bench_function("imageproc_rmse", |b| {
        b.iter(|| root_mean_squared_error(black_box(&reference_rgb), black_box(&blurred_rgb)))
    });
    group.bench_function("psnr", |b| {
        b.iter(|| PeakSignalToNoiseRatio.compare(black_box(&reference), black_box(&blurred)))
    });
    group.bench_function("imageproc_psnr", |b| {
        b.iter(|| peak_signal_to_noise_ratio(black_box(&reference_rgb), black_box(&blurred_rgb)))
    });
    group.bench_function("ssim", |b| {
        b.iter(|| StructuralSimilarity.compare(black_box(&reference), black_box(&blurred)))
    });

    group.finish();
}

criterion_group!(benches, benchmark_pixel_metrics);
criterion_main!(benches);
