//! Compare classical upscalers against a reference image.
//!
//! The reference is halved with a block average and brought back to full
//! size with nearest, linear and bicubic resampling. Every candidate is then
//! scored with all four metrics.
//!
//! Usage: `cargo run --example compare_upscalers [IMAGE] [SPECTRA_DIR]`
//! Without an image a synthetic ring pattern is used. With a spectra
//! directory the log-magnitude spectrum of each image is written there.

use harmonics_radius::{
    Analyzer, AnalyzerSettings, HarmonicsRadius, Image, ImageData, MeanSquaredError,
    PeakSignalToNoiseRatio, Preprocess, ResampleFilter, StructuralSimilarity, TestPattern,
};
use std::path::PathBuf;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let mut args = std::env::args().skip(1);

    let reference = match args.next() {
        Some(path) => Image::open(&path, "high_resolution")?,
        None => Image::from_data(
            ImageData::create_test_pattern(256, 3, TestPattern::Rings),
            "high_resolution",
            None,
        )?,
    };
    let spectra_dir = args.next().map(PathBuf::from);

    let shape = reference.shape();
    let low = Image::derive(&reference, "low_resolution", Preprocess::Downsample { factor: 2 })?;
    let candidates = [
        ("zero_order_upscaled", ResampleFilter::Nearest),
        ("linear_upscaled", ResampleFilter::Linear),
        ("bicubic_upscaled", ResampleFilter::Bicubic),
    ]
    .into_iter()
    .map(|(name, filter)| {
        // Odd sizes lose a row or column when halved; resize back exactly.
        Image::derive(
            &low,
            name,
            Preprocess::ResizeTo {
                width: shape.width as u32,
                height: shape.height as u32,
                filter,
            },
        )
    })
    .collect::<Result<Vec<_>, _>>()?;

    if let Some(dir) = &spectra_dir {
        std::fs::create_dir_all(dir)?;
        for image in std::iter::once(&reference).chain(&candidates) {
            let path = dir.join(format!("{}_spectrum.png", image.name()));
            image.spectrum()?.save(&path)?;
            println!("Saved {}", path.display());
        }
    }

    let mut analyzer = Analyzer::with_settings(AnalyzerSettings {
        name: "SuperResolution Example".to_string(),
    });
    analyzer.add_reference(reference)?;
    for candidate in candidates {
        analyzer.add_candidate(candidate);
    }
    analyzer
        .add_metric(HarmonicsRadius::default())
        .add_metric(MeanSquaredError)
        .add_metric(StructuralSimilarity)
        .add_metric(PeakSignalToNoiseRatio);

    let start_time = Instant::now();
    let results = analyzer.compute()?;
    let elapsed_time = start_time.elapsed();

    println!("Reference shape: {shape}");
    for result in &results {
        println!("{result}");
    }
    println!("Computed {} results in {:?}", results.len(), elapsed_time);

    Ok(())
}
