mod common;

use common::init_logging;
use common::synthetic_image::textured_image;
use harmonics_radius::{
    Analyzer, HarmonicsError, HarmonicsRadius, HarmonicsRadiusConfig, Image, ImageData,
    MeanSquaredError, Metric, PeakSignalToNoiseRatio, Preprocess, RadiusReport, ResampleFilter,
    StructuralSimilarity, TestPattern,
};

fn uniform_gray() -> Image {
    Image::from_data(
        ImageData::create_test_pattern(64, 1, TestPattern::Uniform(128.0)),
        "gray",
        None,
    )
    .unwrap()
}

#[test]
fn scenario_a_uniform_self_mse_is_zero() {
    let image = uniform_gray();
    let result = MeanSquaredError.compare(&image, &image).unwrap();
    assert_eq!(result.value(), 0.0);
    assert_eq!(result.unit(), "px²");
}

#[test]
fn scenario_b_self_harmonics_radius_is_maximal() {
    let image = uniform_gray();
    assert_eq!(
        HarmonicsRadius::default().compare(&image, &image).unwrap().value(),
        100.0
    );

    let pixels = HarmonicsRadius::new(HarmonicsRadiusConfig {
        report: RadiusReport::Pixels,
        ..Default::default()
    })
    .unwrap();
    assert_eq!(pixels.compare(&image, &image).unwrap().value(), 32.0);

    let textured = textured_image(40, "textured");
    assert_eq!(
        HarmonicsRadius::default().compare(&textured, &textured).unwrap().value(),
        100.0
    );
}

#[test]
fn scenario_c_blur_shrinks_harmonics_radius() {
    init_logging();
    let reference = textured_image(64, "reference");
    let blurred =
        Image::derive(&reference, "blurred", Preprocess::GaussianBlur { sigma: 3.0 }).unwrap();

    let metric = HarmonicsRadius::default();
    let own = metric.compare(&reference, &reference).unwrap().value();
    let degraded = metric.compare(&reference, &blurred).unwrap().value();
    assert!(degraded < own, "blurred radius {degraded} not below {own}");
}

#[test]
fn scenario_d_results_are_metric_major() {
    let mut analyzer = Analyzer::new();
    analyzer.add_reference(textured_image(32, "R")).unwrap();
    analyzer
        .add_candidate(textured_image(32, "A"))
        .add_candidate(Image::derive(
            &textured_image(32, "src"),
            "B",
            Preprocess::GaussianBlur { sigma: 1.0 },
        )
        .unwrap())
        .add_metric(MeanSquaredError)
        .add_metric(HarmonicsRadius::default());

    let results = analyzer.compute().unwrap();
    let order: Vec<(&str, &str, &str)> = results
        .iter()
        .map(|r| (r.name(), r.reference_name(), r.candidate_name()))
        .collect();
    assert_eq!(
        order,
        [
            ("mse", "R", "A"),
            ("mse", "R", "B"),
            ("harmonics_radius_95", "R", "A"),
            ("harmonics_radius_95", "R", "B"),
        ]
    );
}

#[test]
fn results_cover_every_metric_candidate_pair_once() {
    let reference = textured_image(32, "hr");
    let low = Image::derive(&reference, "lr", Preprocess::Downsample { factor: 2 }).unwrap();

    let mut analyzer = Analyzer::new();
    for (name, filter) in [
        ("nearest", ResampleFilter::Nearest),
        ("linear", ResampleFilter::Linear),
        ("bicubic", ResampleFilter::Bicubic),
    ] {
        analyzer.add_candidate(
            Image::derive(&low, name, Preprocess::Upscale { factor: 2, filter }).unwrap(),
        );
    }
    analyzer.add_reference(reference).unwrap();
    analyzer
        .add_metric(HarmonicsRadius::default())
        .add_metric(MeanSquaredError)
        .add_metric(StructuralSimilarity)
        .add_metric(PeakSignalToNoiseRatio);

    let results = analyzer.compute().unwrap();
    assert_eq!(results.len(), 12);
    assert!(results.iter().all(|r| r.reference_name() == "hr"));
    assert!(results.iter().all(|r| r.value().is_finite()));

    let candidates: Vec<&str> = results[..3].iter().map(|r| r.candidate_name()).collect();
    assert_eq!(candidates, ["nearest", "linear", "bicubic"]);
}

#[test]
fn second_compute_fails_and_first_results_survive() {
    let mut analyzer = Analyzer::new();
    analyzer.add_reference(textured_image(16, "R")).unwrap();
    analyzer.add_candidate(textured_image(16, "A"));
    analyzer.add_metric(MeanSquaredError);

    let first = analyzer.compute().unwrap();
    let snapshot = first.clone();
    assert!(matches!(analyzer.compute(), Err(HarmonicsError::AlreadyComputed)));
    assert_eq!(first, snapshot);
    assert_eq!(analyzer.reference().map(Image::name), Some("R"));
}

#[test]
fn mismatched_candidate_aborts_compute() {
    let reference = textured_image(32, "R");
    let cropped = Image::derive(
        &reference,
        "cropped",
        Preprocess::Crop {
            x: 0,
            y: 0,
            width: 30,
            height: 32,
        },
    )
    .unwrap();

    let mut analyzer = Analyzer::new();
    analyzer.add_reference(reference.clone()).unwrap();
    analyzer.add_candidate(reference).add_candidate(cropped);
    analyzer.add_metric(StructuralSimilarity);

    assert!(matches!(analyzer.compute(), Err(HarmonicsError::ShapeMismatch { .. })));
    assert!(!analyzer.is_done());
}

#[test]
fn saved_image_round_trips_losslessly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("textured.png");

    let original = textured_image(24, "original");
    original.save(&path).unwrap();
    let reloaded = Image::open(&path, "reloaded").unwrap();

    assert_eq!(reloaded.shape(), original.shape());
    assert_eq!(reloaded.path(), Some(path.as_path()));
    assert_eq!(MeanSquaredError.compare(&original, &reloaded).unwrap().value(), 0.0);
}

#[test]
fn unwritable_path_is_encode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.png");
    let err = textured_image(8, "x").save(&path).unwrap_err();
    assert!(matches!(err, HarmonicsError::Encode { .. }));
}
