use clap::{Parser, ValueEnum};
use harmonics_radius::{
    sr_companion_path, Analyzer, AnalyzerSettings, FailurePolicy, HarmonicsError,
    HarmonicsRadius, HarmonicsRadiusConfig, Image, InitialSize, MeanSquaredError, Metric,
    PeakSignalToNoiseRatio, RadiusReport, Result, ResultRecord, StructuralSimilarity,
};
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "harmonics-radius")]
#[command(version, about = "Compare a predicted image against a reference", long_about = None)]
struct Cli {
    /// Path to the true (reference) image
    #[arg(short = 't', long = "true", value_name = "FILE")]
    true_image: PathBuf,

    /// Path to the predicted image
    #[arg(
        short,
        long,
        value_name = "FILE",
        required_unless_present = "sr_companion"
    )]
    predicted: Option<PathBuf>,

    /// Use `<true>_sr.png` as the predicted image
    #[arg(long, conflicts_with = "predicted")]
    sr_companion: bool,

    /// Metrics to compute, in output order
    #[arg(
        long,
        value_enum,
        value_delimiter = ',',
        default_values_t = [MetricKind::Hri, MetricKind::Mse, MetricKind::Ssim, MetricKind::Psnr]
    )]
    metrics: Vec<MetricKind>,

    /// Harmonics radius settings as JSON; flags below override it
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// SSIM a spectral window must exceed
    #[arg(long, value_name = "FLOAT")]
    threshold: Option<f64>,

    /// Smallest window side tried before giving up
    #[arg(long, value_name = "N")]
    min_grid_size: Option<usize>,

    /// Window side decrement per iteration
    #[arg(long, value_name = "N")]
    step: Option<usize>,

    #[arg(long, value_enum)]
    initial_size: Option<InitialSizeArg>,

    #[arg(long, value_enum)]
    report: Option<ReportArg>,

    /// Radius reported when no window passes
    #[arg(long, value_enum)]
    on_failure: Option<FailureArg>,

    /// Print results as a JSON array of records
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MetricKind {
    Hri,
    Mse,
    Ssim,
    Psnr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InitialSizeArg {
    ShorterSide,
    HalfFirstDimension,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportArg {
    Percentage,
    Pixels,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FailureArg {
    Zero,
    MaxRadius,
}

impl Cli {
    fn predicted_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.predicted {
            return Ok(path.clone());
        }
        sr_companion_path(&self.true_image).ok_or_else(|| {
            HarmonicsError::InvalidConfig(format!(
                "cannot derive a companion for {}: expected a .png file",
                self.true_image.display()
            ))
        })
    }

    fn harmonics_config(&self) -> Result<HarmonicsRadiusConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => HarmonicsRadiusConfig::default(),
        };

        if let Some(threshold) = self.threshold {
            config.success_threshold = threshold;
        }
        if let Some(min_grid_size) = self.min_grid_size {
            config.min_grid_size = min_grid_size;
        }
        if let Some(step) = self.step {
            config.step = step;
        }
        if let Some(initial_size) = self.initial_size {
            config.initial_size = match initial_size {
                InitialSizeArg::ShorterSide => InitialSize::ShorterSide,
                InitialSizeArg::HalfFirstDimension => InitialSize::HalfFirstDimension,
            };
        }
        if let Some(report) = self.report {
            config.report = match report {
                ReportArg::Percentage => RadiusReport::Percentage,
                ReportArg::Pixels => RadiusReport::Pixels,
            };
        }
        if let Some(on_failure) = self.on_failure {
            config.on_failure = match on_failure {
                FailureArg::Zero => FailurePolicy::Zero,
                FailureArg::MaxRadius => FailurePolicy::MaxRadius,
            };
        }

        config.validate()?;
        Ok(config)
    }

    fn build_metrics(&self) -> Result<Vec<Box<dyn Metric>>> {
        let config = self.harmonics_config()?;
        self.metrics
            .iter()
            .map(|kind| -> Result<Box<dyn Metric>> {
                let metric: Box<dyn Metric> = match kind {
                    MetricKind::Hri => Box::new(HarmonicsRadius::new(config.clone())?),
                    MetricKind::Mse => Box::new(MeanSquaredError),
                    MetricKind::Ssim => Box::new(StructuralSimilarity),
                    MetricKind::Psnr => Box::new(PeakSignalToNoiseRatio),
                };
                Ok(metric)
            })
            .collect()
    }
}

fn load_config(path: &Path) -> Result<HarmonicsRadiusConfig> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn run(cli: &Cli) -> Result<()> {
    let metrics = cli.build_metrics()?;
    let predicted_path = cli.predicted_path()?;

    let true_image = Image::open(&cli.true_image, "true_image")?;
    let predicted_image = Image::open(&predicted_path, "predicted_image")?;
    info!(
        "Comparing {} against {}",
        predicted_path.display(),
        cli.true_image.display()
    );

    let mut analyzer = Analyzer::with_settings(AnalyzerSettings {
        name: "HRI95 Calculator".to_string(),
    });
    analyzer.add_reference(true_image)?;
    analyzer.add_candidate(predicted_image);
    for metric in metrics {
        analyzer.add_boxed_metric(metric);
    }

    let results = analyzer.compute()?;
    if cli.json {
        let records: Vec<ResultRecord> = results.iter().map(|r| r.to_record()).collect();
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for result in &results {
            println!("{result}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
