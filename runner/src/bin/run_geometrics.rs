//! Evaluate a test 3-D model against a reference model.
//!
//! ## Usage
//!
//! ```bash
//! # Rasters named relative to the config file's folder
//! cargo run --bin run_geometrics -- -c site.json
//!
//! # Explicit folders, no registration offset
//! cargo run --bin run_geometrics -- -c site.json -r ref/ -t test/ -o out/ --no-align
//!
//! # Ignore test CLS no-data pixels (a bare flag means 1)
//! cargo run --bin run_geometrics -- -c site.json --test-ignore
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::Parser;
use core3d_geometrics::{
    metrics::{ElevationAccuracyMetric, PixelGeometryMetric, TerrainErrorMetric},
    run_evaluation, EvaluationInputs, MetricSuite, TestIgnoreMode,
};
use geometrics_runner::{
    backend_name, create_device, load_elevations, load_labels, remap_labels, RunConfig,
    SelectedBackend, SelectedDevice,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run configuration file
    #[arg(short, long)]
    config: PathBuf,

    /// Reference data folder (default: the config file's folder)
    #[arg(short, long)]
    reference: Option<PathBuf>,

    /// Test data folder (default: the config file's folder)
    #[arg(short, long)]
    test: Option<PathBuf>,

    /// Output folder (default: the test DSM's folder)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Apply the configured registration offset (default)
    #[arg(long, overrides_with = "no_align")]
    align: bool,

    /// Ignore the configured registration offset
    #[arg(long)]
    no_align: bool,

    /// Ignore test no-data values (0=off, 1=ignore CLS, 2=ignore DSM/DTM)
    #[arg(
        long,
        num_args = 0..=1,
        default_missing_value = "1",
        value_parser = clap::value_parser!(u8).range(0..=2)
    )]
    test_ignore: Option<u8>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    tracing::info!(?args, "run_geometrics input arguments");

    let mut config = RunConfig::load(&args.config)?;
    let config_dir = args
        .config
        .parent()
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let reference_dir = args.reference.clone().unwrap_or_else(|| config_dir.clone());
    let test_dir = args.test.clone().unwrap_or(config_dir);
    config.resolve(&reference_dir, &test_dir)?;

    if let Some(value) = args.test_ignore {
        config.evaluation.options.test_ignore = TestIgnoreMode::try_from(value)?;
    }
    if args.no_align && !args.align {
        tracing::info!("skipping registration offset");
        config.registration_offset = None;
    }

    let output_dir = match &args.output {
        Some(dir) => dir.clone(),
        None => config
            .test
            .dsm
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
    };
    fs::create_dir_all(&output_dir).with_context(|| {
        format!("Failed to create output directory: {}", output_dir.display())
    })?;

    let device = create_device();
    tracing::info!(backend = backend_name(), "evaluating");
    let inputs = load_inputs(&config, &device)?;

    let geometry = PixelGeometryMetric::new();
    let relative = ElevationAccuracyMetric::new();
    let terrain = TerrainErrorMetric::new();
    let suite = MetricSuite {
        geometry: &geometry,
        relative: &relative,
        terrain: &terrain,
    };
    let report = run_evaluation(inputs, &config.evaluation, &suite)?;

    let json = report.to_json()?;
    let config_name = args
        .config
        .file_name()
        .unwrap_or_default()
        .to_string_lossy();
    let report_path = output_dir.join(format!("{config_name}_metrics.json"));
    fs::write(&report_path, &json)
        .with_context(|| format!("Failed to write metrics report: {}", report_path.display()))?;

    tracing::info!("{json}");
    tracing::info!(path = %report_path.display(), "metrics report written");
    Ok(())
}

fn load_inputs(
    config: &RunConfig,
    device: &SelectedDevice,
) -> Result<EvaluationInputs<SelectedBackend>> {
    tracing::info!("reading reference model files");
    let reference = &config.reference;
    let reference_materials = reference
        .mtl
        .as_deref()
        .map(|path| load_labels::<SelectedBackend>(path, device))
        .transpose()?
        .map(|raster| remap_labels(raster, &config.material_remap));

    let inputs = EvaluationInputs {
        reference_dsm: load_elevations(&reference.dsm, device)?,
        reference_dtm: load_elevations(&reference.dtm, device)?,
        reference_cls: load_labels(&reference.cls, device)?,
        reference_index: reference
            .ndx
            .as_deref()
            .map(|path| load_labels(path, device))
            .transpose()?,
        reference_materials,
        test_dsm: {
            tracing::info!("reading test model files");
            load_elevations(&config.test.dsm, device)?
        },
        test_dtm: config
            .test
            .dtm
            .as_deref()
            .map(|path| load_elevations(path, device))
            .transpose()?,
        test_cls: load_labels(&config.test.cls, device)?,
        test_materials: config
            .test
            .mtl
            .as_deref()
            .map(|path| load_labels(path, device))
            .transpose()?,
        geotransform: config.geotransform,
        no_data: config.no_data,
        registration_offset: config.registration_offset,
    };
    Ok(inputs)
}
